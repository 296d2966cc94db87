//! Spreadsheet import/export with the fixed column mapping used by the
//! registration sheet. Headers are the Ukrainian labels; import also
//! accepts the English API field names so exported API dumps load too.

use crate::error::Result;
use crate::types::Participant;
use std::io::{Read, Write};

const COL_QR: &str = "QR-код";
const COL_NAME: &str = "Ім'я";
const COL_SURNAME: &str = "Прізвище";
const COL_VISITED: &str = "Присутність";
const COL_DONATION: &str = "Донат (грн)";

const YES: &str = "Так";
const NO: &str = "Ні";

/// Export the full roster with all five columns.
pub fn export_roster<W: Write>(writer: W, roster: &[Participant]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([COL_QR, COL_NAME, COL_SURNAME, COL_VISITED, COL_DONATION])?;

    for p in roster {
        let donation = format_amount(p.donation);
        out.write_record([
            p.qr_code.as_str(),
            p.name.as_str(),
            p.surname.as_str(),
            if p.visited { YES } else { NO },
            donation.as_str(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

/// Export only qualifying donors, without the presence column.
pub fn export_donors<W: Write>(
    writer: W,
    roster: &[Participant],
    minimum_donation: f64,
) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([COL_QR, COL_NAME, COL_SURNAME, COL_DONATION])?;

    for p in roster.iter().filter(|p| p.donation >= minimum_donation) {
        let donation = format_amount(p.donation);
        out.write_record([
            p.qr_code.as_str(),
            p.name.as_str(),
            p.surname.as_str(),
            donation.as_str(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

/// Import a roster. Missing donation parses as 0, missing presence as
/// false; unknown columns are ignored.
pub fn import_roster<R: Read>(reader: R) -> Result<Vec<Participant>> {
    let mut input = csv::Reader::from_reader(reader);

    let headers = input.headers()?.clone();
    let col = |names: [&str; 2]| {
        headers
            .iter()
            .position(|h| h == names[0] || h == names[1])
    };

    let qr_idx = col([COL_QR, "qrCode"]);
    let name_idx = col([COL_NAME, "name"]);
    let surname_idx = col([COL_SURNAME, "surname"]);
    let visited_idx = col([COL_VISITED, "visited"]);
    let donation_idx = col([COL_DONATION, "donation"]);

    let field = |record: &csv::StringRecord, idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let mut roster = Vec::new();
    for record in input.records() {
        let record = record?;

        let visited_raw = field(&record, visited_idx);
        let donation_raw = field(&record, donation_idx);

        roster.push(Participant {
            qr_code: field(&record, qr_idx),
            name: field(&record, name_idx),
            surname: field(&record, surname_idx),
            visited: visited_raw == YES || visited_raw.eq_ignore_ascii_case("true"),
            donation: donation_raw.parse().unwrap_or(0.0),
        });
    }

    Ok(roster)
}

fn format_amount(amount: f64) -> String {
    if amount == amount.trunc() {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}
