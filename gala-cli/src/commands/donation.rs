use crate::scanner;
use dialoguer::Input;
use gala_core::scan::{QrScanner, ScanMode};
use gala_core::{App, GalaError, Result};

pub async fn handle_donation_command(
    app: &mut App,
    qr_code: Option<String>,
    amount: Option<f64>,
    scan: bool,
) -> Result<()> {
    app.require_login()?;

    let qr_code = match qr_code {
        Some(qr) => qr,
        None if scan => scan_one_code().await?,
        None => return Err(GalaError::config("provide a QR code or use --scan")),
    };

    let amount = match amount {
        Some(a) => a,
        None => Input::<f64>::new()
            .with_prompt("Donation amount (UAH)")
            .interact_text()
            .map_err(|e| GalaError::internal(e.to_string()))?,
    };

    app.record_donation(&qr_code, amount).await?;
    println!("✓ Donation of {:.0} UAH recorded for {}", amount, qr_code);

    if let Some(p) = app.roster().iter().find(|p| p.qr_code == qr_code) {
        let minimum = app.config().lottery.minimum_donation;
        println!("  {} has donated {:.0} UAH total", p.full_name(), p.donation);
        if p.donation >= minimum {
            println!("  Qualifies for the lottery (threshold {:.0} UAH)", minimum);
        }
    }

    Ok(())
}

/// Scan mode mirrors the kiosk flow: one badge, then the amount.
async fn scan_one_code() -> Result<String> {
    let (mut scanner, mut codes) = scanner::start_scanning(ScanMode::Donation)?;
    let code = codes.recv().await;
    scanner.stop();
    code.ok_or_else(|| GalaError::scanner("no code scanned"))
}
