use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use gala_core::{App, Participant, Result};

#[derive(Subcommand)]
pub enum ParticipantCommands {
    /// List participants from the local cache
    List {
        /// Filter by QR code, name or surname
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show roster statistics
    Stats,
    /// Add a participant to the local roster
    Add {
        /// QR code printed on the badge
        qr_code: String,
        /// First name
        name: String,
        /// Surname
        surname: String,
    },
}

pub async fn handle_participant_command(cmd: ParticipantCommands, app: &mut App) -> Result<()> {
    match cmd {
        ParticipantCommands::List { search } => {
            app.require_login()?;
            if app.roster().is_empty() {
                app.load_cached().await?;
            }

            let rows: Vec<&Participant> = match &search {
                Some(term) => app.search(term),
                None => app.roster().iter().collect(),
            };

            if rows.is_empty() {
                println!("No participants found.");
                println!("Run 'gala sync' to fetch the roster");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["QR code", "Name", "Surname", "Present", "Donation"]);

            for p in &rows {
                table.add_row(vec![
                    p.qr_code.clone(),
                    p.name.clone(),
                    p.surname.clone(),
                    (if p.visited { "✓" } else { "-" }).to_string(),
                    format!("{:.0}", p.donation),
                ]);
            }

            println!("{}", table);
            println!("{} participants", rows.len());
        }

        ParticipantCommands::Stats => {
            app.require_login()?;
            if app.roster().is_empty() {
                app.load_cached().await?;
            }

            let stats = app.stats();
            let minimum = app.config().lottery.minimum_donation;

            println!("Roster statistics:");
            println!("  Registered: {}", stats.total);
            println!("  Present: {}", stats.present);
            println!("  Total donations: {:.0} UAH", stats.total_donations);
            println!(
                "  Donors at {:.0}+ UAH: {}",
                minimum, stats.big_donors
            );
        }

        ParticipantCommands::Add {
            qr_code,
            name,
            surname,
        } => {
            if app.roster().is_empty() {
                app.load_cached().await?;
            }
            app.add_participant(&qr_code, &name, &surname).await?;
            println!("Added {} {} ({})", name, surname, qr_code);
            println!("Note: local only - register on the service to make it official");
        }
    }

    Ok(())
}
