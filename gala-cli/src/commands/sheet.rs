use chrono::Utc;
use gala_core::{sheet, App, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

pub async fn handle_export_command(
    app: &mut App,
    output: Option<PathBuf>,
    donors: bool,
) -> Result<()> {
    app.require_admin()?;
    if app.roster().is_empty() {
        app.load_cached().await?;
    }

    let minimum = app.config().lottery.minimum_donation;
    let date = Utc::now().format("%Y-%m-%d");
    let path = output.unwrap_or_else(|| {
        if donors {
            PathBuf::from(format!("donors_{:.0}plus_{}.csv", minimum, date))
        } else {
            PathBuf::from(format!("conference_{}.csv", date))
        }
    });

    let file = File::create(&path)?;
    if donors {
        sheet::export_donors(file, app.roster(), minimum)?;
        let count = app
            .roster()
            .iter()
            .filter(|p| p.donation >= minimum)
            .count();
        println!("Exported {} donors to {}", count, path.display());
    } else {
        sheet::export_roster(file, app.roster())?;
        println!(
            "Exported {} participants to {}",
            app.roster().len(),
            path.display()
        );
    }

    Ok(())
}

pub async fn handle_import_command(app: &mut App, input: &Path) -> Result<()> {
    app.require_admin()?;

    let file = File::open(input)?;
    let roster = sheet::import_roster(file)?;
    let count = roster.len();

    app.replace_roster(roster).await?;
    println!("Imported {} participants from {}", count, input.display());

    Ok(())
}
