use gala_core::{App, Result};

pub async fn handle_sync_command(app: &mut App, watch: bool) -> Result<()> {
    app.require_login()?;

    println!("Syncing roster...");
    let count = app.sync().await?;
    println!("Synced {} participants", count);

    let stats = app.stats();
    println!(
        "  Present: {}  Donations: {:.0} UAH  Qualifying donors: {}",
        stats.present, stats.total_donations, stats.big_donors
    );

    if watch {
        let interval = app.config().sync_interval_secs;
        println!("Watching - refreshing every {}s, Ctrl-C to stop", interval);
        app.start_auto_sync();
        tokio::signal::ctrl_c()
            .await
            .map_err(gala_core::GalaError::Io)?;
        app.stop_auto_sync();
        println!("Stopped");
    }

    Ok(())
}
