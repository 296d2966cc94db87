mod commands;
mod scanner;

use clap::{Parser, Subcommand};
use gala_core::{App, AppConfig, GalaError};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gala")]
#[command(about = "GALA - event check-in and donation lottery")]
#[command(version)]
struct Cli {
    /// Data directory for local state
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as a staff role (hostess or admin)
    Login {
        /// Role name: hostess or admin
        role: String,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and clear the saved session
    Logout,

    /// Show session, roster and connection status
    Status,

    /// Sync the roster from the registration service
    Sync {
        /// Keep refreshing in the background until Ctrl-C
        #[arg(long)]
        watch: bool,
    },

    /// Check a participant in by QR code
    Checkin {
        /// Decoded QR code (omit with --scan)
        qr_code: Option<String>,
        /// Read QR codes from stdin, one per line, until EOF
        #[arg(long)]
        scan: bool,
    },

    /// Record a donation for a participant
    Donation {
        /// Decoded QR code (omit with --scan)
        qr_code: Option<String>,
        /// Amount in UAH (will prompt if not provided)
        amount: Option<f64>,
        /// Scan the badge from stdin first
        #[arg(long)]
        scan: bool,
    },

    /// Roster commands
    #[command(subcommand)]
    Participants(commands::ParticipantCommands),

    /// Export the roster to a CSV spreadsheet
    Export {
        /// Output file (defaults to conference_<date>.csv)
        output: Option<PathBuf>,
        /// Export only qualifying donors
        #[arg(long)]
        donors: bool,
    },

    /// Import a roster from a CSV spreadsheet
    Import {
        /// Input file
        input: PathBuf,
    },

    /// Run the donation lottery draw
    Lottery {
        /// Number of winners to draw
        winners: usize,
        /// Run the reveal on timers only, without manual triggers
        #[arg(long)]
        auto: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "gala={}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gala")
    });
    tokio::fs::create_dir_all(&data_dir).await?;
    tracing::debug!("Using data dir {}", data_dir.display());

    let config = AppConfig::load(&data_dir.join("config.json"))?;
    let mut app = App::new(config, &data_dir).await?;
    app.restore_session().await?;

    // Execute command
    let result = match cli.command {
        Commands::Login { role, password } => {
            commands::handle_login_command(&mut app, &role, password).await
        }
        Commands::Logout => commands::handle_logout_command(&mut app).await,
        Commands::Status => commands::handle_status_command(&mut app).await,
        Commands::Sync { watch } => commands::handle_sync_command(&mut app, watch).await,
        Commands::Checkin { qr_code, scan } => {
            commands::handle_checkin_command(&mut app, qr_code, scan).await
        }
        Commands::Donation {
            qr_code,
            amount,
            scan,
        } => commands::handle_donation_command(&mut app, qr_code, amount, scan).await,
        Commands::Participants(cmd) => {
            commands::handle_participant_command(cmd, &mut app).await
        }
        Commands::Export { output, donors } => {
            commands::handle_export_command(&mut app, output, donors).await
        }
        Commands::Import { input } => commands::handle_import_command(&mut app, &input).await,
        Commands::Lottery { winners, auto } => {
            commands::handle_lottery_command(&mut app, winners, auto).await
        }
    };

    if let Err(e) = result {
        match e {
            GalaError::NotLoggedIn => {
                eprintln!("Error: not logged in");
                eprintln!("Use 'gala login <role>' first");
            }
            GalaError::AdminRequired => {
                eprintln!("Error: this command requires the admin role");
            }
            GalaError::InvalidPassword { role } => {
                eprintln!("Error: invalid password for role '{}'", role);
            }
            GalaError::Api(msg) => {
                eprintln!("Error from registration service: {}", msg);
            }
            GalaError::Network(err) => {
                eprintln!("Error: cannot reach the registration service");
                eprintln!("{}", err);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
