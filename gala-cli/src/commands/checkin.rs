use crate::scanner;
use gala_core::scan::{QrScanner, ScanMode};
use gala_core::{App, GalaError, Result};

pub async fn handle_checkin_command(
    app: &mut App,
    qr_code: Option<String>,
    scan: bool,
) -> Result<()> {
    app.require_login()?;

    if scan {
        return scan_loop(app).await;
    }

    let qr_code =
        qr_code.ok_or_else(|| GalaError::config("provide a QR code or use --scan"))?;
    check_in_one(app, &qr_code).await;
    Ok(())
}

/// Continuous mode: one code per line until EOF. Failures are reported
/// per code and never abort the loop, so a bad badge does not block the
/// queue at the door.
async fn scan_loop(app: &mut App) -> Result<()> {
    let (mut scanner, mut codes) = scanner::start_scanning(ScanMode::CheckIn)?;

    while let Some(code) = codes.recv().await {
        check_in_one(app, &code).await;
    }

    scanner.stop();
    println!("Scanner stopped");
    Ok(())
}

async fn check_in_one(app: &mut App, qr_code: &str) {
    match app.check_in(qr_code).await {
        Ok(()) => {
            let name = app
                .roster()
                .iter()
                .find(|p| p.qr_code == qr_code)
                .map(|p| p.full_name());
            match name {
                Some(name) => println!("  ✓ {} checked in ({})", name, qr_code),
                None => println!("  ✓ {} checked in", qr_code),
            }
        }
        Err(e) => println!("  ✗ {}: {}", qr_code, e),
    }
}
