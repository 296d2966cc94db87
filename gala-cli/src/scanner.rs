use gala_core::scan::{QrScanner, ScanMode};
use gala_core::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Start a stdin scanner with a mode-appropriate prompt. The caller
/// owns both halves; dropping or stopping the scanner ends the stream.
pub fn start_scanning(mode: ScanMode) -> Result<(StdinScanner, mpsc::UnboundedReceiver<String>)> {
    match mode {
        ScanMode::CheckIn => println!("Scanning - one QR code per line, Ctrl-D to stop"),
        ScanMode::Donation => println!("Scan the donor badge (one QR code line)"),
    }
    let mut scanner = StdinScanner::new();
    let codes = scanner.start()?;
    Ok((scanner, codes))
}

/// Scanner that reads decoded QR payloads from stdin, one per line.
/// Stands in for the camera on devices that pipe a hardware scanner
/// into the terminal.
pub struct StdinScanner {
    task: Option<JoinHandle<()>>,
}

impl StdinScanner {
    pub fn new() -> Self {
        Self { task: None }
    }
}

impl QrScanner for StdinScanner {
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<String>> {
        let (tx, rx) = mpsc::unbounded_channel();

        self.task = Some(tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let code = line.trim().to_string();
                if code.is_empty() {
                    continue;
                }
                if tx.send(code).is_err() {
                    break;
                }
            }
        }));

        Ok(rx)
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_scanning(&self) -> bool {
        self.task.as_ref().map_or(false, |t| !t.is_finished())
    }
}
