//! QR scanner seam. Actual capture (camera, USB scanner, stdin) lives
//! outside this crate; implementations only have to deliver decoded
//! strings over a channel and honour `stop`.

use crate::error::Result;
use tokio::sync::mpsc;

/// What a decoded code should be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    CheckIn,
    Donation,
}

pub trait QrScanner: Send {
    /// Begin scanning. Decoded payloads arrive on the returned channel
    /// until the scanner is stopped or its source is exhausted.
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<String>>;

    /// Stop scanning and release the capture source. Must be safe to
    /// call when not scanning.
    fn stop(&mut self);

    fn is_scanning(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalaError;

    /// Replays a fixed list of codes, for wiring tests.
    struct FixedScanner {
        codes: Vec<String>,
        scanning: bool,
    }

    impl QrScanner for FixedScanner {
        fn start(&mut self) -> Result<mpsc::UnboundedReceiver<String>> {
            if self.scanning {
                return Err(GalaError::scanner("already scanning"));
            }
            self.scanning = true;
            let (tx, rx) = mpsc::unbounded_channel();
            for code in self.codes.drain(..) {
                let _ = tx.send(code);
            }
            Ok(rx)
        }

        fn stop(&mut self) {
            self.scanning = false;
        }

        fn is_scanning(&self) -> bool {
            self.scanning
        }
    }

    #[tokio::test]
    async fn scanner_delivers_codes_then_closes() {
        let mut scanner = FixedScanner {
            codes: vec!["QR-1".into(), "QR-2".into()],
            scanning: false,
        };

        let mut rx = scanner.start().unwrap();
        assert!(scanner.is_scanning());
        assert_eq!(rx.recv().await.as_deref(), Some("QR-1"));
        assert_eq!(rx.recv().await.as_deref(), Some("QR-2"));

        scanner.stop();
        assert!(!scanner.is_scanning());
        assert_eq!(rx.recv().await, None);
    }
}
