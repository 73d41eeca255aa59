use crate::core::Notifier;
use std::io::{BufRead, BufReader, Write};
use std::sync::Mutex;

pub type Output = Box<dyn Write + Send>;
pub type Acknowledgement = Box<dyn BufRead + Send>;

/// Prints each notification on stdout.
///
/// With `acknowledge` set the call blocks until the user presses Enter,
/// the way a modal alert would.
pub struct ConsoleNotifier {
    output: Mutex<Output>,
    acknowledgement: Option<Mutex<Acknowledgement>>,
}

impl ConsoleNotifier {
    pub fn new(acknowledge: bool) -> Self {
        let acknowledgement: Option<Acknowledgement> = if acknowledge {
            Some(Box::new(BufReader::new(std::io::stdin())))
        } else {
            None
        };
        Self::with_io(Box::new(std::io::stdout()), acknowledgement)
    }

    pub fn with_io(output: Output, acknowledgement: Option<Acknowledgement>) -> Self {
        Self {
            output: Mutex::new(output),
            acknowledgement: acknowledgement.map(Mutex::new),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        tracing::info!("📣 {}", message);

        let Ok(mut out) = self.output.lock() else {
            tracing::warn!("Notification output is poisoned, dropping: {}", message);
            return;
        };
        // stdout 關閉時也不能讓通知中斷流程
        let _ = writeln!(out, "{}", message);

        if let Some(acknowledgement) = &self.acknowledgement {
            let _ = write!(out, "Press Enter to continue...");
            let _ = out.flush();
            drop(out);

            if let Ok(mut input) = acknowledgement.lock() {
                let mut line = String::new();
                let _ = input.read_line(&mut line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use std::sync::Arc;

    /// Writer whose bytes stay readable after the notifier takes ownership.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Reader that records how much of its input was consumed.
    struct TrackedInput {
        inner: Cursor<Vec<u8>>,
        consumed: Arc<Mutex<u64>>,
    }

    impl Read for TrackedInput {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.inner.read(buf)?;
            *self.consumed.lock().unwrap() = self.inner.position();
            Ok(n)
        }
    }

    impl BufRead for TrackedInput {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.inner.consume(amt);
            *self.consumed.lock().unwrap() = self.inner.position();
        }
    }

    #[test]
    fn test_plain_notification_has_no_prompt() {
        let output = SharedBuffer::default();
        let notifier = ConsoleNotifier::with_io(Box::new(output.clone()), None);

        notifier.notify("2 + 1 = 3");

        assert_eq!(output.contents(), "2 + 1 = 3\n");
    }

    #[test]
    fn test_acknowledge_waits_for_one_line() {
        let output = SharedBuffer::default();
        let consumed = Arc::new(Mutex::new(0));
        let input = TrackedInput {
            inner: Cursor::new(b"\nsecond\n".to_vec()),
            consumed: consumed.clone(),
        };
        let notifier = ConsoleNotifier::with_io(Box::new(output.clone()), Some(Box::new(input)));

        notifier.notify("2 + 1 = 3");

        assert_eq!(output.contents(), "2 + 1 = 3\nPress Enter to continue...");
        assert_eq!(*consumed.lock().unwrap(), 1);

        notifier.notify("again");
        assert!(output.contents().ends_with("again\nPress Enter to continue..."));
        assert_eq!(*consumed.lock().unwrap(), 8);
    }

    #[test]
    fn test_acknowledge_with_closed_input_returns() {
        let output = SharedBuffer::default();
        let notifier = ConsoleNotifier::with_io(
            Box::new(output.clone()),
            Some(Box::new(Cursor::new(Vec::new()))),
        );

        notifier.notify("unsupported");

        assert!(output.contents().starts_with("unsupported\n"));
    }
}
