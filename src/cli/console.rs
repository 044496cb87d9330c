//! Terminal notifier

use podfs::notify::{Notice, Notifier, Severity};

/// Prints notices to stderr and mirrors them into the debug log
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => {
                tracing::info!("{}", notice.message);
                eprintln!("{}", notice.message);
            }
            Severity::Warning => {
                tracing::warn!("{}", notice.message);
                eprintln!("warning: {}", notice.message);
            }
            Severity::Error => {
                tracing::error!("{}", notice.message);
                eprintln!("error: {}", notice.message);
            }
        }
    }
}
