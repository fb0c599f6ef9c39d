use rang_workflow::{Notice, Notifier};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Notifier that prints workflow outcomes to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success { title, detail } => eprintln!("{} {}", title, detail),
            Notice::Failure { title, detail } => eprintln!("{}: {}", title, detail),
        }
    }
}
