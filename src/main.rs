use action_dialogs::cli::Cli;
use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    install_panic_hook();

    let cli = Cli::parse();

    // Load environment variables from .env file
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file found or error loading it: {}", e);
    }

    if let Err(e) = init_logging(cli.debug, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    match cli.execute().await {
        Ok(0) => {}
        Ok(status) => std::process::exit(status),
        Err(e) => {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Log panics without exiting. The store catches observer panics and the
/// terminal is restored while an uncaught panic unwinds out of `tui::run`.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
    }));
}

fn init_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let default_filter = if debug {
        "action_dialogs=debug"
    } else {
        "action_dialogs=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_dialogs::dialogs::{AlertProps, DialogStore, Dialogs};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_panic_hook_keeps_observer_panics_isolated() {
        install_panic_hook();

        let dialogs = Dialogs::new(DialogStore::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _failing = dialogs.store().subscribe(|_| panic!("observer failure"));
        let _counting = dialogs.store().subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let _alert = dialogs.alert(AlertProps::new("still running"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(dialogs.store().len(), 1);

        let _ = std::panic::take_hook();
    }
}
