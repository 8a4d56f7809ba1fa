use agenda_core::config::load_config;
use agenda_service::{EventService, Notifier, SystemClock};
use agenda_store::JsonFileStore;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting agenda notifier");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let store = JsonFileStore::new(&config.storage.path);
    let service = EventService::new(store, config.schedule.clone());
    let events = service.load().await?;

    tracing::info!(
        path = %service.store().path().display(),
        count = events.len(),
        "Events loaded"
    );

    let notifier = Notifier::new(SystemClock, &config.notifier, service.subscribe())?;
    let (tx, mut rx) = mpsc::channel(32);
    let handle = notifier.spawn(tx);

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "Failed to listen for shutdown signal");
                }
                break;
            }
            Some(notification) = rx.recv() => {
                println!("{}", notification.message());
            }
        }
    }

    tracing::info!("Shutting down");
    handle.stop().await;

    Ok(())
}
