//! StreamScope - Main Entry Point
//!
//! Live strip charts for line-oriented sensor feeds.

use anyhow::Context;
use clap::Parser;
use streamscope::{backend::FeedBackend, cli::Cli, config::AppConfig, frontend::StreamScopeApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting StreamScope {}", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config_path();
    let mut config = match &config_path {
        Some(path) if cli.config.is_some() => {
            AppConfig::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        Some(path) => AppConfig::load_or_default(path),
        None => AppConfig::default(),
    };
    cli.apply(&mut config).context("invalid configuration")?;

    if cli.save_config {
        let path = config_path.context("no config directory available")?;
        config.save(&path)?;
        tracing::info!("Saved configuration to {:?}", path);
    }

    let (backend, feed) = FeedBackend::new(config.feed.clone());
    let stop = backend.stop_handle();
    let backend_thread = std::thread::Builder::new()
        .name("feed-backend".into())
        .spawn(move || backend.run())?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("StreamScope"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "StreamScope",
        native_options,
        Box::new(|cc| Ok(Box::new(StreamScopeApp::new(cc, config, feed)))),
    );

    tracing::info!("Shutting down...");
    stop.store(false, std::sync::atomic::Ordering::SeqCst);
    if backend_thread.join().is_err() {
        tracing::warn!("Feed backend panicked");
    }

    result.map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
