use clap::Parser;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use prefdiff::{
    cli::Cli,
    output::emit_change,
    ChangeCorrelator, FileDocumentSource, PreferenceWatcher,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = cli.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    cli.setup_logging();

    let config = cli.resolve_config()?;
    let watch_path = cli.get_watch_path();
    tracing::info!("Starting prefdiff on: {}", watch_path.display());

    let documents = cli
        .discovery(&config)
        .discover()
        .with_context(|| format!("Failed to discover documents in {}", watch_path.display()))?;

    // Baselines are complete before the first notification can arrive
    let mut correlator =
        ChangeCorrelator::with_generator(FileDocumentSource::new(), config.diff.build_generator());
    let tracked = correlator.capture_baselines(documents);
    tracing::info!("Tracking {} documents", tracked);

    let watcher = PreferenceWatcher::new(correlator.state().paths().cloned().collect::<Vec<_>>())?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let no_color = cli.no_color;
    correlator.run(
        watcher.receiver(),
        config.watcher.recv_timeout_duration(),
        || running.load(Ordering::SeqCst),
        |change| {
            emit_change(&change, &cli.output, no_color);
        },
    );

    Ok(())
}
