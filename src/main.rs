use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chat_overlay::cli::{self, CliResult};
use chat_overlay::{NoGeometry, Overlay, OverlayConfig, PruneSchedule, RenderEffect, VERSION};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let (options, print_config) = match cli::process_cli() {
        CliResult::Continue(options) => (options, false),
        CliResult::PrintConfig(options) => (options, true),
    };
    // Logs go to the debug file (and stderr with RUST_LOG); stdout carries effects.
    chat_overlay::debug::init_log_bridge(options.log_level);

    log::info!("Starting chat-overlay {}", VERSION);

    let path = options
        .config_path
        .unwrap_or_else(OverlayConfig::config_path);
    let config = OverlayConfig::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let runtime = Runtime::new()?;
    let result = runtime.block_on(run(Arc::new(config)));
    log::info!("Input closed, shutting down");
    runtime.shutdown_timeout(std::time::Duration::from_secs(2));

    if let Err(ref e) = result {
        eprintln!("chat-overlay: error: {e:#}");
    }
    result
}

/// Feed stdin lines to the overlay while pruning on the schedule.
async fn run(config: Arc<OverlayConfig>) -> Result<()> {
    let overlay = Overlay::new(Arc::clone(&config));
    let mut ticker = PruneSchedule::from_config(&config).ticker();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();

    let theme = serde_json::json!({ "effect": "theme", "theme": overlay.theme() });
    write_line(&mut out, &theme.to_string()).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => emit(&mut out, overlay.handle_line(&line)).await?,
                    None => break,
                }
            }
            _ = ticker.tick() => {
                emit(&mut out, overlay.prune(Instant::now(), &NoGeometry)).await?;
            }
        }
    }
    Ok(())
}

async fn emit(out: &mut Stdout, effects: Vec<RenderEffect>) -> Result<()> {
    for effect in effects {
        let json = serde_json::to_string(&effect).context("Failed to encode effect")?;
        write_line(out, &json).await?;
    }
    Ok(())
}

async fn write_line(out: &mut Stdout, line: &str) -> Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}
