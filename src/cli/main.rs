mod input;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use livesearch::core::config::DispatchConfig;
use livesearch::core::telemetry::logging::init_logging;
use livesearch::dispatch::{Contexts, LifecycleController, QueryPipeline};
use livesearch::services::search::CatalogEngine;
use livesearch::stream::{interactive_pair, ExecutionContext, InteractiveContext, WorkerPool};
use livesearch::ui::{Button, ConsoleDisplay, Surface, TextField};

use input::Command;

#[derive(Debug, Parser)]
#[command(
    name = "livesearch",
    about = "Search a catalog as you type.",
    long_about = "Search a catalog as you type. Each input line replaces the query, \
                  '!' presses search and ':q' quits."
)]
struct Args {
    /// JSON file with dispatcher settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalog to search, one item per line. Defaults to a built-in sample.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long)]
    debounce_ms: Option<u64>,
    #[arg(long)]
    min_query_len: Option<usize>,
    /// Artificial delay added to every search call.
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DispatchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DispatchConfig::default(),
    };
    if let Some(debounce_ms) = args.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    if let Some(min_query_len) = args.min_query_len {
        config.min_query_len = min_query_len;
    }

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all().thread_name("livesearch-worker");
    if let Some(threads) = config.worker_threads {
        builder.max_blocking_threads(threads.max(1));
    }
    let runtime = builder.build()?;

    let engine = match &args.catalog {
        Some(path) => CatalogEngine::load(path)?,
        None => CatalogEngine::sample(),
    }
    .with_latency(Duration::from_millis(args.latency_ms));
    tracing::info!("Searching {} catalog items", engine.len());

    let (interactive, interactive_loop) = interactive_pair();
    let button = Arc::new(Button::new());
    let field = Arc::new(TextField::new());
    let surface = Surface::new(
        button.clone(),
        field.clone(),
        Arc::new(ConsoleDisplay::stdout()),
    );
    let contexts = Contexts {
        interactive: Arc::new(interactive.clone()),
        worker: Arc::new(WorkerPool::new(runtime.handle().clone())),
        timer: runtime.handle().clone(),
    };

    let mut lifecycle =
        LifecycleController::new(QueryPipeline::new(Arc::new(engine), contexts, config), surface);
    lifecycle.activate()?;

    let quit = Arc::new(AtomicBool::new(false));
    spawn_stdin_reader(interactive.clone(), button, field, Arc::clone(&quit))?;

    let on_signal = interactive.clone();
    let signal_quit = Arc::clone(&quit);
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.submit(Box::new(move || signal_quit.store(true, Ordering::SeqCst)));
        }
    });

    while !quit.load(Ordering::SeqCst) {
        interactive_loop.run_until(Duration::from_millis(250), || quit.load(Ordering::SeqCst));
    }

    lifecycle.deactivate();
    runtime.shutdown_timeout(Duration::from_secs(1));
    Ok(())
}

/// Reads console lines on a helper thread and replays them as widget events on the
/// interactive loop.
fn spawn_stdin_reader(
    interactive: InteractiveContext,
    button: Arc<Button>,
    field: Arc<TextField>,
    quit: Arc<AtomicBool>,
) -> Result<()> {
    thread::Builder::new()
        .name("livesearch-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!("Failed to read stdin: {}", e);
                        break;
                    }
                };
                let command = Command::parse(&line);
                if command == Command::Quit {
                    break;
                }
                let button = Arc::clone(&button);
                let field = Arc::clone(&field);
                interactive.submit(Box::new(move || match command {
                    Command::Edit(text) => field.set_text(text),
                    Command::Press(text) => {
                        if let Some(text) = text {
                            field.set_text(text);
                        }
                        button.click();
                    }
                    Command::Quit => {}
                }));
            }
            interactive.submit(Box::new(move || quit.store(true, Ordering::SeqCst)));
        })?;
    Ok(())
}
