//! Application entry point for the Vision Assist console harness.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime.
//! 4. Create the assistant event channel.
//! 5. Wire the console collaborators (stdin recognizer, stdout synthesizer,
//!    still camera) and pick a model loader.
//! 6. Start the assistant (camera, then model, then listening).  A failed
//!    start is logged, shown and spoken, and the harness stays up.
//! 7. Run the event loop until stdin closes or Ctrl-C.

use std::sync::Arc;

use tokio::sync::mpsc;
use vision_assist::{
    config::AppConfig,
    console::{ConsoleRecognizer, ConsoleSynthesizer, NoModelLoader, StillCamera},
    detect::{HttpModelLoader, ModelLoader},
    display::SharedDisplay,
    pipeline::{Assistant, AssistantEvent, Collaborators},
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Vision Assist starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (inference requests and speech timers share it)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    rt.block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    log::info!("Wake phrases {:?}", config.speech.wake_phrases);

    // 4. Channel setup
    let (events_tx, events_rx) = mpsc::channel::<AssistantEvent>(64);

    // 5. Collaborators
    let display = SharedDisplay::new();
    let collaborators = Collaborators {
        recognizer: Box::new(ConsoleRecognizer::new(&config.speech.language, events_tx.clone())),
        synthesizer: Box::new(ConsoleSynthesizer::new(
            &config.console,
            &config.speech.language,
            events_tx.clone(),
        )),
        camera: Box::new(StillCamera::new(&config.console)),
        display: Box::new(display.clone()),
    };

    let loader: Arc<dyn ModelLoader> = match HttpModelLoader::from_config(&config.model) {
        Some(loader) => {
            log::info!("Using detection backend at {}", loader.endpoint());
            Arc::new(loader)
        }
        None => Arc::new(NoModelLoader),
    };

    // 6. Startup
    let mut assistant = Assistant::new(&config, collaborators, events_tx.clone());
    if let Err(e) = assistant.start(loader.as_ref()).await {
        log::error!("Startup failed: {e}; not listening until restarted");
    }

    // 7. Event loop; Ctrl-C turns into a Shutdown event.
    let shutdown_tx = events_tx;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl-C received, shutting down");
            let _ = shutdown_tx.send(AssistantEvent::Shutdown).await;
        }
    });

    assistant.run(events_rx).await;

    let last = display.snapshot();
    log::info!("Final status: {}", last.status);
    Ok(())
}
