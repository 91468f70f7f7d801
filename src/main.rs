use color_eyre::{eyre::eyre, Result};
use padmap::config::AppConfig;
use padmap::controller::event_collector::EventCollector;
use padmap::controller::InputSampler;
use padmap::mapping::strategy::DetachedMemory;
use padmap::mapping::{AudioOutput, DirectionalZone, FrameOutcome, Haptics, InputManager, LogicalMask};
use padmap::persistence::storage::StorageMethod;
use padmap::persistence::{FsStorage, PersistenceManager, Preferences, PrefsAction, PrefsDocument};
use std::time::Duration;
use tokio::sync::{mpsc::Sender, oneshot};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Stands in for the console's rumble motor.
struct LoggingHaptics;

impl Haptics for LoggingHaptics {
    fn rumble(&mut self, strength: u8) {
        debug!("Rumble strength {}", strength);
    }
}

/// Stands in for the emulator's audio output.
struct LoggingAudio;

impl AudioOutput for LoggingAudio {
    fn stop(&mut self) {
        info!("Audio stopped");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config = AppConfig::load_or_init(&AppConfig::default_path()).await;

    let persistence = PersistenceManager::spawn(FsStorage::new(&config.storage));
    let prefs_client = persistence.get_sender();

    let mut prefs = Preferences::new();
    let mut manager = InputManager::create(DirectionalZone::new(config.pad_calibration));
    match load_prefs(&prefs_client).await {
        Ok(Some(document)) => {
            if let Err(e) = document.apply(&mut prefs, manager.store_mut()) {
                warn!("Failed to apply preferences: {}", e);
            }
        }
        Ok(None) => info!("Starting with default padmaps"),
        Err(e) => warn!("{}", e),
    }
    manager.apply_preferences(&prefs);

    match std::env::args().nth(1).or_else(|| config.title_code.clone()) {
        Some(title) => manager.load_title(&title),
        None => info!("No title code given, using standard controls"),
    }

    let mut collector = EventCollector::create()
        .map_err(|e| eyre!("Failed to create input sampler: {}", e))?
        .initialize()
        .map_err(|e| eyre!("Failed to initialize input sampler: {}", e))?;

    let mut running = manager.resume();
    let mut haptics = LoggingHaptics;
    let mut interval = tokio::time::interval(Duration::from_millis(config.frame_interval_ms.max(1)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Running, hold the menu gesture or press Ctrl+C to stop");
    let mut last = LogicalMask::empty();
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let inputs = collector.sample();
                match running.poll(&inputs, &DetachedMemory, &mut haptics) {
                    FrameOutcome::Buttons(mask) => {
                        if mask != last {
                            debug!("Buttons: {:?}", mask);
                            last = mask;
                        }
                    }
                    FrameOutcome::OpenMenu => {
                        info!("Menu requested");
                        break;
                    }
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    let manager = running.pause(&mut LoggingAudio);
    let document = PrefsDocument::capture(&prefs, manager.store())
        .map_err(|e| eyre!("Failed to capture preferences: {}", e))?;
    match save_prefs(&prefs_client, document, &prefs).await {
        Ok(method) => info!("Preferences saved to {}", method),
        Err(e) => warn!("{}", e),
    }

    drop(prefs_client);
    persistence.shutdown().await?;
    Ok(())
}

async fn load_prefs(client: &Sender<PrefsAction>) -> Result<Option<PrefsDocument>> {
    let (response_tx, response_rx) = oneshot::channel();
    client
        .send(PrefsAction::LoadPrefs { response_tx })
        .await
        .map_err(|e| eyre!("Failed to request preferences: {}", e))?;
    response_rx
        .await
        .map_err(|e| eyre!("Failed to receive preferences: {}", e))?
}

async fn save_prefs(
    client: &Sender<PrefsAction>,
    document: PrefsDocument,
    prefs: &Preferences,
) -> Result<StorageMethod> {
    let (response_tx, response_rx) = oneshot::channel();
    client
        .send(PrefsAction::SavePrefs {
            document,
            method: prefs.file.save_method,
            response_tx,
        })
        .await
        .map_err(|e| eyre!("Failed to request save: {}", e))?;
    response_rx
        .await
        .map_err(|e| eyre!("Failed to receive save result: {}", e))?
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
