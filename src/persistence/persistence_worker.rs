use super::palette::{load_palettes, save_palettes, GamePalette, PaletteBook};
use super::prefs::{load_prefs, save_prefs, PrefsDocument};
use super::storage::{available_media, Storage, StorageMethod};
use color_eyre::{eyre::eyre, Result};
use tokio::sync::mpsc::{channel, Sender};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

macro_rules! handle_action {
    ($action:expr, $response_tx:expr) => {
        if let Err(_) = $response_tx.send($action.await) {
            error!("Failed to send response");
        }
    };
}

/// State owned by the worker task.
struct PersistenceWorker<S: Storage> {
    storage: S,
    /// Palette book and the medium it came from, read on first use.
    palettes: Option<(Option<StorageMethod>, PaletteBook)>,
}

impl<S: Storage> PersistenceWorker<S> {
    async fn load_prefs(&self) -> Result<Option<PrefsDocument>> {
        Ok(load_prefs(&self.storage).await.map(|(_, doc)| doc))
    }

    async fn save_prefs(&self, document: PrefsDocument, method: StorageMethod) -> Result<StorageMethod> {
        save_prefs(&self.storage, &document, method)
            .await
            .map_err(|e| eyre!("Failed to save preferences: {}", e))
    }

    async fn book(&mut self) -> &mut (Option<StorageMethod>, PaletteBook) {
        let book = match self.palettes.take() {
            Some(book) => book,
            None => load_palettes(&self.storage).await,
        };
        self.palettes.insert(book)
    }

    async fn load_palette(&mut self, game: String) -> Result<GamePalette> {
        let (_, book) = self.book().await;
        let palette = book.palette_for(&game);
        if palette.name != game {
            info!("No palette for {}, using {}", game, palette.name);
        }
        Ok(palette)
    }

    async fn save_palette(&mut self, palette: GamePalette, overwrite: bool) -> Result<bool> {
        let (origin, book) = self.book().await;
        if !book.upsert(palette, overwrite) {
            debug!("Palette exists and overwrite is off, nothing saved");
            return Ok(false);
        }
        let method = origin.unwrap_or(StorageMethod::Auto);
        let book = book.clone();
        let saved_to = save_palettes(&self.storage, &book, method)
            .await
            .map_err(|e| eyre!("Failed to save palettes: {}", e))?;
        if let Some((origin, _)) = &mut self.palettes {
            *origin = Some(saved_to);
        }
        Ok(true)
    }
}

pub struct PersistenceManager {
    tx: Sender<PrefsAction>,
    worker_handle: tokio::task::JoinHandle<()>,
}

impl PersistenceManager {
    /// Starts the worker task. It runs until every sender is dropped.
    pub fn spawn<S>(storage: S) -> Self
    where
        S: Storage + 'static,
    {
        let (tx, mut rx) = channel::<PrefsAction>(32);
        let mut worker = PersistenceWorker {
            storage,
            palettes: None,
        };
        let handle = tokio::spawn(async move {
            info!("Persistence worker started");
            while let Some(action) = rx.recv().await {
                match action {
                    PrefsAction::LoadPrefs { response_tx } => {
                        handle_action!(worker.load_prefs(), response_tx);
                    }
                    PrefsAction::SavePrefs {
                        document,
                        method,
                        response_tx,
                    } => {
                        handle_action!(worker.save_prefs(document, method), response_tx);
                    }
                    PrefsAction::LoadPalette { game, response_tx } => {
                        handle_action!(worker.load_palette(game), response_tx);
                    }
                    PrefsAction::SavePalette {
                        palette,
                        overwrite,
                        response_tx,
                    } => {
                        handle_action!(worker.save_palette(palette, overwrite), response_tx);
                    }
                    PrefsAction::ListMedia { response_tx } => {
                        if response_tx.send(Ok(available_media(&worker.storage))).is_err() {
                            error!("Failed to send response");
                        }
                    }
                }
            }
            info!("Persistence worker stopped");
        });

        Self {
            tx,
            worker_handle: handle,
        }
    }

    pub fn get_sender(&self) -> Sender<PrefsAction> {
        self.tx.clone()
    }

    /// Closes the channel and waits for queued actions to finish.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.tx);
        self.worker_handle
            .await
            .map_err(|e| eyre!("Failed to join persistence worker: {}", e))
    }
}

#[derive(Debug)]
pub enum PrefsAction {
    LoadPrefs {
        response_tx: oneshot::Sender<Result<Option<PrefsDocument>>>,
    },
    SavePrefs {
        document: PrefsDocument,
        method: StorageMethod,
        response_tx: oneshot::Sender<Result<StorageMethod>>,
    },
    LoadPalette {
        game: String,
        response_tx: oneshot::Sender<Result<GamePalette>>,
    },
    SavePalette {
        palette: GamePalette,
        overwrite: bool,
        response_tx: oneshot::Sender<Result<bool>>,
    },
    ListMedia {
        response_tx: oneshot::Sender<Result<Vec<StorageMethod>>>,
    },
}
