// Background preview rendering with a small cache, polled by the UI loop

use crate::domain::DocumentRecord;
use crate::preview::{generate_preview, PreviewContent};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::debug;

const CACHE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub enum PreviewState {
    Loading,
    Ready(PreviewContent),
    Error(String),
}

/// Least-recently-used cache keyed by document location.
///
/// `generation` advances whenever entries are dropped on purpose; a render
/// started under an older generation must not repopulate the cache.
#[derive(Debug)]
struct PreviewCache {
    entries: HashMap<PathBuf, PreviewContent>,
    order: VecDeque<PathBuf>,
    capacity: usize,
    generation: u64,
}

impl PreviewCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            generation: 0,
        }
    }

    fn get(&mut self, location: &Path) -> Option<PreviewContent> {
        let content = self.entries.get(location)?.clone();
        self.touch(location);
        Some(content)
    }

    fn insert(&mut self, location: PathBuf, content: PreviewContent) {
        if self.entries.insert(location.clone(), content).is_some() {
            self.touch(&location);
            return;
        }
        self.order.push_back(location);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    /// Inserts only if nothing was invalidated since `generation` was read.
    fn insert_if_current(
        &mut self,
        generation: u64,
        location: PathBuf,
        content: PreviewContent,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.insert(location, content);
        true
    }

    fn remove(&mut self, location: &Path) {
        self.generation += 1;
        self.entries.remove(location);
        self.order.retain(|p| p != location);
    }

    fn touch(&mut self, location: &Path) {
        if let Some(pos) = self.order.iter().position(|p| p == location) {
            if let Some(path) = self.order.remove(pos) {
                self.order.push_back(path);
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.entries.clear();
        self.order.clear();
    }
}

/// Renders previews off the UI thread and hands results back on poll
pub struct SyncPreviewManager {
    runtime: Runtime,
    cache: Arc<Mutex<PreviewCache>>,
    current_location: Option<PathBuf>,
    current_state: PreviewState,
    receiver: Option<oneshot::Receiver<PreviewState>>,
}

impl SyncPreviewManager {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("docshelf-preview")
            .enable_time()
            .build()?;

        Ok(Self {
            runtime,
            cache: Arc::new(Mutex::new(PreviewCache::new(CACHE_SIZE))),
            current_location: None,
            current_state: PreviewState::Loading,
            receiver: None,
        })
    }

    /// Returns the preview state for `record`, starting a render the first
    /// time a location is requested. Never blocks on rendering.
    pub fn request_preview(&mut self, record: &DocumentRecord) -> &PreviewState {
        if self.current_location.as_deref() != Some(record.location.as_path()) {
            self.start(record);
        }

        if let Some(rx) = self.receiver.as_mut() {
            match rx.try_recv() {
                Ok(state) => {
                    self.current_state = state;
                    self.receiver = None;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.current_state = PreviewState::Error("Preview task ended".to_string());
                    self.receiver = None;
                }
            }
        }

        &self.current_state
    }

    fn start(&mut self, record: &DocumentRecord) {
        // Dropping the old receiver discards a stale render's result
        self.receiver = None;
        self.current_location = Some(record.location.clone());

        let (cached, generation) = {
            let mut cache = self.lock_cache();
            (cache.get(&record.location), cache.generation)
        };
        if let Some(cached) = cached {
            self.current_state = PreviewState::Ready(cached);
            return;
        }

        self.current_state = PreviewState::Loading;

        let (tx, rx) = oneshot::channel();
        let record = record.clone();
        let cache = Arc::clone(&self.cache);
        self.runtime.spawn(async move {
            let location = record.location.clone();
            let state = match tokio::task::spawn_blocking(move || generate_preview(&record)).await
            {
                Ok(Ok(content)) => {
                    if let Ok(mut cache) = cache.lock() {
                        if !cache.insert_if_current(generation, location, content.clone()) {
                            debug!("Discarding stale preview render");
                        }
                    }
                    PreviewState::Ready(content)
                }
                Ok(Err(e)) => PreviewState::Error(e.to_string()),
                Err(e) => PreviewState::Error(format!("Preview task failed: {}", e)),
            };
            // The UI may have moved on; nobody listening is fine
            let _ = tx.send(state);
        });
        self.receiver = Some(rx);
    }

    pub fn current_state(&self) -> &PreviewState {
        &self.current_state
    }

    /// Forgets the active document so the next request starts over
    pub fn reset(&mut self) {
        self.current_location = None;
        self.current_state = PreviewState::Loading;
        self.receiver = None;
    }

    /// Drops a cached preview, e.g. after the file changed on disk
    pub fn invalidate(&mut self, location: &Path) {
        self.lock_cache().remove(location);
        if self.current_location.as_deref() == Some(location) {
            self.reset();
        }
    }

    pub fn clear_cache(&mut self) {
        self.lock_cache().clear();
    }

    pub fn cache_size(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, PreviewCache> {
        // A panic while holding the lock only loses cache entries
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
