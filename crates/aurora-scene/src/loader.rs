//! Asynchronous texture loading with one-shot, poll-based completion.
//!
//! [`TextureLoader::load`] never blocks: it hands back a [`TextureRequest`]
//! that the owner polls once per frame. The producing side holds a
//! [`TextureCompleter`]; completing after the request was dropped is a silent
//! no-op, so loads that outlive their owner need no cancellation.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::texture::{Texture, TextureError, TextureHandle};

/// Outcome delivered to a [`TextureRequest`].
pub type LoadResult = Result<TextureHandle, TextureError>;

/// Anything that can start loading a texture by URL.
pub trait TextureLoader {
    /// Start loading `url`. Must not block.
    fn load(&self, url: &str) -> TextureRequest;
}

/// Receiving half of a single texture load.
#[derive(Debug)]
pub struct TextureRequest {
    url: String,
    receiver: Receiver<LoadResult>,
}

/// Producing half of a single texture load. Consumed on completion.
#[derive(Debug)]
pub struct TextureCompleter {
    url: String,
    sender: Sender<LoadResult>,
}

/// Non-blocking view of a [`TextureRequest`].
#[derive(Debug)]
pub enum RequestStatus {
    /// Still loading.
    Pending,
    /// Finished, successfully or not. Reported exactly once.
    Ready(LoadResult),
    /// The producer went away without completing.
    Abandoned,
}

impl TextureRequest {
    /// Create a linked request/completer pair for `url`.
    pub fn channel(url: impl Into<String>) -> (TextureCompleter, TextureRequest) {
        let url = url.into();
        let (sender, receiver) = crossbeam_channel::bounded(1);
        (
            TextureCompleter {
                url: url.clone(),
                sender,
            },
            TextureRequest { url, receiver },
        )
    }

    /// A request that is already finished with `result`.
    pub fn ready(url: impl Into<String>, result: LoadResult) -> TextureRequest {
        let (completer, request) = Self::channel(url);
        completer.complete(result);
        request
    }

    /// URL this request was issued for.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check for completion without blocking.
    pub fn poll(&self) -> RequestStatus {
        match self.receiver.try_recv() {
            Ok(result) => RequestStatus::Ready(result),
            Err(TryRecvError::Empty) => RequestStatus::Pending,
            Err(TryRecvError::Disconnected) => RequestStatus::Abandoned,
        }
    }
}

impl TextureCompleter {
    /// URL the matching request was issued for.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deliver the result. Returns `false` if the requester is gone.
    pub fn complete(self, result: LoadResult) -> bool {
        self.sender.send(result).is_ok()
    }
}

struct LoadJob {
    path: PathBuf,
    completer: TextureCompleter,
}

/// Loads textures from disk on a pool of worker threads.
///
/// URLs are resolved relative to the asset root. Decoding happens on the
/// workers, so the frame thread only ever polls.
pub struct ThreadedTextureLoader {
    root: PathBuf,
    job_sender: Option<Sender<LoadJob>>,
    worker_handles: Vec<JoinHandle<()>>,
}

impl ThreadedTextureLoader {
    /// Spawn `worker_count` loader threads (at least one) reading from `root`.
    pub fn new(root: impl Into<PathBuf>, worker_count: usize) -> Self {
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<LoadJob>();
        let worker_count = worker_count.max(1);

        let mut handles = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let rx = job_rx.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("texture-loader-{index}"))
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        let url = job.completer.url().to_string();
                        let result = read_texture(&job.path, &url).map(Arc::new);
                        if let Err(err) = &result {
                            log::warn!("Texture {url} failed to load: {err}");
                        }
                        if !job.completer.complete(result) {
                            log::debug!("Texture {url} finished after its requester was dropped");
                        }
                    }
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => log::error!("Failed to spawn texture loader thread: {err}"),
            }
        }

        Self {
            root: root.into(),
            job_sender: (!handles.is_empty()).then_some(job_tx),
            worker_handles: handles,
        }
    }

    /// Asset root URLs are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stop accepting work and join the workers after they drain the queue.
    pub fn shutdown(&mut self) {
        self.job_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl TextureLoader for ThreadedTextureLoader {
    fn load(&self, url: &str) -> TextureRequest {
        let (completer, request) = TextureRequest::channel(url);
        let Some(sender) = &self.job_sender else {
            completer.complete(Err(TextureError::LoaderShutDown));
            return request;
        };

        let job = LoadJob {
            path: self.root.join(url),
            completer,
        };
        if let Err(rejected) = sender.send(job) {
            rejected.0.completer.complete(Err(TextureError::LoaderShutDown));
        } else {
            log::debug!("Queued texture {url}");
        }
        request
    }
}

impl Drop for ThreadedTextureLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn read_texture(path: &Path, label: &str) -> Result<Texture, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Texture::decode(label, &bytes)
}

/// Loader whose requests are completed explicitly by its owner.
///
/// Useful when frames are stepped deterministically (headless runs, tests):
/// requests queue up until [`complete_next`](Self::complete_next) or
/// [`complete_all`](Self::complete_all) resolves them.
#[derive(Default)]
pub struct QueuedTextureLoader {
    queue: RefCell<VecDeque<TextureCompleter>>,
}

impl QueuedTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests waiting for completion.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// URLs of the waiting requests, oldest first.
    pub fn pending_urls(&self) -> Vec<String> {
        self.queue
            .borrow()
            .iter()
            .map(|c| c.url().to_string())
            .collect()
    }

    /// Resolve the oldest request. `None` if nothing is queued, otherwise
    /// whether the requester was still alive.
    pub fn complete_next(&self, result: LoadResult) -> Option<bool> {
        let completer = self.queue.borrow_mut().pop_front()?;
        Some(completer.complete(result))
    }

    /// Resolve every queued request with `produce(url)`. Returns how many
    /// requesters were still alive to receive it.
    pub fn complete_all(&self, mut produce: impl FnMut(&str) -> LoadResult) -> usize {
        let drained: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        drained
            .into_iter()
            .map(|completer| {
                let result = produce(completer.url());
                completer.complete(result)
            })
            .filter(|delivered| *delivered)
            .count()
    }
}

impl TextureLoader for QueuedTextureLoader {
    fn load(&self, url: &str) -> TextureRequest {
        let (completer, request) = TextureRequest::channel(url);
        self.queue.borrow_mut().push_back(completer);
        request
    }
}
