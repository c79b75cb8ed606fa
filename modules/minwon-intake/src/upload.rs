//! Upload collaborator interface.
//!
//! Storage of uploaded files lives outside this crate; intake only needs
//! the path reference that comes back. An upload failure drops the image
//! reference, never the complaint.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

/// A file submitted alongside a complaint.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Stores an uploaded file and returns the path reference to record on
/// the complaint.
#[async_trait]
pub trait UploadService: Send + Sync {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}

/// In-memory upload store for testing. Can be flipped into a failing mode
/// to exercise the absorb-and-continue path.
pub struct MemoryUploadStore {
    path_prefix: String,
    failing: AtomicBool,
    stored: Mutex<Vec<String>>,
}

impl MemoryUploadStore {
    pub fn new(path_prefix: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            failing: AtomicBool::new(false),
            stored: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_uploads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Paths handed out so far (for test assertions).
    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadService for MemoryUploadStore {
    async fn store(&self, file_name: &str, _bytes: &[u8]) -> Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("upload failure injected");
        }
        let path = format!("{}/{}", self.path_prefix, file_name);
        self.stored.lock().unwrap().push(path.clone());
        Ok(path)
    }
}
