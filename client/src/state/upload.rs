//! File upload batch state and the sequential upload loop.
//!
//! DESIGN
//! ======
//! Files in a batch upload one after another; the first failure stops the
//! batch and already-uploaded files stay on the backend. The loop is generic
//! over the per-file call so it runs without a browser in tests.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use std::future::Future;

/// Alert text when a batch fails.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload file";

/// Notice shown after a fully successful batch.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Presentation flags for the upload widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadState {
    pub uploading: bool,
    pub drag_over: bool,
}

/// Result of an upload batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome<E> {
    /// Every file uploaded.
    Completed { uploaded: usize },
    /// File at `index` failed; files after it were not attempted.
    Failed { index: usize, uploaded: usize, error: E },
    /// The batch was empty.
    Empty,
}

impl<E> UploadOutcome<E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Upload `files` in order with `upload`, stopping at the first error.
pub async fn upload_sequentially<F, T, Fut, E>(files: Vec<F>, mut upload: impl FnMut(F) -> Fut) -> UploadOutcome<E>
where
    Fut: Future<Output = Result<T, E>>,
{
    if files.is_empty() {
        return UploadOutcome::Empty;
    }
    let mut uploaded = 0;
    for (index, file) in files.into_iter().enumerate() {
        if let Err(error) = upload(file).await {
            return UploadOutcome::Failed { index, uploaded, error };
        }
        uploaded += 1;
    }
    UploadOutcome::Completed { uploaded }
}
