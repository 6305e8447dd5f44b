//! File operations.

use futures::future::try_join_all;

use crate::domain::file::{object_path, BlobEntry, FileUpload};

use super::{RecordController, RecordError};

impl RecordController {
    /// Lists the files under the upload prefix with fresh download URLs.
    ///
    /// URLs are resolved concurrently and joined all-or-nothing: if any
    /// single resolution fails the whole listing fails and the cache keeps
    /// its previous contents.
    pub async fn list_blobs(&self) -> Result<Vec<BlobEntry>, RecordError> {
        let prefix = &self.locations.files_prefix;
        tracing::debug!(prefix = %prefix, "Listing files");

        let listed = self.blobs.list_under_prefix(prefix).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list files");
            RecordError::from(e)
        })?;

        let entries = try_join_all(listed.into_iter().map(|blob| async move {
            let download_url = self.blobs.resolve_url(&blob.path).await?;
            Ok::<_, RecordError>(BlobEntry {
                name: blob.name,
                download_url,
            })
        }))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to resolve file download URLs");
            e
        })?;

        *self.files.write().await = entries.clone();
        Ok(entries)
    }

    /// Uploads the selected file under its own name, then re-lists.
    ///
    /// Without a session the user is told to log in. With no file selected
    /// this does nothing. An existing file with the same name is replaced.
    pub async fn upload_blob(&self, file: Option<FileUpload>) -> Result<(), RecordError> {
        self.require_session("Please log in to upload files.")?;

        let Some(file) = file else {
            tracing::debug!("Upload requested with no file selected");
            return Ok(());
        };

        let path = object_path(&self.locations.files_prefix, file.name());
        self.blobs
            .upload(&path, file.bytes(), file.content_type())
            .await
            .map_err(|e| {
                tracing::error!(path = %path, error = %e, "Failed to upload file");
                RecordError::from(e)
            })?;
        tracing::info!(path = %path, bytes = file.bytes().len(), "File uploaded");

        self.refresh_blobs().await;
        Ok(())
    }

    /// Deletes a file by name, then re-lists.
    pub async fn delete_blob(&self, name: &str) -> Result<(), RecordError> {
        let path = object_path(&self.locations.files_prefix, name);
        self.blobs.delete(&path).await.map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to delete file");
            RecordError::from(e)
        })?;
        tracing::info!(path = %path, "File deleted");

        self.refresh_blobs().await;
        Ok(())
    }

    /// Re-lists after a mutation. A failed listing is already logged.
    async fn refresh_blobs(&self) {
        let _ = self.list_blobs().await;
    }
}
