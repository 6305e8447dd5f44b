//! Movie operations.

use crate::domain::foundation::MovieId;
use crate::domain::movie::{Movie, NewMovie};
use crate::ports::DocumentStoreError;

use super::{RecordController, RecordError};

/// Values submitted from the "new movie" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecordCommand {
    pub title: String,
    pub release_date: i64,
    pub received_award: bool,
}

impl RecordController {
    /// Fetches the whole movie collection and replaces the cache with it.
    ///
    /// On failure the cache keeps its previous contents. Documents that do
    /// not decode as movies are skipped.
    pub async fn list_records(&self) -> Result<Vec<Movie>, RecordError> {
        let collection = &self.locations.movies_collection;
        tracing::debug!(collection = %collection, "Listing movies");

        let documents = self.documents.list_all(collection).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list movies");
            RecordError::from(e)
        })?;

        let movies: Vec<Movie> = documents
            .iter()
            .filter_map(|doc| match Movie::from_document(&doc.id, &doc.fields) {
                Ok(movie) => Some(movie),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed movie document");
                    None
                }
            })
            .collect();

        *self.movies.write().await = movies.clone();
        Ok(movies)
    }

    /// Inserts a movie owned by the signed-in user, then re-lists.
    ///
    /// Without a session the user is told to log in and nothing is sent to
    /// the store.
    pub async fn create_record(&self, cmd: CreateRecordCommand) -> Result<MovieId, RecordError> {
        let session = self.require_session("Please log in to submit a movie.")?;

        let new_movie = NewMovie {
            title: cmd.title,
            release_date: cmd.release_date,
            received_award: cmd.received_award,
            owner_id: session.user_id,
        };

        let id = self
            .documents
            .insert(&self.locations.movies_collection, new_movie.into_fields())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create movie");
                RecordError::from(e)
            })?;
        let id = MovieId::new(id)
            .map_err(|e| RecordError::Document(DocumentStoreError::InvalidResponse(e.to_string())))?;
        tracing::info!(movie_id = %id, "Movie created");

        self.refresh_records().await;
        Ok(id)
    }

    /// Deletes a movie by id, then re-lists.
    ///
    /// Ownership is not checked here; the store's rules apply.
    pub async fn delete_record(&self, id: &MovieId) -> Result<(), RecordError> {
        self.documents
            .delete(&self.locations.movies_collection, id.as_str())
            .await
            .map_err(|e| {
                tracing::error!(movie_id = %id, error = %e, "Failed to delete movie");
                RecordError::from(e)
            })?;
        tracing::info!(movie_id = %id, "Movie deleted");

        self.refresh_records().await;
        Ok(())
    }

    /// Overwrites only the title of a movie, then re-lists.
    pub async fn update_record_title(
        &self,
        id: &MovieId,
        new_title: impl Into<String>,
    ) -> Result<(), RecordError> {
        self.documents
            .update_fields(
                &self.locations.movies_collection,
                id.as_str(),
                Movie::title_update(new_title),
            )
            .await
            .map_err(|e| {
                tracing::error!(movie_id = %id, error = %e, "Failed to update movie title");
                RecordError::from(e)
            })?;
        tracing::info!(movie_id = %id, "Movie title updated");

        self.refresh_records().await;
        Ok(())
    }

    /// Re-lists after a mutation. A failed listing is already logged.
    async fn refresh_records(&self) {
        let _ = self.list_records().await;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixture, test_user_id};
    use super::*;
    use crate::domain::movie::Fields;
    use crate::ports::{DocumentStore, Notice};
    use serde_json::json;

    fn inception() -> CreateRecordCommand {
        CreateRecordCommand {
            title: "Inception".to_string(),
            release_date: 2010,
            received_award: true,
        }
    }

    #[tokio::test]
    async fn create_without_session_makes_no_store_call() {
        let f = fixture(false);

        let result = f.controller.create_record(inception()).await;

        assert!(matches!(result, Err(RecordError::NotSignedIn)));
        assert_eq!(f.documents.call_count(), 0);
        assert!(f.controller.movies().await.is_empty());
        assert_eq!(
            f.notifier.drain(),
            vec![Notice::info("Please log in to submit a movie.")]
        );
    }

    #[tokio::test]
    async fn create_inserts_owned_movie_and_relists() {
        let f = fixture(true);

        let id = f.controller.create_record(inception()).await.unwrap();

        let movies = f.controller.movies().await;
        assert_eq!(movies.len(), 1);
        let movie = &movies[0];
        assert_eq!(movie.id, id);
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.release_date, 2010);
        assert!(movie.received_award);
        assert_eq!(movie.owner_id, Some(test_user_id()));
        // insert + list
        assert_eq!(f.documents.call_count(), 2);
        assert!(f.notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn failed_insert_leaves_cache_and_notifies_nobody() {
        let f = fixture(true);
        f.controller.create_record(inception()).await.unwrap();
        f.documents
            .fail_with(DocumentStoreError::PermissionDenied("rules".to_string()));

        let result = f.controller.create_record(inception()).await;

        assert!(matches!(result, Err(RecordError::Document(_))));
        assert_eq!(f.controller.movies().await.len(), 1);
        assert!(f.notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn failed_listing_keeps_stale_cache() {
        let f = fixture(true);
        f.controller.create_record(inception()).await.unwrap();
        f.documents
            .fail_with(DocumentStoreError::Unavailable("offline".to_string()));

        assert!(f.controller.list_records().await.is_err());
        assert_eq!(f.controller.movies().await.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_movie_from_listing() {
        let f = fixture(true);
        let keep = f.controller.create_record(inception()).await.unwrap();
        let gone = f.controller.create_record(inception()).await.unwrap();

        f.controller.delete_record(&gone).await.unwrap();

        let ids: Vec<MovieId> = f.controller.movies().await.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_succeeds() {
        let f = fixture(false);
        let id = MovieId::new("does-not-exist").unwrap();
        assert!(f.controller.delete_record(&id).await.is_ok());
    }

    #[tokio::test]
    async fn update_title_changes_only_title() {
        let f = fixture(true);
        let id = f.controller.create_record(inception()).await.unwrap();
        let before = f.controller.movies().await[0].clone();

        f.controller.update_record_title(&id, "X").await.unwrap();

        let after = f.controller.movies().await[0].clone();
        assert_eq!(after.title, "X");
        assert_eq!(after.id, before.id);
        assert_eq!(after.release_date, before.release_date);
        assert_eq!(after.received_award, before.received_award);
        assert_eq!(after.owner_id, before.owner_id);
    }

    #[tokio::test]
    async fn update_title_of_missing_movie_fails() {
        let f = fixture(true);
        let id = MovieId::new("missing").unwrap();

        let result = f.controller.update_record_title(&id, "X").await;

        assert!(matches!(
            result,
            Err(RecordError::Document(DocumentStoreError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn listing_skips_documents_that_are_not_movies() {
        let f = fixture(true);
        let mut bad = Fields::new();
        bad.insert("title".to_string(), json!(["not", "a", "string"]));
        f.documents.insert("movies", bad).await.unwrap();
        f.controller.create_record(inception()).await.unwrap();

        let movies = f.controller.list_records().await.unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Inception");
    }
}
