//! FoodService: ties an image upload to the catalog record that references it.
//!
//! `add_food` is strictly sequential: validate, upload to the object store,
//! then persist. Nothing is written before validation passes, and the record
//! is only saved once the upload succeeded. A failed save leaves the uploaded
//! object behind; there is no compensating delete.

use crate::{
    models::food::{FoodEntity, FoodRequest, FoodResponse},
    services::{
        food_repository::{FoodRepository, RepositoryError},
        object_store::{ObjectStore, ObjectStoreError, Visibility, public_url},
    },
};
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum FoodError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("food `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ObjectStoreError> for FoodError {
    fn from(err: ObjectStoreError) -> Self {
        FoodError::Upload(err.to_string())
    }
}

pub type FoodResult<T> = Result<T, FoodError>;

/// An uploaded image as received from the client.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    /// Only used to derive the storage key's extension.
    pub filename: String,
}

/// Where images go and how their public URLs are formed.
#[derive(Clone, Debug)]
pub struct StorageTarget {
    pub bucket: String,
    pub domain: String,
}

#[derive(Clone)]
pub struct FoodService {
    object_store: Arc<dyn ObjectStore>,
    repository: Arc<dyn FoodRepository>,
    target: StorageTarget,
}

impl FoodService {
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        repository: Arc<dyn FoodRepository>,
        target: StorageTarget,
    ) -> Self {
        Self {
            object_store,
            repository,
            target,
        }
    }

    pub fn repository(&self) -> &Arc<dyn FoodRepository> {
        &self.repository
    }

    /// Upload the image and return its public URL.
    pub async fn upload_file(&self, upload: ImageUpload) -> FoodResult<String> {
        if upload.bytes.is_empty() {
            return Err(FoodError::InvalidInput("file must not be empty".into()));
        }
        let key = storage_key(&upload.filename)?;

        self.object_store
            .put_object(
                &self.target.bucket,
                &key,
                upload.bytes,
                upload.content_type.as_deref(),
                Visibility::PublicRead,
            )
            .await?;

        let url = public_url(&self.target.bucket, &self.target.domain, &key);
        info!(bucket = %self.target.bucket, key = %key, "image uploaded");
        Ok(url)
    }

    /// Upload the image, then persist a record pointing at it.
    pub async fn add_food(
        &self,
        request: FoodRequest,
        upload: ImageUpload,
    ) -> FoodResult<FoodResponse> {
        request.validate().map_err(FoodError::InvalidInput)?;

        let image_url = self.upload_file(upload).await?;
        let entity = FoodEntity::from_request(request, image_url.clone());

        let saved = match self.repository.save(entity).await {
            Ok(saved) => saved,
            Err(err) => {
                warn!(
                    error = %err,
                    image_url = %image_url,
                    "failed to persist food; uploaded image is now orphaned"
                );
                return Err(err.into());
            }
        };

        info!(id = ?saved.id, name = %saved.name, "food added");
        Ok(FoodResponse::from(saved))
    }

    pub async fn read_foods(&self) -> FoodResult<Vec<FoodResponse>> {
        let foods = self.repository.find_all().await?;
        Ok(foods.into_iter().map(FoodResponse::from).collect())
    }

    pub async fn get_food_by_id(&self, id: &str) -> FoodResult<FoodResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .map(FoodResponse::from)
            .ok_or_else(|| FoodError::NotFound(id.to_string()))
    }
}

/// Fresh storage key: a random UUID plus the lower-cased extension of
/// `filename` (text after the last `.`, ASCII letters and digits only).
pub fn storage_key(filename: &str) -> FoodResult<String> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| {
            FoodError::InvalidInput(format!("filename `{}` has no extension", filename))
        })?;

    if !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FoodError::InvalidInput(format!(
            "filename `{}` has an invalid extension",
            filename
        )));
    }

    Ok(format!("{}.{}", Uuid::new_v4(), extension.to_lowercase()))
}
