//! Owner operations on a portfolio's photos.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::observability::metrics;
use crate::profiles::store::{ObjectStorage, ProfileStore, StoreError};
use crate::profiles::types::{Photo, PhotoPatch};

pub const MAX_CAPTION_LEN: usize = 280;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Unknown photo, or one owned by another profile.
    #[error("photo {0} not found")]
    PhotoNotFound(Uuid),

    #[error("invalid photo order: {0}")]
    InvalidOrder(String),

    #[error("caption exceeds 280 characters")]
    CaptionTooLong,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Photo management for profile owners.
#[derive(Clone)]
pub struct PhotoCatalog {
    store: Arc<dyn ProfileStore>,
    objects: Arc<dyn ObjectStorage>,
}

impl PhotoCatalog {
    pub fn new(store: Arc<dyn ProfileStore>, objects: Arc<dyn ObjectStorage>) -> Self {
        Self { store, objects }
    }

    /// All photos of `owner` in display order, hidden ones included.
    pub async fn list(&self, owner: Uuid) -> Result<Vec<Photo>, CatalogError> {
        Ok(self.store.photos_for_profile(owner).await?)
    }

    /// Reorder the owner's photos. `ids` must list every photo exactly once;
    /// sort orders become 0..n-1 in the given order.
    pub async fn reorder(&self, owner: Uuid, ids: &[Uuid]) -> Result<Vec<Photo>, CatalogError> {
        let current = self.store.photos_for_profile(owner).await?;

        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
            return Err(CatalogError::InvalidOrder(format!("photo {} listed twice", dup)));
        }
        if let Some(foreign) = ids.iter().find(|id| !current.iter().any(|p| p.id == **id)) {
            return Err(CatalogError::PhotoNotFound(*foreign));
        }
        if ids.len() != current.len() {
            return Err(CatalogError::InvalidOrder(format!(
                "expected {} photos, got {}",
                current.len(),
                ids.len()
            )));
        }

        let patches: Vec<(Uuid, PhotoPatch)> = ids
            .iter()
            .zip(0..)
            .map(|(id, order)| {
                let patch = PhotoPatch {
                    sort_order: Some(order),
                    ..PhotoPatch::default()
                };
                (*id, patch)
            })
            .collect();

        let reordered = self.patch(owner, &patches).await?;
        metrics::record_catalog_op("reorder");
        tracing::info!(profile_id = %owner, photos = reordered.len(), "Photos reordered");
        Ok(reordered)
    }

    /// Change visibility and/or caption of one photo in a single write.
    /// `None` leaves a field as is; a blank caption clears it.
    pub async fn update_photo(
        &self,
        owner: Uuid,
        photo_id: Uuid,
        visible: Option<bool>,
        caption: Option<&str>,
    ) -> Result<Photo, CatalogError> {
        let caption = match caption.map(str::trim) {
            Some(c) if c.chars().count() > MAX_CAPTION_LEN => {
                return Err(CatalogError::CaptionTooLong)
            }
            Some(c) => Some((!c.is_empty()).then(|| c.to_string())),
            None => None,
        };
        let patch = PhotoPatch {
            is_visible: visible,
            caption,
            sort_order: None,
        };
        if patch.is_empty() {
            return self.owned_photo(owner, photo_id).await;
        }

        let photo = self
            .patch(owner, &[(photo_id, patch)])
            .await?
            .pop()
            .ok_or(CatalogError::PhotoNotFound(photo_id))?;
        metrics::record_catalog_op("update");
        Ok(photo)
    }

    pub async fn set_visibility(
        &self,
        owner: Uuid,
        photo_id: Uuid,
        visible: bool,
    ) -> Result<Photo, CatalogError> {
        self.update_photo(owner, photo_id, Some(visible), None).await
    }

    /// Set or clear a caption. Blank captions clear it.
    pub async fn update_caption(
        &self,
        owner: Uuid,
        photo_id: Uuid,
        caption: Option<&str>,
    ) -> Result<Photo, CatalogError> {
        // `None` clears, same as a blank caption.
        self.update_photo(owner, photo_id, None, Some(caption.unwrap_or("")))
            .await
    }

    /// Delete a photo. Removing the stored files is best effort.
    pub async fn delete(&self, owner: Uuid, photo_id: Uuid) -> Result<(), CatalogError> {
        self.owned_photo(owner, photo_id).await?;

        let Some(photo) = self.store.remove_photo(photo_id).await? else {
            return Err(CatalogError::PhotoNotFound(photo_id));
        };
        metrics::record_catalog_op("delete");

        for url in std::iter::once(&photo.url).chain(photo.thumbnail_url.as_ref()) {
            if let Err(e) = self.objects.delete_object(url).await {
                tracing::warn!(photo_id = %photo_id, url = %url, error = %e, "Failed to delete stored object");
            }
        }

        tracing::info!(profile_id = %owner, photo_id = %photo_id, "Photo deleted");
        Ok(())
    }

    async fn patch(
        &self,
        owner: Uuid,
        patches: &[(Uuid, PhotoPatch)],
    ) -> Result<Vec<Photo>, CatalogError> {
        self.store
            .update_photos(owner, patches)
            .await
            .map_err(|e| match e {
                StoreError::PhotoNotFound(id) => CatalogError::PhotoNotFound(id),
                other => CatalogError::Store(other),
            })
    }

    async fn owned_photo(&self, owner: Uuid, photo_id: Uuid) -> Result<Photo, CatalogError> {
        self.store
            .photos_for_profile(owner)
            .await?
            .into_iter()
            .find(|p| p.id == photo_id)
            .ok_or(CatalogError::PhotoNotFound(photo_id))
    }
}
