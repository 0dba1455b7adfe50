//! Profile and photo storage.
//!
//! The production data store is a managed database reached over the
//! network; `ProfileStore` is the seam. `InMemoryProfileStore` backs local
//! runs and tests and can be seeded from a JSON fixture.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::profiles::types::{Photo, PhotoPatch, Profile};
use crate::profiles::username::normalize_username;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or answered with an error.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A photo is missing or belongs to another profile.
    #[error("photo {0} not found")]
    PhotoNotFound(Uuid),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("failed to read seed file '{path}': {source}")]
    SeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed file '{path}': {source}")]
    SeedFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and write access to profiles and photos.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look a profile up by its (already lower-cased) username.
    async fn profile_by_username(&self, username: &str) -> StoreResult<Option<Profile>>;

    async fn profile_by_id(&self, id: Uuid) -> StoreResult<Option<Profile>>;

    /// All photos of a profile, ordered by `sort_order` ascending, ties by id.
    async fn photos_for_profile(&self, profile_id: Uuid) -> StoreResult<Vec<Photo>>;

    /// Insert or replace photos.
    async fn upsert_photos(&self, photos: &[Photo]) -> StoreResult<()>;

    /// Apply field-level patches to photos of `owner` as one write and
    /// return the patched photos in input order. Fields a patch leaves unset
    /// keep their stored value. If any photo is missing or not owned by
    /// `owner`, nothing is written and `PhotoNotFound` is returned.
    async fn update_photos(
        &self,
        owner: Uuid,
        patches: &[(Uuid, PhotoPatch)],
    ) -> StoreResult<Vec<Photo>>;

    /// Remove a photo, returning it if it existed.
    async fn remove_photo(&self, photo_id: Uuid) -> StoreResult<Option<Photo>>;
}

/// Backing object storage for photo files.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn delete_object(&self, url: &str) -> StoreResult<()>;
}

/// Object storage that only logs deletions. Used when no bucket is wired.
#[derive(Debug, Default, Clone)]
pub struct LoggingObjectStorage;

#[async_trait]
impl ObjectStorage for LoggingObjectStorage {
    async fn delete_object(&self, url: &str) -> StoreResult<()> {
        tracing::debug!(url = %url, "Object deletion requested");
        Ok(())
    }
}

/// Session entry in a seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSession {
    pub token: String,
    pub profile_id: Uuid,
}

/// Contents of a JSON seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub profiles: Vec<Profile>,
    pub photos: Vec<Photo>,
    pub sessions: Vec<SeedSession>,
}

impl Seed {
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|source| StoreError::SeedIo {
            path: display.clone(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::SeedFormat {
            path: display,
            source,
        })
    }
}

/// A thread-safe in-memory profile store.
#[derive(Debug)]
pub struct InMemoryProfileStore {
    profiles: DashMap<Uuid, Profile>,
    /// username -> profile id
    usernames: DashMap<String, Uuid>,
    photos: DashMap<Uuid, Photo>,
    /// Serializes photo writes so a multi-photo patch is applied as a unit.
    photo_writes: Mutex<()>,
    available: AtomicBool,
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
            usernames: DashMap::new(),
            photos: DashMap::new(),
            photo_writes: Mutex::new(()),
            available: AtomicBool::new(true),
        }
    }

    /// Build a store from seed data.
    pub fn from_seed(seed: &Seed) -> StoreResult<Self> {
        let store = Self::new();
        for profile in &seed.profiles {
            store.insert_profile(profile.clone())?;
        }
        for photo in &seed.photos {
            if !store.profiles.contains_key(&photo.profile_id) {
                return Err(StoreError::Conflict(format!(
                    "photo {} references unknown profile {}",
                    photo.id, photo.profile_id
                )));
            }
            store.photos.insert(photo.id, photo.clone());
        }
        tracing::info!(
            profiles = store.profiles.len(),
            photos = store.photos.len(),
            "Loaded profile seed"
        );
        Ok(store)
    }

    /// Insert or replace a profile. The username is lower-cased and must
    /// not belong to another profile.
    pub fn insert_profile(&self, mut profile: Profile) -> StoreResult<()> {
        profile.username = profile.username.as_deref().map(normalize_username);

        if let Some(username) = &profile.username {
            if let Some(owner) = self.usernames.get(username) {
                if *owner != profile.id {
                    return Err(StoreError::Conflict(format!(
                        "username '{}' is already taken",
                        username
                    )));
                }
            }
        }

        if let Some(previous) = self.profiles.get(&profile.id).and_then(|p| p.username.clone()) {
            self.usernames.remove(&previous);
        }
        if let Some(username) = &profile.username {
            self.usernames.insert(username.clone(), profile.id);
        }
        self.profiles.insert(profile.id, profile);
        Ok(())
    }

    /// Simulate an outage of the backing store.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.photo_writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store marked unavailable".into()))
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn profile_by_username(&self, username: &str) -> StoreResult<Option<Profile>> {
        self.check_available()?;
        let Some(id) = self.usernames.get(username).map(|r| *r.value()) else {
            return Ok(None);
        };
        Ok(self.profiles.get(&id).map(|r| r.value().clone()))
    }

    async fn profile_by_id(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        self.check_available()?;
        Ok(self.profiles.get(&id).map(|r| r.value().clone()))
    }

    async fn photos_for_profile(&self, profile_id: Uuid) -> StoreResult<Vec<Photo>> {
        self.check_available()?;
        let mut photos: Vec<Photo> = self
            .photos
            .iter()
            .filter(|r| r.value().profile_id == profile_id)
            .map(|r| r.value().clone())
            .collect();
        photos.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)));
        Ok(photos)
    }

    async fn upsert_photos(&self, photos: &[Photo]) -> StoreResult<()> {
        self.check_available()?;
        let _writes = self.write_guard();
        for photo in photos {
            self.photos.insert(photo.id, photo.clone());
        }
        Ok(())
    }

    async fn update_photos(
        &self,
        owner: Uuid,
        patches: &[(Uuid, PhotoPatch)],
    ) -> StoreResult<Vec<Photo>> {
        self.check_available()?;
        let _writes = self.write_guard();

        if let Some((missing, _)) = patches.iter().find(|(id, _)| {
            !self
                .photos
                .get(id)
                .is_some_and(|photo| photo.profile_id == owner)
        }) {
            return Err(StoreError::PhotoNotFound(*missing));
        }

        let mut updated = Vec::with_capacity(patches.len());
        for (id, patch) in patches {
            if let Some(mut photo) = self.photos.get_mut(id) {
                patch.apply(photo.value_mut());
                updated.push(photo.value().clone());
            }
        }
        Ok(updated)
    }

    async fn remove_photo(&self, photo_id: Uuid) -> StoreResult<Option<Photo>> {
        self.check_available()?;
        let _writes = self.write_guard();
        Ok(self.photos.remove(&photo_id).map(|(_, photo)| photo))
    }
}
