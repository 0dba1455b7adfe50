//! Profiles, photos and the public projection.
//!
//! # Data Flow
//! ```text
//! /{username} request
//!     → resolver.rs (username → Profile, visibility gate)
//!     → store.rs (profile + ordered photos)
//!     → PublicProfile / CompCard (types.rs)
//!
//! /api/photos request
//!     → catalog.rs (ownership check, ordering rules)
//!     → store.rs (write), ObjectStorage (best-effort cleanup)
//! ```

pub mod catalog;
pub mod onboarding;
pub mod resolver;
pub mod store;
pub mod types;
pub mod username;

pub use catalog::{CatalogError, PhotoCatalog};
pub use resolver::{ProfileResolver, ResolveError, DEFAULT_TEMPLATE};
pub use store::{InMemoryProfileStore, LoggingObjectStorage, ObjectStorage, ProfileStore, Seed, StoreError};
pub use types::{CompCard, Photo, PhotoPatch, Profile, PublicPhoto, PublicProfile};
