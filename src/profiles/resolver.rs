//! Public profile resolution.
//!
//! # Responsibilities
//! - Look a profile up by username (case-normalized)
//! - Gate private profiles: owners preview, everyone else gets NotFound
//! - Assemble the projection from visible photos in display order
//!
//! # Design Decisions
//! - "Does not exist" and "exists but private" are the same outcome
//! - Store failures are `Unavailable`, never a partial projection
//! - The projection is a per-request snapshot; nothing is cached

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::observability::metrics;
use crate::profiles::store::{ProfileStore, StoreError};
use crate::profiles::types::{CompCard, OwnerPreview, Photo, Profile, PublicPhoto, PublicProfile};
use crate::profiles::username::normalize_username;
use crate::session::Viewer;

/// Template used when a profile has not picked one.
pub const DEFAULT_TEMPLATE: &str = "classic";

/// Photos shown on a comp card.
pub const COMP_CARD_PHOTOS: usize = 4;

const PRIVATE_BANNER: &str = "Your portfolio is private. Only you can see this page.";

#[derive(Debug, Error)]
pub enum ResolveError {
    /// No such profile, or a private one viewed by someone else.
    #[error("profile not found")]
    NotFound,

    #[error("profile store unavailable: {0}")]
    Unavailable(#[source] StoreError),
}

impl ResolveError {
    fn outcome(&self) -> &'static str {
        match self {
            ResolveError::NotFound => "not_found",
            ResolveError::Unavailable(_) => "unavailable",
        }
    }
}

/// Template id for a profile, falling back to [`DEFAULT_TEMPLATE`].
pub fn template_for(profile: &Profile) -> String {
    profile
        .selected_template
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TEMPLATE)
        .to_string()
}

/// Visible photos in display order. Input order is not trusted.
pub fn visible_photos(photos: &[Photo]) -> Vec<PublicPhoto> {
    let mut visible: Vec<&Photo> = photos.iter().filter(|p| p.is_visible).collect();
    visible.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)));
    visible.into_iter().map(PublicPhoto::from).collect()
}

/// Build the projection for an already-authorized viewer.
pub fn project(profile: Profile, photos: &[Photo], is_owner: bool) -> PublicProfile {
    let owner_preview = is_owner.then(|| OwnerPreview {
        is_public: profile.is_public,
        banner: (!profile.is_public).then(|| PRIVATE_BANNER.to_string()),
    });
    let template = template_for(&profile);

    PublicProfile {
        username: profile.username.unwrap_or_default(),
        display_name: profile.display_name,
        bio: profile.bio,
        avatar_url: profile.avatar_url,
        agency: profile.agency,
        template,
        measurements: profile.measurements,
        socials: profile.socials,
        photos: visible_photos(photos),
        owner_preview,
    }
}

/// Resolves usernames to public projections.
#[derive(Clone)]
pub struct ProfileResolver {
    store: Arc<dyn ProfileStore>,
}

impl ProfileResolver {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Resolve `username` as seen by `viewer`.
    pub async fn resolve(
        &self,
        username: &str,
        viewer: &Viewer,
    ) -> Result<PublicProfile, ResolveError> {
        let start = Instant::now();
        let result = self.resolve_inner(username, viewer).await;

        match &result {
            Ok(projection) => {
                let outcome = if projection.owner_preview.is_some() { "owner" } else { "public" };
                metrics::record_resolution(outcome, start);
            }
            Err(e) => {
                if let ResolveError::Unavailable(source) = e {
                    tracing::error!(username = %username, error = %source, "Profile store failure");
                }
                metrics::record_resolution(e.outcome(), start);
            }
        }

        result
    }

    /// The comp card for `username`, under the same visibility rules.
    pub async fn comp_card(&self, username: &str, viewer: &Viewer) -> Result<CompCard, ResolveError> {
        self.resolve(username, viewer).await.map(CompCard::from)
    }

    async fn resolve_inner(
        &self,
        username: &str,
        viewer: &Viewer,
    ) -> Result<PublicProfile, ResolveError> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(ResolveError::NotFound);
        }

        let profile = self
            .store
            .profile_by_username(&username)
            .await
            .map_err(ResolveError::Unavailable)?
            .ok_or(ResolveError::NotFound)?;

        let is_owner = viewer.owns(&profile);
        if !profile.is_public && !is_owner {
            return Err(ResolveError::NotFound);
        }

        let photos = self
            .store
            .photos_for_profile(profile.id)
            .await
            .map_err(ResolveError::Unavailable)?;

        Ok(project(profile, &photos, is_owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::store::InMemoryProfileStore;
    use uuid::Uuid;

    fn setup(is_public: bool) -> (Arc<InMemoryProfileStore>, Profile) {
        let store = Arc::new(InMemoryProfileStore::new());
        let mut profile = Profile::new(Uuid::new_v4());
        profile.username = Some("jane".into());
        profile.display_name = Some("Jane Doe".into());
        profile.is_public = is_public;
        profile.onboarding_completed = true;
        store.insert_profile(profile.clone()).unwrap();
        (store, profile)
    }

    async fn add_photos(store: &InMemoryProfileStore, owner: Uuid, layout: &[(i32, bool)]) {
        let photos: Vec<Photo> = layout
            .iter()
            .map(|(order, visible)| {
                let mut p = Photo::new(owner, format!("{}.jpg", order), *order);
                p.is_visible = *visible;
                p
            })
            .collect();
        store.upsert_photos(&photos).await.unwrap();
    }

    #[tokio::test]
    async fn test_visible_photos_in_order() {
        let (store, profile) = setup(true);
        add_photos(&store, profile.id, &[(2, true), (0, false), (1, true)]).await;

        let resolver = ProfileResolver::new(store);
        let projection = resolver.resolve("jane", &Viewer::Anonymous).await.unwrap();

        let orders: Vec<i32> = projection.photos.iter().map(|p| p.sort_order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert!(projection.owner_preview.is_none());
    }

    #[tokio::test]
    async fn test_private_profile_hidden_from_visitors() {
        let (store, _) = setup(false);
        let resolver = ProfileResolver::new(store);

        let anonymous = resolver.resolve("jane", &Viewer::Anonymous).await;
        assert!(matches!(anonymous, Err(ResolveError::NotFound)));

        let stranger = Viewer::Signed { profile_id: Uuid::new_v4() };
        assert!(matches!(
            resolver.resolve("jane", &stranger).await,
            Err(ResolveError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_owner_previews_private_profile() {
        let (store, profile) = setup(false);
        add_photos(&store, profile.id, &[(0, true), (1, false)]).await;
        let resolver = ProfileResolver::new(store);

        let owner = Viewer::Signed { profile_id: profile.id };
        let projection = resolver.resolve("jane", &owner).await.unwrap();

        let preview = projection.owner_preview.unwrap();
        assert!(!preview.is_public);
        assert!(preview.banner.is_some());
        assert_eq!(projection.photos.len(), 1);
    }

    #[tokio::test]
    async fn test_owner_of_public_profile_has_no_banner() {
        let (store, profile) = setup(true);
        let resolver = ProfileResolver::new(store);

        let owner = Viewer::Signed { profile_id: profile.id };
        let preview = resolver.resolve("jane", &owner).await.unwrap().owner_preview.unwrap();
        assert!(preview.is_public);
        assert!(preview.banner.is_none());
    }

    #[tokio::test]
    async fn test_username_case_insensitive() {
        let (store, _) = setup(true);
        let resolver = ProfileResolver::new(store);
        let projection = resolver.resolve("JANE", &Viewer::Anonymous).await.unwrap();
        assert_eq!(projection.username, "jane");
    }

    #[tokio::test]
    async fn test_missing_profile() {
        let (store, _) = setup(true);
        let resolver = ProfileResolver::new(store);
        assert!(matches!(
            resolver.resolve("nobody", &Viewer::Anonymous).await,
            Err(ResolveError::NotFound)
        ));
        assert!(matches!(
            resolver.resolve("  ", &Viewer::Anonymous).await,
            Err(ResolveError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let (store, _) = setup(true);
        store.set_available(false);
        let resolver = ProfileResolver::new(store);
        assert!(matches!(
            resolver.resolve("jane", &Viewer::Anonymous).await,
            Err(ResolveError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_template_fallback() {
        let mut profile = Profile::new(Uuid::new_v4());
        assert_eq!(template_for(&profile), DEFAULT_TEMPLATE);

        profile.selected_template = Some("   ".into());
        assert_eq!(template_for(&profile), DEFAULT_TEMPLATE);

        profile.selected_template = Some("editorial".into());
        assert_eq!(template_for(&profile), "editorial");
    }

    #[tokio::test]
    async fn test_comp_card_limits_photos() {
        let (store, profile) = setup(true);
        add_photos(
            &store,
            profile.id,
            &[(5, true), (4, true), (3, false), (2, true), (1, true), (0, true)],
        )
        .await;
        let resolver = ProfileResolver::new(store);

        let card = resolver.comp_card("jane", &Viewer::Anonymous).await.unwrap();
        let orders: Vec<i32> = card.photos.iter().map(|p| p.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2, 4]);
        assert_eq!(card.display_name.as_deref(), Some("Jane Doe"));
    }
}
