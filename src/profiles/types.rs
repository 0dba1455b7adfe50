//! Profile, photo and projection types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing tier of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
    Agency,
}

/// Physical attributes shown on the portfolio and comp card.
/// Free-form strings: units and formats vary by market.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    pub height: Option<String>,
    pub bust: Option<String>,
    pub waist: Option<String>,
    pub hips: Option<String>,
    pub shoe_size: Option<String>,
    pub hair_color: Option<String>,
    pub eye_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialHandles {
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub website: Option<String>,
}

/// One row per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    /// Lower-cased routing key; `None` until onboarding claims one.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub selected_template: Option<String>,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default)]
    pub socials: SocialHandles,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tier: SubscriptionTier,
    #[serde(default)]
    pub onboarding_completed: bool,
}

impl Profile {
    /// A fresh profile as created at signup: no username, private,
    /// onboarding pending.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            username: None,
            display_name: None,
            bio: None,
            avatar_url: None,
            agency: None,
            selected_template: None,
            measurements: Measurements::default(),
            socials: SocialHandles::default(),
            is_public: false,
            tier: SubscriptionTier::Free,
            onboarding_completed: false,
        }
    }
}

/// A portfolio photo. Exclusively owned by one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub click_count: u64,
}

fn default_visible() -> bool {
    true
}

impl Photo {
    pub fn new(profile_id: Uuid, url: impl Into<String>, sort_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile_id,
            url: url.into(),
            thumbnail_url: None,
            is_visible: true,
            sort_order,
            size_bytes: 0,
            caption: None,
            view_count: 0,
            click_count: 0,
        }
    }
}

/// Field-level change to a photo. `None` leaves a field untouched;
/// `caption: Some(None)` clears the caption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoPatch {
    pub is_visible: Option<bool>,
    pub caption: Option<Option<String>>,
    pub sort_order: Option<i32>,
}

impl PhotoPatch {
    pub fn is_empty(&self) -> bool {
        self.is_visible.is_none() && self.caption.is_none() && self.sort_order.is_none()
    }

    pub fn apply(&self, photo: &mut Photo) {
        if let Some(visible) = self.is_visible {
            photo.is_visible = visible;
        }
        if let Some(caption) = &self.caption {
            photo.caption = caption.clone();
        }
        if let Some(order) = self.sort_order {
            photo.sort_order = order;
        }
    }
}

/// Photo as exposed on a public portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPhoto {
    pub id: Uuid,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub caption: Option<String>,
    pub sort_order: i32,
}

impl From<&Photo> for PublicPhoto {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id,
            url: photo.url.clone(),
            thumbnail_url: photo.thumbnail_url.clone(),
            caption: photo.caption.clone(),
            sort_order: photo.sort_order,
        }
    }
}

/// State only the owner sees when previewing their own portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerPreview {
    pub is_public: bool,
    /// Banner text shown while the portfolio is private.
    pub banner: Option<String>,
}

/// Read-only projection of a profile and its visible photos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub agency: Option<String>,
    pub template: String,
    pub measurements: Measurements,
    pub socials: SocialHandles,
    pub photos: Vec<PublicPhoto>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub owner_preview: Option<OwnerPreview>,
}

/// Printable one-page summary handed to agencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompCard {
    pub username: String,
    pub display_name: Option<String>,
    pub agency: Option<String>,
    pub template: String,
    pub measurements: Measurements,
    pub photos: Vec<PublicPhoto>,
}

impl From<PublicProfile> for CompCard {
    fn from(profile: PublicProfile) -> Self {
        let mut photos = profile.photos;
        photos.truncate(crate::profiles::resolver::COMP_CARD_PHOTOS);

        Self {
            username: profile.username,
            display_name: profile.display_name,
            agency: profile.agency,
            template: profile.template,
            measurements: profile.measurements,
            photos,
        }
    }
}
