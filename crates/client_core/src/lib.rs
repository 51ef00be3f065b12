//! Entity controllers for the messaging client's profile screens.
//!
//! A host UI talks to every entity screen (contact, group, distribution list,
//! the user themself) through [`EntityController`]. Only the self-profile
//! variant, [`MeController`], lives in this crate.

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{Avatar, AvatarEdit, ContactReceiver, ControllerMode, Profile, ReceiverId};

pub mod avatar_controller;
pub mod config;
pub mod error;
pub mod i18n;
pub mod me_controller;
pub mod memory_source;

pub use avatar_controller::AvatarController;
pub use config::{
    apply_env_overrides, load_settings, read_settings_file, ControllerSettings, LabelKeys,
    DEFAULT_SETTINGS_FILE,
};
pub use error::{ControllerError, SaveError};
pub use i18n::{Catalog, Translator};
pub use me_controller::MeController;
pub use memory_source::{InMemoryProfileSource, ProfileModification};

/// Invoked with the id of an entity that was deleted outside the controller.
pub type OnRemovedCallback = Box<dyn Fn(&ReceiverId) + Send + Sync>;

/// Read/write access to the current user's profile.
///
/// The data source outlives every controller built on it and is shared
/// between them, so controllers hold it behind an `Arc`.
#[async_trait]
pub trait ProfileDataSource: Send + Sync {
    /// Current profile snapshot.
    fn profile(&self) -> Profile;

    /// Identifier of the signed-in user, if one is known.
    fn current_user_id(&self) -> Option<ReceiverId>;

    /// Persists a new nickname and avatar edit, resolving with the updated own contact.
    async fn modify_profile(&self, nickname: &str, avatar: AvatarEdit)
        -> Result<ContactReceiver>;

    async fn request_avatar(
        &self,
        receiver: &ReceiverId,
        high_resolution: bool,
    ) -> Result<Option<Avatar>>;
}

/// Capability contract shared by every entity screen.
#[async_trait]
pub trait EntityController: Send + Sync {
    /// Registers a callback for external deletion of the underlying entity.
    fn set_on_removed(&mut self, callback: OnRemovedCallback);

    fn mode(&self) -> ControllerMode;

    /// Title shown above the entity screen.
    fn subject(&self) -> &str;

    /// Whether the referenced entity is still the legitimate target.
    fn is_valid(&self) -> bool;

    fn can_chat(&self) -> bool;
    fn can_edit(&self) -> bool;
    fn can_show_qr(&self) -> bool;

    /// True while a save is in flight.
    fn is_loading(&self) -> bool;

    async fn save(&self) -> Result<ContactReceiver, SaveError>;
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
