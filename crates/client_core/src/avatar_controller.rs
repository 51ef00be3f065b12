use std::sync::Arc;

use anyhow::Result;
use shared::domain::{Avatar, AvatarEdit, MeReceiver};
use tracing::{debug, warn};

use crate::ProfileDataSource;

const LOG_TAG: &str = "[AvatarController]";

/// In-progress avatar selection for one identity during an edit session.
pub struct AvatarController {
    source: Arc<dyn ProfileDataSource>,
    receiver: Option<Arc<MeReceiver>>,
    current: Option<Avatar>,
    changed: bool,
}

impl AvatarController {
    pub fn new(source: Arc<dyn ProfileDataSource>, receiver: Option<Arc<MeReceiver>>) -> Self {
        Self {
            source,
            receiver,
            current: None,
            changed: false,
        }
    }

    /// Seeds the avatar shown before any edit.
    pub fn with_initial(mut self, avatar: Option<Avatar>) -> Self {
        self.current = avatar;
        self
    }

    pub fn receiver(&self) -> Option<&MeReceiver> {
        self.receiver.as_deref()
    }

    pub fn current_avatar(&self) -> Option<&Avatar> {
        self.current.as_ref()
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn set_avatar(&mut self, avatar: Avatar) {
        debug!(tag = LOG_TAG, bytes = avatar.len(), "avatar replaced");
        self.current = Some(avatar);
        self.changed = true;
    }

    pub fn remove_avatar(&mut self) {
        debug!(tag = LOG_TAG, "avatar removed");
        self.current = None;
        self.changed = true;
    }

    /// The edit to hand to the data source on save.
    pub fn get_avatar(&self) -> AvatarEdit {
        if !self.changed {
            return AvatarEdit::Unchanged;
        }
        match &self.current {
            Some(avatar) => AvatarEdit::Replaced(avatar.clone()),
            None => AvatarEdit::Removed,
        }
    }

    /// Fetches the high-resolution avatar of the bound identity.
    ///
    /// The fetched image only replaces the current one while the user has not
    /// edited it yet.
    pub async fn load_avatar(&mut self) -> Result<Option<&Avatar>> {
        let Some(receiver) = self.receiver.clone() else {
            warn!(tag = LOG_TAG, "cannot load avatar without a receiver");
            return Ok(self.current.as_ref());
        };

        let fetched = self.source.request_avatar(&receiver.id, true).await?;
        if self.changed {
            debug!(
                tag = LOG_TAG,
                receiver = %receiver.id,
                "keeping edited avatar over fetched one"
            );
        } else {
            self.current = fetched;
        }
        Ok(self.current.as_ref())
    }
}

#[cfg(test)]
#[path = "tests/avatar_controller_tests.rs"]
mod tests;
