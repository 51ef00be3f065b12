//! Controller for the signed-in user's own profile screen.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::domain::{ContactReceiver, ControllerMode, MeReceiver};
use tracing::{debug, error};

use crate::{
    config::LabelKeys, AvatarController, ControllerError, EntityController, OnRemovedCallback,
    ProfileDataSource, SaveError, Translator,
};

const LOG_TAG: &str = "[MeController]";

enum SessionState {
    View,
    Edit { avatar: AvatarController },
}

pub struct MeController {
    source: Arc<dyn ProfileDataSource>,
    me: Option<Arc<MeReceiver>>,
    subject: String,
    nickname: String,
    state: SessionState,
    saves_in_flight: AtomicUsize,
}

impl MeController {
    pub fn new(
        mode: ControllerMode,
        source: Arc<dyn ProfileDataSource>,
        translator: &dyn Translator,
        me: Option<Arc<MeReceiver>>,
    ) -> Self {
        Self::with_labels(mode, source, translator, &LabelKeys::default(), me)
    }

    pub fn with_labels(
        mode: ControllerMode,
        source: Arc<dyn ProfileDataSource>,
        translator: &dyn Translator,
        labels: &LabelKeys,
        me: Option<Arc<MeReceiver>>,
    ) -> Self {
        let profile = source.profile();
        let (subject, state) = match mode {
            ControllerMode::Edit => {
                let avatar = AvatarController::new(Arc::clone(&source), me.clone())
                    .with_initial(profile.avatar);
                (
                    translator.instant(&labels.edit_profile),
                    SessionState::Edit { avatar },
                )
            }
            ControllerMode::View => (translator.instant(&labels.my_identity), SessionState::View),
        };
        debug!(tag = LOG_TAG, %mode, "profile controller created");

        Self {
            source,
            me,
            subject,
            nickname: profile.public_nickname,
            state,
            saves_in_flight: AtomicUsize::new(0),
        }
    }

    /// Builds a controller from a mode name coming from a route or host message.
    pub fn from_raw_mode(
        raw_mode: &str,
        source: Arc<dyn ProfileDataSource>,
        translator: &dyn Translator,
        labels: &LabelKeys,
        me: Option<Arc<MeReceiver>>,
    ) -> Result<Self, ControllerError> {
        let Some(mode) = ControllerMode::parse(raw_mode) else {
            error!(tag = LOG_TAG, mode = raw_mode, "invalid controller model mode");
            return Err(ControllerError::InvalidMode {
                raw: raw_mode.to_string(),
            });
        };
        Ok(Self::with_labels(mode, source, translator, labels, me))
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    pub fn me(&self) -> Option<&MeReceiver> {
        self.me.as_deref()
    }

    /// Present only in edit mode.
    pub fn avatar_controller(&self) -> Option<&AvatarController> {
        match &self.state {
            SessionState::Edit { avatar } => Some(avatar),
            SessionState::View => None,
        }
    }

    pub fn avatar_controller_mut(&mut self) -> Option<&mut AvatarController> {
        match &mut self.state {
            SessionState::Edit { avatar } => Some(avatar),
            SessionState::View => None,
        }
    }
}

#[async_trait]
impl EntityController for MeController {
    fn set_on_removed(&mut self, _callback: OnRemovedCallback) {
        // The own identity is never removed underneath this controller.
    }

    fn mode(&self) -> ControllerMode {
        match self.state {
            SessionState::View => ControllerMode::View,
            SessionState::Edit { .. } => ControllerMode::Edit,
        }
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn is_valid(&self) -> bool {
        match (&self.me, self.source.current_user_id()) {
            (Some(me), Some(current)) => me.id == current,
            _ => false,
        }
    }

    fn can_chat(&self) -> bool {
        false
    }

    fn can_edit(&self) -> bool {
        true
    }

    fn can_show_qr(&self) -> bool {
        true
    }

    fn is_loading(&self) -> bool {
        self.saves_in_flight.load(Ordering::Acquire) > 0
    }

    async fn save(&self) -> Result<ContactReceiver, SaveError> {
        let SessionState::Edit { avatar } = &self.state else {
            error!(
                tag = LOG_TAG,
                mode = %self.mode(),
                "not allowed to save profile: invalid mode"
            );
            return Err(SaveError::IllegalSave { mode: self.mode() });
        };

        let avatar = avatar.get_avatar();
        debug!(
            tag = LOG_TAG,
            avatar_changed = !avatar.is_unchanged(),
            "saving profile"
        );

        let _loading = InFlight::enter(&self.saves_in_flight);
        let contact = self.source.modify_profile(&self.nickname, avatar).await?;
        Ok(contact)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
#[path = "tests/me_controller_tests.rs"]
mod tests;
