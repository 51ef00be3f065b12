//! Process-local profile data source for offline sessions and tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{Avatar, AvatarEdit, ContactReceiver, Profile, ReceiverId},
    error::{ApiError, ApiException, ErrorCode},
};
use tracing::info;

use crate::ProfileDataSource;

/// Nicknames longer than this (in UTF-8 bytes) are rejected.
pub const MAX_NICKNAME_BYTES: usize = 32;

/// One accepted or rejected `modify_profile` request, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileModification {
    pub nickname: String,
    pub avatar: AvatarEdit,
}

pub struct InMemoryProfileSource {
    inner: Mutex<SourceState>,
}

struct SourceState {
    current_user_id: Option<ReceiverId>,
    profile: Profile,
    fail_next: Option<ApiError>,
    modifications: Vec<ProfileModification>,
    avatar_requests: usize,
}

impl InMemoryProfileSource {
    pub fn new(current_user_id: Option<ReceiverId>, profile: Profile) -> Self {
        Self {
            inner: Mutex::new(SourceState {
                current_user_id,
                profile,
                fail_next: None,
                modifications: Vec::new(),
                avatar_requests: 0,
            }),
        }
    }

    pub fn set_current_user_id(&self, id: Option<ReceiverId>) {
        self.state().current_user_id = id;
    }

    pub fn set_profile(&self, profile: Profile) {
        self.state().profile = profile;
    }

    /// Makes the next `modify_profile` call fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.state().fail_next = Some(error);
    }

    pub fn modifications(&self) -> Vec<ProfileModification> {
        self.state().modifications.clone()
    }

    pub fn avatar_requests(&self) -> usize {
        self.state().avatar_requests
    }

    fn state(&self) -> MutexGuard<'_, SourceState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProfileDataSource for InMemoryProfileSource {
    fn profile(&self) -> Profile {
        self.state().profile.clone()
    }

    fn current_user_id(&self) -> Option<ReceiverId> {
        self.state().current_user_id.clone()
    }

    async fn modify_profile(
        &self,
        nickname: &str,
        avatar: AvatarEdit,
    ) -> Result<ContactReceiver> {
        let mut state = self.state();
        state.modifications.push(ProfileModification {
            nickname: nickname.to_string(),
            avatar: avatar.clone(),
        });

        if let Some(error) = state.fail_next.take() {
            return Err(ApiException::from(error).into());
        }
        if nickname.len() > MAX_NICKNAME_BYTES {
            return Err(ApiException::new(
                ErrorCode::Validation,
                format!("nickname exceeds {MAX_NICKNAME_BYTES} bytes"),
            )
            .into());
        }
        let Some(id) = state.current_user_id.clone() else {
            return Err(ApiException::new(ErrorCode::Unauthorized, "no signed-in user").into());
        };

        state.profile.public_nickname = nickname.to_string();
        match avatar {
            AvatarEdit::Unchanged => {}
            AvatarEdit::Removed => state.profile.avatar = None,
            AvatarEdit::Replaced(image) => state.profile.avatar = Some(image),
        }
        info!(user_id = %id, "profile modified");

        let public_nickname = (!nickname.is_empty()).then(|| nickname.to_string());
        Ok(ContactReceiver {
            display_name: public_nickname.clone().unwrap_or_else(|| id.to_string()),
            id,
            public_nickname,
            avatar: state.profile.avatar.clone(),
        })
    }

    async fn request_avatar(
        &self,
        receiver: &ReceiverId,
        _high_resolution: bool,
    ) -> Result<Option<Avatar>> {
        let mut state = self.state();
        state.avatar_requests += 1;
        if state.current_user_id.as_ref() != Some(receiver) {
            return Ok(None);
        }
        Ok(state.profile.avatar.clone())
    }
}
