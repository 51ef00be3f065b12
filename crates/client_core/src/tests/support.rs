//! Shared fixtures for controller tests.

use std::{
    io,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{Avatar, AvatarEdit, ContactReceiver, MeReceiver, Profile, ReceiverId};
use tokio::sync::Semaphore;
use tracing::subscriber::DefaultGuard;

use crate::{InMemoryProfileSource, ProfileDataSource};

pub(crate) const ME_ID: &str = "ECHOECHO";

/// Collects formatted log lines written while a capture guard is active.
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub(crate) fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub(crate) fn error_count(&self) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.contains(" ERROR "))
            .count()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's tracing events into a buffer until the guard drops.
pub(crate) fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

pub(crate) fn avatar(bytes: &[u8]) -> Avatar {
    Avatar(bytes.to_vec())
}

pub(crate) fn me() -> Arc<MeReceiver> {
    Arc::new(MeReceiver::new(ME_ID, "Echo"))
}

pub(crate) fn source_with(nickname: &str, avatar: Option<Avatar>) -> Arc<InMemoryProfileSource> {
    Arc::new(InMemoryProfileSource::new(
        Some(ReceiverId::new(ME_ID)),
        Profile {
            public_nickname: nickname.to_string(),
            avatar,
        },
    ))
}

/// Data source whose `modify_profile` calls wait until the test releases them.
pub(crate) struct GatedProfileSource {
    inner: InMemoryProfileSource,
    gate: Semaphore,
}

impl GatedProfileSource {
    pub(crate) fn new(nickname: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryProfileSource::new(
                Some(ReceiverId::new(ME_ID)),
                Profile {
                    public_nickname: nickname.to_string(),
                    avatar: None,
                },
            ),
            gate: Semaphore::new(0),
        })
    }

    /// Lets `count` pending or future modifications through, in arrival order.
    pub(crate) fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }

    pub(crate) fn completed(&self) -> usize {
        self.inner.modifications().len()
    }
}

#[async_trait]
impl ProfileDataSource for GatedProfileSource {
    fn profile(&self) -> Profile {
        self.inner.profile()
    }

    fn current_user_id(&self) -> Option<ReceiverId> {
        self.inner.current_user_id()
    }

    async fn modify_profile(
        &self,
        nickname: &str,
        avatar: AvatarEdit,
    ) -> Result<ContactReceiver> {
        self.gate.acquire().await?.forget();
        self.inner.modify_profile(nickname, avatar).await
    }

    async fn request_avatar(
        &self,
        receiver: &ReceiverId,
        high_resolution: bool,
    ) -> Result<Option<Avatar>> {
        self.inner.request_avatar(receiver, high_resolution).await
    }
}
