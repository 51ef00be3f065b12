use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a messaging receiver (contact, group, or the user themself).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiverId(pub String);

impl ReceiverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerMode {
    View,
    Edit,
}

impl ControllerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ControllerMode::View => "view",
            ControllerMode::Edit => "edit",
        }
    }

    /// Exact lookup of a mode name (`view` or `edit`); `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "view" => Some(ControllerMode::View),
            "edit" => Some(ControllerMode::Edit),
            _ => None,
        }
    }
}

impl fmt::Display for ControllerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded avatar image. The bytes are opaque to everything in this workspace.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Avatar(pub Vec<u8>);

impl Avatar {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Avatar({} bytes)", self.0.len())
    }
}

/// Avatar change handed to the profile data source on save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum AvatarEdit {
    /// Keep whatever avatar is currently stored.
    #[default]
    Unchanged,
    Removed,
    Replaced(Avatar),
}

impl AvatarEdit {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, AvatarEdit::Unchanged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub public_nickname: String,
    pub avatar: Option<Avatar>,
}

/// The current user's own identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeReceiver {
    pub id: ReceiverId,
    pub display_name: String,
}

impl MeReceiver {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ReceiverId::new(id),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReceiver {
    pub id: ReceiverId,
    pub display_name: String,
    pub public_nickname: Option<String>,
    pub avatar: Option<Avatar>,
}
