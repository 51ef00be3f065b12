use shared::domain::ControllerMode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("invalid controller model mode: {raw:?}")]
    InvalidMode { raw: String },
}

#[derive(Debug, Error)]
pub enum SaveError {
    /// Save was requested on a controller that cannot commit anything.
    #[error("not allowed to save profile in {mode} mode")]
    IllegalSave { mode: ControllerMode },
    /// Failure reported by the profile data source, passed through untouched.
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl SaveError {
    pub fn is_illegal_save(&self) -> bool {
        matches!(self, SaveError::IllegalSave { .. })
    }
}
