use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use client_core::{
    apply_env_overrides, read_settings_file, Catalog, ControllerSettings, EntityController,
    InMemoryProfileSource, MeController, SaveError, DEFAULT_SETTINGS_FILE,
};
use serde::Serialize;
use shared::domain::{Avatar, ContactReceiver, MeReceiver, Profile, ReceiverId};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Runs one profile screen session against an in-memory data source.
#[derive(Parser, Debug)]
struct Args {
    /// `view` or `edit`.
    #[arg(long, default_value = "view")]
    mode: String,
    #[arg(long, default_value = "ECHOECHO")]
    user_id: String,
    /// Nickname stored before the session starts.
    #[arg(long, default_value = "")]
    nickname: String,
    #[arg(long)]
    new_nickname: Option<String>,
    /// Replacement avatar, base64 encoded.
    #[arg(long, conflicts_with = "remove_avatar")]
    avatar_b64: Option<String>,
    #[arg(long)]
    remove_avatar: bool,
    #[arg(long)]
    save: bool,
}

#[derive(Serialize)]
struct SessionReport {
    mode: String,
    subject: String,
    nickname: String,
    valid: bool,
    can_chat: bool,
    can_edit: bool,
    can_show_qr: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved: Option<SavedContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    save_error: Option<String>,
}

#[derive(Serialize)]
struct SavedContact {
    id: String,
    display_name: String,
    public_nickname: Option<String>,
    avatar_b64: Option<String>,
}

impl From<ContactReceiver> for SavedContact {
    fn from(contact: ContactReceiver) -> Self {
        Self {
            id: contact.id.to_string(),
            display_name: contact.display_name,
            public_nickname: contact.public_nickname,
            avatar_b64: contact.avatar.map(|avatar| STANDARD.encode(avatar.0)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings_file = read_settings_file(Path::new(DEFAULT_SETTINGS_FILE));
    let (mut settings, settings_error) = match settings_file {
        Ok(settings) => (settings.unwrap_or_default(), None),
        Err(err) => (ControllerSettings::default(), Some(err)),
    };
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();
    if let Some(err) = settings_error {
        warn!(error = %format!("{err:#}"), "ignoring malformed settings file");
    }
    let args = Args::parse();

    let catalog = match &settings.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::english(),
    };

    let source = Arc::new(InMemoryProfileSource::new(
        Some(ReceiverId::new(args.user_id.clone())),
        Profile {
            public_nickname: args.nickname.clone(),
            avatar: None,
        },
    ));
    let me = Arc::new(MeReceiver::new(args.user_id.clone(), args.nickname.clone()));

    let mut controller = MeController::from_raw_mode(
        &args.mode,
        source,
        &catalog,
        &settings.labels,
        Some(me),
    )?;

    if let Some(nickname) = args.new_nickname {
        controller.set_nickname(nickname);
    }
    if let Some(avatar_controller) = controller.avatar_controller_mut() {
        if let Some(raw) = &args.avatar_b64 {
            let bytes = STANDARD
                .decode(raw.trim())
                .context("--avatar-b64 is not valid base64")?;
            avatar_controller.set_avatar(Avatar(bytes));
        } else if args.remove_avatar {
            avatar_controller.remove_avatar();
        }
    }

    let (saved, save_error) = if args.save {
        match controller.save().await {
            Ok(contact) => (Some(SavedContact::from(contact)), None),
            Err(err @ SaveError::IllegalSave { .. }) => (None, Some(err.to_string())),
            Err(SaveError::Persistence(err)) => (None, Some(format!("{err:#}"))),
        }
    } else {
        (None, None)
    };

    let report = SessionReport {
        mode: controller.mode().to_string(),
        subject: controller.subject().to_string(),
        nickname: controller.nickname().to_string(),
        valid: controller.is_valid(),
        can_chat: controller.can_chat(),
        can_edit: controller.can_edit(),
        can_show_qr: controller.can_show_qr(),
        saved,
        save_error,
    };
    info!(mode = %controller.mode(), saved = report.saved.is_some(), "session finished");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
