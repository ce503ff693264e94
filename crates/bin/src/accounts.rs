//! Opening the account directory from CLI arguments.

use std::sync::Arc;

use tessera::{
    config::Config,
    record::{FileStore, RecordStore},
    user::{MediaFolder, UserDirectory, UserRecord},
};

use crate::cli::AccountsArgs;

/// Load the configuration file, or start from an empty configuration.
pub fn load_config(args: &AccountsArgs) -> Result<Config, Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => {
            tracing::info!("Using configuration at {}", path.display());
            Ok(Config::load(path)?)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

/// Build the account directory over a file store.
pub fn open_directory(args: &AccountsArgs) -> Result<UserDirectory, Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let media_base_url = config.media_base_url()?;

    let store: Arc<dyn RecordStore> = Arc::new(FileStore::open(&args.accounts_dir)?);
    tracing::debug!("Using account store {}", store.describe());

    let mut directory = UserDirectory::new(store, Arc::new(config));

    if let Some(media_dir) = &args.media_dir {
        let base_url = match media_base_url {
            Some(url) => url,
            None => {
                let absolute = std::path::absolute(media_dir)?;
                url::Url::from_directory_path(&absolute).map_err(|()| {
                    format!("Cannot build a file URL for {}", absolute.display())
                })?
            }
        };
        directory = directory.with_media(Arc::new(MediaFolder::new(media_dir.clone(), base_url)?));
    }

    Ok(directory)
}

/// Load an account that must already exist.
pub fn load_existing(
    directory: &UserDirectory,
    username: &str,
) -> Result<UserRecord, Box<dyn std::error::Error>> {
    let user = directory.load(username)?;
    if !user.exists() {
        return Err(format!("No account named '{}'", user.key()).into());
    }
    Ok(user)
}
