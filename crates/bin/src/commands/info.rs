//! Info command - shows the account store, configuration source and counts.

use tessera::{config::ConfigStore, user::UserDirectory};

use crate::cli::AccountsArgs;
use crate::output::OutputFormat;

/// Run the info command
pub fn run(
    directory: &UserDirectory,
    args: &AccountsArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = directory.store().describe();
    let accounts = directory.list()?.len();
    let config = args
        .config
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());
    let username_pattern = tessera::config::username_regex(directory.config().as_ref())?;
    let media = directory
        .config()
        .get_text(tessera::config::MEDIA_BASE_URL_KEY);

    match format {
        OutputFormat::Human => {
            println!("Store:       {store}");
            println!("Config:      {config}");
            println!("Accounts:    {accounts}");
            println!("Usernames:   {}", username_pattern.as_str());
            if let Some(media) = &media {
                println!("Media URL:   {media}");
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "store": store,
                "config": config,
                "accounts": accounts,
                "username_pattern": username_pattern.as_str(),
                "media_base_url": media,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(())
}
