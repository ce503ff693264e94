//! CLI argument definitions for the Tessera binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Format {
    /// Aligned, human-readable text
    #[default]
    Human,
    /// Single-line JSON
    Json,
}

/// Tessera account management
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Tessera: manage user accounts stored as JSON files")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub accounts: AccountsArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Human, global = true)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where accounts and configuration live
#[derive(clap::Args, Debug)]
pub struct AccountsArgs {
    /// Directory holding one JSON file per account
    #[arg(
        short = 'D',
        long,
        default_value = "accounts",
        env = "TESSERA_ACCOUNTS_DIR",
        global = true
    )]
    pub accounts_dir: PathBuf,

    /// JSON configuration file (groups, username pattern, media URL)
    #[arg(short, long, env = "TESSERA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Folder with uploaded avatar images
    #[arg(long, env = "TESSERA_MEDIA_DIR", global = true)]
    pub media_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Create(CreateArgs),
    /// Show an account's stored properties
    Show(UserArgs),
    /// List all accounts
    List,
    /// Look up an account by username, email or other fields
    Find(FindArgs),
    /// Set an account's password
    Passwd(PasswdArgs),
    /// Set or clear an account property
    Set(SetArgs),
    /// Check credentials against an account
    Login(PasswdArgs),
    /// Check whether an account may perform an action
    Authorize(AuthorizeArgs),
    /// Delete an account
    Remove(UserArgs),
    /// Show storage and configuration details
    Info,
}

/// Arguments naming a single account
#[derive(clap::Args, Debug)]
pub struct UserArgs {
    /// Username (case-insensitive)
    pub username: String,
}

/// Arguments for the create command
#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Username (case-insensitive)
    pub username: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Initial password
    #[arg(short, long, env = "TESSERA_PASSWORD")]
    pub password: String,

    /// Full name
    #[arg(long)]
    pub fullname: Option<String>,

    /// Group memberships (repeatable)
    #[arg(short, long = "group")]
    pub groups: Vec<String>,
}

/// Arguments for the find command
#[derive(clap::Args, Debug)]
pub struct FindArgs {
    /// Value to search for
    pub query: String,

    /// Fields to search, in order (default: username, email)
    #[arg(short, long = "field")]
    pub fields: Vec<String>,
}

/// Arguments carrying a password
#[derive(clap::Args, Debug)]
pub struct PasswdArgs {
    /// Username (case-insensitive)
    pub username: String,

    /// Password
    #[arg(short, long, env = "TESSERA_PASSWORD")]
    pub password: String,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Username (case-insensitive)
    pub username: String,

    /// Dot-separated property path, e.g. `access.site.login`
    pub path: String,

    /// JSON value (bare words are stored as text); omit to clear the property
    pub value: Option<String>,
}

/// Arguments for the authorize command
#[derive(clap::Args, Debug)]
pub struct AuthorizeArgs {
    /// Username (case-insensitive)
    pub username: String,

    /// Action, e.g. `login`
    pub action: String,

    /// Scope, e.g. `admin`
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Authenticate with this password first; otherwise the account is
    /// treated as already logged in
    #[arg(short, long, env = "TESSERA_PASSWORD")]
    pub password: Option<String>,
}
