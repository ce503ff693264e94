//! User accounts
//!
//! Accounts are records keyed by lower-cased username, obtained through a
//! [`UserDirectory`]. The runtime login state moves from anonymous, to
//! authenticated through [`UserRecord::login`], and is then checked per
//! action with [`UserRecord::authorize`]. That state lives only in memory.
//!
//! ```
//! use std::sync::Arc;
//!
//! use tessera::data::Properties;
//! use tessera::record::InMemory;
//! use tessera::user::{Argon2Hasher, UserDirectory};
//!
//! let config = Properties::from_json(r#"{"groups": {"admin": {"access": {"site": {"login": true}}}}}"#)?;
//! let directory = UserDirectory::new(Arc::new(InMemory::new()), Arc::new(config))
//!     .with_hasher(Arc::new(Argon2Hasher::with_cost(8, 1, 1)?));
//!
//! let data = Properties::from_json(
//!     r#"{"email": "ada@example.org", "password": "analytical", "groups": ["admin"]}"#,
//! )?;
//! directory.create("ada", &data)?;
//!
//! let mut ada = directory.load("Ada")?;
//! assert!(!ada.authorize("login", Some("site")));
//! assert!(ada.login("analytical")?);
//! assert!(ada.authorize("login", Some("site")));
//! # Ok::<(), tessera::Error>(())
//! ```

pub mod account;
pub mod crypto;
pub mod directory;
pub mod errors;
pub mod media;
pub mod registry;

pub use account::{UserRecord, gravatar_url};
pub use crypto::{Argon2Hasher, PasswordHasher, Verification};
pub use directory::{UserDirectory, normalize_username};
pub use errors::UserError;
pub use media::{AvatarMedia, MediaFile, MediaFolder, MediaResolver};
pub use registry::Registry;
