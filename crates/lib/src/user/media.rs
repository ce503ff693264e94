//! Uploaded media attached to accounts.
//!
//! Accounts reference uploaded files (such as avatars) by name. A
//! [`MediaResolver`] turns such a name into a [`MediaFile`] with a public
//! URL. [`MediaFolder`] serves files from a local directory.

use std::path::{Path, PathBuf};

use url::Url;

use crate::{
    Result,
    config::ConfigurationError,
    data::{Properties, Value},
};

/// Directory (relative to a media folder) holding thumbnails.
pub const THUMBNAIL_DIR: &str = "thumbs";

/// A resolved media file.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    url: String,
    metadata: Properties,
}

impl MediaFile {
    pub fn new(url: impl Into<String>, metadata: Properties) -> Self {
        Self {
            url: url.into(),
            metadata,
        }
    }

    /// Public URL of the file.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// File information such as `name`, `type` and `size`.
    pub fn metadata(&self) -> &Properties {
        &self.metadata
    }
}

/// An account's avatar in its available renditions.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarMedia {
    pub original: MediaFile,
    pub thumbnail: Option<MediaFile>,
}

/// Resolves media file names to files.
pub trait MediaResolver: Send + Sync {
    /// Resolves `filename`, or returns `None` if no such file exists.
    fn resolve(&self, filename: &str) -> Option<MediaFile>;

    /// Resolves the thumbnail rendition of `filename`, if there is one.
    fn thumbnail(&self, _filename: &str) -> Option<MediaFile> {
        None
    }
}

/// Media served from a directory under a base URL.
///
/// `<root>/<name>` is published as `<base_url>/<name>`; thumbnails live in
/// `<root>/thumbs/<name>`. An optional `<name>.meta.json` sidecar adds to
/// the file metadata.
#[derive(Debug, Clone)]
pub struct MediaFolder {
    root: PathBuf,
    base_url: Url,
}

impl MediaFolder {
    /// Creates a folder. The base URL must be able to hold paths.
    pub fn new(root: impl Into<PathBuf>, mut base_url: Url) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigurationError::InvalidConfig {
                path: crate::config::MEDIA_BASE_URL_KEY.to_string(),
                reason: format!("'{base_url}' cannot be used as a base URL"),
            }
            .into());
        }
        // Without a trailing slash, joining would replace the last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            root: root.into(),
            base_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn file(&self, relative: &str, filename: &str) -> Option<MediaFile> {
        if !is_plain_name(filename) {
            return None;
        }
        let path = self.root.join(relative);
        let size = std::fs::metadata(&path).ok().filter(|m| m.is_file())?.len();

        let url = match self.base_url.join(relative) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(filename, "Cannot build media URL: {e}");
                return None;
            }
        };

        let mut metadata = Properties::new();
        metadata.insert("name", filename);
        metadata.insert("size", Value::Int(i64::try_from(size).unwrap_or(i64::MAX)));
        if let Some(media_type) = media_type(filename) {
            metadata.insert("type", media_type);
        }
        let sidecar = self.root.join(format!("{relative}.meta.json"));
        if let Ok(json) = std::fs::read_to_string(&sidecar) {
            match Properties::from_json(&json) {
                Ok(extra) => metadata = metadata.merge(&extra),
                Err(e) => tracing::warn!(path = %sidecar.display(), "Ignoring media metadata: {e}"),
            }
        }

        Some(MediaFile::new(url.to_string(), metadata))
    }
}

impl MediaResolver for MediaFolder {
    fn resolve(&self, filename: &str) -> Option<MediaFile> {
        self.file(filename, filename)
    }

    fn thumbnail(&self, filename: &str) -> Option<MediaFile> {
        self.file(&format!("{THUMBNAIL_DIR}/{filename}"), filename)
    }
}

/// A single file name, not a path.
fn is_plain_name(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
}

fn media_type(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(media_type)
}
