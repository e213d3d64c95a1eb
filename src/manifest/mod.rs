//! GIANTS mod manifest support.
//!
//! Every Farming Simulator mod ships a `modDesc.xml` at the root of its
//! archive describing the mod (title, author, version, description) and,
//! optionally, the store items it adds. Each store item lives in its own XML
//! file referenced from `<storeItems>` relative to the manifest.
//!
//! This module handles:
//! - BOM-based encoding detection (UTF-8, UTF-8 BOM, UTF-16 LE/BE)
//! - A small element tree with ElementTree-style path lookups
//! - Typed accessors for `modDesc.xml` and store item files
//!
//! Missing fields never fail: they read as [`UNKNOWN`] (or an empty
//! description). Only unreadable or malformed XML is an error.
//!
//! # Example
//!
//! ```ignore
//! use giants_installer::manifest::ModManifest;
//!
//! let manifest = ModManifest::open("FS25_BigTractor/modDesc.xml")?;
//! println!("{} {} by {}", manifest.name(), manifest.version(), manifest.author());
//! for tag in manifest.categories()? {
//!     println!("  {tag}");
//! }
//! ```

mod document;
mod encoding;
mod mod_desc;
mod store_item;

pub use document::{XmlDocument, XmlElement};
pub use encoding::{decode_manifest_bytes, detect_encoding, TextEncoding};
pub use mod_desc::{
    category_tags, normalize_description, ManifestSummary, ModManifest, StoreItemSummary,
};
pub use store_item::StoreItemManifest;

use std::path::PathBuf;

/// File name of the mod manifest inside a mod archive.
pub const MANIFEST_FILE_NAME: &str = "modDesc.xml";

/// Value reported for manifest fields that are missing.
pub const UNKNOWN: &str = "UNKNOWN";

/// Prefix added to every store category token.
pub const CATEGORY_PREFIX: &str = "store:";

/// Errors raised while loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest {} is not readable text: {reason}", .path.display())]
    Encoding { path: PathBuf, reason: String },

    #[error("failed to parse manifest {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("xml root not found in {}", .path.display())]
    NoRoot { path: PathBuf },
}

impl ManifestError {
    /// Path of the file that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ManifestError::Io { path, .. }
            | ManifestError::Encoding { path, .. }
            | ManifestError::Parse { path, .. }
            | ManifestError::NoRoot { path } => path,
        }
    }
}
