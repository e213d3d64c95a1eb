//! Store item XML files (vehicles, placeables, hand tools).

use std::path::Path;

use super::{ManifestError, XmlDocument, UNKNOWN};

/// A store item file referenced from `modDesc.xml`.
#[derive(Debug, Clone)]
pub struct StoreItemManifest {
    document: XmlDocument,
}

impl StoreItemManifest {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        XmlDocument::open(path).map(Self::from_document)
    }

    pub fn from_document(document: XmlDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    pub fn path(&self) -> &Path {
        self.document.path()
    }

    /// Kind of item, taken from the root tag (`vehicle`, `placeable`, ...).
    pub fn item_type(&self) -> &str {
        self.document.root().tag()
    }

    /// English shop name.
    pub fn name(&self) -> String {
        self.document
            .text_at("./storeData/name/en")
            .unwrap_or(UNKNOWN)
            .to_string()
    }

    /// Shop category tokens, in declaration order.
    pub fn category_tokens(&self) -> Vec<String> {
        self.document
            .text_at("./storeData/category")
            .map(|field| field.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
