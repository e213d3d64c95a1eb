//! `modDesc.xml` accessors.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::{ManifestError, StoreItemManifest, XmlDocument, CATEGORY_PREFIX, UNKNOWN};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// The top-level manifest of a mod.
#[derive(Debug, Clone)]
pub struct ModManifest {
    document: XmlDocument,
}

impl ModManifest {
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

    /// English title of the mod.
    pub fn name(&self) -> String {
        self.field("./title/en")
    }

    pub fn author(&self) -> String {
        self.field("./author")
    }

    pub fn version(&self) -> String {
        self.field("./version")
    }

    /// English description with any literal CDATA wrapper removed.
    pub fn description(&self) -> String {
        normalize_description(self.document.text_at("./description/en").unwrap_or(""))
    }

    fn field(&self, path: &str) -> String {
        self.document.text_at(path).unwrap_or(UNKNOWN).to_string()
    }

    /// Absolute paths of every store item file, resolved against the
    /// manifest's own directory.
    pub fn store_item_manifest_paths(&self) -> Vec<PathBuf> {
        let Some(store_items) = self.document.element_at("./storeItems") else {
            return Vec::new();
        };

        let base = self.document.directory();
        store_items
            .find_all("storeItem")
            .into_iter()
            .filter_map(|item| match item.attribute("xmlFilename") {
                Some(relative) => Some(base.join(relative.replace('\\', "/"))),
                None => {
                    warn!(
                        "storeItem without xmlFilename in {}, skipping",
                        self.path().display()
                    );
                    None
                }
            })
            .collect()
    }

    /// Store item manifests, each opened only when the iterator reaches it.
    pub fn store_item_manifests(
        &self,
    ) -> impl Iterator<Item = Result<StoreItemManifest, ManifestError>> {
        self.store_item_manifest_paths()
            .into_iter()
            .map(StoreItemManifest::open)
    }

    /// `store:<token>` tags across all store items, first-seen order, no duplicates.
    pub fn categories(&self) -> Result<Vec<String>, ManifestError> {
        let mut fields = Vec::new();
        for item in self.store_item_manifests() {
            let item = item?;
            debug!("Store item {} ({})", item.name(), item.item_type());
            fields.push(item.category_tokens().join(" "));
        }
        Ok(category_tags(fields))
    }

    /// Everything the manifest says, with store items loaded.
    pub fn summary(&self) -> Result<ManifestSummary, ManifestError> {
        let store_items = self
            .store_item_manifests()
            .map(|item| -> Result<StoreItemSummary, ManifestError> {
                let item = item?;
                Ok(StoreItemSummary {
                    path: item.path().to_path_buf(),
                    item_type: item.item_type().to_string(),
                    name: item.name(),
                    categories: item.category_tokens(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let categories = category_tags(store_items.iter().map(|item| item.categories.join(" ")));

        Ok(ManifestSummary {
            path: self.path().to_path_buf(),
            name: self.name(),
            author: self.author(),
            version: self.version(),
            description: self.description(),
            store_items,
            categories,
        })
    }
}

/// Serializable view of a mod manifest.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestSummary {
    pub path: PathBuf,
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
    pub store_items: Vec<StoreItemSummary>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreItemSummary {
    pub path: PathBuf,
    pub item_type: String,
    pub name: String,
    pub categories: Vec<String>,
}

/// Strip a literal `<![CDATA[ ... ]]>` wrapper, only when both ends are present.
pub fn normalize_description(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed
        .strip_prefix(CDATA_OPEN)
        .and_then(|rest| rest.strip_suffix(CDATA_CLOSE))
    {
        Some(inner) => inner.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Merge whitespace-delimited category fields into prefixed, deduplicated tags.
pub fn category_tags<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for field in fields {
        for token in field.as_ref().split_whitespace() {
            let tag = format!("{CATEGORY_PREFIX}{token}");
            if seen.insert(tag.clone()) {
                tags.push(tag);
            }
        }
    }

    tags
}
