//! Listing and descriptor types shared by the pipeline and storage adapters

/// The archival class whose objects are restored
pub const ARCHIVAL_STORAGE_CLASS: StorageClass = StorageClass::Glacier;

/// Storage class tag attached to a listed object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StorageClass {
    #[default]
    Standard,
    StandardIa,
    OnezoneIa,
    IntelligentTiering,
    Glacier,
    GlacierIr,
    DeepArchive,
    /// Any tag not known to this crate, kept verbatim
    Other(String),
}

impl StorageClass {
    pub fn as_str(&self) -> &str {
        match self {
            StorageClass::Standard => "STANDARD",
            StorageClass::StandardIa => "STANDARD_IA",
            StorageClass::OnezoneIa => "ONEZONE_IA",
            StorageClass::IntelligentTiering => "INTELLIGENT_TIERING",
            StorageClass::Glacier => "GLACIER",
            StorageClass::GlacierIr => "GLACIER_IR",
            StorageClass::DeepArchive => "DEEP_ARCHIVE",
            StorageClass::Other(s) => s,
        }
    }
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for StorageClass {
    fn from(s: &str) -> Self {
        match s {
            "STANDARD" => StorageClass::Standard,
            "STANDARD_IA" => StorageClass::StandardIa,
            "ONEZONE_IA" => StorageClass::OnezoneIa,
            "INTELLIGENT_TIERING" => StorageClass::IntelligentTiering,
            "GLACIER" => StorageClass::Glacier,
            "GLACIER_IR" => StorageClass::GlacierIr,
            "DEEP_ARCHIVE" => StorageClass::DeepArchive,
            other => StorageClass::Other(other.to_string()),
        }
    }
}

/// One entry of a remote listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: String,
    pub size: i64,
    /// Missing when the service omits the tag
    pub storage_class: Option<StorageClass>,
}

impl ObjectEntry {
    pub fn new(key: impl Into<String>, size: i64, storage_class: StorageClass) -> Self {
        Self {
            key: key.into(),
            size,
            storage_class: Some(storage_class),
        }
    }
}

/// A single page returned by the listing collaborator
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub entries: Vec<ObjectEntry>,
    /// Token for the following page; `None` once the listing is exhausted
    pub next_token: Option<String>,
}

/// An archival object queued for restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub key: String,
    pub size: i64,
}

impl From<&ObjectEntry> for ObjectDescriptor {
    fn from(entry: &ObjectEntry) -> Self {
        Self {
            key: entry.key.clone(),
            size: entry.size.max(0),
        }
    }
}
