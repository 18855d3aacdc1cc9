use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

const PACKAGE_MARKER: &str = "aemContentPackageProperties";
const BUNDLE_MARKER: &str = "bundleFileProperties";

/// Root of a generated CONGA model document.
#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<RoleEntry>,
    #[serde(default = "empty_mapping", rename = "versionInfo")]
    pub version_info: Value,
}

/// One role/variant combination of the model.
///
/// Both variant shapes of the model schema are folded into `variants` when
/// the entry is loaded. `variant` keeps the legacy singular field as written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawRoleEntry")]
pub struct RoleEntry {
    pub role: Option<String>,
    pub variant: Option<String>,
    pub variants: Vec<String>,
    pub config: Value,
    pub tenants: Value,
    pub files: Vec<FileEntry>,
}

impl RoleEntry {
    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }
}

#[derive(Deserialize)]
struct RawRoleEntry {
    role: Option<String>,
    variant: Option<String>,
    variants: Option<Vec<String>>,
    config: Option<Value>,
    tenants: Option<Value>,
    files: Option<Vec<FileEntry>>,
}

impl From<RawRoleEntry> for RoleEntry {
    fn from(raw: RawRoleEntry) -> Self {
        let variants = match (raw.variants, &raw.variant) {
            (Some(variants), _) => variants,
            (None, Some(variant)) => vec![variant.clone()],
            (None, None) => Vec::new(),
        };
        Self {
            role: raw.role,
            variant: raw.variant,
            variants,
            config: raw.config.unwrap_or_else(empty_mapping),
            tenants: raw.tenants.unwrap_or_else(empty_mapping),
            files: raw.files.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// AEM content package
    Package,
    /// File belonging to an OSGi/Sling bundle
    Bundle,
    Plain,
}

/// A generated file of a role. Kept as the raw mapping so it can be handed
/// back to the playbook untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FileEntry(pub Mapping);

impl FileEntry {
    pub fn path(&self) -> Option<&str> {
        self.0.get("path").and_then(Value::as_str)
    }

    /// Package properties win over bundle properties.
    pub fn kind(&self) -> FileKind {
        if self.0.contains_key(PACKAGE_MARKER) {
            FileKind::Package
        } else if self.0.contains_key(BUNDLE_MARKER) {
            FileKind::Bundle
        } else {
            FileKind::Plain
        }
    }
}

fn empty_mapping() -> Value {
    Value::Mapping(Mapping::new())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
