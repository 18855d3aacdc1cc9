use serde::Serialize;
use serde_yaml::Value;

use crate::classify::classify;
use crate::context::template::VarsTemplar;
use crate::context::types::Invocation;
use crate::error::FactsError;
use crate::matcher::{resolve_role, Candidates, RoleSource, WarningSink};
use crate::model::load_model;
use crate::model::types::FileEntry;
use crate::params::{Resolver, Settings};

/// Facts published to the playbook for the resolved CONGA role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facts {
    pub conga_basedir: String,
    pub conga_role: Option<String>,
    pub conga_variant: Option<String>,
    pub conga_variants: Vec<String>,
    pub conga_config_path: String,
    pub conga_config: Value,
    pub conga_tenants: Value,
    pub conga_files_paths: Vec<Option<String>>,
    pub conga_files: Vec<FileEntry>,
    pub conga_bundle_files: Vec<FileEntry>,
    pub conga_packages: Vec<FileEntry>,
    pub conga_directories: Vec<String>,
    pub conga_version_info: Value,
}

/// Facts together with the source the role was resolved from.
#[derive(Debug, Clone, PartialEq)]
pub struct Gathered {
    pub facts: Facts,
    pub source: RoleSource,
}

/// JSON object handed back to Ansible.
#[derive(Debug, Serialize)]
pub struct ModuleResult {
    pub changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansible_facts: Option<Facts>,
}

impl ModuleResult {
    pub fn success(facts: Facts) -> Self {
        Self {
            changed: false,
            failed: false,
            msg: None,
            ansible_facts: Some(facts),
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: Some(msg.into()),
            ansible_facts: None,
        }
    }
}

impl From<Result<Gathered, FactsError>> for ModuleResult {
    fn from(result: Result<Gathered, FactsError>) -> Self {
        match result {
            Ok(gathered) => ModuleResult::success(gathered.facts),
            Err(err) => ModuleResult::failure(err.to_string()),
        }
    }
}

/// Resolve parameters, load the model, match the role and build the facts.
pub fn gather(
    invocation: &Invocation,
    settings: &Settings,
    sink: &dyn WarningSink,
) -> Result<Gathered, FactsError> {
    let templar = VarsTemplar::new(&invocation.vars);
    let params = Resolver::new(invocation, &templar).resolve(settings)?;

    let model_path = params.model_path();
    tracing::debug!(path = %model_path.display(), "loading CONGA model");
    let model = load_model(&model_path)?;

    let candidates = Candidates {
        mapping: params.role_mapping.as_deref(),
        current: invocation.current_role(),
        dependency: invocation.depending_role(),
        parent: invocation.parent_role(),
    };
    let resolved = resolve_role(
        &model.roles,
        &candidates,
        params.variant_mapping.as_deref(),
        &params.node,
        sink,
    )?;
    let role = resolved.role;
    let source = resolved.source;

    tracing::info!(
        "[{} ({})] ({}) => role: {}, variants: {:?}",
        invocation.inventory_hostname().unwrap_or_default(),
        params.node,
        source,
        role.role.as_deref().unwrap_or_default(),
        role.variants
    );

    let classified = classify(role);
    let directories = classified.directories();

    let facts = Facts {
        conga_basedir: params.basedir.clone(),
        conga_role: role.role.clone(),
        conga_variant: role.variant.clone(),
        conga_variants: role.variants.clone(),
        conga_config_path: params.config_path().display().to_string(),
        conga_config: role.config.clone(),
        conga_tenants: role.tenants.clone(),
        conga_files_paths: classified.file_paths,
        conga_files: classified.files,
        conga_bundle_files: classified.bundle_files,
        conga_packages: classified.packages,
        conga_directories: directories,
        conga_version_info: model.version_info,
    };
    Ok(Gathered { facts, source })
}
