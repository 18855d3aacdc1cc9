use std::path::PathBuf;

use clap::Parser;

use crate::context::types::Invocation;
use crate::params;

/// conga-facts - resolve CONGA model facts for an Ansible role
#[derive(Parser, Debug, Clone)]
#[command(name = "conga-facts", version, about)]
pub struct Args {
    /// Invocation document (JSON or YAML) with task args, vars and role
    /// metadata. Use `-` for stdin.
    #[arg(default_value = "-")]
    pub invocation: String,

    /// CONGA environment (conga_environment)
    #[arg(short, long)]
    pub environment: Option<String>,

    /// CONGA node name (conga_node)
    #[arg(short, long)]
    pub node: Option<String>,

    /// Base directory of the CONGA project (conga_basedir)
    #[arg(short, long)]
    pub basedir: Option<String>,

    /// Host whose variables define conga_basedir (conga_host)
    #[arg(long)]
    pub host: Option<String>,

    /// Target path below the base directory (conga_target_path)
    #[arg(long)]
    pub target_path: Option<String>,

    /// Explicit CONGA role (conga_role_mapping)
    #[arg(short, long)]
    pub role_mapping: Option<String>,

    /// Explicit CONGA variant (conga_variant_mapping)
    #[arg(long)]
    pub variant_mapping: Option<String>,

    /// Model file name (conga_model_file)
    #[arg(short, long)]
    pub model_file: Option<String>,

    /// Path to the config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter, overrides CONGA_FACTS_LOG
    #[arg(long)]
    pub log_level: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

impl Args {
    /// Command line flags act as task arguments and win over the document.
    pub fn apply_to(&self, invocation: &mut Invocation) {
        let overrides = [
            (params::ENVIRONMENT, &self.environment),
            (params::NODE, &self.node),
            (params::BASEDIR, &self.basedir),
            (params::HOST, &self.host),
            (params::TARGET_PATH, &self.target_path),
            (params::ROLE_MAPPING, &self.role_mapping),
            (params::VARIANT_MAPPING, &self.variant_mapping),
            (params::MODEL_FILE, &self.model_file),
        ];
        for (name, value) in overrides {
            if let Some(value) = value {
                invocation.set_arg(name, value);
            }
        }
    }
}
