use std::path::PathBuf;

use crate::context::template::Templar;
use crate::context::types::Invocation;
use crate::error::FactsError;

pub const ENVIRONMENT: &str = "conga_environment";
pub const NODE: &str = "conga_node";
pub const HOST: &str = "conga_host";
pub const BASEDIR: &str = "conga_basedir";
pub const TARGET_PATH: &str = "conga_target_path";
pub const ROLE_MAPPING: &str = "conga_role_mapping";
pub const VARIANT_MAPPING: &str = "conga_variant_mapping";
pub const MODEL_FILE: &str = "conga_model_file";

/// Defaults for optional parameters, taken from the user config.
#[derive(Debug, Clone)]
pub struct Settings {
    pub target_path: String,
    pub model_file: String,
    pub host: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_path: "target/configuration".to_string(),
            model_file: "model.yaml".to_string(),
            host: "localhost".to_string(),
        }
    }
}

/// Resolved parameters of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub environment: String,
    pub node: String,
    pub basedir: String,
    pub target_path: String,
    pub role_mapping: Option<String>,
    pub variant_mapping: Option<String>,
    pub model_file: String,
}

impl Params {
    /// `basedir/target_path/environment/node`
    pub fn config_path(&self) -> PathBuf {
        PathBuf::from(&self.basedir)
            .join(&self.target_path)
            .join(&self.environment)
            .join(&self.node)
    }

    pub fn model_path(&self) -> PathBuf {
        self.config_path().join(&self.model_file)
    }
}

pub struct Resolver<'a> {
    invocation: &'a Invocation,
    templar: &'a dyn Templar,
}

impl<'a> Resolver<'a> {
    pub fn new(invocation: &'a Invocation, templar: &'a dyn Templar) -> Self {
        Self {
            invocation,
            templar,
        }
    }

    /// Task argument, then task variable, then `default`. The value is
    /// templated before the required check, so a template rendering to an
    /// empty string counts as missing.
    pub fn get_arg_or_var(
        &self,
        name: &str,
        default: Option<&str>,
        required: bool,
    ) -> Result<Option<String>, FactsError> {
        let value = match self.invocation.arg_or_var(name) {
            Some(value) => self.render(name, value)?,
            None => match default {
                Some(default) => Some(self.render_str(name, default)?),
                None => None,
            },
        };

        let value = value.filter(|v| !v.is_empty());
        if required && value.is_none() {
            return Err(FactsError::missing(name));
        }
        Ok(value)
    }

    pub fn require(&self, name: &str, default: Option<&str>) -> Result<String, FactsError> {
        self.get_arg_or_var(name, default, true)?
            .ok_or_else(|| FactsError::missing(name))
    }

    /// Basedir as given explicitly, or from the host vars of the control
    /// host CONGA was run on.
    pub fn basedir(&self, default_host: &str) -> Result<String, FactsError> {
        if let Some(basedir) = self.get_arg_or_var(BASEDIR, None, false)? {
            return Ok(basedir);
        }

        let host = self.require(HOST, Some(default_host))?;
        let basedir = match self.invocation.host_var(&host, BASEDIR) {
            Some(value) => self.render(BASEDIR, value)?,
            None => None,
        };
        basedir
            .filter(|b| !b.is_empty())
            .ok_or_else(|| FactsError::missing(BASEDIR))
    }

    pub fn resolve(&self, settings: &Settings) -> Result<Params, FactsError> {
        let environment = self.require(ENVIRONMENT, None)?;
        let node = self.require(NODE, self.invocation.inventory_hostname())?;
        let basedir = self.basedir(&settings.host)?;
        let target_path = self.require(TARGET_PATH, Some(&settings.target_path))?;
        let role_mapping = self.get_arg_or_var(ROLE_MAPPING, None, false)?;
        let variant_mapping = self.get_arg_or_var(VARIANT_MAPPING, None, false)?;
        let model_file = self.require(MODEL_FILE, Some(&settings.model_file))?;

        Ok(Params {
            environment,
            node,
            basedir,
            target_path,
            role_mapping,
            variant_mapping,
            model_file,
        })
    }

    fn render(
        &self,
        name: &str,
        value: &serde_yaml::Value,
    ) -> Result<Option<String>, FactsError> {
        self.templar
            .template(value)
            .map_err(|e| template_error(name, e))
    }

    fn render_str(&self, name: &str, source: &str) -> Result<String, FactsError> {
        self.templar
            .render(source)
            .map_err(|e| template_error(name, e))
    }
}

fn template_error(name: &str, err: minijinja::Error) -> FactsError {
    FactsError::Template {
        name: name.to_string(),
        reason: err.to_string(),
    }
}
