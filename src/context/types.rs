use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Everything the host runtime hands over for one task invocation.
///
/// `parents` is the static parent-task chain flattened to the role name of
/// each ancestor, nearest first. Ancestors that are not part of a role are
/// `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Invocation {
    pub args: Mapping,
    pub vars: Mapping,
    pub role: Option<String>,
    pub dependency_chain: Vec<String>,
    pub parents: Vec<Option<String>>,
}

impl Invocation {
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }

    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name).filter(|v| !v.is_null())
    }

    /// Task argument first, task variable second.
    pub fn arg_or_var(&self, name: &str) -> Option<&Value> {
        self.arg(name).or_else(|| self.var(name))
    }

    pub fn inventory_hostname(&self) -> Option<&str> {
        self.var("inventory_hostname").and_then(Value::as_str)
    }

    /// Look up a variable in `hostvars` of another host.
    pub fn host_var(&self, host: &str, name: &str) -> Option<&Value> {
        self.var("hostvars")
            .and_then(|hv| hv.get(host))
            .and_then(|vars| vars.get(name))
            .filter(|v| !v.is_null())
    }

    pub fn current_role(&self) -> Option<&str> {
        non_empty(self.role.as_deref())
    }

    /// First role of the dependency chain, i.e. the role that pulled this one in.
    pub fn depending_role(&self) -> Option<&str> {
        non_empty(self.dependency_chain.first().map(String::as_str))
    }

    /// Nearest ancestor of the task that belongs to a role.
    pub fn parent_role(&self) -> Option<&str> {
        self.parents
            .iter()
            .find_map(|parent| non_empty(parent.as_deref()))
    }

    pub fn set_arg(&mut self, name: &str, value: &str) {
        self.args
            .insert(Value::String(name.to_string()), Value::String(value.to_string()));
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
