use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde_yaml::{Mapping, Value};

/// Jinja nesting is resolved repeatedly, since a variable may itself hold a
/// template. This caps self-referencing variables.
const MAX_RENDER_PASSES: usize = 8;

/// Renders `{{ ... }}` expressions found in parameter values.
pub trait Templar {
    fn render(&self, source: &str) -> Result<String, minijinja::Error>;

    /// Render a parameter value. Strings are templated, other scalars are
    /// converted to their string form, nulls stay absent. Sequences and
    /// mappings cannot name a path segment and are rejected.
    fn template(&self, value: &Value) -> Result<Option<String>, minijinja::Error> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => self.render(s).map(Some),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            Value::Tagged(tagged) => self.template(&tagged.value),
            Value::Sequence(_) => Err(not_scalar("a sequence")),
            Value::Mapping(_) => Err(not_scalar("a mapping")),
        }
    }
}

/// Templar backed by the task variables, with Ansible's strict handling of
/// undefined variables.
pub struct VarsTemplar<'a> {
    env: Environment<'static>,
    vars: &'a Mapping,
}

impl<'a> VarsTemplar<'a> {
    pub fn new(vars: &'a Mapping) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env, vars }
    }
}

impl Templar for VarsTemplar<'_> {
    fn render(&self, source: &str) -> Result<String, minijinja::Error> {
        let mut current = source.to_string();
        for _ in 0..MAX_RENDER_PASSES {
            if !is_template(&current) {
                break;
            }
            let rendered = self.env.render_str(&current, self.vars)?;
            if rendered == current {
                break;
            }
            current = rendered;
        }
        Ok(current)
    }
}

fn not_scalar(found: &str) -> minijinja::Error {
    minijinja::Error::new(
        ErrorKind::InvalidOperation,
        format!("expected a string value, found {found}"),
    )
}

fn is_template(s: &str) -> bool {
    s.contains("{{") || s.contains("{%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(content: &str) -> Mapping {
        serde_yaml::from_str(content).unwrap()
    }

    #[test]
    fn test_plain_string_untouched() {
        let vars = vars("env: prod");
        let templar = VarsTemplar::new(&vars);
        assert_eq!(templar.render("target/configuration").unwrap(), "target/configuration");
    }

    #[test]
    fn test_variable_reference() {
        let vars = vars("stage: prod\nregion: eu");
        let templar = VarsTemplar::new(&vars);
        assert_eq!(templar.render("{{ stage }}-{{ region }}").unwrap(), "prod-eu");
    }

    #[test]
    fn test_nested_variable_reference() {
        let vars = vars("root: /srv\nbasedir: \"{{ root }}/conga\"");
        let templar = VarsTemplar::new(&vars);
        assert_eq!(templar.render("{{ basedir }}").unwrap(), "/srv/conga");
    }

    #[test]
    fn test_hostvars_lookup() {
        let vars = vars("hostvars:\n  localhost:\n    conga_basedir: /opt/conga");
        let templar = VarsTemplar::new(&vars);
        assert_eq!(
            templar
                .render("{{ hostvars['localhost'].conga_basedir }}")
                .unwrap(),
            "/opt/conga"
        );
    }

    #[test]
    fn test_undefined_variable_fails() {
        let vars = Mapping::new();
        let templar = VarsTemplar::new(&vars);
        assert!(templar.render("{{ missing }}").is_err());
    }

    #[test]
    fn test_scalar_values() {
        let vars = Mapping::new();
        let templar = VarsTemplar::new(&vars);
        assert_eq!(
            templar.template(&Value::Bool(true)).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            templar.template(&Value::Number(42.into())).unwrap().as_deref(),
            Some("42")
        );
        assert_eq!(templar.template(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_collections_rejected() {
        let vars = Mapping::new();
        let templar = VarsTemplar::new(&vars);
        let seq: Value = serde_yaml::from_str("[prod, dev]").unwrap();
        let err = templar.template(&seq).unwrap_err();
        assert!(err.to_string().contains("found a sequence"));
        let map: Value = serde_yaml::from_str("{stage: prod}").unwrap();
        assert!(templar.template(&map).is_err());
    }
}
