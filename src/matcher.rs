use std::fmt;

use crate::error::FactsError;
use crate::model::types::RoleEntry;

/// Receives non-fatal diagnostics raised while matching.
pub trait WarningSink {
    fn warn(&self, message: &str);
}

/// Forwards warnings to the tracing subscriber.
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Where the matched role name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    /// Explicit `conga_role_mapping`
    Mapping,
    /// Role executing the task
    Current,
    /// First role of the dependency chain
    Dependency,
    /// Nearest ancestor role of the task (e.g. via `include_role`)
    Parent,
}

impl RoleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleSource::Mapping => "mapping",
            RoleSource::Current => "current",
            RoleSource::Dependency => "dependency",
            RoleSource::Parent => "parent",
        }
    }
}

impl fmt::Display for RoleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role name candidates, one per source.
#[derive(Debug, Clone, Default)]
pub struct Candidates<'a> {
    pub mapping: Option<&'a str>,
    pub current: Option<&'a str>,
    pub dependency: Option<&'a str>,
    pub parent: Option<&'a str>,
}

#[derive(Debug)]
pub struct Resolved<'m> {
    pub role: &'m RoleEntry,
    pub source: RoleSource,
}

/// Map an Ansible role name to a CONGA role name.
///
/// Drops a leading namespace (`ops.`) and a `conga_` prefix, then turns
/// underscores into hyphens since Ansible Galaxy swaps `-` for `_`.
pub fn normalize_role_name(name: &str) -> String {
    let name = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx + 1..],
        _ => name,
    };
    let name = name.strip_prefix("conga_").unwrap_or(name);
    name.replace('_', "-")
}

/// Find the model entry for an Ansible role name, optionally narrowed down
/// by variant. Ambiguous matches are reported and resolved to the first
/// entry in document order.
pub fn match_role<'m>(
    roles: &'m [RoleEntry],
    candidate: Option<&str>,
    variant: Option<&str>,
    sink: &dyn WarningSink,
) -> Option<&'m RoleEntry> {
    let candidate = candidate.filter(|c| !c.is_empty())?;
    let name = normalize_role_name(candidate);

    let matching: Vec<&RoleEntry> = roles
        .iter()
        .filter(|r| r.role.as_deref() == Some(name.as_str()))
        .filter(|r| variant.map_or(true, |v| r.has_variant(v)))
        .collect();

    if matching.len() > 1 {
        match variant {
            Some(v) => sink.warn(&format!(
                "multiple roles in the CONGA model match role '{name}' with variant '{v}'"
            )),
            None => sink.warn(&format!(
                "multiple roles in the CONGA model match role '{name}' and no variant mapping was provided"
            )),
        }
        sink.warn("proceeding with first match.");
    }

    matching.into_iter().next()
}

/// Walk the candidate sources in priority order until one matches.
///
/// A role mapping that does not match is an error on its own: the remaining
/// sources are not consulted.
pub fn resolve_role<'m>(
    roles: &'m [RoleEntry],
    candidates: &Candidates<'_>,
    variant: Option<&str>,
    node: &str,
    sink: &dyn WarningSink,
) -> Result<Resolved<'m>, FactsError> {
    if let Some(mapping) = candidates.mapping.filter(|m| !m.is_empty()) {
        return match match_role(roles, Some(mapping), variant, sink) {
            Some(role) => Ok(Resolved {
                role,
                source: RoleSource::Mapping,
            }),
            None => Err(FactsError::RoleResolution(format!(
                "unable to match CONGA role for explicit role mapping: '{mapping}' and node '{node}'"
            ))),
        };
    }

    let sources = [
        (RoleSource::Current, candidates.current),
        (RoleSource::Dependency, candidates.dependency),
        (RoleSource::Parent, candidates.parent),
    ];
    for (source, candidate) in sources {
        if let Some(role) = match_role(roles, candidate, variant, sink) {
            tracing::debug!(%source, ?candidate, "matched CONGA role");
            return Ok(Resolved { role, source });
        }
    }

    Err(FactsError::RoleResolution(format!(
        "unable to match CONGA role for node '{node}' \
         [role_mapping: {}, variant_mapping: {}, current: {}, dependency: {}, parent: {}]",
        quoted(candidates.mapping),
        quoted(variant),
        quoted(candidates.current),
        quoted(candidates.dependency),
        quoted(candidates.parent),
    )))
}

fn quoted(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{v}'"),
        None => "None".to_string(),
    }
}
