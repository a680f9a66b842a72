//! `server/middleware.json` phase editing.
//!
//! LoopBack runs middleware phase by phase, in the order the keys appear in
//! the file. A phase may be refined with a `:before` or `:after` sub-phase,
//! which is stored as its own top-level key (`routes:after`). Those keys form
//! one *phase group* with the plain phase key.
//!
//! Every edit is a pure transform: parse the document, build a new one with a
//! single insertion, serialize it back.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::debug;

use super::common::paths;
use super::ordered_map::OrderedMap;
use crate::domain::error::DomainError;

/// Sub-phase refinement of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubPhase {
    Before,
    After,
}

impl SubPhase {
    pub const ALL: [SubPhase; 2] = [SubPhase::Before, SubPhase::After];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for SubPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubPhase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(DomainError::InvalidPhaseName {
                name: other.to_string(),
                reason: "sub-phase must be 'before' or 'after'".into(),
            }),
        }
    }
}

/// Where a newly created phase goes relative to an existing phase group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseAnchor {
    Before(String),
    After(String),
}

impl PhaseAnchor {
    pub fn phase(&self) -> &str {
        match self {
            Self::Before(p) | Self::After(p) => p,
        }
    }
}

/// Configuration of a single middleware entry.
///
/// Serialized as `{"paths": [...], "params": {...}, "enabled": bool}` with
/// empty fields omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiddlewareConfig {
    pub paths: Vec<String>,
    pub params: Option<Value>,
    pub enabled: Option<bool>,
}

impl MiddlewareConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths = paths
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.trim().is_empty())
            .collect();
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Parse `params` given as JSON text.
    ///
    /// Blank input means "no params". Anything else must be a JSON object.
    pub fn parse_params(text: &str) -> Result<Option<Value>, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let value: Value =
            serde_json::from_str(text).map_err(|e| DomainError::InvalidParams {
                reason: format!("not valid JSON ({e})"),
            })?;

        if !value.is_object() {
            return Err(DomainError::InvalidParams {
                reason: format!("expected a JSON object, got {}", json_kind(&value)),
            });
        }

        Ok(Some(value))
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        if !self.paths.is_empty() {
            obj.insert(
                "paths".into(),
                Value::Array(self.paths.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(params) = &self.params {
            obj.insert("params".into(), params.clone());
        }
        if let Some(enabled) = self.enabled {
            obj.insert("enabled".into(), Value::Bool(enabled));
        }
        Value::Object(obj)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A request to register one middleware entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MiddlewareInsertion {
    /// Plain phase name, never containing `:`.
    pub phase: String,
    pub sub_phase: Option<SubPhase>,
    /// Placement of the phase key when it does not exist yet.
    pub anchor: Option<PhaseAnchor>,
    /// Middleware source key, e.g. `loopback#token` or `./middleware/log`.
    pub source: String,
    pub config: MiddlewareConfig,
}

impl MiddlewareInsertion {
    pub fn new(phase: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            sub_phase: None,
            anchor: None,
            source: source.into(),
            config: MiddlewareConfig::default(),
        }
    }

    pub fn sub_phase(mut self, sub_phase: SubPhase) -> Self {
        self.sub_phase = Some(sub_phase);
        self
    }

    pub fn anchor(mut self, anchor: PhaseAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn config(mut self, config: MiddlewareConfig) -> Self {
        self.config = config;
        self
    }

    /// Key written to `middleware.json`: `phase` or `phase:sub`.
    pub fn phase_key(&self) -> String {
        match self.sub_phase {
            Some(sub) => format!("{}:{}", self.phase, sub),
            None => self.phase.clone(),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        validate_phase_name(&self.phase)?;
        if let Some(anchor) = &self.anchor {
            if anchor.phase().trim().is_empty() {
                return Err(DomainError::InvalidPhaseName {
                    name: String::new(),
                    reason: "anchor phase cannot be empty".into(),
                });
            }
        }
        if self.source.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "middleware source",
            });
        }
        Ok(())
    }
}

/// Check a user-supplied phase name.
pub fn validate_phase_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidPhaseName {
            name: name.to_string(),
            reason: "phase name cannot be empty".into(),
        });
    }
    if name.contains(':') {
        return Err(DomainError::InvalidPhaseName {
            name: name.to_string(),
            reason: "phase name cannot contain ':'".into(),
        });
    }
    Ok(())
}

/// Group name of a phase key: `routes:after` belongs to `routes`.
fn group_of(key: &str) -> &str {
    key.split_once(':').map_or(key, |(group, _)| group)
}

/// Parsed `server/middleware.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiddlewareDocument {
    phases: OrderedMap<OrderedMap<Value>>,
}

impl MiddlewareDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let Value::Object(root) = value else {
            return Err(invalid("top-level value must be an object"));
        };

        let mut phases = OrderedMap::new();
        for (key, entries) in root {
            let Value::Object(entries) = entries else {
                return Err(invalid(format!("phase '{key}' must map to an object")));
            };
            let entries: OrderedMap<Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            phases.insert(key.clone(), entries);
        }

        Ok(Self { phases })
    }

    pub fn to_json(&self) -> Value {
        let root: Map<String, Value> = self
            .phases
            .iter()
            .map(|(key, entries)| {
                let obj: Map<String, Value> = entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect();
                (key.to_string(), Value::Object(obj))
            })
            .collect();
        Value::Object(root)
    }

    /// Distinct phase groups in file order (`initial:before` and `initial`
    /// both report `initial`).
    pub fn phase_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for key in self.phases.keys() {
            let group = group_of(key);
            if !names.iter().any(|n| n == group) {
                names.push(group.to_string());
            }
        }
        names
    }

    /// Raw phase keys in file order.
    pub fn phase_keys(&self) -> impl Iterator<Item = &str> {
        self.phases.keys()
    }

    /// Middleware source keys registered under a phase key.
    pub fn entries(&self, phase_key: &str) -> Option<&OrderedMap<Value>> {
        self.phases.get(phase_key)
    }

    /// Return a new document with `insertion` applied.
    ///
    /// An existing phase key keeps its position and gets the entry appended.
    /// A new phase key is placed next to the anchor group when given, next to
    /// its own group when it is a sub-phase of an existing phase, or last.
    pub fn with_middleware(&self, insertion: &MiddlewareInsertion) -> Result<Self, DomainError> {
        insertion.validate()?;

        let key = insertion.phase_key();
        let entry = insertion.config.to_json();
        let mut next = self.clone();

        if let Some(entries) = next.phases.get_mut(&key) {
            if entries.contains_key(&insertion.source) {
                return Err(DomainError::DuplicateMiddleware {
                    phase: key,
                    source_key: insertion.source.clone(),
                });
            }
            debug!(phase = %key, source = %insertion.source, "Appending to existing phase");
            entries.insert(insertion.source.clone(), entry);
            return Ok(next);
        }

        let index = self.insertion_index(insertion)?;
        debug!(phase = %key, index, "Creating phase");

        let mut entries = OrderedMap::new();
        entries.insert(insertion.source.clone(), entry);
        next.phases.insert_at(index, key, entries);
        Ok(next)
    }

    fn insertion_index(&self, insertion: &MiddlewareInsertion) -> Result<usize, DomainError> {
        if let Some(anchor) = &insertion.anchor {
            let name = anchor.phase();
            let span = self
                .exact_span(name)
                .or_else(|| self.group_span(name))
                .ok_or_else(|| DomainError::AnchorNotFound {
                    anchor: name.to_string(),
                    available: self.phase_names(),
                })?;
            return Ok(match anchor {
                PhaseAnchor::Before(_) => span.0,
                PhaseAnchor::After(_) => span.1 + 1,
            });
        }

        let Some((first, last)) = self.group_span(&insertion.phase) else {
            return Ok(self.phases.len());
        };

        Ok(match insertion.sub_phase {
            Some(SubPhase::Before) => first,
            Some(SubPhase::After) => last + 1,
            // A plain phase key joining its own sub-phases sits ahead of `:after`.
            None => self
                .phases
                .position(&format!("{}:{}", insertion.phase, SubPhase::After))
                .unwrap_or(last + 1),
        })
    }

    /// Position of a literal phase key, for anchors such as `routes:after`.
    fn exact_span(&self, key: &str) -> Option<(usize, usize)> {
        if !key.contains(':') {
            return None;
        }
        self.phases.position(key).map(|i| (i, i))
    }

    /// First and last index of the keys belonging to a phase group.
    fn group_span(&self, group: &str) -> Option<(usize, usize)> {
        let mut span: Option<(usize, usize)> = None;
        for (i, key) in self.phases.keys().enumerate() {
            if group_of(key) == group {
                span = Some(span.map_or((i, i), |(first, _)| (first, i)));
            }
        }
        span
    }
}

fn invalid(reason: impl Into<String>) -> DomainError {
    DomainError::InvalidDocument {
        document: paths::MIDDLEWARE.into(),
        reason: reason.into(),
    }
}
