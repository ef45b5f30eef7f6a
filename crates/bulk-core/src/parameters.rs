//! Parameter definitions, resolved values, and user overrides.

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One parameter a job declares for parameterized builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ParameterSpec", into = "ParameterSpec")]
pub enum ParameterDefinition {
    String {
        name: String,
        default: String,
        description: Option<String>,
    },
    Boolean {
        name: String,
        default: bool,
        description: Option<String>,
    },
    /// Default is `default` when it is one of the choices, else the first choice.
    Choice {
        name: String,
        choices: Vec<String>,
        default: Option<String>,
        description: Option<String>,
    },
    /// A parameter type the resolver does not know how to build from text.
    Unsupported {
        name: String,
        kind: String,
        default: Option<String>,
    },
}

impl ParameterDefinition {
    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        ParameterDefinition::String {
            name: name.into(),
            default: default.into(),
            description: None,
        }
    }

    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        ParameterDefinition::Boolean {
            name: name.into(),
            default,
            description: None,
        }
    }

    pub fn choice<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParameterDefinition::Choice {
            name: name.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            default: None,
            description: None,
        }
    }

    /// Set the declared default of a choice parameter. No effect on other kinds.
    pub fn with_choice_default(mut self, value: impl Into<String>) -> Self {
        if let ParameterDefinition::Choice { default, .. } = &mut self {
            *default = Some(value.into());
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            ParameterDefinition::String { name, .. }
            | ParameterDefinition::Boolean { name, .. }
            | ParameterDefinition::Choice { name, .. }
            | ParameterDefinition::Unsupported { name, .. } => name,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            ParameterDefinition::String { .. } => "string",
            ParameterDefinition::Boolean { .. } => "boolean",
            ParameterDefinition::Choice { .. } => "choice",
            ParameterDefinition::Unsupported { kind, .. } => kind,
        }
    }

    /// The value used when the operator supplies nothing for this parameter.
    pub fn default_value(&self) -> Option<ParameterValue> {
        match self {
            ParameterDefinition::String { name, default, .. } => {
                Some(ParameterValue::string(name.clone(), default.clone()))
            }
            ParameterDefinition::Boolean { name, default, .. } => {
                Some(ParameterValue::boolean(name.clone(), *default))
            }
            ParameterDefinition::Choice {
                name,
                choices,
                default,
                ..
            } => default
                .as_ref()
                .filter(|value| choices.contains(value))
                .or_else(|| choices.first())
                .map(|choice| ParameterValue::string(name.clone(), choice.clone())),
            ParameterDefinition::Unsupported { name, default, .. } => default
                .as_ref()
                .map(|value| ParameterValue::string(name.clone(), value.clone())),
        }
    }
}

/// Flat on-disk form of a parameter definition.
///
/// Any `type` other than string, boolean, or choice deserializes into
/// [`ParameterDefinition::Unsupported`] rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A scalar default as written in YAML; non-text scalars are kept as their text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Number(i64),
    Float(f64),
    Text(String),
}

impl DefaultValue {
    fn into_text(self) -> String {
        match self {
            DefaultValue::Bool(value) => value.to_string(),
            DefaultValue::Number(value) => value.to_string(),
            DefaultValue::Float(value) => value.to_string(),
            DefaultValue::Text(value) => value,
        }
    }

    fn as_bool(&self) -> bool {
        match self {
            DefaultValue::Bool(value) => *value,
            DefaultValue::Number(_) | DefaultValue::Float(_) => false,
            DefaultValue::Text(value) => parse_bool(value),
        }
    }
}

impl From<ParameterSpec> for ParameterDefinition {
    fn from(spec: ParameterSpec) -> Self {
        match spec.kind.to_ascii_lowercase().as_str() {
            "string" => ParameterDefinition::String {
                name: spec.name,
                default: spec.default.map(DefaultValue::into_text).unwrap_or_default(),
                description: spec.description,
            },
            "boolean" => ParameterDefinition::Boolean {
                name: spec.name,
                default: spec.default.as_ref().is_some_and(DefaultValue::as_bool),
                description: spec.description,
            },
            "choice" => ParameterDefinition::Choice {
                name: spec.name,
                choices: spec.choices,
                default: spec.default.map(DefaultValue::into_text),
                description: spec.description,
            },
            _ => ParameterDefinition::Unsupported {
                name: spec.name,
                kind: spec.kind,
                default: spec.default.map(DefaultValue::into_text),
            },
        }
    }
}

impl From<ParameterDefinition> for ParameterSpec {
    fn from(definition: ParameterDefinition) -> Self {
        match definition {
            ParameterDefinition::String {
                name,
                default,
                description,
            } => ParameterSpec {
                kind: "string".to_string(),
                name,
                default: Some(DefaultValue::Text(default)),
                choices: vec![],
                description,
            },
            ParameterDefinition::Boolean {
                name,
                default,
                description,
            } => ParameterSpec {
                kind: "boolean".to_string(),
                name,
                default: Some(DefaultValue::Bool(default)),
                choices: vec![],
                description,
            },
            ParameterDefinition::Choice {
                name,
                choices,
                default,
                description,
            } => ParameterSpec {
                kind: "choice".to_string(),
                name,
                default: default.map(DefaultValue::Text),
                choices,
                description,
            },
            ParameterDefinition::Unsupported {
                name,
                kind,
                default,
            } => ParameterSpec {
                kind,
                name,
                default: default.map(DefaultValue::Text),
                choices: vec![],
                description: None,
            },
        }
    }
}

impl JsonSchema for ParameterDefinition {
    fn schema_name() -> String {
        ParameterSpec::schema_name()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        ParameterSpec::json_schema(generator)
    }
}

/// Ordered list of parameter definitions declared by a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ParameterSchema(Vec<ParameterDefinition>);

impl ParameterSchema {
    pub fn new(definitions: Vec<ParameterDefinition>) -> Self {
        Self(definitions)
    }

    pub fn definitions(&self) -> &[ParameterDefinition] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterDefinition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ParameterDefinition> for ParameterSchema {
    fn from_iter<I: IntoIterator<Item = ParameterDefinition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A concrete value submitted with a parameterized build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterValue {
    String { name: String, value: String },
    Boolean { name: String, value: bool },
}

impl ParameterValue {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        ParameterValue::String {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        ParameterValue::Boolean {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ParameterValue::String { name, .. } | ParameterValue::Boolean { name, .. } => name,
        }
    }

    pub fn value_string(&self) -> String {
        match self {
            ParameterValue::String { value, .. } => value.clone(),
            ParameterValue::Boolean { value, .. } => value.to_string(),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name(), self.value_string())
    }
}

/// Textual boolean parsing used for boolean parameters: only `true`
/// (any case, surrounding whitespace ignored) is true.
pub fn parse_bool(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("true")
}

/// Operator-supplied parameter overrides, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserParams(BTreeMap<String, String>);

impl UserParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Later pairs overwrite earlier ones with the same key.
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UserParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
