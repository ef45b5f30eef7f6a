//! Reconciles operator overrides with a job's declared parameters.

use bulk_core::parameters::{
    ParameterDefinition, ParameterSchema, ParameterValue, UserParams, parse_bool,
};
use tracing::{info, warn};

pub struct ParameterResolver;

impl ParameterResolver {
    /// One value per definition, in schema order.
    ///
    /// Supplied values win over defaults. A definition that yields no value
    /// (an unsupported type or a choice list without entries) is left out.
    pub fn resolve(schema: &ParameterSchema, params: &UserParams) -> Vec<ParameterValue> {
        let values: Vec<ParameterValue> = schema
            .iter()
            .filter_map(|definition| Self::resolve_one(definition, params))
            .collect();
        for value in &values {
            info!(parameter = %value, "Resolved parameter value");
        }
        values
    }

    fn resolve_one(definition: &ParameterDefinition, params: &UserParams) -> Option<ParameterValue> {
        let supplied = params.get(definition.name());
        match definition {
            ParameterDefinition::String { name, default, .. } => {
                Some(resolve_string(name, default, supplied))
            }
            ParameterDefinition::Boolean { name, default, .. } => {
                Some(resolve_boolean(name, *default, supplied))
            }
            ParameterDefinition::Choice { name, choices, .. } => {
                resolve_choice(definition, name, choices, supplied)
            }
            ParameterDefinition::Unsupported { name, kind, .. } => {
                warn!(parameter = %name, kind = %kind, "Unsupported parameter type, using default");
                definition.default_value()
            }
        }
    }
}

fn resolve_string(name: &str, default: &str, supplied: Option<&str>) -> ParameterValue {
    ParameterValue::string(name, supplied.unwrap_or(default))
}

fn resolve_boolean(name: &str, default: bool, supplied: Option<&str>) -> ParameterValue {
    ParameterValue::boolean(name, supplied.map_or(default, parse_bool))
}

fn resolve_choice(
    definition: &ParameterDefinition,
    name: &str,
    choices: &[String],
    supplied: Option<&str>,
) -> Option<ParameterValue> {
    match supplied {
        Some(value) if choices.iter().any(|c| c == value) => {
            Some(ParameterValue::string(name, value))
        }
        Some(value) => {
            warn!(parameter = %name, value, "Value is not a declared choice, using default");
            definition.default_value()
        }
        None => definition.default_value(),
    }
}
