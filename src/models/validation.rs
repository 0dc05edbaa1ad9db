use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use super::NewExercise;

/// Field name used for errors that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Structured result of a rejected payload, ordered by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    fn new(mut errors: Vec<FieldError>) -> Self {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Self { errors }
    }

    pub fn non_field(message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(NON_FIELD_ERRORS, message)])
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Exercise input as received from a client, before any rule is applied.
#[derive(Debug, Default, Validate)]
pub struct ExercisePayload {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 100, message = "Ensure this field has between 1 and 100 characters.")
    )]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Ensure this field has no more than 500 characters."))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 1000, message = "Ensure this value is between 1 and 1000."))]
    pub reps: Option<i32>,

    #[validate(range(min = 1, max = 100, message = "Ensure this value is between 1 and 100."))]
    pub sets: Option<i32>,

    #[validate(custom(function = "validate_group_ids"))]
    pub groups: Vec<i64>,
}

fn validate_group_ids(groups: &Vec<i64>) -> Result<(), ValidationError> {
    if groups.iter().any(|id| *id <= 0) {
        let mut error = ValidationError::new("invalid_pk");
        error.message = Some("Group ids must be positive integers.".into());
        return Err(error);
    }

    let unique: HashSet<&i64> = groups.iter().collect();
    if unique.len() != groups.len() {
        let mut error = ValidationError::new("duplicate_pk");
        error.message = Some("Group ids must not repeat.".into());
        return Err(error);
    }

    Ok(())
}

/// Check a raw payload against the exercise schema.
///
/// Every field is type-checked on its own so a bad value is reported against
/// the field it belongs to; rule checks run only on well-typed input.
pub fn validate_exercise(payload: Value) -> Result<NewExercise, ValidationFailure> {
    let object = match payload {
        Value::Object(object) => object,
        other => {
            return Err(ValidationFailure::non_field(format!(
                "Invalid data. Expected a JSON object, but got {}.",
                json_type_name(&other)
            )))
        }
    };

    let mut errors = Vec::new();
    let payload = ExercisePayload {
        name: typed_field(&object, "name", &mut errors),
        description: typed_field(&object, "description", &mut errors),
        reps: typed_field(&object, "reps", &mut errors),
        sets: typed_field(&object, "sets", &mut errors),
        groups: typed_field(&object, "groups", &mut errors),
    };

    if !errors.is_empty() {
        return Err(ValidationFailure::new(errors));
    }

    if let Err(rule_errors) = payload.validate() {
        collect_rule_errors(rule_errors, &mut errors);
        return Err(ValidationFailure::new(errors));
    }

    // Group membership is a set; keep it in ascending id order everywhere.
    let mut groups = payload.groups;
    groups.sort_unstable();

    match payload.name {
        Some(name) => Ok(NewExercise {
            name,
            description: payload.description,
            reps: payload.reps,
            sets: payload.sets,
            groups,
        }),
        None => Err(ValidationFailure::new(vec![FieldError::new(
            "name",
            "This field is required.",
        )])),
    }
}

fn typed_field<T>(object: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> T
where
    T: DeserializeOwned + Default,
{
    match object.get(field) {
        None => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            errors.push(FieldError::new(field, format!("Incorrect type: {e}.")));
            T::default()
        }),
    }
}

fn collect_rule_errors(rule_errors: ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, field_errors) in rule_errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            out.push(FieldError::new(field.to_string(), message));
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
