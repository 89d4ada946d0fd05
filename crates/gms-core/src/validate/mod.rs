//! Structural payload validation.
//!
//! Every write payload is checked against a named JSON Schema before any
//! store call. The schemas are compiled once into a [`SchemaValidator`],
//! which is immutable afterwards and can be shared behind an `Arc`.
//! Validation reports every violated constraint, not only the first.

mod schemas;

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema, ValidationError};
use serde_json::Value;
use thiserror::Error;

/// The payload shapes the system accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaName {
    AddGarden,
    UpdateGarden,
    AddPlant,
    UpdatePlant,
}

impl SchemaName {
    pub const ALL: [SchemaName; 4] = [
        Self::AddGarden,
        Self::UpdateGarden,
        Self::AddPlant,
        Self::UpdatePlant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddGarden => "addGarden",
            Self::UpdateGarden => "updateGarden",
            Self::AddPlant => "addPlant",
            Self::UpdatePlant => "updatePlant",
        }
    }

    fn document(self) -> Value {
        match self {
            Self::AddGarden | Self::UpdateGarden => schemas::garden_fields(),
            Self::AddPlant => schemas::add_plant(),
            Self::UpdatePlant => schemas::update_plant(),
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule a payload broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    Required,
    TypeMismatch,
    UnknownField,
    Format,
    NotEmpty,
    Constraint,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Required => "required",
            Self::TypeMismatch => "type mismatch",
            Self::UnknownField => "unknown field",
            Self::Format => "format",
            Self::NotEmpty => "not empty",
            Self::Constraint => "constraint",
        };
        f.write_str(s)
    }
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field the rule applies to; `(body)` for the payload as a whole.
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.rule, self.message)
    }
}

impl Violation {
    fn from_error(error: &ValidationError<'_>) -> Self {
        let message = error.to_string();
        let at = field_at(&error.instance_path.to_string());
        let (field, rule) = match &error.kind {
            ValidationErrorKind::Required { property } => (
                property
                    .as_str()
                    .map(str::to_owned)
                    .unwrap_or_else(|| property.to_string()),
                Rule::Required,
            ),
            ValidationErrorKind::Type { .. } => (at, Rule::TypeMismatch),
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                (unexpected.join(", "), Rule::UnknownField)
            }
            ValidationErrorKind::Pattern { .. } | ValidationErrorKind::Format { .. } => {
                (at, Rule::Format)
            }
            ValidationErrorKind::MinProperties { .. } => (at, Rule::NotEmpty),
            _ => (at, Rule::Constraint),
        };
        Self {
            field,
            rule,
            message,
        }
    }
}

fn field_at(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        "(body)".to_owned()
    } else {
        trimmed.replace('/', ".")
    }
}

/// Outcome of validating one payload against one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub schema: SchemaName,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Convert into `Err(self)` when any rule was violated.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }

    /// Build a one-violation report for a payload that passed the schema but
    /// still could not be decoded (e.g. `2023-02-30`).
    pub fn single(schema: SchemaName, field: &str, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            schema,
            violations: vec![Violation {
                field: field.to_owned(),
                rule,
                message: message.into(),
            }],
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "{} payload is valid", self.schema);
        }
        write!(f, "invalid {} payload: ", self.schema)?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Errors raised while compiling the built-in schemas.
#[derive(Debug, Error)]
pub enum ValidatorBuildError {
    #[error("schema {schema} failed to compile: {message}")]
    Compile { schema: SchemaName, message: String },
}

/// Compiled validators for all [`SchemaName`]s.
pub struct SchemaValidator {
    add_garden: JSONSchema,
    update_garden: JSONSchema,
    add_plant: JSONSchema,
    update_plant: JSONSchema,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

fn compile(name: SchemaName) -> Result<JSONSchema, ValidatorBuildError> {
    let document = name.document();
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&document)
        .map_err(|e| ValidatorBuildError::Compile {
            schema: name,
            message: e.to_string(),
        })
}

impl SchemaValidator {
    /// Compile every schema. Called once at startup.
    pub fn new() -> Result<Self, ValidatorBuildError> {
        Ok(Self {
            add_garden: compile(SchemaName::AddGarden)?,
            update_garden: compile(SchemaName::UpdateGarden)?,
            add_plant: compile(SchemaName::AddPlant)?,
            update_plant: compile(SchemaName::UpdatePlant)?,
        })
    }

    /// Validate `payload` against `schema`, collecting every violation.
    ///
    /// Violations are sorted by field then rule so the report does not depend
    /// on keyword evaluation order.
    pub fn validate(&self, schema: SchemaName, payload: &Value) -> ValidationReport {
        let compiled = match schema {
            SchemaName::AddGarden => &self.add_garden,
            SchemaName::UpdateGarden => &self.update_garden,
            SchemaName::AddPlant => &self.add_plant,
            SchemaName::UpdatePlant => &self.update_plant,
        };
        let mut violations: Vec<Violation> = match compiled.validate(payload) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(|e| Violation::from_error(&e)).collect(),
        };
        violations.sort_by(|a, b| a.field.cmp(&b.field).then(a.rule.cmp(&b.rule)));
        ValidationReport { schema, violations }
    }
}
