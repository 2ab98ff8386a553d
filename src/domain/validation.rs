use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::{parse_cents, Cents, EntryKind, LedgerEntryInput, ParseCentsError};

/// Minimum description length, counted in characters after trimming.
pub const MIN_DESCRIPTION_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Description,
    Amount,
    Kind,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Kind => "kind",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    MissingField,
    WrongType,
    InvalidEnum,
    TooShort,
    NotANumber,
    TooPrecise,
    TooLarge,
    NotPositive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub problem: FieldProblem,
}

impl FieldError {
    pub fn new(field: Field, problem: FieldProblem) -> Self {
        Self { field, problem }
    }

    /// Message suitable for showing next to the offending form field.
    pub fn message(&self) -> String {
        match self.problem {
            FieldProblem::MissingField => "this field is required".to_string(),
            FieldProblem::WrongType => "must be text".to_string(),
            FieldProblem::InvalidEnum => "must be either 'income' or 'expense'".to_string(),
            FieldProblem::TooShort => {
                format!("must be at least {} characters", MIN_DESCRIPTION_CHARS)
            }
            FieldProblem::NotANumber => "must be a number".to_string(),
            FieldProblem::TooPrecise => "must have at most two decimal places".to_string(),
            FieldProblem::TooLarge => "is too large".to_string(),
            FieldProblem::NotPositive => "must be greater than zero".to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message())
    }
}

/// Every problem found in one submission, in field order.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid entry: {}", join_errors(.errors))]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false for errors returned by [`validate`], which only fails
    /// when at least one field has a problem.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The problem reported for a field, if any.
    pub fn for_field(&self, field: Field) -> Option<FieldProblem> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.problem)
    }

    pub fn contains(&self, field: Field, problem: FieldProblem) -> bool {
        self.for_field(field) == Some(problem)
    }
}

/// Turn raw, untrusted input into a canonical entry payload.
///
/// Each field goes through a structural check first (present, right JSON
/// shape) and only then through parsing. All failures are collected so a form
/// can display every problem at once. `kind` may also arrive as `type`.
pub fn validate(raw: &Value) -> Result<LedgerEntryInput, FieldErrors> {
    let fields = raw.as_object();
    let lookup = |key: &str| {
        fields
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    };

    let mut errors = Vec::new();

    let description = check_description(lookup("description"))
        .map_err(|e| errors.push(e))
        .ok();
    let amount_cents = check_amount(lookup("amount"))
        .map_err(|e| errors.push(e))
        .ok();
    let kind = check_kind(lookup("kind").or_else(|| lookup("type")))
        .map_err(|e| errors.push(e))
        .ok();

    match (description, amount_cents, kind) {
        (Some(description), Some(amount_cents), Some(kind)) => Ok(LedgerEntryInput {
            description,
            amount_cents,
            kind,
        }),
        _ => Err(FieldErrors { errors }),
    }
}

fn check_description(value: Option<&Value>) -> Result<String, FieldError> {
    let fail = |problem| FieldError::new(Field::Description, problem);

    let text = match value {
        None => return Err(fail(FieldProblem::MissingField)),
        Some(Value::String(text)) => text,
        Some(_) => return Err(fail(FieldProblem::WrongType)),
    };

    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(fail(FieldProblem::TooShort));
    }
    Ok(trimmed.to_string())
}

fn check_amount(value: Option<&Value>) -> Result<Cents, FieldError> {
    let fail = |problem| FieldError::new(Field::Amount, problem);

    let parsed = match value {
        None => return Err(fail(FieldProblem::MissingField)),
        Some(Value::Number(number)) => match (number.as_i64(), number.as_f64()) {
            (Some(units), _) => units.checked_mul(100).ok_or(ParseCentsError::Overflow),
            // f64 Display never uses exponent notation, so it parses like typed text
            (None, Some(float)) => parse_cents(&float.to_string()),
            (None, None) => Err(ParseCentsError::InvalidFormat),
        },
        Some(Value::String(text)) => parse_cents(text),
        Some(_) => Err(ParseCentsError::InvalidFormat),
    };

    let cents = parsed.map_err(|e| match e {
        ParseCentsError::Overflow => fail(FieldProblem::TooLarge),
        ParseCentsError::TooManyDecimals => fail(FieldProblem::TooPrecise),
        ParseCentsError::Empty | ParseCentsError::InvalidFormat => fail(FieldProblem::NotANumber),
    })?;
    if cents <= 0 {
        return Err(fail(FieldProblem::NotPositive));
    }
    Ok(cents)
}

fn check_kind(value: Option<&Value>) -> Result<EntryKind, FieldError> {
    let fail = |problem| FieldError::new(Field::Kind, problem);

    match value {
        None => Err(fail(FieldProblem::MissingField)),
        Some(Value::String(text)) => {
            EntryKind::from_str(text).ok_or_else(|| fail(FieldProblem::InvalidEnum))
        }
        Some(_) => Err(fail(FieldProblem::InvalidEnum)),
    }
}
