//! Field rules shared by the JSON API and the HTML forms.
//!
//! [`validate_profile`] checks every field and reports at most one error per
//! field, in `fullname`, `email`, `age` order. It has no side effects.

use serde_json::Value;
use std::fmt;
use std::num::IntErrorKind;
use validator::ValidateEmail;

use crate::models::{NewUser, ProfileInput};

pub const AGE_MIN: i32 = 10;
pub const AGE_MAX: i32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Fullname,
    Email,
    Age,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Fullname => "fullname",
            Field::Email => "email",
            Field::Age => "age",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    RequiredFieldMissing,
    InvalidEmailFormat,
    /// Age was neither an integer nor a string holding one
    InvalidType,
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: FieldErrorKind,
    /// Detail explaining why the value was rejected
    pub detail: Option<String>,
}

impl FieldError {
    fn new(field: Field, kind: FieldErrorKind) -> Self {
        Self {
            field,
            kind,
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Inline message shown next to the form field.
    pub fn form_message(&self) -> String {
        match self.kind {
            FieldErrorKind::RequiredFieldMissing => "This field is required.".to_string(),
            FieldErrorKind::InvalidEmailFormat => "Invalid email address.".to_string(),
            FieldErrorKind::InvalidType => "Not a valid integer value.".to_string(),
            FieldErrorKind::OutOfRange => {
                format!("Number must be between {} and {}.", AGE_MIN, AGE_MAX)
            }
        }
    }

    /// Short `error` string used by the JSON API.
    pub fn api_error(&self) -> &'static str {
        match (self.field, self.kind) {
            (Field::Fullname, _) => "fullname required",
            (Field::Email, FieldErrorKind::RequiredFieldMissing) => "email required",
            (Field::Email, _) => "invalid email",
            (Field::Age, FieldErrorKind::OutOfRange) => "age out of range",
            (Field::Age, _) => "age must be an integer",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.api_error(), detail),
            None => f.write_str(self.api_error()),
        }
    }
}

/// Non-empty, ordered collection of field errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// First failing field, in field order.
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate and normalize raw profile input.
pub fn validate_profile(input: &ProfileInput) -> Result<NewUser, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let fullname = validate_fullname(input.fullname.as_deref()).map_err(|e| errors.push(e));
    let email = validate_email(input.email.as_deref()).map_err(|e| errors.push(e));
    let age = validate_age(input.age.as_ref()).map_err(|e| errors.push(e));

    match (fullname, email, age) {
        (Ok(fullname), Ok(email), Ok(age)) => Ok(NewUser {
            fullname,
            email,
            age,
            bio: input.bio.clone(),
        }),
        _ => Err(errors),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the name as submitted; trimming only decides whether it is present.
fn validate_fullname(value: Option<&str>) -> Result<String, FieldError> {
    match (value, non_blank(value)) {
        (Some(fullname), Some(_)) => Ok(fullname.to_string()),
        _ => Err(FieldError::new(Field::Fullname, FieldErrorKind::RequiredFieldMissing)),
    }
}

/// Returns the lowercased address.
fn validate_email(value: Option<&str>) -> Result<String, FieldError> {
    let email = non_blank(value)
        .ok_or_else(|| FieldError::new(Field::Email, FieldErrorKind::RequiredFieldMissing))?;
    let invalid = |detail: &str| {
        FieldError::new(Field::Email, FieldErrorKind::InvalidEmailFormat).with_detail(detail)
    };

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid(
            "The email address is not valid. It must have exactly one @-sign.",
        ));
    };
    if domain.contains('@') {
        return Err(invalid(
            "The email address is not valid. It must have exactly one @-sign.",
        ));
    }
    if local.is_empty() {
        return Err(invalid("There must be something before the @-sign."));
    }
    if domain.is_empty() {
        return Err(invalid("There must be something after the @-sign."));
    }
    // Single-label domains such as `localhost` are not deliverable addresses
    let labels_ok = domain.contains('.') && domain.split('.').all(|label| !label.is_empty());
    if !labels_ok {
        return Err(invalid(
            "The part after the @-sign is not valid. It should have a period.",
        ));
    }
    let email = email.to_lowercase();
    if !email.validate_email() {
        return Err(invalid("The email address is not valid."));
    }

    Ok(email)
}

fn validate_age(value: Option<&Value>) -> Result<Option<i32>, FieldError> {
    let invalid_type = || FieldError::new(Field::Age, FieldErrorKind::InvalidType);
    let out_of_range = || FieldError::new(Field::Age, FieldErrorKind::OutOfRange);

    let age = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(age) => age,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    return Err(out_of_range());
                }
                _ => return Err(invalid_type()),
            },
        },
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(age), _, _) => age,
            // Above i64::MAX
            (None, Some(_), _) => return Err(out_of_range()),
            // `as` saturates, so huge integral floats still fail the range check
            (None, None, Some(f)) if f.is_finite() && f.fract() == 0.0 => f as i64,
            _ => return Err(invalid_type()),
        },
        Some(_) => return Err(invalid_type()),
    };

    if !(i64::from(AGE_MIN)..=i64::from(AGE_MAX)).contains(&age) {
        return Err(out_of_range());
    }

    // In range, so it fits
    Ok(Some(age as i32))
}
