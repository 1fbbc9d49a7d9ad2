use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stored user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-assigned identifier, starting at 1
    pub id: i32,
    pub fullname: String,
    /// Lowercased, unique across all users
    pub email: String,
    /// Between 10 and 120 when present
    pub age: Option<i32>,
    pub bio: Option<String>,
}

impl User {
    pub fn from_new(id: i32, new_user: NewUser) -> Self {
        Self {
            id,
            fullname: new_user.fullname,
            email: new_user.email,
            age: new_user.age,
            bio: new_user.bio,
        }
    }
}

/// Field values that passed validation, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub fullname: String,
    pub email: String,
    pub age: Option<i32>,
    pub bio: Option<String>,
}

/// Raw profile fields as submitted, before validation.
///
/// JSON bodies deserialize straight into this; HTML forms go through
/// [`ProfileForm`]. `age` stays an untyped JSON value so that a wrong type can
/// be reported as a validation error instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ProfileInput {
    #[serde(default, deserialize_with = "text_field")]
    #[schema(example = "Ada Lovelace")]
    pub fullname: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>, example = 36)]
    pub age: Option<Value>,
    #[serde(default, deserialize_with = "text_field")]
    pub bio: Option<String>,
}

/// Scalars become text, containers count as missing
fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// URL-encoded form body of the register and update pages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub bio: String,
}

/// Empty form inputs are always submitted, so blank age and empty bio mean "not given".
impl From<ProfileForm> for ProfileInput {
    fn from(form: ProfileForm) -> Self {
        let age = (!form.age.trim().is_empty()).then(|| Value::String(form.age));
        let bio = (!form.bio.is_empty()).then_some(form.bio);

        Self {
            fullname: Some(form.fullname),
            email: Some(form.email),
            age,
            bio,
        }
    }
}

impl From<&User> for ProfileForm {
    fn from(user: &User) -> Self {
        Self {
            fullname: user.fullname.clone(),
            email: user.email.clone(),
            age: user.age.map(|a| a.to_string()).unwrap_or_default(),
            bio: user.bio.clone().unwrap_or_default(),
        }
    }
}

/// Body returned by successful API writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WriteResponse {
    pub id: i32,
    /// `"created"` or `"updated"`
    pub message: String,
}

impl WriteResponse {
    pub fn created(id: i32) -> Self {
        Self {
            id,
            message: "created".to_string(),
        }
    }

    pub fn updated(id: i32) -> Self {
        Self {
            id,
            message: "updated".to_string(),
        }
    }
}

/// Body returned by rejected API writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorBody {
    #[schema(example = "fullname required")]
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_input_accepts_partial_json() {
        let input: ProfileInput = serde_json::from_value(json!({"fullname": "Ada"})).unwrap();
        assert_eq!(input.fullname.as_deref(), Some("Ada"));
        assert_eq!(input.email, None);
        assert_eq!(input.age, None);
    }

    #[test]
    fn test_profile_input_keeps_age_untyped() {
        let input: ProfileInput =
            serde_json::from_value(json!({"age": "thirty", "bio": null})).unwrap();
        assert_eq!(input.age, Some(json!("thirty")));
        assert_eq!(input.bio, None);
    }

    #[test]
    fn test_profile_input_stringifies_scalar_text_fields() {
        let input: ProfileInput =
            serde_json::from_value(json!({"fullname": 42, "email": ["a@b.co"]})).unwrap();
        assert_eq!(input.fullname.as_deref(), Some("42"));
        assert_eq!(input.email, None);
    }

    #[test]
    fn test_form_round_trips_through_user() {
        let user = User {
            id: 3,
            fullname: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: None,
            bio: Some("math".to_string()),
        };

        let form = ProfileForm::from(&user);
        assert_eq!(form.age, "");

        let input = ProfileInput::from(form);
        assert_eq!(input.age, None);
        assert_eq!(input.bio.as_deref(), Some("math"));
    }

    #[test]
    fn test_blank_form_fields_become_absent() {
        let form = ProfileForm {
            fullname: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: "  ".to_string(),
            bio: String::new(),
        };
        let input = ProfileInput::from(form);
        assert_eq!(input.age, None);
        assert_eq!(input.bio, None);

        let form = ProfileForm {
            age: " 42 ".to_string(),
            bio: "  ".to_string(),
            ..Default::default()
        };
        let input = ProfileInput::from(form);
        assert_eq!(input.age, Some(json!(" 42 ")));
        assert_eq!(input.bio.as_deref(), Some("  "));
    }

    #[test]
    fn test_error_body_omits_missing_message() {
        let body = ApiErrorBody {
            error: "email required".to_string(),
            message: None,
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"error": "email required"}));
    }
}
