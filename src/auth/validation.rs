use lazy_static::lazy_static;
use regex::Regex;
use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;

use crate::{
    auth::dto::{RegisterInput, Registration},
    error::ApiError,
    users::UserStore,
};

pub const EMAIL_TAKEN: &str = "The email has already been taken.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Required,
    String,
    Email,
    MaxChars(usize),
    /// `<field>_confirmation` must equal the field.
    Confirmed,
    /// No stored user has this email.
    UniqueEmail,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

const fn rule(field: &'static str, check: Check, message: &'static str) -> Rule {
    Rule { field, check, message }
}

pub const REGISTER_RULES: &[Rule] = &[
    rule("name", Check::Required, "The name field is required."),
    rule("name", Check::String, "The name must be a string."),
    rule("name", Check::MaxChars(255), "The name may not be greater than 255 characters."),
    rule("email", Check::Required, "The email field is required."),
    rule("email", Check::String, "The email must be a string."),
    rule("email", Check::Email, "The email must be a valid email address."),
    rule("email", Check::MaxChars(255), "The email may not be greater than 255 characters."),
    rule("email", Check::UniqueEmail, EMAIL_TAKEN),
    rule("password", Check::Required, "The password field is required."),
    rule("password", Check::String, "The password must be a string."),
    rule("password", Check::Confirmed, "The password confirmation does not match."),
];

/// Field name to the messages of every failed rule.
///
/// Fields keep the order of their first failure, which follows the rule list,
/// and serialize as a JSON object in that order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<(&'static str, Vec<&'static str>)>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: &'static str) {
        match self.0.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.0.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[&'static str]> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(name, _)| *name)
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in &self.0 {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Requires a dotted domain, so single-label hosts like `user@localhost` fail.
pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

async fn passes(
    input: &RegisterInput,
    rule: &Rule,
    value: &Value,
    users: &dyn UserStore,
) -> Result<bool, ApiError> {
    let ok = match rule.check {
        Check::Required => true,
        Check::String => value.is_string(),
        Check::Email => value.as_str().is_some_and(is_valid_email),
        Check::MaxChars(max) => value.as_str().map_or(true, |s| s.chars().count() <= max),
        Check::Confirmed => {
            let confirmation = format!("{}_confirmation", rule.field);
            input.get(&confirmation) == Some(value)
        }
        Check::UniqueEmail => match value.as_str() {
            Some(email) => users.find_by_email(email).await?.is_none(),
            None => true,
        },
    };
    Ok(ok)
}

/// Runs `rules` against `input` and collects every failure.
///
/// A missing field only reports its `Required` message; the remaining rules
/// for that field are skipped. Present fields are checked against all rules.
pub async fn check(
    input: &RegisterInput,
    rules: &[Rule],
    users: &dyn UserStore,
) -> Result<ValidationErrors, ApiError> {
    let mut errors = ValidationErrors::default();
    for rule in rules {
        let value = input.get(rule.field);
        if !is_present(value) {
            if rule.check == Check::Required && errors.field(rule.field).is_none() {
                errors.add(rule.field, rule.message);
            }
            continue;
        }
        let Some(value) = value else { continue };
        if !passes(input, rule, value, users).await? {
            errors.add(rule.field, rule.message);
        }
    }
    Ok(errors)
}

/// Validates a registration body against [`REGISTER_RULES`].
pub async fn validate_registration(
    input: &RegisterInput,
    users: &dyn UserStore,
) -> Result<Registration, ApiError> {
    let errors = check(input, REGISTER_RULES, users).await?;
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    match (input.text("name"), input.text("email"), input.text("password")) {
        (Some(name), Some(email), Some(password)) => Ok(Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }),
        _ => Err(ApiError::internal(anyhow::anyhow!(
            "registration passed validation with missing fields"
        ))),
    }
}
