use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{error::ApiError, users::User};

/// Fields that keep surrounding whitespace.
const UNTRIMMED_FIELDS: &[&str] = &["password", "password_confirmation"];

/// Registration body after normalisation: strings trimmed (passwords
/// excepted), and empty strings or nulls dropped as if never sent.
#[derive(Debug, Default, Clone)]
pub struct RegisterInput {
    fields: Map<String, Value>,
}

impl RegisterInput {
    pub fn from_fields(raw: Map<String, Value>) -> Self {
        let mut fields = Map::new();
        for (key, value) in raw {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => {
                    let s = if UNTRIMMED_FIELDS.contains(&key.as_str()) {
                        s
                    } else {
                        s.trim().to_string()
                    };
                    if s.is_empty() {
                        continue;
                    }
                    Value::String(s)
                }
                other => other,
            };
            fields.insert(key, value);
        }
        Self { fields }
    }

    /// Parses a JSON body. An empty body, `null` or `[]` carries no fields.
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {e}")))?;
        match value {
            Value::Object(map) => Ok(Self::from_fields(map)),
            Value::Null => Ok(Self::default()),
            Value::Array(items) if items.is_empty() => Ok(Self::default()),
            _ => Err(ApiError::BadRequest(
                "Request body must be a JSON object".into(),
            )),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }
}

#[async_trait]
impl<S> FromRequest<S> for RegisterInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(pairs) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            let fields = pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            return Ok(Self::from_fields(fields));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Self::from_json(&body)
    }
}

/// Validated registration data, ready to persist.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
