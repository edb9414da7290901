use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::{
    client::{ApiClient, extract_detail},
    error::ApiError,
    model::id_as_string,
};

const USERNAME_TAKEN_DETAIL: &str = "Username already exists";
const EMAIL_TAKEN_DETAIL: &str = "Email already exists";
const SIGNUP_FAILED: &str = "Signup failed. Please try again.";

#[derive(Clone, Debug, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SignupUser {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    #[serde(default)]
    success: bool,
    user: Option<SignupUser>,
}

/// Why an account was not created. Field-level conflicts are kept apart so
/// the caller can attach them to the right input.
#[derive(Debug, Error)]
pub enum SignupError {
    #[error("Username already exists.")]
    UsernameTaken,
    #[error("Email already exists.")]
    EmailTaken,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SignupError {
    fn from_detail(detail: Option<String>) -> Self {
        match detail.as_deref() {
            Some(USERNAME_TAKEN_DETAIL) => Self::UsernameTaken,
            Some(EMAIL_TAKEN_DETAIL) => Self::EmailTaken,
            Some(other) => Self::Rejected(other.to_owned()),
            None => Self::Rejected(SIGNUP_FAILED.to_owned()),
        }
    }
}

impl ApiClient {
    /// `POST /auth/signup`. Inputs are expected to be validated already.
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupUser, SignupError> {
        let response = self
            .send(self.http().post(self.url("/auth/signup")).json(request))
            .await?;

        let ok = response.status().is_success();
        let body = response.bytes().await.map_err(ApiError::Network)?;
        let value: Value = match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(_) if !ok => return Err(SignupError::Rejected(SIGNUP_FAILED.to_owned())),
            Err(e) => return Err(ApiError::Format(e.to_string()).into()),
        };

        if !ok {
            return Err(SignupError::from_detail(extract_detail(&value)));
        }

        let detail = extract_detail(&value);
        let parsed: SignupResponse =
            serde_json::from_value(value).map_err(|e| ApiError::Format(e.to_string()))?;
        match parsed {
            SignupResponse {
                success: true,
                user: Some(user),
            } => {
                info!(username = %user.username, "account created");
                Ok(user)
            }
            _ => Err(SignupError::from_detail(detail)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{SignupError, SignupRequest};
    use crate::ApiClient;

    fn request() -> SignupRequest {
        SignupRequest {
            username: "tabby".to_owned(),
            email: "tabby@cats.example".to_owned(),
            password: "whiskers".to_owned(),
        }
    }

    async fn server_answering(status: u16, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn successful_signup_returns_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .and(body_json(json!({
                "username": "tabby",
                "email": "tabby@cats.example",
                "password": "whiskers"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user": {"id": 7, "username": "tabby"}
            })))
            .mount(&server)
            .await;

        let user = ApiClient::new(server.uri())
            .unwrap()
            .signup(&request())
            .await
            .unwrap();
        assert_eq!(user.id, "7");
        assert_eq!(user.username, "tabby");
    }

    #[tokio::test]
    async fn duplicate_username_and_email_map_to_fields() {
        let server = server_answering(400, json!({"detail": "Username already exists"})).await;
        let err = ApiClient::new(server.uri())
            .unwrap()
            .signup(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SignupError::UsernameTaken));
        assert_eq!(err.to_string(), "Username already exists.");

        let server = server_answering(400, json!({"detail": "Email already exists"})).await;
        let err = ApiClient::new(server.uri())
            .unwrap()
            .signup(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SignupError::EmailTaken));
    }

    #[tokio::test]
    async fn other_rejections_keep_detail_or_fall_back() {
        let server = server_answering(500, json!({"detail": "Database unavailable"})).await;
        let err = ApiClient::new(server.uri())
            .unwrap()
            .signup(&request())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Database unavailable");

        let server = server_answering(200, json!({"success": false})).await;
        let err = ApiClient::new(server.uri())
            .unwrap()
            .signup(&request())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Signup failed. Please try again.");
    }
}
