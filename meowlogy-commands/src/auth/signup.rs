use meowlogy_api::auth::{SignupError, SignupRequest};
use meowlogy_core::{Context, Error};
use meowlogy_session::Session;
use meowlogy_session::impls::session::save_session;
use meowlogy_utils::validation::{self, ValidationError};

use crate::api_failure;

/// Field-level problems with a signup form, in form order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SignupProblems(pub Vec<(&'static str, String)>);

impl SignupProblems {
    fn note(&mut self, field: &'static str, err: ValidationError) {
        self.0.push((field, err.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validates every field at once so all problems can be reported together.
pub fn check_signup(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<SignupRequest, SignupProblems> {
    let mut problems = SignupProblems::default();

    let username = validation::validate_username(username)
        .map_err(|err| problems.note("username", err))
        .ok();
    let email = validation::validate_email(email)
        .map_err(|err| problems.note("email", err))
        .ok();
    if let Err(err) = validation::validate_new_password(password) {
        problems.note("password", err);
    }
    if let Err(err) = validation::validate_password_confirmation(password, confirm) {
        problems.note("confirm", err);
    }

    match (username, email) {
        (Some(username), Some(email)) if problems.is_empty() => Ok(SignupRequest {
            username,
            email,
            password: password.to_owned(),
        }),
        _ => Err(problems),
    }
}

pub async fn signup(
    ctx: &mut Context<'_>,
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), Error> {
    let request = match check_signup(username, email, password, confirm) {
        Ok(request) => request,
        Err(problems) => {
            for (field, message) in &problems.0 {
                ctx.say(format!("{field}: {message}"))?;
            }
            anyhow::bail!("Please fix the fields above and try again.");
        }
    };

    let user = match ctx.data.api.signup(&request).await {
        Ok(user) => user,
        Err(SignupError::UsernameTaken) => {
            anyhow::bail!("username: {}", SignupError::UsernameTaken)
        }
        Err(SignupError::EmailTaken) => anyhow::bail!("email: {}", SignupError::EmailTaken),
        Err(SignupError::Rejected(message)) => anyhow::bail!("{message}"),
        Err(SignupError::Api(err)) => return Err(api_failure(err)),
    };

    let session = Session::authenticated(&user.username, Some(user.id.clone()))
        .or_else(|| Session::authenticated(&request.username, Some(user.id.clone())))
        .ok_or_else(|| anyhow::anyhow!("server returned an account without a username"))?;
    save_session(&ctx.data.store, &session).await?;

    ctx.say(format!(
        "Welcome, {}! Your account has been created.",
        session.username().unwrap_or_default()
    ))?;
    ctx.session = session;
    Ok(())
}

#[cfg(test)]
mod tests {
    use meowlogy_session::impls::session::load_session;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{check_signup, signup};
    use crate::testing::{data_for, printed, signed_out};

    #[test]
    fn reports_every_bad_field() {
        let problems = check_signup("x", "not-an-email", "123", "456").unwrap_err();
        let fields: Vec<_> = problems.0.iter().map(|(field, _)| *field).collect();
        assert_eq!(fields, ["username", "email", "password", "confirm"]);
    }

    #[test]
    fn normalizes_valid_input() {
        let request = check_signup(" kit ", " Kit@Example.COM ", "secret1", "secret1").unwrap();
        assert_eq!(request.username, "kit");
        assert_eq!(request.email, "kit@example.com");
    }

    #[tokio::test]
    async fn successful_signup_signs_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .and(body_json(json!({
                "username": "kit",
                "email": "kit@example.com",
                "password": "secret1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user": {"id": 7, "username": "kit"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = data_for(&server.uri());
        let (mut ctx, out) = signed_out(&data);
        signup(&mut ctx, "kit", "kit@example.com", "secret1", "secret1")
            .await
            .unwrap();

        assert_eq!(ctx.session.user_id(), Some("7"));
        assert_eq!(load_session(&data.store).await.unwrap(), ctx.session);
        assert!(printed(&out).starts_with("Welcome, kit!"));
    }

    #[tokio::test]
    async fn taken_username_is_attached_to_the_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"detail": "Username already exists"})),
            )
            .mount(&server)
            .await;

        let data = data_for(&server.uri());
        let (mut ctx, _) = signed_out(&data);
        let err = signup(&mut ctx, "kit", "kit@example.com", "secret1", "secret1")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "username: Username already exists.");
        assert!(!ctx.session.is_authenticated());
    }

    #[tokio::test]
    async fn invalid_forms_never_reach_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let data = data_for(&server.uri());
        let (mut ctx, out) = signed_out(&data);
        assert!(
            signup(&mut ctx, "kit", "kit@example.com", "secret1", "secret2")
                .await
                .is_err()
        );
        assert!(printed(&out).starts_with("confirm: "));
    }
}
