//! Account endpoints under `/api/users`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use styler_core::{CoreError, ProfileUpdate, User};

use crate::error::{ApiError, ApiResult};
use crate::services::account::Registration;
use crate::services::ServiceError;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub reset_token: Option<String>,
    pub new_password: Option<String>,
}

/// Body returned by register and login.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub success: bool,
    pub message: &'static str,
}

impl AccountResponse {
    fn new(user: &User, message: &'static str) -> Self {
        AccountResponse {
            id: user.id,
            name: user.display_name(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            success: true,
            message,
        }
    }
}

/// Non-blank, trimmed.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/users/register`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<AccountResponse>> {
    let Json(req) = body?;

    let user = state
        .accounts()
        .register(Registration {
            email: req.email.as_deref(),
            password: req.password.as_deref(),
            name: req.name.as_deref(),
            phone: req.phone.as_deref(),
        })
        .await?;

    Ok(Json(AccountResponse::new(&user, "User registered successfully")))
}

/// `POST /api/users/login`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AccountResponse>> {
    let Json(req) = body?;

    let password = req.password.as_deref().filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (present(req.email.as_deref()), password) else {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    };

    match state.accounts().authenticate(email, password).await? {
        Some(user) => Ok(Json(AccountResponse::new(&user, "Login successful"))),
        None => Err(ApiError::Unauthorized("Invalid email or password".to_string())),
    }
}

/// `GET /api/users/{email}`
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(email) = path?;

    let user = state
        .accounts()
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound(CoreError::UserNotFoundByEmail(email).to_string()))?;

    Ok(Json(json!({
        "id": user.id,
        "email": user.email,
        "firstName": user.first_name,
        "lastName": user.last_name,
        "phone": user.phone,
        "joinDate": user.join_date,
        "lastLogin": user.last_login,
    })))
}

/// `PUT /api/users/{email}`. Absent fields keep their stored value.
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(email) = path?;
    let Json(update) = body?;

    let user = state
        .accounts()
        .update_profile(&email, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound(CoreError::UserNotFoundByEmail(email).to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "User updated successfully",
        "user": {
            "id": user.id,
            "email": user.email,
            "firstName": user.first_name,
            "lastName": user.last_name,
        },
    })))
}

/// `POST /api/users/forgot-password`
///
/// The token is returned in the body; there is no mail delivery.
pub async fn forgot_password(
    State(state): State<AppState>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = body?;
    let email = present(req.email.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Email is required".to_string()))?;

    let token = match state.accounts().issue_reset_token(email).await {
        Ok(token) => token,
        Err(ServiceError::Core(CoreError::UserNotFoundByEmail(email))) => {
            return Err(ApiError::BadRequest(format!("No user found with email: {email}")));
        }
        Err(other) => return Err(other.into()),
    };

    Ok(Json(json!({
        "success": true,
        "message": "Password reset token generated. In a real app, this would be sent via email.",
        "resetToken": token,
    })))
}

/// `POST /api/users/reset-password`
pub async fn reset_password(
    State(state): State<AppState>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = body?;

    let (Some(email), Some(token), Some(new_password)) = (
        present(req.email.as_deref()),
        present(req.reset_token.as_deref()),
        req.new_password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Email, reset token, and new password are required".to_string(),
        ));
    };

    if !state.accounts().reset_password(email, token, new_password).await? {
        return Err(ApiError::BadRequest("Invalid or expired reset token".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Password reset successfully",
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::routes::test_support::{register, server};

    #[tokio::test]
    async fn test_register_and_login() {
        let (server, _) = server().await;

        let response = server
            .post("/api/users/register")
            .json(&json!({
                "email": "a@x.com",
                "password": "pw123456",
                "name": "Asha Rao",
                "phone": "9876543210",
            }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["name"], "Asha Rao");
        assert_eq!(body["message"], "User registered successfully");

        let response = server
            .post("/api/users/login")
            .json(&json!({"email": "a@x.com", "password": "pw123456"}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["message"], "Login successful");

        let profile = server.get("/api/users/a@x.com").await.json::<Value>();
        assert_eq!(profile["firstName"], "Asha");
        assert_eq!(profile["lastName"], "Rao");
        assert!(profile["lastLogin"].is_string());
    }

    #[tokio::test]
    async fn test_register_errors() {
        let (server, _) = server().await;
        register(&server, "a@x.com").await;

        let response = server
            .post("/api/users/register")
            .json(&json!({"email": "b@x.com", "password": "pw"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "Name, email, password, and phone are required"
        );

        let response = server
            .post("/api/users/register")
            .json(&json!({
                "email": "a@x.com",
                "password": "other",
                "name": "Someone Else",
                "phone": "1",
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User with email a@x.com already exists");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let (server, _) = server().await;
        register(&server, "a@x.com").await;

        let response = server
            .post("/api/users/login")
            .json(&json!({"email": "a@x.com"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Email and password are required");

        for (email, password) in [("a@x.com", "wrong"), ("nobody@x.com", "pw123456")] {
            let response = server
                .post("/api/users/login")
                .json(&json!({"email": email, "password": password}))
                .await;
            response.assert_status(StatusCode::UNAUTHORIZED);
            assert_eq!(response.json::<Value>()["message"], "Invalid email or password");
        }
    }

    #[tokio::test]
    async fn test_profile_update() {
        let (server, _) = server().await;
        register(&server, "a@x.com").await;

        let response = server
            .put("/api/users/a@x.com")
            .json(&json!({"lastName": "Kumar"}))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["user"]["firstName"], "Asha");
        assert_eq!(body["user"]["lastName"], "Kumar");

        server
            .put("/api/users/nobody@x.com")
            .json(&json!({"lastName": "Kumar"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/api/users/nobody@x.com")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let (server, _) = server().await;
        register(&server, "a@x.com").await;

        let response = server
            .post("/api/users/forgot-password")
            .json(&json!({"email": "a@x.com"}))
            .await;
        response.assert_status_ok();
        let token = response.json::<Value>()["resetToken"]
            .as_str()
            .unwrap()
            .to_string();

        let reset = json!({"email": "a@x.com", "resetToken": token, "newPassword": "fresh-pass"});
        let response = server.post("/api/users/reset-password").json(&reset).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["message"], "Password reset successfully");

        // Single use.
        let response = server.post("/api/users/reset-password").json(&reset).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Invalid or expired reset token");

        server
            .post("/api/users/login")
            .json(&json!({"email": "a@x.com", "password": "fresh-pass"}))
            .await
            .assert_status_ok();
        server
            .post("/api/users/login")
            .json(&json!({"email": "a@x.com", "password": "pw123456"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_password_reset_errors() {
        let (server, _) = server().await;

        let response = server
            .post("/api/users/forgot-password")
            .json(&json!({"email": "  "}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Email is required");

        let response = server
            .post("/api/users/forgot-password")
            .json(&json!({"email": "ghost@x.com"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "No user found with email: ghost@x.com"
        );

        let response = server
            .post("/api/users/reset-password")
            .json(&json!({"email": "ghost@x.com", "resetToken": "t"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "Email, reset token, and new password are required"
        );
    }
}
