use axum::{response::{Response, IntoResponse}};
use axum::http::StatusCode;
use axum::middleware::Next;
use uuid::Uuid;
use crate::auth::jwt::verify_token;
use serde::Serialize;

/// Identity of the caller, attached to the request once the token checks out.
/// Instrumented handlers record it via Debug.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: String,
    pub email: String,
}

#[derive(Serialize)]
struct ErrorBody { error: String, code: &'static str }

use axum::http::Request;

pub async fn require_auth(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let auth_header = match req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok()) {
        Some(h) => h,
        None => return unauthorized("Missing Authorization header"),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return unauthorized("Invalid Authorization format"),
    };

    let secret = match std::env::var("JWT_SECRET") {
        Ok(s) => s,
        Err(_) => return unauthorized("Server auth misconfiguration"),
    };

    let claims = match verify_token(token, &secret) {
        Ok(c) => c,
        Err(_) => return unauthorized("Invalid or expired token"),
    };

    // Attach context
    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        role: claims.role,
        email: claims.email,
    });

    next.run(req).await
}

fn unauthorized(msg: &str) -> Response {
    let body = axum::Json(ErrorBody { error: msg.to_string(), code: "unauthorized" });
    (StatusCode::UNAUTHORIZED, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_context_renders_in_debug_logs() {
        let ctx = AuthContext {
            user_id: Uuid::new_v4(),
            role: "farmer".to_string(),
            email: "ama@example.com".to_string(),
        };
        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("farmer"));
        assert!(rendered.contains("ama@example.com"));
    }
}
