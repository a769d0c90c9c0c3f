use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use alms_db::Database;
use alms_notify::Notifier;
use alms_types::api::{Claims, LoginRequest, LoginResponse, SignupRequest, SignupResponse};
use alms_types::models::User;

use crate::convert;
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub notifier: Arc<dyn Notifier>,
}

const MIN_PASSWORD_LEN: usize = 8;

fn is_valid_username(username: &str) -> bool {
    (4..=15).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Shape check only: `local@domain.tld`, no whitespace.
fn looks_like_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty() && !name.is_empty() && !tld.is_empty()
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(username), Some(email), Some(password)) = (req.username, req.email, req.password)
    else {
        return Err(ApiError::bad_request("Provide all credentials"));
    };
    let username = username.trim().to_string();
    let email = email.trim().to_lowercase();

    if !is_valid_username(&username) {
        return Err(ApiError::bad_request("Enter a valid username"));
    }
    if !looks_like_email(&email) {
        return Err(ApiError::bad_request("Please provide a valid email"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    if state.db.user_by_username(&username)?.is_some() {
        return Err(ApiError::conflict("Username already registered"));
    }
    if state.db.user_by_email(&email)?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();

    let user_id = Uuid::new_v4();
    state
        .db
        .create_user(&user_id.to_string(), &username, &email, &password_hash)
        .map_err(|e| {
            // Lost a race with a concurrent signup for the same name/email.
            if alms_db::is_constraint_violation(&e) {
                ApiError::conflict("Username or email already registered")
            } else {
                ApiError::Internal(e)
            }
        })?;

    let user = User {
        id: user_id,
        username,
        email,
        created_at: chrono::Utc::now(),
    };

    Ok((StatusCode::CREATED, Json(SignupResponse { user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(username_or_email), Some(password)) = (req.username_or_email, req.password) else {
        return Err(ApiError::bad_request("Provide all credentials"));
    };

    let row = if looks_like_email(&username_or_email) {
        state.db.user_by_email(&username_or_email.to_lowercase())?
    } else {
        state.db.user_by_username(&username_or_email)?
    };
    // Same answer for unknown user and wrong password.
    let row = row.ok_or_else(|| ApiError::bad_request("Invalid credentials"))?;

    let parsed_hash = PasswordHash::new(&row.password)
        .map_err(|e| anyhow::anyhow!("stored password hash unreadable: {}", e))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::bad_request("Invalid credentials"))?;

    let user = convert::user(row);
    let token = create_token(&state.jwt_secret, user.id, &user.username)?;

    Ok(Json(LoginResponse { user, token }))
}

fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_policy() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("al_ce-99"));
        assert!(!is_valid_username("abc")); // too short
        assert!(!is_valid_username("a-very-long-username"));
        assert!(!is_valid_username("white space"));
        assert!(!is_valid_username("émile"));
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(looks_like_email("first.last@mail.example.org"));
        assert!(!looks_like_email("plainstring"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@bco"));
        assert!(!looks_like_email("a b@c.co"));
        assert!(!looks_like_email("a@.co"));
        assert!(!looks_like_email("a@b."));
    }

    #[test]
    fn token_roundtrip() {
        use jsonwebtoken::{DecodingKey, Validation, decode};

        let id = Uuid::new_v4();
        let token = create_token("secret", id, "alice").unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, id);
        assert_eq!(data.claims.username, "alice");

        assert!(
            decode::<Claims>(
                &token,
                &DecodingKey::from_secret(b"other-secret"),
                &Validation::default(),
            )
            .is_err()
        );
    }
}
