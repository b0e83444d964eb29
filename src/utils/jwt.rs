use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use serde::{Deserialize, Serialize};
use rocket_okapi::request::OpenApiFromRequest;

use crate::config::AppConfig;
use crate::models::user::UserRole;
use crate::utils::error::AppError;

const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // user_id
    pub school_id: String,
    pub role: UserRole,
    pub exp: usize,
}

/// Who is calling, for which school, and the token to forward to the
/// persistence API. Handed explicitly to every service call.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct SchoolContext {
    pub user_id: String,
    pub school_id: String,
    pub role: UserRole,
    pub token: String,
}

pub fn issue_token(
    user_id: &str,
    school_id: &str,
    role: UserRole,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        school_id: school_id.to_string(),
        role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_context(token: &str, secret: &str) -> Result<SchoolContext, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::AuthError(e.to_string()))?;

    Ok(SchoolContext {
        user_id: token_data.claims.sub,
        school_id: token_data.claims.school_id,
        role: token_data.claims.role,
        token: token.to_string(),
    })
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SchoolContext {
    type Error = AppError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match request.headers().get_one("Authorization") {
            Some(token) if token.starts_with("Bearer ") => token[7..].trim(),
            _ => {
                return Outcome::Error((
                    Status::Unauthorized,
                    AppError::AuthError("Missing bearer token".into()),
                ))
            }
        };

        let config = match request.rocket().state::<AppConfig>() {
            Some(config) => config,
            None => {
                return Outcome::Error((
                    Status::InternalServerError,
                    AppError::ConfigError("AppConfig is not managed".into()),
                ))
            }
        };

        match decode_context(token, &config.jwt_secret) {
            Ok(context) => Outcome::Success(context),
            Err(e) => {
                tracing::warn!(error = %e, "rejected bearer token");
                Outcome::Error((Status::Unauthorized, e))
            }
        }
    }
}
