use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::Claims;
use crate::error::AppError;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn make_access_claims(subject: &str, ttl_secs: usize) -> Claims {
    let iat = now_unix();
    Claims {
        sub: subject.to_string(),
        iat,
        exp: iat + ttl_secs,
    }
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
}

pub fn decode_token(keys: &JwtKeys, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &keys.dec, &validation)?;
    if data.claims.sub.trim().is_empty() {
        return Err(AppError::unauthorized("Token has no subject"));
    }
    Ok(data.claims)
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::unauthorized(format!("Invalid or expired token: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::{JwtKeys, decode_token, encode_token, make_access_claims};
    use crate::error::AppError;

    #[test]
    fn makes_claims_with_expected_subject_and_ttl() {
        let claims = make_access_claims("user-42", 60);

        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.exp.saturating_sub(claims.iat), 60);
    }

    #[test]
    fn token_round_trips_with_same_secret() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = make_access_claims("user-42", 600);
        let token = encode_token(&keys, &claims).expect("token should encode");

        let decoded = decode_token(&keys, &token).expect("token should decode");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn token_signed_with_other_secret_is_unauthorized() {
        let claims = make_access_claims("user-42", 600);
        let token = encode_token(&JwtKeys::from_secret(b"other-secret"), &claims)
            .expect("token should encode");

        let err = decode_token(&JwtKeys::from_secret(b"unit-test-secret"), &token)
            .expect_err("signature check should fail");
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(err.message().starts_with("Invalid or expired token:"));
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let token = encode_token(&keys, &make_access_claims("  ", 600)).expect("encode");

        let err = decode_token(&keys, &token).expect_err("blank subject should fail");
        assert_eq!(err.message(), "Token has no subject");
    }
}
