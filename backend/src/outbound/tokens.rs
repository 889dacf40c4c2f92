//! HS256 JSON Web Tokens for bearer authentication.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{AccessTokenError, AccessTokenIssuer};
use crate::domain::{AccessToken, User, UserId};

const TOKEN_TYPE: &str = "access";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    iat: i64,
    exp: i64,
    token_type: String,
}

/// Issues and verifies access tokens signed with a shared secret.
///
/// Expiry is checked against the caller-supplied instant rather than the
/// system clock.
#[derive(Clone)]
pub struct JwtAccessTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtAccessTokenIssuer {
    /// Issuer signing with `secret`; tokens live for `ttl`.
    pub fn new(secret: &Zeroizing<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_slice()),
            decoding: DecodingKey::from_secret(secret.as_slice()),
            ttl,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl AccessTokenIssuer for JwtAccessTokenIssuer {
    fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<AccessToken, AccessTokenError> {
        let claims = Claims {
            sub: user.id.get().to_string(),
            username: user.username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            token_type: TOKEN_TYPE.to_owned(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| AccessTokenError::encode(err.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AccessTokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|err| AccessTokenError::invalid(err.to_string()))?;
        let claims = data.claims;
        if claims.token_type != TOKEN_TYPE {
            return Err(AccessTokenError::invalid(format!(
                "unexpected token type `{}`",
                claims.token_type
            )));
        }
        if claims.exp <= now.timestamp() {
            return Err(AccessTokenError::expired());
        }
        claims
            .sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|err| AccessTokenError::invalid(format!("bad subject: {err}")))
    }
}
