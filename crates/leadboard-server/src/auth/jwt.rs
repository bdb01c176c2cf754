use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Encode a session token for `user`, valid for `lifetime`.
///
/// Returns (token_string, expiry).
pub fn encode_jwt(secret: &str, user: &str, lifetime: std::time::Duration) -> Result<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let lifetime = Duration::from_std(lifetime).map_err(|e| anyhow!("encode_jwt: {}", e))?;
    let exp = now + lifetime;

    let claims = Claims {
        sub: user.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow!("encode_jwt: {}", e))?;

    Ok((token, exp))
}

/// Decode and validate a session token (signature and expiry).
pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| anyhow!("decode_jwt: {}", e))?;

    Ok(data.claims)
}

/// 64 random alphanumeric characters.
pub fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
