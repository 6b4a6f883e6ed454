//! Bearer token verification.
//!
//! Callers authenticate with an HS256 JSON Web Token issued by the hosting
//! platform. The `sub` claim is the user id; `role` optionally grants
//! service-level access (e.g. the all-users regeneration batch).

use base64::prelude::*;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Claims this service reads from a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default)]
    typ: Option<String>,
}

/// Extract the token from an `Authorization` header value.
pub fn bearer_token(header_value: Option<&str>) -> Result<&str, AuthError> {
    let value = header_value.ok_or(AuthError::MissingToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(AuthError::MissingToken)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str, what: &str) -> Result<T, AuthError> {
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::Malformed(format!("{what}: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::Malformed(format!("{what}: {e}")))
}

/// Verifies (and, for tooling, issues) HS256 tokens for one issuer.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: Vec<u8>,
    issuer: String,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(secret: impl AsRef<[u8]>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            issuer: issuer.into(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take keys of any size")
    }

    /// Check signature, issuer and expiry, returning the claims.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::Malformed("expected three segments".into()));
        };

        let header: Header = decode_segment(header_b64, "header")?;
        if header.alg != "HS256" {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }

        let signature = BASE64_URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|e| AuthError::Malformed(format!("signature: {e}")))?;
        let mut mac = self.mac();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let claims: Claims = decode_segment(payload_b64, "payload")?;
        if claims.iss != self.issuer {
            return Err(AuthError::WrongIssuer(claims.iss));
        }
        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }
        if claims.sub.trim().is_empty() {
            return Err(AuthError::Malformed("empty subject".into()));
        }
        Ok(claims)
    }

    /// Sign a token for `sub` valid for `ttl`.
    pub fn issue(&self, sub: &str, role: Option<&str>, ttl: Duration, now: DateTime<Utc>) -> String {
        let header = Header {
            alg: "HS256".into(),
            typ: Some("JWT".into()),
        };
        let claims = Claims {
            sub: sub.to_string(),
            iss: self.issuer.clone(),
            exp: now.timestamp().saturating_add(ttl.num_seconds()),
            iat: Some(now.timestamp()),
            role: role.map(str::to_string),
        };
        // Plain structs of strings and integers always serialize.
        let header_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap_or_default());
        let payload_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap_or_default());

        let mut mac = self.mac();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        let signature = BASE64_URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{header_b64}.{payload_b64}.{signature}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new("test-secret", "aetherday")
    }

    #[test]
    fn issued_token_verifies() {
        let token = verifier().issue("u-1", None, Duration::hours(1), now());
        let claims = verifier().verify(&token, now()).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert!(!claims.has_role("service_role"));
    }

    #[test]
    fn huge_lifetime_saturates_expiry() {
        let token = verifier().issue("u-1", None, Duration::MAX, now());
        let claims = verifier().verify(&token, now()).unwrap();
        assert!(claims.exp > now().timestamp());
    }

    #[test]
    fn wrong_secret_fails_signature() {
        let token = TokenVerifier::new("other", "aetherday").issue("u-1", None, Duration::hours(1), now());
        assert_eq!(verifier().verify(&token, now()), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn wrong_issuer_and_expiry_are_rejected() {
        let token = TokenVerifier::new("test-secret", "elsewhere").issue("u-1", None, Duration::hours(1), now());
        assert!(matches!(verifier().verify(&token, now()), Err(AuthError::WrongIssuer(_))));

        let token = verifier().issue("u-1", None, Duration::hours(1), now());
        assert_eq!(
            verifier().verify(&token, now() + Duration::hours(2)),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn tampered_payload_fails() {
        let token = verifier().issue("u-1", None, Duration::hours(1), now());
        let other = verifier().issue("u-2", None, Duration::hours(1), now());
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        assert_eq!(
            verifier().verify(&parts.join("."), now()),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(Some("Basic abc")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer   ")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(verifier().verify("nope", now()), Err(AuthError::Malformed(_))));
    }
}
