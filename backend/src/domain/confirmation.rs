//! Email confirmation codes and the pending records that hold them.
//!
//! A code has the shape `<issued-at, base36>-<20 hex chars>`. The hex part is
//! a truncated HMAC-SHA256 over the user's id, username, email and the issue
//! timestamp, so a code stops validating once any of those change.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::{EmailAddress, User, Username};

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of a pending confirmation.
pub const CONFIRMATION_TTL_MINUTES: i64 = 5;

const TAG_BYTES: usize = 10;

/// Lifetime of a pending confirmation as a [`Duration`].
pub fn confirmation_ttl() -> Duration {
    Duration::minutes(CONFIRMATION_TTL_MINUTES)
}

/// Opaque confirmation code as delivered by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Wrap a submitted code; blank input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ConfirmationCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Confirmation awaiting exchange for an access token.
///
/// ## Invariants
/// - At most one record exists per email address.
/// - A record is expired once `expires_at <= now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub username: Username,
    pub email: EmailAddress,
    pub code: ConfirmationCode,
    pub expires_at: DateTime<Utc>,
}

impl PendingConfirmation {
    /// Start a confirmation window at `now`.
    pub fn issue(
        username: Username,
        email: EmailAddress,
        code: ConfirmationCode,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            email,
            code,
            expires_at: now + confirmation_ttl(),
        }
    }

    /// Whether the window has closed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether `code` is the one stored on this record.
    pub fn matches(&self, code: &ConfirmationCode) -> bool {
        self.code == *code
    }
}

/// Error raised when the signing key cannot seed the MAC.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("confirmation signing key rejected: {message}")]
pub struct SignerKeyError {
    message: String,
}

/// Issues and checks confirmation codes bound to a user's identity.
#[derive(Clone)]
pub struct ConfirmationCodeSigner {
    mac: HmacSha256,
}

impl ConfirmationCodeSigner {
    /// Build a signer from secret key material.
    pub fn new(key: &Zeroizing<Vec<u8>>) -> Result<Self, SignerKeyError> {
        let mac = HmacSha256::new_from_slice(key.as_slice()).map_err(|err| SignerKeyError {
            message: err.to_string(),
        })?;
        Ok(Self { mac })
    }

    /// Produce a fresh code for `user`.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> ConfirmationCode {
        let issued_at = now.timestamp();
        let tag = self.tag(user, issued_at).finalize().into_bytes();
        let truncated = tag.get(..TAG_BYTES).unwrap_or(tag.as_slice());
        ConfirmationCode(format!(
            "{}-{}",
            to_base36(u64::try_from(issued_at).unwrap_or(0)),
            hex::encode(truncated)
        ))
    }

    /// Check that `code` was issued for `user` within the confirmation window.
    pub fn verify(&self, user: &User, code: &ConfirmationCode, now: DateTime<Utc>) -> bool {
        let Some((stamp, tag_hex)) = code.as_ref().split_once('-') else {
            return false;
        };
        let Some(issued_at) = u64::from_str_radix(stamp, 36)
            .ok()
            .and_then(|value| i64::try_from(value).ok())
        else {
            return false;
        };
        let age = now.timestamp().saturating_sub(issued_at);
        if !(0..=confirmation_ttl().num_seconds()).contains(&age) {
            return false;
        }
        let Ok(tag) = hex::decode(tag_hex) else {
            return false;
        };
        if tag.len() != TAG_BYTES {
            return false;
        }
        self.tag(user, issued_at).verify_truncated_left(&tag).is_ok()
    }

    fn tag(&self, user: &User, issued_at: i64) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(
            format!(
                "{}|{}|{}|{}",
                user.id, user.username, user.email, issued_at
            )
            .as_bytes(),
        );
        mac
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or(0);
        out.push(DIGITS.get(digit).copied().unwrap_or(b'0'));
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    //! Signing, verification and expiry of confirmation codes.
    use super::*;
    use crate::domain::{Role, UserId};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid instant")
    }

    #[fixture]
    fn signer() -> ConfirmationCodeSigner {
        ConfirmationCodeSigner::new(&Zeroizing::new(b"0123456789abcdef0123456789abcdef".to_vec()))
            .expect("signer")
    }

    #[fixture]
    fn user() -> User {
        User {
            id: UserId::new(7),
            username: Username::new("ada").expect("valid"),
            email: EmailAddress::new("ada@example.com").expect("valid"),
            role: Role::User,
            bio: None,
            first_name: None,
            last_name: None,
            is_staff: false,
        }
    }

    #[rstest]
    fn issued_code_verifies(signer: ConfirmationCodeSigner, user: User, now: DateTime<Utc>) {
        let code = signer.issue(&user, now);
        assert!(signer.verify(&user, &code, now + Duration::minutes(4)));
    }

    #[rstest]
    fn code_shape_is_stamp_dash_hex(signer: ConfirmationCodeSigner, user: User, now: DateTime<Utc>) {
        let code = signer.issue(&user, now);
        let (stamp, tag) = code.as_ref().split_once('-').expect("dash separated");
        assert_eq!(u64::from_str_radix(stamp, 36).ok(), u64::try_from(now.timestamp()).ok());
        assert_eq!(tag.len(), TAG_BYTES * 2);
    }

    #[rstest]
    fn code_is_bound_to_identity(signer: ConfirmationCodeSigner, user: User, now: DateTime<Utc>) {
        let code = signer.issue(&user, now);
        let mut other = user.clone();
        other.email = EmailAddress::new("eve@example.com").expect("valid");
        assert!(!signer.verify(&other, &code, now));
    }

    #[rstest]
    fn stale_code_is_rejected(signer: ConfirmationCodeSigner, user: User, now: DateTime<Utc>) {
        let code = signer.issue(&user, now);
        assert!(!signer.verify(&user, &code, now + Duration::minutes(6)));
    }

    #[rstest]
    #[case("garbage")]
    #[case("zz-nothex")]
    #[case("abc-00")]
    fn malformed_codes_are_rejected(
        signer: ConfirmationCodeSigner,
        user: User,
        now: DateTime<Utc>,
        #[case] raw: &str,
    ) {
        let code = ConfirmationCode::new(raw).expect("non-empty");
        assert!(!signer.verify(&user, &code, now));
    }

    #[rstest]
    fn pending_record_expires_at_deadline(user: User, now: DateTime<Utc>) {
        let pending = PendingConfirmation::issue(
            user.username,
            user.email,
            ConfirmationCode::new("x-y").expect("non-empty"),
            now,
        );
        assert!(!pending.is_expired(now + Duration::minutes(4)));
        assert!(pending.is_expired(now + confirmation_ttl()));
    }

    #[rstest]
    #[case("   ", None)]
    #[case(" abc ", Some("abc"))]
    fn blank_codes_are_none(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            ConfirmationCode::new(raw).map(|code| code.to_string()),
            expected.map(str::to_owned)
        );
    }

    #[rstest]
    #[case(0, "0")]
    #[case(35, "z")]
    #[case(36, "10")]
    fn base36_encoding(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(to_base36(value), expected);
    }
}
