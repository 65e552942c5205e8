//! OAuth token types shared by the cache, its stores and the OAuth client.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for any TTL; keeps chrono arithmetic in range.
const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Which of a customer's tokens a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Client-credentials token used for consent management.
    Client,
    /// Authorization-code access token.
    Access,
    /// Refresh token paired with the access token.
    Refresh,
}

/// A secret together with the instant it stops being usable.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSlot {
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenSlot {
    /// Slot issued now.
    ///
    /// `expires_at = now + ttl - safety_margin`; a TTL shorter than the margin
    /// produces a slot that is already dead.
    pub fn issue(secret: impl Into<String>, ttl: Duration, safety_margin: Duration) -> Self {
        Self::issued_at(secret, Utc::now(), ttl, safety_margin)
    }

    /// Slot issued at `issued_at`.
    pub fn issued_at(
        secret: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        safety_margin: Duration,
    ) -> Self {
        let lifetime = to_chrono(ttl) - to_chrono(safety_margin);
        Self { secret: secret.into(), expires_at: issued_at + lifetime }
    }

    /// True while the slot has not reached `expires_at`.
    pub fn is_alive(&self) -> bool {
        self.is_alive_at(Utc::now())
    }

    pub fn is_alive_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Seconds left before expiry, negative once expired.
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

impl fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSlot")
            .field("secret", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    let secs = duration.as_secs().min(MAX_TTL_SECS);
    chrono::Duration::seconds(i64::try_from(secs).unwrap_or_default())
}

/// Every token the cache holds for one customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<TokenSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<TokenSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<TokenSlot>,
}

impl CustomerTokens {
    pub fn slot(&self, kind: TokenKind) -> Option<&TokenSlot> {
        match kind {
            TokenKind::Client => self.client.as_ref(),
            TokenKind::Access => self.access.as_ref(),
            TokenKind::Refresh => self.refresh.as_ref(),
        }
    }

    pub fn set(&mut self, kind: TokenKind, slot: TokenSlot) {
        match kind {
            TokenKind::Client => self.client = Some(slot),
            TokenKind::Access => self.access = Some(slot),
            TokenKind::Refresh => self.refresh = Some(slot),
        }
    }

    /// The secret of `kind` if that slot exists and is alive.
    pub fn live_secret(&self, kind: TokenKind) -> Option<&str> {
        self.slot(kind).filter(|slot| slot.is_alive()).map(|slot| slot.secret.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.client.is_none() && self.access.is_none() && self.refresh.is_none()
    }

    /// Whether the customer went through authorization (an access or
    /// refresh slot exists); a cached client token alone does not count.
    pub fn is_authorized(&self) -> bool {
        self.access.is_some() || self.refresh.is_some()
    }
}

/// Customer code to tokens, ordered for stable persistence.
pub type TokenMap = BTreeMap<String, CustomerTokens>;

/// Body of a successful OAuth token endpoint response.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

impl TokenGrant {
    pub fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expires_in)
    }
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("id_token", &self.id_token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_subtracts_safety_margin() {
        let issued = Utc::now();
        let slot = TokenSlot::issued_at("t", issued, Duration::from_secs(3600), Duration::from_secs(30));

        assert_eq!(slot.expires_at, issued + chrono::Duration::seconds(3570));
        assert!(slot.is_alive_at(issued + chrono::Duration::seconds(3569)));
        assert!(!slot.is_alive_at(issued + chrono::Duration::seconds(3570)));
    }

    #[test]
    fn ttl_shorter_than_margin_is_already_dead() {
        let slot = TokenSlot::issue("t", Duration::from_secs(10), Duration::from_secs(30));
        assert!(!slot.is_alive());
        assert!(slot.seconds_until_expiry() < 0);
    }

    #[test]
    fn empty_slots_are_omitted_from_json() {
        let mut tokens = CustomerTokens::default();
        assert!(tokens.is_empty());

        tokens.set(TokenKind::Access, TokenSlot::issue("a", Duration::from_secs(60), Duration::ZERO));
        let json = serde_json::to_value(&tokens).unwrap();

        assert!(json.get("access").is_some());
        assert!(json.get("refresh").is_none());
        assert_eq!(tokens.live_secret(TokenKind::Access), Some("a"));
        assert_eq!(tokens.live_secret(TokenKind::Refresh), None);
    }

    #[test]
    fn client_token_alone_is_not_an_authorization() {
        let mut tokens = CustomerTokens::default();
        tokens.set(TokenKind::Client, TokenSlot::issue("c", Duration::from_secs(60), Duration::ZERO));
        assert!(!tokens.is_authorized());

        tokens.set(TokenKind::Refresh, TokenSlot::issue("r", Duration::from_secs(60), Duration::ZERO));
        assert!(tokens.is_authorized());
    }

    #[test]
    fn debug_never_prints_secrets() {
        let slot = TokenSlot::issue("super-secret", Duration::from_secs(60), Duration::ZERO);
        assert!(!format!("{slot:?}").contains("super-secret"));

        let grant: TokenGrant = serde_json::from_str(
            r#"{"access_token": "acc-secret", "refresh_token": "ref-secret", "expires_in": 86400}"#,
        )
        .unwrap();
        let rendered = format!("{grant:?}");
        assert!(!rendered.contains("acc-secret"));
        assert!(!rendered.contains("ref-secret"));
        assert_eq!(grant.expires_in(), Duration::from_secs(86400));
    }
}
