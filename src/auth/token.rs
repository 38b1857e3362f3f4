//! Tokens issued by the authorization-code exchange.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Tokens handed to the verify continuation after a successful code exchange.
///
/// The strategy never stores these; ownership moves to the host with the profile.
#[derive(Clone, Serialize, Deserialize)]
pub struct IssuedTokens {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Granted scopes joined with the configured separator, when the provider echoes them.
	pub scope: Option<String>,
	/// Instant the response was received.
	pub issued_at: OffsetDateTime,
	/// Expiry derived from `expires_in`, when supplied.
	pub expires_at: Option<OffsetDateTime>,
}
impl IssuedTokens {
	/// Creates a record for an access token issued at `issued_at`.
	pub fn new(access_token: impl Into<String>, issued_at: OffsetDateTime) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			scope: None,
			issued_at,
			expires_at: None,
		}
	}

	/// Returns `true` if the access token has expired at the provided instant.
	///
	/// Tokens without a known expiry never report as expired.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}
}
impl Debug for IssuedTokens {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IssuedTokens")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
