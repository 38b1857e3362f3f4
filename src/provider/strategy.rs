//! Capability traits the host framework and the OAuth client use to drive a strategy.
//!
//! A strategy composes a generic [`OAuth2Client`](crate::flows::OAuth2Client) and exposes
//! its provider-specific behavior through small traits instead of overriding methods:
//! [`ProfileSource`] for the user-info step and [`TokenParams`] for extra token request
//! fields. The host supplies a [`Verify`] continuation that resolves its own user record.

// self
use crate::{
	_prelude::*,
	auth::{IssuedTokens, TokenSecret},
	provider::Profile,
};

/// Boxed future returned by [`ProfileSource::user_profile`].
pub type ProfileFuture<'a> = Pin<Box<dyn Future<Output = Result<Profile>> + 'a + Send>>;
/// Boxed future returned by [`Verify::verify`].
pub type VerifyFuture<'a, U> =
	Pin<Box<dyn Future<Output = Result<Option<U>, BoxError>> + 'a + Send>>;

/// Named authentication adapter registered with the host framework.
pub trait Strategy: ProfileSource + TokenParams {
	/// Unique registry name.
	fn name(&self) -> &str;
}

/// Strategies that can turn an access token into a normalized [`Profile`].
pub trait ProfileSource: Send + Sync {
	/// Fetches and normalizes the authenticated user's profile.
	///
	/// Resolves exactly once, to either the profile or the failure.
	fn user_profile<'a>(&'a self, access_token: &'a TokenSecret) -> ProfileFuture<'a>;
}

/// Strategies that add provider-required fields to the token exchange request.
pub trait TokenParams: Send + Sync {
	/// Returns `params` augmented with provider-specific entries.
	///
	/// The default implementation passes the parameters through unchanged.
	fn token_params(&self, params: Option<BTreeMap<String, String>>) -> BTreeMap<String, String> {
		params.unwrap_or_default()
	}
}

/// Host continuation invoked once tokens and the profile are available.
///
/// `Ok(None)` means the host rejected the credentials; `Err` means it failed to decide.
/// Any `Fn(IssuedTokens, Profile) -> impl Future<Output = Result<Option<U>, BoxError>>`
/// closure implements this trait.
pub trait Verify: Send + Sync {
	/// Application user type resolved by the host.
	type User: Send;

	/// Resolves the application user for the authenticated profile.
	fn verify(&self, tokens: IssuedTokens, profile: Profile) -> VerifyFuture<'_, Self::User>;
}
impl<F, Fut, U> Verify for F
where
	F: Send + Sync + Fn(IssuedTokens, Profile) -> Fut,
	Fut: 'static + Send + Future<Output = Result<Option<U>, BoxError>>,
	U: Send,
{
	type User = U;

	fn verify(&self, tokens: IssuedTokens, profile: Profile) -> VerifyFuture<'_, Self::User> {
		Box::pin(self(tokens, profile))
	}
}
