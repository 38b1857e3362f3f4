//! Wegene login strategy.
//!
//! Wegene follows the plain authorization-code flow with two quirks: the token endpoint
//! expects the requested scope to be echoed on the exchange request, and the profile
//! lives at a fixed user-info endpoint that returns `{ "id", "email", ... }`.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::ProfileError,
	flows::{AuthorizationSession, CallbackParams, OAuth2Client, TokenPresentation},
	http::{Endpoint, TokenHttpClient},
	oauth::TransportErrorMapper,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{
		Profile, ProfileFuture, ProfileSource, Strategy, StrategyConfig, StrategyOptions,
		TokenParams, Verify,
	},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Registry name and `Profile::provider` label.
pub const STRATEGY_NAME: &str = "Wegene";
/// Default authorization endpoint.
pub const AUTHORIZATION_URL: &str = "https://api.wegene.com/authorize/";
/// Default token endpoint.
pub const TOKEN_URL: &str = "https://api.wegene.com/token/";
/// User-info endpoint; not configurable.
pub const USER_INFO_URL: &str = "https://api.wegene.com/user/";
/// Scopes every authorization request carries.
pub const REQUIRED_SCOPES: [&str; 2] = ["basic", "email"];
/// Default `response_type`.
pub const RESPONSE_TYPE: &str = "code";
/// Default scope separator.
pub const SCOPE_SEPARATOR: &str = " ";

/// Strategy specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestWegeneStrategy<V> =
	WegeneStrategy<V, ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Wegene authentication strategy.
///
/// Owns a generic [`OAuth2Client`] configured with Wegene defaults and a host-supplied
/// [`Verify`] continuation that turns the authenticated profile into an application user.
pub struct WegeneStrategy<V, C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: OAuth2Client<C, M>,
	verify: V,
}
impl<V, C, M> WegeneStrategy<V, C, M>
where
	V: Verify,
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds a strategy on top of a caller-provided transport + mapper pair.
	///
	/// Performs no network I/O; configuration problems surface as [`Error::Config`].
	pub fn with_http_client(
		options: StrategyOptions,
		verify: V,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let config = options.resolve()?;
		let client = OAuth2Client::new(config, http_client, mapper)?;

		Ok(Self { client, verify })
	}

	/// Resolved configuration.
	pub fn config(&self) -> &StrategyConfig {
		self.client.config()
	}

	/// Underlying generic client.
	pub fn client(&self) -> &OAuth2Client<C, M> {
		&self.client
	}

	/// Builds the Wegene consent redirect.
	pub fn start_authorization(&self) -> AuthorizationSession {
		self.client.start_authorization()
	}

	/// Completes a login from the provider callback and runs the verify continuation.
	///
	/// `Ok(None)` means the host rejected the authenticated user.
	pub async fn authenticate(
		&self,
		session: &AuthorizationSession,
		callback: CallbackParams,
	) -> Result<Option<V::User>> {
		let (tokens, profile) = self.client.complete_authorization(self, session, callback).await?;

		self.verify.verify(tokens, profile).await.map_err(|source| Error::Verify { source })
	}

	async fn fetch_profile(&self, access_token: &TokenSecret) -> Result<Profile> {
		const KIND: FlowKind = FlowKind::UserProfile;

		let span = FlowSpan::new(KIND, "user_profile");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = &self.client.config().endpoints.user_info;
				let body = self
					.client
					.get(Endpoint::UserInfo, url, access_token, TokenPresentation::Header)
					.await
					.map_err(ProfileError::fetch)?;

				Ok(Profile::from_json(STRATEGY_NAME, &body)?)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
#[cfg(feature = "reqwest")]
impl<V> WegeneStrategy<V, ReqwestHttpClient, ReqwestTransportErrorMapper>
where
	V: Verify,
{
	/// Builds a strategy backed by the crate's reqwest transport.
	pub fn new(options: StrategyOptions, verify: V) -> Result<Self> {
		Self::with_http_client(
			options,
			verify,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		)
	}
}
impl<V, C, M> Strategy for WegeneStrategy<V, C, M>
where
	V: Verify,
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn name(&self) -> &str {
		STRATEGY_NAME
	}
}
impl<V, C, M> ProfileSource for WegeneStrategy<V, C, M>
where
	V: Verify,
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn user_profile<'a>(&'a self, access_token: &'a TokenSecret) -> ProfileFuture<'a> {
		Box::pin(self.fetch_profile(access_token))
	}
}
impl<V, C, M> TokenParams for WegeneStrategy<V, C, M>
where
	V: Verify,
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn token_params(&self, params: Option<BTreeMap<String, String>>) -> BTreeMap<String, String> {
		let mut params = params.unwrap_or_default();

		params.insert("scope".into(), self.config().joined_scope());

		params
	}
}
impl<V, C, M> Debug for WegeneStrategy<V, C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WegeneStrategy").field("client", &self.client).finish()
	}
}
