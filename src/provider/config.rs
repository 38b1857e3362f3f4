//! Strategy options and their resolved, immutable form.
//!
//! [`StrategyOptions`] is what hosts build or deserialize; every field is optional so
//! partially specified configuration files are accepted. [`StrategyOptions::resolve`]
//! is a pure function that fills provider defaults, enforces the required-scope union,
//! and returns a [`StrategyConfig`] that is never mutated afterwards.

// self
use crate::{
	_prelude::*,
	auth::{ScopeList, TokenSecret},
	error::ConfigError,
	provider::wegene,
};

/// Client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	#[default]
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Caller-supplied strategy options.
///
/// Empty strings are treated the same as unset values.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct StrategyOptions {
	/// Application key issued by the provider.
	pub client_id: Option<String>,
	/// Application secret issued by the provider.
	pub client_secret: Option<String>,
	/// URL the provider redirects to after consent.
	pub callback_url: Option<String>,
	/// Authorization endpoint override.
	pub authorization_url: Option<String>,
	/// Token endpoint override.
	pub token_url: Option<String>,
	/// `response_type` sent on the authorization request.
	pub response_type: Option<String>,
	/// Requested scopes; the required provider scopes are always added.
	pub scope: Option<Vec<String>>,
	/// Separator used to join scopes on the wire.
	pub scope_separator: Option<String>,
	/// Client authentication mode for the token endpoint.
	pub client_auth_method: Option<ClientAuthMethod>,
	/// Attach an S256 PKCE challenge to authorization requests.
	pub pkce: bool,
}
impl StrategyOptions {
	/// Seeds options with the required credentials and callback URL.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		callback_url: impl Into<String>,
	) -> Self {
		Self {
			client_id: Some(client_id.into()),
			client_secret: Some(client_secret.into()),
			callback_url: Some(callback_url.into()),
			..Default::default()
		}
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_url(mut self, url: impl Into<String>) -> Self {
		self.authorization_url = Some(url.into());

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = Some(url.into());

		self
	}

	/// Overrides the `response_type` parameter.
	pub fn response_type(mut self, response_type: impl Into<String>) -> Self {
		self.response_type = Some(response_type.into());

		self
	}

	/// Sets the requested scopes (in request order).
	///
	/// Each entry must be a single non-empty scope token without whitespace, and must not
	/// contain the configured [`scope_separator`](Self::scope_separator); otherwise
	/// [`resolve`](Self::resolve) fails with [`ConfigError::InvalidScope`].
	pub fn scope<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scope = Some(scopes.into_iter().map(Into::into).collect());

		self
	}

	/// Overrides the scope separator.
	pub fn scope_separator(mut self, separator: impl Into<String>) -> Self {
		self.scope_separator = Some(separator.into());

		self
	}

	/// Overrides the client authentication mode.
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = Some(method);

		self
	}

	/// Enables or disables PKCE on authorization requests.
	pub fn pkce(mut self, enabled: bool) -> Self {
		self.pkce = enabled;

		self
	}

	/// Fills every unset option with the provider default and validates the result.
	pub fn resolve(self) -> Result<StrategyConfig, ConfigError> {
		let client_id = required(self.client_id, "client_id")?;
		let client_secret = required(self.client_secret, "client_secret")?;
		let callback_url = parse_url(&required(self.callback_url, "callback_url")?, "callback_url")?;
		let authorization = parse_url(
			&non_empty(self.authorization_url).unwrap_or_else(|| wegene::AUTHORIZATION_URL.into()),
			"authorization_url",
		)?;
		let token = parse_url(
			&non_empty(self.token_url).unwrap_or_else(|| wegene::TOKEN_URL.into()),
			"token_url",
		)?;
		let user_info = parse_url(wegene::USER_INFO_URL, "user_info_url")?;
		let mut scope = match self.scope {
			Some(requested) => ScopeList::new(requested)?,
			None => ScopeList::default(),
		};

		for name in wegene::REQUIRED_SCOPES {
			scope.ensure(name);
		}

		let scope_separator =
			non_empty(self.scope_separator).unwrap_or_else(|| wegene::SCOPE_SEPARATOR.into());

		scope.ensure_separable(&scope_separator)?;

		Ok(StrategyConfig {
			client_id,
			client_secret: TokenSecret::new(client_secret),
			callback_url,
			endpoints: ProviderEndpoints { authorization, token, user_info },
			response_type: non_empty(self.response_type)
				.unwrap_or_else(|| wegene::RESPONSE_TYPE.into()),
			scope,
			scope_separator,
			client_auth_method: self.client_auth_method.unwrap_or_default(),
			pkce: self.pkce,
		})
	}
}
impl Debug for StrategyOptions {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StrategyOptions")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("callback_url", &self.callback_url)
			.field("authorization_url", &self.authorization_url)
			.field("token_url", &self.token_url)
			.field("response_type", &self.response_type)
			.field("scope", &self.scope)
			.field("scope_separator", &self.scope_separator)
			.field("client_auth_method", &self.client_auth_method)
			.field("pkce", &self.pkce)
			.finish()
	}
}

/// Endpoint set used by the strategy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint used for the consent redirect.
	pub authorization: Url,
	/// Token endpoint used for the code exchange.
	pub token: Url,
	/// User-info endpoint used for profile retrieval.
	pub user_info: Url,
}

/// Fully resolved strategy configuration, shared read-only across attempts.
#[derive(Clone, Serialize)]
pub struct StrategyConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	#[serde(skip)]
	pub client_secret: TokenSecret,
	/// Redirect URI registered with the provider.
	pub callback_url: Url,
	/// Provider endpoints.
	pub endpoints: ProviderEndpoints,
	/// `response_type` sent on the authorization request.
	pub response_type: String,
	/// Requested scopes, always including the provider's required scopes.
	pub scope: ScopeList,
	/// Separator used to join scopes on the wire.
	pub scope_separator: String,
	/// Client authentication mode for the token endpoint.
	pub client_auth_method: ClientAuthMethod,
	/// Whether authorization requests carry a PKCE challenge.
	pub pkce: bool,
}
impl StrategyConfig {
	/// Scope value sent on the wire.
	pub fn joined_scope(&self) -> String {
		self.scope.join(&self.scope_separator)
	}
}
impl Debug for StrategyConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StrategyConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("callback_url", &self.callback_url)
			.field("endpoints", &self.endpoints)
			.field("response_type", &self.response_type)
			.field("scope", &self.scope)
			.field("scope_separator", &self.scope_separator)
			.field("client_auth_method", &self.client_auth_method)
			.field("pkce", &self.pkce)
			.finish()
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}

fn required(value: Option<String>, option: &'static str) -> Result<String, ConfigError> {
	non_empty(value).ok_or(ConfigError::MissingOption { option })
}

fn parse_url(value: &str, option: &'static str) -> Result<Url, ConfigError> {
	Url::parse(value).map_err(|source| ConfigError::InvalidUrl { option, source })
}
