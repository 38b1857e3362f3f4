//! Authorization redirect state: the outbound session and the inbound callback.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, provider::StrategyConfig};

const STATE_LEN: usize = 32;
const PKCE_VERIFIER_LEN: usize = 64;

/// Supported PKCE challenge methods surfaced via [`AuthorizationSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Authorization redirect metadata returned by `start_authorization`.
///
/// Hosts persist the session (usually keyed by `state`) until the provider redirects
/// back, then hand it to `authenticate` together with the [`CallbackParams`].
#[derive(Clone)]
pub struct AuthorizationSession {
	/// Opaque state value that must round-trip via the redirect.
	pub state: String,
	/// Scope value sent on the authorize URL.
	pub scope: String,
	/// Redirect URI supplied on the authorize URL.
	pub redirect_uri: Url,
	/// Fully-formed authorize URL that callers should send end-users to.
	pub authorize_url: Url,
	pkce: Option<PkcePair>,
}
impl AuthorizationSession {
	/// PKCE code challenge, when PKCE is enabled.
	pub fn code_challenge(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.challenge.as_str())
	}

	/// PKCE challenge method, when PKCE is enabled.
	pub fn code_challenge_method(&self) -> Option<PkceCodeChallengeMethod> {
		self.pkce.as_ref().map(|pkce| pkce.method)
	}

	/// Validates the `state` parameter returned on the callback.
	pub fn validate_state(&self, returned_state: Option<&str>) -> Result<()> {
		match returned_state {
			Some(state) if state == self.state => Ok(()),
			Some(_) => Err(Error::InvalidGrant { reason: "Authorization state mismatch".into() }),
			None =>
				Err(Error::InvalidGrant { reason: "Authorization callback is missing state".into() }),
		}
	}

	pub(crate) fn pkce_verifier(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.verifier.as_str())
	}
}
impl Debug for AuthorizationSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationSession")
			.field("state", &self.state)
			.field("scope", &self.scope)
			.field("redirect_uri", &self.redirect_uri)
			.field("authorize_url", &self.authorize_url)
			.field("code_challenge", &self.code_challenge())
			.finish()
	}
}

/// Query parameters the provider appends to the callback URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackParams {
	/// Authorization code on success.
	pub code: Option<String>,
	/// State echoed by the provider.
	pub state: Option<String>,
	/// OAuth error code when the user or provider rejected the request.
	pub error: Option<String>,
	/// Human-readable error description.
	pub error_description: Option<String>,
	/// Link to an error page.
	pub error_uri: Option<String>,
}
impl CallbackParams {
	/// Successful callback carrying `code` and `state`.
	pub fn success(code: impl Into<String>, state: impl Into<String>) -> Self {
		Self { code: Some(code.into()), state: Some(state.into()), ..Default::default() }
	}

	/// Extracts the parameters from the callback URL's query string.
	pub fn from_url(url: &Url) -> Self {
		let mut params = Self::default();

		for (key, value) in url.query_pairs() {
			let slot = match &*key {
				"code" => &mut params.code,
				"state" => &mut params.state,
				"error" => &mut params.error,
				"error_description" => &mut params.error_description,
				"error_uri" => &mut params.error_uri,
				_ => continue,
			};

			*slot = Some(value.into_owned());
		}

		params
	}
}

#[derive(Clone)]
struct PkcePair {
	verifier: String,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	fn generate() -> Self {
		let verifier = random_string(PKCE_VERIFIER_LEN);
		let challenge = compute_pkce_challenge(&verifier);

		Self { verifier, challenge, method: PkceCodeChallengeMethod::S256 }
	}
}

pub(super) fn build_session(config: &StrategyConfig) -> AuthorizationSession {
	let state = random_string(STATE_LEN);
	let pkce = config.pkce.then(PkcePair::generate);
	let scope = config.joined_scope();
	let redirect_uri = config.callback_url.clone();
	let mut authorize_url = config.endpoints.authorization.clone();
	let mut pairs = authorize_url.query_pairs_mut();

	pairs.append_pair("response_type", &config.response_type);
	pairs.append_pair("client_id", &config.client_id);
	pairs.append_pair("redirect_uri", redirect_uri.as_str());

	if !scope.is_empty() {
		pairs.append_pair("scope", &scope);
	}

	pairs.append_pair("state", &state);

	if let Some(pkce) = &pkce {
		pairs.append_pair("code_challenge", &pkce.challenge);
		pairs.append_pair("code_challenge_method", pkce.method.as_str());
	}

	drop(pairs);

	AuthorizationSession { state, scope, redirect_uri, authorize_url, pkce }
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn compute_pkce_challenge(verifier: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(verifier.as_bytes());

	URL_SAFE_NO_PAD.encode(hasher.finalize())
}
