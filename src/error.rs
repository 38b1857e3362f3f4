//! Strategy-level error types shared across configuration, flows, and profile retrieval.

// self
use crate::{_prelude::*, http::Endpoint};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used for transport failures and host-supplied continuations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// User profile could not be fetched or decoded.
	#[error(transparent)]
	Profile(#[from] ProfileError),

	/// Provider redirected back with an `error` parameter instead of a code.
	#[error("Provider rejected the authorization request: {error}.")]
	Authorization {
		/// OAuth `error` code (e.g. `access_denied`).
		error: String,
		/// Optional `error_description` supplied by the provider.
		description: Option<String>,
	},
	/// Provider rejected the grant (bad code, state mismatch).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or strategy-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Provider refused the requested scopes.
	#[error("Provider refused the requested scopes: {reason}.")]
	InvalidScope {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Host verify continuation reported a failure.
	#[error("Verify callback failed.")]
	Verify {
		/// Failure returned by the continuation.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Returns `true` when the end-user declined the consent screen.
	pub fn is_access_denied(&self) -> bool {
		matches!(self, Self::Authorization { error, .. } if error == "access_denied")
	}
}

/// Configuration and validation failures raised while building a strategy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A required option was not supplied.
	#[error("Missing required option `{option}`.")]
	MissingOption {
		/// Option name.
		option: &'static str,
	},
	/// A configured URL cannot be parsed.
	#[error("Option `{option}` is not a valid URL.")]
	InvalidUrl {
		/// Option name.
		option: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Requested scopes are malformed.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned an unexpected but non-fatal response.
	#[error("The {endpoint} endpoint returned an unexpected response: {message}.")]
	UnexpectedResponse {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl TransientError {
	/// HTTP status code attached to the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::UnexpectedResponse { status, .. } | Self::TokenResponseParse { status, .. } =>
				*status,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the {endpoint} endpoint.")]
	Io {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: Endpoint, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Failures raised by the user-profile retrieval step.
#[derive(Debug, ThisError)]
pub enum ProfileError {
	/// The user-info request failed (transport error or non-success status).
	#[error("Internal OAuth error: failed to fetch user profile.")]
	Fetch {
		/// Underlying request failure.
		#[source]
		source: Box<Error>,
	},
	/// The user-info response body is not valid JSON.
	#[error("User profile response is not valid JSON at `{path}`.")]
	Parse {
		/// JSON path where decoding stopped (`.` for the document root).
		path: String,
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ProfileError {
	/// Wraps a request failure so the profile step reports a stable message.
	pub fn fetch(source: impl Into<Error>) -> Self {
		Self::Fetch { source: Box::new(source.into()) }
	}
}
