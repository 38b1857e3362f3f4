//! Facade over the `oauth2` crate for the authorization-code exchange.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, PkceCodeVerifier, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::{IssuedTokens, TokenSecret},
	error::{ConfigError, TransientError, TransportError},
	http::{Endpoint, ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	provider::{ClientAuthMethod, StrategyConfig},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeTokenResponse = oauth2::basic::BasicTokenResponse;

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted while calling `endpoint` into a crate error.
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(source) => TransportError::Io { endpoint, source }.into(),
			HttpClientError::Other(message) => unexpected_response(
				endpoint,
				meta,
				format!("HTTP client error occurred: {message}"),
			),
			_ => unexpected_response(endpoint, meta, "HTTP client error occurred".into()),
		}
	}
}

/// `oauth2` client configured once from the resolved strategy configuration.
pub(crate) struct BasicFacade<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredBasicClient,
	pub(crate) http_client: Arc<C>,
	pub(crate) error_mapper: Arc<M>,
}
impl<C, M> BasicFacade<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn from_config(
		config: &StrategyConfig,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self, ConfigError> {
		let auth_url = AuthUrl::new(config.endpoints.authorization.to_string())
			.map_err(|source| ConfigError::InvalidUrl { option: "authorization_url", source })?;
		let token_url = TokenUrl::new(config.endpoints.token.to_string())
			.map_err(|source| ConfigError::InvalidUrl { option: "token_url", source })?;
		let redirect_url = RedirectUrl::new(config.callback_url.to_string())
			.map_err(|source| ConfigError::InvalidUrl { option: "callback_url", source })?;
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			.set_redirect_uri(redirect_url);

		if matches!(config.client_auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self {
			oauth_client,
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
		})
	}

	/// Exchanges an authorization code, forwarding `extra_params` verbatim.
	pub(crate) async fn exchange_code(
		&self,
		code: &str,
		pkce_verifier: Option<&str>,
		extra_params: &[(String, String)],
		scope_separator: &str,
	) -> Result<IssuedTokens> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let mut request = self.oauth_client.exchange_code(AuthorizationCode::new(code.to_owned()));

		if let Some(verifier) = pkce_verifier {
			request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier.to_owned()));
		}
		for (key, value) in extra_params {
			request = request.add_extra_param(key, value);
		}

		let response = request
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err, self.error_mapper.as_ref()))?;

		map_token_response(response, scope_separator)
	}
}

fn map_token_response(response: FacadeTokenResponse, scope_separator: &str) -> Result<IssuedTokens> {
	let issued_at = OffsetDateTime::now_utc();
	let mut tokens = IssuedTokens::new(response.access_token().secret().to_owned(), issued_at);

	if let Some(expires_in) = response.expires_in() {
		let secs =
			i64::try_from(expires_in.as_secs()).map_err(|_| ConfigError::ExpiresInOutOfRange)?;

		tokens.expires_at = Some(issued_at + Duration::seconds(secs));
	}

	tokens.refresh_token =
		response.refresh_token().map(|token| TokenSecret::new(token.secret().to_owned()));
	tokens.scope = response.scopes().map(|scopes| {
		scopes.iter().map(|scope| scope.as_ref()).collect::<Vec<&str>>().join(scope_separator)
	});

	Ok(tokens)
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, meta_ref),
		RequestTokenError::Request(error) =>
			mapper.map_transport_error(Endpoint::Token, meta_ref, error),
		RequestTokenError::Parse(source, _body) =>
			TransientError::TokenResponseParse { source, status: meta_status(meta_ref) }.into(),
		RequestTokenError::Other(message) =>
			unexpected_response(Endpoint::Token, meta_ref, message),
	}
}

fn map_server_response_error(response: BasicErrorResponse, meta: Option<&ResponseMetadata>) -> Error {
	let reason = match response.error_description() {
		Some(description) => format!("{}: {description}", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	};

	match response.error() {
		BasicErrorResponseType::InvalidClient | BasicErrorResponseType::UnauthorizedClient =>
			Error::InvalidClient { reason },
		BasicErrorResponseType::InvalidScope => Error::InvalidScope { reason },
		BasicErrorResponseType::Extension(code)
			if code.eq_ignore_ascii_case("temporarily_unavailable")
				|| code.eq_ignore_ascii_case("server_error") =>
			unexpected_response(Endpoint::Token, meta, format!("OAuth error {reason}")),
		_ => Error::InvalidGrant { reason },
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: Endpoint, meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::UnexpectedResponse {
			endpoint,
			message: "Request timed out".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		}
		.into();
	}

	TransportError::network(endpoint, err).into()
}

pub(crate) fn unexpected_response(
	endpoint: Endpoint,
	meta: Option<&ResponseMetadata>,
	message: String,
) -> Error {
	TransientError::UnexpectedResponse {
		endpoint,
		message,
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
	.into()
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{http::ReqwestHttpClient, provider::StrategyOptions};

	fn config(method: ClientAuthMethod) -> StrategyConfig {
		StrategyOptions::new("app-key", "app-secret", "https://app.example.com/callback")
			.client_auth_method(method)
			.resolve()
			.expect("Options should resolve.")
	}

	#[test]
	fn builds_clients_for_each_auth_method() {
		for method in [ClientAuthMethod::ClientSecretPost, ClientAuthMethod::ClientSecretBasic] {
			let facade = <BasicFacade<ReqwestHttpClient, ReqwestTransportErrorMapper>>::from_config(
				&config(method),
				Arc::new(ReqwestHttpClient::default()),
				Arc::new(ReqwestTransportErrorMapper),
			);

			assert!(facade.is_ok());
		}
	}

	#[test]
	fn server_errors_are_classified_by_code() {
		let parse = |body: &str| -> BasicErrorResponse {
			serde_json::from_str(body).expect("Error response fixture should parse.")
		};

		assert!(matches!(
			map_server_response_error(parse(r#"{"error":"invalid_grant"}"#), None),
			Error::InvalidGrant { .. }
		));
		assert!(matches!(
			map_server_response_error(parse(r#"{"error":"unauthorized_client"}"#), None),
			Error::InvalidClient { .. }
		));
		assert!(matches!(
			map_server_response_error(parse(r#"{"error":"invalid_scope"}"#), None),
			Error::InvalidScope { .. }
		));

		let meta = ResponseMetadata { status: Some(503), retry_after: Some(Duration::seconds(9)) };
		let err = map_server_response_error(
			parse(r#"{"error":"temporarily_unavailable","error_description":"busy"}"#),
			Some(&meta),
		);

		match err {
			Error::Transient(TransientError::UnexpectedResponse { status, retry_after, .. }) => {
				assert_eq!(status, Some(503));
				assert_eq!(retry_after, Some(Duration::seconds(9)));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn token_response_scopes_use_configured_separator() {
		let response: FacadeTokenResponse = serde_json::from_str(
			r#"{"access_token":"at","token_type":"bearer","expires_in":60,"refresh_token":"rt","scope":"basic email"}"#,
		)
		.expect("Token response fixture should parse.");
		let tokens = map_token_response(response, ",").expect("Token response should map.");

		assert_eq!(tokens.access_token.expose(), "at");
		assert_eq!(tokens.refresh_token.as_ref().map(|secret| secret.expose()), Some("rt"));
		assert_eq!(tokens.scope.as_deref(), Some("basic,email"));
		assert_eq!(tokens.expires_at, Some(tokens.issued_at + Duration::seconds(60)));
	}
}
