#![allow(dead_code)]

// std
use std::{future::Future, pin::Pin};
// crates.io
use httpmock::MockServer;
// self
use oauth2_wegene::{
	auth::IssuedTokens,
	error::BoxError,
	http::{InstrumentedHandle, ReqwestHttpClient, ResponseMetadataSlot, TokenHttpClient},
	oauth::{
		ReqwestTransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
	},
	provider::{Profile, StrategyOptions, Verify, WegeneStrategy},
	reqwest,
	url::Url,
};

pub const CLIENT_ID: &str = "wegene-app-key";
pub const CLIENT_SECRET: &str = "wegene-app-secret";
pub const CALLBACK_URL: &str = "https://app.example.com/auth/wegene/callback";

/// Strategy wired to the rewriting transport.
pub type TestStrategy<V> = WegeneStrategy<V, RewritingHttpClient, ReqwestTransportErrorMapper>;

/// Test transport that sends every request to `base` while keeping the path and query.
///
/// Lets the hard-coded provider endpoints resolve against a local mock server.
pub struct RewritingHttpClient {
	inner: ReqwestHttpClient,
	base: Url,
}
impl RewritingHttpClient {
	pub fn new(base: &str) -> Self {
		Self {
			inner: test_reqwest_http_client(),
			base: Url::parse(base).expect("Rewrite base URL should parse."),
		}
	}

	pub fn for_server(server: &MockServer) -> Self {
		Self::new(&server.base_url())
	}
}
impl TokenHttpClient for RewritingHttpClient {
	type Handle = RewritingHandle;
	type TransportError = reqwest::Error;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		RewritingHandle { inner: self.inner.with_metadata(slot), base: self.base.clone() }
	}
}

pub struct RewritingHandle {
	inner: InstrumentedHandle,
	base: Url,
}
impl<'c> AsyncHttpClient<'c> for RewritingHandle {
	type Error = HttpClientError<reqwest::Error>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, mut request: HttpRequest) -> Self::Future {
		let path = request.uri().path_and_query().map(|value| value.as_str()).unwrap_or("/");
		let rewritten = format!("{}{path}", self.base.as_str().trim_end_matches('/'));

		*request.uri_mut() = rewritten.parse().expect("Rewritten URI should parse.");

		self.inner.call(request)
	}
}

/// Builds a reqwest HTTP client that accepts the self-signed certificates served by
/// `httpmock`.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

pub fn options() -> StrategyOptions {
	StrategyOptions::new(CLIENT_ID, CLIENT_SECRET, CALLBACK_URL)
}

pub fn build_strategy<V>(server: &MockServer, options: StrategyOptions, verify: V) -> TestStrategy<V>
where
	V: Verify,
{
	WegeneStrategy::with_http_client(
		options,
		verify,
		RewritingHttpClient::for_server(server),
		ReqwestTransportErrorMapper,
	)
	.expect("Strategy should build against the mock server.")
}

/// Verify continuation that accepts every profile and returns it.
pub fn accept_all() -> impl Fn(IssuedTokens, Profile) -> AcceptFuture + Send + Sync {
	|tokens, profile| -> AcceptFuture {
		Box::pin(async move { Ok::<_, BoxError>(Some((tokens, profile))) })
	}
}

pub type AcceptFuture =
	Pin<Box<dyn Future<Output = Result<Option<(IssuedTokens, Profile)>, BoxError>> + Send>>;
