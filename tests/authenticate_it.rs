#![cfg(feature = "reqwest")]

mod support;

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use httpmock::prelude::*;
// self
use oauth2_wegene::{
	auth::IssuedTokens,
	error::{BoxError, Error, TransientError},
	flows::CallbackParams,
	provider::Profile,
};
use support::*;

const TOKEN_BODY: &str = r#"{"access_token":"access-success","refresh_token":"refresh-success","token_type":"bearer","expires_in":7200,"scope":"basic email"}"#;

async fn mock_token_endpoint<'a>(server: &'a MockServer, scope: &str) -> httpmock::Mock<'a> {
	let scope = scope.to_owned();

	server
		.mock_async(move |when, then| {
			when.method(POST)
				.path("/token/")
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("grant_type", "authorization_code")
				.form_urlencoded_tuple("code", "valid-code")
				.form_urlencoded_tuple("redirect_uri", CALLBACK_URL)
				.form_urlencoded_tuple("client_id", CLIENT_ID)
				.form_urlencoded_tuple("client_secret", CLIENT_SECRET)
				.form_urlencoded_tuple("scope", scope);
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await
}

async fn mock_user_endpoint(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET).path("/user/").header("authorization", "Bearer access-success");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":"u123","email":"a@example.com"}"#);
		})
		.await
}

#[tokio::test]
async fn authenticate_exchanges_code_with_scope_and_fetches_profile() {
	let server = MockServer::start_async().await;
	let token_mock = mock_token_endpoint(&server, "genome basic email").await;
	let user_mock = mock_user_endpoint(&server).await;
	let strategy = build_strategy(&server, options().scope(["genome"]), accept_all());
	let session = strategy.start_authorization();
	let (tokens, profile) = strategy
		.authenticate(&session, CallbackParams::success("valid-code", session.state.clone()))
		.await
		.expect("Authentication should succeed.")
		.expect("Verify continuation should accept the user.");

	token_mock.assert_async().await;
	user_mock.assert_async().await;

	assert_eq!(tokens.access_token.expose(), "access-success");
	assert_eq!(tokens.refresh_token.as_ref().map(|secret| secret.expose()), Some("refresh-success"));
	assert_eq!(tokens.scope.as_deref(), Some("basic email"));
	assert!(tokens.expires_at.is_some_and(|expires_at| expires_at > tokens.issued_at));
	assert_eq!(profile.provider, "Wegene");
	assert_eq!(profile.id_str(), Some("u123"));
	assert_eq!(profile.email_str(), Some("a@example.com"));
}

#[tokio::test]
async fn authenticate_sends_pkce_verifier_when_enabled() {
	let server = MockServer::start_async().await;
	let strategy = build_strategy(&server, options().pkce(true), accept_all());
	let session = strategy.start_authorization();
	let challenge = session.code_challenge().expect("PKCE challenge should be generated.");

	assert!(session.authorize_url.query_pairs().any(|(key, value)| key == "code_challenge"
		&& value == challenge));

	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token/")
				.body_includes("code_verifier=")
				.form_urlencoded_tuple("scope", "basic email");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let user_mock = mock_user_endpoint(&server).await;

	strategy
		.authenticate(&session, CallbackParams::success("valid-code", session.state.clone()))
		.await
		.expect("Authentication should succeed.");

	token_mock.assert_async().await;
	user_mock.assert_async().await;
}

#[tokio::test]
async fn provider_errors_short_circuit_before_token_exchange() {
	let server = MockServer::start_async().await;
	let token_mock = mock_token_endpoint(&server, "basic email").await;
	let strategy = build_strategy(&server, options(), accept_all());
	let session = strategy.start_authorization();
	let callback = CallbackParams {
		error: Some("access_denied".into()),
		error_description: Some("The user denied access".into()),
		state: Some(session.state.clone()),
		..Default::default()
	};
	let err = strategy
		.authenticate(&session, callback)
		.await
		.expect_err("Denied consent must fail.");

	assert!(err.is_access_denied());
	assert!(matches!(err, Error::Authorization { description: Some(_), .. }));

	let err = strategy
		.authenticate(&session, CallbackParams::success("valid-code", "forged-state"))
		.await
		.expect_err("State mismatch must fail.");

	assert!(matches!(err, Error::InvalidGrant { .. }));

	let err = strategy
		.authenticate(
			&session,
			CallbackParams { state: Some(session.state.clone()), ..Default::default() },
		)
		.await
		.expect_err("Missing code must fail.");

	assert!(matches!(err, Error::InvalidGrant { .. }));

	token_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn token_endpoint_errors_are_classified() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token/");
			then.status(400)
				.header("content-type", "application/json")
				.body(r#"{"error":"invalid_grant","error_description":"code expired"}"#);
		})
		.await;

	let user_mock = mock_user_endpoint(&server).await;
	let strategy = build_strategy(&server, options(), accept_all());
	let session = strategy.start_authorization();
	let err = strategy
		.authenticate(&session, CallbackParams::success("stale-code", session.state.clone()))
		.await
		.expect_err("Rejected code must fail.");

	match err {
		Error::InvalidGrant { reason } => assert!(reason.contains("code expired")),
		other => panic!("Unexpected error variant: {other:?}."),
	}

	user_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn malformed_token_response_is_transient() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token/");
			then.status(200).header("content-type", "application/json").body(r#"{"token":1}"#);
		})
		.await;

	let strategy = build_strategy(&server, options(), accept_all());
	let session = strategy.start_authorization();
	let err = strategy
		.authenticate(&session, CallbackParams::success("valid-code", session.state.clone()))
		.await
		.expect_err("Malformed token JSON must fail.");

	assert!(matches!(
		err,
		Error::Transient(TransientError::TokenResponseParse { status: Some(200), .. })
	));
}

#[tokio::test]
async fn verify_outcomes_are_forwarded() {
	let server = MockServer::start_async().await;

	mock_token_endpoint(&server, "basic email").await;
	mock_user_endpoint(&server).await;

	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let reject = move |_: IssuedTokens, profile: Profile| {
		counter.fetch_add(1, Ordering::SeqCst);

		async move {
			assert_eq!(profile.id_str(), Some("u123"));

			Ok::<Option<String>, BoxError>(None)
		}
	};
	let strategy = build_strategy(&server, options(), reject);
	let session = strategy.start_authorization();
	let user = strategy
		.authenticate(&session, CallbackParams::success("valid-code", session.state.clone()))
		.await
		.expect("Rejection is not an error.");

	assert!(user.is_none());
	assert_eq!(calls.load(Ordering::SeqCst), 1);

	let failing = |_: IssuedTokens, _: Profile| async {
		Err::<Option<String>, BoxError>("user store offline".into())
	};
	let strategy = build_strategy(&server, options(), failing);
	let session = strategy.start_authorization();
	let err = strategy
		.authenticate(&session, CallbackParams::success("valid-code", session.state.clone()))
		.await
		.expect_err("Verify failure must surface.");

	match err {
		Error::Verify { source } => assert_eq!(source.to_string(), "user store offline"),
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
