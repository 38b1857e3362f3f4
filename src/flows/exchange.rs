//! Authorization redirect and code exchange orchestration.

// self
use crate::{
	_prelude::*,
	auth::IssuedTokens,
	flows::{AuthorizationSession, CallbackParams, OAuth2Client, session},
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{Profile, ProfileSource, TokenParams},
};

/// Token request fields owned by the client; hook output never overrides them.
const RESERVED_PARAMS: [&str; 6] =
	["grant_type", "code", "redirect_uri", "code_verifier", "client_id", "client_secret"];

impl<C, M> OAuth2Client<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the authorization redirect with a fresh `state` (and PKCE pair when enabled).
	pub fn start_authorization(&self) -> AuthorizationSession {
		const KIND: FlowKind = FlowKind::Authorization;

		let _guard = FlowSpan::new(KIND, "start_authorization").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let session = session::build_session(&self.config);

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		session
	}

	/// Exchanges `code` at the token endpoint.
	///
	/// `params` (usually produced by a [`TokenParams`] hook) are appended to the form body;
	/// entries that collide with the fields the client manages itself are dropped.
	pub async fn exchange_code(
		&self,
		code: &str,
		pkce_verifier: Option<&str>,
		params: BTreeMap<String, String>,
	) -> Result<IssuedTokens> {
		const KIND: FlowKind = FlowKind::CodeExchange;

		let span = FlowSpan::new(KIND, "exchange_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let extra_params = params
					.into_iter()
					.filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()))
					.collect::<Vec<_>>();

				self.facade
					.exchange_code(
						code,
						pkce_verifier,
						extra_params.as_slice(),
						&self.config.scope_separator,
					)
					.await
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Completes a login from the provider callback.
	///
	/// Checks the callback for a provider error, validates `state`, exchanges the code
	/// with the hook's token parameters, and fetches the profile through `hooks`.
	pub async fn complete_authorization<H>(
		&self,
		hooks: &H,
		session: &AuthorizationSession,
		callback: CallbackParams,
	) -> Result<(IssuedTokens, Profile)>
	where
		H: ?Sized + TokenParams + ProfileSource,
	{
		if let Some(error) = callback.error {
			let err = Error::Authorization { error, description: callback.error_description };

			obs::record_flow_failure(FlowKind::Authorization, &err);

			return Err(err);
		}

		session.validate_state(callback.state.as_deref())?;

		let code = callback.code.filter(|code| !code.is_empty()).ok_or_else(|| {
			Error::InvalidGrant { reason: "Authorization callback is missing code".into() }
		})?;
		let tokens =
			self.exchange_code(&code, session.pkce_verifier(), hooks.token_params(None)).await?;
		let profile = hooks.user_profile(&tokens.access_token).await?;

		Ok((tokens, profile))
	}
}
