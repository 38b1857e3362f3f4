//! Authenticated GET requests against provider resource endpoints.

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, TransientError},
	flows::OAuth2Client,
	http::{self, Endpoint, ResponseMetadataSlot, TokenHttpClient},
	oauth::TransportErrorMapper,
};

/// Where the access token travels on a resource request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenPresentation {
	/// `Authorization: Bearer <token>` header.
	#[default]
	Header,
	/// `access_token` query parameter.
	Query,
}

impl<C, M> OAuth2Client<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Issues a GET to `url` authenticated with `access_token` and returns the raw body.
	///
	/// Transport failures go through the configured mapper; non-2xx responses surface as
	/// [`TransientError::UnexpectedResponse`] labeled with `endpoint`.
	pub async fn get(
		&self,
		endpoint: Endpoint,
		url: &Url,
		access_token: &TokenSecret,
		presentation: TokenPresentation,
	) -> Result<Vec<u8>> {
		let mut target = url.clone();
		let mut builder = Request::builder().method(Method::GET).header(ACCEPT, "application/json");

		match presentation {
			TokenPresentation::Header => {
				builder = builder.header(AUTHORIZATION, access_token.bearer());
			},
			TokenPresentation::Query => {
				target.query_pairs_mut().append_pair("access_token", access_token.expose());
			},
		}

		let request = builder.uri(target.as_str()).body(Vec::new()).map_err(ConfigError::from)?;
		let meta = ResponseMetadataSlot::default();
		let handle = self.facade.http_client.with_metadata(meta.clone());
		let response = handle.call(request).await.map_err(|err| {
			self.facade.error_mapper.map_transport_error(endpoint, meta.take().as_ref(), err)
		})?;
		let status = response.status();

		if !status.is_success() {
			let meta = meta.take();

			return Err(TransientError::UnexpectedResponse {
				endpoint,
				message: format!("HTTP {}: {}", status.as_u16(), http::body_preview(response.body())),
				status: Some(status.as_u16()),
				retry_after: meta.and_then(|meta| meta.retry_after),
			}
			.into());
		}

		Ok(response.into_body())
	}
}
