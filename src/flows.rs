//! Generic authorization-code client that provider strategies compose.
//!
//! [`OAuth2Client`] owns the resolved [`StrategyConfig`], the HTTP transport, and the
//! transport error mapper. It knows nothing about a particular provider: strategies
//! plug their behavior in through [`TokenParams`](crate::provider::TokenParams) and
//! [`ProfileSource`](crate::provider::ProfileSource) when completing a login.

pub mod session;

mod exchange;
mod resource;

pub use resource::*;
pub use session::*;

// self
use crate::{
	_prelude::*,
	http::TokenHttpClient,
	oauth::{BasicFacade, TransportErrorMapper},
	provider::StrategyConfig,
};

/// Authorization-code client bound to one resolved configuration.
pub struct OAuth2Client<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: Arc<StrategyConfig>,
	facade: BasicFacade<C, M>,
}
impl<C, M> OAuth2Client<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn new(
		config: StrategyConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let facade = BasicFacade::from_config(&config, http_client, mapper)?;

		Ok(Self { config: Arc::new(config), facade })
	}

	/// Resolved configuration shared by every attempt.
	pub fn config(&self) -> &StrategyConfig {
		&self.config
	}
}
impl<C, M> Debug for OAuth2Client<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Client").field("config", &self.config).finish()
	}
}
