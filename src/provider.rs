//! Provider configuration (data), capability traits (behavior), and the Wegene strategy.
//!
//! `config` resolves caller options into an immutable [`StrategyConfig`]. `strategy`
//! defines the hooks a strategy exposes to the generic client and to the host
//! framework. `wegene` holds the provider constants and [`WegeneStrategy`], which
//! composes an [`OAuth2Client`](crate::flows::OAuth2Client) with those hooks.

pub mod config;
pub mod profile;
pub mod strategy;
pub mod wegene;

pub use config::*;
pub use profile::*;
pub use strategy::*;
pub use wegene::WegeneStrategy;
#[cfg(feature = "reqwest")] pub use wegene::ReqwestWegeneStrategy;
