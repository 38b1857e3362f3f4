//! Starts a Wegene login and, given the callback URL the browser landed on, completes it.
//!
//! ```sh
//! WEGENE_CLIENT_ID=... WEGENE_CLIENT_SECRET=... cargo run --example wegene_login
//! WEGENE_CLIENT_ID=... WEGENE_CLIENT_SECRET=... cargo run --example wegene_login -- \
//!     "<state>" "https://app.example.com/auth/wegene/callback?code=...&state=..."
//! ```
//!
//! The second invocation rebuilds the session from scratch, so it only validates `state`
//! when the first run's value is passed back in.

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use oauth2_wegene::{
	auth::IssuedTokens,
	error::BoxError,
	flows::CallbackParams,
	provider::{Profile, ReqwestWegeneStrategy, Strategy, StrategyOptions},
	url::Url,
};

const CALLBACK_URL: &str = "https://app.example.com/auth/wegene/callback";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let options = StrategyOptions::new(
		env::var("WEGENE_CLIENT_ID")?,
		env::var("WEGENE_CLIENT_SECRET")?,
		CALLBACK_URL,
	)
	.scope(["genome"]);
	let verify = |tokens: IssuedTokens, profile: Profile| async move {
		println!("Access token expires at {:?}.", tokens.expires_at);

		Ok::<_, BoxError>(profile.id_str().map(ToOwned::to_owned))
	};
	let strategy = ReqwestWegeneStrategy::new(options, verify)?;
	let mut session = strategy.start_authorization();
	let mut args = env::args().skip(1);

	println!("Strategy `{}` requests scope `{}`.", strategy.name(), session.scope);

	let (Some(state), Some(callback)) = (args.next(), args.next()) else {
		println!("Send your user to {}.", session.authorize_url);
		println!("Rerun with `{}` and the callback URL to finish.", session.state);

		return Ok(());
	};

	session.state = state;

	let callback = CallbackParams::from_url(&Url::parse(&callback)?);

	match strategy.authenticate(&session, callback).await? {
		Some(user_id) => println!("Signed in Wegene user {user_id}."),
		None => return Err(eyre!("Wegene profile did not include a string id.")),
	}

	Ok(())
}
