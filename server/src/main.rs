use keyshare_server::Config;
use tracing::error;

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let res = match Config::from_env() {
		Ok(config) => keyshare_server::run(config).await,
		Err(err) => Err(err),
	};
	if let Err(err) = res {
		error!("FATAL: {}", err);
		std::process::exit(1);
	}
}

// vim: ts=4
