use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(clap::Args, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Log {
	/// The default log level: error, warn, info, debug or trace.
	/// RUST_LOG takes precedence when set.
	#[arg(long = "log-level", id = "log-level", env = "INFERENCE_LOG_LEVEL")]
	#[serde(skip_serializing_if = "Option::is_none")]
	pub level: Option<String>,
}

impl Log {
	pub fn filter(&self) -> anyhow::Result<EnvFilter> {
		let level = match self.level.as_deref() {
			Some(level) => level.parse().context("invalid log level")?,
			None => LevelFilter::INFO,
		};

		let filter = EnvFilter::builder()
			.with_default_directive(level.into())
			.from_env_lossy() // Allow overriding with RUST_LOG
			.add_directive("h2=warn".parse()?)
			.add_directive("hyper=warn".parse()?)
			.add_directive("hyper_util=warn".parse()?)
			.add_directive("reqwest=warn".parse()?);

		Ok(filter)
	}

	pub fn init(&self) -> anyhow::Result<()> {
		let logger = tracing_subscriber::FmtSubscriber::builder()
			.with_writer(std::io::stderr)
			.with_env_filter(self.filter()?)
			.finish();

		tracing::subscriber::set_global_default(logger).context("failed to install logger")?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn level() {
		let log = Log {
			level: Some("debug".to_string()),
		};
		assert!(log.filter().is_ok());

		let log = Log {
			level: Some("loud".to_string()),
		};
		assert!(log.filter().is_err());
	}
}
