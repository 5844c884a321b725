mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Api, Config, Search, Service};

use std::{fs, path::Path};

pub const RESOURCE_KINDS: [&str; 3] = ["character", "location", "episode"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes and validates a TOML document.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	let base_url = cfg.api.base_url.as_str();
	let Some(rest) =
		base_url.strip_prefix("https://").or_else(|| base_url.strip_prefix("http://"))
	else {
		return Err(Error::Validation {
			message: "api.base_url must start with http:// or https://.".to_string(),
		});
	};

	if rest.trim_matches('/').is_empty() {
		return Err(Error::Validation {
			message: "api.base_url must include a host.".to_string(),
		});
	}
	if rest.contains(&['?', '#'][..]) {
		return Err(Error::Validation {
			message: "api.base_url must not include a query or fragment.".to_string(),
		});
	}
	if cfg.api.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "api.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !RESOURCE_KINDS.contains(&cfg.search.default_kind.as_str()) {
		return Err(Error::Validation {
			message: "search.default_kind must be one of character, location, or episode."
				.to_string(),
		});
	}
	if cfg.search.max_pages == 0 {
		return Err(Error::Validation {
			message: "search.max_pages must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.api.base_url = cfg.api.base_url.trim().to_string();
	cfg.search.default_kind = cfg.search.default_kind.trim().to_ascii_lowercase();

	if cfg.api.user_agent.as_deref().map(|agent| agent.trim().is_empty()).unwrap_or(false) {
		cfg.api.user_agent = None;
	}
}
