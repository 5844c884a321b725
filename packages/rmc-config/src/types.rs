use serde::Deserialize;

const DEFAULT_USER_AGENT: &str = concat!("rmc/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub api: Api,
	pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	/// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `rmc_service=debug`.
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
	#[serde(default = "default_base_url")]
	pub base_url: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	pub user_agent: Option<String>,
}
impl Api {
	pub fn user_agent(&self) -> &str {
		self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
	}
}
impl Default for Api {
	fn default() -> Self {
		Self { base_url: default_base_url(), timeout_ms: default_timeout_ms(), user_agent: None }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// One of `character`, `location` or `episode`.
	pub default_kind: String,
	#[serde(default = "default_max_pages")]
	pub max_pages: u32,
}

fn default_base_url() -> String {
	"https://rickandmortyapi.com/api".to_string()
}

fn default_timeout_ms() -> u64 {
	10_000
}

fn default_max_pages() -> u32 {
	1
}
