//! Config resolver for Momo plugin integrations.
//!
//! Each plugin reads `<cwd>/.momo.jsonc` (project) and a per-plugin global
//! `momo.jsonc`, merges its section from both (project wins), then resolves
//! every field as env var > file value > default.
//!
//! ```no_run
//! use momo_config::{load_pi_config, LoaderOptions};
//!
//! let loaded = load_pi_config(&LoaderOptions::default())?;
//! println!("{} ({:?})", loaded.config.base_url, loaded.meta.files.project);
//! # Ok::<(), momo_config::ConfigError>(())
//! ```

mod coerce;
mod error;
mod interpolate;
mod jsonc;
mod loader;
mod plugins;
mod provider;
mod schema;

pub use coerce::{sanitize_container_tag, to_boolean, to_bounded_int, BoolTokens};
pub use error::ConfigError;
pub use interpolate::interpolate;
pub use jsonc::strip_jsonc;
pub use loader::{
    load_openclaw_config, load_opencode_config, load_pi_config, load_plugin_config,
    parse_openclaw_inline, parse_opencode_inline, parse_pi_inline, ConfigFiles, ConfigLoader,
    Loaded, LoaderMeta, LoaderOptions, GLOBAL_FILE, PROJECT_FILE,
};
pub use plugins::{
    CaptureMode, OpenClawConfig, OpenCodeConfig, PiConfig, PluginConfig, ResolvedPluginConfig,
};
pub use provider::{EnvProvider, FileProvider, HostInfo, OsFiles, ProcessEnv};
pub use schema::{
    resolve_fields, upper_snake, FieldRule, FieldSpec, PluginKind, UnknownPlugin,
    DEFAULT_BASE_URL,
};
