//! Locate, read and merge config files, then resolve a plugin's fields.

use crate::error::ConfigError;
use crate::jsonc::strip_jsonc;
use crate::plugins::{OpenClawConfig, OpenCodeConfig, PiConfig, PluginConfig, ResolvedPluginConfig};
use crate::provider::{EnvProvider, FileProvider, HostInfo, OsFiles, ProcessEnv};
use crate::schema::{resolve_fields, PluginKind};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PROJECT_FILE: &str = ".momo.jsonc";
pub const GLOBAL_FILE: &str = "momo.jsonc";

#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Directory searched for `.momo.jsonc`. Defaults to the process cwd.
    pub cwd: Option<PathBuf>,
    /// Replaces the plugin's global config directory.
    pub global_config_dir: Option<PathBuf>,
    /// Replaces the plugin's env var prefix (e.g. `MOMO_PI_`).
    pub env_prefix: Option<String>,
}

impl LoaderOptions {
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir = Some(dir.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }
}

/// Config files found on disk (listed even if they failed to parse).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigFiles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoaderMeta {
    pub cwd: PathBuf,
    pub files: ConfigFiles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loaded<T> {
    pub config: T,
    pub meta: LoaderMeta,
}

/// Resolver over injected environment, filesystem and host lookups.
///
/// Nothing is cached: every call re-reads files and variables.
#[derive(Debug, Clone)]
pub struct ConfigLoader<E, F> {
    env: E,
    files: F,
    host: HostInfo,
}

impl ConfigLoader<ProcessEnv, OsFiles> {
    /// Process environment, local filesystem, detected host.
    pub fn system() -> Self {
        Self::new(ProcessEnv, OsFiles, HostInfo::detect())
    }
}

impl<E: EnvProvider, F: FileProvider> ConfigLoader<E, F> {
    pub fn new(env: E, files: F, host: HostInfo) -> Self {
        Self { env, files, host }
    }

    pub fn host(&self) -> &HostInfo {
        &self.host
    }

    pub fn load<T: PluginConfig>(&self, opts: &LoaderOptions) -> Result<Loaded<T>, ConfigError> {
        let (section, meta) = self.merged_section(T::KIND, opts);
        let prefix = opts.env_prefix.as_deref().unwrap_or(T::KIND.env_prefix());
        let config = self.resolve::<T>(&section, prefix)?;
        Ok(Loaded { config, meta })
    }

    pub fn load_kind(
        &self,
        kind: PluginKind,
        opts: &LoaderOptions,
    ) -> Result<Loaded<ResolvedPluginConfig>, ConfigError> {
        Ok(match kind {
            PluginKind::OpenClaw => self.load::<OpenClawConfig>(opts)?.map(ResolvedPluginConfig::OpenClaw),
            PluginKind::OpenCode => self.load::<OpenCodeConfig>(opts)?.map(ResolvedPluginConfig::OpenCode),
            PluginKind::Pi => self.load::<PiConfig>(opts)?.map(ResolvedPluginConfig::Pi),
        })
    }

    /// Resolve fields from an object the host already holds; no files are read.
    /// A missing or non-object value resolves to defaults plus env overrides.
    pub fn parse_inline<T: PluginConfig>(&self, inline: Option<&Value>) -> Result<T, ConfigError> {
        let section = inline
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        self.resolve::<T>(&section, T::KIND.env_prefix())
    }

    fn resolve<T: PluginConfig>(
        &self,
        section: &Map<String, Value>,
        prefix: &str,
    ) -> Result<T, ConfigError> {
        let fields = resolve_fields(
            T::KIND.fields(),
            section,
            &self.env,
            prefix,
            &self.host.hostname,
        )?;
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    fn merged_section(&self, kind: PluginKind, opts: &LoaderOptions) -> (Map<String, Value>, LoaderMeta) {
        let cwd = opts
            .cwd
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let project_path = cwd.join(PROJECT_FILE);
        let global_path = opts
            .global_config_dir
            .clone()
            .unwrap_or_else(|| kind.global_dir(&self.host.home_dir))
            .join(GLOBAL_FILE);

        let project = self.read_jsonc(&project_path);
        let global = self.read_jsonc(&global_path);

        let mut section = plugin_section(global.as_ref(), kind);
        section.extend(plugin_section(project.as_ref(), kind));

        let files = ConfigFiles {
            project: self.files.exists(&project_path).then_some(project_path),
            global: self.files.exists(&global_path).then_some(global_path),
        };
        (section, LoaderMeta { cwd, files })
    }

    /// Missing, unreadable and unparsable files all read as absent.
    fn read_jsonc(&self, path: &Path) -> Option<Value> {
        if !self.files.exists(path) {
            debug!(path = %path.display(), "config file not found");
            return None;
        }
        let raw = match self.files.read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config file unreadable, ignoring");
                return None;
            }
        };
        match serde_json::from_str(&strip_jsonc(&raw)) {
            Ok(v) => {
                debug!(path = %path.display(), "loaded config file");
                Some(v)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config file is not valid JSONC, ignoring");
                None
            }
        }
    }
}

impl<T> Loaded<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            config: f(self.config),
            meta: self.meta,
        }
    }
}

fn plugin_section(doc: Option<&Value>, kind: PluginKind) -> Map<String, Value> {
    doc.and_then(|d| d.get(kind.key()))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

pub fn load_plugin_config(
    kind: PluginKind,
    opts: &LoaderOptions,
) -> Result<Loaded<ResolvedPluginConfig>, ConfigError> {
    ConfigLoader::system().load_kind(kind, opts)
}

pub fn load_openclaw_config(opts: &LoaderOptions) -> Result<Loaded<OpenClawConfig>, ConfigError> {
    ConfigLoader::system().load(opts)
}

pub fn load_opencode_config(opts: &LoaderOptions) -> Result<Loaded<OpenCodeConfig>, ConfigError> {
    ConfigLoader::system().load(opts)
}

pub fn load_pi_config(opts: &LoaderOptions) -> Result<Loaded<PiConfig>, ConfigError> {
    ConfigLoader::system().load(opts)
}

pub fn parse_openclaw_inline(inline: Option<&Value>) -> Result<OpenClawConfig, ConfigError> {
    ConfigLoader::system().parse_inline(inline)
}

pub fn parse_opencode_inline(inline: Option<&Value>) -> Result<OpenCodeConfig, ConfigError> {
    ConfigLoader::system().parse_inline(inline)
}

pub fn parse_pi_inline(inline: Option<&Value>) -> Result<PiConfig, ConfigError> {
    ConfigLoader::system().parse_inline(inline)
}
