//! Declarative per-plugin field tables and the engine that resolves them.

use crate::coerce::{sanitize_container_tag, to_boolean, to_bounded_int, BoolTokens};
use crate::error::ConfigError;
use crate::interpolate::interpolate;
use crate::provider::EnvProvider;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// One of the plugin integrations with its own config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    OpenClaw,
    OpenCode,
    Pi,
}

impl PluginKind {
    pub const ALL: [PluginKind; 3] = [PluginKind::OpenClaw, PluginKind::OpenCode, PluginKind::Pi];

    /// Section key inside a config file.
    pub fn key(self) -> &'static str {
        match self {
            PluginKind::OpenClaw => "openclaw",
            PluginKind::OpenCode => "opencode",
            PluginKind::Pi => "pi",
        }
    }

    pub fn env_prefix(self) -> &'static str {
        match self {
            PluginKind::OpenClaw => "MOMO_OPENCLAW_",
            PluginKind::OpenCode => "MOMO_OPENCODE_",
            PluginKind::Pi => "MOMO_PI_",
        }
    }

    /// Directory holding the global `momo.jsonc`.
    pub fn global_dir(self, home: &Path) -> PathBuf {
        match self {
            PluginKind::OpenClaw => home.join(".openclaw"),
            PluginKind::OpenCode => home.join(".config").join("opencode"),
            PluginKind::Pi => home.join(".pi"),
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            PluginKind::OpenClaw => OPENCLAW_FIELDS,
            PluginKind::OpenCode => OPENCODE_FIELDS,
            PluginKind::Pi => PI_FIELDS,
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plugin: {0}")]
pub struct UnknownPlugin(pub String);

impl FromStr for PluginKind {
    type Err = UnknownPlugin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PluginKind::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or_else(|| UnknownPlugin(s.to_string()))
    }
}

/// How one field is read and coerced.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule {
    /// Interpolated string with a fixed default.
    Text { default: &'static str },
    /// Interpolated string, absent by default.
    OptionalText,
    /// Interpolated string, sanitized; defaults to `<prefix><hostname>`.
    Tag { default_prefix: &'static str },
    Bool { default: bool },
    BoundedInt { default: i64, min: i64, max: i64 },
    /// Exact match against `allowed`, else `default`.
    Choice {
        default: &'static str,
        allowed: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// camelCase key in the config file and the resolved output.
    pub key: &'static str,
    pub rule: FieldRule,
}

impl FieldSpec {
    /// `<prefix><UPPER_SNAKE(key)>`, e.g. `MOMO_PI_MAX_RECALL_RESULTS`.
    pub fn env_name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, upper_snake(self.key))
    }
}

pub fn upper_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}

const fn field(key: &'static str, rule: FieldRule) -> FieldSpec {
    FieldSpec { key, rule }
}

const BASE_URL: FieldSpec = field("baseUrl", FieldRule::Text { default: DEFAULT_BASE_URL });
const API_KEY: FieldSpec = field("apiKey", FieldRule::OptionalText);
const AUTO_RECALL: FieldSpec = field("autoRecall", FieldRule::Bool { default: true });
const AUTO_CAPTURE: FieldSpec = field("autoCapture", FieldRule::Bool { default: true });
const MAX_RECALL_RESULTS: FieldSpec = field(
    "maxRecallResults",
    FieldRule::BoundedInt { default: 10, min: 1, max: 20 },
);
const PROFILE_FREQUENCY: FieldSpec = field(
    "profileFrequency",
    FieldRule::BoundedInt { default: 50, min: 1, max: 500 },
);
const DEBUG: FieldSpec = field("debug", FieldRule::Bool { default: false });

static OPENCLAW_FIELDS: &[FieldSpec] = &[
    BASE_URL,
    API_KEY,
    field("containerTag", FieldRule::Tag { default_prefix: "oclw_" }),
    field("perAgentMemory", FieldRule::Bool { default: false }),
    AUTO_RECALL,
    AUTO_CAPTURE,
    MAX_RECALL_RESULTS,
    PROFILE_FREQUENCY,
    field(
        "captureMode",
        FieldRule::Choice {
            default: "all",
            allowed: &["all", "everything"],
        },
    ),
    DEBUG,
];

static OPENCODE_FIELDS: &[FieldSpec] = &[
    BASE_URL,
    API_KEY,
    field("containerTagUser", FieldRule::OptionalText),
    field("containerTagProject", FieldRule::OptionalText),
];

static PI_FIELDS: &[FieldSpec] = &[
    BASE_URL,
    API_KEY,
    field("containerTag", FieldRule::Tag { default_prefix: "pi_" }),
    AUTO_RECALL,
    AUTO_CAPTURE,
    MAX_RECALL_RESULTS,
    PROFILE_FREQUENCY,
    DEBUG,
];

/// Resolve every field of `fields` against the environment, then the merged
/// file section, then the default. Returns a camelCase object.
pub fn resolve_fields(
    fields: &[FieldSpec],
    section: &Map<String, Value>,
    env: &dyn EnvProvider,
    env_prefix: &str,
    hostname: &str,
) -> Result<Map<String, Value>, ConfigError> {
    let tokens = BoolTokens::default();
    let mut out = Map::with_capacity(fields.len());

    for spec in fields {
        let from_env = env.var(&spec.env_name(env_prefix));
        let from_file = section.get(spec.key).unwrap_or(&Value::Null);

        let value = match spec.rule {
            FieldRule::Text { default } => {
                Value::String(pick_text(from_env, from_file, env)?.unwrap_or_else(|| default.to_string()))
            }
            FieldRule::OptionalText => match pick_text(from_env, from_file, env)? {
                Some(s) => Value::String(s),
                None => Value::Null,
            },
            FieldRule::Tag { default_prefix } => {
                let raw = pick_text(from_env, from_file, env)?
                    .unwrap_or_else(|| format!("{}{}", default_prefix, hostname));
                Value::String(sanitize_container_tag(&raw))
            }
            FieldRule::Bool { default } => {
                let b = match from_env {
                    Some(s) => to_boolean(&Value::String(s), default, &tokens),
                    None => to_boolean(from_file, default, &tokens),
                };
                Value::Bool(b)
            }
            FieldRule::BoundedInt { default, min, max } => {
                let n = match from_env {
                    Some(s) => to_bounded_int(&Value::String(s), default, min, max),
                    None => to_bounded_int(from_file, default, min, max),
                };
                Value::from(n)
            }
            FieldRule::Choice { default, allowed } => {
                let candidate = match from_env {
                    Some(s) => Some(s),
                    None => from_file.as_str().map(str::to_string),
                };
                let chosen = candidate
                    .filter(|c| allowed.contains(&c.as_str()))
                    .unwrap_or_else(|| default.to_string());
                Value::String(chosen)
            }
        };
        out.insert(spec.key.to_string(), value);
    }
    Ok(out)
}

/// Environment value if set (even empty), else a string file value.
fn pick_text(
    from_env: Option<String>,
    from_file: &Value,
    env: &dyn EnvProvider,
) -> Result<Option<String>, ConfigError> {
    let raw = match from_env {
        Some(s) => s,
        None => match from_file {
            Value::String(s) => s.clone(),
            _ => return Ok(None),
        },
    };
    interpolate(&raw, env).map(Some)
}
