//! Typed, fully defaulted configs for each plugin.

use crate::schema::PluginKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A resolved plugin config built from its [`PluginKind`] field table.
pub trait PluginConfig: DeserializeOwned + Serialize {
    const KIND: PluginKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    All,
    Everything,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenClawConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub container_tag: String,
    pub per_agent_memory: bool,
    pub auto_recall: bool,
    pub auto_capture: bool,
    pub max_recall_results: u32,
    pub profile_frequency: u32,
    pub capture_mode: CaptureMode,
    pub debug: bool,
}

impl PluginConfig for OpenClawConfig {
    const KIND: PluginKind = PluginKind::OpenClaw;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCodeConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tag_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tag_project: Option<String>,
}

impl PluginConfig for OpenCodeConfig {
    const KIND: PluginKind = PluginKind::OpenCode;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub container_tag: String,
    pub auto_recall: bool,
    pub auto_capture: bool,
    pub max_recall_results: u32,
    pub profile_frequency: u32,
    pub debug: bool,
}

impl PluginConfig for PiConfig {
    const KIND: PluginKind = PluginKind::Pi;
}

/// Any one plugin's resolved config, tagged by plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "plugin", rename_all = "lowercase")]
pub enum ResolvedPluginConfig {
    OpenClaw(OpenClawConfig),
    OpenCode(OpenCodeConfig),
    Pi(PiConfig),
}

impl ResolvedPluginConfig {
    pub fn kind(&self) -> PluginKind {
        match self {
            ResolvedPluginConfig::OpenClaw(_) => PluginKind::OpenClaw,
            ResolvedPluginConfig::OpenCode(_) => PluginKind::OpenCode,
            ResolvedPluginConfig::Pi(_) => PluginKind::Pi,
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            ResolvedPluginConfig::OpenClaw(c) => &c.base_url,
            ResolvedPluginConfig::OpenCode(c) => &c.base_url,
            ResolvedPluginConfig::Pi(c) => &c.base_url,
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        match self {
            ResolvedPluginConfig::OpenClaw(c) => c.api_key.as_deref(),
            ResolvedPluginConfig::OpenCode(c) => c.api_key.as_deref(),
            ResolvedPluginConfig::Pi(c) => c.api_key.as_deref(),
        }
    }
}
