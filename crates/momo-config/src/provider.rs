//! Environment, filesystem and host lookups used by the loader.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::io;
use std::path::{Path, PathBuf};

/// Source of environment variables.
pub trait EnvProvider {
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<S: BuildHasher> EnvProvider for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Read access to config files.
pub trait FileProvider {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFiles;

impl FileProvider for OsFiles {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Host identity used for default container tags and global config dirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub hostname: String,
    pub home_dir: PathBuf,
}

impl HostInfo {
    pub fn new(hostname: impl Into<String>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            hostname: hostname.into(),
            home_dir: home_dir.into(),
        }
    }

    pub fn detect() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string());
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self { hostname, home_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_env_lookup() {
        let mut env = HashMap::new();
        env.insert("A".to_string(), "1".to_string());
        assert_eq!(env.var("A").as_deref(), Some("1"));
        assert_eq!(env.var("B"), None);
    }

    #[test]
    fn detect_fills_hostname() {
        assert!(!HostInfo::detect().hostname.is_empty());
    }
}
