use crate::error::ConfigError;
use crate::provider::EnvProvider;
use regex::Regex;
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// Replace every `${NAME}` in `value` with the variable's value.
///
/// An unset or empty variable is an error. `${}` and an unclosed `${` are
/// kept literally.
pub fn interpolate(value: &str, env: &dyn EnvProvider) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;

    for caps in placeholder().captures_iter(value) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let resolved = env
            .var(name.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(name.as_str().to_string()))?;
        out.push_str(&value[last..whole.start()]);
        out.push_str(&resolved);
        last = whole.end();
    }
    out.push_str(&value[last..]);
    Ok(out)
}
