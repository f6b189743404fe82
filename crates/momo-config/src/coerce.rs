//! Lenient value coercions. Bad input falls back to the default, never errors.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Accepted spellings for booleans given as strings (matched lowercased).
#[derive(Debug, Clone, Copy)]
pub struct BoolTokens<'a> {
    pub truthy: &'a [&'a str],
    pub falsy: &'a [&'a str],
}

impl Default for BoolTokens<'static> {
    fn default() -> Self {
        Self {
            truthy: &["true", "1", "yes"],
            falsy: &["false", "0", "no"],
        }
    }
}

pub fn to_boolean(value: &Value, fallback: bool, tokens: &BoolTokens<'_>) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let lower = s.to_lowercase();
            if tokens.truthy.contains(&lower.as_str()) {
                true
            } else if tokens.falsy.contains(&lower.as_str()) {
                false
            } else {
                fallback
            }
        }
        _ => fallback,
    }
}

/// Round to the nearest integer (halves up) and clamp into `[min, max]`.
///
/// Strings are read by their leading integer, so `"12abc"` is 12 and
/// `"7.9"` is 7.
pub fn to_bounded_int(value: &Value, fallback: i64, min: i64, max: i64) -> i64 {
    let n = match value {
        Value::Number(num) => match num.as_i64() {
            Some(i) => i,
            None => match num.as_f64() {
                Some(f) if f.is_finite() => return clamp_f64((f + 0.5).floor(), min, max),
                _ => return fallback,
            },
        },
        Value::String(s) => match leading_int(s) {
            Some(i) => i,
            None => return fallback,
        },
        _ => return fallback,
    };
    n.clamp(min, max)
}

fn clamp_f64(f: f64, min: i64, max: i64) -> i64 {
    if f <= min as f64 {
        min
    } else if f >= max as f64 {
        max
    } else {
        f as i64
    }
}

/// Optional whitespace, optional sign, then at least one ASCII digit.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut n: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        n = n.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if !seen {
        return None;
    }
    Some(if negative { -n } else { n })
}

fn non_tag_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("tag pattern is valid"))
}

/// Collapse every run of characters outside `[A-Za-z0-9]` (underscores
/// included) into one `_`, then trim underscores from both ends.
pub fn sanitize_container_tag(value: &str) -> String {
    non_tag_chars()
        .replace_all(value, "_")
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booleans() {
        let t = BoolTokens::default();
        assert!(to_boolean(&json!(true), false, &t));
        assert!(to_boolean(&json!("YES"), false, &t));
        assert!(!to_boolean(&json!("0"), true, &t));
        assert!(to_boolean(&json!("maybe"), true, &t));
        assert!(!to_boolean(&json!(1), false, &t));
        assert!(to_boolean(&Value::Null, true, &t));
    }

    #[test]
    fn custom_bool_tokens() {
        let t = BoolTokens {
            truthy: &["on"],
            falsy: &["off"],
        };
        assert!(to_boolean(&json!("On"), false, &t));
        assert!(!to_boolean(&json!("off"), true, &t));
        assert!(!to_boolean(&json!("yes"), false, &t));
    }

    #[test]
    fn bounded_ints_clamp() {
        assert_eq!(to_bounded_int(&json!("999"), 10, 1, 20), 20);
        assert_eq!(to_bounded_int(&json!("-5"), 10, 1, 20), 1);
        assert_eq!(to_bounded_int(&json!(15), 10, 1, 20), 15);
        assert_eq!(to_bounded_int(&json!(1e12), 10, 1, 20), 20);
    }

    #[test]
    fn bounded_ints_round_numbers_and_truncate_strings() {
        assert_eq!(to_bounded_int(&json!(7.5), 10, 1, 20), 8);
        assert_eq!(to_bounded_int(&json!(7.4), 10, 1, 20), 7);
        assert_eq!(to_bounded_int(&json!("7.9"), 10, 1, 20), 7);
        assert_eq!(to_bounded_int(&json!("  12abc"), 10, 1, 20), 12);
    }

    #[test]
    fn bounded_ints_fall_back() {
        assert_eq!(to_bounded_int(&json!("abc"), 10, 1, 20), 10);
        assert_eq!(to_bounded_int(&json!(""), 10, 1, 20), 10);
        assert_eq!(to_bounded_int(&json!(true), 10, 1, 20), 10);
        assert_eq!(to_bounded_int(&Value::Null, 10, 1, 20), 10);
    }

    #[test]
    fn container_tags() {
        assert_eq!(sanitize_container_tag("My Tag!!"), "My_Tag");
        assert_eq!(sanitize_container_tag("__a--b__c__"), "a_b_c");
        assert_eq!(sanitize_container_tag("oclw_host.local"), "oclw_host_local");
        assert_eq!(sanitize_container_tag("!!!"), "");
        assert_eq!(sanitize_container_tag("café über"), "caf_ber");
    }
}
