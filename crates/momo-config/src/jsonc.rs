//! JSONC (JSON with comments and trailing commas) to plain JSON.

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Str,
    LineComment,
    BlockComment,
}

/// Remove `//` and `/* */` comments and trailing commas before `}` / `]`.
///
/// String literals are left untouched. Newlines inside comments are kept so
/// parse errors still point at the right line.
pub fn strip_jsonc(content: &str) -> String {
    strip_trailing_commas(&strip_comments(content))
}

fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut mode = Mode::Code;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match mode {
            Mode::Str => {
                out.push(ch);
                if ch == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if ch == '"' {
                    mode = Mode::Code;
                }
            }
            Mode::LineComment => {
                if ch == '\n' {
                    out.push('\n');
                    mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    mode = Mode::Code;
                } else if ch == '\n' {
                    out.push('\n');
                }
            }
            Mode::Code => match (ch, chars.peek()) {
                ('"', _) => {
                    out.push(ch);
                    mode = Mode::Str;
                }
                ('/', Some('/')) => {
                    chars.next();
                    mode = Mode::LineComment;
                }
                ('/', Some('*')) => {
                    chars.next();
                    mode = Mode::BlockComment;
                }
                _ => out.push(ch),
            },
        }
    }
    out
}

fn strip_trailing_commas(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if in_string {
            out.push(ch);
            if ch == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
            out.push(ch);
        } else if ch == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(ch);
            }
        } else {
            out.push(ch);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_line_comment_and_trailing_comma() {
        let src = "{ \"a\": 1, // comment\n \"b\": 2, }";
        let v: serde_json::Value = serde_json::from_str(&strip_jsonc(src)).unwrap();
        assert_eq!(v, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn strips_block_comments_keeping_newlines() {
        let src = "{\n/* one\ntwo */\"a\": [1, 2,],\n}";
        let out = strip_jsonc(src);
        assert_eq!(out.matches('\n').count(), 3);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v, json!({"a": [1, 2]}));
    }

    #[test]
    fn leaves_string_contents_alone() {
        let src = r#"{ "url": "http://host//path", "s": "a /* b */ c", "t": ",}", "q": "x\"//y" }"#;
        let v: serde_json::Value = serde_json::from_str(&strip_jsonc(src)).unwrap();
        assert_eq!(v["url"], "http://host//path");
        assert_eq!(v["s"], "a /* b */ c");
        assert_eq!(v["t"], ",}");
        assert_eq!(v["q"], "x\"//y");
    }

    #[test]
    fn unterminated_block_comment_swallows_rest() {
        assert_eq!(strip_jsonc("{} /* open"), "{} ");
    }
}
