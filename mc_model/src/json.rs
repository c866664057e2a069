use std::borrow::Cow;

use serde_json::Value;

use crate::Content;

/// Parse item content as JSON. Empty, binary and malformed content all yield
/// `None`; pack JSON frequently carries comments, which are stripped first.
pub fn parse_json(content: &Content) -> Option<Value> {
    let text = content.as_text()?;
    let text = text.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return None;
    }

    let stripped = strip_json_comments(text);
    match serde_json::from_str(&stripped) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("ignoring unparseable JSON content: {}", e);
            None
        }
    }
}

/// Remove `//` and `/* */` comments that sit outside string literals.
pub fn strip_json_comments(input: &str) -> Cow<'_, str> {
    if !input.contains("//") && !input.contains("/*") {
        return Cow::Borrowed(input);
    }

    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            output.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        output.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                output.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        output.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    previous = skipped;
                }
                output.push(' ');
            }
            _ => output.push(c),
        }
    }

    Cow::Owned(output)
}
