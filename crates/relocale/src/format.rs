//! Positional `{0}`, `{1}`, … substitution for composed values.
//!
//! # Invariants
//!
//! 1. **Single pass**: substituted argument text is never rescanned, so an
//!    argument containing `{0}` is emitted literally.
//! 2. **Degrades, never fails**: tokens that are malformed or reference a
//!    missing argument are left as-is.
//!
//! `{{` and `}}` emit literal braces. A `:format` or `,alignment` suffix
//! after the index is accepted and ignored; culture-aware number and date
//! formatting is not performed.

/// Substitute `args` into `template` by position.
#[must_use]
pub fn format_positional<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                result.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                result.push('}');
            }
            '{' => {
                let mut token = String::new();
                let mut found_close = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        found_close = true;
                        break;
                    }
                    token.push(c);
                }

                if !found_close {
                    // Unclosed brace: emit as-is
                    result.push('{');
                    result.push_str(&token);
                    continue;
                }

                match token_index(&token).and_then(|idx| args.get(idx)) {
                    Some(arg) => result.push_str(arg.as_ref()),
                    None => {
                        result.push('{');
                        result.push_str(&token);
                        result.push('}');
                    }
                }
            }
            _ => result.push(ch),
        }
    }

    result
}

fn token_index(token: &str) -> Option<usize> {
    let index = token.split([':', ',']).next()?.trim();
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index.parse().ok()
}
