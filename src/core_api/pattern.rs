//! Pattern utilities for module exclusion rules.
//!
//! Exclusion patterns use a small wildcard syntax over module identities: `*` matches
//! within a single segment, `**` matches across segments, and `|` separates alternatives.

use regex::Regex;

use super::error::{AggdocError, Result};

/// True when `pattern` uses wildcard or alternative syntax.
pub fn is_pattern(pattern: &str) -> bool {
	pattern.contains('*') || pattern.contains('|')
}

/// Translate a wildcard pattern into an anchored regex source string.
///
/// Regex metacharacters are escaped, `|` is kept as the OR operator and each
/// alternative is anchored on its own so `a|b*` means "exactly `a`, or anything starting with `b`".
pub fn wildcard_to_regex(pattern: &str) -> String {
	let alternatives: Vec<String> = pattern
		.split('|')
		.map(|alternative| {
			let mut escaped = String::with_capacity(alternative.len() * 2);
			let mut chars = alternative.trim().chars().peekable();
			while let Some(ch) = chars.next() {
				match ch {
					'*' if chars.peek() == Some(&'*') => {
						chars.next();
						escaped.push_str(".*");
					}
					'*' => escaped.push_str("[^/]*"),
					'\\' | '.' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' => {
						escaped.push('\\');
						escaped.push(ch);
					}
					_ => escaped.push(ch),
				}
			}
			escaped
		})
		.collect();
	format!("^(?:{})$", alternatives.join("|"))
}

/// Compile a wildcard pattern into a regex matching whole module identities.
pub fn compile_wildcard(pattern: &str) -> Result<Regex> {
	Regex::new(&wildcard_to_regex(pattern)).map_err(|source| AggdocError::InvalidPattern {
		pattern: pattern.to_string(),
		source,
	})
}
