//! Token classification and name extraction.

/// Split a command line on whitespace into owned tokens.
///
/// No quoting rules apply; `"app --name=a b"` yields three tokens.
pub fn split_string(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// What a single token is, judged by its leading characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// `--name` or `--name=value`.
    Long {
        name: &'a str,
        value: Option<&'a str>,
    },
    /// `-x`, `-x=value`, `-xvalue` or a flag cluster `-abc`; `body` excludes the dash.
    Short { body: &'a str },
    /// Anything not starting with `-`.
    Positional(&'a str),
}

pub(crate) fn classify(token: &str) -> Token<'_> {
    if let Some(rest) = token.strip_prefix("--") {
        let (name, value) = match rest.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (rest, None),
        };
        Token::Long { name, value }
    } else if let Some(body) = token.strip_prefix('-') {
        Token::Short { body }
    } else {
        Token::Positional(token)
    }
}

/// Whether a token ends value consumption.
pub(crate) fn is_option(token: &str) -> bool {
    token.starts_with('-')
}

/// Strip one or two leading dashes and any `=value` suffix.
///
/// Tokens without a leading dash are returned unchanged.
pub(crate) fn strip_name(token: &str) -> &str {
    let Some(rest) = token.strip_prefix('-') else {
        return token;
    };
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    match rest.split_once('=') {
        Some((name, _)) => name,
        None => rest,
    }
}
