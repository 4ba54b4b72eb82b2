//! Splitting of a raw input line into instruction tokens.
//!
//! Tokens are separated by runs of delimiter characters. There is no quoting,
//! escaping or expansion: every non-delimiter character is literal.

/// Characters that separate tokens.
pub const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x07'];

/// Background marker recognised when it is the last token of an instruction.
pub const BACKGROUND_MARKER: &str = "&";

/// Split `line` into its non-empty tokens. A blank line yields no tokens.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split(DELIMITERS)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_every_delimiter() {
        let tokens = split_into_tokens("ls\t-l \r/tmp\x07x\n");
        assert_eq!(tokens, vec!["ls", "-l", "/tmp", "x"]);
    }

    #[test]
    fn test_blank_line_has_no_tokens() {
        assert!(split_into_tokens("").is_empty());
        assert!(split_into_tokens(" \t \n").is_empty());
    }

    #[test]
    fn test_marker_is_an_ordinary_token() {
        assert_eq!(split_into_tokens("sleep 1 &"), vec!["sleep", "1", "&"]);
        assert_eq!(split_into_tokens("sleep 1&"), vec!["sleep", "1&"]);
    }

    #[test]
    fn test_no_quoting() {
        assert_eq!(split_into_tokens("echo \"a b\""), vec!["echo", "\"a", "b\""]);
    }

    #[test]
    fn test_long_lines_are_not_truncated() {
        let arg = "x".repeat(500);
        let tokens = split_into_tokens(&format!("echo {}", arg));
        assert_eq!(tokens[1].len(), 500);
    }
}
