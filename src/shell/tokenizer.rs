//! Quote-aware splitting of a single command line.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::encoder::command_line;

/// Implicit end-of-input marker. Must never occur literally in a line.
const EOL: char = '\0';
const ESCAPE: char = '\\';
const SINGLE_QUOTE: char = '\'';
const DOUBLE_QUOTE: char = '"';

/// Errors produced while splitting a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command line")]
    EmptyCommandLine,

    #[error("invalid control character at byte {offset}")]
    InvalidControlCharacter { offset: usize },

    #[error("unexpected end of line")]
    UnexpectedEndOfLine,
}

/// A command line split into the command and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCommand {
    /// The first token.
    pub command: String,
    /// All remaining tokens, in order.
    pub args: Vec<String>,
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&command_line(&self.command, &self.args))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    SingleQuote,
    DoubleQuote,
}

/// Split a command line into its command and arguments.
///
/// Fails if the line holds no token at all.
pub fn tokenize(line: &str) -> Result<ParsedCommand, ParseError> {
    let mut tokens = split(line)?.into_iter();
    let command = tokens.next().ok_or(ParseError::EmptyCommandLine)?;
    Ok(ParsedCommand {
        command,
        args: tokens.collect(),
    })
}

/// Split a command line into tokens, respecting quotes and escapes.
///
/// Quoted and unquoted spans that touch are joined into one token, so
/// `"a"'b'c` yields `abc`. Runs of whitespace separate tokens but never
/// produce one; an empty quote pair does.
pub fn split(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Whether `current` must be emitted at the next boundary, even if empty.
    let mut opened = false;
    let mut state = State::Default;
    let mut escape = false;

    for (offset, c) in line.char_indices() {
        if c == EOL {
            return Err(ParseError::InvalidControlCharacter { offset });
        }

        match state {
            State::Default if escape => {
                escape = false;
                current.push(c);
            }
            State::Default => match c {
                c if c.is_whitespace() => {
                    if opened {
                        tokens.push(std::mem::take(&mut current));
                        opened = false;
                    }
                }
                SINGLE_QUOTE => {
                    state = State::SingleQuote;
                    opened = true;
                }
                DOUBLE_QUOTE => {
                    state = State::DoubleQuote;
                    opened = true;
                }
                ESCAPE => {
                    escape = true;
                    opened = true;
                }
                _ => {
                    current.push(c);
                    opened = true;
                }
            },
            State::SingleQuote => {
                if c == SINGLE_QUOTE {
                    state = State::Default;
                } else {
                    current.push(c);
                }
            }
            State::DoubleQuote if escape => {
                escape = false;
                // Only \\ and \" are escape sequences inside double quotes
                if c != ESCAPE && c != DOUBLE_QUOTE {
                    current.push(ESCAPE);
                }
                current.push(c);
            }
            State::DoubleQuote => match c {
                DOUBLE_QUOTE => state = State::Default,
                ESCAPE => escape = true,
                _ => current.push(c),
            },
        }
    }

    // Reached EOL: unterminated quote or dangling backslash
    if state != State::Default || escape {
        return Err(ParseError::UnexpectedEndOfLine);
    }
    if opened {
        tokens.push(current);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> (String, Vec<String>) {
        let parsed = tokenize(line).unwrap();
        (parsed.command, parsed.args)
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple() {
        let (cmd, a) = parse("newcommand -d foo -m bar");
        assert_eq!(cmd, "newcommand");
        assert_eq!(a, args(&["-d", "foo", "-m", "bar"]));
    }

    #[test]
    fn test_command_only() {
        let (cmd, a) = parse("newcommand");
        assert_eq!(cmd, "newcommand");
        assert!(a.is_empty());
    }

    #[test]
    fn test_single_char_tokens() {
        let (cmd, a) = parse("a b c");
        assert_eq!(cmd, "a");
        assert_eq!(a, args(&["b", "c"]));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(parse("cmd    -d    foo"), parse("cmd -d foo"));
        let (cmd, a) = parse("  newcommand    -d\t\tfoo  \n -m   bar    ");
        assert_eq!(cmd, "newcommand");
        assert_eq!(a, args(&["-d", "foo", "-m", "bar"]));
    }

    #[test]
    fn test_unicode_whitespace() {
        let (cmd, a) = parse("cmd\u{00a0}foo\u{3000}bar");
        assert_eq!(cmd, "cmd");
        assert_eq!(a, args(&["foo", "bar"]));
    }

    #[test]
    fn test_escape_space() {
        let (cmd, a) = parse(r"new\ command -d f\ oo -m bar\ ");
        assert_eq!(cmd, "new command");
        assert_eq!(a, args(&["-d", "f oo", "-m", "bar "]));
    }

    #[test]
    fn test_escape_only_tokens() {
        let (_, a) = parse(r"newcommand \ \\\ ");
        assert_eq!(a, args(&[" \\ "]));
    }

    #[test]
    fn test_escape_quotes() {
        let (_, a) = parse(r#"newcommand \" test \'"#);
        assert_eq!(a, args(&["\"", "test", "'"]));
    }

    #[test]
    fn test_quotes() {
        let (_, a) = parse(r#"newcommand -d "foo ' bar" -m 'single test " quotes'"#);
        assert_eq!(a, args(&["-d", "foo ' bar", "-m", "single test \" quotes"]));
    }

    #[test]
    fn test_empty_quotes() {
        let (cmd, a) = parse(r#"cmd -d "" -m ''"#);
        assert_eq!(cmd, "cmd");
        assert_eq!(a, args(&["-d", "", "-m", ""]));
    }

    #[test]
    fn test_empty_command() {
        let (cmd, a) = parse(r#""" x"#);
        assert_eq!(cmd, "");
        assert_eq!(a, args(&["x"]));
    }

    #[test]
    fn test_combined_quotes() {
        let (cmd, a) = parse(r#"cmd -d "asdf"'qwert'foo'bar'\ "test""1234"\ "#);
        assert_eq!(cmd, "cmd");
        assert_eq!(a, args(&["-d", "asdfqwertfoobar test1234 "]));
    }

    #[test]
    fn test_escapes_by_context() {
        let (_, a) = parse(
            r#"newcommand a\\b a\;b "a\;b" 'a\;b' "\'\n\"blub" '\"\n\ blub' "foo\\bar\ \t\n\0" 'foo\\bar'"#,
        );
        assert_eq!(
            a,
            args(&[
                "a\\b",
                "a;b",
                "a\\;b",
                "a\\;b",
                "\\'\\n\"blub",
                "\\\"\\n\\ blub",
                "foo\\bar\\ \\t\\n\\0",
                "foo\\\\bar",
            ])
        );
    }

    #[test]
    fn test_backslash_literal_in_single_quotes() {
        assert_eq!(split(r"'a\b'").unwrap(), args(&["a\\b"]));
    }

    #[test]
    fn test_unknown_escape_kept_in_double_quotes() {
        assert_eq!(split(r#""\n""#).unwrap(), args(&["\\n"]));
    }

    #[test]
    fn test_split_whitespace_only() {
        assert!(split("   \t ").unwrap().is_empty());
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(tokenize(""), Err(ParseError::EmptyCommandLine));
        assert_eq!(tokenize("    "), Err(ParseError::EmptyCommandLine));
    }

    #[test]
    fn test_trailing_escape() {
        assert_eq!(tokenize(r"cmd \"), Err(ParseError::UnexpectedEndOfLine));
    }

    #[test]
    fn test_unterminated_double_quote() {
        assert_eq!(
            tokenize(r#"cmd "open"#),
            Err(ParseError::UnexpectedEndOfLine)
        );
    }

    #[test]
    fn test_unterminated_single_quote() {
        assert_eq!(tokenize("cmd 'test"), Err(ParseError::UnexpectedEndOfLine));
    }

    #[test]
    fn test_escape_pending_in_double_quote() {
        assert_eq!(tokenize(r#"cmd "a\"#), Err(ParseError::UnexpectedEndOfLine));
    }

    #[test]
    fn test_nul_character() {
        assert_eq!(
            tokenize("cmd test \u{0}"),
            Err(ParseError::InvalidControlCharacter { offset: 9 })
        );
        // Not even quoting makes it acceptable
        assert!(tokenize("cmd '\u{0}'").is_err());
    }

    #[test]
    fn test_display_encodes() {
        let parsed = tokenize(r#"cmd "foo bar" ''"#).unwrap();
        assert_eq!(parsed.to_string(), r#"cmd foo\ bar """#);
    }
}
