//! Encoding tokens back into a command line (the inverse of `tokenize`).

const ESCAPE: char = '\\';
const SINGLE_QUOTE: char = '\'';
const DOUBLE_QUOTE: char = '"';

/// Assemble a single command line that tokenizes back to exactly
/// `command` and `args`.
pub fn command_line<S: AsRef<str>>(command: &str, args: &[S]) -> String {
    let mut line = quote(command);
    for arg in args {
        line.push(' ');
        line.push_str(&quote(arg.as_ref()));
    }
    line
}

/// Return the shortest safe representation of `value` as one token.
///
/// Three renderings compete: backslash-escaped, single-quoted and
/// double-quoted. On equal length double quotes beat raw escaping, and
/// single quotes only win when strictly shorter than that winner.
pub fn quote(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }

    let raw = quote_raw(value);
    let single = quote_single(value);
    let double = quote_double(value);

    let winner = if raw.len() >= double.len() { double } else { raw };
    if single.len() < winner.len() {
        single
    } else {
        winner
    }
}

fn quote_raw(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_whitespace() || c == SINGLE_QUOTE || c == DOUBLE_QUOTE || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

fn quote_single(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(SINGLE_QUOTE);
    for c in value.chars() {
        if c == SINGLE_QUOTE {
            // No escapes inside single quotes: close, escape raw, reopen
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push(SINGLE_QUOTE);
    out
}

fn quote_double(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(DOUBLE_QUOTE);
    for c in value.chars() {
        if c == DOUBLE_QUOTE || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out.push(DOUBLE_QUOTE);
    out
}
