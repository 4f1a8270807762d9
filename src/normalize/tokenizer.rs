use tracing::warn;

/// Scanner state while walking the interior of a bracketed list string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    InSingle,
    InDouble,
}

impl State {
    fn closing_quote(self) -> Option<char> {
        match self {
            State::Outside => None,
            State::InSingle => Some('\''),
            State::InDouble => Some('"'),
        }
    }
}

/// Returns the interior of `s` when it looks like a printed list (`[...]`).
pub fn bracketed(s: &str) -> Option<&str> {
    s.strip_prefix('[')?.strip_suffix(']')
}

/// Split a printed list-of-strings into its lines.
///
/// Commas inside quotes are kept, commas outside split. A quote preceded by a
/// backslash does not close the segment; the backslash is dropped and the quote
/// kept. An unterminated quote runs to the end of the input and the buffer is
/// still flushed. Lines are trimmed and blank lines dropped.
pub fn split_list(interior: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut state = State::Outside;
    let mut prev: Option<char> = None;

    for ch in interior.chars() {
        match (state, ch) {
            (State::Outside, '\'') => state = State::InSingle,
            (State::Outside, '"') => state = State::InDouble,
            (State::Outside, ',') => {
                lines.push(current.trim().to_string());
                current.clear();
            }
            (_, c) if Some(c) == state.closing_quote() => {
                if prev == Some('\\') {
                    current.pop();
                    current.push(c);
                } else {
                    state = State::Outside;
                }
            }
            (_, c) => current.push(c),
        }
        prev = Some(ch);
    }

    if state != State::Outside {
        warn!(tail = current.trim(), "unterminated quote in notes list");
    }
    if !current.trim().is_empty() {
        lines.push(current.trim().to_string());
    }

    lines.retain(|l| !l.is_empty());
    lines
}

/// Content for a notes string: tokenized when bracketed, verbatim otherwise.
pub fn tokenize(s: &str) -> String {
    match bracketed(s) {
        Some(interior) => split_list(interior).join("\n"),
        None => s.to_string(),
    }
}
