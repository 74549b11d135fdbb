//! Comment stripping for JSON-like configuration text.
//!
//! Removes `//` and `#` line comments and `/* ... */` block comments while
//! leaving everything else byte-identical, including anything inside double
//! quoted strings.

/// Controls what replaces a removed comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripOptions {
    /// Replace comment bytes with spaces instead of deleting them, so column
    /// offsets of the remaining text stay the same.
    pub preserve_as_whitespace: bool,
    /// With `preserve_as_whitespace`, keep `\n` and `\r` inside block comments so
    /// line numbers stay the same.
    pub preserve_newlines: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            preserve_as_whitespace: true,
            preserve_newlines: true,
        }
    }
}

impl StripOptions {
    /// Delete comments outright.
    pub fn remove() -> Self {
        Self {
            preserve_as_whitespace: false,
            preserve_newlines: false,
        }
    }

    /// Blank comments out, including newlines inside block comments.
    pub fn whitespace() -> Self {
        Self {
            preserve_as_whitespace: true,
            preserve_newlines: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerState {
    Code,
    LineComment,
    BlockComment,
}

/// True when the quote at `quote_pos` is preceded by an odd number of backslashes.
pub fn is_escaped(bytes: &[u8], quote_pos: usize) -> bool {
    let backslashes = bytes[..quote_pos]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    backslashes % 2 == 1
}

/// Strip comments from `text`.
///
/// A line comment ends before `\n` or `\r\n`, and the newline is kept. A block
/// comment ends after the first `*/`. An unterminated comment runs to the end of
/// the input. Comment markers inside strings are ignored.
pub fn strip_json_comments(text: &str, options: StripOptions) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut state = LexerState::Code;
    let mut inside_string = false;
    // Start of the pending code segment or of the current comment. Always an
    // ASCII position, so slicing `text` here stays on a char boundary.
    let mut offset = 0;
    let mut i = 0;

    while i < bytes.len() {
        let current = bytes[i];
        let next = bytes.get(i + 1).copied();

        match state {
            LexerState::Code => {
                if current == b'"' && !is_escaped(bytes, i) {
                    inside_string = !inside_string;
                    i += 1;
                    continue;
                }
                if inside_string {
                    i += 1;
                    continue;
                }
                if current == b'#' || (current == b'/' && next == Some(b'/')) {
                    out.push_str(&text[offset..i]);
                    offset = i;
                    state = LexerState::LineComment;
                    i += if current == b'#' { 1 } else { 2 };
                } else if current == b'/' && next == Some(b'*') {
                    out.push_str(&text[offset..i]);
                    offset = i;
                    state = LexerState::BlockComment;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            LexerState::LineComment => {
                if current == b'\n' || (current == b'\r' && next == Some(b'\n')) {
                    push_removed(&mut out, &text[offset..i], options, false);
                    // The newline starts the next code segment.
                    offset = i;
                    state = LexerState::Code;
                }
                i += 1;
            }
            LexerState::BlockComment => {
                if current == b'*' && next == Some(b'/') {
                    i += 2;
                    push_removed(&mut out, &text[offset..i], options, true);
                    offset = i;
                    state = LexerState::Code;
                } else {
                    i += 1;
                }
            }
        }
    }

    match state {
        LexerState::Code => out.push_str(&text[offset..]),
        LexerState::LineComment => push_removed(&mut out, &text[offset..], options, false),
        LexerState::BlockComment => push_removed(&mut out, &text[offset..], options, true),
    }
    out
}

/// [`strip_json_comments`] with [`StripOptions::default`].
pub fn strip_json_comments_default(text: &str) -> String {
    strip_json_comments(text, StripOptions::default())
}

fn push_removed(out: &mut String, removed: &str, options: StripOptions, block: bool) {
    if !options.preserve_as_whitespace {
        return;
    }
    if block && options.preserve_newlines {
        out.extend(removed.bytes().map(|b| match b {
            b'\n' | b'\r' => b as char,
            _ => ' ',
        }));
    } else {
        out.extend(std::iter::repeat_n(' ', removed.len()));
    }
}
