//! `#include` line parser.
//!
//! Single forward pass over the raw bytes of one line. Only the ASCII
//! space is skipped between tokens; tabs and other whitespace are
//! significant. Any deviation from the grammar yields a
//! [`NotDirectiveReason`] instead of an error.

use crate::result::{IncludeDirective, IncludeKind, NotDirectiveReason};

const SPACE: u8 = b' ';
const HASH: u8 = b'#';
const INCLUDE: &[u8] = b"include";

/// Forward-only cursor over a line.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(SPACE) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_token(&mut self, token: &[u8]) -> bool {
        if self.bytes[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consume up to (and including) `delim`, returning what came before it.
    fn take_until(&mut self, delim: u8) -> Option<&'a [u8]> {
        let rest = &self.bytes[self.pos..];
        let end = rest.iter().position(|&b| b == delim)?;
        self.pos += end + 1;
        Some(&rest[..end])
    }
}

/// Parse a line as an `#include` directive.
///
/// # Returns
/// The directive kind and its path, or the reason the line is ordinary text.
pub fn parse_include(line: &[u8]) -> Result<IncludeDirective, NotDirectiveReason> {
    let mut cursor = Cursor::new(line);

    cursor.skip_spaces();
    if !cursor.eat(HASH) {
        return Err(NotDirectiveReason::NoHash);
    }

    cursor.skip_spaces();
    if !cursor.eat_token(INCLUDE) {
        return Err(NotDirectiveReason::NotInclude);
    }

    cursor.skip_spaces();
    let opening = cursor.peek().ok_or(NotDirectiveReason::MissingDelimiter)?;
    let kind = IncludeKind::from_opening(opening)
        .ok_or(NotDirectiveReason::UnknownDelimiter(opening))?;
    cursor.pos += 1;

    let closing = kind.closing();
    let path = cursor
        .take_until(closing)
        .ok_or(NotDirectiveReason::Unterminated(closing))?;

    Ok(IncludeDirective {
        kind,
        path: path.to_vec(),
    })
}
