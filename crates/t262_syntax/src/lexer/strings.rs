//! String literal scanning.

use super::{Lexer, TokenKind, is_line_terminator};

/// Outcome of decoding one backslash escape.
enum EscapeResult {
    /// The escape produced a UTF-16 code unit.
    Unit(u16),
    /// A line continuation: contributes nothing to the value.
    Continuation,
    Invalid(String),
}

impl Lexer<'_> {
    pub(super) fn scan_string(&mut self, start: usize, quote: char) {
        // Collect UTF-16 units so surrogate pairs written as two `\u` escapes combine correctly.
        let mut units: Vec<u16> = Vec::new();

        loop {
            match self.peek() {
                None => {
                    self.error("Unterminated string literal", start);
                    return;
                }
                Some(c) if is_line_terminator(c) => {
                    self.error("Unterminated string literal", start);
                    return;
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape_start = self.current_pos;
                    self.advance();
                    match self.scan_escape() {
                        EscapeResult::Unit(unit) => units.push(unit),
                        EscapeResult::Continuation => {}
                        EscapeResult::Invalid(message) => self.error(message, escape_start),
                    }
                }
                Some(c) => {
                    self.advance();
                    let mut buf = [0u16; 2];
                    units.extend_from_slice(c.encode_utf16(&mut buf));
                }
            }
        }

        let value = String::from_utf16_lossy(&units);
        self.add_token(TokenKind::String(value), start);
    }

    fn scan_escape(&mut self) -> EscapeResult {
        let Some(c) = self.advance() else {
            return EscapeResult::Invalid("Unterminated escape sequence".to_string());
        };
        match c {
            'n' => EscapeResult::Unit(0x0a),
            't' => EscapeResult::Unit(0x09),
            'r' => EscapeResult::Unit(0x0d),
            'b' => EscapeResult::Unit(0x08),
            'f' => EscapeResult::Unit(0x0c),
            'v' => EscapeResult::Unit(0x0b),
            '0' if !self.peek().is_some_and(|d| d.is_ascii_digit()) => EscapeResult::Unit(0),
            'x' => self.scan_hex_units(2),
            'u' => self.scan_hex_units(4),
            '\r' => {
                self.match_char('\n');
                EscapeResult::Continuation
            }
            c if is_line_terminator(c) => EscapeResult::Continuation,
            c if c.is_ascii_digit() => EscapeResult::Invalid("Octal escape sequences are not supported".to_string()),
            c => {
                // Identity escape. Non-BMP characters cannot follow a backslash in practice; take the first unit.
                let mut buf = [0u16; 2];
                EscapeResult::Unit(c.encode_utf16(&mut buf)[0])
            }
        }
    }

    fn scan_hex_units(&mut self, digits: usize) -> EscapeResult {
        let mut value: u32 = 0;
        for _ in 0..digits {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    self.advance();
                    value = value * 16 + d;
                }
                None => return EscapeResult::Invalid("Invalid hexadecimal escape sequence".to_string()),
            }
        }
        // At most four hex digits, so the value always fits a code unit.
        EscapeResult::Unit(value as u16)
    }
}
