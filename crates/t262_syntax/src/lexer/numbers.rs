//! Numeric literal scanning.

use super::{Lexer, TokenKind, is_ident_start};

impl Lexer<'_> {
    /// Scan a numeric literal whose first character `first` has already been consumed.
    pub(super) fn scan_number(&mut self, start: usize, first: char) {
        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            self.scan_hex_number(start);
            return;
        }

        if first != '.' {
            self.consume_digits();
            if self.peek() == Some('.') {
                self.advance();
                self.consume_digits();
            }
        } else {
            self.consume_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let sign_follows = matches!(self.peek_next(), Some('+' | '-'));
            self.advance();
            if sign_follows {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.error("Missing exponent in numeric literal", start);
                return;
            }
            self.consume_digits();
        }

        let text = &self.source[start..self.current_pos];
        let value = if is_legacy_octal(text) {
            text[1..].chars().fold(0.0, |acc, c| acc * 8.0 + f64::from(c as u8 - b'0'))
        } else {
            match text.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    self.error(format!("Invalid numeric literal '{text}'"), start);
                    return;
                }
            }
        };
        self.finish_number(value, start);
    }

    fn scan_hex_number(&mut self, start: usize) {
        let digits_start = self.current_pos;
        while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.advance();
        }
        let digits = &self.source[digits_start..self.current_pos];
        if digits.is_empty() {
            self.error("Missing digits in hexadecimal literal", start);
            return;
        }
        let value = digits
            .chars()
            .filter_map(|c| c.to_digit(16))
            .fold(0.0, |acc, d| acc * 16.0 + f64::from(d));
        self.finish_number(value, start);
    }

    fn finish_number(&mut self, value: f64, start: usize) {
        // `3in` or `1abc` is an error, not a number followed by an identifier.
        if self.peek().is_some_and(|c| is_ident_start(c) || c.is_ascii_digit()) {
            while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
                self.advance();
            }
            self.error("Identifier starts immediately after numeric literal", start);
            return;
        }
        self.add_token(TokenKind::Number(value), start);
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }
}

/// `010` style literals: a leading zero followed only by octal digits.
fn is_legacy_octal(text: &str) -> bool {
    text.len() > 1 && text.starts_with('0') && text[1..].bytes().all(|b| (b'0'..=b'7').contains(&b))
}
