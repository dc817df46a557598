//! Grammar for the three supported WKT literal shapes.
//!
//! ```text
//! literal  := ws KEYWORD ws '(' body ')' ws
//! body     := ws pairs ws                 (POINT, LINESTRING)
//!           | ws '(' ws pairs ws ')' ws   (POLYGON)
//! pairs    := pair (ws ',' ws pair)*
//! pair     := number ws1 number
//! number   := [+-]? digits ('.' digits?)? | [+-]? '.' digits
//! ```
//!
//! Keywords are upper-case. Exponents, `Z`/`M` ordinates and SRID prefixes are
//! rejected.

use std::fmt;

/// A raw coordinate pair as written in the literal.
pub type Coord = [f64; 2];

/// Why a literal was rejected.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParseError {
    Keyword(&'static str),
    Expected { what: char, at: usize },
    Number { at: usize },
    NonFinite { at: usize },
    Trailing { at: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Keyword(kw) => write!(f, "expected keyword {}", kw),
            ParseError::Expected { what, at } => write!(f, "expected '{}' at byte {}", what, at),
            ParseError::Number { at } => write!(f, "expected a number at byte {}", at),
            ParseError::NonFinite { at } => write!(f, "number at byte {} is not finite", at),
            ParseError::Trailing { at } => write!(f, "unexpected input at byte {}", at),
        }
    }
}

struct Cursor<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn expect(&mut self, what: char) -> Result<(), ParseError> {
        if self.peek() == Some(what as u8) {
            self.pos += 1;
            Ok(())
        } else {
            Err(ParseError::Expected { what, at: self.pos })
        }
    }

    fn keyword(&mut self, keyword: &'static str) -> Result<(), ParseError> {
        self.skip_ws();
        let end = self.pos + keyword.len();
        if self.src.get(self.pos..end) == Some(keyword.as_bytes()) {
            self.pos = end;
            Ok(())
        } else {
            Err(ParseError::Keyword(keyword))
        }
    }

    fn number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let int_digits = self.digits();
        let mut frac_digits = 0;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            frac_digits = self.digits();
        }
        if int_digits == 0 && frac_digits == 0 {
            self.pos = start;
            return Err(ParseError::Number { at: start });
        }

        // Only ASCII sign, digits and '.' were consumed.
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| ParseError::Number { at: start })?;
        let value: f64 = text.parse().map_err(|_| ParseError::Number { at: start })?;
        if !value.is_finite() {
            return Err(ParseError::NonFinite { at: start });
        }
        Ok(value)
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn pair(&mut self) -> Result<Coord, ParseError> {
        let x = self.number()?;
        if self.skip_ws() == 0 {
            return Err(ParseError::Expected {
                what: ' ',
                at: self.pos,
            });
        }
        let y = self.number()?;
        Ok([x, y])
    }

    fn pairs(&mut self) -> Result<Vec<Coord>, ParseError> {
        self.skip_ws();
        let mut coords = vec![self.pair()?];
        loop {
            self.skip_ws();
            if self.peek() != Some(b',') {
                break;
            }
            self.pos += 1;
            self.skip_ws();
            coords.push(self.pair()?);
        }
        Ok(coords)
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        self.skip_ws();
        if self.pos == self.src.len() {
            Ok(())
        } else {
            Err(ParseError::Trailing { at: self.pos })
        }
    }
}

/// Parse `KEYWORD(x y, ...)`.
pub(crate) fn parse_simple(src: &str, keyword: &'static str) -> Result<Vec<Coord>, ParseError> {
    let mut cursor = Cursor::new(src);
    cursor.keyword(keyword)?;
    cursor.skip_ws();
    cursor.expect('(')?;
    let coords = cursor.pairs()?;
    cursor.expect(')')?;
    cursor.finish()?;
    Ok(coords)
}

/// Parse `POLYGON((x y, ...))` with a single ring.
pub(crate) fn parse_ring(src: &str) -> Result<Vec<Coord>, ParseError> {
    let mut cursor = Cursor::new(src);
    cursor.keyword("POLYGON")?;
    cursor.skip_ws();
    cursor.expect('(')?;
    cursor.skip_ws();
    cursor.expect('(')?;
    let coords = cursor.pairs()?;
    cursor.expect(')')?;
    cursor.skip_ws();
    cursor.expect(')')?;
    cursor.finish()?;
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(parse_simple("POINT(1 2)", "POINT"), Ok(vec![[1.0, 2.0]]));
        assert_eq!(
            parse_simple("POINT(-1.5 +.25)", "POINT"),
            Ok(vec![[-1.5, 0.25]])
        );
        assert_eq!(parse_simple("POINT(3. 4)", "POINT"), Ok(vec![[3.0, 4.0]]));
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(
            parse_simple("  LINESTRING ( 1 2 ,3   4 )  ", "LINESTRING"),
            Ok(vec![[1.0, 2.0], [3.0, 4.0]])
        );
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            parse_simple("POINT(12)", "POINT"),
            Err(ParseError::Expected { what: ' ', at: 8 })
        );
        assert!(matches!(
            parse_simple("POINT(1e5 2)", "POINT"),
            Err(ParseError::Expected { .. })
        ));
        assert!(matches!(
            parse_simple("POINT(NaN 2)", "POINT"),
            Err(ParseError::Number { at: 6 })
        ));
        assert!(matches!(
            parse_simple("POINT(1 2 3)", "POINT"),
            Err(ParseError::Expected { what: ')', .. })
        ));
        assert!(matches!(
            parse_simple("POINT(1 2) extra", "POINT"),
            Err(ParseError::Trailing { .. })
        ));
        assert_eq!(
            parse_simple("point(1 2)", "POINT"),
            Err(ParseError::Keyword("POINT"))
        );
        assert!(parse_simple("POINT()", "POINT").is_err());
        assert!(parse_simple("POINT(1 2", "POINT").is_err());
    }

    #[test]
    fn test_ring() {
        assert_eq!(
            parse_ring("POLYGON((0 0, 4 0, 4 3, 0 0))"),
            Ok(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 0.0]])
        );
        assert!(parse_ring("POLYGON(0 0, 4 0, 4 3, 0 0)").is_err());
        assert!(parse_ring("POLYGON((0 0, 4 0), (1 1, 2 2))").is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::Keyword("POINT").to_string(),
            "expected keyword POINT"
        );
        assert_eq!(
            ParseError::Expected { what: '(', at: 5 }.to_string(),
            "expected '(' at byte 5"
        );
    }
}
