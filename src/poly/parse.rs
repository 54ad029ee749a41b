use std::iter::Peekable;
use std::str::{Chars, FromStr};

use super::{Poly, Term};

/// Failure to read a polynomial expression. No partial result is produced.
#[derive(Clone, PartialEq, Eq, Debug, derive_more::Display)]
pub enum ParseError {
    #[display("dangling sign at end of input")]
    DanglingSign,

    #[display("missing exponent after '^'")]
    MissingExponent,

    #[display("invalid coefficient '{_0}'")]
    InvalidCoeff(String),

    #[display("invalid exponent '{_0}'")]
    InvalidExponent(String),

    #[display("unexpected character '{_0}'")]
    Unexpected(char),
}

impl std::error::Error for ParseError {}

struct Scanner<'a> {
    it: Peekable<Chars<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(s: &'a str) -> Self {
        Self { it: s.chars().peekable() }
    }

    fn peek(&mut self) -> Option<char> {
        self.it.peek().copied()
    }

    fn bump(&mut self) {
        self.it.next();
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
    }

    // Longest run of ascii digits, with at most one '.' when `dot` is set.
    fn number(&mut self, dot: bool) -> String {
        let mut buf = String::new();
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || (dot && c == '.' && !seen_dot) {
                seen_dot |= c == '.';
                buf.push(c);
                self.bump();
            } else {
                break;
            }
        }
        buf
    }
}

// Single left-to-right pass collecting raw (exp, coeff) terms; duplicate
// exponents are allowed here and coalesced by `Poly::from_iter`.
fn scan_terms(s: &str) -> Result<Vec<Term>, ParseError> {
    let mut sc = Scanner::new(s);
    let mut terms = Vec::new();

    loop {
        sc.skip_ws();
        if sc.peek().is_none() {
            break;
        }

        // sign binds to the term that follows
        let sign = if sc.eat('-') {
            -1.0
        } else {
            sc.eat('+');
            1.0
        };

        sc.skip_ws();
        if sc.peek().is_none() {
            // only reachable after a consumed sign: "2x + "
            return Err(ParseError::DanglingSign);
        }

        // empty run means an implicit magnitude of 1, legal only before 'x'
        let num = sc.number(true);
        let coeff = if num.is_empty() {
            1.0
        } else {
            num.parse::<f64>()
                .map_err(|_| ParseError::InvalidCoeff(num.clone()))?
        } * sign;

        sc.skip_ws();
        match sc.peek() {
            Some('x') => {
                sc.bump();
                sc.skip_ws();
                let exp = if sc.eat('^') {
                    sc.skip_ws();
                    let digits = sc.number(false);
                    if digits.is_empty() {
                        return Err(ParseError::MissingExponent);
                    }
                    digits
                        .parse::<usize>()
                        .map_err(|_| ParseError::InvalidExponent(digits.clone()))?
                } else {
                    1
                };
                terms.push(Term::new(exp, coeff));
            }
            None if !num.is_empty() => {
                // trailing constant
                terms.push(Term::new(0, coeff));
                break;
            }
            Some('+' | '-') if !num.is_empty() => {
                terms.push(Term::new(0, coeff));
            }
            Some(c) => return Err(ParseError::Unexpected(c)),
            None => return Err(ParseError::DanglingSign),
        }
    }

    Ok(terms)
}

impl FromStr for Poly {
    type Err = ParseError;

    /// Reads `a x^b + c x^d - …`. Whitespace between tokens is
    /// insignificant; a term without `x` is a constant, `x` without `^`
    /// has degree 1, and an omitted coefficient before `x` is 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let terms = scan_terms(s)?;
        Ok(terms.into_iter().collect())
    }
}
