use std::fmt::{self, Display};
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use auto_impl_ops::auto_ops;
use itertools::{EitherOrBoth, Itertools};
use num_traits::{One, Zero};

use super::Term;

/// A sparse univariate polynomial over `f64`.
///
/// Terms are kept sorted by strictly increasing exponent, at most one term
/// per exponent. Terms whose coefficient has become zero may remain stored;
/// they are skipped by `Display` and ignored by `is_zero` / `deg`.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Poly {
    terms: Vec<Term>,
}

impl Poly {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// The monomial `c x^e`.
    pub fn mono(exp: usize, coeff: f64) -> Self {
        Self { terms: vec![Term::new(exp, coeff)] }
    }

    pub fn from_const(c: f64) -> Self {
        Self::mono(0, c)
    }

    /// The monomial `x`.
    pub fn variable() -> Self {
        Self::mono(1, 1.0)
    }

    pub fn nterms(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    /// Coefficient at `exp`, 0 if no such term is stored.
    pub fn coeff(&self, exp: usize) -> f64 {
        self.terms
            .binary_search_by(|t| t.exp.cmp(&exp))
            .map_or(0.0, |i| self.terms[i].coeff)
    }

    pub fn lead_term(&self) -> Option<Term> {
        self.terms.iter().rev().find(|t| !t.is_zero()).copied()
    }

    pub fn deg(&self) -> Option<usize> {
        self.lead_term().map(|t| t.exp)
    }

    /// Sets the coefficient at `exp`, replacing an existing term or
    /// inserting a new one at its sorted position.
    pub fn set_term(&mut self, exp: usize, coeff: f64) {
        match self.terms.binary_search_by(|t| t.exp.cmp(&exp)) {
            Ok(i) => self.terms[i].coeff = coeff,
            Err(i) => self.terms.insert(i, Term::new(exp, coeff)),
        }
    }

    /// Removes the term at `exp`, returning its coefficient.
    /// Absence is not an error.
    pub fn remove_term(&mut self, exp: usize) -> Option<f64> {
        self.terms
            .binary_search_by(|t| t.exp.cmp(&exp))
            .ok()
            .map(|i| self.terms.remove(i).coeff)
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.terms.iter().map(|t| t.eval(x)).sum()
    }

    // Linear merge over the two sorted term lists; `rhs_sign` is applied
    // to terms taken from `rhs`. Both inputs satisfy the ordering
    // invariant, so the output does too.
    fn merge(&self, rhs: &Self, rhs_sign: f64) -> Self {
        let terms = self
            .terms
            .iter()
            .merge_join_by(rhs.terms.iter(), |s, t| s.cmp_exp(t))
            .map(|pair| match pair {
                EitherOrBoth::Both(s, t) => Term::new(s.exp, s.coeff + rhs_sign * t.coeff),
                EitherOrBoth::Left(s) => *s,
                EitherOrBoth::Right(t) => Term::new(t.exp, rhs_sign * t.coeff),
            })
            .collect();
        Self { terms }
    }
}

impl FromIterator<Term> for Poly {
    /// Collects raw terms in any order, sorting by (exponent, coefficient)
    /// and coalescing equal exponents by summation. Terms that coalesce to
    /// zero are kept.
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut buf = iter.into_iter().collect_vec();
        buf.sort_by(|s, t| s.cmp_exp(t).then(s.coeff.total_cmp(&t.coeff)));

        let mut terms: Vec<Term> = Vec::with_capacity(buf.len());
        for t in buf {
            match terms.last_mut() {
                Some(l) if l.exp == t.exp => l.coeff += t.coeff,
                _ => terms.push(t),
            }
        }
        Self { terms }
    }
}

impl FromIterator<(usize, f64)> for Poly {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        iter.into_iter().map(Term::from).collect()
    }
}

#[auto_ops]
impl AddAssign<&Poly> for Poly {
    fn add_assign(&mut self, rhs: &Poly) {
        *self = self.merge(rhs, 1.0);
    }
}

#[auto_ops]
impl SubAssign<&Poly> for Poly {
    fn sub_assign(&mut self, rhs: &Poly) {
        *self = self.merge(rhs, -1.0);
    }
}

#[auto_ops]
impl MulAssign<&Poly> for Poly {
    fn mul_assign(&mut self, rhs: &Poly) {
        // cross-multiply every term pair, then sort + coalesce once
        *self = self
            .terms
            .iter()
            .cartesian_product(rhs.terms.iter())
            .map(|(s, t)| s.mul(t))
            .collect();
    }
}

#[auto_ops]
impl MulAssign<&f64> for Poly {
    fn mul_assign(&mut self, rhs: &f64) {
        for t in self.terms.iter_mut() {
            t.coeff *= rhs;
        }
    }
}

impl Neg for &Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        self * -1.0
    }
}

impl Neg for Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        -&self
    }
}

impl Zero for Poly {
    fn zero() -> Self {
        Self::new()
    }

    fn is_zero(&self) -> bool {
        self.terms.iter().all(Term::is_zero)
    }
}

impl One for Poly {
    fn one() -> Self {
        Self::from_const(1.0)
    }
}

impl Sum for Poly {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |mut acc, p| {
            acc += p;
            acc
        })
    }
}

impl<'a> Sum<&'a Poly> for Poly {
    fn sum<I: Iterator<Item = &'a Poly>>(iter: I) -> Self {
        iter.fold(Self::zero(), |mut acc, p| {
            acc += p;
            acc
        })
    }
}

impl Product for Poly {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |mut acc, p| {
            acc *= p;
            acc
        })
    }
}

impl Display for Poly {
    /// Canonical form: ascending exponents, zero terms skipped, each term
    /// followed by a single space. The first emitted term carries its own
    /// sign; later ones are prefixed with `+` or `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for t in self.terms.iter().filter(|t| !t.is_zero()) {
            match (first, t.coeff < 0.0) {
                (true, false) => {}
                (_, true) => write!(f, "-")?,
                (false, false) => write!(f, "+")?,
            }
            t.fmt_abs(f)?;
            write!(f, " ")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Poly {
        s.parse().unwrap()
    }

    fn terms_of(p: &Poly) -> Vec<(usize, f64)> {
        p.iter().map(|t| (t.exp, t.coeff)).collect()
    }

    fn assert_canonical(p: &Poly) {
        assert!(p.iter().tuple_windows().all(|(s, t)| s.exp < t.exp));
    }

    #[test]
    fn init() {
        let p = Poly::new();
        assert_eq!(p.nterms(), 0);
        assert!(p.is_zero());

        let q = Poly::mono(2, 3.0);
        assert_eq!(terms_of(&q), vec![(2, 3.0)]);

        let x = Poly::variable();
        assert_eq!(terms_of(&x), vec![(1, 1.0)]);
    }

    #[test]
    fn from_iter_coalesces() {
        let p: Poly = [(1, 2.0), (0, -5.0), (1, 1.0), (2, 3.0)]
            .into_iter()
            .collect();

        assert_eq!(terms_of(&p), vec![(0, -5.0), (1, 3.0), (2, 3.0)]);
        assert_canonical(&p);
    }

    #[test]
    fn from_iter_keeps_zero_sums() {
        let p: Poly = [(1, 1.0), (1, -1.0)].into_iter().collect();

        assert_eq!(terms_of(&p), vec![(1, 0.0)]);
        assert!(p.is_zero());
    }

    #[test]
    fn coeff() {
        let p = p("3x^2 + 2x - 5");

        assert_eq!(p.coeff(0), -5.0);
        assert_eq!(p.coeff(1), 2.0);
        assert_eq!(p.coeff(2), 3.0);
        assert_eq!(p.coeff(7), 0.0); // absent
    }

    #[test]
    fn set_term_replaces() {
        let mut p = Poly::mono(0, 1.0);
        p.set_term(0, 5.0);

        assert_eq!(terms_of(&p), vec![(0, 5.0)]); // not 6
    }

    #[test]
    fn set_term_inserts_sorted() {
        let mut p = p("x^3 + 1");
        p.set_term(2, 4.0);
        p.set_term(5, -1.0);

        assert_eq!(
            terms_of(&p),
            vec![(0, 1.0), (2, 4.0), (3, 1.0), (5, -1.0)]
        );
        assert_canonical(&p);
    }

    #[test]
    fn remove_term() {
        let mut p = p("2x");
        assert_eq!(p.remove_term(5), None);
        assert_eq!(terms_of(&p), vec![(1, 2.0)]); // unchanged

        assert_eq!(p.remove_term(1), Some(2.0));
        assert_eq!(p.nterms(), 0);
    }

    #[test]
    fn deg() {
        assert_eq!(p("3x^2 + 2x - 5").deg(), Some(2));
        assert_eq!(p("7").deg(), Some(0));
        assert_eq!(Poly::new().deg(), None);
        assert_eq!(p("x - x").deg(), None); // zero coefficient is skipped
    }

    #[test]
    fn lead_term() {
        let q = p("3x^2 + 2x - 5");
        assert_eq!(q.lead_term(), Some(Term::new(2, 3.0)));
    }

    #[test]
    fn add() {
        let a = p("x^2 + 2x + 1");
        let b = p("3x^3 - 2x + 5");
        let c = &a + &b;

        assert_eq!(terms_of(&c), vec![(0, 6.0), (1, 0.0), (2, 1.0), (3, 3.0)]);
        assert_canonical(&c);

        // operands untouched
        assert_eq!(terms_of(&a), vec![(0, 1.0), (1, 2.0), (2, 1.0)]);
    }

    #[test]
    fn sub() {
        let a = p("x^2 + 1");
        let b = p("2x^2 + x");
        let c = &a - &b;

        assert_eq!(terms_of(&c), vec![(0, 1.0), (1, -1.0), (2, -1.0)]);
        assert_canonical(&c);
    }

    #[test]
    fn add_then_sub_restores() {
        let a = p("4x^5 - x^2 + 0.5");
        let b = p("x^4 + x^2 - 3");
        let c = &(&a + &b) - &b;

        assert_eq!(c.nterms(), 4);
        for t in a.iter() {
            assert_eq!(c.coeff(t.exp), t.coeff);
        }
        assert_canonical(&c);
    }

    #[test]
    fn mul() {
        let c = &p("x + 1") * &p("x - 1");

        assert_eq!(terms_of(&c), vec![(0, -1.0), (1, 0.0), (2, 1.0)]);
        assert_canonical(&c);
    }

    #[test]
    fn mul_distributes() {
        let a = p("2x^2 + 3x + 1");
        let b = p("x^3 - x");
        let c = &a * &b;

        for e in 0..=6 {
            let expect: f64 = (0..=e).map(|i| a.coeff(i) * b.coeff(e - i)).sum();
            assert_eq!(c.coeff(e), expect);
        }
        assert_canonical(&c);
    }

    #[test]
    fn mul_by_zero() {
        let c = &p("x^2 + 1") * &Poly::zero();
        assert!(c.is_zero());
        assert_eq!(c.nterms(), 0);
    }

    #[test]
    fn mul_scalar() {
        let c = &p("x^2 - 2") * 3.0;
        assert_eq!(terms_of(&c), vec![(0, -6.0), (2, 3.0)]);
    }

    #[test]
    fn neg() {
        let c = -p("x - 1");
        assert_eq!(terms_of(&c), vec![(0, 1.0), (1, -1.0)]);
    }

    #[test]
    fn zero_one() {
        assert!(Poly::zero().is_zero());
        assert!(!Poly::one().is_zero());
        assert_eq!(&p("x^2 + 1") * &Poly::one(), p("x^2 + 1"));
    }

    #[test]
    fn sum_product() {
        let s: Poly = [p("x"), p("x^2"), p("1")].into_iter().sum();
        assert_eq!(terms_of(&s), vec![(0, 1.0), (1, 1.0), (2, 1.0)]);

        let q: Poly = [p("x + 1"), p("x - 1")].into_iter().product();
        assert_eq!(q, &p("x + 1") * &p("x - 1"));
    }

    #[test]
    fn eval() {
        let q = p("3x^2 + 2x - 5");
        assert_eq!(q.eval(0.0), -5.0);
        assert_eq!(q.eval(2.0), 11.0);
    }

    #[test]
    fn display() {
        assert_eq!(p("3x^2 + 2x - 5").to_string(), "-5 +2x +3x^2 ");
        assert_eq!(p("x").to_string(), "x ");
        assert_eq!(p("-x").to_string(), "-x ");
        assert_eq!(p("x^3 - x").to_string(), "-x +x^3 ");
        assert_eq!(p("1").to_string(), "1 ");
        assert_eq!(p("-1").to_string(), "-1 ");
        assert_eq!(p("2.5x^2").to_string(), "2.5x^2 ");
    }

    #[test]
    fn display_skips_zero_terms() {
        assert_eq!(p("x - x").to_string(), "");
        assert_eq!(Poly::new().to_string(), "");

        let mut q = p("x^2 + x");
        q.set_term(1, 0.0);
        assert_eq!(q.to_string(), "x^2 ");
    }

    #[test]
    fn display_unit_coeff_only_for_nonconst() {
        // |c| = 1 is abbreviated on x-terms, never on constants
        assert_eq!(p("x + 1").to_string(), "1 +x ");
        assert_eq!(p("x - 1").to_string(), "-1 +x ");
    }
}
