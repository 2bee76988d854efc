//! Signed fixed point decimals with exactly 18 fractional digits.
//!
//! The representation is a scaled [`BigInt`] (`value = raw / 10^18`), so the
//! type can hold any balance-to-balance ratio that pool math produces without
//! overflow. Every operation that loses precision truncates toward zero;
//! together with the series based [`Dec::pow`] this makes all results
//! bit-for-bit reproducible, which the host consensus depends on.

use {
    crate::int::Int,
    num::{BigInt, Integer, Signed, Zero},
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    std::{
        fmt::{self, Debug, Display, Formatter},
        str::FromStr,
        sync::LazyLock,
    },
};

/// Number of fractional decimal digits carried by [`Dec`].
pub const DECIMAL_PLACES: u32 = 18;

pub(crate) static ONE_RAW: LazyLock<BigInt> =
    LazyLock::new(|| BigInt::from(10u64).pow(DECIMAL_PLACES));
static TWO_RAW: LazyLock<BigInt> = LazyLock::new(|| ONE_RAW.clone() * 2);
/// The binomial series for fractional exponents stops once a term drops below
/// this threshold (10^-8).
static POW_PRECISION: LazyLock<BigInt> = LazyLock::new(|| BigInt::from(10u64).pow(10));

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid decimal representation: {0:?}")]
    InvalidDecimal(String),
    #[error("pow base must lie strictly between zero and two")]
    PowBaseOutOfBounds,
    #[error("pow exponent must not be negative")]
    NegativeExponent,
}

/// A signed decimal with 18 fractional digits.
#[derive(Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Dec(BigInt);

impl Dec {
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    pub fn one() -> Self {
        Self(ONE_RAW.clone())
    }

    pub fn from_int(value: i128) -> Self {
        Self(BigInt::from(value) * &*ONE_RAW)
    }

    /// Builds a decimal directly from its scaled representation, i.e.
    /// `from_raw(x)` is `x * 10^-18`.
    pub fn from_raw(raw: BigInt) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &BigInt {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    #[expect(clippy::should_implement_trait)]
    pub fn add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    #[expect(clippy::should_implement_trait)]
    pub fn sub(&self, other: &Self) -> Self {
        Self(&self.0 - &other.0)
    }

    #[expect(clippy::should_implement_trait)]
    pub fn neg(&self) -> Self {
        Self(-&self.0)
    }

    /// Multiplication, truncating the result toward zero.
    #[expect(clippy::should_implement_trait)]
    pub fn mul(&self, other: &Self) -> Self {
        Self(mul_raw(&self.0, &other.0))
    }

    /// Division, truncating the result toward zero.
    ///
    /// Panics on a zero divisor. Pool construction guarantees that no zero
    /// denominator (balance, supply, weight, fee complement) ever reaches a
    /// division, so hitting this is a programmer error, not an input error.
    pub fn quo(&self, other: &Self) -> Self {
        assert!(!other.0.is_zero(), "decimal division by zero");
        Self(quo_raw(&self.0, &other.0))
    }

    /// `self^exp` for `0 < self < 2` and `exp >= 0`.
    ///
    /// The integer part of the exponent is handled by squaring, the fractional
    /// part by the binomial series `(1+x)^a = sum_k (a choose k) x^k`, which
    /// converges for `|x| < 1` — hence the open `(0, 2)` base interval. The
    /// series stops once a term falls below [`POW_PRECISION`].
    pub fn pow(&self, exp: &Self) -> Result<Self, Error> {
        if exp.is_negative() {
            return Err(Error::NegativeExponent);
        }
        if !self.0.is_positive() || self.0 >= *TWO_RAW {
            return Err(Error::PowBaseOutOfBounds);
        }

        let whole = &exp.0 / &*ONE_RAW;
        let remain = &exp.0 - &whole * &*ONE_RAW;
        let whole_pow = powi(&self.0, &whole);
        if remain.is_zero() {
            return Ok(Self(whole_pow));
        }
        let partial = pow_approx(&self.0, &remain);
        Ok(Self(mul_raw(&whole_pow, &partial)))
    }

    /// Truncation toward zero to an integer.
    pub fn truncate_to_int(&self) -> Int {
        Int::from_big_int(&self.0 / &*ONE_RAW)
    }
}

/// `a * b / 10^18`, truncated toward zero. [`BigInt`] division already
/// truncates toward zero, matching primitive integer semantics.
fn mul_raw(a: &BigInt, b: &BigInt) -> BigInt {
    a * b / &*ONE_RAW
}

/// `a * 10^18 / b`, truncated toward zero.
fn quo_raw(a: &BigInt, b: &BigInt) -> BigInt {
    a * &*ONE_RAW / b
}

/// `|a - b|` plus the sign of the difference.
fn sub_sign(a: &BigInt, b: &BigInt) -> (BigInt, bool) {
    if a >= b { (a - b, false) } else { (b - a, true) }
}

/// Exponentiation by squaring for a natural number exponent.
fn powi(base: &BigInt, n: &BigInt) -> BigInt {
    let mut z = if n.is_odd() {
        base.clone()
    } else {
        ONE_RAW.clone()
    };
    let mut b = base.clone();
    let mut m: BigInt = n.clone() / 2;
    while !m.is_zero() {
        b = mul_raw(&b, &b);
        if m.is_odd() {
            z = mul_raw(&z, &b);
        }
        m = m / 2;
    }
    z
}

/// `base^exp` for a purely fractional `exp`, via the binomial series.
///
/// `term` carries the magnitude of the current series term; its sign is
/// tracked separately so the loop only works with non-negative values.
fn pow_approx(base: &BigInt, exp: &BigInt) -> BigInt {
    let (x, x_neg) = sub_sign(base, &ONE_RAW);
    let mut term = ONE_RAW.clone();
    let mut sum = term.clone();
    let mut negative = false;

    let mut i = 1u32;
    while term >= *POW_PRECISION {
        let big_k = BigInt::from(i) * &*ONE_RAW;
        let (c, c_neg) = sub_sign(exp, &(&big_k - &*ONE_RAW));
        term = mul_raw(&term, &mul_raw(&c, &x));
        term = quo_raw(&term, &big_k);
        if term.is_zero() {
            break;
        }
        if x_neg {
            negative = !negative;
        }
        if c_neg {
            negative = !negative;
        }
        if negative {
            sum -= &term;
        } else {
            sum += &term;
        }
        i += 1;
    }
    sum
}

impl Display for Dec {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let magnitude = self.0.abs();
        let units = &magnitude / &*ONE_RAW;
        let frac = (&magnitude % &*ONE_RAW).to_string();
        let sign = if self.0.is_negative() { "-" } else { "" };
        write!(formatter, "{sign}{units}.{frac:0>18}")
    }
}

impl Debug for Dec {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl FromStr for Dec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidDecimal(s.to_owned());
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let mut split_dot = rest.splitn(2, '.');
        let units = split_dot
            .next()
            .expect("splitting a string slice yields at least one element");
        let decimals = split_dot.next().unwrap_or("0");
        if units.is_empty()
            || decimals.is_empty()
            || decimals.len() > DECIMAL_PLACES as usize
            || !units.bytes().all(|b| b.is_ascii_digit())
            || !decimals.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let padded = format!("{decimals:0<18}");
        let raw = units.parse::<BigInt>().map_err(|_| invalid())? * &*ONE_RAW
            + padded.parse::<BigInt>().map_err(|_| invalid())?;
        Ok(Self(if negative { -raw } else { raw }))
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
