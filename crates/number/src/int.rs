//! Arbitrary precision signed integer amounts.

use {
    crate::dec::{Dec, ONE_RAW},
    num::{BigInt, Signed, Zero},
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    std::{
        fmt::{self, Debug, Display, Formatter},
        ops::{Add, Neg, Sub},
        str::FromStr,
    },
};

/// A signed integer of arbitrary precision.
///
/// Token amounts, share supplies and pool balances are plain integers; the
/// fractional [`Dec`] domain is only entered for pricing math and left again
/// through [`Dec::truncate_to_int`].
#[derive(Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Int(BigInt);

impl Int {
    pub fn new(value: i128) -> Self {
        Self(BigInt::from(value))
    }

    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    pub fn one() -> Self {
        Self(BigInt::from(1))
    }

    /// `mantissa * 10^exp`, e.g. `Int::with_decimal(100, 6)` for 100 million.
    pub fn with_decimal(mantissa: i64, exp: u32) -> Self {
        Self(BigInt::from(mantissa) * BigInt::from(10u64).pow(exp))
    }

    pub fn from_big_int(value: BigInt) -> Self {
        Self(value)
    }

    pub fn big_int(&self) -> &BigInt {
        &self.0
    }

    /// Exact conversion into the fixed point decimal domain.
    pub fn to_dec(&self) -> Dec {
        Dec::from_raw(&self.0 * &*ONE_RAW)
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
}

impl Add<&Int> for &Int {
    type Output = Int;

    fn add(self, other: &Int) -> Int {
        Int(&self.0 + &other.0)
    }
}

impl Sub<&Int> for &Int {
    type Output = Int;

    fn sub(self, other: &Int) -> Int {
        Int(&self.0 - &other.0)
    }
}

impl Neg for &Int {
    type Output = Int;

    fn neg(self) -> Int {
        Int(-&self.0)
    }
}

impl From<u64> for Int {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl Display for Int {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, formatter)
    }
}

impl Debug for Int {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, formatter)
    }
}

impl FromStr for Int {
    type Err = num::bigint::ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl Serialize for Int {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Int {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_decimal() {
        assert_eq!(Int::with_decimal(100, 6), Int::new(100_000_000));
        assert_eq!(Int::with_decimal(1, 0), Int::one());
        assert_eq!(Int::with_decimal(-3, 2), Int::new(-300));
    }

    #[test]
    fn arithmetic() {
        let a = Int::new(40);
        let b = Int::new(2);
        assert_eq!(&a + &b, Int::new(42));
        assert_eq!(&a - &b, Int::new(38));
        assert_eq!(-&a, Int::new(-40));
    }

    #[test]
    fn ordering_and_predicates() {
        assert!(Int::new(1) > Int::zero());
        assert!(Int::new(-1) < Int::zero());
        assert!(Int::zero().is_zero());
        assert!(Int::new(7).is_positive());
        assert!(Int::new(-7).is_negative());
    }

    #[test]
    fn to_dec_is_exact() {
        assert_eq!(Int::new(5).to_dec(), Dec::from_int(5));
        assert_eq!(Int::new(-5).to_dec(), Dec::from_int(-5));
        assert_eq!(Int::new(5).to_dec().truncate_to_int(), Int::new(5));
    }

    #[test]
    fn parsing_and_display() {
        assert_eq!("123".parse::<Int>().unwrap(), Int::new(123));
        assert_eq!("-42".parse::<Int>().unwrap(), Int::new(-42));
        assert!("1.5".parse::<Int>().is_err());
        assert_eq!(Int::new(-42).to_string(), "-42");
    }

    #[test]
    fn serde_round_trip() {
        let amount = Int::with_decimal(100, 6);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"100000000\"");
        assert_eq!(serde_json::from_str::<Int>(&json).unwrap(), amount);
    }
}
