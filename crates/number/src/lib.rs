//! Numeric domain for the pool engine: a signed fixed point decimal with 18
//! fractional digits ([`Dec`]) and an arbitrary precision signed integer
//! ([`Int`]), both backed by [`num::BigInt`]. All lossy operations truncate
//! toward zero so results are reproducible bit-for-bit.

pub mod dec;
pub mod int;

pub use self::{dec::Dec, int::Int};
