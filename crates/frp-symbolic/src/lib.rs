//! FRP Symbolic Arithmetic
//!
//! Exact scalar arithmetic for probability weights. A [`Quantity`] is
//! either an exact rational [`Numeric`] or a [`Symbolic`] expression built
//! from named parameters.
//!
//! # Architecture
//!
//! Symbolic expressions come in three closed shapes:
//! - [`Monomial`]: coefficient times a product of variables with integer powers
//! - [`MonomialSum`]: like terms collected, sorted by signature
//! - [`RatioOfSums`]: quotient of sums with simple cancellation
//!
//! All arithmetic goes through the [`Arithmetic`] trait, which picks the
//! most specialized result and collapses variable-free expressions back
//! to numbers.

mod expr;
mod monomial;
mod numeric;
mod quantity;
mod ratio;
mod sum;
mod symbol;

pub use expr::Symbolic;
pub use monomial::Monomial;
pub use numeric::Numeric;
pub use quantity::{Arithmetic, Quantity};
pub use ratio::RatioOfSums;
pub use sum::MonomialSum;
pub use symbol::{gen_symbol, symbol, symbols};

/// Error type for symbolic operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolicError {
    #[error("variable names must be non-empty")]
    EmptyVariableName,

    #[error("invalid variable name: {0:?}")]
    InvalidVariableName(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("comparison involves unresolved variables: {0}")]
    Indeterminate(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("exponent out of range: {0}")]
    ExponentTooLarge(String),
}

pub type Result<T> = std::result::Result<T, SymbolicError>;
