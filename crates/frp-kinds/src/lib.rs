//! FRP Kinds
//!
//! Exact finite probability distributions over tuples of quantities. A
//! [`Kind`] is kept in canonical form: values unique and sorted, weights
//! summing to one. Weights may be exact rationals or symbolic expressions
//! in free parameters, and every combinator works the same way for both.
//!
//! ```
//! use frp_kinds::{builders::either, value};
//!
//! let coin = either(0, 1, 1).unwrap();
//! let two = coin.power(2).unwrap();
//! assert_eq!(two.size(), 4);
//! assert_eq!(two.weight_of(&value![1, 1]), "1/4".parse::<frp_kinds::Quantity>().unwrap());
//! ```

mod applicative;
mod branch;
pub mod builders;
mod conditional;
pub mod config;
mod display;
mod kind;
mod sample;
mod statistic;
mod value;

pub use applicative::FnKind;
pub use branch::{normalize, Branch};
pub use conditional::{ConditionalKind, Hints};
pub use config::{ConfigLoader, DisplayConfig, FrpConfig, SamplingConfig};
pub use kind::{Expectation, Kind};
pub use statistic::{FnStatistic, Marginal, Projection, Statistic};
pub use value::Value;

pub use frp_symbolic::{Arithmetic, Numeric, Quantity, SymbolicError};

/// Error type for distribution operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrpError {
    /// A branch list could not be brought into canonical form
    #[error("construction error: {0}")]
    Construction(String),

    /// A combinator was given incompatible arguments
    #[error("kind error: {0}")]
    Kind(String),

    /// A conditional Kind was called outside its domain
    #[error("mismatched domain: {0}")]
    MismatchedDomain(String),

    /// An operation is not possible for these weights or values
    #[error("operation error: {0}")]
    Operation(String),

    #[error(transparent)]
    Symbolic(#[from] SymbolicError),
}

pub type Result<T> = std::result::Result<T, FrpError>;
