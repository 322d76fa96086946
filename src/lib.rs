//! Arbitrary-precision fixed-point decimal arithmetic
//!
//! This library provides a single decimal type built for exactness rather
//! than raw throughput:
//!
//! - **`FixedPoint`**: an unbounded signed integer mantissa paired with a
//!   per-value decimal scale
//!   - Value: `mantissa / 10^scale`, always exact
//!   - Scale: any number of digits after the decimal point, adjustable on
//!     an existing value
//!   - Use cases: money, ledgers, rate tables, anywhere binary floating
//!     point error is unacceptable
//!
//! ## Features
//!
//! - **Exact decimal math**: no floating-point rounding errors, ever
//! - **Mixed-operand arithmetic**: integers, floats, and decimal text
//!   coerce to their partner's scale on either side of an operator
//! - **Pluggable rounding**: banker's rounding or add-half-and-chop,
//!   chosen per value at construction
//! - **Serde support**: decimal text in every format (optional)
//!
//! ## Example
//!
//! ```rust
//! use fixedpoint::FixedPoint;
//!
//! let price = FixedPoint::new("1234.56").unwrap();
//! let quantity = FixedPoint::new(100).unwrap();
//! let total = price * quantity; // 123456.00
//!
//! let fine = FixedPoint::with_scale("2500.123456789012", 12).unwrap();
//! assert_eq!(fine.scale(), 12);
//! ```

mod fixed;
mod operand;
mod rounding;

pub use fixed::{Config, FixedPoint, Variant};
pub use operand::Operand;
pub use rounding::Rounding;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("operand cannot be represented as a decimal value")]
    TypeMismatch,

    #[error("invalid decimal literal")]
    InvalidFormat,

    #[error("scale must be a non-negative integer")]
    InvalidScale,

    #[error("division by zero")]
    DivisionByZero,
}

pub type Result<T> = core::result::Result<T, FixedPointError>;
