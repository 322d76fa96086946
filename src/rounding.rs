use core::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// Policy applied when a mantissa is divided and the remainder must be
/// resolved into the final quotient, i.e. whenever a value's scale is
/// reduced.
///
/// The strategy travels with each value (see [`Config`](crate::Config));
/// there is no process-wide rounding state to configure or restore.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round half to even, also known as banker's rounding.
    ///
    /// A remainder below half the divisor truncates, above half rounds
    /// away from zero, and exactly half rounds to whichever candidate
    /// quotient has an even last digit. This is the default because it is
    /// statistically unbiased over long accumulation chains.
    #[default]
    HalfEven,

    /// Add half the divisor (with the dividend's sign), then truncate
    /// toward zero.
    ///
    /// An exact half always rounds away from zero: 1.5 → 2, 2.5 → 3,
    /// -2.5 → -3.
    HalfUp,
}

impl Rounding {
    /// Resolves a truncated division into the final quotient.
    ///
    /// `quotient` and `remainder` must come from truncating division of
    /// the original mantissa by `divisor`: the remainder carries the
    /// dividend's sign and `divisor` is strictly positive.
    #[must_use = "this returns the rounded quotient, without modifying the inputs"]
    pub fn resolve(self, quotient: BigInt, remainder: &BigInt, divisor: &BigInt) -> BigInt {
        if remainder.is_zero() {
            return quotient;
        }

        let twice = remainder.abs() * BigInt::from(2);

        match self {
            Self::HalfEven => match twice.cmp(divisor) {
                Ordering::Less => quotient,
                Ordering::Greater => away_from_zero(quotient, remainder),
                Ordering::Equal => {
                    if quotient.is_even() {
                        quotient
                    } else {
                        away_from_zero(quotient, remainder)
                    }
                }
            },
            Self::HalfUp => {
                if twice >= *divisor {
                    away_from_zero(quotient, remainder)
                } else {
                    quotient
                }
            }
        }
    }
}

/// Steps the quotient one unit further from zero, in the direction the
/// discarded remainder points.
fn away_from_zero(quotient: BigInt, remainder: &BigInt) -> BigInt {
    if remainder.is_negative() {
        quotient - BigInt::one()
    } else {
        quotient + BigInt::one()
    }
}
