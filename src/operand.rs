use num_bigint::BigInt;

use crate::FixedPoint;

/// The closed set of input categories a [`FixedPoint`] can be built from
/// or combined with.
///
/// Anything outside these four categories simply has no `From` impl, so a
/// mismatched operand is rejected at compile time; the only run-time
/// coercion failures left are floats that denote no decimal (NaN,
/// infinities) and text that fails the literal grammar.
#[derive(Clone, Debug)]
pub enum Operand {
    /// A native integer of any width.
    Int(BigInt),
    /// A binary floating-point number, converted through its shortest
    /// decimal text form rather than its bits.
    Float(f64),
    /// A decimal literal.
    Text(String),
    /// An existing fixed-point value.
    Fixed(FixedPoint),
}

macro_rules! impl_operand_from_int {
    ( $( $type:ty ),* ) => {
        $(
            impl From<$type> for Operand {
                fn from(n: $type) -> Self {
                    Self::Int(BigInt::from(n))
                }
            }
        )*
    };
}

impl_operand_from_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl From<BigInt> for Operand {
    fn from(n: BigInt) -> Self {
        Self::Int(n)
    }
}

impl From<&BigInt> for Operand {
    fn from(n: &BigInt) -> Self {
        Self::Int(n.clone())
    }
}

impl From<f32> for Operand {
    fn from(n: f32) -> Self {
        Self::Float(f64::from(n))
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for Operand {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<FixedPoint> for Operand {
    fn from(value: FixedPoint) -> Self {
        Self::Fixed(value)
    }
}

impl From<&FixedPoint> for Operand {
    fn from(value: &FixedPoint) -> Self {
        Self::Fixed(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widths_map_to_int() {
        assert!(matches!(Operand::from(42u8), Operand::Int(_)));
        assert!(matches!(Operand::from(-42i64), Operand::Int(_)));
        assert!(matches!(Operand::from(42u128), Operand::Int(_)));
        assert!(matches!(Operand::from(BigInt::from(7)), Operand::Int(_)));
    }

    #[test]
    fn test_floats_map_to_float() {
        assert!(matches!(Operand::from(1.5f32), Operand::Float(_)));
        assert!(matches!(Operand::from(1.5f64), Operand::Float(_)));
    }

    #[test]
    fn test_text_maps_to_text() {
        assert!(matches!(Operand::from("1.5"), Operand::Text(_)));
        assert!(matches!(Operand::from(String::from("1.5")), Operand::Text(_)));
    }

    #[test]
    fn test_fixed_point_maps_to_fixed() {
        let value = FixedPoint::default();
        assert!(matches!(Operand::from(&value), Operand::Fixed(_)));
        assert!(matches!(Operand::from(value), Operand::Fixed(_)));
    }
}
