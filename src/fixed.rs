use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::{Product, Sum};
use core::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};
use core::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{FixedPointError, Operand, Rounding};

/// Arbitrary-precision fixed-point decimal.
///
/// The represented value is exactly `mantissa / 10^scale`; nothing is ever
/// stored as a binary float. The scale is per-value and can be changed on
/// an existing instance, rescaling the mantissa exactly on the way up and
/// through the configured [`Rounding`] on the way down.
#[derive(Clone)]
pub struct FixedPoint {
    mantissa: BigInt,
    scale: u32,
    rounding: Rounding,
    variant: Variant,
}

// ============================================================================
// Variant Tag
// ============================================================================

/// Distinguishes a stock value from an application-defined specialization
/// that shares its arithmetic.
///
/// The tag rides along through every operation so that a specialized value
/// stays recognizable in results: the left operand's variant wins, and a
/// native operand coerced into an expression first inherits its partner's
/// variant. A derived value appearing only on the right of a base value
/// therefore yields a base result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The stock value type.
    #[default]
    Base,
    /// A specialization, labeled with the name shown by `Debug`.
    Derived(&'static str),
}

impl Variant {
    /// The name rendered by the `Debug` representation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Base => "FixedPoint",
            Self::Derived(name) => name,
        }
    }

    /// Resolves the variant carried by the result of a binary operation.
    ///
    /// The rule is deterministic: the left operand's variant wins. The
    /// right operand never overrides it, so the signature keeps both tags
    /// to make the dispatch point explicit.
    #[must_use]
    pub const fn resolve(left: Self, _right: Self) -> Self {
        left
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Per-value construction configuration: target scale and rounding policy.
///
/// There is no process-wide default to mutate; callers wanting a different
/// policy pass it here (or per call via the `*_with` methods) and the value
/// carries it from then on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Digits kept after the decimal point.
    pub scale: u32,
    /// Strategy applied whenever this value's scale is reduced.
    pub rounding: Rounding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scale: FixedPoint::DEFAULT_SCALE,
            rounding: Rounding::HalfEven,
        }
    }
}

// ============================================================================
// Constants
// ============================================================================

impl FixedPoint {
    /// Scale used when none is requested: two digits, the common monetary
    /// precision.
    pub const DEFAULT_SCALE: u32 = 2;
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl Default for FixedPoint {
    fn default() -> Self {
        Self {
            mantissa: BigInt::zero(),
            scale: Self::DEFAULT_SCALE,
            rounding: Rounding::default(),
            variant: Variant::Base,
        }
    }
}

impl FixedPoint {
    /// Creates a value from any supported operand at the default
    /// configuration (scale 2, banker's rounding).
    ///
    /// Accepted operand categories are integers, decimal text, floats, and
    /// other fixed-point values; see [`Operand`].
    ///
    /// # Errors
    /// Returns `InvalidFormat` for malformed text, `TypeMismatch` for a
    /// non-finite float.
    pub fn new(value: impl Into<Operand>) -> crate::Result<Self> {
        Self::with_config(value, Config::default())
    }

    /// Creates a value at an explicit scale.
    ///
    /// Text and float operands carrying more fractional digits than the
    /// scale are rescaled to it with the default rounding; integer operands
    /// scale up exactly.
    pub fn with_scale(value: impl Into<Operand>, scale: u32) -> crate::Result<Self> {
        Self::with_config(
            value,
            Config {
                scale,
                ..Config::default()
            },
        )
    }

    /// Creates a value with both scale and rounding chosen by the caller.
    ///
    /// The value keeps the rounding policy for every later rescale.
    pub fn with_config(value: impl Into<Operand>, config: Config) -> crate::Result<Self> {
        let Config { scale, rounding } = config;

        match value.into() {
            Operand::Int(i) => Ok(Self {
                mantissa: i * pow10(u64::from(scale)),
                scale,
                rounding,
                variant: Variant::Base,
            }),
            Operand::Text(s) => {
                let literal = parse_literal(&s)?;
                let mantissa = literal.mantissa_at(scale, rounding)?;
                Ok(Self {
                    mantissa,
                    scale,
                    rounding,
                    variant: Variant::Base,
                })
            }
            Operand::Float(value) => {
                if !value.is_finite() {
                    return Err(FixedPointError::TypeMismatch);
                }
                // Route through the shortest decimal text form so binary
                // representation noise never reaches the mantissa.
                let text = format!("{value}");
                let literal = parse_literal(&text)?;
                let mantissa = literal.mantissa_at(scale, rounding)?;
                Ok(Self {
                    mantissa,
                    scale,
                    rounding,
                    variant: Variant::Base,
                })
            }
            Operand::Fixed(other) => {
                let mut out = other;
                if out.scale != scale {
                    out.set_scale_with(scale, rounding);
                }
                out.rounding = rounding;
                Ok(out)
            }
        }
    }

    /// Assembles a value directly from its parts.
    ///
    /// The caller supplies the mantissa already scaled by `10^scale`.
    #[must_use]
    pub fn from_mantissa(mantissa: impl Into<BigInt>, scale: u32) -> Self {
        Self {
            mantissa: mantissa.into(),
            scale,
            rounding: Rounding::default(),
            variant: Variant::Base,
        }
    }

    /// Returns the raw mantissa (the value multiplied by `10^scale`).
    #[inline]
    #[must_use]
    pub const fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Returns the number of digits kept after the decimal point.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns the rounding policy this value carries.
    #[inline]
    #[must_use]
    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Returns the variant tag this value carries.
    #[inline]
    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the scale and rounding as a [`Config`].
    #[inline]
    #[must_use]
    pub const fn config(&self) -> Config {
        Config {
            scale: self.scale,
            rounding: self.rounding,
        }
    }

    /// Re-tags this value with another variant.
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }
}

// ============================================================================
// String Parsing
// ============================================================================

/// A decimal literal reduced to digit run, sign, fraction length, and
/// exponent. The exact value is `±digits * 10^(exponent - frac_len)`.
struct Literal {
    digits: BigInt,
    digit_count: u64,
    negative: bool,
    frac_len: i64,
    exponent: i64,
}

impl Literal {
    /// Produces the mantissa at `scale`, rescaling the exact literal value
    /// down through `rounding` when the literal carries more fractional
    /// digits than the scale keeps.
    fn mantissa_at(&self, scale: u32, rounding: Rounding) -> crate::Result<BigInt> {
        let shift =
            i128::from(self.exponent) - i128::from(self.frac_len) + i128::from(scale);

        let unsigned = if shift >= 0 {
            let exp = u64::try_from(shift).map_err(|_| FixedPointError::InvalidFormat)?;
            &self.digits * pow10(exp)
        } else {
            let down = shift.unsigned_abs();
            if down > u128::from(self.digit_count) {
                // |value| < divisor / 10, so every strategy resolves to zero
                BigInt::zero()
            } else {
                let divisor = pow10(down as u64);
                let (quotient, remainder) = self.digits.div_rem(&divisor);
                rounding.resolve(quotient, &remainder, &divisor)
            }
        };

        Ok(if self.negative { -unsigned } else { unsigned })
    }
}

/// Parses `ws* sign? ws* digits? ('.' digits?)? exponent? ws*` with at
/// least one mantissa digit required somewhere.
fn parse_literal(s: &str) -> crate::Result<Literal> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    while pos < len && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    let mut negative = false;
    if pos < len && (bytes[pos] == b'+' || bytes[pos] == b'-') {
        negative = bytes[pos] == b'-';
        pos += 1;
    }

    while pos < len && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    let mut digits = String::new();
    while pos < len && bytes[pos].is_ascii_digit() {
        digits.push(bytes[pos] as char);
        pos += 1;
    }

    let mut frac_len = 0i64;
    if pos < len && bytes[pos] == b'.' {
        pos += 1;
        while pos < len && bytes[pos].is_ascii_digit() {
            digits.push(bytes[pos] as char);
            frac_len += 1;
            pos += 1;
        }
    }

    if digits.is_empty() {
        return Err(FixedPointError::InvalidFormat);
    }

    let mut exponent = 0i64;
    if pos < len && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;

        let mut exp_negative = false;
        if pos < len && (bytes[pos] == b'+' || bytes[pos] == b'-') {
            exp_negative = bytes[pos] == b'-';
            pos += 1;
        }

        let exp_start = pos;
        while pos < len && bytes[pos].is_ascii_digit() {
            let digit = i64::from(bytes[pos] - b'0');
            exponent = exponent
                .checked_mul(10)
                .and_then(|e| e.checked_add(digit))
                .ok_or(FixedPointError::InvalidFormat)?;
            pos += 1;
        }
        if pos == exp_start {
            return Err(FixedPointError::InvalidFormat);
        }
        if exp_negative {
            exponent = -exponent;
        }
    }

    while pos < len && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    if pos != len {
        return Err(FixedPointError::InvalidFormat);
    }

    let digit_count = digits.len() as u64;
    let digits = digits
        .parse::<BigInt>()
        .map_err(|_| FixedPointError::InvalidFormat)?;

    Ok(Literal {
        digits,
        digit_count,
        negative,
        frac_len,
        exponent,
    })
}

impl FixedPoint {
    /// Parses a decimal literal without dropping any digit the caller
    /// wrote: the stored scale is the larger of [`Self::DEFAULT_SCALE`] and
    /// the literal's own fractional digit count (exponent applied).
    ///
    /// # Errors
    /// Returns `InvalidFormat` if the text does not match the literal
    /// grammar.
    pub fn from_str_exact(s: &str) -> crate::Result<Self> {
        let literal = parse_literal(s)?;

        let implied = i128::from(literal.frac_len) - i128::from(literal.exponent);
        let implied = implied.max(i128::from(Self::DEFAULT_SCALE));
        let scale = u32::try_from(implied).map_err(|_| FixedPointError::InvalidFormat)?;

        let mantissa = literal.mantissa_at(scale, Rounding::HalfEven)?;
        Ok(Self {
            mantissa,
            scale,
            rounding: Rounding::default(),
            variant: Variant::Base,
        })
    }
}

impl FromStr for FixedPoint {
    type Err = FixedPointError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::new(s)
    }
}

// ============================================================================
// Scale Mutation and Rescaling
// ============================================================================

impl FixedPoint {
    /// Changes the scale in place.
    ///
    /// Increasing the scale multiplies the mantissa by a power of ten and
    /// is always exact; decreasing it divides with this value's configured
    /// rounding.
    pub fn set_scale(&mut self, scale: u32) {
        self.set_scale_with(scale, self.rounding);
    }

    /// Changes the scale in place with an explicit rounding strategy for
    /// this one adjustment.
    pub fn set_scale_with(&mut self, scale: u32, rounding: Rounding) {
        self.mantissa = rescaled(
            &self.mantissa,
            u64::from(self.scale),
            u64::from(scale),
            rounding,
        );
        self.scale = scale;
    }

    /// Validating scale setter for scales coming from untrusted input.
    ///
    /// # Errors
    /// Returns `InvalidScale` if `scale` is negative or beyond the
    /// representable range.
    pub fn try_set_scale(&mut self, scale: i64) -> crate::Result<()> {
        let scale = u32::try_from(scale).map_err(|_| FixedPointError::InvalidScale)?;
        self.set_scale(scale);
        Ok(())
    }

    /// By-value form of [`set_scale`](Self::set_scale).
    #[must_use]
    pub fn rescale(mut self, scale: u32) -> Self {
        self.set_scale(scale);
        self
    }

    /// By-value form of [`set_scale_with`](Self::set_scale_with).
    #[must_use]
    pub fn rescale_with(mut self, scale: u32, rounding: Rounding) -> Self {
        self.set_scale_with(scale, rounding);
        self
    }

    /// Mantissa lifted exactly to a coarser-or-equal target scale.
    fn mantissa_at(&self, scale: u32) -> BigInt {
        debug_assert!(scale >= self.scale);
        if scale == self.scale {
            self.mantissa.clone()
        } else {
            &self.mantissa * pow10(u64::from(scale - self.scale))
        }
    }
}

/// Moves a mantissa between scales: multiplication going up, rounded
/// division going down.
fn rescaled(mantissa: &BigInt, from: u64, to: u64, rounding: Rounding) -> BigInt {
    match to.cmp(&from) {
        Ordering::Equal => mantissa.clone(),
        Ordering::Greater => mantissa * pow10(to - from),
        Ordering::Less => {
            let divisor = pow10(from - to);
            let (quotient, remainder) = mantissa.div_rem(&divisor);
            rounding.resolve(quotient, &remainder, &divisor)
        }
    }
}

fn pow10(exp: u64) -> BigInt {
    Pow::pow(BigInt::from(10u32), exp)
}

// ============================================================================
// Coercion
// ============================================================================

impl FixedPoint {
    /// Converts a non-fixed-point operand at this value's scale and
    /// configuration; an operand already fixed-point passes through with
    /// its own scale (binary operations align scales themselves).
    fn coerce(&self, operand: Operand) -> crate::Result<Self> {
        match operand {
            Operand::Fixed(other) => Ok(other),
            other => {
                let mut out = Self::with_config(other, self.config())?;
                out.variant = self.variant;
                Ok(out)
            }
        }
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl FixedPoint {
    /// Addition at the finer of the two scales.
    ///
    /// # Errors
    /// Returns a coercion error when the operand cannot become a decimal.
    pub fn try_add(&self, rhs: impl Into<Operand>) -> crate::Result<Self> {
        let rhs = self.coerce(rhs.into())?;
        let scale = self.scale.max(rhs.scale);
        Ok(Self {
            mantissa: self.mantissa_at(scale) + rhs.mantissa_at(scale),
            scale,
            rounding: self.rounding,
            variant: Variant::resolve(self.variant, rhs.variant),
        })
    }

    /// Subtraction at the finer of the two scales.
    pub fn try_sub(&self, rhs: impl Into<Operand>) -> crate::Result<Self> {
        let rhs = self.coerce(rhs.into())?;
        let scale = self.scale.max(rhs.scale);
        Ok(Self {
            mantissa: self.mantissa_at(scale) - rhs.mantissa_at(scale),
            scale,
            rounding: self.rounding,
            variant: Variant::resolve(self.variant, rhs.variant),
        })
    }

    /// Multiplication: the full-precision product is rescaled back down to
    /// the finer of the two input scales with this value's rounding.
    pub fn try_mul(&self, rhs: impl Into<Operand>) -> crate::Result<Self> {
        let rhs = self.coerce(rhs.into())?;
        let scale = self.scale.max(rhs.scale);
        let raw = &self.mantissa * &rhs.mantissa;
        let mantissa = rescaled(
            &raw,
            u64::from(self.scale) + u64::from(rhs.scale),
            u64::from(scale),
            self.rounding,
        );
        Ok(Self {
            mantissa,
            scale,
            rounding: self.rounding,
            variant: Variant::resolve(self.variant, rhs.variant),
        })
    }

    /// Division at the finer of the two scales.
    ///
    /// The quotient is rounded half-to-even at the target scale regardless
    /// of the configured strategy, so `1 / 3` is the deterministic result
    /// of decimal long division.
    ///
    /// # Errors
    /// Returns `DivisionByZero` when the right operand is zero.
    pub fn try_div(&self, rhs: impl Into<Operand>) -> crate::Result<Self> {
        let rhs = self.coerce(rhs.into())?;
        if rhs.mantissa.is_zero() {
            return Err(FixedPointError::DivisionByZero);
        }

        let scale = self.scale.max(rhs.scale);
        // self / rhs == self.mantissa * 10^rhs.scale / (rhs.mantissa * 10^self.scale),
        // lifted by 10^scale before the integer division
        let shift = u64::from(rhs.scale) + u64::from(scale) - u64::from(self.scale);
        let mut numerator = &self.mantissa * pow10(shift);
        let mut denominator = rhs.mantissa.clone();
        if denominator.is_negative() {
            numerator = -numerator;
            denominator = -denominator;
        }

        let (quotient, remainder) = numerator.div_rem(&denominator);
        let mantissa = Rounding::HalfEven.resolve(quotient, &remainder, &denominator);
        Ok(Self {
            mantissa,
            scale,
            rounding: self.rounding,
            variant: Variant::resolve(self.variant, rhs.variant),
        })
    }

    /// Floor division paired with the remainder.
    ///
    /// The quotient is an unscaled integer (the floor of the true
    /// quotient); the remainder carries the divisor's sign at the finer of
    /// the two scales, so `-7 divmod 4` is `(-2, 1)`.
    ///
    /// # Errors
    /// Returns `DivisionByZero` when the right operand is zero.
    pub fn divmod(&self, rhs: impl Into<Operand>) -> crate::Result<(BigInt, Self)> {
        let rhs = self.coerce(rhs.into())?;
        if rhs.mantissa.is_zero() {
            return Err(FixedPointError::DivisionByZero);
        }

        let scale = self.scale.max(rhs.scale);
        let (quotient, remainder) = self
            .mantissa_at(scale)
            .div_mod_floor(&rhs.mantissa_at(scale));
        Ok((
            quotient,
            Self {
                mantissa: remainder,
                scale,
                rounding: self.rounding,
                variant: Variant::resolve(self.variant, rhs.variant),
            },
        ))
    }

    /// Remainder of floor division; the result has the divisor's sign.
    pub fn try_rem(&self, rhs: impl Into<Operand>) -> crate::Result<Self> {
        self.divmod(rhs).map(|(_, remainder)| remainder)
    }

    /// Absolute value; scale and configuration unchanged.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            scale: self.scale,
            rounding: self.rounding,
            variant: self.variant,
        }
    }

    /// Fractional part: the value minus its integer part truncated toward
    /// zero, at the same scale. Negative values keep a negative fraction.
    #[must_use]
    pub fn frac(&self) -> Self {
        Self {
            mantissa: &self.mantissa % pow10(u64::from(self.scale)),
            scale: self.scale,
            rounding: self.rounding,
            variant: self.variant,
        }
    }

    /// Whether the represented value is exactly zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Whether the represented value is below zero.
    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Whether the represented value is above zero.
    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.mantissa.is_positive()
    }
}

// ============================================================================
// Conversions Out
// ============================================================================

impl FixedPoint {
    /// Integer part, truncated toward zero: `-1.99` becomes `-1`.
    #[must_use]
    pub fn to_integer(&self) -> BigInt {
        &self.mantissa / pow10(u64::from(self.scale))
    }

    /// Truncated integer part when it fits an `i64`.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.to_integer().to_i64()
    }

    /// Truncated integer part when it fits an `i128`.
    #[must_use]
    pub fn to_i128(&self) -> Option<i128> {
        self.to_integer().to_i128()
    }

    /// Nearest binary float, computed as a single floating-point division
    /// of mantissa by `10^scale`. Binary rounding error at this boundary is
    /// unavoidable.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        let mantissa = self.mantissa.to_f64().unwrap_or_else(|| {
            if self.mantissa.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        });
        let divisor = i32::try_from(self.scale).map_or(f64::INFINITY, |s| 10f64.powi(s));
        mantissa / divisor
    }
}

// ============================================================================
// Comparison and Hashing
// ============================================================================

impl FixedPoint {
    /// Total order over the represented rational values, independent of
    /// how each side happens to be scaled.
    fn value_cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.mantissa_at(scale).cmp(&other.mantissa_at(scale))
    }

    /// Canonical `(mantissa, scale)` with trailing zero factors removed;
    /// two value-equal instances always reduce to the same parts.
    fn canonical_parts(&self) -> (BigInt, u32) {
        let mut mantissa = self.mantissa.clone();
        let mut scale = self.scale;
        let ten = BigInt::from(10u32);
        while scale > 0 {
            let (quotient, remainder) = mantissa.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            mantissa = quotient;
            scale -= 1;
        }
        (mantissa, scale)
    }
}

impl PartialEq for FixedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.value_cmp(other) == Ordering::Equal
    }
}

impl Eq for FixedPoint {}

impl PartialOrd for FixedPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value_cmp(other)
    }
}

impl Hash for FixedPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (mantissa, scale) = self.canonical_parts();
        mantissa.hash(state);
        scale.hash(state);
    }
}

impl PartialEq<i64> for FixedPoint {
    fn eq(&self, other: &i64) -> bool {
        Self::with_config(*other, self.config()).is_ok_and(|rhs| *self == rhs)
    }
}

impl PartialEq<FixedPoint> for i64 {
    fn eq(&self, other: &FixedPoint) -> bool {
        other == self
    }
}

impl PartialEq<f64> for FixedPoint {
    fn eq(&self, other: &f64) -> bool {
        Self::with_config(*other, self.config()).is_ok_and(|rhs| *self == rhs)
    }
}

impl PartialEq<FixedPoint> for f64 {
    fn eq(&self, other: &FixedPoint) -> bool {
        other == self
    }
}

// ============================================================================
// Operator Overloading
// ============================================================================

impl<T: Into<Operand>> Add<T> for FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn add(self, rhs: T) -> FixedPoint {
        self.try_add(rhs).expect("invalid operand in fixed-point addition")
    }
}

impl<T: Into<Operand>> Add<T> for &FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn add(self, rhs: T) -> FixedPoint {
        self.try_add(rhs).expect("invalid operand in fixed-point addition")
    }
}

impl<T: Into<Operand>> Sub<T> for FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn sub(self, rhs: T) -> FixedPoint {
        self.try_sub(rhs)
            .expect("invalid operand in fixed-point subtraction")
    }
}

impl<T: Into<Operand>> Sub<T> for &FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn sub(self, rhs: T) -> FixedPoint {
        self.try_sub(rhs)
            .expect("invalid operand in fixed-point subtraction")
    }
}

impl<T: Into<Operand>> Mul<T> for FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn mul(self, rhs: T) -> FixedPoint {
        self.try_mul(rhs)
            .expect("invalid operand in fixed-point multiplication")
    }
}

impl<T: Into<Operand>> Mul<T> for &FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn mul(self, rhs: T) -> FixedPoint {
        self.try_mul(rhs)
            .expect("invalid operand in fixed-point multiplication")
    }
}

impl<T: Into<Operand>> Div<T> for FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn div(self, rhs: T) -> FixedPoint {
        self.try_div(rhs)
            .expect("attempt to divide by zero or invalid operand")
    }
}

impl<T: Into<Operand>> Div<T> for &FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn div(self, rhs: T) -> FixedPoint {
        self.try_div(rhs)
            .expect("attempt to divide by zero or invalid operand")
    }
}

impl<T: Into<Operand>> Rem<T> for FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn rem(self, rhs: T) -> FixedPoint {
        self.try_rem(rhs)
            .expect("attempt to take remainder by zero or invalid operand")
    }
}

impl<T: Into<Operand>> Rem<T> for &FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn rem(self, rhs: T) -> FixedPoint {
        self.try_rem(rhs)
            .expect("attempt to take remainder by zero or invalid operand")
    }
}

impl Neg for FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn neg(self) -> FixedPoint {
        FixedPoint {
            mantissa: -self.mantissa,
            scale: self.scale,
            rounding: self.rounding,
            variant: self.variant,
        }
    }
}

impl Neg for &FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn neg(self) -> FixedPoint {
        FixedPoint {
            mantissa: -&self.mantissa,
            scale: self.scale,
            rounding: self.rounding,
            variant: self.variant,
        }
    }
}

impl<T: Into<Operand>> AddAssign<T> for FixedPoint {
    #[inline]
    fn add_assign(&mut self, rhs: T) {
        *self = self.try_add(rhs).expect("invalid operand in fixed-point addition");
    }
}

impl<T: Into<Operand>> SubAssign<T> for FixedPoint {
    #[inline]
    fn sub_assign(&mut self, rhs: T) {
        *self = self
            .try_sub(rhs)
            .expect("invalid operand in fixed-point subtraction");
    }
}

impl<T: Into<Operand>> MulAssign<T> for FixedPoint {
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        *self = self
            .try_mul(rhs)
            .expect("invalid operand in fixed-point multiplication");
    }
}

impl<T: Into<Operand>> DivAssign<T> for FixedPoint {
    #[inline]
    fn div_assign(&mut self, rhs: T) {
        *self = self
            .try_div(rhs)
            .expect("attempt to divide by zero or invalid operand");
    }
}

impl<T: Into<Operand>> RemAssign<T> for FixedPoint {
    #[inline]
    fn rem_assign(&mut self, rhs: T) {
        *self = self
            .try_rem(rhs)
            .expect("attempt to take remainder by zero or invalid operand");
    }
}

// Reflected forms: the native left operand is coerced at its partner's
// scale, then the operation runs in the written order (subtraction and
// division are not commutative).
macro_rules! impl_reflected_ops {
    ( $( $type:ty ),* ) => {
        $(
            impl Add<FixedPoint> for $type {
                type Output = FixedPoint;

                fn add(self, rhs: FixedPoint) -> FixedPoint {
                    rhs.coerce(Operand::from(self))
                        .and_then(|lhs| lhs.try_add(rhs))
                        .expect("invalid operand in fixed-point addition")
                }
            }

            impl Sub<FixedPoint> for $type {
                type Output = FixedPoint;

                fn sub(self, rhs: FixedPoint) -> FixedPoint {
                    rhs.coerce(Operand::from(self))
                        .and_then(|lhs| lhs.try_sub(rhs))
                        .expect("invalid operand in fixed-point subtraction")
                }
            }

            impl Mul<FixedPoint> for $type {
                type Output = FixedPoint;

                fn mul(self, rhs: FixedPoint) -> FixedPoint {
                    rhs.coerce(Operand::from(self))
                        .and_then(|lhs| lhs.try_mul(rhs))
                        .expect("invalid operand in fixed-point multiplication")
                }
            }

            impl Div<FixedPoint> for $type {
                type Output = FixedPoint;

                fn div(self, rhs: FixedPoint) -> FixedPoint {
                    rhs.coerce(Operand::from(self))
                        .and_then(|lhs| lhs.try_div(rhs))
                        .expect("attempt to divide by zero or invalid operand")
                }
            }

            impl Rem<FixedPoint> for $type {
                type Output = FixedPoint;

                fn rem(self, rhs: FixedPoint) -> FixedPoint {
                    rhs.coerce(Operand::from(self))
                        .and_then(|lhs| lhs.try_rem(rhs))
                        .expect("attempt to take remainder by zero or invalid operand")
                }
            }
        )*
    };
}

impl_reflected_ops!(i64, f64, &str);

// ============================================================================
// Standard Library Trait Implementations
// ============================================================================

impl From<i64> for FixedPoint {
    fn from(value: i64) -> Self {
        Self {
            mantissa: BigInt::from(value) * pow10(u64::from(Self::DEFAULT_SCALE)),
            scale: Self::DEFAULT_SCALE,
            rounding: Rounding::default(),
            variant: Variant::Base,
        }
    }
}

impl From<i32> for FixedPoint {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<BigInt> for FixedPoint {
    fn from(value: BigInt) -> Self {
        Self {
            mantissa: value * pow10(u64::from(Self::DEFAULT_SCALE)),
            scale: Self::DEFAULT_SCALE,
            rounding: Rounding::default(),
            variant: Variant::Base,
        }
    }
}

impl TryFrom<f64> for FixedPoint {
    type Error = FixedPointError;

    fn try_from(value: f64) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<f32> for FixedPoint {
    type Error = FixedPointError;

    fn try_from(value: f32) -> crate::Result<Self> {
        Self::new(value)
    }
}

// ============================================================================
// Iterator and Numeric Trait Implementations
// ============================================================================

impl Sum for FixedPoint {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a FixedPoint> for FixedPoint {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, x| acc + x)
    }
}

impl Product for FixedPoint {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

impl<'a> Product<&'a FixedPoint> for FixedPoint {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

impl Zero for FixedPoint {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }
}

impl One for FixedPoint {
    fn one() -> Self {
        Self {
            mantissa: pow10(u64::from(Self::DEFAULT_SCALE)),
            scale: Self::DEFAULT_SCALE,
            rounding: Rounding::default(),
            variant: Variant::Base,
        }
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Display for FixedPoint {
    /// Sign, integer digits, `.`, then exactly `scale` fractional digits.
    /// A scale of zero keeps the trailing `.` with nothing after it, so
    /// the scale is always readable from the text form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut digits = self.mantissa.magnitude().to_string();
        let scale = self.scale as usize;

        if digits.len() <= scale {
            let mut padded = String::with_capacity(scale + 1);
            for _ in 0..=(scale - digits.len()) {
                padded.push('0');
            }
            padded.push_str(&digits);
            digits = padded;
        }

        let split = digits.len() - scale;
        if self.mantissa.is_negative() {
            f.write_str("-")?;
        }
        f.write_str(&digits[..split])?;
        f.write_str(".")?;
        f.write_str(&digits[split..])
    }
}

impl fmt::Debug for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // {:#?} shows raw internals
            f.debug_struct(self.variant.name())
                .field("mantissa", &self.mantissa)
                .field("scale", &self.scale)
                .field("rounding", &self.rounding)
                .finish()
        } else {
            // {:?} shows the variant name, text form, and scale
            write!(f, "{}('{}', {})", self.variant.name(), self, self.scale)
        }
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for FixedPoint {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Decimal text in every format; persistence beyond the text form
        // is out of scope.
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for FixedPoint {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_exact(&s).map_err(de::Error::custom)
    }
}


#[cfg(test)]
mod prop_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn prop_text_round_trips(mantissa in any::<i64>(), scale in 0u32..12) {
            let value = FixedPoint::from_mantissa(mantissa, scale);
            let parsed = FixedPoint::from_str_exact(&value.to_string()).unwrap();
            prop_assert_eq!(parsed, value);
        }

        #[test]
        fn prop_rescale_up_is_exact(mantissa in any::<i64>(), scale in 0u32..12, lift in 1u32..8) {
            let value = FixedPoint::from_mantissa(mantissa, scale);
            let lifted = value.clone().rescale(scale + lift);
            prop_assert_eq!(&lifted, &value);

            let back = lifted.rescale(scale);
            prop_assert_eq!(back.mantissa(), value.mantissa());
        }

        #[test]
        fn prop_addition_commutes(
            a in any::<i64>(), sa in 0u32..8,
            b in any::<i64>(), sb in 0u32..8,
        ) {
            let x = FixedPoint::from_mantissa(a, sa);
            let y = FixedPoint::from_mantissa(b, sb);
            prop_assert_eq!(x.clone() + y.clone(), y + x);
        }

        #[test]
        fn prop_multiplication_commutes(
            a in any::<i64>(), sa in 0u32..8,
            b in any::<i64>(), sb in 0u32..8,
        ) {
            let x = FixedPoint::from_mantissa(a, sa);
            let y = FixedPoint::from_mantissa(b, sb);
            prop_assert_eq!(x.clone() * y.clone(), y * x);
        }

        #[test]
        fn prop_subtraction_negates_reversed(
            a in any::<i64>(), sa in 0u32..8,
            b in any::<i64>(), sb in 0u32..8,
        ) {
            let x = FixedPoint::from_mantissa(a, sa);
            let y = FixedPoint::from_mantissa(b, sb);
            prop_assert_eq!(x.clone() - y.clone(), -(y - x));
        }
    }
}
