//! 16.16 fixed-point arithmetic.
//!
//! Scaled blits step through source texel space with a per-call
//! reciprocal of the scale factor. All coordinates wrap in `u32`; the
//! integer part is extracted with a shift and masked against a
//! power-of-two source dimension.

use core::fmt;

use crate::config::FRACTION_BITS;

/// Unsigned 16.16 fixed-point value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Fixed(u32);

impl Fixed {
    /// 0.0
    pub const ZERO: Fixed = Fixed(0);
    /// 1.0
    pub const ONE: Fixed = Fixed(1 << FRACTION_BITS);
    /// Smallest representable step.
    pub const EPSILON: Fixed = Fixed(1);

    /// Create from raw 16.16 bits.
    pub const fn from_bits(bits: u32) -> Self {
        Fixed(bits)
    }

    /// Create from an integer. Values above 0xFFFF wrap.
    pub const fn from_int(value: u32) -> Self {
        Fixed(value << FRACTION_BITS)
    }

    /// Create from `num / den`, saturating. Returns `None` if `den` is zero.
    pub fn from_ratio(num: u32, den: u32) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let bits = ((num as u64) << FRACTION_BITS) / den as u64;
        Some(Fixed(bits.min(u32::MAX as u64) as u32))
    }

    /// Create from a float, rounding to the nearest step.
    ///
    /// Negative and NaN inputs map to zero; large inputs saturate.
    pub fn from_f32(value: f32) -> Self {
        if !(value > 0.0) {
            return Fixed::ZERO;
        }
        let scaled = libm::roundf(value * Self::ONE.0 as f32);
        if scaled >= u32::MAX as f32 {
            Fixed(u32::MAX)
        } else {
            Fixed(scaled as u32)
        }
    }

    /// Raw 16.16 bits.
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Integer part.
    pub const fn integer(self) -> u32 {
        self.0 >> FRACTION_BITS
    }

    /// Fractional part, in 1/65536 units.
    pub const fn fraction(self) -> u32 {
        self.0 & (Self::ONE.0 - 1)
    }

    /// Approximate float value, for diagnostics.
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::ONE.0 as f32
    }

    /// Per-pixel source step for a destination scale factor.
    ///
    /// This is the one division of a scaled blit: `2^32 / scale`, i.e. a
    /// 64-bit dividend with `1` in its high word. A scale of `1.0` yields a
    /// step of `1.0`; a scale of `2.0` yields `0.5` (every texel is drawn
    /// twice). The quotient saturates at `u32::MAX`.
    #[inline]
    pub fn reciprocal_step(scale: Fixed) -> Option<u32> {
        if scale.0 == 0 {
            return None;
        }
        let quotient = (1u64 << 32) / scale.0 as u64;
        Some(quotient.min(u32::MAX as u64) as u32)
    }

    /// Source index for an accumulated coordinate: `(coord >> 16) & mask`.
    ///
    /// `mask` must be a power-of-two dimension minus one; wraparound is the
    /// mask itself, so there is no branch.
    #[inline(always)]
    pub const fn sample(coord: u32, mask: u32) -> u32 {
        (coord >> FRACTION_BITS) & mask
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({}+{}/65536)", self.integer(), self.fraction())
    }
}

impl From<u16> for Fixed {
    fn from(value: u16) -> Self {
        Fixed::from_int(value as u32)
    }
}
