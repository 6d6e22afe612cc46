//! Pixel-format policy.
//!
//! Source sprites are always 8-bit indexed texels. The policy picks the
//! transfer unit a kernel moves per step: one texel ([`Indexed8`]) or a
//! packed pair of texels ([`Packed16`]). Horizontal command geometry is in
//! texels and is converted to units with [`PixelFormat::SHIFT`].

use core::fmt;

use crate::config::WIDE_COPY_ALIGN;

/// Runtime tag for a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelDepth {
    /// One 8-bit texel per unit.
    Indexed8,
    /// Two 8-bit texels per 16-bit unit.
    Packed16,
}

impl PixelDepth {
    /// Bits per transfer unit.
    pub const fn bits(self) -> u32 {
        match self {
            PixelDepth::Indexed8 => Indexed8::BITS,
            PixelDepth::Packed16 => Packed16::BITS,
        }
    }

    /// Bytes per transfer unit.
    pub const fn unit_bytes(self) -> usize {
        (self.bits() / 8) as usize
    }
}

/// Compile-time behavior of a transfer unit width.
pub trait PixelFormat: 'static {
    /// In-register representation of one unit.
    type Unit: Copy + Eq + fmt::Debug;

    /// Bits per unit.
    const BITS: u32;
    /// `log2` of the unit size in bytes; converts texel geometry to units.
    const SHIFT: u32;
    /// Bytes per unit.
    const UNIT_BYTES: usize = 1 << Self::SHIFT;
    /// Runtime tag.
    const DEPTH: PixelDepth;
    /// Whether the odd-edge pair-packing path applies to this unit width.
    const PACKS_PAIRS: bool;

    /// Read unit `index` of a row.
    fn load(row: &[u8], index: usize) -> Self::Unit;

    /// Write unit `index` of a row.
    fn store(row: &mut [u8], index: usize, unit: Self::Unit);

    /// Reverse the byte order inside a unit.
    ///
    /// Mirrored kernels write units in descending address order; swapping
    /// keeps the texels inside a unit mirrored as well.
    fn swap_unit(unit: Self::Unit) -> Self::Unit;

    /// Whether a row of `units` can be moved with double-wide transfers.
    fn wide_copy(_units: usize, _src: *const u8, _dst: *const u8) -> bool {
        false
    }
}

/// Whether `ptr` is aligned to `align` bytes (`align` is a power of two).
#[inline(always)]
pub fn is_aligned(ptr: *const u8, align: usize) -> bool {
    (ptr as usize) & (align - 1) == 0
}

/// 8-bit indexed units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indexed8;

impl PixelFormat for Indexed8 {
    type Unit = u8;

    const BITS: u32 = 8;
    const SHIFT: u32 = 0;
    const DEPTH: PixelDepth = PixelDepth::Indexed8;
    const PACKS_PAIRS: bool = true;

    #[inline(always)]
    fn load(row: &[u8], index: usize) -> u8 {
        row[index]
    }

    #[inline(always)]
    fn store(row: &mut [u8], index: usize, unit: u8) {
        row[index] = unit;
    }

    #[inline(always)]
    fn swap_unit(unit: u8) -> u8 {
        unit
    }
}

/// 16-bit units holding two packed texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Packed16;

impl PixelFormat for Packed16 {
    type Unit = u16;

    const BITS: u32 = 16;
    const SHIFT: u32 = 1;
    const DEPTH: PixelDepth = PixelDepth::Packed16;
    const PACKS_PAIRS: bool = false;

    #[inline(always)]
    fn load(row: &[u8], index: usize) -> u16 {
        let i = index * 2;
        u16::from_ne_bytes([row[i], row[i + 1]])
    }

    #[inline(always)]
    fn store(row: &mut [u8], index: usize, unit: u16) {
        let i = index * 2;
        row[i..i + 2].copy_from_slice(&unit.to_ne_bytes());
    }

    #[inline(always)]
    fn swap_unit(unit: u16) -> u16 {
        unit.swap_bytes()
    }

    fn wide_copy(units: usize, src: *const u8, dst: *const u8) -> bool {
        units % 4 == 0 && is_aligned(src, WIDE_COPY_ALIGN) && is_aligned(dst, WIDE_COPY_ALIGN)
    }
}
