//! Unscaled scanline copy kernels.

use crate::command::{BlitCommand, BlitFlags};
use crate::config::{COPY_UNROLL, PAIR_ALIGN};
use crate::context::FramebufferContext;
use crate::format::{is_aligned, PixelFormat};

use super::{dest_row, drawable_units, right_edge, source_row, unit_range, RowWalk};

/// Row strategy chosen once per blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPath {
    /// Two 4-byte transfers per four 16-bit units.
    Wide,
    /// Odd-edge 8-bit rows: edge texels singly, interior as texel pairs.
    PackedPairs,
    /// Scalar loop unrolled by four.
    Unrolled,
    /// Plain scalar loop.
    Scalar,
}

impl RowPath {
    fn is_fast(self) -> bool {
        matches!(self, RowPath::Wide | RowPath::PackedPairs)
    }
}

/// Unit offset of the first source row, saturating, and the source stride.
fn source_origin<F: PixelFormat>(cmd: &BlitCommand<'_>) -> (usize, usize) {
    let stride = (cmd.source_width >> F::SHIFT) as usize;
    let origin = stride
        .saturating_mul(cmd.source_y as usize)
        .saturating_add((cmd.source_x >> F::SHIFT) as usize);
    (origin, stride)
}

/// Address of the first byte of a unit row, if it lies inside `buf`.
fn row_ptr<F: PixelFormat>(buf: &[u8], start: isize, units: usize) -> Option<*const u8> {
    let range = unit_range::<F>(start, units)?;
    buf.get(range).map(|row| row.as_ptr())
}

/// Copy `dest_height` rows of `dest_width` texels, left to right.
pub fn straight_copy<F: PixelFormat>(ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) {
    let Some(units) = drawable_units::<F>(ctx, cmd) else {
        return;
    };
    let rows = cmd.dest_height as usize;
    let Some(walk) = RowWalk::new::<F>(ctx, cmd, cmd.dest_x, units, false) else {
        return;
    };
    let (src_origin, src_stride) = source_origin::<F>(cmd);

    let src_ptr = row_ptr::<F>(cmd.source, src_origin as isize, units);
    let dst_ptr = row_ptr::<F>(fb, walk.row(0), units);

    let path = match (src_ptr, dst_ptr) {
        (Some(s), Some(d)) if F::wide_copy(units, s, d) => RowPath::Wide,
        (Some(s), Some(_))
            if F::PACKS_PAIRS
                && cmd.dest_x & 1 == 1
                && units > 4
                && is_aligned(s, PAIR_ALIGN)
                && cmd.flags.contains(BlitFlags::OVERWRITE_EDGES) =>
        {
            RowPath::PackedPairs
        }
        _ if units % COPY_UNROLL == 0 => RowPath::Unrolled,
        _ => RowPath::Scalar,
    };

    let mut written = 0;
    for row in 0..rows {
        let Some(src) = source_row::<F>(cmd.source, src_origin.saturating_add(row.saturating_mul(src_stride)), units) else {
            continue;
        };
        let Some(dst) = dest_row::<F>(fb, walk.row(row), units) else {
            continue;
        };
        match path {
            RowPath::Wide => copy_row_wide(dst, src),
            RowPath::PackedPairs => copy_row_pairs(dst, src),
            RowPath::Unrolled => copy_row_unrolled::<F>(dst, src),
            RowPath::Scalar => copy_row::<F>(dst, src, units),
        }
        written += 1;
    }
    ctx.stats().record_rows(written, path.is_fast());
}

/// Copy `dest_height` rows of `dest_width` texels, right to left.
pub fn mirrored_copy<F: PixelFormat>(ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) {
    let Some(units) = drawable_units::<F>(ctx, cmd) else {
        return;
    };
    let rows = cmd.dest_height as usize;
    let Some(right) = right_edge(cmd) else {
        return;
    };
    let Some(walk) = RowWalk::new::<F>(ctx, cmd, right, units, true) else {
        return;
    };
    let (src_origin, src_stride) = source_origin::<F>(cmd);

    let path = if F::PACKS_PAIRS
        && right & 1 == 0
        && cmd.dest_width > 3
        && cmd.source_x & 1 == 0
        && cmd.flags.contains(BlitFlags::OVERWRITE_EDGES)
    {
        RowPath::PackedPairs
    } else if units % COPY_UNROLL == 0 {
        RowPath::Unrolled
    } else {
        RowPath::Scalar
    };

    let mut written = 0;
    for row in 0..rows {
        let Some(src) = source_row::<F>(cmd.source, src_origin.saturating_add(row.saturating_mul(src_stride)), units) else {
            continue;
        };
        let Some(dst) = dest_row::<F>(fb, walk.row(row), units) else {
            continue;
        };
        match path {
            RowPath::PackedPairs => mirror_row_pairs(dst, src),
            RowPath::Unrolled => mirror_row_unrolled::<F>(dst, src),
            RowPath::Scalar => mirror_row::<F>(dst, src, units),
            // never selected for mirrored rows
            RowPath::Wide => mirror_row::<F>(dst, src, units),
        }
        written += 1;
    }
    ctx.stats().record_rows(written, path.is_fast());
}

#[inline(always)]
fn copy_row<F: PixelFormat>(dst: &mut [u8], src: &[u8], units: usize) {
    for i in 0..units {
        F::store(dst, i, F::load(src, i));
    }
}

#[inline(always)]
fn copy_row_unrolled<F: PixelFormat>(dst: &mut [u8], src: &[u8]) {
    let chunk = COPY_UNROLL * F::UNIT_BYTES;
    for (d, s) in dst.chunks_exact_mut(chunk).zip(src.chunks_exact(chunk)) {
        F::store(d, 0, F::load(s, 0));
        F::store(d, 1, F::load(s, 1));
        F::store(d, 2, F::load(s, 2));
        F::store(d, 3, F::load(s, 3));
    }
}

/// Rows of a multiple of four 16-bit units on 4-byte boundaries.
#[inline(always)]
fn copy_row_wide(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(8).zip(src.chunks_exact(8)) {
        d[..4].copy_from_slice(&s[..4]);
        d[4..].copy_from_slice(&s[4..]);
    }
}

#[inline(always)]
fn mirror_row<F: PixelFormat>(dst: &mut [u8], src: &[u8], units: usize) {
    for i in 0..units {
        F::store(dst, units - 1 - i, F::swap_unit(F::load(src, i)));
    }
}

#[inline(always)]
fn mirror_row_unrolled<F: PixelFormat>(dst: &mut [u8], src: &[u8]) {
    let chunk = COPY_UNROLL * F::UNIT_BYTES;
    for (d, s) in dst.chunks_exact_mut(chunk).rev().zip(src.chunks_exact(chunk)) {
        F::store(d, 3, F::swap_unit(F::load(s, 0)));
        F::store(d, 2, F::swap_unit(F::load(s, 1)));
        F::store(d, 1, F::swap_unit(F::load(s, 2)));
        F::store(d, 0, F::swap_unit(F::load(s, 3)));
    }
}

/// Sliding window over big-endian texel pairs.
///
/// Source pairs are read at even offsets; the window yields the pairs
/// starting at texels 1, 3, 5, ... so an odd-aligned destination can be
/// filled with even-aligned two-texel stores. Reads past the row end yield
/// zero bytes that are never emitted.
struct PairWindow<'s> {
    src: &'s [u8],
    next: usize,
    window: u32,
}

impl<'s> PairWindow<'s> {
    fn new(src: &'s [u8]) -> Self {
        let window = ((Self::pair(src, 0) << 16) | Self::pair(src, 1)) << 8;
        Self { src, next: 2, window }
    }

    #[inline(always)]
    fn pair(src: &[u8], index: usize) -> u32 {
        let hi = src.get(2 * index).copied().unwrap_or(0);
        let lo = src.get(2 * index + 1).copied().unwrap_or(0);
        u16::from_be_bytes([hi, lo]) as u32
    }
}

impl Iterator for PairWindow<'_> {
    type Item = [u8; 2];

    #[inline(always)]
    fn next(&mut self) -> Option<[u8; 2]> {
        let out = ((self.window >> 16) as u16).to_be_bytes();
        self.window = (self.window << 16) | (Self::pair(self.src, self.next) << 8);
        self.next += 1;
        Some(out)
    }
}

/// Straight 8-bit row, destination starting on an odd texel.
fn copy_row_pairs(dst: &mut [u8], src: &[u8]) {
    let units = dst.len();
    let count = (units - 1) >> 1;

    dst[0] = src[0];
    for (d, pair) in dst[1..1 + 2 * count].chunks_exact_mut(2).zip(PairWindow::new(src)) {
        d.copy_from_slice(&pair);
    }
    dst[units - 1] = src[units - 1];
}

/// Mirrored 8-bit row, right edge on an even texel.
fn mirror_row_pairs(dst: &mut [u8], src: &[u8]) {
    let units = dst.len();
    let count = (units - 1) >> 1;

    dst[units - 1] = src[0];
    let interior = &mut dst[units - 1 - 2 * count..units - 1];
    for (d, pair) in interior.chunks_exact_mut(2).rev().zip(PairWindow::new(src)) {
        d.copy_from_slice(&[pair[1], pair[0]]);
    }
    dst[0] = src[units - 1];
}
