//! Sprite blit kernels.
//!
//! Four kernels, each generic over a [`PixelFormat`]:
//!
//! - `straight_copy`: unscaled, rows written left-to-right
//! - `mirrored_copy`: unscaled, rows written right-to-left
//! - `scaled_straight`: fixed-point resampled, left-to-right
//! - `scaled_mirrored`: fixed-point resampled, right-to-left
//!
//! Vertical mirroring is not a kernel of its own: every kernel starts at
//! the last destination row and walks the framebuffer with a negated pitch.
//!
//! Rows are accessed through checked slicing. A row that falls outside the
//! source or the framebuffer is skipped; fast and scalar paths share that
//! guard.

mod copy;
mod scale;

pub use copy::{mirrored_copy, straight_copy};
pub use scale::{scaled_mirrored, scaled_straight};

use core::ops::Range;

use crate::command::{BlitCommand, BlitFlags};
use crate::context::FramebufferContext;
use crate::format::PixelFormat;

/// Signature shared by all kernels.
pub type KernelFn = fn(&FramebufferContext, &mut [u8], &BlitCommand<'_>);

/// Destination row walk, in units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowWalk {
    /// Unit offset of the first row's leftmost written unit.
    first: isize,
    /// Signed unit distance between consecutive rows.
    stride: isize,
}

impl RowWalk {
    /// Walk for a command whose rows start at texel column `edge_x`.
    ///
    /// `edge_x` is the left edge for straight kernels and the right edge for
    /// mirrored ones; in the latter case the walk is shifted left so that it
    /// addresses the row's leftmost unit. Returns `None` when the first row
    /// lies beyond the addressable range.
    pub(crate) fn new<F: PixelFormat>(
        ctx: &FramebufferContext,
        cmd: &BlitCommand<'_>,
        edge_x: u32,
        units: usize,
        mirrored: bool,
    ) -> Option<Self> {
        let pitch = ctx.pitch();
        let mut y = cmd.dest_y as usize;
        let mut stride = isize::try_from(pitch >> F::SHIFT).ok()?;

        if cmd.flags.contains(BlitFlags::MIRROR_VERTICAL) {
            y = y.checked_add(cmd.dest_height.saturating_sub(1) as usize)?;
            stride = -stride;
        }

        let offset = y.checked_mul(pitch)?.checked_add(edge_x as usize)?;
        let mut first = isize::try_from(offset >> F::SHIFT).ok()?;
        if mirrored {
            first -= units as isize - 1;
        }

        Some(Self { first, stride })
    }

    /// Unit offset of row `row`.
    ///
    /// Saturates; a saturated offset never names a row inside a buffer.
    #[inline(always)]
    pub(crate) fn row(&self, row: usize) -> isize {
        (row as isize)
            .saturating_mul(self.stride)
            .saturating_add(self.first)
    }
}

/// Rightmost texel column of the destination rectangle.
#[inline(always)]
pub(crate) fn right_edge(cmd: &BlitCommand<'_>) -> Option<u32> {
    cmd.dest_x.checked_add(cmd.dest_width.checked_sub(1)?)
}

/// Byte range of `units` units starting at unit `start`.
#[inline(always)]
pub(crate) fn unit_range<F: PixelFormat>(start: isize, units: usize) -> Option<Range<usize>> {
    let start = usize::try_from(start).ok()?.checked_mul(F::UNIT_BYTES)?;
    let end = start.checked_add(units.checked_mul(F::UNIT_BYTES)?)?;
    Some(start..end)
}

/// Checked source row.
#[inline(always)]
pub(crate) fn source_row<'s, F: PixelFormat>(
    source: &'s [u8],
    start: usize,
    units: usize,
) -> Option<&'s [u8]> {
    source.get(unit_range::<F>(start as isize, units)?)
}

/// Checked destination row.
#[inline(always)]
pub(crate) fn dest_row<'d, F: PixelFormat>(
    fb: &'d mut [u8],
    start: isize,
    units: usize,
) -> Option<&'d mut [u8]> {
    fb.get_mut(unit_range::<F>(start, units)?)
}

/// Number of whole units per destination row, or `None` for a no-op blit.
///
/// Records suppressed and empty commands in the context statistics.
pub(crate) fn drawable_units<F: PixelFormat>(
    ctx: &FramebufferContext,
    cmd: &BlitCommand<'_>,
) -> Option<usize> {
    if ctx.suppress_draw() {
        ctx.stats().record_suppressed();
        return None;
    }
    empty_check::<F>(ctx, cmd)
}

pub(crate) fn empty_check<F: PixelFormat>(
    ctx: &FramebufferContext,
    cmd: &BlitCommand<'_>,
) -> Option<usize> {
    let units = (cmd.dest_width >> F::SHIFT) as usize;
    if units == 0 || cmd.dest_height == 0 || cmd.source_width >> F::SHIFT == 0 {
        ctx.stats().record_empty();
        return None;
    }
    Some(units)
}
