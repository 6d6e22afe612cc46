//! Fixed-point scaled kernels.
//!
//! Each destination pixel maps back to a source texel through 16.16
//! coordinates `u` (column) and `v` (row) that advance by one reciprocal
//! step per destination pixel and per destination row. Source indices are
//! masked against the power-of-two source dimensions, so sampling past the
//! edge wraps around.

use crate::command::BlitCommand;
use crate::config::{FRACTION_BITS, SCALED_UNROLL};
use crate::context::FramebufferContext;
use crate::fixed::Fixed;
use crate::format::PixelFormat;

use super::{dest_row, empty_check, right_edge, source_row, RowWalk};

/// Source addressing for one scaled blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sampler {
    /// Per-pixel and per-row increment.
    pub(crate) step: u32,
    /// Source row length in units.
    pub(crate) stride: usize,
    /// Column wrap mask, in units.
    pub(crate) umask: u32,
    /// Row wrap mask.
    pub(crate) vmask: u32,
    /// Initial column coordinate.
    pub(crate) ustart: u32,
    /// Initial row coordinate.
    pub(crate) vstart: u32,
}

impl Sampler {
    pub(crate) fn new<F: PixelFormat>(cmd: &BlitCommand<'_>, step: u32) -> Self {
        let stride = (cmd.source_width >> F::SHIFT) as usize;
        Self {
            step,
            stride,
            umask: (stride as u32).wrapping_sub(1),
            vmask: cmd.source_height.wrapping_sub(1),
            ustart: (cmd.source_x >> F::SHIFT) << FRACTION_BITS,
            vstart: cmd.source_y << FRACTION_BITS,
        }
    }

    /// Unit offset of the source row sampled at `v`.
    #[inline(always)]
    pub(crate) fn row_start(&self, v: u32) -> usize {
        Fixed::sample(v, self.vmask) as usize * self.stride
    }

    /// Source unit sampled at `u`.
    #[inline(always)]
    pub(crate) fn column(&self, u: u32) -> usize {
        Fixed::sample(u, self.umask) as usize
    }
}

/// Shared scaled-kernel setup: the reciprocal divide and the no-op checks.
///
/// The divide runs before the zero-area check, and before the suppression
/// check when `divide_when_suppressed` is configured.
fn prologue<F: PixelFormat>(ctx: &FramebufferContext, cmd: &BlitCommand<'_>) -> Option<(u32, usize)> {
    let suppressed = ctx.suppress_draw();
    if suppressed && !ctx.config().divide_when_suppressed {
        ctx.stats().record_suppressed();
        return None;
    }

    let step = Fixed::reciprocal_step(cmd.scale);
    if suppressed {
        let _ = core::hint::black_box(step);
        ctx.stats().record_suppressed();
        return None;
    }

    let units = empty_check::<F>(ctx, cmd)?;
    if cmd.source_height == 0 {
        ctx.stats().record_empty();
        return None;
    }
    Some((step?, units))
}

/// Resample the source into `dest_width × dest_height`, left to right.
pub fn scaled_straight<F: PixelFormat>(ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) {
    let Some((step, units)) = prologue::<F>(ctx, cmd) else {
        return;
    };
    let Some(walk) = RowWalk::new::<F>(ctx, cmd, cmd.dest_x, units, false) else {
        return;
    };
    let written = scale_rows::<F>(fb, cmd, &walk, Sampler::new::<F>(cmd, step), units, sample_row::<F>);
    ctx.stats().record_rows(written, false);
}

/// Resample the source into `dest_width × dest_height`, right to left.
pub fn scaled_mirrored<F: PixelFormat>(ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) {
    let Some((step, units)) = prologue::<F>(ctx, cmd) else {
        return;
    };
    let Some(right) = right_edge(cmd) else {
        return;
    };
    let Some(walk) = RowWalk::new::<F>(ctx, cmd, right, units, true) else {
        return;
    };
    let written = scale_rows::<F>(fb, cmd, &walk, Sampler::new::<F>(cmd, step), units, sample_row_mirrored::<F>);
    ctx.stats().record_rows(written, false);
}

type RowSampler = fn(&mut [u8], &[u8], &Sampler);

#[inline(always)]
fn scale_rows<F: PixelFormat>(
    fb: &mut [u8],
    cmd: &BlitCommand<'_>,
    walk: &RowWalk,
    sampler: Sampler,
    units: usize,
    sample: RowSampler,
) -> usize {
    let mut v = sampler.vstart;
    let mut written = 0;
    for row in 0..cmd.dest_height as usize {
        let start = sampler.row_start(v);
        v = v.wrapping_add(sampler.step);

        let Some(src) = source_row::<F>(cmd.source, start, sampler.stride) else {
            continue;
        };
        let Some(dst) = dest_row::<F>(fb, walk.row(row), units) else {
            continue;
        };
        sample(dst, src, &sampler);
        written += 1;
    }
    written
}

fn sample_row<F: PixelFormat>(dst: &mut [u8], src: &[u8], sampler: &Sampler) {
    let mut u = sampler.ustart;
    let mut blocks = dst.chunks_exact_mut(SCALED_UNROLL * F::UNIT_BYTES);
    for block in &mut blocks {
        for i in 0..SCALED_UNROLL {
            F::store(block, i, F::load(src, sampler.column(u)));
            u = u.wrapping_add(sampler.step);
        }
    }
    let tail = blocks.into_remainder();
    for i in 0..tail.len() >> F::SHIFT {
        F::store(tail, i, F::load(src, sampler.column(u)));
        u = u.wrapping_add(sampler.step);
    }
}

fn sample_row_mirrored<F: PixelFormat>(dst: &mut [u8], src: &[u8], sampler: &Sampler) {
    let mut u = sampler.ustart;
    let mut blocks = dst.rchunks_exact_mut(SCALED_UNROLL * F::UNIT_BYTES);
    for block in &mut blocks {
        for i in (0..SCALED_UNROLL).rev() {
            F::store(block, i, F::swap_unit(F::load(src, sampler.column(u))));
            u = u.wrapping_add(sampler.step);
        }
    }
    let head = blocks.into_remainder();
    for i in (0..head.len() >> F::SHIFT).rev() {
        F::store(head, i, F::swap_unit(F::load(src, sampler.column(u))));
        u = u.wrapping_add(sampler.step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::BlitFlags;
    use crate::config::BlitConfig;
    use crate::format::{Indexed8, Packed16, PixelDepth};
    use crate::kernel::{mirrored_copy, straight_copy};
    use crate::reference;

    fn sprite(width: usize, height: usize) -> Vec<u8> {
        (0..width * height).map(|i| (i * 13 + 1) as u8).collect()
    }

    #[test]
    fn test_scale_identity_matches_unscaled() {
        let src = sprite(16, 16);
        let ctx = FramebufferContext::new(64);
        for flags in [BlitFlags::empty(), BlitFlags::MIRROR_HORIZONTAL, BlitFlags::MIRROR_VERTICAL] {
            let plain = BlitCommand::new(&src, 16, 16)
                .at(6, 3)
                .size(10, 12)
                .source_offset(4, 2)
                .with_flags(flags);
            let scaled = plain.scaled(Fixed::ONE);

            let mut expected = vec![0u8; 64 * 32];
            let mut actual = expected.clone();
            if flags.contains(BlitFlags::MIRROR_HORIZONTAL) {
                mirrored_copy::<Packed16>(&ctx, &mut expected, &plain);
                scaled_mirrored::<Packed16>(&ctx, &mut actual, &scaled);
            } else {
                straight_copy::<Packed16>(&ctx, &mut expected, &plain);
                scaled_straight::<Packed16>(&ctx, &mut actual, &scaled);
            }
            assert_eq!(actual, expected, "flags {:?}", flags);
        }
    }

    #[test]
    fn test_double_scale_repeats_texels() {
        let src: Vec<u8> = (0..16).collect();
        let ctx = FramebufferContext::new(8);
        let mut fb = vec![0u8; 8 * 8];
        let cmd = BlitCommand::new(&src, 4, 4).size(8, 8).scaled(Fixed::from_int(2));

        scaled_straight::<Indexed8>(&ctx, &mut fb, &cmd);

        for r in 0..8 {
            for c in 0..8 {
                assert_eq!(fb[r * 8 + c], src[(r / 2) * 4 + c / 2], "r={} c={}", r, c);
            }
        }
    }

    #[test]
    fn test_wraparound_masking() {
        // width 16: the column after 15 is 0, and column 19 is 3
        let src: Vec<u8> = (0..64).collect();
        let ctx = FramebufferContext::new(32);
        let mut fb = vec![0u8; 32 * 4];
        let cmd = BlitCommand::new(&src, 16, 4)
            .source_offset(12, 3)
            .size(10, 2)
            .scaled(Fixed::ONE);

        scaled_straight::<Indexed8>(&ctx, &mut fb, &cmd);

        let expected_row0: Vec<u8> = (12..22u8).map(|c| 3 * 16 + (c & 15)).collect();
        let expected_row1: Vec<u8> = (12..22u8).map(|c| c & 15).collect();
        assert_eq!(&fb[..10], &expected_row0[..]);
        assert_eq!(&fb[32..42], &expected_row1[..]);
        assert_eq!(fb[7], 3 * 16 + 3);
    }

    #[test]
    fn test_scaled_matches_reference() {
        let src = sprite(32, 16);
        let scales = [
            Fixed::ONE,
            Fixed::from_int(2),
            Fixed::from_bits(0x1_8000),
            Fixed::from_bits(0x0_C000),
            Fixed::from_bits(0x3_4000),
        ];
        for depth in [PixelDepth::Indexed8, PixelDepth::Packed16] {
            for &scale in &scales {
                for width in [2u32, 6, 8, 14, 16, 18, 30] {
                    for flags in [
                        BlitFlags::empty(),
                        BlitFlags::MIRROR_HORIZONTAL,
                        BlitFlags::MIRROR_VERTICAL,
                        BlitFlags::MIRROR_HORIZONTAL | BlitFlags::MIRROR_VERTICAL,
                    ] {
                        let cmd = BlitCommand::new(&src, 32, 16)
                            .at(4, 3)
                            .size(width, 11)
                            .source_offset(6, 5)
                            .scaled(scale)
                            .with_flags(flags);
                        let ctx = FramebufferContext::new(48);
                        let mut actual = vec![0xA5u8; 48 * 16];
                        let mut expected = actual.clone();

                        match (depth, flags.contains(BlitFlags::MIRROR_HORIZONTAL)) {
                            (PixelDepth::Indexed8, false) => scaled_straight::<Indexed8>(&ctx, &mut actual, &cmd),
                            (PixelDepth::Indexed8, true) => scaled_mirrored::<Indexed8>(&ctx, &mut actual, &cmd),
                            (PixelDepth::Packed16, false) => scaled_straight::<Packed16>(&ctx, &mut actual, &cmd),
                            (PixelDepth::Packed16, true) => scaled_mirrored::<Packed16>(&ctx, &mut actual, &cmd),
                        }
                        reference::blit_with(depth, &ctx, &mut expected, &cmd);
                        assert_eq!(actual, expected, "{:?} {:?} w={} {:?}", depth, scale, width, flags);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_scale_is_noop() {
        let src = sprite(8, 8);
        let ctx = FramebufferContext::new(8);
        let mut fb = vec![0u8; 64];
        let cmd = BlitCommand::new(&src, 8, 8).scaled(Fixed::ZERO);

        scaled_straight::<Indexed8>(&ctx, &mut fb, &cmd);
        scaled_mirrored::<Indexed8>(&ctx, &mut fb, &cmd);

        assert!(fb.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_suppressed_divide_is_optional() {
        let src = sprite(8, 8);
        let mut fb = vec![0u8; 64];
        let cmd = BlitCommand::new(&src, 8, 8).scaled(Fixed::from_int(2));

        for config in [BlitConfig::default(), BlitConfig::benchmark()] {
            let mut ctx = FramebufferContext::with_config(8, config);
            ctx.set_suppress_draw(true);
            scaled_straight::<Packed16>(&ctx, &mut fb, &cmd);
            scaled_mirrored::<Packed16>(&ctx, &mut fb, &cmd);
            assert_eq!(ctx.stats().snapshot().suppressed, 2);
        }
        assert!(fb.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sampler_masks() {
        let src = [0u8; 64];
        let cmd = BlitCommand::new(&src, 16, 4).source_offset(6, 1);
        let s = Sampler::new::<Packed16>(&cmd, Fixed::ONE.to_bits());
        assert_eq!(s.stride, 8);
        assert_eq!(s.umask, 7);
        assert_eq!(s.vmask, 3);
        assert_eq!(s.column(s.ustart), 3);
        assert_eq!(s.row_start(Fixed::from_int(5).to_bits()), 8);
    }
}
