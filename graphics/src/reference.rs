//! Per-pixel reference blitter.
//!
//! Straightforward implementation of every flag combination with no fast
//! paths, used to check the kernels. Horizontal geometry is assumed to be a
//! whole number of units for the given depth.

use crate::command::{BlitCommand, BlitFlags};
use crate::config::FRACTION_BITS;
use crate::context::FramebufferContext;
use crate::fixed::Fixed;
use crate::format::PixelDepth;

/// Reference blit with 8-bit units.
pub(crate) fn blit(ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) {
    blit_with(PixelDepth::Indexed8, ctx, fb, cmd);
}

/// Reference blit with the given unit depth.
pub(crate) fn blit_with(depth: PixelDepth, ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) {
    if ctx.suppress_draw() {
        return;
    }

    let ub = depth.unit_bytes();
    let units = cmd.dest_width as usize / ub;
    let rows = cmd.dest_height as usize;
    let stride = cmd.source_width as usize / ub;
    let pitch = ctx.pitch();
    if units == 0 || rows == 0 || stride == 0 {
        return;
    }

    let hflip = cmd.flags.contains(BlitFlags::MIRROR_HORIZONTAL);
    let vflip = cmd.flags.contains(BlitFlags::MIRROR_VERTICAL);
    let scaled = cmd.flags.contains(BlitFlags::SCALED);
    let step = if scaled {
        match Fixed::reciprocal_step(cmd.scale) {
            Some(step) => step,
            None => return,
        }
    } else {
        Fixed::ONE.to_bits()
    };

    for r in 0..rows {
        let dy = cmd.dest_y as usize + if vflip { rows - 1 - r } else { r };
        let dst_start = dy * pitch + cmd.dest_x as usize;
        if dst_start + units * ub > fb.len() {
            continue;
        }

        let (src_row, src_col0) = if scaled {
            let v = (cmd.source_y << FRACTION_BITS).wrapping_add(step.wrapping_mul(r as u32));
            (Fixed::sample(v, cmd.source_height - 1) as usize, 0)
        } else {
            (cmd.source_y as usize + r, cmd.source_x as usize / ub)
        };
        let src_start = src_row * stride * ub;
        let src_len = if scaled { stride * ub } else { (src_col0 + units) * ub };
        if src_start + src_len > cmd.source.len() {
            continue;
        }

        for c in 0..units {
            let col = if scaled {
                let ustart = (cmd.source_x as usize / ub) as u32 * Fixed::ONE.to_bits();
                let u = ustart.wrapping_add(step.wrapping_mul(c as u32));
                Fixed::sample(u, stride as u32 - 1) as usize
            } else {
                src_col0 + c
            };
            let dc = if hflip { units - 1 - c } else { c };
            for b in 0..ub {
                let sb = if hflip { ub - 1 - b } else { b };
                fb[dst_start + dc * ub + b] = cmd.source[src_start + col * ub + sb];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_mirror() {
        let src = [1u8, 2, 3, 4];
        let ctx = FramebufferContext::new(4);
        let mut fb = [0u8; 4];
        let cmd = BlitCommand::new(&src, 4, 1).with_flags(BlitFlags::MIRROR_HORIZONTAL);
        blit_with(PixelDepth::Packed16, &ctx, &mut fb, &cmd);
        assert_eq!(fb, [4, 3, 2, 1]);
    }
}
