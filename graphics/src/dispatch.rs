//! Kernel dispatch.
//!
//! Eight slots indexed by the low three [`BlitFlags`] bits
//! (horizontal mirror, vertical mirror, scaled). Horizontal mirroring picks
//! the mirrored kernel; vertical mirroring shares the kernel of its
//! horizontal setting and is resolved inside it by a negated row stride.

use crate::command::BlitCommand;
use crate::context::FramebufferContext;
use crate::error::Result;
use crate::format::{Indexed8, Packed16, PixelDepth, PixelFormat};
use crate::kernel::{mirrored_copy, scaled_mirrored, scaled_straight, straight_copy, KernelFn};

/// Number of dispatch slots.
pub const SLOTS: usize = 8;

/// Kernel table for one pixel format.
pub struct DispatchTable {
    depth: PixelDepth,
    kernels: [KernelFn; SLOTS],
}

/// Table for 8-bit units.
pub static INDEXED8: DispatchTable = DispatchTable::new::<Indexed8>();

/// Table for packed 16-bit units.
pub static PACKED16: DispatchTable = DispatchTable::new::<Packed16>();

impl DispatchTable {
    /// Instantiate the kernels for a pixel format.
    pub const fn new<F: PixelFormat>() -> Self {
        Self {
            depth: F::DEPTH,
            kernels: [
                straight_copy::<F>,
                mirrored_copy::<F>,
                straight_copy::<F>,
                mirrored_copy::<F>,
                scaled_straight::<F>,
                scaled_mirrored::<F>,
                scaled_straight::<F>,
                scaled_mirrored::<F>,
            ],
        }
    }

    /// Static table for a runtime depth.
    pub fn for_depth(depth: PixelDepth) -> &'static DispatchTable {
        match depth {
            PixelDepth::Indexed8 => &INDEXED8,
            PixelDepth::Packed16 => &PACKED16,
        }
    }

    /// Pixel format served by this table.
    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    /// Kernel in slot `key`; only the low three bits are used.
    pub fn kernel(&self, key: usize) -> KernelFn {
        self.kernels[key & (SLOTS - 1)]
    }

    /// Run the kernel selected by the command's flags.
    ///
    /// When the context enables validation, commands failing
    /// [`BlitCommand::validate`] are logged and skipped.
    pub fn draw(&self, ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) {
        if ctx.config().validate_commands {
            if let Err(err) = cmd.validate(self.depth, ctx.pitch(), fb.len()) {
                log::warn!("[blit] rejected {:?} blit: {}", self.depth, err);
                ctx.stats().record_rejected();
                return;
            }
        }
        self.dispatch(ctx, fb, cmd);
    }

    /// Validate, then run the selected kernel.
    pub fn draw_checked(&self, ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) -> Result<()> {
        if let Err(err) = cmd.validate(self.depth, ctx.pitch(), fb.len()) {
            ctx.stats().record_rejected();
            return Err(err);
        }
        self.dispatch(ctx, fb, cmd);
        Ok(())
    }

    fn dispatch(&self, ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) {
        let key = cmd.dispatch_key();
        log::trace!("[blit] {:?} slot {} flags {:?}", self.depth, key, cmd.flags);
        ctx.stats().record_dispatch();
        (self.kernel(key))(ctx, fb, cmd);
    }
}

/// Sprite blitter bound to one pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blitter {
    depth: PixelDepth,
}

impl Blitter {
    /// Create a blitter for the given unit depth.
    pub fn new(depth: PixelDepth) -> Self {
        Self { depth }
    }

    /// Unit depth.
    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    /// Blit a sprite. Never fails; see [`DispatchTable::draw`].
    pub fn draw(&self, ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) {
        DispatchTable::for_depth(self.depth).draw(ctx, fb, cmd);
    }

    /// Blit a sprite after validating the command.
    pub fn draw_checked(&self, ctx: &FramebufferContext, fb: &mut [u8], cmd: &BlitCommand<'_>) -> Result<()> {
        DispatchTable::for_depth(self.depth).draw_checked(ctx, fb, cmd)
    }
}

impl Default for Blitter {
    fn default() -> Self {
        Self::new(PixelDepth::Indexed8)
    }
}
