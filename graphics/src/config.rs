//! Blitter configuration.
//!
//! Compile-time constants shared by the kernels, and the runtime
//! [`BlitConfig`] carried by a [`FramebufferContext`](crate::FramebufferContext).

/// Fractional bits of the fixed-point coordinate format (16.16).
pub const FRACTION_BITS: u32 = 16;

/// Row alignment (bytes) required by the double-wide 16-bit copy.
pub const WIDE_COPY_ALIGN: usize = 4;

/// Source alignment (bytes) required by the odd-edge 8-bit pair packing.
pub const PAIR_ALIGN: usize = 2;

/// Units per iteration of the unscaled unrolled loops.
pub const COPY_UNROLL: usize = 4;

/// Units per iteration of the scaled loops.
pub const SCALED_UNROLL: usize = 8;

/// Validate commands before dispatch in debug builds.
pub const VALIDATE_BY_DEFAULT: bool = cfg!(debug_assertions);

/// Runtime blitter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitConfig {
    /// Compute the scaled-blit reciprocal even when drawing is suppressed.
    ///
    /// Keeps the per-call cost of a suppressed scaled blit close to a real
    /// one when timing headless runs.
    pub divide_when_suppressed: bool,
    /// Run [`BlitCommand::validate`](crate::BlitCommand::validate) before
    /// dispatch and skip commands that fail it.
    pub validate_commands: bool,
}

impl BlitConfig {
    /// Configuration for benchmark runs: no validation, timing parity
    /// for suppressed scaled blits.
    pub const fn benchmark() -> Self {
        Self {
            divide_when_suppressed: true,
            validate_commands: false,
        }
    }
}

impl Default for BlitConfig {
    fn default() -> Self {
        Self {
            divide_when_suppressed: false,
            validate_commands: VALIDATE_BY_DEFAULT,
        }
    }
}
