//! Blitter error types

use core::fmt;

/// Convenience alias for results carrying a [`BlitError`].
pub type Result<T> = core::result::Result<T, BlitError>;

/// Configuration errors detected by command validation.
///
/// Kernels never return these; they are produced by
/// [`BlitCommand::validate`](crate::BlitCommand::validate) and the checked
/// entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitError {
    /// Source width is not a power of two.
    SourceWidthNotPowerOfTwo(u32),
    /// Source height is not a power of two.
    SourceHeightNotPowerOfTwo(u32),
    /// Scaled blit with a zero scale factor.
    ZeroScale,
    /// Source slice shorter than the region the command reads.
    SourceTooSmall {
        needed: usize,
        len: usize,
    },
    /// Framebuffer shorter than the region the command writes.
    DestinationOutOfBounds {
        needed: usize,
        len: usize,
    },
    /// Horizontal geometry not a multiple of the transfer unit.
    MisalignedUnit {
        field: &'static str,
        value: u32,
    },
    /// The global display context has not been initialized.
    ContextNotInitialized,
}

impl fmt::Display for BlitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlitError::SourceWidthNotPowerOfTwo(w) => {
                write!(f, "source width {} is not a power of two", w)
            }
            BlitError::SourceHeightNotPowerOfTwo(h) => {
                write!(f, "source height {} is not a power of two", h)
            }
            BlitError::ZeroScale => write!(f, "scaled blit with zero scale"),
            BlitError::SourceTooSmall { needed, len } => {
                write!(f, "source needs {} bytes, has {}", needed, len)
            }
            BlitError::DestinationOutOfBounds { needed, len } => {
                write!(f, "framebuffer needs {} bytes, has {}", needed, len)
            }
            BlitError::MisalignedUnit { field, value } => {
                write!(f, "{} = {} is not a whole number of units", field, value)
            }
            BlitError::ContextNotInitialized => write!(f, "display context not initialized"),
        }
    }
}
