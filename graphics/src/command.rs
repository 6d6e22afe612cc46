//! Blit command descriptor.
//!
//! A [`BlitCommand`] is the sole data contract between the caller and the
//! engine. It borrows the sprite texels for the duration of one call and
//! selects its kernel purely through [`BlitFlags`].

use crate::error::{BlitError, Result};
use crate::fixed::Fixed;
use crate::format::PixelDepth;

bitflags::bitflags! {
    /// Blit orientation and permission flags.
    ///
    /// The low three bits form the dispatch key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BlitFlags: u8 {
        /// Write each row right-to-left.
        const MIRROR_HORIZONTAL = 0b0001;
        /// Write rows bottom-to-top.
        const MIRROR_VERTICAL = 0b0010;
        /// Resample through the fixed-point scaler using `scale`.
        const SCALED = 0b0100;
        /// Caller guarantees slack at the row edges, enabling the
        /// odd-aligned pair-packing fast path.
        const OVERWRITE_EDGES = 0b1000;
    }
}

impl BlitFlags {
    /// Bits that select a dispatch slot.
    pub const KEY_MASK: u8 = 0b0111;

    /// Dispatch slot for these flags.
    pub const fn dispatch_key(self) -> usize {
        (self.bits() & Self::KEY_MASK) as usize
    }
}

/// Per-call sprite blit descriptor.
///
/// Horizontal geometry is in 8-bit texels; vertical geometry in rows. The
/// source is row-major with `source_width` texels per row.
#[derive(Debug, Clone, Copy)]
pub struct BlitCommand<'a> {
    /// Sprite texels.
    pub source: &'a [u8],
    /// Source row length in texels; a power of two.
    pub source_width: u32,
    /// Source row count; a power of two.
    pub source_height: u32,
    /// Left texel of the source region.
    pub source_x: u32,
    /// Top row of the source region.
    pub source_y: u32,
    /// Destination left edge in the framebuffer.
    pub dest_x: u32,
    /// Destination top row in the framebuffer.
    pub dest_y: u32,
    /// Texels written per row.
    pub dest_width: u32,
    /// Rows written.
    pub dest_height: u32,
    /// Destination scale factor; read only when [`BlitFlags::SCALED`] is set.
    pub scale: Fixed,
    /// Orientation and permission flags.
    pub flags: BlitFlags,
}

impl<'a> BlitCommand<'a> {
    /// Blit a whole sprite to the framebuffer origin.
    pub fn new(source: &'a [u8], source_width: u32, source_height: u32) -> Self {
        Self {
            source,
            source_width,
            source_height,
            source_x: 0,
            source_y: 0,
            dest_x: 0,
            dest_y: 0,
            dest_width: source_width,
            dest_height: source_height,
            scale: Fixed::ONE,
            flags: BlitFlags::empty(),
        }
    }

    /// Set the destination top-left corner.
    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.dest_x = x;
        self.dest_y = y;
        self
    }

    /// Set the destination footprint.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.dest_width = width;
        self.dest_height = height;
        self
    }

    /// Set the source region offset.
    pub fn source_offset(mut self, x: u32, y: u32) -> Self {
        self.source_x = x;
        self.source_y = y;
        self
    }

    /// Enable the scaler with the given scale factor.
    pub fn scaled(mut self, scale: Fixed) -> Self {
        self.scale = scale;
        self.flags.insert(BlitFlags::SCALED);
        self
    }

    /// Add flags.
    pub fn with_flags(mut self, flags: BlitFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    /// Dispatch slot selected by this command's flags.
    pub fn dispatch_key(&self) -> usize {
        self.flags.dispatch_key()
    }

    /// Whether the command writes nothing.
    pub fn is_empty(&self) -> bool {
        self.dest_width == 0 || self.dest_height == 0
    }

    /// Check the preconditions the kernels rely on.
    ///
    /// `pitch` is the framebuffer stride in texels and `framebuffer_len` the
    /// length of the framebuffer slice in bytes.
    pub fn validate(&self, depth: PixelDepth, pitch: usize, framebuffer_len: usize) -> Result<()> {
        if !self.source_width.is_power_of_two() {
            return Err(BlitError::SourceWidthNotPowerOfTwo(self.source_width));
        }
        if !self.source_height.is_power_of_two() {
            return Err(BlitError::SourceHeightNotPowerOfTwo(self.source_height));
        }
        let scaled = self.flags.contains(BlitFlags::SCALED);
        if scaled && self.scale == Fixed::ZERO {
            return Err(BlitError::ZeroScale);
        }

        if depth == PixelDepth::Packed16 {
            let horizontal = [
                ("dest_x", self.dest_x),
                ("dest_width", self.dest_width),
                ("source_x", self.source_x),
                ("source_width", self.source_width),
                ("pitch", pitch as u32),
            ];
            if let Some(&(field, value)) = horizontal.iter().find(|(_, v)| v & 1 != 0) {
                return Err(BlitError::MisalignedUnit { field, value });
            }
        }

        if self.is_empty() {
            return Ok(());
        }

        let width = self.dest_width as usize;
        let height = self.dest_height as usize;
        let source_stride = self.source_width as usize;

        let source_needed = if scaled {
            source_stride.saturating_mul(self.source_height as usize)
        } else {
            (self.source_y as usize + height - 1)
                .saturating_mul(source_stride)
                .saturating_add(self.source_x as usize + width)
        };
        if source_needed > self.source.len() {
            return Err(BlitError::SourceTooSmall {
                needed: source_needed,
                len: self.source.len(),
            });
        }

        let dest_needed = (self.dest_y as usize + height - 1)
            .saturating_mul(pitch)
            .saturating_add(self.dest_x as usize + width);
        if dest_needed > framebuffer_len {
            return Err(BlitError::DestinationOutOfBounds {
                needed: dest_needed,
                len: framebuffer_len,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_key_ignores_overwrite() {
        let flags = BlitFlags::MIRROR_HORIZONTAL | BlitFlags::OVERWRITE_EDGES;
        assert_eq!(flags.dispatch_key(), 1);
        assert_eq!((BlitFlags::SCALED | BlitFlags::MIRROR_VERTICAL).dispatch_key(), 6);
        assert_eq!(BlitFlags::all().dispatch_key(), 7);
    }

    #[test]
    fn test_builder() {
        let texels = [0u8; 64];
        let cmd = BlitCommand::new(&texels, 8, 8)
            .at(3, 4)
            .size(16, 16)
            .source_offset(1, 2)
            .scaled(Fixed::from_int(2))
            .with_flags(BlitFlags::MIRROR_HORIZONTAL);
        assert_eq!((cmd.dest_x, cmd.dest_y), (3, 4));
        assert_eq!((cmd.dest_width, cmd.dest_height), (16, 16));
        assert_eq!((cmd.source_x, cmd.source_y), (1, 2));
        assert_eq!(cmd.dispatch_key(), 5);
        assert!(!cmd.is_empty());
    }

    #[test]
    fn test_validate_ok() {
        let texels = [0u8; 256];
        let cmd = BlitCommand::new(&texels, 16, 16).at(10, 5);
        assert_eq!(cmd.validate(PixelDepth::Indexed8, 320, 320 * 240), Ok(()));
    }

    #[test]
    fn test_validate_power_of_two() {
        let texels = [0u8; 256];
        let cmd = BlitCommand::new(&texels, 12, 16);
        assert_eq!(
            cmd.validate(PixelDepth::Indexed8, 320, 320 * 240),
            Err(BlitError::SourceWidthNotPowerOfTwo(12))
        );
        let cmd = BlitCommand::new(&texels, 16, 0);
        assert_eq!(
            cmd.validate(PixelDepth::Indexed8, 320, 320 * 240),
            Err(BlitError::SourceHeightNotPowerOfTwo(0))
        );
    }

    #[test]
    fn test_validate_zero_scale() {
        let texels = [0u8; 256];
        let cmd = BlitCommand::new(&texels, 16, 16).scaled(Fixed::ZERO);
        assert_eq!(
            cmd.validate(PixelDepth::Indexed8, 320, 320 * 240),
            Err(BlitError::ZeroScale)
        );
    }

    #[test]
    fn test_validate_bounds() {
        let texels = [0u8; 255];
        let cmd = BlitCommand::new(&texels, 16, 16);
        assert_eq!(
            cmd.validate(PixelDepth::Indexed8, 320, 320 * 240),
            Err(BlitError::SourceTooSmall { needed: 256, len: 255 })
        );

        let texels = [0u8; 256];
        let cmd = BlitCommand::new(&texels, 16, 16).at(310, 0);
        assert_eq!(
            cmd.validate(PixelDepth::Indexed8, 320, 16 * 320),
            Err(BlitError::DestinationOutOfBounds { needed: 15 * 320 + 326, len: 16 * 320 })
        );
    }

    #[test]
    fn test_validate_packed_alignment() {
        let texels = [0u8; 256];
        let cmd = BlitCommand::new(&texels, 16, 16).at(3, 0);
        assert_eq!(
            cmd.validate(PixelDepth::Packed16, 320, 320 * 240),
            Err(BlitError::MisalignedUnit { field: "dest_x", value: 3 })
        );
        assert_eq!(cmd.validate(PixelDepth::Indexed8, 320, 320 * 240), Ok(()));
    }

    #[test]
    fn test_validate_empty_skips_bounds() {
        let cmd = BlitCommand::new(&[], 16, 16).size(0, 16);
        assert!(cmd.is_empty());
        assert_eq!(cmd.validate(PixelDepth::Indexed8, 320, 0), Ok(()));
    }
}
