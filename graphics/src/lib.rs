//! Sprite Blitting Engine
//!
//! Fixed-point sprite blitter for linear 8-bit indexed framebuffers. A
//! sprite is copied into a destination rectangle with optional horizontal
//! and vertical mirroring and optional non-integer scaling, fast enough to
//! run inside a display refresh loop.
//!
//! # Architecture
//!
//! The engine is organized into:
//!
//! - `format`: pixel-format policy (8-bit units or packed 16-bit pairs)
//! - `kernel`: scanline copy kernels and the fixed-point scaled kernels
//! - `fixed`: 16.16 fixed-point arithmetic and reciprocal stepping
//! - `dispatch`: the eight-slot kernel table and the `Blitter` front
//! - `command`: the per-call blit descriptor and its flags
//! - `context`: framebuffer pitch, draw suppression and counters
//! - `display`: the process-wide display context
//!
//! ```text
//! BlitCommand ──flags──▶ DispatchTable[key] ──▶ kernel<F: PixelFormat>
//!                                                  │
//!                         FramebufferContext ──────┘ pitch, suppression
//! ```

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod fixed;
pub mod format;
pub mod kernel;

#[cfg(test)]
mod reference;

pub use command::{BlitCommand, BlitFlags};
pub use config::BlitConfig;
pub use context::{BlitStats, BlitStatsSnapshot, FramebufferContext};
pub use dispatch::{Blitter, DispatchTable, INDEXED8, PACKED16};
pub use error::{BlitError, Result};
pub use fixed::Fixed;
pub use format::{Indexed8, Packed16, PixelDepth, PixelFormat};
pub use kernel::KernelFn;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
