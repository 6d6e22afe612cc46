//! Process-wide display context.
//!
//! The display subsystem sets the framebuffer pitch once at mode
//! initialization and may toggle draw suppression between blits. The render
//! loop then blits through [`draw_sprite`]. Blits are serialized by the
//! context lock; concurrent blits into one framebuffer are not supported.

use spin::Mutex;

use crate::command::BlitCommand;
use crate::config::BlitConfig;
use crate::context::{BlitStatsSnapshot, FramebufferContext};
use crate::dispatch::Blitter;
use crate::error::{BlitError, Result};
use crate::format::PixelDepth;

/// Global display context.
static DISPLAY: Mutex<Option<FramebufferContext>> = Mutex::new(None);

/// Initialize the display context for a framebuffer mode.
///
/// Re-initializing replaces the previous context and its counters.
pub fn init(pitch: usize, config: BlitConfig) {
    let mut display = DISPLAY.lock();
    if display.is_some() {
        log::warn!("[blit] display context re-initialized");
    }
    *display = Some(FramebufferContext::with_config(pitch, config));
    log::info!("[blit] display context ready, pitch {}", pitch);
}

/// Tear down the display context, returning its final counters.
pub fn shutdown() -> Option<BlitStatsSnapshot> {
    let ctx = DISPLAY.lock().take()?;
    let stats = ctx.stats().snapshot();
    log::info!(
        "[blit] display context released after {} blits ({} suppressed)",
        stats.dispatched,
        stats.suppressed
    );
    Some(stats)
}

/// Whether [`init`] has been called.
pub fn is_initialized() -> bool {
    DISPLAY.lock().is_some()
}

/// Change the framebuffer pitch.
pub fn set_pitch(pitch: usize) -> Result<()> {
    with_context_mut(|ctx| ctx.set_pitch(pitch))
}

/// Toggle draw suppression.
pub fn set_suppress_draw(suppress: bool) -> Result<()> {
    with_context_mut(|ctx| ctx.set_suppress_draw(suppress))
}

/// Run `f` with the display context.
pub fn with_context<R>(f: impl FnOnce(&FramebufferContext) -> R) -> Result<R> {
    DISPLAY
        .lock()
        .as_ref()
        .map(f)
        .ok_or(BlitError::ContextNotInitialized)
}

fn with_context_mut<R>(f: impl FnOnce(&mut FramebufferContext) -> R) -> Result<R> {
    DISPLAY
        .lock()
        .as_mut()
        .map(f)
        .ok_or(BlitError::ContextNotInitialized)
}

/// Blit a sprite into `fb` using the display context.
///
/// Fails only when the context is not initialized; the blit itself
/// follows [`Blitter::draw`].
pub fn draw_sprite(depth: PixelDepth, fb: &mut [u8], cmd: &BlitCommand<'_>) -> Result<()> {
    with_context(|ctx| Blitter::new(depth).draw(ctx, fb, cmd))
}
