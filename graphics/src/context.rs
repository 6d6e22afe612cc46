//! Framebuffer context.
//!
//! The state every kernel reads: the active framebuffer pitch, the
//! draw-suppression switch and the runtime [`BlitConfig`]. The display
//! subsystem owns and mutates it between blits; kernels only borrow it.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::config::BlitConfig;

/// State shared by all blits into one framebuffer.
#[derive(Debug)]
pub struct FramebufferContext {
    /// Framebuffer stride in texels.
    pitch: usize,
    /// Skip all pixel writes.
    suppress_draw: bool,
    /// Runtime options.
    config: BlitConfig,
    /// Counters.
    stats: BlitStats,
}

impl FramebufferContext {
    /// Create a context for a framebuffer with the given pitch.
    pub fn new(pitch: usize) -> Self {
        Self::with_config(pitch, BlitConfig::default())
    }

    /// Create a context with explicit options.
    pub fn with_config(pitch: usize, config: BlitConfig) -> Self {
        Self {
            pitch,
            suppress_draw: false,
            config,
            stats: BlitStats::new(),
        }
    }

    /// Framebuffer stride in texels.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Change the pitch after a display-mode switch.
    pub fn set_pitch(&mut self, pitch: usize) {
        if pitch != self.pitch {
            log::info!("[blit] framebuffer pitch {} -> {}", self.pitch, pitch);
            self.pitch = pitch;
        }
    }

    /// Whether pixel writes are suppressed.
    pub fn suppress_draw(&self) -> bool {
        self.suppress_draw
    }

    /// Toggle pixel-write suppression.
    pub fn set_suppress_draw(&mut self, suppress: bool) {
        if suppress != self.suppress_draw {
            log::debug!("[blit] draw suppression {}", if suppress { "on" } else { "off" });
            self.suppress_draw = suppress;
        }
    }

    /// Runtime options.
    pub fn config(&self) -> &BlitConfig {
        &self.config
    }

    /// Replace the runtime options.
    pub fn set_config(&mut self, config: BlitConfig) {
        self.config = config;
    }

    /// Blit counters.
    pub fn stats(&self) -> &BlitStats {
        &self.stats
    }
}

/// Blit counters.
///
/// Updated through a shared reference so kernels can count without
/// mutable access to the context.
#[derive(Debug, Default)]
pub struct BlitStats {
    /// Commands dispatched.
    dispatched: AtomicU64,
    /// Commands skipped by draw suppression.
    suppressed: AtomicU64,
    /// Commands with zero effective area.
    empty: AtomicU64,
    /// Commands rejected by validation.
    rejected: AtomicU64,
    /// Rows written.
    rows: AtomicU64,
    /// Rows written through a fast path.
    fast_rows: AtomicU64,
}

/// Point-in-time copy of [`BlitStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlitStatsSnapshot {
    pub dispatched: u64,
    pub suppressed: u64,
    pub empty: u64,
    pub rejected: u64,
    pub rows: u64,
    pub fast_rows: u64,
}

impl BlitStats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            empty: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            rows: AtomicU64::new(0),
            fast_rows: AtomicU64::new(0),
        }
    }

    pub(crate) fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_empty(&self) {
        self.empty.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rows(&self, rows: usize, fast: bool) {
        self.rows.fetch_add(rows as u64, Ordering::Relaxed);
        if fast {
            self.fast_rows.fetch_add(rows as u64, Ordering::Relaxed);
        }
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> BlitStatsSnapshot {
        BlitStatsSnapshot {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            rows: self.rows.load(Ordering::Relaxed),
            fast_rows: self.fast_rows.load(Ordering::Relaxed),
        }
    }

    /// Zero all counters.
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.empty.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.rows.store(0, Ordering::Relaxed);
        self.fast_rows.store(0, Ordering::Relaxed);
    }
}
