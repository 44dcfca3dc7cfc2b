//! Debounced live preview.
//!
//! Interactive editors fire a configuration change on every slider tick.
//! [`PreviewSession`] coalesces those into at most one render per quiet
//! period and always renders the most recent configuration. The session
//! owns its surface, so renders into it can never overlap.
//!
//! Time is passed in by the caller, which keeps the session independent of
//! any particular event loop.

use std::time::{Duration, Instant};

use log::debug;

use crate::compositor::{Compositor, RenderOutcome};
use crate::config::{BannerConfig, DEFAULT_PREVIEW_HEIGHT};
use crate::error::Result;
use crate::glyph::{GlyphRasterizer, GlyphSource, ResvgRasterizer};
use crate::surface::Surface;

/// Quiet period between the last change and the preview render.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
struct Pending {
    config: BannerConfig,
    due: Instant,
}

/// A preview surface driven by a stream of configuration changes.
#[derive(Debug)]
pub struct PreviewSession<G, R = ResvgRasterizer> {
    glyphs: G,
    compositor: Compositor<R>,
    surface: Surface,
    debounce: Duration,
    preview_height: Option<u32>,
    pending: Option<Pending>,
    last_outcome: Option<RenderOutcome>,
}

impl<G: GlyphSource> PreviewSession<G> {
    /// Creates a session rendering with resvg at the default preview height.
    pub fn new(glyphs: G) -> Self {
        Self::with_compositor(glyphs, Compositor::new())
    }
}

impl<G: GlyphSource, R: GlyphRasterizer> PreviewSession<G, R> {
    pub fn with_compositor(glyphs: G, compositor: Compositor<R>) -> Self {
        Self {
            glyphs,
            compositor,
            surface: Surface::new(),
            debounce: DEFAULT_DEBOUNCE,
            preview_height: Some(DEFAULT_PREVIEW_HEIGHT),
            pending: None,
            last_outcome: None,
        }
    }

    /// Sets the quiet period. Zero renders on the next poll.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Sets the preview canvas height. `None` renders at full resolution.
    pub fn with_preview_height(mut self, height: Option<u32>) -> Self {
        self.preview_height = height;
        self
    }

    /// Records `config` as the latest change and restarts the quiet period.
    ///
    /// Any configuration still waiting is discarded.
    pub fn request(&mut self, config: BannerConfig, now: Instant) {
        if self.pending.is_some() {
            debug!("superseding pending preview");
        }
        self.pending = Some(Pending {
            config,
            due: now + self.debounce,
        });
    }

    /// True while a change is waiting to be rendered.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending change becomes due, if any.
    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Renders the pending change if its quiet period has elapsed.
    ///
    /// Returns whether a render happened.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        match &self.pending {
            Some(pending) if pending.due <= now => self.flush(),
            _ => Ok(false),
        }
    }

    /// Renders the pending change immediately.
    ///
    /// Returns whether a render happened. A failed render still consumes
    /// the pending change.
    pub fn flush(&mut self) -> Result<bool> {
        let Some(Pending { config, .. }) = self.pending.take() else {
            return Ok(false);
        };

        let config = match self.preview_height {
            Some(height) => config.preview(height),
            None => config,
        };
        debug!("rendering preview at {:?}", config.dimensions());

        let outcome = config.render_with(&self.compositor, &mut self.surface, &self.glyphs)?;
        self.last_outcome = Some(outcome);
        Ok(true)
    }

    /// The most recently rendered preview.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The outcome of the most recent successful render.
    pub fn last_outcome(&self) -> Option<&RenderOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn glyphs(&self) -> &G {
        &self.glyphs
    }
}
