//! Signature capture.
//!
//! This module records pointer input as strokes and rasterizes them into a
//! portable image. It is independent of any UI toolkit: the host feeds
//! coordinate samples in and reads the encoded image back.
//!
//! ## State machine
//!
//! ```text
//!            begin_stroke              end_stroke
//!   Empty ───────────────► Drawing ───────────────► Empty | HasContent
//!     ▲                       ▲                            │
//!     │ clear()               └──────── begin_stroke ──────┘
//!   (any)
//! ```
//!
//! Strokes are the source of truth while drawing; the image is the artifact
//! handed on to [`crate::signatures::SignatureBinder`].
//!
//! ## Example
//!
//! ```ignore
//! use esign_oxide::capture::{SignatureCapture, StrokePoint};
//!
//! let mut capture = SignatureCapture::new();
//! capture.begin_stroke(StrokePoint::new(10.0, 10.0))?;
//! capture.extend_stroke(StrokePoint::new(80.0, 40.0))?;
//! capture.end_stroke();
//!
//! if !capture.is_empty() {
//!     let image = capture.export_image()?;
//!     println!("{}", image.to_data_uri());
//! }
//! ```

mod render;
mod stroke;

pub use render::{
    ImageFormat, RenderConfig, Rgba, SignatureImage, StrokeRasterizer, INK_THRESHOLD,
    MAX_CANVAS_EDGE,
};
pub use stroke::{Stroke, StrokePoint};

use crate::error::{Error, Result};

/// Capture lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Nothing drawn (or only zero-length taps)
    Empty,
    /// Pointer is down and a stroke is being recorded
    Drawing,
    /// At least one stroke with nonzero length
    HasContent,
}

/// Stroke recorder for one signing ceremony.
#[derive(Debug)]
pub struct SignatureCapture {
    config: RenderConfig,
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    state: CaptureState,
    rasterizer: StrokeRasterizer,
}

impl Default for SignatureCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureCapture {
    /// Create an empty capture with the default render configuration.
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
            strokes: Vec::new(),
            current: None,
            state: CaptureState::Empty,
            rasterizer: StrokeRasterizer::new(),
        }
    }

    /// Create an empty capture with a validated render configuration.
    pub fn with_config(config: RenderConfig) -> Result<Self> {
        let mut capture = Self::new();
        capture.configure(config)?;
        Ok(capture)
    }

    /// Restore a capture from previously recorded strokes.
    pub fn from_strokes(config: RenderConfig, strokes: Vec<Stroke>) -> Result<Self> {
        let mut capture = Self::with_config(config)?;
        if strokes.iter().flat_map(|s| s.points()).any(|p| !p.is_finite()) {
            return Err(Error::InvalidInput("stroke contains non-finite coordinates".to_string()));
        }
        capture.strokes = strokes.into_iter().filter(|s| !s.is_empty()).collect();
        capture.settle();
        Ok(capture)
    }

    /// Set the session render parameters.
    ///
    /// Recorded strokes are kept and rendered with the new style on export.
    pub fn configure(&mut self, config: RenderConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Set the session render parameters from individual values.
    pub fn configure_with(
        &mut self,
        width: u32,
        height: u32,
        background: Rgba,
        pen_color: Rgba,
        pen_width: f32,
    ) -> Result<()> {
        let config = RenderConfig {
            width,
            height,
            background,
            pen_color,
            pen_width,
            ..self.config.clone()
        };
        self.configure(config)
    }

    /// Pointer down: start a new stroke.
    ///
    /// A stroke still open from a missed pointer-up is closed first.
    pub fn begin_stroke(&mut self, point: StrokePoint) -> Result<()> {
        Self::check_point(&point)?;
        if self.current.is_some() {
            log::debug!("begin_stroke while drawing, closing previous stroke");
            self.end_stroke();
        }

        self.current = Some(Stroke::starting_at(point));
        self.state = CaptureState::Drawing;
        Ok(())
    }

    /// Pointer move: append a sample to the current stroke.
    ///
    /// Moves without a pointer-down (hover) are ignored.
    pub fn extend_stroke(&mut self, point: StrokePoint) -> Result<()> {
        Self::check_point(&point)?;
        match self.current.as_mut() {
            Some(stroke) => stroke.push(point),
            None => log::trace!("extend_stroke outside a stroke ignored"),
        }
        Ok(())
    }

    /// Pointer up: close the current stroke.
    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.current.take() {
            self.strokes.push(stroke);
        }
        self.settle();
    }

    /// Remove the most recent completed stroke.
    pub fn undo_last_stroke(&mut self) -> Option<Stroke> {
        if self.current.is_some() {
            return None;
        }
        let removed = self.strokes.pop();
        self.settle();
        removed
    }

    /// Discard all strokes and return to [`CaptureState::Empty`].
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
        self.state = CaptureState::Empty;
    }

    /// True iff there are no strokes, or every stroke has zero path length.
    pub fn is_empty(&self) -> bool {
        self.all_strokes().all(Stroke::is_zero_length)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Completed strokes in drawing order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Active render configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Total number of samples recorded, including an open stroke.
    pub fn point_count(&self) -> usize {
        self.all_strokes().map(Stroke::len).sum()
    }

    /// Render all strokes and encode them.
    ///
    /// Fails with [`Error::MissingSignature`] when the capture is empty, so a
    /// blank canvas can never be exported as a signature.
    pub fn export_image(&self) -> Result<SignatureImage> {
        if self.is_empty() {
            return Err(Error::MissingSignature);
        }

        let pixmap = self.rasterizer.render(self.all_strokes(), &self.config)?;
        let image = self.rasterizer.encode(&pixmap, &self.config)?;
        log::debug!(
            "Exported {} strokes as {}x{} {} ({} bytes)",
            self.strokes.len() + usize::from(self.current.is_some()),
            image.width,
            image.height,
            image.format.mime_type(),
            image.data.len()
        );
        Ok(image)
    }

    fn all_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().chain(self.current.iter())
    }

    fn settle(&mut self) {
        self.state = if self.current.is_some() {
            CaptureState::Drawing
        } else if self.is_empty() {
            CaptureState::Empty
        } else {
            CaptureState::HasContent
        };
    }

    fn check_point(point: &StrokePoint) -> Result<()> {
        if point.is_finite() {
            Ok(())
        } else {
            log::warn!("Rejected non-finite stroke point ({}, {})", point.x, point.y);
            Err(Error::InvalidInput("stroke point must have finite coordinates".to_string()))
        }
    }
}
