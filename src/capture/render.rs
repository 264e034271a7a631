//! Stroke rasterizer - renders captured strokes using tiny-skia.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke as SkStroke,
    Transform,
};

use super::stroke::Stroke;
use crate::error::{Error, Result};

/// Largest accepted canvas edge in pixels.
pub const MAX_CANVAS_EDGE: u32 = 4096;

/// Per-channel distance from the background a pixel must exceed to count as ink.
pub const INK_THRESHOLD: u8 = 24;

/// 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha (255 = opaque)
    pub a: u8,
}

impl Rgba {
    /// Fully transparent.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    /// Create a color from components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(Error::InvalidConfig(format!("invalid color '{}'", hex)));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::InvalidConfig(format!("invalid color '{}'", hex)))
        };

        let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Whether the color fully covers what is beneath it.
    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    fn to_skia(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    /// PNG format (lossless, supports transparency)
    #[default]
    Png,
    /// JPEG format (lossy, composited onto white)
    Jpeg,
}

impl ImageFormat {
    /// MIME type of the encoding.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

/// Canvas size and pen style for a capture session.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Background color (transparent by default)
    pub background: Rgba,
    /// Pen color
    pub pen_color: Rgba,
    /// Pen width in pixels
    pub pen_width: f32,
    /// Output image format
    pub format: ImageFormat,
    /// JPEG quality (1-100, only for JPEG format)
    pub jpeg_quality: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            background: Rgba::TRANSPARENT,
            pen_color: Rgba::BLACK,
            pen_width: 2.5,
            format: ImageFormat::Png,
            jpeg_quality: 90,
        }
    }
}

impl RenderConfig {
    /// Create a configuration with explicit size and style.
    pub fn new(width: u32, height: u32, background: Rgba, pen_color: Rgba, pen_width: f32) -> Self {
        Self {
            width,
            height,
            background,
            pen_color,
            pen_width,
            ..Default::default()
        }
    }

    /// Set JPEG format with quality.
    pub fn as_jpeg(mut self, quality: u8) -> Self {
        self.format = ImageFormat::Jpeg;
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Check the configuration can be rendered.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "canvas must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_CANVAS_EDGE || self.height > MAX_CANVAS_EDGE {
            return Err(Error::InvalidConfig(format!(
                "canvas {}x{} exceeds {} pixels per edge",
                self.width, self.height, MAX_CANVAS_EDGE
            )));
        }
        if !self.pen_width.is_finite() || self.pen_width <= 0.0 {
            return Err(Error::InvalidConfig(format!("invalid pen width {}", self.pen_width)));
        }
        if self.pen_color.a == 0 {
            return Err(Error::InvalidConfig("pen color is fully transparent".to_string()));
        }
        Ok(())
    }
}

/// Encoded signature raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage {
    /// Image data in the specified format
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Output format
    pub format: ImageFormat,
}

impl SignatureImage {
    /// Whether the image carries no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.width == 0 || self.height == 0
    }

    /// Whether the data decodes to an image of the stated size that carries
    /// at least one mark.
    ///
    /// The top-left pixel is taken as the background. A canvas where every
    /// pixel stays within [`INK_THRESHOLD`] of it on all channels is blank.
    pub fn has_ink(&self) -> bool {
        let decoded = match image::load_from_memory(&self.data) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                log::debug!("Signature image does not decode: {}", e);
                return false;
            },
        };
        if decoded.dimensions() != (self.width, self.height) {
            log::debug!(
                "Signature image is {:?}, expected {}x{}",
                decoded.dimensions(),
                self.width,
                self.height
            );
            return false;
        }

        let Some(background) = decoded.pixels().next().copied() else {
            return false;
        };
        decoded.pixels().any(|pixel| {
            pixel
                .0
                .iter()
                .zip(background.0.iter())
                .any(|(a, b)| a.abs_diff(*b) > INK_THRESHOLD)
        })
    }

    /// Get the image data as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Embed as a `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), STANDARD.encode(&self.data))
    }

    /// Parse a `data:` URI produced by [`SignatureImage::to_data_uri`].
    ///
    /// Dimensions are read back from the image header.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidInput("not a data URI".to_string()))?;
        let (mime, encoded) = rest
            .split_once(";base64,")
            .ok_or_else(|| Error::InvalidInput("data URI is not base64".to_string()))?;
        let format = ImageFormat::from_mime_type(mime)
            .ok_or_else(|| Error::InvalidInput(format!("unsupported image type '{}'", mime)))?;

        let data = STANDARD
            .decode(encoded)
            .map_err(|e| Error::InvalidInput(format!("invalid base64 image: {}", e)))?;
        if data.is_empty() {
            return Err(Error::MissingSignature);
        }

        let (width, height) = image::load_from_memory(&data)
            .map(|img| (img.width(), img.height()))
            .map_err(|e| Error::InvalidInput(format!("undecodable image: {}", e)))?;

        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    /// Save the image to a file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path.as_ref(), &self.data)?;
        Ok(())
    }
}

/// Rasterizer for captured strokes.
#[derive(Debug, Default)]
pub struct StrokeRasterizer {}

impl StrokeRasterizer {
    /// Create a new stroke rasterizer.
    pub fn new() -> Self {
        Self {}
    }

    /// Draw every stroke onto a fresh canvas.
    pub fn render<'a>(
        &self,
        strokes: impl IntoIterator<Item = &'a Stroke>,
        config: &RenderConfig,
    ) -> Result<Pixmap> {
        config.validate()?;

        let mut pixmap = Pixmap::new(config.width, config.height).ok_or_else(|| {
            Error::Render(format!("Failed to create pixmap {}x{}", config.width, config.height))
        })?;
        pixmap.fill(config.background.to_skia());

        let mut paint = Paint::default();
        paint.set_color(config.pen_color.to_skia());
        paint.anti_alias = true;

        let sk_stroke = SkStroke {
            width: config.pen_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..SkStroke::default()
        };

        for stroke in strokes {
            if stroke.is_empty() {
                continue;
            }

            if stroke.is_zero_length() {
                let p = stroke.points()[0];
                if let Some(dot) = PathBuilder::from_circle(p.x, p.y, config.pen_width / 2.0) {
                    pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
                }
                continue;
            }

            if let Some(path) = self.smooth_path(stroke) {
                pixmap.stroke_path(&path, &paint, &sk_stroke, Transform::identity(), None);
            }
        }

        Ok(pixmap)
    }

    /// Encode a rendered canvas in the configured format.
    pub fn encode(&self, pixmap: &Pixmap, config: &RenderConfig) -> Result<SignatureImage> {
        let data = match config.format {
            ImageFormat::Png => pixmap
                .encode_png()
                .map_err(|e| Error::Render(format!("PNG encoding failed: {}", e)))?,
            ImageFormat::Jpeg => self.encode_jpeg(pixmap, config.jpeg_quality)?,
        };

        Ok(SignatureImage {
            data,
            width: pixmap.width(),
            height: pixmap.height(),
            format: config.format,
        })
    }

    /// Build a path through the samples, smoothing corners with quadratic
    /// curves through segment midpoints.
    fn smooth_path(&self, stroke: &Stroke) -> Option<Path> {
        let points = stroke.points();
        let mut pb = PathBuilder::new();
        pb.move_to(points[0].x, points[0].y);

        if points.len() == 2 {
            pb.line_to(points[1].x, points[1].y);
            return pb.finish();
        }

        for pair in points[1..].windows(2) {
            let (mx, my) = pair[0].midpoint(&pair[1]);
            pb.quad_to(pair[0].x, pair[0].y, mx, my);
        }
        let last = points[points.len() - 1];
        pb.line_to(last.x, last.y);

        pb.finish()
    }

    fn encode_jpeg(&self, pixmap: &Pixmap, quality: u8) -> Result<Vec<u8>> {
        use image::codecs::jpeg::JpegEncoder;

        let width = pixmap.width();
        let height = pixmap.height();

        // Pixmap data is premultiplied; composite onto white since JPEG has no alpha
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        for chunk in pixmap.data().chunks(4) {
            let inv = 255 - chunk[3];
            rgb_data.push(chunk[0].saturating_add(inv));
            rgb_data.push(chunk[1].saturating_add(inv));
            rgb_data.push(chunk[2].saturating_add(inv));
        }

        let mut output = Vec::new();
        JpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100))
            .encode(&rgb_data, width, height, image::ColorType::Rgb8)
            .map_err(|e| Error::Render(format!("JPEG encoding failed: {}", e)))?;

        Ok(output)
    }
}
