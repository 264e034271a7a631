//! Integration tests for stroke capture and signature export.

use esign_oxide::capture::{
    CaptureState, ImageFormat, RenderConfig, Rgba, SignatureCapture, SignatureImage, Stroke,
    StrokePoint,
};
use esign_oxide::Error;

fn draw_line(capture: &mut SignatureCapture, from: (f32, f32), to: (f32, f32)) {
    capture.begin_stroke(StrokePoint::new(from.0, from.1)).unwrap();
    let steps = 8;
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        capture.extend_stroke(StrokePoint::new(x, y)).unwrap();
    }
    capture.end_stroke();
}

fn three_strokes() -> SignatureCapture {
    let mut capture = SignatureCapture::new();
    draw_line(&mut capture, (20.0, 150.0), (80.0, 40.0));
    draw_line(&mut capture, (80.0, 40.0), (140.0, 150.0));
    draw_line(&mut capture, (45.0, 100.0), (115.0, 100.0));
    capture
}

fn decode(image: &SignatureImage) -> image::RgbaImage {
    image::load_from_memory(&image.data).unwrap().to_rgba8()
}

#[test]
fn test_new_capture_is_empty() {
    let capture = SignatureCapture::new();
    assert!(capture.is_empty());
    assert_eq!(capture.state(), CaptureState::Empty);
    assert!(matches!(capture.export_image(), Err(Error::MissingSignature)));
}

#[test]
fn test_taps_alone_do_not_count_as_a_signature() {
    let mut capture = SignatureCapture::new();
    for x in [10.0, 50.0, 90.0] {
        capture.begin_stroke(StrokePoint::new(x, 20.0)).unwrap();
        capture.end_stroke();
    }
    assert_eq!(capture.strokes().len(), 3);
    assert!(capture.is_empty());
    assert_eq!(capture.state(), CaptureState::Empty);
    assert!(matches!(capture.export_image(), Err(Error::MissingSignature)));
}

#[test]
fn test_three_strokes_export_png() {
    let capture = three_strokes();
    assert!(!capture.is_empty());
    assert_eq!(capture.state(), CaptureState::HasContent);
    assert_eq!(capture.strokes().len(), 3);
    assert_eq!(capture.point_count(), 27);

    let image = capture.export_image().unwrap();
    assert_eq!(image.format, ImageFormat::Png);
    assert_eq!((image.width, image.height), (400, 200));
    assert!(image.data.starts_with(&[0x89, b'P', b'N', b'G']));

    let pixels = decode(&image);
    assert_eq!(pixels.dimensions(), (400, 200));
    // Crossbar midpoint is inked, far corner stays transparent
    assert!(pixels.get_pixel(80, 100)[3] > 0);
    assert_eq!(pixels.get_pixel(399, 0)[3], 0);
}

#[test]
fn test_export_while_drawing_includes_open_stroke() {
    let mut capture = SignatureCapture::new();
    capture.begin_stroke(StrokePoint::new(10.0, 10.0)).unwrap();
    assert_eq!(capture.state(), CaptureState::Drawing);
    assert!(capture.is_empty());

    capture.extend_stroke(StrokePoint::new(60.0, 60.0)).unwrap();
    assert!(!capture.is_empty());
    assert!(capture.export_image().is_ok());
}

#[test]
fn test_clear_from_any_state() {
    let mut capture = three_strokes();
    capture.clear();
    assert!(capture.is_empty());
    assert_eq!(capture.state(), CaptureState::Empty);
    assert!(capture.strokes().is_empty());

    capture.begin_stroke(StrokePoint::new(1.0, 1.0)).unwrap();
    capture.extend_stroke(StrokePoint::new(30.0, 1.0)).unwrap();
    capture.clear();
    assert_eq!(capture.state(), CaptureState::Empty);
    assert_eq!(capture.point_count(), 0);
}

#[test]
fn test_undo_back_to_empty() {
    let mut capture = SignatureCapture::new();
    draw_line(&mut capture, (10.0, 10.0), (90.0, 90.0));
    assert_eq!(capture.state(), CaptureState::HasContent);

    assert!(capture.undo_last_stroke().is_some());
    assert_eq!(capture.state(), CaptureState::Empty);
    assert!(capture.undo_last_stroke().is_none());
}

#[test]
fn test_non_finite_points_are_rejected() {
    let mut capture = SignatureCapture::new();
    assert!(capture.begin_stroke(StrokePoint::new(f32::NAN, 0.0)).is_err());
    capture.begin_stroke(StrokePoint::new(0.0, 0.0)).unwrap();
    assert!(capture
        .extend_stroke(StrokePoint::new(f32::INFINITY, 5.0))
        .is_err());
}

#[test]
fn test_jpeg_export_on_white() {
    let config = RenderConfig::default().as_jpeg(85);
    let mut capture = SignatureCapture::with_config(config).unwrap();
    draw_line(&mut capture, (20.0, 100.0), (380.0, 100.0));

    let image = capture.export_image().unwrap();
    assert_eq!(image.format, ImageFormat::Jpeg);
    assert!(image.data.starts_with(&[0xFF, 0xD8]));

    let pixels = decode(&image);
    let corner = pixels.get_pixel(2, 2);
    assert!(corner[0] > 240 && corner[1] > 240 && corner[2] > 240);
}

#[test]
fn test_configured_canvas_and_colors() {
    let mut capture = SignatureCapture::new();
    capture
        .configure_with(300, 120, Rgba::WHITE, Rgba::from_hex("#1a237e").unwrap(), 3.0)
        .unwrap();
    draw_line(&mut capture, (10.0, 60.0), (290.0, 60.0));

    let pixels = decode(&capture.export_image().unwrap());
    assert_eq!(pixels.dimensions(), (300, 120));
    assert_eq!(pixels.get_pixel(0, 0).0, [255, 255, 255, 255]);
    let ink = pixels.get_pixel(150, 60);
    assert!(ink[2] > ink[0], "pen colour should be blue-dominant: {:?}", ink);
}

#[test]
fn test_invalid_configurations_are_rejected() {
    let mut capture = SignatureCapture::new();
    assert!(capture.configure_with(0, 100, Rgba::WHITE, Rgba::BLACK, 2.0).is_err());
    assert!(capture.configure_with(100, 5000, Rgba::WHITE, Rgba::BLACK, 2.0).is_err());
    assert!(capture.configure_with(100, 100, Rgba::WHITE, Rgba::BLACK, 0.0).is_err());
    assert!(capture.configure_with(100, 100, Rgba::WHITE, Rgba::TRANSPARENT, 2.0).is_err());
    assert_eq!(capture.config(), &RenderConfig::default());
}

#[test]
fn test_restore_from_strokes() {
    let original = three_strokes();
    let strokes: Vec<Stroke> = original.strokes().to_vec();
    let json = serde_json::to_string(&strokes).unwrap();

    let restored: Vec<Stroke> = serde_json::from_str(&json).unwrap();
    let capture = SignatureCapture::from_strokes(RenderConfig::default(), restored).unwrap();
    assert_eq!(capture.state(), CaptureState::HasContent);
    assert_eq!(
        capture.export_image().unwrap(),
        original.export_image().unwrap()
    );
}

#[test]
fn test_data_uri_and_save() {
    let image = three_strokes().export_image().unwrap();

    let uri = image.to_data_uri();
    assert!(uri.starts_with("data:image/png;base64,"));
    let parsed = SignatureImage::from_data_uri(&uri).unwrap();
    assert_eq!(parsed, image);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("signature.png");
    image.save(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), image.data);
}
