use approx::{assert_abs_diff_eq, assert_relative_eq};
use grapheme_rs::core::{CanvasSize, CoordinateTransform, Viewport};
use grapheme_rs::error::PlotError;

fn transform(viewport: Viewport, width: f64, height: f64) -> CoordinateTransform {
    CoordinateTransform::new(viewport, CanvasSize::new(width, height).expect("canvas"))
        .expect("transform")
}

#[test]
fn pixel_to_data_follows_center_extent_formulas() {
    let viewport = Viewport::new(1.5, -3.0, 20.0, 8.0).expect("viewport");
    let t = transform(viewport, 800.0, 400.0);

    let (x, y) = t.pixel_to_data(200.0, 100.0);
    assert_relative_eq!(x, (200.0 / 800.0 - 0.5) * 20.0 + 1.5);
    assert_relative_eq!(y, -(100.0 / 400.0 - 0.5) * 8.0 - 3.0);
}

#[test]
fn data_to_pixel_inverts_pixel_to_data() {
    let viewport = Viewport::new(-12.0, 40.0, 3.0, 0.25).expect("viewport");
    let t = transform(viewport, 1280.0, 720.0);

    for &(px, py) in &[(0.0, 0.0), (640.0, 360.0), (1279.5, 1.25), (17.0, 719.0)] {
        let (x, y) = t.pixel_to_data(px, py);
        let (rpx, rpy) = t.data_to_pixel(x, y);
        assert_abs_diff_eq!(rpx, px, epsilon = 1e-9);
        assert_abs_diff_eq!(rpy, py, epsilon = 1e-9);
    }
}

#[test]
fn pixel_y_grows_downward_while_data_y_grows_upward() {
    let t = transform(Viewport::default(), 100.0, 100.0);
    let (_, top) = t.pixel_to_data(50.0, 0.0);
    let (_, bottom) = t.pixel_to_data(50.0, 100.0);
    assert!(top > bottom);
    assert_eq!(top, t.bounds_max_y());
    assert_eq!(bottom, t.bounds_min_y());
}

#[test]
fn vector_mapping_has_no_translation_term() {
    let viewport = Viewport::new(1000.0, -1000.0, 10.0, 10.0).expect("viewport");
    let t = transform(viewport, 700.0, 700.0);

    assert_eq!(t.pixel_vector_to_data_vector(140.0, 140.0), (2.0, -2.0));
    assert_eq!(t.data_vector_to_pixel_vector(2.0, -2.0), (140.0, 140.0));
    assert_eq!(t.pixel_vector_to_data_vector(0.0, 0.0), (0.0, -0.0));
}

#[test]
fn clip_space_spans_unit_square_over_viewport() {
    let viewport = Viewport::new(5.0, 5.0, 4.0, 2.0).expect("viewport");
    let t = transform(viewport, 300.0, 300.0);

    assert_eq!(t.data_to_clip(5.0, 5.0), (0.0, 0.0));
    assert_eq!(t.data_to_clip(7.0, 6.0), (1.0, -1.0));
    assert_eq!(t.data_to_clip(3.0, 4.0), (-1.0, 1.0));
    assert_eq!(t.data_vector_to_clip_vector(2.0, 1.0), (1.0, -1.0));
    assert_eq!(t.clip_vector_to_data_vector(1.0, 1.0), (2.0, -1.0));
    assert_eq!(t.pixel_vector_to_clip_vector(150.0, 75.0), (1.0, 0.5));
}

#[test]
fn bounds_use_half_extents() {
    let viewport = Viewport::new(2.0, -1.0, 6.0, 10.0).expect("viewport");
    let t = transform(viewport, 640.0, 480.0);

    assert_eq!(t.bounds_min_x(), -1.0);
    assert_eq!(t.bounds_max_x(), 5.0);
    assert_eq!(t.bounds_min_y(), -6.0);
    assert_eq!(t.bounds_max_y(), 4.0);
}

#[test]
fn in_view_checks_are_inclusive_at_the_edges() {
    let viewport = Viewport::new(0.0, 0.0, 10.0, 4.0).expect("viewport");
    let t = transform(viewport, 100.0, 100.0);

    assert!(t.is_x_in_view(5.0));
    assert!(t.is_x_in_view(-5.0));
    assert!(!t.is_x_in_view(5.000_001));
    assert!(t.is_y_in_view(2.0));
    assert!(!t.is_y_in_view(-2.1));
}

#[test]
fn batch_transforms_match_scalar_forms() {
    let viewport = Viewport::new(0.25, 9.0, 3.5, 12.0).expect("viewport");
    let t = transform(viewport, 1024.0, 768.0);
    let points = [(0.0, 0.0), (10.5, 700.25), (1023.0, 1.0), (512.0, 384.0)];

    let mut buffer: Vec<f64> = points.iter().flat_map(|&(x, y)| [x, y]).collect();
    t.pixel_to_data_in_place(&mut buffer).expect("pixel to data");
    for (pair, &(px, py)) in buffer.chunks_exact(2).zip(&points) {
        assert_eq!((pair[0], pair[1]), t.pixel_to_data(px, py));
    }

    let data = buffer.clone();
    t.data_to_pixel_in_place(&mut buffer).expect("data to pixel");
    for (pair, source) in buffer.chunks_exact(2).zip(data.chunks_exact(2)) {
        assert_eq!((pair[0], pair[1]), t.data_to_pixel(source[0], source[1]));
    }

    let mut clip = data.clone();
    t.data_to_clip_in_place(&mut clip).expect("data to clip");
    for (pair, source) in clip.chunks_exact(2).zip(data.chunks_exact(2)) {
        assert_eq!((pair[0], pair[1]), t.data_to_clip(source[0], source[1]));
    }

    let mut vectors = vec![140.0, 140.0, -3.0, 12.0];
    t.pixel_vector_to_data_vector_in_place(&mut vectors)
        .expect("pixel vectors");
    assert_eq!((vectors[0], vectors[1]), t.pixel_vector_to_data_vector(140.0, 140.0));
    assert_eq!((vectors[2], vectors[3]), t.pixel_vector_to_data_vector(-3.0, 12.0));

    t.data_vector_to_pixel_vector_in_place(&mut vectors)
        .expect("data vectors");
    assert_abs_diff_eq!(vectors[0], 140.0, epsilon = 1e-9);
    assert_abs_diff_eq!(vectors[3], 12.0, epsilon = 1e-9);
}

#[test]
fn negative_viewport_width_is_invalid_viewport() {
    let result = Viewport::new(0.0, 0.0, -10.0, 10.0);
    assert!(matches!(result, Err(PlotError::InvalidViewport { .. })));

    let raw = Viewport {
        x: 0.0,
        y: 0.0,
        width: -10.0,
        height: 10.0,
    };
    let canvas = CanvasSize::new(700.0, 700.0).expect("canvas");
    let result = CoordinateTransform::new(raw, canvas);
    assert!(matches!(result, Err(PlotError::InvalidViewport { .. })));
}

#[test]
fn zero_canvas_is_rejected() {
    let raw = CanvasSize {
        width: 0.0,
        height: 300.0,
    };
    let result = CoordinateTransform::new(Viewport::default(), raw);
    assert!(matches!(result, Err(PlotError::InvalidCanvas { .. })));
}
