use approx::assert_relative_eq;
use grapheme_rs::api::{GridlineConfig, Gridlines, LabelPosition, ScissorBoxStyle};
use grapheme_rs::core::{
    AxisDirection, CanvasSize, CoordinateTransform, ScissorRect, TickLevel, Viewport,
};
use grapheme_rs::render::{RenderFrame, TextHAlign, TextVAlign};

fn square_transform() -> CoordinateTransform {
    CoordinateTransform::new(
        Viewport::new(0.0, 0.0, 10.0, 10.0).expect("viewport"),
        CanvasSize::new(700.0, 700.0).expect("canvas"),
    )
    .expect("transform")
}

fn degenerate_transform() -> CoordinateTransform {
    CoordinateTransform::new(
        Viewport::new(0.0, 0.0, 1e-320, 10.0).expect("viewport"),
        CanvasSize::new(700.0, 700.0).expect("canvas"),
    )
    .expect("transform")
}

fn render(gridlines: &Gridlines, transform: CoordinateTransform) -> RenderFrame {
    let mut frame = RenderFrame::new(transform.canvas());
    gridlines
        .build_primitives(transform, &mut frame)
        .expect("primitives");
    frame
}

#[test]
fn nothing_is_drawn_before_first_recompute() {
    let gridlines = Gridlines::new(GridlineConfig::default()).expect("gridlines");
    assert!(gridlines.gridline_set().is_none());
    assert!(render(&gridlines, square_transform()).is_empty());
}

#[test]
fn default_style_draws_lines_ticks_and_labels() {
    let mut gridlines = Gridlines::new(GridlineConfig::default()).expect("gridlines");
    let t = square_transform();
    gridlines.recompute(t).expect("recompute");
    let frame = render(&gridlines, t);

    // Per axis: 16 thin, 4 normal and 1 axis gridline, each with a tick.
    assert_eq!(frame.lines.len(), 2 * 2 * (16 + 4 + 1));
    // Thin labels are hidden by default.
    assert_eq!(frame.texts.len(), 2 * (4 + 1));
    assert!(frame.validate().is_ok());

    let labels: Vec<&str> = frame.texts.iter().map(|t| t.text.as_str()).collect();
    for expected in ["-4", "-2", "0", "2", "4"] {
        assert_eq!(labels.iter().filter(|l| **l == expected).count(), 2);
    }
}

#[test]
fn x_labels_hang_below_the_x_axis() {
    let mut gridlines = Gridlines::new(GridlineConfig::default()).expect("gridlines");
    let t = square_transform();
    gridlines.recompute(t).expect("recompute");
    let frame = render(&gridlines, t);

    let label = frame
        .texts
        .iter()
        .find(|text| text.text == "4" && text.v_align == TextVAlign::Top)
        .expect("x label for 4");
    assert_relative_eq!(label.x, 630.0, epsilon = 1e-9);
    assert_relative_eq!(label.y, 352.0, epsilon = 1e-9);
    assert_eq!(label.h_align, TextHAlign::Center);
}

#[test]
fn edge_labels_pin_to_canvas_border() {
    let config = GridlineConfig::builder()
        .update_tier_style(AxisDirection::X, TickLevel::Normal, |style| {
            style.label_position = LabelPosition::Edge;
        })
        .build()
        .expect("config");
    let mut gridlines = Gridlines::new(config).expect("gridlines");
    let t = square_transform();
    gridlines.recompute(t).expect("recompute");
    let frame = render(&gridlines, t);

    let label = frame
        .texts
        .iter()
        .find(|text| text.text == "-2" && text.v_align == TextVAlign::Top)
        .expect("x label for -2");
    // 700 - (padding 2 + font 10), then padded down by 2.
    assert_relative_eq!(label.y, 690.0, epsilon = 1e-9);
}

#[test]
fn scissor_skips_coordinates_without_touching_stored_set() {
    let config = GridlineConfig::builder()
        .scissor(ScissorRect::new(
            350.0,
            f64::NEG_INFINITY,
            700.0,
            f64::INFINITY,
        ))
        .build()
        .expect("config");
    let mut gridlines = Gridlines::new(config).expect("gridlines");
    let t = square_transform();
    gridlines.recompute(t).expect("recompute");
    let frame = render(&gridlines, t);

    // X keeps only pixel columns in [350, 700]: 8 thin, 2 normal, the axis.
    let x_lines = 2 * (8 + 2 + 1);
    let y_lines = 2 * (16 + 4 + 1);
    assert_eq!(frame.lines.len(), x_lines + y_lines);
    assert_eq!(frame.texts.len(), (2 + 1) + (4 + 1));

    let set = gridlines.gridline_set().expect("stored set");
    assert_eq!(set.x.thin.len(), 16);
    assert_eq!(set.x.normal.len(), 4);
}

#[test]
fn scissor_box_outlines_finite_rect() {
    let config = GridlineConfig::builder()
        .tier_display(TickLevel::Thin, false)
        .tier_display(TickLevel::Normal, false)
        .tier_display(TickLevel::Axis, false)
        .scissor(ScissorRect::new(10.0, 20.0, 600.0, 500.0))
        .scissor_box(ScissorBoxStyle {
            display: true,
            ..ScissorBoxStyle::default()
        })
        .build()
        .expect("config");
    let mut gridlines = Gridlines::new(config).expect("gridlines");
    let t = square_transform();
    gridlines.recompute(t).expect("recompute");
    let frame = render(&gridlines, t);

    assert_eq!(frame.lines.len(), 4);
    let corners: Vec<(f64, f64)> = frame.lines.iter().map(|l| (l.x1, l.y1)).collect();
    assert_eq!(
        corners,
        vec![(10.0, 20.0), (600.0, 20.0), (600.0, 500.0), (10.0, 500.0)]
    );
    assert_eq!((frame.lines[3].x2, frame.lines[3].y2), (10.0, 20.0));
}

#[test]
fn hidden_tiers_draw_nothing() {
    let config = GridlineConfig::builder()
        .tier_display(TickLevel::Thin, false)
        .build()
        .expect("config");
    let mut gridlines = Gridlines::new(config).expect("gridlines");
    let t = square_transform();
    gridlines.recompute(t).expect("recompute");
    let frame = render(&gridlines, t);

    assert_eq!(frame.lines.len(), 2 * 2 * (4 + 1));
    let set = gridlines.gridline_set().expect("stored set");
    assert!(set.x.thin.is_empty());
    assert!(set.y.thin.is_empty());
}

#[test]
fn failed_recompute_keeps_previous_gridlines() {
    let mut gridlines = Gridlines::new(GridlineConfig::default()).expect("gridlines");
    let previous = gridlines
        .recompute(square_transform())
        .expect("recompute")
        .clone();

    assert!(gridlines.recompute(degenerate_transform()).is_err());
    assert_eq!(gridlines.gridline_set(), Some(&previous));
}

#[test]
fn custom_formatter_and_empty_labels() {
    let config = GridlineConfig::builder()
        .label_formatter(|value| format!("{value:.1}"))
        .build()
        .expect("config");
    let mut gridlines = Gridlines::new(config).expect("gridlines");
    let t = square_transform();
    gridlines.recompute(t).expect("recompute");
    let frame = render(&gridlines, t);
    assert!(frame.texts.iter().any(|text| text.text == "2.0"));

    let silent = GridlineConfig::builder()
        .label_formatter(|_| String::new())
        .build()
        .expect("config");
    let mut gridlines = Gridlines::new(silent).expect("gridlines");
    gridlines.recompute(t).expect("recompute");
    assert!(render(&gridlines, t).texts.is_empty());
}

#[test]
fn labels_stay_inside_canvas_when_origin_is_off_screen() {
    let mut gridlines = Gridlines::new(GridlineConfig::default()).expect("gridlines");
    let t = CoordinateTransform::new(
        Viewport::new(100.0, 100.0, 10.0, 10.0).expect("viewport"),
        CanvasSize::new(700.0, 700.0).expect("canvas"),
    )
    .expect("transform");
    gridlines.recompute(t).expect("recompute");
    let frame = render(&gridlines, t);

    assert!(!frame.texts.is_empty());
    for text in &frame.texts {
        assert!((0.0..=700.0).contains(&text.x));
        assert!((0.0..=700.0).contains(&text.y));
    }
}
