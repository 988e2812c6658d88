use std::any::Any;

use grapheme_rs::api::{GridlineConfig, Gridlines, PlotContext, PlotElement};
use grapheme_rs::core::{CanvasSize, CoordinateTransform, Viewport};
use grapheme_rs::error::{PlotError, PlotResult};
use grapheme_rs::render::{Color, LinePrimitive, NullRenderer, RenderFrame};

/// Draws one horizontal line at `row` so draw order is observable.
struct Marker {
    row: f64,
    precedence: i32,
    updates: usize,
}

impl Marker {
    fn new(row: f64, precedence: i32) -> Self {
        Self {
            row,
            precedence,
            updates: 0,
        }
    }
}

impl PlotElement for Marker {
    fn precedence(&self) -> i32 {
        self.precedence
    }

    fn update(&mut self, _transform: CoordinateTransform) -> PlotResult<()> {
        self.updates += 1;
        Ok(())
    }

    fn draw(&self, transform: CoordinateTransform, frame: &mut RenderFrame) -> PlotResult<()> {
        frame.push_line(LinePrimitive::new(
            0.0,
            self.row,
            transform.canvas().width,
            self.row,
            1.0,
            Color::BLACK,
        ));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn context() -> PlotContext<NullRenderer> {
    PlotContext::new(
        NullRenderer::default(),
        Viewport::new(0.0, 0.0, 10.0, 10.0).expect("viewport"),
        CanvasSize::new(700.0, 700.0).expect("canvas"),
    )
    .expect("context")
}

#[test]
fn element_ids_are_never_reused() {
    let mut ctx = context();
    let first = ctx.add_element(Marker::new(1.0, 1));
    let second = ctx.add_element(Marker::new(2.0, 1));
    assert_ne!(first, second);

    assert!(ctx.remove_element(first));
    assert!(!ctx.remove_element(first));
    let third = ctx.add_element(Marker::new(3.0, 1));

    assert_ne!(third, first);
    assert!(third.raw() > second.raw());
    assert_eq!(ctx.element_count(), 2);
    assert!(!ctx.contains_element(first));
}

#[test]
fn draw_order_is_precedence_then_insertion() {
    let mut ctx = context();
    let late = ctx.add_element(Marker::new(10.0, 5));
    let early_a = ctx.add_element(Marker::new(20.0, 0));
    let early_b = ctx.add_element(Marker::new(30.0, 0));

    assert_eq!(ctx.element_ids(), vec![early_a, early_b, late]);

    let frame = ctx.build_frame().expect("frame");
    let rows: Vec<f64> = frame.lines.iter().map(|line| line.y1).collect();
    assert_eq!(rows, vec![20.0, 30.0, 10.0]);
}

#[test]
fn build_frame_updates_every_element() {
    let mut ctx = context();
    let id = ctx.add_element(Marker::new(1.0, 1));
    ctx.build_frame().expect("frame");
    ctx.build_frame().expect("frame");

    let marker = ctx.element_as::<Marker>(id).expect("marker");
    assert_eq!(marker.updates, 2);
    assert!(ctx.element_as::<Gridlines>(id).is_none());
}

#[test]
fn draw_frame_hands_gridlines_to_renderer() {
    let mut ctx = context();
    let id = ctx.add_element(Gridlines::new(GridlineConfig::default()).expect("gridlines"));

    ctx.draw_frame().expect("draw");

    let renderer = ctx.renderer();
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_line_count, 84);
    assert_eq!(renderer.last_text_count, 10);

    let gridlines = ctx.element_as::<Gridlines>(id).expect("gridlines");
    assert_eq!(gridlines.gridline_set().expect("set").x.normal.len(), 4);
}

#[test]
fn hidden_elements_are_skipped() {
    let mut ctx = context();
    let id = ctx.add_element(Gridlines::new(GridlineConfig::default()).expect("gridlines"));
    ctx.element_as_mut::<Gridlines>(id)
        .expect("gridlines")
        .set_display(false);

    let frame = ctx.build_frame().expect("frame");
    assert!(frame.is_empty());
    assert!(
        ctx.element_as::<Gridlines>(id)
            .expect("gridlines")
            .gridline_set()
            .is_none()
    );
}

#[test]
fn degenerate_viewport_draws_previous_gridlines() {
    let mut ctx = context();
    ctx.add_element(Gridlines::new(GridlineConfig::default()).expect("gridlines"));
    ctx.draw_frame().expect("first draw");

    ctx.set_viewport(Viewport::new(0.0, 0.0, 1e-320, 10.0).expect("viewport"))
        .expect("viewport accepted");
    let frame = ctx.build_frame().expect("frame");
    assert!(!frame.lines.is_empty());
}

#[test]
fn invalid_viewport_is_rejected_and_previous_kept() {
    let mut ctx = context();
    let bad = Viewport {
        x: 0.0,
        y: 0.0,
        width: -10.0,
        height: 10.0,
    };
    let result = ctx.set_viewport(bad);
    assert!(matches!(result, Err(PlotError::InvalidViewport { .. })));
    assert_eq!(ctx.viewport().width, 10.0);
}

#[test]
fn resize_and_background_are_validated() {
    let mut ctx = context();
    ctx.resize(CanvasSize::new(1280.0, 720.0).expect("canvas"))
        .expect("resize");
    assert_eq!(ctx.transform().expect("transform").canvas().width, 1280.0);

    let bad_canvas = CanvasSize {
        width: f64::NAN,
        height: 720.0,
    };
    assert!(matches!(
        ctx.resize(bad_canvas),
        Err(PlotError::InvalidCanvas { .. })
    ));

    assert!(ctx.set_background_color(Color::rgb(2.0, 0.0, 0.0)).is_err());
    ctx.set_background_color(Color::from_hex(0x202020))
        .expect("background");
    let frame = ctx.build_frame().expect("frame");
    assert_eq!(frame.background, Color::from_hex(0x202020));
}

#[test]
fn elements_are_reachable_as_trait_objects() {
    let mut ctx = context();
    let id = ctx.add_element(Marker::new(4.0, 7));
    let transform = ctx.transform().expect("transform");

    ctx.element_mut(id)
        .expect("element")
        .update(transform)
        .expect("update");
    let element = ctx.element(id).expect("element");
    assert_eq!(element.precedence(), 7);
    assert!(element.is_displayed());
    assert_eq!(ctx.element_as::<Marker>(id).expect("marker").updates, 1);
}
