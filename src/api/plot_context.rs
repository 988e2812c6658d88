use std::any::Any;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{CanvasSize, CoordinateTransform, Viewport};
use crate::error::PlotResult;
use crate::render::{Color, RenderFrame, Renderer};

/// Identifier of an element inside one [`PlotContext`].
///
/// Ids are allocated per context and never reused within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u32);

impl ElementId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Drawable owned by a [`PlotContext`].
///
/// Elements never hold a reference back to their context; the current
/// transform snapshot is passed into every call instead.
pub trait PlotElement {
    /// Lower precedence draws first.
    fn precedence(&self) -> i32 {
        1
    }

    fn is_displayed(&self) -> bool {
        true
    }

    /// Refreshes derived geometry for `transform`.
    fn update(&mut self, transform: CoordinateTransform) -> PlotResult<()>;

    fn draw(&self, transform: CoordinateTransform, frame: &mut RenderFrame) -> PlotResult<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// One plot instance: viewport, canvas size and an arena of elements.
pub struct PlotContext<R: Renderer> {
    renderer: R,
    viewport: Viewport,
    canvas: CanvasSize,
    background: Color,
    elements: IndexMap<ElementId, Box<dyn PlotElement>>,
    next_id: u32,
}

impl<R: Renderer> PlotContext<R> {
    pub fn new(renderer: R, viewport: Viewport, canvas: CanvasSize) -> PlotResult<Self> {
        viewport.validate()?;
        canvas.validate()?;

        Ok(Self {
            renderer,
            viewport,
            canvas,
            background: Color::WHITE,
            elements: IndexMap::new(),
            next_id: 0,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replaces the viewport; an invalid one is rejected and the current kept.
    pub fn set_viewport(&mut self, viewport: Viewport) -> PlotResult<()> {
        viewport.validate()?;
        debug!(
            x = viewport.x,
            y = viewport.y,
            width = viewport.width,
            height = viewport.height,
            "set viewport"
        );
        self.viewport = viewport;
        Ok(())
    }

    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Applies a new device-pixel canvas size.
    pub fn resize(&mut self, canvas: CanvasSize) -> PlotResult<()> {
        canvas.validate()?;
        debug!(width = canvas.width, height = canvas.height, "resize canvas");
        self.canvas = canvas;
        Ok(())
    }

    #[must_use]
    pub fn background_color(&self) -> Color {
        self.background
    }

    pub fn set_background_color(&mut self, color: Color) -> PlotResult<()> {
        color.validate()?;
        self.background = color;
        Ok(())
    }

    pub fn transform(&self) -> PlotResult<CoordinateTransform> {
        CoordinateTransform::new(self.viewport, self.canvas)
    }

    pub fn add_element<E: PlotElement + 'static>(&mut self, element: E) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, Box::new(element));
        trace!(id = id.raw(), count = self.elements.len(), "add element");
        id
    }

    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let removed = self.elements.shift_remove(&id).is_some();
        trace!(id = id.raw(), removed, "remove element");
        removed
    }

    #[must_use]
    pub fn contains_element(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&dyn PlotElement> {
        self.elements.get(&id).map(|element| &**element)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut (dyn PlotElement + 'static)> {
        self.elements.get_mut(&id).map(|element| &mut **element)
    }

    /// Returns the element downcast to its concrete type.
    #[must_use]
    pub fn element_as<E: PlotElement + 'static>(&self, id: ElementId) -> Option<&E> {
        self.elements
            .get(&id)
            .and_then(|element| element.as_any().downcast_ref::<E>())
    }

    pub fn element_as_mut<E: PlotElement + 'static>(&mut self, id: ElementId) -> Option<&mut E> {
        self.elements
            .get_mut(&id)
            .and_then(|element| element.as_any_mut().downcast_mut::<E>())
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Element ids in draw order: ascending precedence, then insertion order.
    #[must_use]
    pub fn element_ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<(i32, ElementId)> = self
            .elements
            .iter()
            .map(|(id, element)| (element.precedence(), *id))
            .collect();
        ids.sort_by_key(|(precedence, _)| *precedence);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Updates and draws every displayed element into a fresh frame.
    ///
    /// An element whose update fails still draws its previously computed state.
    pub fn build_frame(&mut self) -> PlotResult<RenderFrame> {
        let transform = self.transform()?;
        let order = self.element_ids();

        for id in &order {
            let Some(element) = self.elements.get_mut(id) else {
                continue;
            };
            if !element.is_displayed() {
                continue;
            }
            if let Err(err) = element.update(transform) {
                warn!(
                    id = id.raw(),
                    error = %err,
                    "element update failed; drawing previous state"
                );
            }
        }

        let mut frame = RenderFrame::new(self.canvas).with_background(self.background);
        for id in &order {
            let Some(element) = self.elements.get(id) else {
                continue;
            };
            if element.is_displayed() {
                element.draw(transform, &mut frame)?;
            }
        }

        trace!(
            elements = order.len(),
            lines = frame.lines.len(),
            texts = frame.texts.len(),
            "built plot frame"
        );
        Ok(frame)
    }

    /// Builds the frame and hands it to the renderer.
    pub fn draw_frame(&mut self) -> PlotResult<()> {
        let frame = self.build_frame()?;
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
