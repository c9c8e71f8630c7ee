use huewalk_core::{Canvas, Coord2, Format, Hsla, PaintOp, WalkConfig};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::{Callback, NodeRef};

/// Paints the walk on a `<canvas>` element.
pub(crate) struct CanvasSurface {
    node: NodeRef,
    context: Option<CanvasRenderingContext2d>,
    format: Format,
    cell_size: f64,
    on_done: Callback<u64>,
}

impl CanvasSurface {
    pub(crate) fn new(node: NodeRef, on_done: Callback<u64>) -> Self {
        let config = WalkConfig::default();
        Self {
            node,
            context: None,
            format: config.format,
            cell_size: config.cell_size(),
            on_done,
        }
    }

    fn context_2d(element: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
        match element.get_context("2d") {
            Ok(Some(context)) => context.dyn_into().ok(),
            Ok(None) => {
                log::error!("canvas has no 2d context");
                None
            }
            Err(err) => {
                log::error!("failed to get 2d context: {:?}", err);
                None
            }
        }
    }
}

impl Canvas for CanvasSurface {
    fn reset(&mut self, config: &WalkConfig) {
        self.format = config.format;
        self.cell_size = config.cell_size();

        let Some(element) = self.node.cast::<HtmlCanvasElement>() else {
            log::warn!("canvas is not mounted, nothing will be drawn");
            self.context = None;
            return;
        };
        // resizing also wipes whatever was drawn before
        element.set_width(config.canvas_size);
        element.set_height(config.canvas_size);
        self.context = Self::context_2d(&element);
        if let Some(context) = &self.context {
            let size = f64::from(config.canvas_size);
            context.clear_rect(0.0, 0.0, size, size);
        }
    }

    fn paint(&mut self, coords: Coord2, color: Option<Hsla>) {
        let Some(context) = &self.context else {
            return;
        };
        match self.format.paint_op(coords, color, self.cell_size) {
            PaintOp::Fill { rect, color } => {
                context.set_fill_style_str(&color.to_string());
                context.fill_rect(rect.x, rect.y, rect.width, rect.height);
            }
            PaintOp::Clear { rect } => {
                context.clear_rect(rect.x, rect.y, rect.width, rect.height);
            }
        }
    }

    fn done(&mut self, total_steps: u64) {
        self.on_done.emit(total_steps);
    }
}
