//! Layered Compositor
//!
//! Manages z-ordered layers for rendering. Each pane of the console is a
//! layer with its own buffer, and the command palette is a layer floating
//! above them.
//!
//! Layers are solid: every cell inside a visible layer's bounds replaces
//! whatever lies beneath, so the palette overlay fully hides the panes it
//! covers and pane backgrounds survive compositing.

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Unique identifier for a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(u32);

/// One pane's buffer and where it sits on screen
///
/// The buffer is in origin coordinates and always matches `bounds` in size.
/// Every cell is opaque when composited, blank cells included.
pub struct Layer {
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Screen position and size
    pub bounds: Rect,
    /// Hidden layers are skipped by compositing and hit tests
    pub visible: bool,
    /// The layer's render buffer
    pub buffer: Buffer,
}

impl Layer {
    /// Visible layer with a blank buffer the size of `bounds`
    pub fn new(bounds: Rect, z_index: i32) -> Self {
        Self {
            z_index,
            bounds,
            visible: true,
            buffer: Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height)),
        }
    }

    /// Whether a screen cell falls inside this layer
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.bounds.x
            && x < self.bounds.x.saturating_add(self.bounds.width)
            && y >= self.bounds.y
            && y < self.bounds.y.saturating_add(self.bounds.height)
    }
}

/// The compositor manages all layers and composites them together
pub struct Compositor {
    /// All layers by ID
    layers: HashMap<LayerId, Layer>,
    /// Layers sorted by z-index for rendering
    render_order: Vec<LayerId>,
    /// Next layer ID to assign
    next_id: u32,
    /// Output buffer (composited result)
    output: Buffer,
    /// Total area
    area: Rect,
}

impl Compositor {
    /// Create a new compositor for the given area
    pub fn new(area: Rect) -> Self {
        Self {
            layers: HashMap::new(),
            render_order: Vec::new(),
            next_id: 0,
            output: Buffer::empty(area),
            area,
        }
    }

    /// Create a new layer and return its ID
    pub fn create_layer(&mut self, bounds: Rect, z_index: i32) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        let layer = Layer::new(bounds, z_index);
        self.layers.insert(id, layer);
        self.update_render_order();

        id
    }

    /// Get mutable access to a layer's buffer for rendering
    pub fn layer_buffer_mut(&mut self, id: LayerId) -> Option<&mut Buffer> {
        self.layers.get_mut(&id).map(|l| &mut l.buffer)
    }

    /// Move and resize a layer in one go
    pub fn place_layer(&mut self, id: LayerId, bounds: Rect) {
        self.move_layer(id, bounds.x, bounds.y);
        self.resize_layer(id, bounds.width, bounds.height);
    }

    /// Move a layer to a new position
    pub fn move_layer(&mut self, id: LayerId, x: u16, y: u16) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.bounds.x = x;
            layer.bounds.y = y;
        }
    }

    /// Resize a layer
    pub fn resize_layer(&mut self, id: LayerId, width: u16, height: u16) {
        if let Some(layer) = self.layers.get_mut(&id) {
            if layer.bounds.width == width && layer.bounds.height == height {
                return;
            }
            layer.bounds.width = width;
            layer.bounds.height = height;
            // Buffer uses origin coordinates
            layer.buffer = Buffer::empty(Rect::new(0, 0, width, height));
        }
    }

    /// Set layer visibility
    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.visible = visible;
        }
    }

    /// Resize the entire compositor
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.output = Buffer::empty(area);
    }

    /// Composite all visible layers into the output buffer
    pub fn composite(&mut self) -> &Buffer {
        // Clear output
        self.output.reset();

        // Render layers in z-order (back to front)
        for id in &self.render_order {
            if let Some(layer) = self.layers.get(id) {
                if layer.visible {
                    Self::blit_layer(&mut self.output, &self.area, layer);
                }
            }
        }

        &self.output
    }

    /// Blit a layer onto the output buffer
    fn blit_layer(output: &mut Buffer, area: &Rect, layer: &Layer) {
        let lb = &layer.bounds;

        for ly in 0..lb.height {
            for lx in 0..lb.width {
                let dst_x = lb.x + lx;
                let dst_y = lb.y + ly;

                // Bounds check
                if dst_x >= area.width || dst_y >= area.height {
                    continue;
                }

                let src_idx = layer.buffer.index_of(lx, ly);
                let dst_idx = output.index_of(dst_x, dst_y);
                if let (Some(src), Some(dst)) = (
                    layer.buffer.content.get(src_idx),
                    output.content.get_mut(dst_idx),
                ) {
                    *dst = src.clone();
                }
            }
        }
    }

    /// Find the topmost layer at a given position (for mouse events)
    pub fn layer_at(&self, x: u16, y: u16) -> Option<LayerId> {
        // Iterate in reverse render order (front to back)
        for &id in self.render_order.iter().rev() {
            if let Some(layer) = self.layers.get(&id) {
                if layer.visible && layer.contains(x, y) {
                    return Some(id);
                }
            }
        }
        None
    }

    /// Update render order based on z-indices
    fn update_render_order(&mut self) {
        self.render_order = self.layers.keys().copied().collect();
        self.render_order
            .sort_by_key(|id| self.layers.get(id).map_or(0, |l| l.z_index));
    }
}
