//! Layout configuration
//!
//! Layout results follow from the shape of the dimer tree. The only tunables
//! are the fallbacks used when a layer is shown without a position.

/// Width of a layer shown without a [`LayerPos`](crate::LayerPos)
pub const DEFAULT_LAYER_WIDTH: i32 = 30;

/// Height of a layer shown without a [`LayerPos`](crate::LayerPos)
pub const DEFAULT_LAYER_HEIGHT: i32 = 8;

/// Cells a default-sized layer stays smaller than the viewport
pub const DEFAULT_LAYER_INSET: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LytConfig {
    pub default_layer_width: i32,
    pub default_layer_height: i32,
    pub layer_inset: i32,
}

impl Default for LytConfig {
    fn default() -> Self {
        Self {
            default_layer_width: DEFAULT_LAYER_WIDTH,
            default_layer_height: DEFAULT_LAYER_HEIGHT,
            layer_inset: DEFAULT_LAYER_INSET,
        }
    }
}

impl LytConfig {
    pub fn with_default_layer_size(mut self, width: i32, height: i32) -> Self {
        self.default_layer_width = width.max(1);
        self.default_layer_height = height.max(1);
        self
    }

    pub fn with_layer_inset(mut self, inset: i32) -> Self {
        self.layer_inset = inset.max(0);
        self
    }

    /// Size of an unpositioned layer in a `width` x `height` viewport.
    pub fn default_layer_size(&self, width: i32, height: i32) -> (i32, i32) {
        (
            self.default_layer_width.min(width - self.layer_inset).max(1),
            self.default_layer_height.min(height - self.layer_inset).max(1),
        )
    }
}
