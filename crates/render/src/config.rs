use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 16.0,
            right: 96.0,
            bottom: 64.0,
            left: 96.0,
        }
    }
}

/// Pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(640.0, 720.0)
    }
}

/// Geometry and encoding parameters for the flowmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowmapConfig {
    pub margin: Margin,

    pub input_node_width: f64,

    pub output_node_width: f64,

    /// Stroke width of a weight-1 edge
    pub max_edge_width: f64,

    /// Edges thinner than this are not drawn at all
    pub min_rendered_edge_width: f64,

    /// Multiplier applied to the largest weight when building colour domains
    pub weight_color_factor: f64,

    pub zoom_selector_width: f64,

    /// Horizontal gap between the zoom selector and the input column
    pub zoom_selector_gap: f64,

    /// Horizontal distance between a node and its label
    pub label_offset: f64,

    /// Vertical space each label claims above and below its baseline
    pub label_spacing: i64,

    /// Draw token labels next to nodes that touch a rendered edge
    pub show_text: bool,
}

impl Default for FlowmapConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            input_node_width: 10.0,
            output_node_width: 24.0,
            max_edge_width: 5.0,
            min_rendered_edge_width: 1.1,
            weight_color_factor: 1.5,
            zoom_selector_width: 8.0,
            zoom_selector_gap: 6.0,
            label_offset: 8.0,
            label_spacing: 10,
            show_text: false,
        }
    }
}

impl FlowmapConfig {
    /// Tight margins and no labels, for thumbnails.
    pub fn compact() -> Self {
        Self {
            margin: Margin {
                top: 4.0,
                right: 4.0,
                bottom: 4.0,
                left: 24.0,
            },
            input_node_width: 6.0,
            output_node_width: 12.0,
            max_edge_width: 3.0,
            min_rendered_edge_width: 0.5,
            show_text: false,
            ..Default::default()
        }
    }

    /// Labels on and wider strokes, for exported figures.
    pub fn presentation() -> Self {
        Self {
            margin: Margin {
                top: 24.0,
                right: 140.0,
                bottom: 24.0,
                left: 160.0,
            },
            max_edge_width: 8.0,
            show_text: true,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let widths = [
            ("input_node_width", self.input_node_width),
            ("output_node_width", self.output_node_width),
            ("max_edge_width", self.max_edge_width),
            ("zoom_selector_width", self.zoom_selector_width),
        ];
        for (name, value) in widths {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be positive (got {value})"));
            }
        }

        if self.min_rendered_edge_width < 0.0 {
            return Err(format!(
                "min_rendered_edge_width ({}) cannot be negative",
                self.min_rendered_edge_width
            ));
        }

        if self.min_rendered_edge_width > self.max_edge_width {
            return Err(format!(
                "min_rendered_edge_width ({}) cannot exceed max_edge_width ({})",
                self.min_rendered_edge_width, self.max_edge_width
            ));
        }

        if self.weight_color_factor <= 0.0 {
            return Err("weight_color_factor must be positive".to_string());
        }

        let m = self.margin;
        if [m.top, m.right, m.bottom, m.left].iter().any(|v| *v < 0.0) {
            return Err("margins cannot be negative".to_string());
        }

        Ok(())
    }

    /// Chart area left after margins, never negative.
    pub fn inner_size(&self, size: Size) -> Size {
        Size::new(
            (size.width - self.margin.left - self.margin.right).max(0.0),
            (size.height - self.margin.top - self.margin.bottom).max(0.0),
        )
    }
}
