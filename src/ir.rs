use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Generated geometry
// =============================================================================

/// Traces plus layout, serialized as a Plotly `{data, layout}` object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedGeometry {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter3d(ScatterTrace),
    Surface(SurfaceTrace),
    Mesh3d(MeshTrace),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Scatter3d(t) => &t.name,
            Trace::Surface(t) => &t.name,
            Trace::Mesh3d(t) => &t.name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "markers+lines")]
    MarkersAndLines,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub mode: Mode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

impl ScatterTrace {
    pub fn new(mode: Mode, name: impl Into<String>, marker: Marker) -> Self {
        Self {
            mode,
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            marker,
            line: None,
            text: Vec::new(),
            hovertemplate: None,
            name: name.into(),
            showlegend: None,
        }
    }

    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Show `text` on hover instead of the coordinates
    pub fn with_hover_text(mut self, text: Vec<String>) -> Self {
        self.text = text;
        self.hovertemplate = Some("%{text}<extra></extra>".to_string());
        self
    }
}

/// Marker size: one value for every point, or one per point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerSize {
    Uniform(f64),
    PerPoint(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: MarkerSize,
    pub color: Vec<f64>,
    pub colorscale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
}

impl Marker {
    pub fn new(size: MarkerSize, color: Vec<f64>, colorscale: &str) -> Self {
        Self {
            size,
            color,
            colorscale: colorscale.to_string(),
            opacity: None,
            colorbar: None,
            line: None,
        }
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn colorbar(mut self, title: impl Into<String>) -> Self {
        self.colorbar = Some(ColorBar::new(title));
        self
    }

    pub fn outline(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: String,
}

impl ColorBar {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

impl LineStyle {
    pub fn new(color: &str, width: f64) -> Self {
        Self { color: color.to_string(), width }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceTrace {
    /// Column coordinates of the grid
    pub x: Vec<f64>,
    /// Row coordinates of the grid
    pub y: Vec<f64>,
    /// `z[row][column]`
    pub z: Vec<Vec<f64>>,
    pub colorscale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contours: Option<Contours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contours {
    pub z: ContourLevels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourLevels {
    pub show: bool,
    pub usecolormap: bool,
    pub highlightcolor: String,
    pub project: ContourProjection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourProjection {
    pub z: bool,
}

impl Contours {
    /// Colored level lines projected onto the floor
    pub fn projected() -> Self {
        Self {
            z: ContourLevels {
                show: true,
                usecolormap: true,
                highlightcolor: "#42f462".to_string(),
                project: ContourProjection { z: true },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshTrace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub intensity: Vec<f64>,
    pub colorscale: String,
    pub alphahull: f64,
    pub opacity: f64,
    pub name: String,
}

// =============================================================================
// Layout
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub scene: Scene,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
    pub camera: Camera,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgcolor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self { title: Title { text: text.into() } }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub eye: Eye,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Eye {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Camera {
    pub const DEFAULT: Camera = Camera::at(1.25, 1.25, 1.25);

    pub const fn at(x: f64, y: f64, z: f64) -> Self {
        Camera { eye: Eye { x, y, z } }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub showarrow: bool,
    pub xref: String,
    pub yref: String,
    pub x: f64,
    pub y: f64,
    pub xanchor: String,
    pub yanchor: String,
}

impl Annotation {
    /// Text box anchored at the top left of the plot area
    pub fn corner(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            showarrow: false,
            xref: "paper".to_string(),
            yref: "paper".to_string(),
            x: -0.15,
            y: 0.95,
            xanchor: "left".to_string(),
            yanchor: "top".to_string(),
        }
    }
}

// =============================================================================
// Assistant exchange
// =============================================================================

/// Plot description exchanged with the assistant boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub config: PlotConfig,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl PlotConfig {
    pub fn from_geometry(geometry: &GeneratedGeometry) -> serde_json::Result<Self> {
        let data = geometry
            .data
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        let layout = serde_json::to_value(&geometry.layout)?;
        Ok(Self { data, layout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_type_tags() {
        let trace = Trace::Scatter3d(ScatterTrace::new(
            Mode::MarkersAndLines,
            "t",
            Marker::new(MarkerSize::Uniform(6.0), vec![], "Viridis"),
        ));
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "scatter3d");
        assert_eq!(json["mode"], "markers+lines");
        assert_eq!(json["marker"]["size"], 6.0);
        assert!(json.get("line").is_none());
        assert!(json.get("text").is_none());
    }

    #[test]
    fn test_per_point_size_serializes_as_array() {
        let marker = Marker::new(MarkerSize::PerPoint(vec![1.0, 2.0]), vec![0.0, 1.0], "Hot");
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["size"], serde_json::json!([1.0, 2.0]));
    }

    #[test]
    fn test_config_roundtrip_shape() {
        let raw = r#"{"type":"scatter3d","config":{"data":[{"type":"scatter3d"}],"layout":{}}}"#;
        let config: VisualizationConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.kind, "scatter3d");
        assert_eq!(config.config.data.len(), 1);
        assert_eq!(config.title, "");
    }
}
