// Deterministic plot configuration used when the assistant path is unavailable

use crate::classify::parse_number;
use crate::data::Dataset;
use crate::ir::{
    Annotation, Axis, Camera, ColorBar, Contours, GeneratedGeometry, Layout, LineStyle, Marker,
    MarkerSize, MeshTrace, Mode, PlotConfig, ScatterTrace, Scene, SurfaceTrace, Title, Trace,
    VisualizationConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::{debug, warn};

const FALLBACK_SEED: u64 = 0x0e1d_05fb;
const MAX_SURFACE_GRID: usize = 20;

/// Columns where at least one row parses as a finite number
pub fn numeric_looking_columns(data: &Dataset) -> Vec<&str> {
    data.columns
        .iter()
        .filter(|c| {
            data.column_values(c)
                .iter()
                .any(|v| parse_number(v).is_some())
        })
        .map(String::as_str)
        .collect()
}

struct Axes<'a> {
    x: &'a str,
    y: &'a str,
    z: &'a str,
    numeric: Vec<&'a str>,
}

impl<'a> Axes<'a> {
    fn pick(data: &'a Dataset) -> Self {
        let numeric = numeric_looking_columns(data);
        let pick = |i: usize, default: &'a str| -> &'a str {
            numeric
                .get(i)
                .copied()
                .or_else(|| data.columns.get(i).map(String::as_str))
                .unwrap_or(default)
        };
        let (x, y, z) = (pick(0, "x"), pick(1, "y"), pick(2, "z"));
        Self { x, y, z, numeric }
    }
}

/// Builds configurations with placeholders drawn from one seeded stream
struct Builder<'a> {
    data: &'a Dataset,
    axes: Axes<'a>,
    rng: StdRng,
}

impl<'a> Builder<'a> {
    fn new(data: &'a Dataset) -> Self {
        Self {
            data,
            axes: Axes::pick(data),
            rng: StdRng::seed_from_u64(FALLBACK_SEED),
        }
    }

    fn placeholder(&mut self) -> f64 {
        self.rng.gen_range(0.0..10.0)
    }

    /// Parsed column values, placeholders where a cell does not parse
    fn column(&mut self, name: &str) -> Vec<f64> {
        let cells: Vec<Option<f64>> = (0..self.data.row_count())
            .map(|row| parse_number(self.data.value(row, name)))
            .collect();
        cells
            .into_iter()
            .map(|v| v.unwrap_or_else(|| self.placeholder()))
            .collect()
    }

    fn points(&mut self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let (x, y, z) = (self.axes.x, self.axes.y, self.axes.z);
        (self.column(x), self.column(y), self.column(z))
    }

    fn scene(&self, camera: Camera) -> Scene {
        Scene {
            xaxis: Axis::titled(self.axes.x),
            yaxis: Axis::titled(self.axes.y),
            zaxis: Axis::titled(self.axes.z),
            camera,
            bgcolor: None,
        }
    }

    fn layout(&self, title: &str, scene: Scene, note: String) -> Layout {
        Layout {
            title: Title { text: title.to_string() },
            scene,
            annotations: vec![Annotation::corner(note)],
        }
    }

    fn scatter(&mut self, size: f64, colorscale: &str, opacity: f64) -> ScatterTrace {
        let n = self.data.row_count();
        let (x, y, z) = self.points();
        let marker = Marker::new(
            MarkerSize::Uniform(size),
            (0..n).map(|i| i as f64).collect(),
            colorscale,
        )
        .opacity(opacity)
        .colorbar(self.axes.x);

        let mut trace = ScatterTrace::new(Mode::Markers, format!("{n} points"), marker);
        trace.x = x;
        trace.y = y;
        trace.z = z;
        trace
    }

    fn hover_text(&self) -> Vec<String> {
        let Axes { x, y, z, .. } = self.axes;
        (0..self.data.row_count())
            .map(|i| {
                let cell = |c: &str| match self.data.value(i, c) {
                    "" => "N/A".to_string(),
                    v => v.to_string(),
                };
                format!(
                    "Point {}<br>{x}: {}<br>{y}: {}<br>{z}: {}",
                    i + 1,
                    cell(x),
                    cell(y),
                    cell(z)
                )
            })
            .collect()
    }

    fn constellation(mut self) -> (GeneratedGeometry, String, String) {
        let n = self.data.row_count();
        let text = self.hover_text();
        let mut trace = self.scatter(6.0, "Viridis", 0.8).with_hover_text(text);
        trace.marker.line = Some(LineStyle::new("rgba(255, 255, 255, 0.1)", 0.5));

        let title = "3D Data Constellation";
        let note = format!("<b>Legend:</b><br>• Color: {}<br>• Total: {n} pts", self.axes.x);
        let layout = self.layout(title, self.scene(Camera::DEFAULT), note);
        (
            GeneratedGeometry { data: vec![Trace::Scatter3d(trace)], layout },
            title.to_string(),
            format!("3D visualization of {n} points"),
        )
    }

    /// Square grid sampled row by row from the first numeric-looking column
    fn surface_grid(&mut self) -> Vec<Vec<f64>> {
        let n = self.data.row_count();
        let size = surface_grid_size(n);
        let source = self.axes.numeric.first().copied();

        let mut grid = Vec::with_capacity(size);
        for i in 0..size {
            let mut row = Vec::with_capacity(size);
            for j in 0..size {
                let index = (i * size + j) * n / (size * size);
                let value = match source {
                    Some(column) if index < n => {
                        parse_number(self.data.value(index, column)).unwrap_or(0.0)
                    }
                    _ => self.placeholder(),
                };
                row.push(value);
            }
            grid.push(row);
        }
        grid
    }

    fn surface(mut self) -> (GeneratedGeometry, String, String) {
        let n = self.data.row_count();
        let z = self.surface_grid();
        let size = z.len();
        let variable = self.axes.numeric.first().copied().unwrap_or("Values");

        let trace = SurfaceTrace {
            x: (0..size).map(|i| i as f64).collect(),
            y: (0..size).map(|i| i as f64).collect(),
            z,
            colorscale: "Plasma".to_string(),
            contours: Some(Contours::projected()),
            colorbar: Some(ColorBar::new(variable)),
            name: format!("Surface - {n} rows"),
        };

        let title = "3D Data Surface";
        let scene = Scene {
            xaxis: Axis::titled("Position X"),
            yaxis: Axis::titled("Position Y"),
            zaxis: Axis::titled(variable),
            camera: Camera::at(1.87, 0.88, -0.64),
            bgcolor: None,
        };
        let source = self.axes.numeric.first().copied().unwrap_or("Simulated");
        let note = format!("<b>Source:</b><br>• Variable: {source}<br>• Points: {n}");
        let layout = self.layout(title, scene, note);
        (
            GeneratedGeometry { data: vec![Trace::Surface(trace)], layout },
            title.to_string(),
            "Surface generated from the data".to_string(),
        )
    }

    fn mesh(mut self) -> (GeneratedGeometry, String, String) {
        let n = self.data.row_count();
        let (x, y, z) = self.points();
        let trace = MeshTrace {
            intensity: z.clone(),
            x,
            y,
            z,
            colorscale: "Portland".to_string(),
            alphahull: 5.0,
            opacity: 0.6,
            name: format!("Mesh - {n} points"),
        };

        let title = "3D Data Mesh";
        let note = format!("<b>Hull:</b><br>• Vertices: {n}<br>• Height: {}", self.axes.z);
        let layout = self.layout(title, self.scene(Camera::DEFAULT), note);
        (
            GeneratedGeometry { data: vec![Trace::Mesh3d(trace)], layout },
            title.to_string(),
            format!("Mesh hull of {n} points"),
        )
    }

    fn interactive(mut self) -> (GeneratedGeometry, String, String) {
        let n = self.data.row_count();
        let trace = self.scatter(8.0, "Plasma", 0.9);

        let title = "Interactive 3D Visualization";
        let note = format!("<b>Analysis:</b><br>• {n} rows");
        let layout = self.layout(title, self.scene(Camera::DEFAULT), note);
        (
            GeneratedGeometry { data: vec![Trace::Scatter3d(trace)], layout },
            title.to_string(),
            format!("Analysis of {n} rows"),
        )
    }
}

pub fn surface_grid_size(n: usize) -> usize {
    ((n as f64).sqrt().floor() as usize).min(MAX_SURFACE_GRID)
}

/// Build a plot configuration for `requested_type` without any external help.
///
/// `scatter3d`, `surface3d` and `mesh3d` have dedicated shapes; anything else
/// gets a default scatter. Never fails, and the same input always yields the
/// same output.
pub fn build_fallback(requested_type: &str, data: &Dataset) -> VisualizationConfig {
    let builder = Builder::new(data);
    let (kind, (geometry, title, description)) = match requested_type {
        "scatter3d" => ("scatter3d", builder.constellation()),
        "surface3d" => ("surface3d", builder.surface()),
        "mesh3d" => ("mesh3d", builder.mesh()),
        _ => ("scatter3d", builder.interactive()),
    };
    debug!(requested_type, kind, rows = data.row_count(), "built fallback configuration");

    let config = match PlotConfig::from_geometry(&geometry) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "failed to serialize fallback geometry");
            PlotConfig {
                data: vec![json!({ "type": kind })],
                layout: json!({ "title": { "text": title } }),
            }
        }
    };

    VisualizationConfig {
        kind: kind.to_string(),
        config,
        title,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_unknown_type_on_empty_dataset() {
        let config = build_fallback("unknown_type", &Dataset::default());
        assert_eq!(config.kind, "scatter3d");
        assert!(!config.config.data.is_empty());
        assert!(config.config.layout.is_object());
        assert_eq!(config.title, "Interactive 3D Visualization");
        assert_eq!(config.config.layout["scene"]["xaxis"]["title"]["text"], "x");
    }

    #[test]
    fn test_axes_prefer_numeric_columns() {
        let data = dataset(&["name", "a", "b", "c"], &[&["x", "1", "2", "3"]]);
        let config = build_fallback("scatter3d", &data);
        let trace = &config.config.data[0];
        assert_eq!(trace["x"], json!([1.0]));
        assert_eq!(trace["z"], json!([3.0]));
        assert_eq!(config.config.layout["scene"]["yaxis"]["title"]["text"], "b");
        assert_eq!(config.description, "3D visualization of 1 points");
    }

    #[test]
    fn test_axes_fall_back_to_column_order() {
        let data = dataset(&["p", "q"], &[&["a", "b"]]);
        let config = build_fallback("scatter3d", &data);
        let scene = &config.config.layout["scene"];
        assert_eq!(scene["xaxis"]["title"]["text"], "p");
        assert_eq!(scene["yaxis"]["title"]["text"], "q");
        assert_eq!(scene["zaxis"]["title"]["text"], "z");
    }

    #[test]
    fn test_placeholders_are_seeded_and_bounded() {
        let data = dataset(&["p"], &[&["a"], &["b"], &["c"]]);
        let first = build_fallback("scatter3d", &data);
        let second = build_fallback("scatter3d", &data);
        assert_eq!(first, second);
        let xs = first.config.data[0]["x"].as_array().unwrap();
        assert!(xs
            .iter()
            .all(|v| (0.0..10.0).contains(&v.as_f64().unwrap())));
    }

    #[test]
    fn test_surface_grid() {
        let rows: Vec<Vec<String>> = (0..50).map(|i| vec![i.to_string()]).collect();
        let data = Dataset::new(vec!["v".to_string()], rows);
        let config = build_fallback("surface3d", &data);
        assert_eq!(config.kind, "surface3d");
        let z = config.config.data[0]["z"].as_array().unwrap();
        assert_eq!(z.len(), 7);
        assert_eq!(z[0][0], json!(0.0));
        // cell (1, 0) samples row (7 * 50) / 49 = 7
        assert_eq!(z[1][0], json!(7.0));
        assert_eq!(surface_grid_size(1000), 20);
    }

    #[test]
    fn test_mesh() {
        let data = dataset(&["a", "b", "c"], &[&["1", "2", "3"], &["4", "5", "6"]]);
        let config = build_fallback("mesh3d", &data);
        assert_eq!(config.kind, "mesh3d");
        assert_eq!(config.config.data[0]["type"], "mesh3d");
        assert_eq!(config.config.data[0]["intensity"], json!([3.0, 6.0]));
    }
}
