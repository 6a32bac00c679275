use super::{clamp, linspace, Frame, Generator};
use crate::ir::{Camera, GeneratedGeometry, Marker, MarkerSize, Mode, ScatterTrace, Trace};

/// Sampled 3D density of the mapped points
pub struct DensityField;

const MIN_GRID: f64 = 10.0;
const MAX_GRID: f64 = 25.0;

/// Grid resolution per axis for `n` points
pub fn density_grid_size(n: usize) -> usize {
    clamp(MIN_GRID, MAX_GRID, (n as f64).sqrt().floor()) as usize
}

impl Generator for DensityField {
    fn generate(&self, frame: &Frame) -> Option<GeneratedGeometry> {
        let mapping = frame.mapping;
        let x_range = frame.range(&mapping.x_axis)?;
        let y_range = frame.range(&mapping.y_axis)?;
        let z_range = frame.range(&mapping.z_axis)?;

        let xs = frame.values(&mapping.x_axis);
        let ys = frame.values(&mapping.y_axis);
        let zs = frame.values(&mapping.z_axis);
        let n = xs.len();

        let grid = density_grid_size(n);
        let radius = x_range.span().max(y_range.span()).max(z_range.span()) / (grid as f64 * 0.8);
        let threshold = n as f64 / (grid * grid * grid) as f64 * 0.5;

        let gx = linspace(x_range.min, x_range.max, grid);
        let gy = linspace(y_range.min, y_range.max, grid);
        let gz = linspace(z_range.min, z_range.max, grid);

        let mut trace = ScatterTrace::new(
            Mode::Markers,
            String::new(),
            Marker::new(MarkerSize::PerPoint(Vec::new()), Vec::new(), "Hot")
                .opacity(0.7)
                .colorbar("Local density"),
        );
        let mut sizes = Vec::new();

        for &x in &gx {
            for &y in &gy {
                for &z in &gz {
                    let mut density = 0.0;
                    for p in 0..n {
                        let (dx, dy, dz) = (xs[p] - x, ys[p] - y, zs[p] - z);
                        let distance = (dx * dx + dy * dy + dz * dz).sqrt();
                        if distance < radius {
                            density += (-(distance * distance) / (radius * radius)).exp();
                        }
                    }

                    if density > threshold {
                        trace.push(x, y, z);
                        trace.marker.color.push(density);
                        sizes.push(clamp(4.0, 20.0, density * 15.0));
                    }
                }
            }
        }

        let text = (0..trace.len())
            .map(|i| {
                format!(
                    "<b>Dense zone {}</b><br>Density: {:.2}<br>Position: ({:.1}, {:.1}, {:.1})",
                    i + 1,
                    trace.marker.color[i],
                    trace.x[i],
                    trace.y[i],
                    trace.z[i]
                )
            })
            .collect();

        trace.name = format!("3D Density - {} zones", trace.len());
        trace.marker.size = MarkerSize::PerPoint(sizes);
        let trace = trace.with_hover_text(text);

        Some(GeneratedGeometry {
            data: vec![Trace::Scatter3d(trace)],
            layout: frame.layout("3D Density - Concentration Zones", Camera::DEFAULT),
        })
    }
}
