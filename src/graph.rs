// Static 3D preview of generated geometry

use crate::ir::{GeneratedGeometry, Mode, Trace};
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// A colored point; `shade` is in [0, 1]
#[derive(Debug, Clone, Copy)]
struct ShadedPoint {
    position: (f64, f64, f64),
    shade: f64,
}

/// Everything drawable, flattened out of the traces
#[derive(Debug, Default)]
struct Preview {
    points: Vec<ShadedPoint>,
    paths: Vec<Vec<(f64, f64, f64)>>,
}

fn shades(values: &[f64], count: usize) -> Vec<f64> {
    if values.len() != count {
        return vec![0.5; count];
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max > min {
        values.iter().map(|v| (v - min) / (max - min)).collect()
    } else {
        vec![0.5; count]
    }
}

impl Preview {
    fn from_geometry(geometry: &GeneratedGeometry) -> Self {
        let mut preview = Preview::default();
        for trace in &geometry.data {
            match trace {
                Trace::Scatter3d(scatter) => {
                    let positions: Vec<_> = scatter
                        .x
                        .iter()
                        .zip(&scatter.y)
                        .zip(&scatter.z)
                        .map(|((&x, &y), &z)| (x, y, z))
                        .collect();
                    let shade = shades(&scatter.marker.color, positions.len());
                    preview.points.extend(
                        positions
                            .iter()
                            .zip(shade)
                            .map(|(&position, shade)| ShadedPoint { position, shade }),
                    );
                    if scatter.mode == Mode::MarkersAndLines {
                        preview.paths.push(positions);
                    }
                }
                Trace::Surface(surface) => {
                    // Wireframe along rows and columns, vertices shaded by height
                    let flat: Vec<f64> = surface.z.iter().flatten().cloned().collect();
                    let mut heights = shades(&flat, flat.len()).into_iter();
                    for (row, &y) in surface.z.iter().zip(&surface.y) {
                        let line: Vec<_> = row.iter().zip(&surface.x).map(|(&z, &x)| (x, y, z)).collect();
                        for &position in &line {
                            let shade = heights.next().unwrap_or(0.5);
                            preview.points.push(ShadedPoint { position, shade });
                        }
                        preview.paths.push(line);
                    }
                    for (col, &x) in surface.x.iter().enumerate() {
                        let line: Vec<_> = surface
                            .z
                            .iter()
                            .zip(&surface.y)
                            .filter_map(|(row, &y)| row.get(col).map(|&z| (x, y, z)))
                            .collect();
                        preview.paths.push(line);
                    }
                }
                Trace::Mesh3d(mesh) => {
                    let count = mesh.x.len().min(mesh.y.len()).min(mesh.z.len());
                    let shade = shades(&mesh.intensity, count);
                    for i in 0..count {
                        preview.points.push(ShadedPoint {
                            position: (mesh.x[i], mesh.y[i], mesh.z[i]),
                            shade: shade[i],
                        });
                    }
                }
            }
        }
        preview
    }

    fn coordinates(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.points
            .iter()
            .map(|p| p.position)
            .chain(self.paths.iter().flatten().cloned())
            .filter(|(x, y, z)| x.is_finite() && y.is_finite() && z.is_finite())
    }

    fn is_empty(&self) -> bool {
        self.coordinates().next().is_none()
    }
}

/// Padded axis range, widened around a single value
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Blue for low values through red for high ones
fn shade_color(shade: f64) -> HSLColor {
    HSLColor(0.66 * (1.0 - shade.clamp(0.0, 1.0)), 0.8, 0.5)
}

fn draw<DB>(root: &DrawingArea<DB, Shift>, geometry: &GeneratedGeometry, preview: &Preview) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let x_range = padded_range(preview.coordinates().map(|c| c.0));
    let y_range = padded_range(preview.coordinates().map(|c| c.1));
    let z_range = padded_range(preview.coordinates().map(|c| c.2));

    // Data z is drawn as the vertical axis and data y as depth
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(&geometry.layout.title.text, ("sans-serif", 20))
        .build_cartesian_3d(x_range, z_range, y_range)
        .context("Failed to build chart")?;

    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.85;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .draw()
        .context("Failed to draw axes")?;

    let path_color = RGBColor(0x80, 0x80, 0x80).mix(0.6);
    for path in &preview.paths {
        chart
            .draw_series(LineSeries::new(
                path.iter().map(|&(x, y, z)| (x, z, y)),
                path_color.stroke_width(1),
            ))
            .context("Failed to draw path")?;
    }

    chart
        .draw_series(preview.points.iter().map(|p| {
            let (x, y, z) = p.position;
            Circle::new((x, z, y), 3, shade_color(p.shade).filled())
        }))
        .context("Failed to draw points")?;

    root.present().context("Failed to present drawing")?;
    Ok(())
}

/// Render a PNG or SVG preview of the geometry
pub fn render_preview(geometry: &GeneratedGeometry, options: &RenderOptions) -> Result<Vec<u8>> {
    let preview = Preview::from_geometry(geometry);
    if preview.is_empty() {
        anyhow::bail!("Cannot render a preview with no data points");
    }
    let (width, height) = (options.width, options.height);

    match options.format {
        OutputFormat::Png => {
            let mut buffer = vec![0u8; (width * height * 3) as usize];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
                draw(&root, geometry, &preview)?;
            }

            let mut png_bytes = Vec::new();
            image::codecs::png::PngEncoder::new(&mut png_bytes)
                .write_image(&buffer, width, height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
            Ok(png_bytes)
        }
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                draw(&root, geometry, &preview)?;
            }
            Ok(svg.into_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::test_support::Fixture;
    use crate::geometry::Archetype;

    fn fixture() -> Fixture {
        Fixture::from_rows(
            &["a", "b", "c"],
            &[&["1", "5", "2"], &["2", "3", "8"], &["3", "9", "4"], &["4", "1", "6"]],
        )
    }

    #[test]
    fn test_png_preview() {
        let geometry = fixture().generate(Archetype::Scatter);
        let bytes = render_preview(&geometry, &RenderOptions::default()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_svg_preview_of_surface() {
        let geometry = fixture().generate(Archetype::Surface);
        let options = RenderOptions {
            width: 400,
            height: 300,
            format: OutputFormat::Svg,
        };
        let bytes = render_preview(&geometry, &options).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_empty_geometry_rejected() {
        let mut geometry = fixture().generate(Archetype::Scatter);
        geometry.data.clear();
        assert!(render_preview(&geometry, &RenderOptions::default()).is_err());
    }

    #[test]
    fn test_shades() {
        assert_eq!(shades(&[1.0, 3.0, 2.0], 3), vec![0.0, 1.0, 0.5]);
        assert_eq!(shades(&[4.0, 4.0], 2), vec![0.5, 0.5]);
        assert_eq!(shades(&[], 2), vec![0.5, 0.5]);
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range([2.0].into_iter()), 1.0..3.0);
        let r = padded_range([0.0, 10.0].into_iter());
        assert!((r.start + 0.5).abs() < 1e-9 && (r.end - 10.5).abs() < 1e-9);
    }
}
