use super::{clamp, linspace, Frame, Generator};
use crate::ir::{Camera, ColorBar, Contours, GeneratedGeometry, SurfaceTrace, Trace};

/// Gaussian-weighted interpolation of z over an x/y grid
pub struct InterpolatedSurface;

pub fn surface_grid_size(n: usize) -> usize {
    clamp(15.0, 30.0, (n as f64).sqrt().floor()) as usize
}

impl Generator for InterpolatedSurface {
    fn generate(&self, frame: &Frame) -> Option<GeneratedGeometry> {
        let mapping = frame.mapping;
        let x_range = frame.range(&mapping.x_axis)?;
        let y_range = frame.range(&mapping.y_axis)?;

        let xs = frame.values(&mapping.x_axis);
        let ys = frame.values(&mapping.y_axis);
        let zs = frame.values(&mapping.z_axis);
        let n = xs.len();

        let size = surface_grid_size(n);
        let gx = linspace(x_range.min, x_range.max, size);
        let gy = linspace(y_range.min, y_range.max, size);
        let max_distance = (x_range.span().powi(2) + y_range.span().powi(2)).sqrt() / 5.0;

        let z = gy
            .iter()
            .map(|&target_y| {
                gx.iter()
                    .map(|&target_x| {
                        let mut weighted_sum = 0.0;
                        let mut total_weight = 0.0;
                        for k in 0..n {
                            let (dx, dy) = (xs[k] - target_x, ys[k] - target_y);
                            let distance = (dx * dx + dy * dy).sqrt();
                            if distance < max_distance {
                                let weight =
                                    (-(distance * distance) / (max_distance * max_distance)).exp();
                                weighted_sum += zs[k] * weight;
                                total_weight += weight;
                            }
                        }
                        if total_weight > 0.0 {
                            weighted_sum / total_weight
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();

        let trace = SurfaceTrace {
            x: gx,
            y: gy,
            z,
            colorscale: "Earth".to_string(),
            contours: Some(Contours::projected()),
            colorbar: Some(ColorBar::new(mapping.z_axis.to_string())),
            name: format!("Surface - {n} source points"),
        };

        Some(GeneratedGeometry {
            data: vec![Trace::Surface(trace)],
            layout: frame.layout("3D Surface - Level Lines", Camera::DEFAULT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::super::Archetype;
    use super::*;

    fn surface(geometry: &GeneratedGeometry) -> &SurfaceTrace {
        match &geometry.data[0] {
            Trace::Surface(t) => t,
            other => panic!("expected surface, got {other:?}"),
        }
    }

    #[test]
    fn test_grid_size_bounds() {
        assert_eq!(surface_grid_size(4), 15);
        assert_eq!(surface_grid_size(400), 20);
        assert_eq!(surface_grid_size(5000), 30);
    }

    #[test]
    fn test_flat_plane_interpolates_constant() {
        let rows = (0..50)
            .map(|i| vec![(i % 10).to_string(), (i / 10).to_string(), "7".to_string()])
            .collect();
        let f = Fixture::new(&["x", "y", "z"], rows);
        let geometry = f.generate(Archetype::Surface);
        let trace = surface(&geometry);
        assert_eq!(trace.x.len(), 15);
        assert_eq!(trace.z.len(), 15);
        assert!(trace.z.iter().all(|row| row.len() == 15));
        assert!(trace
            .z
            .iter()
            .flatten()
            .all(|v| *v == 0.0 || (v - 7.0).abs() < 1e-9));
        assert!((trace.z[0][0] - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_span_gives_zero_cells() {
        let f = Fixture::from_rows(&["x", "y", "z"], &[&["1", "1", "5"], &["1", "1", "9"]]);
        let geometry = f.generate(Archetype::Surface);
        let trace = surface(&geometry);
        assert!(trace.z.iter().flatten().all(|v| *v == 0.0));
    }
}
