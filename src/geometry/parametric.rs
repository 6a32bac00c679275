// Parametric shapes driven by the color and size roles

use super::{clamp, Frame, Generator};
use crate::classify::NumericRange;
use crate::ir::{
    Camera, GeneratedGeometry, LineStyle, Marker, MarkerSize, Mode, ScatterTrace, Trace,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

pub struct Mandala;
pub struct Galaxy;
pub struct DnaHelix;

const GALAXY_SEED: u64 = 0x6a1a_c71c;
const DEFAULT_PETALS: usize = 5;
const MAX_PETALS: usize = 6;

/// Range maximum used as a divisor, 1 when absent or zero
fn divisor(range: Option<&NumericRange>) -> f64 {
    match range {
        Some(r) if r.max != 0.0 => r.max,
        _ => 1.0,
    }
}

impl Generator for Mandala {
    fn generate(&self, frame: &Frame) -> Option<GeneratedGeometry> {
        let mapping = frame.mapping;
        let colors = frame.values(&mapping.color_by);
        let sizes = frame.values(&mapping.size_by);
        let color_range = frame.range(&mapping.color_by);
        let color_max = divisor(color_range);
        let petals = frame
            .categories()
            .map_or(DEFAULT_PETALS, |c| c.len().min(MAX_PETALS));
        let n = frame.len();

        let mut trace = ScatterTrace::new(
            Mode::Markers,
            format!("3D Mandala - {n} source items"),
            Marker::new(MarkerSize::PerPoint(Vec::new()), Vec::new(), "Rainbow")
                .opacity(0.8)
                .colorbar(format!("Harmony ({})", mapping.color_by)),
        );
        let mut point_sizes = Vec::with_capacity(n * (petals + 1));

        for i in 0..n {
            let t = i as f64 / n as f64;
            let color = colors[i];
            let turns = color_range.map_or(6.0, |r| 4.0 + r.normalize(color) * 4.0);

            let angle = t * turns * PI;
            let radius = 1.0 + (angle * 3.0).sin() * 0.5;
            let height = (angle * 2.0).sin() * 0.3;
            let (cx, cy) = (angle.cos() * radius, angle.sin() * radius);

            trace.push(cx, cy, height);
            trace.marker.color.push(color);
            let mut size = clamp(3.0, 8.0, sizes[i] / color_max * 6.0 + 3.0);
            point_sizes.push(size);

            for j in 0..petals {
                let petal_angle = angle + j as f64 * 2.0 * PI / petals as f64;
                let petal_radius = radius * 0.3;
                trace.push(
                    cx + petal_angle.cos() * petal_radius,
                    cy + petal_angle.sin() * petal_radius,
                    height + (petal_angle * 2.0).sin() * 0.1,
                );
                trace.marker.color.push(color * 0.8);
                size = (size * 0.6).max(2.0);
                point_sizes.push(size);
            }
        }
        trace.marker.size = MarkerSize::PerPoint(point_sizes);

        Some(GeneratedGeometry {
            data: vec![Trace::Scatter3d(trace)],
            layout: frame.layout("3D Mandala - Sacred Patterns", Camera::at(0.0, 0.0, 2.5)),
        })
    }
}

impl Generator for Galaxy {
    fn generate(&self, frame: &Frame) -> Option<GeneratedGeometry> {
        let mapping = frame.mapping;
        let colors = frame.values(&mapping.color_by);
        let sizes = frame.values(&mapping.size_by);
        let color_range = frame.range(&mapping.color_by);
        let size_range = frame.range(&mapping.size_by);
        let n = frame.len();
        let two_arms = n > 20;
        let mut rng = StdRng::seed_from_u64(GALAXY_SEED);

        let mut trace = ScatterTrace::new(
            Mode::Markers,
            format!("3D Galaxy - {n} stars"),
            Marker::new(MarkerSize::PerPoint(Vec::new()), Vec::new(), "Viridis")
                .opacity(0.8)
                .colorbar(format!("Brightness ({})", mapping.color_by)),
        );
        let mut point_sizes = Vec::new();

        for i in 0..n {
            let t = i as f64 / n as f64;
            let color = colors[i];
            let nc = color_range.map_or(t, |r| r.normalize(color));
            let ns = size_range.map_or(0.5, |r| r.normalize(sizes[i]));

            let angle = nc * 6.0 * PI + t * 2.0 * PI;
            let radius = ns * 3.0 + t * 0.5;
            let jitter: f64 = rng.gen::<f64>() - 0.5;
            let height = jitter * 0.2 * (1.0 - t);

            trace.push(angle.cos() * radius, angle.sin() * radius, height);
            trace.marker.color.push(color);
            let size = clamp(2.0, 12.0, (1.0 - ns) * 8.0 + 3.0);
            point_sizes.push(size);

            if two_arms {
                let angle2 = angle + PI * 0.8;
                let radius2 = radius * 0.7;
                trace.push(angle2.cos() * radius2, angle2.sin() * radius2, height * 0.5);
                trace.marker.color.push(color * 0.8);
                point_sizes.push((size * 0.7).max(1.0));
            }
        }
        trace.marker.size = MarkerSize::PerPoint(point_sizes);

        let mut layout = frame.layout("3D Galaxy - Cosmic Spiral", Camera::at(1.5, 1.5, 1.0));
        layout.scene.bgcolor = Some("rgba(0, 0, 20, 0.9)".to_string());

        Some(GeneratedGeometry {
            data: vec![Trace::Scatter3d(trace)],
            layout,
        })
    }
}

impl Generator for DnaHelix {
    fn generate(&self, frame: &Frame) -> Option<GeneratedGeometry> {
        let mapping = frame.mapping;
        let colors = frame.values(&mapping.color_by);
        let sizes = frame.values(&mapping.size_by);
        let color_range = frame.range(&mapping.color_by);
        let size_range = frame.range(&mapping.size_by);
        let size_max = divisor(size_range);
        let n = frame.len();

        let point_sizes: Vec<f64> = sizes
            .iter()
            .map(|s| clamp(4.0, 10.0, s / size_max * 6.0 + 4.0))
            .collect();

        let mut first = ScatterTrace::new(
            Mode::MarkersAndLines,
            format!("DNA strand 1 - {n} bases"),
            Marker::new(MarkerSize::PerPoint(point_sizes.clone()), colors.clone(), "RdYlBu")
                .colorbar(mapping.color_by.to_string()),
        );
        first.line = Some(LineStyle::new("rgba(255, 100, 100, 0.8)", 4.0));

        let mut second = ScatterTrace::new(
            Mode::MarkersAndLines,
            format!("DNA strand 2 - {n} bases"),
            Marker::new(MarkerSize::PerPoint(point_sizes), colors.clone(), "RdYlBu"),
        );
        second.line = Some(LineStyle::new("rgba(100, 100, 255, 0.8)", 4.0));
        second.showlegend = Some(false);

        for i in 0..n {
            let t = i as f64 / n as f64 * 8.0 * PI;
            let z = i as f64 / n as f64 * 4.0;
            let radius = 1.0 + color_range.map_or(0.0, |r| 0.3 * r.normalize(colors[i]));
            let lift = size_range.map_or(0.0, |r| 0.1 * r.normalize(sizes[i]));

            first.push(t.cos() * radius, t.sin() * radius, z + lift);
            second.push((t + PI).cos() * radius, (t + PI).sin() * radius, z + lift);
        }

        Some(GeneratedGeometry {
            data: vec![Trace::Scatter3d(first), Trace::Scatter3d(second)],
            layout: frame.layout("DNA Double Helix", Camera::at(2.0, 0.0, 1.0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::super::Archetype;
    use super::*;

    fn numeric_rows(n: usize) -> Fixture {
        let rows = (0..n)
            .map(|i| {
                vec![
                    i.to_string(),
                    ((i * 3) % 7).to_string(),
                    ((i * 5) % 11).to_string(),
                    ((i * 2) % 9).to_string(),
                ]
            })
            .collect();
        Fixture::new(&["a", "b", "c", "d"], rows)
    }

    fn scatter(geometry: &GeneratedGeometry, index: usize) -> &ScatterTrace {
        match &geometry.data[index] {
            Trace::Scatter3d(t) => t,
            other => panic!("expected scatter3d, got {other:?}"),
        }
    }

    fn sizes(trace: &ScatterTrace) -> &[f64] {
        match &trace.marker.size {
            MarkerSize::PerPoint(s) => s,
            MarkerSize::Uniform(_) => panic!("expected per-point sizes"),
        }
    }

    #[test]
    fn test_mandala_default_petals() {
        let f = numeric_rows(10);
        let geometry = f.generate(Archetype::Mandala);
        let trace = scatter(&geometry, 0);
        assert_eq!(trace.len(), 10 * (1 + DEFAULT_PETALS));
        assert_eq!(sizes(trace).len(), trace.len());
        assert_eq!(geometry.layout.scene.camera, Camera::at(0.0, 0.0, 2.5));
    }

    #[test]
    fn test_mandala_petals_follow_categories() {
        let rows: Vec<Vec<String>> = (0..12)
            .map(|i| vec![i.to_string(), ["r", "g", "b"][i % 3].to_string()])
            .collect();
        let f = Fixture::new(&["v", "kind"], rows);
        let geometry = f.generate(Archetype::Mandala);
        assert_eq!(scatter(&geometry, 0).len(), 12 * 4);
    }

    #[test]
    fn test_mandala_petal_sizes_cascade() {
        let f = numeric_rows(3);
        let geometry = f.generate(Archetype::Mandala);
        let s = sizes(scatter(&geometry, 0));
        for w in s[..=DEFAULT_PETALS].windows(2) {
            assert!(w[1] <= w[0]);
            assert!(w[1] >= 2.0);
        }
    }

    #[test]
    fn test_galaxy_secondary_arm_above_twenty_rows() {
        let small = numeric_rows(20);
        let geometry = small.generate(Archetype::Galaxy);
        assert_eq!(scatter(&geometry, 0).len(), 20);

        let large = numeric_rows(21);
        let geometry = large.generate(Archetype::Galaxy);
        assert_eq!(scatter(&geometry, 0).len(), 42);
        assert!(geometry.layout.scene.bgcolor.is_some());
    }

    #[test]
    fn test_galaxy_is_reproducible() {
        let f = numeric_rows(30);
        assert_eq!(f.generate(Archetype::Galaxy), f.generate(Archetype::Galaxy));
    }

    #[test]
    fn test_galaxy_height_bounded() {
        let f = numeric_rows(30);
        let geometry = f.generate(Archetype::Galaxy);
        assert!(scatter(&geometry, 0).z.iter().all(|z| z.abs() <= 0.1));
    }

    #[test]
    fn test_helix_two_strands_opposite() {
        let f = numeric_rows(16);
        let geometry = f.generate(Archetype::Helix);
        assert_eq!(geometry.data.len(), 2);
        let (a, b) = (scatter(&geometry, 0), scatter(&geometry, 1));
        assert_eq!(a.len(), 16);
        for i in 0..16 {
            assert!((a.x[i] + b.x[i]).abs() < 1e-9);
            assert!((a.y[i] + b.y[i]).abs() < 1e-9);
            assert_eq!(a.z[i], b.z[i]);
        }
        assert!(sizes(a).iter().all(|s| (4.0..=10.0).contains(s)));
        assert_eq!(b.showlegend, Some(false));
    }

    #[test]
    fn test_helix_without_ranges() {
        let f = Fixture::from_rows(&["kind"], &[&["x"], &["y"]]);
        let geometry = f.generate(Archetype::Helix);
        let a = scatter(&geometry, 0);
        assert!((a.x[0] - 1.0).abs() < 1e-9);
        assert_eq!(a.z, vec![0.0, 2.0]);
    }

    /// Five rows with a = b = c = 0..=4, so color and size both read `a`
    fn ramp() -> Fixture {
        let rows: Vec<Vec<String>> = (0..5).map(|i| vec![i.to_string(); 3]).collect();
        Fixture::new(&["a", "b", "c"], rows)
    }

    fn close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
    }

    #[test]
    fn test_mandala_center_point_coordinates() {
        // Row 2: t = 0.4, turns = 6, angle = 2.4π, radius = 1 + sin(7.2π) / 2
        let geometry = ramp().generate(Archetype::Mandala);
        let trace = scatter(&geometry, 0);
        let center = 2 * (1 + DEFAULT_PETALS);
        close(trace.x[center], 0.218_199_18);
        close(trace.y[center], 0.671_548_02);
        close(trace.z[center], 0.176_335_58);
        close(sizes(trace)[center], 6.0);
        close(trace.marker.color[center], 2.0);
    }

    #[test]
    fn test_galaxy_star_coordinates() {
        // Row 2: normalized color and size 0.5, angle = 3.8π, radius = 1.5 + 0.2
        let geometry = ramp().generate(Archetype::Galaxy);
        let trace = scatter(&geometry, 0);
        close(trace.x[2], 1.375_328_89);
        close(trace.y[2], -0.999_234_93);
        close(sizes(trace)[2], 7.0);
    }

    #[test]
    fn test_helix_base_coordinates() {
        // Row 2: t = 3.2π, radius = 1.15, z = 1.6 plus a lift of 0.05
        let geometry = ramp().generate(Archetype::Helix);
        let (a, b) = (scatter(&geometry, 0), scatter(&geometry, 1));
        close(a.x[2], -0.930_369_54);
        close(a.y[2], -0.675_953_04);
        close(a.z[2], 1.65);
        close(b.x[2], 0.930_369_54);
        close(b.z[2], 1.65);
    }
}
