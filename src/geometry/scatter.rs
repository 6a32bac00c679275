use super::{clamp, Frame, Generator};
use crate::ir::{
    Camera, GeneratedGeometry, LineStyle, Marker, MarkerSize, Mode, ScatterTrace, Trace,
};

pub struct ClassicScatter;
pub struct BubbleScatter;

const BUBBLE_MIN: f64 = 10.0;
const BUBBLE_MAX: f64 = 50.0;

impl Generator for ClassicScatter {
    fn generate(&self, frame: &Frame) -> Option<GeneratedGeometry> {
        Some(classic(frame))
    }
}

impl Generator for BubbleScatter {
    fn generate(&self, frame: &Frame) -> Option<GeneratedGeometry> {
        Some(bubble(frame))
    }
}

/// Marker size shrinking with the point count
pub fn classic_marker_size(n: usize) -> f64 {
    clamp(3.0, 12.0, 100.0 / (n as f64).sqrt())
}

/// Points in mapped x/y/z with a uniform size and per-point color
pub fn classic(frame: &Frame) -> GeneratedGeometry {
    let mapping = frame.mapping;
    let n = frame.len();

    let marker = Marker::new(
        MarkerSize::Uniform(classic_marker_size(n)),
        frame.values(&mapping.color_by),
        "Viridis",
    )
    .opacity((1.0 - n as f64 / 1000.0).max(0.6))
    .colorbar(mapping.color_by.to_string());

    let text = (0..n)
        .map(|i| {
            let mut tooltip = format!("<b>Point {}</b><br>", i + 1);
            for role in [&mapping.x_axis, &mapping.y_axis, &mapping.z_axis] {
                tooltip.push_str(&format!("<b>{}:</b> {}<br>", role, frame.raw(i, role)));
            }
            if let Some((column, value)) = frame.category(i) {
                tooltip.push_str(&format!("<b>{column}:</b> {value}<br>"));
            }
            tooltip
        })
        .collect();

    let mut trace = ScatterTrace::new(Mode::Markers, format!("3D Scatter - {n} points"), marker)
        .with_hover_text(text);
    trace.x = frame.values(&mapping.x_axis);
    trace.y = frame.values(&mapping.y_axis);
    trace.z = frame.values(&mapping.z_axis);

    GeneratedGeometry {
        data: vec![Trace::Scatter3d(trace)],
        layout: frame.layout("Classic 3D Scatter", Camera::DEFAULT),
    }
}

/// Min-max normalize sizes into the bubble range; a flat input maps to the middle
pub fn bubble_sizes(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span > 0.0 {
                BUBBLE_MIN + (v - min) / span * (BUBBLE_MAX - BUBBLE_MIN)
            } else {
                (BUBBLE_MIN + BUBBLE_MAX) / 2.0
            }
        })
        .collect()
}

fn bubble(frame: &Frame) -> GeneratedGeometry {
    let mapping = frame.mapping;
    let n = frame.len();

    let marker = Marker::new(
        MarkerSize::PerPoint(bubble_sizes(&frame.values(&mapping.size_by))),
        frame.values(&mapping.color_by),
        "Plasma",
    )
    .opacity(0.75)
    .colorbar(mapping.color_by.to_string())
    .outline(LineStyle::new("rgba(255, 255, 255, 0.3)", 1.0));

    let text = (0..n)
        .map(|i| {
            let mut tooltip = format!("<b>Bubble {}</b><br>", i + 1);
            tooltip.push_str(&format!(
                "<b>Size ({}):</b> {}<br>",
                mapping.size_by,
                frame.raw(i, &mapping.size_by)
            ));
            tooltip.push_str(&format!(
                "<b>Color ({}):</b> {}<br>",
                mapping.color_by,
                frame.raw(i, &mapping.color_by)
            ));
            if let Some((_, value)) = frame.category(i) {
                tooltip.push_str(&format!("<b>Category:</b> {value}<br>"));
            }
            tooltip
        })
        .collect();

    let mut trace = ScatterTrace::new(Mode::Markers, format!("3D Bubbles - {n} items"), marker)
        .with_hover_text(text);
    trace.x = frame.values(&mapping.x_axis);
    trace.y = frame.values(&mapping.y_axis);
    trace.z = frame.values(&mapping.z_axis);

    GeneratedGeometry {
        data: vec![Trace::Scatter3d(trace)],
        layout: frame.layout("3D Bubbles - Proportional Sizes", Camera::DEFAULT),
    }
}
