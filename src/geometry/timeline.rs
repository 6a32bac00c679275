use super::{Frame, Generator};
use crate::ir::{
    Camera, GeneratedGeometry, LineStyle, Marker, MarkerSize, Mode, ScatterTrace, Trace,
};
use crate::resolve::Role;

/// Rows ordered by x, rising one step per rank
pub struct Timeline;

impl Generator for Timeline {
    fn generate(&self, frame: &Frame) -> Option<GeneratedGeometry> {
        let mapping = frame.mapping;
        let times = frame.values(&mapping.x_axis);
        let values = frame.values(&mapping.y_axis);
        let colors = frame.values(&mapping.color_by);
        let n = frame.len();

        let time_role = frame
            .profile
            .temporal_columns()
            .first()
            .map(|c| Role::column(c))
            .unwrap_or_else(|| mapping.x_axis.clone());

        // Stable: rows with equal x keep their input order
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| times[a].total_cmp(&times[b]));

        let marker = Marker::new(
            MarkerSize::Uniform(6.0),
            order.iter().map(|&i| colors[i]).collect(),
            "Viridis",
        )
        .opacity(0.8)
        .colorbar(mapping.color_by.to_string());

        let text = order
            .iter()
            .map(|&i| {
                format!(
                    "<b>Time point {}</b><br><b>Time:</b> {}<br><b>Value:</b> {}<br>",
                    i + 1,
                    frame.raw(i, &time_role),
                    frame.raw(i, &mapping.y_axis)
                )
            })
            .collect();

        let mut trace =
            ScatterTrace::new(Mode::MarkersAndLines, format!("3D Timeline - {n} points"), marker)
                .with_hover_text(text);
        trace.line = Some(LineStyle::new("rgba(100, 100, 100, 0.6)", 3.0));
        for (rank, &i) in order.iter().enumerate() {
            trace.push(times[i], values[i], rank as f64 * 0.1);
        }

        Some(GeneratedGeometry {
            data: vec![Trace::Scatter3d(trace)],
            layout: frame.layout("3D Timeline - Evolution Over Time", Camera::DEFAULT),
        })
    }
}
