// Geometry generators: dataset rows to 3D traces

pub mod density;
pub mod parametric;
pub mod scatter;
pub mod surface;
pub mod timeline;

use crate::classify::{parse_number, parse_temporal, ColumnClassification, DatasetProfile, NumericRange};
use crate::data::Dataset;
use crate::ir::{Annotation, Axis, Camera, GeneratedGeometry, Layout, Scene, Title};
use crate::resolve::{DataMapping, Role};
use serde::Serialize;
use tracing::{debug, warn};

/// Procedural shape a model renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Scatter,
    Bubble,
    Density,
    Surface,
    Mandala,
    Galaxy,
    Helix,
    Timeline,
}

impl Archetype {
    fn generator(self) -> &'static dyn Generator {
        match self {
            Archetype::Scatter => &scatter::ClassicScatter,
            Archetype::Bubble => &scatter::BubbleScatter,
            Archetype::Density => &density::DensityField,
            Archetype::Surface => &surface::InterpolatedSurface,
            Archetype::Mandala => &parametric::Mandala,
            Archetype::Galaxy => &parametric::Galaxy,
            Archetype::Helix => &parametric::DnaHelix,
            Archetype::Timeline => &timeline::Timeline,
        }
    }
}

/// One geometry archetype.
///
/// `generate` returns `None` when a role it needs has no numeric range; the
/// caller then renders classic scatter instead.
pub trait Generator {
    fn generate(&self, frame: &Frame) -> Option<GeneratedGeometry>;
}

/// Read-only view over everything a generator needs
pub struct Frame<'a> {
    pub data: &'a Dataset,
    pub mapping: &'a DataMapping,
    pub profile: &'a DatasetProfile,
}

impl<'a> Frame<'a> {
    pub fn new(data: &'a Dataset, mapping: &'a DataMapping, profile: &'a DatasetProfile) -> Self {
        Self { data, mapping, profile }
    }

    pub fn len(&self) -> usize {
        self.data.row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn classification(&self, role: &Role) -> Option<&'a ColumnClassification> {
        role.column_name().and_then(|name| self.profile.get(name))
    }

    /// Numeric range of the column behind a role, if it has one
    pub fn range(&self, role: &Role) -> Option<&'a NumericRange> {
        self.classification(role).and_then(ColumnClassification::range)
    }

    /// Numeric value of a role for every row.
    ///
    /// `index` yields the row position and `count` yields 1. Columns with a
    /// range parse each cell and substitute the column minimum on failure.
    /// Categorical columns yield the category position (0 when absent).
    /// Anything else falls back to the row position.
    pub fn values(&self, role: &Role) -> Vec<f64> {
        let n = self.len();
        let name = match role {
            Role::Index => return (0..n).map(|i| i as f64).collect(),
            Role::Count => return vec![1.0; n],
            Role::Column(name) => name.as_str(),
        };

        let cells = self.data.column_values(name);
        match self.profile.get(name) {
            Some(ColumnClassification::Temporal { range }) => cells
                .iter()
                .map(|cell| parse_temporal(cell).unwrap_or(range.min))
                .collect(),
            Some(ColumnClassification::Categorical { categories }) => cells
                .iter()
                .map(|cell| {
                    categories
                        .iter()
                        .position(|c| c == cell)
                        .map_or(0.0, |i| i as f64)
                })
                .collect(),
            Some(classification) => match classification.range() {
                Some(range) => cells
                    .iter()
                    .map(|cell| parse_number(cell).unwrap_or(range.min))
                    .collect(),
                None => (0..n).map(|i| i as f64).collect(),
            },
            None => (0..n).map(|i| i as f64).collect(),
        }
    }

    /// Raw cell of the column behind a role, "N/A" when empty or not a column
    pub fn raw(&self, row: usize, role: &Role) -> String {
        let cell = role
            .column_name()
            .map(|name| self.data.value(row, name))
            .unwrap_or("");
        if cell.is_empty() {
            "N/A".to_string()
        } else {
            cell.to_string()
        }
    }

    /// Category column and value of a row, when a category mapping exists
    /// and the cell is set
    pub fn category(&self, row: usize) -> Option<(&'a str, &'a str)> {
        let name = self.mapping.category_by.as_deref()?;
        let cell = self.data.value(row, name);
        (!cell.is_empty()).then_some((name, cell))
    }

    /// Stored categories of the category mapping
    pub fn categories(&self) -> Option<&'a [String]> {
        let name = self.mapping.category_by.as_deref()?;
        self.profile.get(name).and_then(ColumnClassification::categories)
    }

    fn axis_title(&self, role: &Role) -> String {
        match self.classification(role) {
            Some(classification) => format!("{} ({})", role, classification.column_type()),
            None => role.to_string(),
        }
    }

    /// Layout shared by every generator: title, typed axis titles, camera and
    /// a summary annotation
    pub fn layout(&self, title: &str, camera: Camera) -> Layout {
        let counts = self.profile.counts();
        let mapping = self.mapping;
        let mut summary = format!(
            "<b>Model:</b> {}<br><b>Data:</b> {} rows • {} num. • {} temp. • {} cat.<br>\
             <b>Mapping:</b><br>• X: {}<br>• Y: {}<br>• Z: {}<br>• Color: {}<br>• Size: {}",
            title,
            self.len(),
            counts.numeric,
            counts.temporal,
            counts.categorical,
            mapping.x_axis,
            mapping.y_axis,
            mapping.z_axis,
            mapping.color_by,
            mapping.size_by,
        );
        if let Some(category) = &mapping.category_by {
            summary.push_str(&format!("<br>• Category: {category}"));
        }

        Layout {
            title: Title { text: title.to_string() },
            scene: Scene {
                xaxis: Axis::titled(self.axis_title(&mapping.x_axis)),
                yaxis: Axis::titled(self.axis_title(&mapping.y_axis)),
                zaxis: Axis::titled(self.axis_title(&mapping.z_axis)),
                camera,
                bgcolor: None,
            },
            annotations: vec![Annotation::corner(summary)],
        }
    }
}

/// Render `dataset` with the generator for `archetype`.
///
/// Substitutes classic scatter when the archetype cannot be built from the
/// mapped columns. Never fails.
pub fn generate(
    archetype: Archetype,
    data: &Dataset,
    mapping: &DataMapping,
    profile: &DatasetProfile,
) -> GeneratedGeometry {
    let frame = Frame::new(data, mapping, profile);
    debug!(?archetype, rows = frame.len(), "generating geometry");

    match archetype.generator().generate(&frame) {
        Some(geometry) => geometry,
        None => {
            warn!(?archetype, "mapped columns lack a numeric range, using classic scatter");
            scatter::classic(&frame)
        }
    }
}

pub(crate) fn clamp(min: f64, max: f64, value: f64) -> f64 {
    value.max(min).min(max)
}

/// Evenly spaced points from `min` to `max`, both included
pub(crate) fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count < 2 {
        return vec![min; count];
    }
    let step = (max - min) / (count - 1) as f64;
    (0..count).map(|i| min + i as f64 * step).collect()
}
