// Pipeline from an uploaded dataset to generated geometry

use crate::catalog::{archetype_for, find_model, is_compatible};
use crate::classify::DatasetProfile;
use crate::data::Dataset;
use crate::geometry::{self, Archetype};
use crate::ir::GeneratedGeometry;
use crate::parser::MappingOverride;
use crate::resolve::{resolve_mapping, resolve_mapping_with, DataMapping};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Result of one visualization request
#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    pub model_id: String,
    pub archetype: Archetype,
    pub compatible: bool,
    pub profile: DatasetProfile,
    pub mapping: DataMapping,
    pub geometry: GeneratedGeometry,
}

/// Classify, map and generate geometry for `model_id`.
///
/// Unknown ids render as classic scatter. A model whose requirements the
/// dataset does not meet is still rendered; the mismatch is logged and
/// recorded in `compatible`. Only an invalid mapping override fails.
pub fn visualize(
    data: &Dataset,
    model_id: &str,
    overrides: Option<&MappingOverride>,
) -> Result<Visualization> {
    let profile = DatasetProfile::from_dataset(data);
    debug!(
        rows = data.row_count(),
        counts = ?profile.counts(),
        "dataset profiled"
    );

    let mapping = match overrides {
        Some(overrides) if !overrides.is_empty() => resolve_mapping_with(&profile, overrides)
            .context("Failed to apply mapping override")?,
        _ => resolve_mapping(&profile),
    };

    let archetype = archetype_for(model_id);
    let compatible = match find_model(model_id) {
        Some(model) => {
            let ok = is_compatible(model, &profile);
            if !ok {
                warn!(model_id, "dataset does not meet the model's requirements");
            }
            ok
        }
        None => {
            warn!(model_id, "unknown model, rendering classic scatter");
            false
        }
    };

    let geometry = geometry::generate(archetype, data, &mapping, &profile);

    Ok(Visualization {
        model_id: model_id.to_string(),
        archetype,
        compatible,
        profile,
        mapping,
        geometry,
    })
}
