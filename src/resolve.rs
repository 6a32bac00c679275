use crate::classify::DatasetProfile;
use crate::parser::ast::{MappingOverride, RoleName, Target};
use anyhow::{bail, Result};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// What a visual role reads its values from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Column(String),
    /// Row position
    Index,
    /// Constant 1
    Count,
}

impl Role {
    pub fn column(name: &str) -> Self {
        Role::Column(name.to_string())
    }

    pub fn column_name(&self) -> Option<&str> {
        match self {
            Role::Column(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Column(name) => f.write_str(name),
            Role::Index => f.write_str("index"),
            Role::Count => f.write_str("count"),
        }
    }
}

/// Columns serialize as their name; sentinels as `{"derived": "index"}` so a
/// column literally named `index` stays distinguishable.
impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Role::Column(name) => serializer.serialize_str(name),
            Role::Index | Role::Count => {
                let mut state = serializer.serialize_struct("Role", 1)?;
                state.serialize_field("derived", &self.to_string())?;
                state.end()
            }
        }
    }
}

/// Roles chosen for a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMapping {
    pub x_axis: Role,
    pub y_axis: Role,
    pub z_axis: Role,
    pub color_by: Role,
    pub size_by: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_by: Option<String>,
}

/// Default roles for a dataset profile. Never fails.
pub fn resolve_mapping(profile: &DatasetProfile) -> DataMapping {
    let mut ordered = profile.numeric_columns();
    ordered.extend(profile.temporal_columns());
    let categorical = profile.categorical_columns();
    let first_category = categorical.first().map(|c| c.to_string());

    match ordered.as_slice() {
        [first, second, third, rest @ ..] => DataMapping {
            x_axis: Role::column(first),
            y_axis: Role::column(second),
            z_axis: Role::column(third),
            color_by: Role::column(first),
            size_by: Role::column(rest.first().unwrap_or(first)),
            category_by: first_category,
        },
        [first, second] => DataMapping {
            x_axis: Role::column(first),
            y_axis: Role::column(second),
            z_axis: Role::column(first),
            color_by: Role::column(second),
            size_by: Role::column(first),
            category_by: first_category,
        },
        [only] => DataMapping {
            x_axis: Role::column(only),
            y_axis: Role::Index,
            z_axis: Role::column(only),
            color_by: Role::column(only),
            size_by: Role::column(only),
            category_by: first_category,
        },
        [] => {
            let category_role = first_category
                .as_deref()
                .map(Role::column)
                .unwrap_or(Role::Index);
            DataMapping {
                x_axis: Role::Index,
                y_axis: category_role.clone(),
                z_axis: Role::Count,
                color_by: category_role,
                size_by: Role::Count,
                category_by: first_category,
            }
        }
    }
}

/// Default roles with a user override applied on top.
///
/// Fails when the override names a column the dataset does not have, or binds
/// the category role to a sentinel.
pub fn resolve_mapping_with(
    profile: &DatasetProfile,
    overrides: &MappingOverride,
) -> Result<DataMapping> {
    let mut mapping = resolve_mapping(profile);

    for binding in &overrides.bindings {
        let role = match &binding.target {
            Target::Column(name) => {
                if profile.get(name).is_none() {
                    bail!("unknown column '{}' in mapping override", name);
                }
                Role::Column(name.clone())
            }
            Target::Index => Role::Index,
            Target::Count => Role::Count,
        };

        match binding.role {
            RoleName::X => mapping.x_axis = role,
            RoleName::Y => mapping.y_axis = role,
            RoleName::Z => mapping.z_axis = role,
            RoleName::Color => mapping.color_by = role,
            RoleName::Size => mapping.size_by = role,
            RoleName::Category => match role {
                Role::Column(name) => mapping.category_by = Some(name),
                other => bail!("category must name a column, got '{}'", other),
            },
        }
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use crate::parser::parse_mapping;

    fn profile(columns: &[&str], rows: &[&[&str]]) -> DatasetProfile {
        let data = Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        );
        DatasetProfile::from_dataset(&data)
    }

    #[test]
    fn test_three_numeric_columns() {
        let p = profile(&["a", "b", "c"], &[&["1", "2", "3"], &["4", "5", "6"]]);
        let m = resolve_mapping(&p);
        assert_eq!(m.x_axis, Role::column("a"));
        assert_eq!(m.y_axis, Role::column("b"));
        assert_eq!(m.z_axis, Role::column("c"));
        assert_eq!(m.color_by, Role::column("a"));
        assert_eq!(m.size_by, Role::column("a"));
        assert_eq!(m.category_by, None);
    }

    #[test]
    fn test_four_columns_size_uses_fourth() {
        let p = profile(
            &["a", "b", "label", "c", "d"],
            &[&["1", "2", "x", "3", "4"], &["5", "6", "x", "7", "8"]],
        );
        let m = resolve_mapping(&p);
        assert_eq!(m.z_axis, Role::column("c"));
        assert_eq!(m.size_by, Role::column("d"));
        assert_eq!(m.category_by.as_deref(), Some("label"));
    }

    #[test]
    fn test_temporal_columns_follow_numeric() {
        let p = profile(
            &["day", "value"],
            &[&["2024-01-01", "3"], &["2024-01-02", "4"]],
        );
        let m = resolve_mapping(&p);
        assert_eq!(m.x_axis, Role::column("value"));
        assert_eq!(m.y_axis, Role::column("day"));
    }

    #[test]
    fn test_two_numeric_columns() {
        let p = profile(&["a", "b"], &[&["1", "2"], &["3", "4"]]);
        let m = resolve_mapping(&p);
        assert_eq!(m.x_axis, Role::column("a"));
        assert_eq!(m.y_axis, Role::column("b"));
        assert_eq!(m.z_axis, Role::column("a"));
        assert_eq!(m.color_by, Role::column("b"));
        assert_eq!(m.size_by, Role::column("a"));
    }

    #[test]
    fn test_one_numeric_column() {
        let p = profile(&["a", "kind"], &[&["1", "x"], &["2", "y"]]);
        let m = resolve_mapping(&p);
        assert_eq!(m.x_axis, Role::column("a"));
        assert_eq!(m.y_axis, Role::Index);
        assert_eq!(m.z_axis, Role::column("a"));
        assert_eq!(m.color_by, Role::column("a"));
        assert_eq!(m.size_by, Role::column("a"));
        assert_eq!(m.category_by.as_deref(), Some("kind"));
    }

    #[test]
    fn test_no_numeric_with_category() {
        let p = profile(&["kind"], &[&["x"], &["y"], &["x"]]);
        let m = resolve_mapping(&p);
        assert_eq!(m.x_axis, Role::Index);
        assert_eq!(m.y_axis, Role::column("kind"));
        assert_eq!(m.z_axis, Role::Count);
        assert_eq!(m.color_by, Role::column("kind"));
        assert_eq!(m.size_by, Role::Count);
        assert_eq!(m.category_by.as_deref(), Some("kind"));
    }

    #[test]
    fn test_no_usable_columns() {
        let p = profile(&["empty"], &[&[""]]);
        let m = resolve_mapping(&p);
        assert_eq!(m.x_axis, Role::Index);
        assert_eq!(m.y_axis, Role::Index);
        assert_eq!(m.z_axis, Role::Count);
        assert_eq!(m.color_by, Role::Index);
        assert_eq!(m.size_by, Role::Count);
        assert_eq!(m.category_by, None);
    }

    #[test]
    fn test_serialize_sentinels() {
        let p = profile(&["a"], &[&["1"], &["2"]]);
        let json = serde_json::to_value(resolve_mapping(&p)).unwrap();
        assert_eq!(json["xAxis"], "a");
        assert_eq!(json["yAxis"], serde_json::json!({"derived": "index"}));
        assert!(json.get("categoryBy").is_none());
    }

    #[test]
    fn test_column_named_index_differs_from_sentinel() {
        let p = profile(&["index", "count"], &[&["1", "2"], &["3", "4"]]);
        let overrides = parse_mapping(r#"x: "index", y: index, z: "count", size: count"#).unwrap();
        let json = serde_json::to_value(resolve_mapping_with(&p, &overrides).unwrap()).unwrap();
        assert_eq!(json["xAxis"], "index");
        assert_eq!(json["yAxis"], serde_json::json!({"derived": "index"}));
        assert_eq!(json["zAxis"], "count");
        assert_eq!(json["sizeBy"], serde_json::json!({"derived": "count"}));
        assert_ne!(json["xAxis"], json["yAxis"]);
    }

    #[test]
    fn test_override_replaces_roles() {
        let p = profile(&["a", "b", "c"], &[&["1", "2", "3"], &["4", "5", "6"]]);
        let overrides = parse_mapping("x: c, size: count").unwrap();
        let m = resolve_mapping_with(&p, &overrides).unwrap();
        assert_eq!(m.x_axis, Role::column("c"));
        assert_eq!(m.y_axis, Role::column("b"));
        assert_eq!(m.size_by, Role::Count);
    }

    #[test]
    fn test_override_unknown_column() {
        let p = profile(&["a"], &[&["1"]]);
        let overrides = parse_mapping("x: nope").unwrap();
        let err = resolve_mapping_with(&p, &overrides).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_override_category_sentinel_rejected() {
        let p = profile(&["a"], &[&["1"]]);
        let overrides = parse_mapping("category: index").unwrap();
        assert!(resolve_mapping_with(&p, &overrides).is_err());
    }
}
