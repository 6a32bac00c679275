// Visualization model catalogue and compatibility checks

use crate::classify::{ColumnType, DatasetProfile};
use crate::geometry::Archetype;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Advanced,
}

/// A number of columns of one type that a model uses for one purpose
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnRequirement {
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub count: usize,
    pub usage: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Requirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_numeric: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_temporal: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_categorical: Option<usize>,
    pub specific: &'static [ColumnRequirement],
}

impl Requirements {
    pub const NONE: Requirements = Requirements {
        min_numeric: None,
        min_temporal: None,
        min_categorical: None,
        specific: &[],
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualizationModel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub tags: &'static [&'static str],
    pub complexity: Complexity,
    pub prompt: &'static str,
    pub requirements: Requirements,
    pub archetype: Archetype,
}

const fn numeric(count: usize, usage: &'static str) -> ColumnRequirement {
    ColumnRequirement { column_type: ColumnType::Numeric, count, usage }
}

const fn temporal(count: usize, usage: &'static str) -> ColumnRequirement {
    ColumnRequirement { column_type: ColumnType::Temporal, count, usage }
}

const fn categorical(count: usize, usage: &'static str) -> ColumnRequirement {
    ColumnRequirement { column_type: ColumnType::Categorical, count, usage }
}

macro_rules! needs {
    ($numeric:expr, $temporal:expr, $categorical:expr, $specific:expr $(,)?) => {
        Requirements {
            min_numeric: $numeric,
            min_temporal: $temporal,
            min_categorical: $categorical,
            specific: $specific,
        }
    };
}

pub static MODELS: &[VisualizationModel] = &[
    // Point clouds
    VisualizationModel {
        id: "scatter3d",
        name: "3D Scatter",
        description: "Points in 3D space",
        category: "Point clouds",
        tags: &["points", "scatter", "3d", "basic"],
        complexity: Complexity::Simple,
        prompt: "Show my data as a classic 3D scatter plot with spherical markers",
        requirements: needs!(Some(3), None, None, &[numeric(3, "x, y, z coordinates")]),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "scatter_bubble",
        name: "3D Bubbles",
        description: "Point cloud with variable sizes",
        category: "Point clouds",
        tags: &["bubbles", "sizes", "proportions"],
        complexity: Complexity::Simple,
        prompt: "Turn my data into 3D bubbles where size shows the weight of each value",
        requirements: needs!(
            Some(4),
            None,
            None,
            &[numeric(3, "x, y, z coordinates"), numeric(1, "bubble size")],
        ),
        archetype: Archetype::Bubble,
    },
    VisualizationModel {
        id: "scatter_animated",
        name: "Animated Cloud",
        description: "Points with temporal animation",
        category: "Point clouds",
        tags: &["animation", "time", "evolution"],
        complexity: Complexity::Medium,
        prompt: "Build a 3D scatter plot with animated visual effects and smooth transitions",
        requirements: needs!(
            Some(3),
            Some(1),
            None,
            &[numeric(3, "x, y, z coordinates"), temporal(1, "time sequence")],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "scatter_clustered",
        name: "Clustered Cloud",
        description: "Points colored by cluster",
        category: "Point clouds",
        tags: &["clusters", "groups", "classification"],
        complexity: Complexity::Medium,
        prompt: "Arrange my data into colored clusters in 3D space to reveal natural groups",
        requirements: needs!(
            Some(3),
            None,
            Some(1),
            &[numeric(3, "x, y, z coordinates"), categorical(1, "groups or categories")],
        ),
        archetype: Archetype::Bubble,
    },
    VisualizationModel {
        id: "scatter_density",
        name: "3D Density",
        description: "Point cloud with density zones",
        category: "Point clouds",
        tags: &["density", "concentration", "heatmap"],
        complexity: Complexity::Medium,
        prompt: "Show the density of my data with 3D concentration zones",
        requirements: needs!(Some(3), None, None, &[numeric(3, "x, y, z coordinates")]),
        archetype: Archetype::Density,
    },
    // Surfaces
    VisualizationModel {
        id: "surface3d",
        name: "3D Surface",
        description: "Continuous interpolated surface",
        category: "Surfaces",
        tags: &["surface", "continuous", "interpolation"],
        complexity: Complexity::Simple,
        prompt: "Turn my data into a smooth continuous 3D surface by interpolation",
        requirements: needs!(Some(3), None, None, &[numeric(3, "surface values")]),
        archetype: Archetype::Surface,
    },
    VisualizationModel {
        id: "surface_contour",
        name: "3D Contours",
        description: "Surface with level lines",
        category: "Surfaces",
        tags: &["contours", "levels", "topography"],
        complexity: Complexity::Medium,
        prompt: "Build a 3D surface with colored contours that show the different levels",
        requirements: needs!(Some(3), None, None, &[numeric(3, "surface and contour values")]),
        archetype: Archetype::Surface,
    },
    VisualizationModel {
        id: "surface_mesh",
        name: "3D Mesh",
        description: "Surface with a visible grid",
        category: "Surfaces",
        tags: &["mesh", "grid", "wireframe"],
        complexity: Complexity::Simple,
        prompt: "Generate a 3D surface with a visible mesh that shows its structure",
        requirements: needs!(Some(3), None, None, &[numeric(3, "x, y, z mesh coordinates")]),
        archetype: Archetype::Surface,
    },
    VisualizationModel {
        id: "surface_gradient",
        name: "3D Gradient",
        description: "Surface with color gradients",
        category: "Surfaces",
        tags: &["gradient", "shading", "colors"],
        complexity: Complexity::Medium,
        prompt: "Generate a 3D surface with color gradients that follow the values",
        requirements: needs!(
            Some(4),
            None,
            None,
            &[numeric(3, "x, y, z coordinates"), numeric(1, "color gradient value")],
        ),
        archetype: Archetype::Surface,
    },
    VisualizationModel {
        id: "surface_parametric",
        name: "Parametric Surface",
        description: "Surface driven by parameters",
        category: "Surfaces",
        tags: &["parameters", "mathematical", "function"],
        complexity: Complexity::Advanced,
        prompt: "Build a parametric 3D surface from my data",
        requirements: needs!(
            Some(4),
            None,
            None,
            &[numeric(3, "x, y, z coordinates"), numeric(1, "surface parameter")],
        ),
        archetype: Archetype::Scatter,
    },
    // Architecture
    VisualizationModel {
        id: "bars3d",
        name: "3D Bars",
        description: "Data architecture",
        category: "Architecture",
        tags: &["bars", "architecture", "volumes"],
        complexity: Complexity::Simple,
        prompt: "Build a 3D architecture with bars that stand like buildings for my data",
        requirements: Requirements::NONE,
        archetype: Archetype::Bubble,
    },
    VisualizationModel {
        id: "bars_grouped",
        name: "Grouped Bars",
        description: "Groups of 3D bars",
        category: "Architecture",
        tags: &["groups", "comparison", "categories"],
        complexity: Complexity::Medium,
        prompt: "Arrange my data as 3D bars grouped by category for easy comparison",
        requirements: needs!(
            Some(1),
            None,
            Some(2),
            &[numeric(1, "bar height"), categorical(2, "main categories and subgroups")],
        ),
        archetype: Archetype::Bubble,
    },
    VisualizationModel {
        id: "bars_simple",
        name: "Simple 3D Bars",
        description: "3D bar chart",
        category: "Architecture",
        tags: &["bars", "histogram", "comparison"],
        complexity: Complexity::Simple,
        prompt: "Build a 3D bar chart to compare my data",
        requirements: needs!(
            Some(1),
            None,
            Some(1),
            &[numeric(1, "bar height"), categorical(1, "categories")],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "bars_stacked",
        name: "Stacked Bars",
        description: "Stacked 3D bars",
        category: "Architecture",
        tags: &["bars", "stacked", "cumulative"],
        complexity: Complexity::Medium,
        prompt: "Stack my data as 3D bars to show how it is composed",
        requirements: needs!(
            Some(1),
            None,
            Some(2),
            &[numeric(1, "values to stack"), categorical(2, "categories and subcategories")],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "bars_cylindrical",
        name: "3D Cylinders",
        description: "Cylindrical bars",
        category: "Architecture",
        tags: &["cylinders", "tubes", "round"],
        complexity: Complexity::Medium,
        prompt: "Show my data as elegant volumetric 3D cylinders",
        requirements: needs!(
            Some(2),
            None,
            Some(1),
            &[
                numeric(1, "cylinder height"),
                numeric(1, "cylinder radius"),
                categorical(1, "categories"),
            ],
        ),
        archetype: Archetype::Bubble,
    },
    VisualizationModel {
        id: "bars_pyramid",
        name: "3D Pyramids",
        description: "Data shaped as pyramids",
        category: "Architecture",
        tags: &["pyramids", "triangular", "hierarchy"],
        complexity: Complexity::Medium,
        prompt: "Turn my data into 3D pyramids that form a visual hierarchy",
        requirements: Requirements::NONE,
        archetype: Archetype::Bubble,
    },
    // Geometric
    VisualizationModel {
        id: "sphere_pack",
        name: "Packed Spheres",
        description: "Spheres of variable size",
        category: "Geometric",
        tags: &["spheres", "packing", "bubbles"],
        complexity: Complexity::Medium,
        prompt: "Arrange my data as packed spheres of variable size in 3D space",
        requirements: Requirements::NONE,
        archetype: Archetype::Bubble,
    },
    VisualizationModel {
        id: "cube_matrix",
        name: "Cube Matrix",
        description: "Cubes arranged in a matrix",
        category: "Geometric",
        tags: &["cubes", "matrix", "grid"],
        complexity: Complexity::Simple,
        prompt: "Arrange my data in a structured geometric matrix of 3D cubes",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "cone_field",
        name: "Cone Field",
        description: "Cones oriented in space",
        category: "Geometric",
        tags: &["cones", "direction", "vectors"],
        complexity: Complexity::Medium,
        prompt: "Build a field of 3D cones oriented along the directions in my data",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "torus_data",
        name: "Data Torus",
        description: "Data on a toroidal surface",
        category: "Geometric",
        tags: &["torus", "donut", "circular"],
        complexity: Complexity::Advanced,
        prompt: "Project my data onto a 3D toroidal surface for a circular view",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "helix_spiral",
        name: "Helical Spiral",
        description: "Data in a 3D spiral",
        category: "Geometric",
        tags: &["spiral", "helix", "rotation"],
        complexity: Complexity::Medium,
        prompt: "Arrange my data in a rising helical spiral in 3D space",
        requirements: Requirements::NONE,
        archetype: Archetype::Helix,
    },
    // Networks
    VisualizationModel {
        id: "network_force",
        name: "Force Network",
        description: "Network with attraction forces",
        category: "Networks",
        tags: &["forces", "attraction", "dynamic"],
        complexity: Complexity::Advanced,
        prompt: "Generate a 3D network with attraction forces between nodes",
        requirements: needs!(
            Some(4),
            None,
            Some(2),
            &[
                numeric(3, "x, y, z node coordinates"),
                numeric(1, "attraction force"),
                categorical(2, "source and target node ids"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "network_hierarchical",
        name: "Hierarchical Network",
        description: "Network with a hierarchy",
        category: "Networks",
        tags: &["hierarchy", "organization", "structure"],
        complexity: Complexity::Advanced,
        prompt: "Arrange my data as a hierarchical 3D network that shows relationships",
        requirements: needs!(
            Some(3),
            None,
            Some(2),
            &[
                numeric(2, "x, y node coordinates"),
                numeric(1, "hierarchy level"),
                categorical(2, "source and target node ids"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "network_circular",
        name: "Circular Network",
        description: "Network laid out on a circle",
        category: "Networks",
        tags: &["circle", "circular", "organization"],
        complexity: Complexity::Medium,
        prompt: "Arrange my data as a circular 3D network that shows relationships",
        requirements: needs!(
            Some(2),
            None,
            Some(1),
            &[
                numeric(1, "node angle"),
                numeric(1, "node radius"),
                categorical(1, "node ids"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "network_3d",
        name: "3D Network",
        description: "Graph of nodes and links",
        category: "Networks",
        tags: &["network", "graph", "connections"],
        complexity: Complexity::Medium,
        prompt: "Turn my data into a 3D network with connected nodes and visible links",
        requirements: needs!(
            Some(3),
            None,
            Some(2),
            &[
                numeric(3, "x, y, z node coordinates"),
                categorical(2, "link source and target ids"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "network_dynamic",
        name: "Dynamic Network",
        description: "Animated network",
        category: "Networks",
        tags: &["animation", "motion", "evolution"],
        complexity: Complexity::Advanced,
        prompt: "Animate my 3D network to show how it evolves over time",
        requirements: needs!(
            Some(4),
            None,
            Some(2),
            &[
                numeric(3, "x, y, z node coordinates"),
                numeric(1, "time or sequence"),
                categorical(2, "link source and target ids"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "tree_3d",
        name: "3D Tree",
        description: "Tree structure",
        category: "Networks",
        tags: &["tree", "hierarchy", "branches"],
        complexity: Complexity::Medium,
        prompt: "Structure my data as a hierarchical 3D tree with branches and nodes",
        requirements: needs!(
            Some(1),
            None,
            Some(2),
            &[numeric(1, "hierarchy level"), categorical(2, "parent and child ids")],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "force_directed",
        name: "Force Directed",
        description: "Network with physics simulation",
        category: "Networks",
        tags: &["force", "physics", "simulation"],
        complexity: Complexity::Advanced,
        prompt: "Simulate my data with a force-directed layout for a natural 3D network",
        requirements: needs!(
            Some(2),
            None,
            Some(2),
            &[
                numeric(2, "force and distance between nodes"),
                categorical(2, "link source and target ids"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "chord_3d",
        name: "3D Chord Diagram",
        description: "Circular relationships in 3D",
        category: "Networks",
        tags: &["chord", "circular", "relationships"],
        complexity: Complexity::Advanced,
        prompt: "Build a circular 3D chord diagram showing relationships in my data",
        requirements: needs!(
            Some(1),
            None,
            Some(2),
            &[numeric(1, "relationship value"), categorical(2, "source and target categories")],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "sankey_3d",
        name: "3D Sankey",
        description: "Data flows in 3D",
        category: "Networks",
        tags: &["sankey", "flow", "transitions"],
        complexity: Complexity::Advanced,
        prompt: "Show my data as 3D Sankey flows with smooth transitions",
        requirements: needs!(
            Some(1),
            None,
            Some(3),
            &[
                numeric(1, "flow value"),
                categorical(2, "source and target categories"),
                categorical(1, "level or stage"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    // Temporal
    VisualizationModel {
        id: "timeline_3d",
        name: "3D Timeline",
        description: "Evolution over time in 3D",
        category: "Temporal",
        tags: &["time", "evolution", "chronology"],
        complexity: Complexity::Medium,
        prompt: "Lay my data out on a 3D timeline to show how it evolves",
        requirements: needs!(
            Some(1),
            Some(1),
            None,
            &[numeric(1, "value to plot"), temporal(1, "date or timestamp")],
        ),
        archetype: Archetype::Timeline,
    },
    VisualizationModel {
        id: "wave_temporal",
        name: "Time Waves",
        description: "Data as waves through time",
        category: "Temporal",
        tags: &["waves", "ripples", "periodic"],
        complexity: Complexity::Medium,
        prompt: "Turn my data into rippling time waves in 3D space",
        requirements: needs!(
            Some(2),
            Some(1),
            None,
            &[
                numeric(1, "wave amplitude"),
                numeric(1, "ripple frequency"),
                temporal(1, "time progression"),
            ],
        ),
        archetype: Archetype::Timeline,
    },
    VisualizationModel {
        id: "spiral_time",
        name: "Time Spiral",
        description: "Time as a rising spiral",
        category: "Temporal",
        tags: &["spiral", "time", "cyclic"],
        complexity: Complexity::Medium,
        prompt: "Wind my time series into a rising spiral that shows its cycles",
        requirements: needs!(
            Some(2),
            Some(1),
            Some(1),
            &[
                numeric(1, "spiral height"),
                numeric(1, "spiral radius"),
                temporal(1, "time progression"),
                categorical(1, "cycle grouping"),
            ],
        ),
        archetype: Archetype::Timeline,
    },
    VisualizationModel {
        id: "ribbon_time",
        name: "Time Ribbon",
        description: "Evolution as a 3D ribbon",
        category: "Temporal",
        tags: &["ribbon", "flow", "continuous"],
        complexity: Complexity::Advanced,
        prompt: "Unroll my data as a flowing time ribbon in 3D space",
        requirements: needs!(
            Some(3),
            Some(1),
            None,
            &[
                numeric(1, "ribbon height"),
                numeric(1, "ribbon width"),
                numeric(1, "ribbon twist"),
                temporal(1, "time progression"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "cascade_time",
        name: "Time Cascade",
        description: "Data as a time cascade",
        category: "Temporal",
        tags: &["cascade", "fall", "sequential"],
        complexity: Complexity::Medium,
        prompt: "Arrange my data as a descending sequential time cascade",
        requirements: needs!(
            Some(2),
            Some(1),
            None,
            &[
                numeric(1, "cascade height"),
                numeric(1, "fall speed"),
                temporal(1, "time sequence"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    // Statistics
    VisualizationModel {
        id: "box_plot_3d",
        name: "3D Box Plot",
        description: "Box and whiskers in 3D",
        category: "Statistics",
        tags: &["boxplot", "quartiles", "distribution"],
        complexity: Complexity::Medium,
        prompt: "Show my data with 3D box plots for statistical analysis",
        requirements: needs!(
            Some(1),
            None,
            Some(1),
            &[numeric(1, "distribution values"), categorical(1, "groups to compare")],
        ),
        archetype: Archetype::Bubble,
    },
    VisualizationModel {
        id: "violin_3d",
        name: "3D Violin Plot",
        description: "Violin-shaped distributions",
        category: "Statistics",
        tags: &["violin", "distribution", "density"],
        complexity: Complexity::Advanced,
        prompt: "Build 3D violin plots that show the distribution and density of my data",
        requirements: needs!(
            Some(2),
            None,
            Some(1),
            &[
                numeric(1, "distribution values"),
                numeric(1, "distribution density"),
                categorical(1, "groups to compare"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "histogram_3d",
        name: "3D Histogram",
        description: "Histogram with depth",
        category: "Statistics",
        tags: &["histogram", "frequency", "distribution"],
        complexity: Complexity::Simple,
        prompt: "Generate a 3D histogram with depth to analyse the distribution",
        requirements: needs!(
            Some(2),
            None,
            Some(1),
            &[
                numeric(1, "bar values"),
                numeric(1, "bar height"),
                categorical(1, "grouping categories"),
            ],
        ),
        archetype: Archetype::Bubble,
    },
    VisualizationModel {
        id: "regression_3d",
        name: "3D Regression",
        description: "Regression plane in 3D",
        category: "Statistics",
        tags: &["regression", "trend", "prediction"],
        complexity: Complexity::Advanced,
        prompt: "Fit and show a 3D regression plane to predict trends",
        requirements: needs!(
            Some(3),
            None,
            None,
            &[
                numeric(1, "dependent variable (y)"),
                numeric(2, "independent variables (x1, x2)"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "confidence_3d",
        name: "3D Intervals",
        description: "Confidence intervals in 3D",
        category: "Statistics",
        tags: &["confidence", "intervals", "uncertainty"],
        complexity: Complexity::Advanced,
        prompt: "Show the confidence intervals of my data in 3D space",
        requirements: needs!(
            Some(4),
            None,
            None,
            &[
                numeric(1, "mean values"),
                numeric(1, "lower bounds"),
                numeric(1, "upper bounds"),
                numeric(1, "confidence level"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    // Artistic
    VisualizationModel {
        id: "mandala_3d",
        name: "3D Mandala",
        description: "Hypnotic circular patterns",
        category: "Artistic",
        tags: &["mandala", "circular", "hypnotic"],
        complexity: Complexity::Medium,
        prompt: "Turn my data into a hypnotic 3D mandala with sacred circular patterns",
        requirements: needs!(
            Some(3),
            None,
            None,
            &[
                numeric(1, "circle radius"),
                numeric(1, "pattern rotation"),
                numeric(1, "pattern intensity"),
            ],
        ),
        archetype: Archetype::Mandala,
    },
    VisualizationModel {
        id: "fractal_3d",
        name: "3D Fractal",
        description: "Complex fractal structures",
        category: "Artistic",
        tags: &["fractal", "complex", "recursive"],
        complexity: Complexity::Advanced,
        prompt: "Generate a complex recursive 3D fractal structure from my data",
        requirements: needs!(
            Some(4),
            None,
            None,
            &[
                numeric(1, "recursion depth"),
                numeric(1, "scale factor"),
                numeric(1, "rotation angle"),
                numeric(1, "pattern complexity"),
            ],
        ),
        archetype: Archetype::Mandala,
    },
    VisualizationModel {
        id: "crystal_3d",
        name: "3D Crystal",
        description: "Crystalline structure",
        category: "Artistic",
        tags: &["crystal", "geometric", "symmetry"],
        complexity: Complexity::Medium,
        prompt: "Build a symmetric geometric 3D crystal structure from my data",
        requirements: needs!(
            Some(3),
            None,
            None,
            &[
                numeric(1, "face size"),
                numeric(1, "face angle"),
                numeric(1, "transparency"),
            ],
        ),
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "galaxy_3d",
        name: "3D Galaxy",
        description: "Data shaped as a galaxy",
        category: "Artistic",
        tags: &["galaxy", "cosmic", "spiral"],
        complexity: Complexity::Medium,
        prompt: "Arrange my data as a cosmic spiral galaxy in endless 3D space",
        requirements: needs!(
            Some(4),
            None,
            None,
            &[
                numeric(1, "distance from center"),
                numeric(1, "rotation angle"),
                numeric(1, "brightness"),
                numeric(1, "star size"),
            ],
        ),
        archetype: Archetype::Galaxy,
    },
    VisualizationModel {
        id: "dna_helix",
        name: "DNA Helix",
        description: "Double helix of data",
        category: "Artistic",
        tags: &["dna", "helix", "biological"],
        complexity: Complexity::Advanced,
        prompt: "Structure my data as a DNA double helix for a biological view",
        requirements: Requirements::NONE,
        archetype: Archetype::Helix,
    },
    // Geographic
    VisualizationModel {
        id: "globe_3d",
        name: "3D Globe",
        description: "Data on the globe",
        category: "Geographic",
        tags: &["globe", "earth", "geographic"],
        complexity: Complexity::Medium,
        prompt: "Project my data onto an interactive geographic 3D globe",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "terrain_3d",
        name: "3D Terrain",
        description: "Topographic relief",
        category: "Geographic",
        tags: &["terrain", "relief", "topography"],
        complexity: Complexity::Medium,
        prompt: "Turn my data into 3D topographic relief with natural elevations",
        requirements: Requirements::NONE,
        archetype: Archetype::Surface,
    },
    VisualizationModel {
        id: "map_extrusion",
        name: "Extruded Map",
        description: "Map with heights",
        category: "Geographic",
        tags: &["map", "extrusion", "height"],
        complexity: Complexity::Medium,
        prompt: "Extrude my data on a 3D map with proportional heights",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "flight_paths",
        name: "3D Trajectories",
        description: "Paths and trajectories",
        category: "Geographic",
        tags: &["trajectories", "paths", "routes"],
        complexity: Complexity::Medium,
        prompt: "Trace 3D flight paths that connect my data points",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "heatmap_globe",
        name: "Globe Heatmap",
        description: "Heat map on a globe",
        category: "Geographic",
        tags: &["heatmap", "heat", "intensity"],
        complexity: Complexity::Advanced,
        prompt: "Build a thermal heatmap on a 3D globe to show the intensity of my data",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    // Scientific
    VisualizationModel {
        id: "molecule_3d",
        name: "3D Molecule",
        description: "Molecular structure",
        category: "Scientific",
        tags: &["molecule", "atoms", "chemistry"],
        complexity: Complexity::Advanced,
        prompt: "Model my data as a 3D molecular structure with atomic bonds",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "vector_field",
        name: "Vector Field",
        description: "3D vector field",
        category: "Scientific",
        tags: &["vectors", "field", "direction"],
        complexity: Complexity::Advanced,
        prompt: "Generate a 3D vector field showing the directions and forces in my data",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "particle_system",
        name: "Particle System",
        description: "Particle simulation",
        category: "Scientific",
        tags: &["particles", "simulation", "physics"],
        complexity: Complexity::Advanced,
        prompt: "Simulate my data as a 3D particle system with realistic physics",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "fluid_flow",
        name: "Fluid Flow",
        description: "Fluid flow",
        category: "Scientific",
        tags: &["fluid", "flow", "dynamics"],
        complexity: Complexity::Advanced,
        prompt: "Show my data as a 3D fluid flow with fluid dynamics",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
    VisualizationModel {
        id: "electromagnetic",
        name: "EM Field",
        description: "Electromagnetic field",
        category: "Scientific",
        tags: &["electromagnetic", "waves", "physics"],
        complexity: Complexity::Advanced,
        prompt: "Show my data as a 3D electromagnetic field with waves and forces",
        requirements: Requirements::NONE,
        archetype: Archetype::Scatter,
    },
];

/// Look a model up by id
pub fn find_model(id: &str) -> Option<&'static VisualizationModel> {
    MODELS.iter().find(|m| m.id == id)
}

/// Archetype a model id renders with; unknown ids use classic scatter
pub fn archetype_for(id: &str) -> Archetype {
    find_model(id).map(|m| m.archetype).unwrap_or(Archetype::Scatter)
}

/// Check a model's declared requirements against the dataset's type counts.
///
/// `specific` entries are checked one by one against the full count for their
/// type, so the same columns may satisfy several entries.
pub fn is_compatible(model: &VisualizationModel, profile: &DatasetProfile) -> bool {
    let counts = profile.counts();
    let req = &model.requirements;

    let minimums = [
        (req.min_numeric, counts.numeric),
        (req.min_temporal, counts.temporal),
        (req.min_categorical, counts.categorical),
    ];
    if minimums
        .iter()
        .any(|(min, have)| min.map_or(false, |min| min > *have))
    {
        return false;
    }

    req.specific
        .iter()
        .all(|entry| entry.count <= counts.get(entry.column_type))
}

/// Catalogue entries usable with this dataset, in catalogue order
pub fn compatible_models(profile: &DatasetProfile) -> Vec<&'static VisualizationModel> {
    MODELS.iter().filter(|m| is_compatible(m, profile)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use std::collections::HashSet;

    fn numeric_profile(columns: usize) -> DatasetProfile {
        let names = (0..columns).map(|i| format!("c{i}")).collect();
        let rows = (0..3)
            .map(|r| (0..columns).map(|c| format!("{}", r * 10 + c)).collect())
            .collect();
        DatasetProfile::from_dataset(&Dataset::new(names, rows))
    }

    fn model_with(requirements: Requirements) -> VisualizationModel {
        VisualizationModel { requirements, ..MODELS[0] }
    }

    #[test]
    fn test_catalogue_size_and_unique_ids() {
        assert_eq!(MODELS.len(), 55);
        let ids: HashSet<&str> = MODELS.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), MODELS.len());
    }

    #[test]
    fn test_min_numeric_gate() {
        let model = model_with(needs!(Some(3), None, None, &[]));
        assert!(!is_compatible(&model, &numeric_profile(2)));
        assert!(is_compatible(&model, &numeric_profile(3)));
    }

    #[test]
    fn test_specific_entries_not_consumed() {
        // Two entries of 2 numeric columns each pass with only 2 columns
        const PAIR: &[ColumnRequirement] = &[numeric(2, "a"), numeric(2, "b")];
        const TRIPLE: &[ColumnRequirement] = &[numeric(3, "a")];

        let model = model_with(needs!(None, None, None, PAIR));
        assert!(is_compatible(&model, &numeric_profile(2)));

        let model = model_with(needs!(None, None, None, TRIPLE));
        assert!(!is_compatible(&model, &numeric_profile(2)));
    }

    #[test]
    fn test_no_requirements_always_compatible() {
        let model = model_with(Requirements::NONE);
        assert!(is_compatible(&model, &DatasetProfile::default()));
    }

    #[test]
    fn test_temporal_and_categorical_minimums() {
        let data = Dataset::new(
            vec!["day".into(), "value".into()],
            vec![
                vec!["2024-01-01".into(), "1".into()],
                vec!["2024-01-02".into(), "2".into()],
            ],
        );
        let profile = DatasetProfile::from_dataset(&data);
        let timeline = find_model("timeline_3d").unwrap();
        assert!(is_compatible(timeline, &profile));
        let spiral = find_model("spiral_time").unwrap();
        assert!(!is_compatible(spiral, &profile));
    }

    #[test]
    fn test_compatible_models_filters() {
        let ids: Vec<&str> = compatible_models(&numeric_profile(3))
            .iter()
            .map(|m| m.id)
            .collect();
        assert!(ids.contains(&"scatter3d"));
        assert!(ids.contains(&"dna_helix"));
        assert!(!ids.contains(&"scatter_bubble"));
        assert!(!ids.contains(&"timeline_3d"));
    }

    #[test]
    fn test_archetype_lookup() {
        assert_eq!(archetype_for("mandala_3d"), Archetype::Mandala);
        assert_eq!(archetype_for("scatter_density"), Archetype::Density);
        assert_eq!(archetype_for("terrain_3d"), Archetype::Surface);
        assert_eq!(archetype_for("no_such_model"), Archetype::Scatter);
    }
}
