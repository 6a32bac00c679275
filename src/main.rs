use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use eidos::assistant::{request_analysis, request_visualization, AssistantService, CommandService};
use eidos::catalog::{compatible_models, is_compatible, VisualizationModel, MODELS};
use eidos::classify::DatasetProfile;
use eidos::csv_reader;
use eidos::data::Dataset;
use eidos::fallback::build_fallback;
use eidos::graph::render_preview;
use eidos::parser::parse_mapping;
use eidos::runtime::visualize;
use eidos::{AssistantOptions, Options, OutputFormat};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "eidos")]
#[command(about = "Turn CSV data into 3D visualization configurations", long_about = None)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
struct Args {
    /// CSV file to read; stdin when absent
    input: Option<PathBuf>,

    /// Visualization model id from the catalogue
    #[arg(short, long, default_value = "scatter3d")]
    model: String,

    /// Mapping override, e.g. 'x: price, y: "unit cost", color: index'
    #[arg(long = "map", value_name = "EXPR")]
    mapping: Option<String>,

    /// Read the input as a JSON array of row objects instead of CSV
    #[arg(long)]
    json: bool,

    /// Print the local fallback configuration for the model
    #[arg(long, group = "mode")]
    fallback: bool,

    /// External assistant program asked for the configuration
    #[arg(long, value_name = "PROGRAM")]
    assistant: Option<String>,

    /// Argument passed to the assistant program (repeatable)
    #[arg(long = "assistant-arg", value_name = "ARG", allow_hyphen_values = true, requires = "assistant")]
    assistant_args: Vec<String>,

    /// List the model catalogue with compatibility for this dataset
    #[arg(long, group = "mode")]
    list_models: bool,

    /// Print the column profile and default mapping
    #[arg(long, group = "mode")]
    profile: bool,

    /// Print a summary of the dataset
    #[arg(long, group = "mode")]
    analyze: bool,

    /// Also write a PNG or SVG preview of the generated geometry
    #[arg(long, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// JSON file with render and assistant settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct CatalogEntry<'a> {
    #[serde(flatten)]
    model: &'a VisualizationModel,
    compatible: bool,
}

fn read_json_dataset(input: Option<&Path>) -> Result<Dataset> {
    let value: serde_json::Value = match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            serde_json::from_reader(io::BufReader::new(file))
        }
        None => serde_json::from_reader(io::stdin().lock()),
    }
    .context("Failed to parse JSON input")?;

    let dataset = Dataset::from_json(&value)?;
    if dataset.is_empty() || dataset.columns.is_empty() {
        anyhow::bail!("the JSON input has no rows");
    }
    Ok(dataset)
}

fn read_dataset(input: Option<&Path>) -> Result<Dataset> {
    let dataset = match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            csv_reader::read_csv(file)
        }
        None => csv_reader::read_csv_from_stdin(),
    };
    dataset.context("Failed to read CSV data")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value).context("Failed to write JSON")?;
    writeln!(handle).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn write_preview(
    path: &Path,
    data: &Dataset,
    model: &str,
    mapping: Option<&str>,
    options: &Options,
) -> Result<()> {
    let overrides = mapping.map(parse_mapping).transpose()?;
    let result = visualize(data, model, overrides.as_ref())?;

    let mut render = options.render.clone();
    if path.extension().and_then(|e| e.to_str()) == Some("svg") {
        render.format = OutputFormat::Svg;
    }
    let bytes = render_preview(&result.geometry, &render).context("Failed to render preview")?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write preview to {}", path.display()))?;
    debug!(path = %path.display(), "preview written");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let options = match &args.config {
        Some(path) => Options::from_file(path)?,
        None => Options::default(),
    };

    let data = if args.json {
        read_json_dataset(args.input.as_deref())?
    } else {
        read_dataset(args.input.as_deref())?
    };

    if args.list_models {
        let profile = DatasetProfile::from_dataset(&data);
        let entries: Vec<_> = MODELS
            .iter()
            .map(|model| CatalogEntry {
                model,
                compatible: is_compatible(model, &profile),
            })
            .collect();
        print_json(&entries)?;
    } else if args.profile {
        let profile = DatasetProfile::from_dataset(&data);
        let overrides = args.mapping.as_deref().map(parse_mapping).transpose()?;
        let mapping = match &overrides {
            Some(overrides) => eidos::resolve::resolve_mapping_with(&profile, overrides)?,
            None => eidos::resolve::resolve_mapping(&profile),
        };
        let compatible: Vec<&str> = compatible_models(&profile).iter().map(|m| m.id).collect();
        print_json(&serde_json::json!({
            "columns": profile.columns,
            "counts": profile.counts(),
            "mapping": mapping,
            "compatibleModels": compatible,
        }))?;
    } else if args.analyze {
        let profile = DatasetProfile::from_dataset(&data);
        let service = args.assistant_service(&options.assistant);
        print_json(&request_analysis(service, &data, &profile, &options.assistant))?;
    } else if args.fallback {
        print_json(&build_fallback(&args.model, &data))?;
    } else if args.assistant.is_some() {
        let service = args.assistant_service(&options.assistant);
        print_json(&request_visualization(service, &data, &args.model, &options.assistant))?;
    } else {
        let overrides = args.mapping.as_deref().map(parse_mapping).transpose()?;
        let result = visualize(&data, &args.model, overrides.as_ref())?;
        print_json(&result.geometry)?;
    }

    if let Some(path) = &args.preview {
        write_preview(path, &data, &args.model, args.mapping.as_deref(), &options)?;
    }

    Ok(())
}

impl Args {
    fn assistant_service(&self, options: &AssistantOptions) -> Option<Arc<dyn AssistantService>> {
        self.assistant.as_ref().map(|program| {
            let service = CommandService::new(program.clone(), self.assistant_args.clone())
                .with_timeout(Duration::from_secs(options.timeout_secs));
            Arc::new(service) as Arc<dyn AssistantService>
        })
    }
}
