// Time-bounded calls to an external assistant, with local fallbacks

use crate::catalog::{find_model, is_compatible};
use crate::classify::DatasetProfile;
use crate::data::Dataset;
use crate::fallback::build_fallback;
use crate::ir::VisualizationConfig;
use crate::AssistantOptions;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Rows sent along with an analysis request
const ANALYSIS_SAMPLE_ROWS: usize = 5;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Extra wait past the budget so a service can report its own timeout
const KILL_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub data: Vec<Map<String, Value>>,
    pub columns: Vec<String>,
    pub user_request: String,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(data: &Dataset, model_id: &str) -> Self {
        let prompt = match find_model(model_id) {
            Some(model) => model.prompt.to_string(),
            None => format!("Generate a 3D visualization of type {model_id}"),
        };
        Self {
            data: data.to_records(),
            columns: data.columns.clone(),
            user_request: model_id.to_string(),
            prompt,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub data: Vec<Map<String, Value>>,
    pub columns: Vec<String>,
    pub local: DataSummary,
}

/// Envelope written to an external assistant program
#[derive(Serialize)]
#[serde(tag = "task", rename_all = "lowercase")]
enum Envelope<'a> {
    Visualization(&'a GenerationRequest),
    Analysis(&'a AnalysisRequest),
}

/// Something that answers visualization and analysis requests with raw text
pub trait AssistantService: Send + Sync {
    fn generate_visualization(&self, request: &GenerationRequest) -> Result<String>;
    fn analyze(&self, request: &AnalysisRequest) -> Result<String>;
}

/// Runs an external program per request: JSON on stdin, response on stdout.
///
/// A program still running when `timeout` expires is killed.
#[derive(Debug, Clone)]
pub struct CommandService {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

/// Read a pipe to the end on its own thread
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

impl CommandService {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run(&self, envelope: &Envelope) -> Result<String> {
        let body = serde_json::to_vec(envelope).context("Failed to encode assistant request")?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start assistant '{}'", self.program))?;

        // Dropping stdin closes the pipe so the program sees EOF
        let stdin = child.stdin.take();
        let writer = thread::spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&body)?;
            }
            Ok(())
        });
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(program = %self.program, "assistant overran its budget and was killed");
                    return Err(AssistantFailure::Timeout(self.timeout.as_secs()).into());
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(e).context("Failed to wait for assistant");
                }
            }
        };

        if let Ok(Err(e)) = writer.join() {
            debug!(error = %e, "assistant did not read the whole request");
        }
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            bail!(
                "assistant exited with {}: {}",
                status,
                String::from_utf8_lossy(&stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

impl AssistantService for CommandService {
    fn generate_visualization(&self, request: &GenerationRequest) -> Result<String> {
        self.run(&Envelope::Visualization(request))
    }

    fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        self.run(&Envelope::Analysis(request))
    }
}

/// Why the local fallback was used instead of the assistant's answer
#[derive(Debug, Error)]
pub enum AssistantFailure {
    #[error("no assistant configured")]
    Unavailable,
    #[error("assistant did not answer within {0}s")]
    Timeout(u64),
    #[error("assistant call failed: {0}")]
    Transport(String),
    #[error("assistant response could not be parsed ({reason}); response began with: {excerpt}")]
    Unparsable { reason: String, excerpt: String },
}

/// Run one call on a helper thread and give up after the budget.
///
/// Services that own a process enforce the budget themselves and kill it;
/// any other call still running after the grace period is abandoned.
fn call_with_timeout<F>(
    service: Arc<dyn AssistantService>,
    timeout_secs: u64,
    call: F,
) -> Result<String, AssistantFailure>
where
    F: FnOnce(&dyn AssistantService) -> Result<String> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(call(service.as_ref()));
    });

    match rx.recv_timeout(Duration::from_secs(timeout_secs) + KILL_GRACE) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(match e.downcast::<AssistantFailure>() {
            Ok(failure) => failure,
            Err(e) => AssistantFailure::Transport(format!("{e:#}")),
        }),
        Err(RecvTimeoutError::Timeout) => Err(AssistantFailure::Timeout(timeout_secs)),
        Err(RecvTimeoutError::Disconnected) => Err(AssistantFailure::Transport(
            "assistant worker stopped without answering".to_string(),
        )),
    }
}

/// First `max_chars` characters of a trimmed response
pub fn excerpt(raw: &str, max_chars: usize) -> String {
    raw.trim().chars().take(max_chars).collect()
}

/// Locate the JSON object inside a response.
///
/// Prefers the body of the first fenced code block; otherwise takes the span
/// from the first `{` to the last `}`.
pub fn extract_json(raw: &str) -> &str {
    if let Some(start) = raw.find("```") {
        let after = &raw[start + 3..];
        // Skip an info string such as `json`
        let body_start = after.find('\n').map_or(0, |i| i + 1);
        let body = &after[body_start..];
        let body = match body.find("```") {
            Some(end) => &body[..end],
            None => body,
        };
        return body.trim();
    }

    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw.trim(),
    }
}

/// Reject configurations the plotting side cannot draw
fn validate_config(config: &VisualizationConfig) -> Result<()> {
    if !config.config.layout.is_object() {
        bail!("layout is not an object");
    }
    if config.config.data.is_empty() {
        bail!("configuration has no traces");
    }
    for (i, trace) in config.config.data.iter().enumerate() {
        if trace.get("type").and_then(Value::as_str).is_none() {
            bail!("trace {i} is not an object with a string type");
        }
    }
    Ok(())
}

/// Parse and validate an assistant's visualization response
pub fn parse_generation_response(raw: &str) -> Result<VisualizationConfig> {
    let json = extract_json(raw);
    let config: VisualizationConfig =
        serde_json::from_str(json).context("response is not a visualization configuration")?;
    validate_config(&config)?;
    Ok(config)
}

/// Ask the assistant for a configuration, or build the local fallback.
///
/// At most one attempt is made. When the fallback is used its description
/// records the reason.
pub fn request_visualization(
    service: Option<Arc<dyn AssistantService>>,
    data: &Dataset,
    model_id: &str,
    options: &AssistantOptions,
) -> VisualizationConfig {
    let failure = match service {
        None => AssistantFailure::Unavailable,
        Some(service) => {
            let request = GenerationRequest::new(data, model_id);
            debug!(model_id, rows = data.row_count(), "requesting visualization from assistant");
            match call_with_timeout(service, options.timeout_secs, move |s| {
                s.generate_visualization(&request)
            }) {
                Ok(raw) => match parse_generation_response(&raw) {
                    Ok(config) => return config,
                    Err(e) => AssistantFailure::Unparsable {
                        reason: format!("{e:#}"),
                        excerpt: excerpt(&raw, options.excerpt_chars),
                    },
                },
                Err(failure) => failure,
            }
        }
    };

    match failure {
        AssistantFailure::Unavailable => debug!(model_id, "no assistant, using fallback"),
        ref other => warn!(model_id, reason = %other, "assistant failed, using fallback"),
    }

    let mut config = build_fallback(model_id, data);
    config.description = format!("{} (local fallback: {})", config.description, failure);
    config
}

// =============================================================================
// Dataset analysis
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Numerical,
    Categorical,
    Temporal,
    Mixed,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::Numerical => "numerical",
            DataKind::Categorical => "categorical",
            DataKind::Temporal => "temporal",
            DataKind::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

/// Overview of a dataset for the user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    pub data_type: DataKind,
    pub recommended_model: String,
    pub insights: Vec<String>,
    pub summary: String,
    pub key_columns: Vec<String>,
}

/// Fields an assistant may contribute; anything missing keeps the local value
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnalysisPatch {
    insights: Option<Vec<String>>,
    summary: Option<String>,
    key_columns: Option<Vec<String>>,
}

fn join_or_none(columns: &[&str]) -> String {
    if columns.is_empty() {
        "none".to_string()
    } else {
        columns.join(", ")
    }
}

impl DataSummary {
    /// Summary computed from the column profile alone
    pub fn local(data: &Dataset, profile: &DatasetProfile) -> Self {
        let numeric = profile.numeric_columns();
        let categorical = profile.categorical_columns();
        let temporal = profile.temporal_columns();

        let data_type = if numeric.len() > categorical.len() {
            DataKind::Numerical
        } else if categorical.len() > numeric.len() {
            DataKind::Categorical
        } else if !temporal.is_empty() {
            DataKind::Temporal
        } else {
            DataKind::Mixed
        };

        // Preferred models per kind; each list ends with a model that has no requirements
        let preferences: &[&str] = match data_type {
            DataKind::Numerical => &["scatter3d", "surface3d", "helix_spiral"],
            DataKind::Temporal => &["timeline_3d", "wave_temporal", "helix_spiral"],
            DataKind::Categorical => &["bars_simple", "box_plot_3d", "bars3d"],
            DataKind::Mixed => &["scatter_clustered", "bars3d"],
        };
        let recommended_model = preferences
            .iter()
            .filter_map(|id| find_model(id))
            .find(|model| is_compatible(model, profile))
            .map_or("scatter3d", |model| model.id)
            .to_string();

        let rows = data.row_count();
        let columns = data.columns.len();
        let insights = vec![
            format!("The dataset has {rows} rows across {columns} columns"),
            format!("Dominant data type: {data_type}"),
            format!("Numeric columns: {}", join_or_none(&numeric)),
            format!("Categorical columns: {}", join_or_none(&categorical)),
            format!("Temporal columns: {}", join_or_none(&temporal)),
            format!("Recommended model: {recommended_model}"),
        ];

        let key_columns = numeric
            .iter()
            .take(2)
            .chain(categorical.iter().take(1))
            .map(|c| c.to_string())
            .collect();

        Self {
            data_type,
            recommended_model,
            insights,
            summary: format!("Automatic analysis of {rows} rows with {columns} columns of {data_type} data"),
            key_columns,
        }
    }

    fn merge(mut self, patch: AnalysisPatch) -> Self {
        if let Some(insights) = patch.insights {
            self.insights = insights;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(key_columns) = patch.key_columns {
            self.key_columns = key_columns;
        }
        self
    }
}

/// Local summary, refined by the assistant when one answers in time
pub fn request_analysis(
    service: Option<Arc<dyn AssistantService>>,
    data: &Dataset,
    profile: &DatasetProfile,
    options: &AssistantOptions,
) -> DataSummary {
    let local = DataSummary::local(data, profile);
    let Some(service) = service else {
        return local;
    };

    let mut records = data.to_records();
    records.truncate(ANALYSIS_SAMPLE_ROWS);
    let request = AnalysisRequest {
        data: records,
        columns: data.columns.clone(),
        local: local.clone(),
    };

    let raw = match call_with_timeout(service, options.timeout_secs, move |s| s.analyze(&request)) {
        Ok(raw) => raw,
        Err(failure) => {
            warn!(reason = %failure, "assistant analysis failed, keeping local summary");
            return local;
        }
    };

    match serde_json::from_str::<AnalysisPatch>(extract_json(&raw)) {
        Ok(patch) => local.merge(patch),
        Err(e) => {
            warn!(error = %e, excerpt = %excerpt(&raw, options.excerpt_chars), "unparsable analysis response");
            local
        }
    }
}
