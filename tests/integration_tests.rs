use serde_json::Value;
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Run eidos with arguments and CSV on stdin; stdout on success, stderr otherwise
fn run_eidos(args: &[&str], csv_content: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_eidos"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(csv_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn run_json(args: &[&str], fixture: &str) -> Value {
    let csv = fs::read_to_string(fixture).expect("Failed to read test CSV");
    let stdout = run_eidos(args, &csv).unwrap_or_else(|e| panic!("eidos failed: {e}"));
    serde_json::from_slice(&stdout).expect("Output is not JSON")
}

fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

#[test]
fn test_default_scatter() {
    let output = run_json(&[], "test/scatter.csv");
    assert_eq!(output["data"][0]["type"], "scatter3d");
    assert_eq!(output["data"][0]["x"].as_array().unwrap().len(), 10);
    assert_eq!(output["layout"]["title"]["text"], "Classic 3D Scatter");
    assert_eq!(output["layout"]["scene"]["xaxis"]["title"]["text"], "height (numeric)");
}

#[test]
fn test_input_file_argument() {
    let stdout = run_eidos(&["test/scatter.csv", "-m", "scatter_bubble"], "").unwrap();
    let output: Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(output["layout"]["title"]["text"], "3D Bubbles - Proportional Sizes");
    assert_eq!(output["data"][0]["x"].as_array().unwrap().len(), 10);
}

#[test]
fn test_mapping_override() {
    let output = run_json(&["--map", "x: age, y: index"], "test/scatter.csv");
    assert_eq!(output["layout"]["scene"]["xaxis"]["title"]["text"], "age (numeric)");
    assert_eq!(output["layout"]["scene"]["yaxis"]["title"]["text"], "index");
}

#[test]
fn test_mapping_override_unknown_column() {
    let csv = fs::read_to_string("test/scatter.csv").unwrap();
    let err = run_eidos(&["--map", "x: shoe_size"], &csv).unwrap_err();
    assert!(err.contains("shoe_size"), "unexpected error: {err}");
}

#[test]
fn test_mapping_override_syntax_error() {
    let csv = fs::read_to_string("test/scatter.csv").unwrap();
    assert!(run_eidos(&["--map", "x = age"], &csv).is_err());
}

#[test]
fn test_timeline() {
    let output = run_json(&["-m", "timeline_3d"], "test/timeseries.csv");
    assert_eq!(output["layout"]["title"]["text"], "3D Timeline - Evolution Over Time");
    assert_eq!(output["data"][0]["mode"], "markers+lines");
}

#[test]
fn test_helix_has_two_strands() {
    let output = run_json(&["-m", "dna_helix"], "test/scatter.csv");
    assert_eq!(output["data"].as_array().unwrap().len(), 2);
}

#[test]
fn test_categorical_only_dataset() {
    let output = run_json(&[], "test/categories.csv");
    assert_eq!(output["data"][0]["type"], "scatter3d");
    assert_eq!(output["layout"]["scene"]["zaxis"]["title"]["text"], "count");
}

#[test]
fn test_list_models() {
    let output = run_json(&["--list-models"], "test/scatter.csv");
    let models = output.as_array().unwrap();
    assert_eq!(models.len(), 55);
    let scatter = models.iter().find(|m| m["id"] == "scatter3d").unwrap();
    assert_eq!(scatter["compatible"], true);
    let timeline = models.iter().find(|m| m["id"] == "timeline_3d").unwrap();
    assert_eq!(timeline["compatible"], false);
}

#[test]
fn test_profile() {
    let output = run_json(&["--profile"], "test/timeseries.csv");
    assert_eq!(output["counts"]["temporal"], 1);
    assert_eq!(output["counts"]["numeric"], 2);
    assert_eq!(output["mapping"]["xAxis"], "temperature");
    assert_eq!(output["mapping"]["zAxis"], "date");
    let compatible = output["compatibleModels"].as_array().unwrap();
    assert!(compatible.iter().any(|id| id == "timeline_3d"));
}

#[test]
fn test_profile_mixed_column() {
    let output = run_json(&["--profile"], "test/mixed_types.csv");
    let columns = output["columns"].as_array().unwrap();
    let label = columns.iter().find(|c| c["name"] == "label").unwrap();
    assert_eq!(label["classification"]["type"], "categorical");
}

#[test]
fn test_fallback() {
    let output = run_json(&["--fallback", "-m", "surface3d"], "test/scatter.csv");
    assert_eq!(output["type"], "surface3d");
    assert_eq!(output["title"], "3D Data Surface");
    assert!(output["config"]["data"].is_array());
}

#[test]
fn test_analyze_without_assistant() {
    let output = run_json(&["--analyze"], "test/categories.csv");
    assert_eq!(output["dataType"], "categorical");
    assert_eq!(output["keyColumns"][0], "region");
}

#[cfg(unix)]
#[test]
fn test_assistant_garbage_falls_back() {
    let output = run_json(
        &[
            "--assistant",
            "sh",
            "--assistant-arg",
            "-c",
            "--assistant-arg",
            "cat > /dev/null; echo sorry, no chart today",
        ],
        "test/scatter.csv",
    );
    assert_eq!(output["type"], "scatter3d");
    assert_eq!(output["title"], "3D Data Constellation");
    assert!(output["description"].as_str().unwrap().contains("sorry, no chart today"));
}

#[cfg(unix)]
#[test]
fn test_assistant_success() {
    let reply = r#"cat > /dev/null; printf '```json\n{"type":"mesh3d","config":{"data":[{"type":"mesh3d"}],"layout":{}},"title":"From assistant"}\n```\n'"#;
    let output = run_json(
        &["--assistant", "sh", "--assistant-arg", "-c", "--assistant-arg", reply],
        "test/scatter.csv",
    );
    assert_eq!(output["type"], "mesh3d");
    assert_eq!(output["title"], "From assistant");
}

#[test]
fn test_preview_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preview.png");
    let csv = fs::read_to_string("test/scatter.csv").unwrap();
    run_eidos(&["--preview", path.to_str().unwrap()], &csv).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert!(is_valid_png(&bytes), "Preview is not a valid PNG");
}

#[test]
fn test_preview_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preview.svg");
    let csv = fs::read_to_string("test/timeseries.csv").unwrap();
    run_eidos(&["-m", "surface3d", "--preview", path.to_str().unwrap()], &csv).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn test_json_input() {
    let rows = r#"[{"a": 1, "b": 2, "c": 3}, {"a": 4, "b": 5, "c": 6}]"#;
    let stdout = run_eidos(&["--json"], rows).unwrap();
    let output: Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(output["data"][0]["x"], serde_json::json!([1.0, 4.0]));
    assert_eq!(output["data"][0]["marker"]["size"], 12.0);
}

#[test]
fn test_json_input_rejects_non_array() {
    let err = run_eidos(&["--json"], r#"{"a": 1}"#).unwrap_err();
    assert!(err.contains("array"), "unexpected error: {err}");
}

#[test]
fn test_empty_input_fails() {
    let err = run_eidos(&[], "").unwrap_err();
    assert!(err.contains("empty"), "unexpected error: {err}");
}

#[test]
fn test_header_only_input_fails() {
    assert!(run_eidos(&[], "a,b,c\n").is_err());
}

#[test]
fn test_conflicting_modes_rejected() {
    let csv = fs::read_to_string("test/scatter.csv").unwrap();
    assert!(run_eidos(&["--profile", "--fallback"], &csv).is_err());
}
