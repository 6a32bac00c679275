// Library exports for eidos

pub mod assistant;
pub mod catalog;
pub mod classify;
pub mod csv_reader;
pub mod data;
pub mod fallback;
pub mod geometry;
pub mod graph;
pub mod ir;
pub mod parser;
pub mod resolve;
pub mod runtime;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: OutputFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantOptions {
    /// Wall-clock budget for one assistant call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Longest raw-response excerpt kept when a response cannot be parsed
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

fn default_timeout_secs() -> u64 { 30 }
fn default_excerpt_chars() -> usize { 200 }

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            excerpt_chars: 200,
        }
    }
}

/// Settings read from the optional JSON config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Options {
    #[serde(default)]
    pub render: RenderOptions,
    #[serde(default)]
    pub assistant: AssistantOptions,
}

impl Options {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}
