use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

/// Font export job as read from a TOML file.
///
/// ```toml
/// font = "fonts/NotoSans-Regular.ttf"
/// size = 14.0
/// blocks = ["basic-latin", "latin-1-supplement"]
/// format = "tc-unicode"
/// output = "noto14.h"
/// c_source = true
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FontJob {
    pub font: Option<PathBuf>,
    pub size: Option<f32>,
    pub threshold: Option<f32>,
    pub blocks: Vec<String>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub y_advance: Option<u8>,
    pub c_source: bool,
}

impl FontJob {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading job file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing job file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
