//! The hand-edited layout document.
//!
//! ```yaml
//! app_layout:
//!   - - Safari
//!     - folder_title: Utilities
//!       folder_layout:
//!         - [Terminal, Console]
//! widget_layout: []
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{Result, SyncError};

pub type Layout = Vec<Page>;
pub type Page = Vec<Entry>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Entry {
    Title(String),
    Folder(Folder),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Folder {
    pub folder_title: String,
    pub folder_layout: Vec<Vec<String>>,
}

impl Entry {
    pub fn title(title: impl Into<String>) -> Entry { Entry::Title(title.into()) }

    pub fn folder<P, T>(title: impl Into<String>, pages: P) -> Entry
    where
        P: IntoIterator,
        P::Item: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Entry::Folder(Folder {
            folder_title: title.into(),
            folder_layout: pages
                .into_iter()
                .map(|page| page.into_iter().map(Into::into).collect())
                .collect(),
        })
    }
}

/// Every item title a layout mentions, in document order, folders included.
pub fn referenced_titles(layout: &Layout) -> impl Iterator<Item = &str> + '_ {
    layout.iter().flatten().flat_map(entry_titles)
}

fn entry_titles(entry: &Entry) -> Box<dyn Iterator<Item = &str> + '_> {
    match entry {
        Entry::Title(title) => Box::new(std::iter::once(title.as_str())),
        Entry::Folder(folder) => Box::new(folder.folder_layout.iter().flatten().map(String::as_str)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[derive(Serialize, Deserialize, clap::ValueEnum)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LayoutFormat {
    #[default]
    Yaml,
    Json,
}

impl LayoutFormat {
    /// `.json` files are JSON; anything else is read as YAML, which also
    /// accepts JSON.
    pub fn for_path(path: &Path) -> LayoutFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => LayoutFormat::Json,
            _ => LayoutFormat::Yaml,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct LaunchpadLayout {
    pub app_layout: Layout,
    pub widget_layout: Layout,
}

impl LaunchpadLayout {
    pub fn parse(buf: &str, format: LayoutFormat) -> Result<LaunchpadLayout> {
        match format {
            LayoutFormat::Yaml => {
                serde_yaml::from_str(buf).map_err(|e| SyncError::MalformedLayout(e.to_string()))
            }
            LayoutFormat::Json => {
                serde_json::from_str(buf).map_err(|e| SyncError::MalformedLayout(e.to_string()))
            }
        }
    }

    pub fn read(path: &Path) -> Result<LaunchpadLayout> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf, LayoutFormat::for_path(path))
    }

    pub fn render(&self, format: LayoutFormat) -> Result<String> {
        match format {
            LayoutFormat::Yaml => {
                let body = serde_yaml::to_string(self)
                    .map_err(|e| SyncError::MalformedLayout(e.to_string()))?;
                Ok(format!("---\n{body}"))
            }
            LayoutFormat::Json => {
                let mut body = serde_json::to_string_pretty(self)
                    .map_err(|e| SyncError::MalformedLayout(e.to_string()))?;
                body.push('\n');
                Ok(body)
            }
        }
    }

    pub fn write(&self, path: &Path, format: LayoutFormat) -> Result<()> {
        let buf = self.render(format)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, buf.as_bytes())?;
        Ok(())
    }
}
