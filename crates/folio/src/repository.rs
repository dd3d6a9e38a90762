//! Flat-file storage for the docs config and Markdown pages.
//!
//! Reads never fail: a missing or broken file is logged and replaced by a default (or `None` for pages). Writes
//! return their errors. Concurrent writers are not coordinated, the last one wins.
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::{
    DocsOptions,
    config::DocsConfig,
    content::{Heading, ParseOptions, extract_headings_with, first_title},
    errors::{ConfigError, FolioError, PageError},
};

/// A Markdown page loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownPage {
    pub title: String,
    /// Left empty by the repository, callers fill it with the href the page was requested under.
    pub href: String,
    pub content: String,
    pub headings: Vec<Heading>,
}

#[derive(Debug, Clone)]
pub struct PagesRepository {
    pages_dir: PathBuf,
    config_path: PathBuf,
    parse_options: ParseOptions,
}

impl PagesRepository {
    pub fn new(pages_dir: impl Into<PathBuf>) -> Self {
        Self::from_options(&DocsOptions {
            pages_dir: pages_dir.into(),
            ..Default::default()
        })
    }

    pub fn from_options(options: &DocsOptions) -> Self {
        Self {
            pages_dir: options.pages_dir.clone(),
            config_path: options.config_path(),
            parse_options: options.parse,
        }
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Load the docs config, falling back to an empty config if it can't be read or parsed.
    pub fn load_config(&self) -> DocsConfig {
        match self.try_load_config() {
            Ok(config) => config,
            Err(err @ ConfigError::ParseFailed { .. }) => {
                error!("{}: {}", err, source_message(&err));
                DocsConfig::default()
            }
            Err(err) => {
                warn!("{}: {}", err, source_message(&err));
                DocsConfig::default()
            }
        }
    }

    pub fn try_load_config(&self) -> Result<DocsConfig, ConfigError> {
        let content =
            fs::read_to_string(&self.config_path).map_err(|source| ConfigError::ReadFailed {
                path: self.config_path.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: self.config_path.clone(),
            source,
        })
    }

    /// Write the config as JSON indented with two spaces.
    pub fn save_config(&self, config: &DocsConfig) -> Result<(), FolioError> {
        let json = serde_json::to_string_pretty(config).map_err(ConfigError::SerializeFailed)?;

        fs::write(&self.config_path, json).map_err(|source| ConfigError::WriteFailed {
            path: self.config_path.clone(),
            source,
        })?;

        debug!("Saved docs config to {}", self.config_path.display());
        Ok(())
    }

    /// Resolve a page path from the config against the pages directory.
    ///
    /// Absolute paths and paths going through `..` are refused.
    pub fn resolve_page_path(&self, file: &str) -> Result<PathBuf, PageError> {
        let relative = Path::new(file);
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });

        if escapes {
            return Err(PageError::OutsidePagesDir {
                path: relative.to_path_buf(),
            });
        }

        Ok(self.pages_dir.join(relative))
    }

    /// Load a Markdown page and extract its headings, or `None` if it can't be read.
    pub fn load_markdown_page(&self, file: &str) -> Option<MarkdownPage> {
        match self.try_load_markdown_page(file) {
            Ok(page) => Some(page),
            Err(err) => {
                warn!("Could not load page `{}`: {}", file, source_message(&err));
                None
            }
        }
    }

    pub fn try_load_markdown_page(&self, file: &str) -> Result<MarkdownPage, PageError> {
        let path = self.resolve_page_path(file)?;
        let content = fs::read_to_string(&path)
            .map_err(|source| PageError::ReadFailed { path, source })?;

        let headings = extract_headings_with(&content, &self.parse_options);
        let title = first_title(&headings)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| page_base_name(file));

        Ok(MarkdownPage {
            title,
            href: String::new(),
            content,
            headings,
        })
    }

    /// Write a Markdown page, creating its parent directories as needed.
    pub fn save_markdown_page(&self, file: &str, content: &str) -> Result<(), FolioError> {
        let path = self.resolve_page_path(file)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PageError::CreateDirFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&path, content).map_err(|source| PageError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        debug!("Saved page {}", path.display());
        Ok(())
    }
}

/// File name without its `.md` extension, used as a title for pages without a level-1 heading.
fn page_base_name(file: &str) -> String {
    let name = Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());

    match name.strip_suffix(".md") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

fn source_message(err: &dyn std::error::Error) -> String {
    err.source()
        .map(|source| source.to_string())
        .unwrap_or_else(|| err.to_string())
}
