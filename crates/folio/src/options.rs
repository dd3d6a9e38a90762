use std::{path::PathBuf, time::Duration};

use crate::content::ParseOptions;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Folio options. Should be passed to [`DocsService::new`](crate::DocsService::new).
///
/// ## Examples
/// Default values:
/// ```rust
/// use folio::{DocsOptions, DocsService};
///
/// let service = DocsService::new(DocsOptions::default());
/// ```
/// Custom values:
/// ```rust
/// use std::time::Duration;
/// use folio::{DocsOptions, DocsService};
/// use folio::content::ParseOptions;
///
/// let service = DocsService::new(DocsOptions {
///     pages_dir: "content/docs".into(),
///     cache_ttl: Duration::from_secs(30),
///     parse: ParseOptions {
///         skip_code_fences: true,
///         ..Default::default()
///     },
///     ..Default::default()
/// });
/// ```
#[derive(Debug, Clone)]
pub struct DocsOptions {
    /// Directory holding `config.json` and every Markdown page it references.
    pub pages_dir: PathBuf,

    /// Name of the config file, relative to `pages_dir`.
    pub config_file: PathBuf,

    /// How long a resolved page is served from memory before it is read from disk again.
    ///
    /// Edits to page files show up after at most this long. Use [`Duration::ZERO`] to always read from disk.
    pub cache_ttl: Duration,

    pub parse: ParseOptions,
}

impl Default for DocsOptions {
    fn default() -> Self {
        Self {
            pages_dir: PathBuf::from("public").join("pages"),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            cache_ttl: DEFAULT_CACHE_TTL,
            parse: ParseOptions::default(),
        }
    }
}

impl DocsOptions {
    /// Full path of the config file.
    pub fn config_path(&self) -> PathBuf {
        self.pages_dir.join(&self.config_file)
    }
}
