use serde::{Deserialize, Serialize};

use super::{ParseOptions, atx::classify_lines, slugger::Slugger};

/// Represents a Markdown heading.
///
/// Can be used to generate a table of contents, see [`build_toc`](super::build_toc).
///
/// ## Example
/// ```rust
/// use folio::content::extract_headings;
///
/// let headings = extract_headings("# Guide\n\n## Getting Started!\n");
/// assert_eq!(headings[1].id, "getting-started");
/// assert_eq!(headings[1].level, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub level: u8,
    pub id: String,
}

/// Extract every ATX heading of `markdown`, in document order.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    extract_headings_with(markdown, &ParseOptions::default())
}

pub fn extract_headings_with(markdown: &str, options: &ParseOptions) -> Vec<Heading> {
    let mut slugger = Slugger::with_unique(options.unique_slugs);

    classify_lines(markdown, options)
        .into_iter()
        .filter_map(|line| line.heading)
        .map(|heading| Heading {
            text: heading.text.to_string(),
            level: heading.level,
            id: slugger.slugify(heading.text),
        })
        .collect()
}

/// Text of the first level-1 heading, if there is one.
pub fn first_title(headings: &[Heading]) -> Option<&str> {
    headings
        .iter()
        .find(|heading| heading.level == 1)
        .map(|heading| heading.text.as_str())
}
