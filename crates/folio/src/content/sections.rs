use serde::{Deserialize, Serialize};

use super::{ParseOptions, atx::classify_lines, slugger::Slugger};

pub const INTRO_SECTION_ID: &str = "intro";

/// A contiguous chunk of a Markdown document, bounded by level-2 headings.
///
/// The view layer renders and scrolls to these individually. A section's `content` starts with its own `## ...`
/// line, so rendering the content reproduces the heading. The optional intro section holds whatever precedes the
/// first level-2 heading and has `level` 0 and an empty `heading`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownSection {
    pub id: String,
    pub heading: String,
    pub level: u8,
    pub content: String,
}

impl MarkdownSection {
    fn intro(content: &str) -> Self {
        Self {
            id: INTRO_SECTION_ID.to_string(),
            heading: String::new(),
            level: 0,
            content: content.to_string(),
        }
    }

    pub fn is_intro(&self) -> bool {
        self.level == 0
    }
}

struct OpenSection<'a> {
    id: String,
    heading: &'a str,
    lines: Vec<&'a str>,
}

impl OpenSection<'_> {
    fn close(self) -> MarkdownSection {
        MarkdownSection {
            id: self.id,
            heading: self.heading.to_string(),
            level: 2,
            content: self.lines.join("\n"),
        }
    }
}

/// Split `markdown` into sections keyed by its level-2 headings.
///
/// Level-1 headings before the first level-2 heading (typically the page title) are dropped. The intro is trimmed
/// and omitted when empty, level-2 sections are kept verbatim.
///
/// ## Example
/// ```rust
/// use folio::content::split_sections;
///
/// let sections = split_sections("# Title\n\nIntro text.\n\n## First\nBody1\n");
/// assert_eq!(sections[0].id, "intro");
/// assert_eq!(sections[0].content, "Intro text.");
/// assert_eq!(sections[1].content, "## First\nBody1\n");
/// ```
pub fn split_sections(markdown: &str) -> Vec<MarkdownSection> {
    split_sections_with(markdown, &ParseOptions::default())
}

pub fn split_sections_with(markdown: &str, options: &ParseOptions) -> Vec<MarkdownSection> {
    // Every heading goes through the slugger, not just level-2 ones, so that ids line up with
    // `extract_headings_with` when unique slugs are enabled.
    let mut slugger = Slugger::with_unique(options.unique_slugs);

    let mut sections = Vec::new();
    let mut intro_lines: Vec<&str> = Vec::new();
    let mut current: Option<OpenSection> = None;
    let mut found_first_h2 = false;

    for line in classify_lines(markdown, options) {
        let Some(heading) = line.heading else {
            push_line(&mut current, &mut intro_lines, line.raw);
            continue;
        };

        let id = slugger.slugify(heading.text);

        match heading.level {
            1 if !found_first_h2 => continue,
            2 => {
                if !found_first_h2 {
                    push_intro(&mut sections, &intro_lines);
                    found_first_h2 = true;
                }

                if let Some(open) = current.take() {
                    sections.push(open.close());
                }

                current = Some(OpenSection {
                    id,
                    heading: heading.text,
                    lines: vec![line.raw],
                });
            }
            _ => push_line(&mut current, &mut intro_lines, line.raw),
        }
    }

    if let Some(open) = current {
        sections.push(open.close());
    }

    if !found_first_h2 {
        push_intro(&mut sections, &intro_lines);
    }

    sections
}

fn push_line<'a>(current: &mut Option<OpenSection<'a>>, intro_lines: &mut Vec<&'a str>, line: &'a str) {
    match current {
        Some(open) => open.lines.push(line),
        None => intro_lines.push(line),
    }
}

fn push_intro(sections: &mut Vec<MarkdownSection>, intro_lines: &[&str]) {
    let content = intro_lines.join("\n");
    let content = content.trim();
    if !content.is_empty() {
        sections.push(MarkdownSection::intro(content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{extract_headings, extract_headings_with};

    fn section(id: &str, heading: &str, level: u8, content: &str) -> MarkdownSection {
        MarkdownSection {
            id: id.to_string(),
            heading: heading.to_string(),
            level,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_split_intro_and_sections() {
        let md = "# Title\n\nIntro text.\n\n## First\nBody1\n\n## Second\nBody2\n";

        assert_eq!(
            split_sections(md),
            vec![
                section("intro", "", 0, "Intro text."),
                section("first", "First", 2, "## First\nBody1\n"),
                section("second", "Second", 2, "## Second\nBody2\n"),
            ]
        );
    }

    #[test]
    fn test_no_h2_yields_single_trimmed_intro() {
        let md = "# Title\n\n  Some text.\n\n### Detail\nMore.\n\n";

        assert_eq!(
            split_sections(md),
            vec![section("intro", "", 0, "Some text.\n\n### Detail\nMore.")]
        );
    }

    #[test]
    fn test_empty_and_whitespace_documents() {
        assert!(split_sections("").is_empty());
        assert!(split_sections(" \n\t\n").is_empty());
        assert!(split_sections("# Only a title\n").is_empty());
    }

    #[test]
    fn test_leading_h2_has_no_intro() {
        let md = "## Start\nBody\n## Next\nMore";

        assert_eq!(
            split_sections(md),
            vec![
                section("start", "Start", 2, "## Start\nBody"),
                section("next", "Next", 2, "## Next\nMore"),
            ]
        );
    }

    #[test]
    fn test_title_then_h2_has_no_intro() {
        let md = "# Title\n## Start\nBody";

        assert_eq!(
            split_sections(md),
            vec![section("start", "Start", 2, "## Start\nBody")]
        );
    }

    #[test]
    fn test_h1_after_first_h2_is_content() {
        let md = "## Start\n# Not dropped\ntext";

        assert_eq!(
            split_sections(md),
            vec![section("start", "Start", 2, "## Start\n# Not dropped\ntext")]
        );
    }

    #[test]
    fn test_deeper_headings_stay_in_section() {
        let md = "## Usage\n### Flags\n#### Short\nbody";

        let sections = split_sections(md);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, md);
    }

    #[test]
    fn test_section_ids_match_heading_ids() {
        let md = "# T\n## Getting Started!\ntext\n## API: v2 (beta)\n## Getting Started!\n";

        let heading_ids: Vec<String> = extract_headings(md)
            .into_iter()
            .filter(|h| h.level == 2)
            .map(|h| h.id)
            .collect();
        let section_ids: Vec<String> = split_sections(md).into_iter().map(|s| s.id).collect();

        assert_eq!(section_ids, heading_ids);
        assert_eq!(section_ids, vec!["getting-started", "api-v2-beta", "getting-started"]);
    }

    #[test]
    fn test_unique_section_ids_match_heading_ids() {
        let md = "# Usage\n## Usage\n### Usage\n## Usage\n";
        let options = ParseOptions {
            unique_slugs: true,
            ..Default::default()
        };

        let heading_ids: Vec<String> = extract_headings_with(md, &options)
            .into_iter()
            .filter(|h| h.level == 2)
            .map(|h| h.id)
            .collect();
        let section_ids: Vec<String> = split_sections_with(md, &options)
            .into_iter()
            .map(|s| s.id)
            .collect();

        assert_eq!(section_ids, heading_ids);
        assert_eq!(section_ids, vec!["usage-1", "usage-3"]);
    }

    #[test]
    fn test_fenced_h2_splits_by_default() {
        let md = "## Shell\n```\n## not really\n```\n";

        assert_eq!(split_sections(md).len(), 2);

        let options = ParseOptions {
            skip_code_fences: true,
            ..Default::default()
        };
        assert_eq!(split_sections_with(md, &options).len(), 1);
    }

    #[test]
    fn test_sections_reconstruct_document() {
        let md = "## A\nfirst\n\n## B\nsecond\n";

        let joined = split_sections(md)
            .into_iter()
            .map(|s| s.content)
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(joined, md);
    }
}
