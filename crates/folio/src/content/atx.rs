//! Line-level recognition of ATX headings (`# Title` through `###### Title`).
//!
//! Both the heading extractor and the section splitter go through here so that they always agree on what a heading
//! is, which in turn keeps section ids and heading ids in sync.
use pulldown_cmark::{Event, Options, Parser, Tag};

use super::ParseOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AtxHeading<'a> {
    pub level: u8,
    pub text: &'a str,
}

/// Matches `^(#{1,6})\s+(.+)$` against a single line.
///
/// The run of `#` must be 1 to 6 long and be followed by at least one whitespace character and at least one more
/// character of any kind. A trailing `\r` is not part of the line.
pub(crate) fn parse_atx_heading(line: &str) -> Option<AtxHeading<'_>> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let level = line.len() - line.trim_start_matches('#').len();
    if level == 0 || level > 6 {
        return None;
    }

    let rest = &line[level..];
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if is_pattern_whitespace(c) => {}
        _ => return None,
    }
    chars.next()?;

    Some(AtxHeading {
        level: level as u8,
        text: rest.trim(),
    })
}

/// Whitespace as understood by the heading and slug patterns (ECMAScript `\s`).
pub(crate) fn is_pattern_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// A line of a markdown document, with its heading classification already done.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClassifiedLine<'a> {
    pub raw: &'a str,
    pub heading: Option<AtxHeading<'a>>,
}

/// Split `markdown` on `\n` and classify every line.
///
/// With [`ParseOptions::skip_code_fences`] unset, any line that looks like a heading is one, even inside a code
/// block. Anchors generated by earlier versions of the site rely on that.
pub(crate) fn classify_lines<'a>(
    markdown: &'a str,
    options: &ParseOptions,
) -> Vec<ClassifiedLine<'a>> {
    let code_ranges = if options.skip_code_fences {
        code_block_ranges(markdown)
    } else {
        Vec::new()
    };

    let mut offset = 0;
    markdown
        .split('\n')
        .map(|raw| {
            let line_start = offset;
            offset += raw.len() + 1;

            let in_code = code_ranges
                .iter()
                .any(|range| range.contains(&line_start));

            ClassifiedLine {
                raw,
                heading: if in_code {
                    None
                } else {
                    parse_atx_heading(raw)
                },
            }
        })
        .collect()
}

fn code_block_ranges(markdown: &str) -> Vec<std::ops::Range<usize>> {
    Parser::new_ext(markdown, Options::empty())
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!(
            parse_atx_heading("# Title"),
            Some(AtxHeading {
                level: 1,
                text: "Title"
            })
        );
        assert_eq!(parse_atx_heading("###### Deep").map(|h| h.level), Some(6));
        assert_eq!(parse_atx_heading("####### Too deep"), None);
    }

    #[test]
    fn test_requires_whitespace_after_hashes() {
        assert_eq!(parse_atx_heading("#hashtag"), None);
        assert_eq!(parse_atx_heading("##"), None);
        assert_eq!(parse_atx_heading("# "), None);
        assert_eq!(parse_atx_heading("text # not a heading"), None);
        assert_eq!(parse_atx_heading(" # indented"), None);
    }

    #[test]
    fn test_whitespace_only_text_still_matches() {
        // Two spaces satisfy `\s+(.+)`, the text just trims down to nothing.
        assert_eq!(
            parse_atx_heading("#  "),
            Some(AtxHeading { level: 1, text: "" })
        );
    }

    #[test]
    fn test_text_is_trimmed_and_crlf_ignored() {
        assert_eq!(
            parse_atx_heading("##   Spaced out   \r"),
            Some(AtxHeading {
                level: 2,
                text: "Spaced out"
            })
        );
    }

    #[test]
    fn test_classify_keeps_fenced_headings_by_default() {
        let md = "# Real\n```sh\n# comment\n```\n";
        let lines = classify_lines(md, &ParseOptions::default());

        assert_eq!(lines.len(), 5);
        assert!(lines[0].heading.is_some());
        assert!(lines[2].heading.is_some());
    }

    #[test]
    fn test_classify_skips_fenced_headings_when_asked() {
        let md = "# Real\n```sh\n# comment\n```\n## After\n";
        let options = ParseOptions {
            skip_code_fences: true,
            ..Default::default()
        };
        let lines = classify_lines(md, &options);

        assert!(lines[0].heading.is_some());
        assert!(lines[2].heading.is_none());
        assert_eq!(lines[4].heading.map(|h| h.text), Some("After"));
    }
}
