//! Markdown processing: headings, sections and table of contents.
//!
//! Everything in here is plain line-based text processing over raw Markdown. Rendering to HTML is left to the view
//! layer, which only needs the ids produced here to line up with its anchors.
mod atx;
mod headings;
mod sections;
mod slugger;
mod toc;

pub use headings::{Heading, extract_headings, extract_headings_with, first_title};
pub use sections::{INTRO_SECTION_ID, MarkdownSection, split_sections, split_sections_with};
pub use slugger::{Slugger, slugify};
pub use toc::{TocEntry, build_toc};

/// Options shared by the heading extractor and the section splitter.
///
/// Both default to `false`, which keeps ids compatible with anchors that existing pages and links already use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Ignore heading-looking lines inside fenced code blocks.
    pub skip_code_fences: bool,
    /// Suffix repeated heading ids with `-1`, `-2`, ... instead of letting them collide.
    ///
    /// This changes the anchors of any page with duplicate headings.
    pub unique_slugs: bool,
}
