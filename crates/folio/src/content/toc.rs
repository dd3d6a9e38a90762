use serde::{Deserialize, Serialize};

use super::Heading;

/// An entry of a page's "On this page" table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub title: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    fn from_heading(heading: &Heading) -> Self {
        Self {
            title: heading.text.clone(),
            id: heading.id.clone(),
            children: Vec::new(),
        }
    }
}

/// Build a two-level table of contents out of level-2 and level-3 headings.
///
/// Level-3 headings nest under the closest preceding level-2 heading. A level-3 heading that appears before any
/// level-2 heading has no parent and is left out, as are all other levels.
pub fn build_toc(headings: &[Heading]) -> Vec<TocEntry> {
    let mut toc: Vec<TocEntry> = Vec::new();

    for heading in headings {
        match heading.level {
            2 => toc.push(TocEntry::from_heading(heading)),
            3 => {
                if let Some(parent) = toc.last_mut() {
                    parent.children.push(TocEntry::from_heading(heading));
                }
            }
            _ => {}
        }
    }

    toc
}
