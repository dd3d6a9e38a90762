//! Previous/next links between pages.
//!
//! The chain of pages is the homepage followed by every item of every section, in config order.
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::DocsConfig;

pub const HOMEPAGE_HREF: &str = "/";
const FALLBACK_HOMEPAGE_TITLE: &str = "Documentation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

impl NavLink {
    fn new(title: &str, href: &str) -> Self {
        Self {
            title: title.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNeighbors {
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// `[homepage, ...every section item]`, in order.
pub fn nav_chain(config: &DocsConfig) -> Vec<NavLink> {
    let homepage_title = if config.homepage.title.is_empty() {
        FALLBACK_HOMEPAGE_TITLE
    } else {
        config.homepage.title.as_str()
    };

    std::iter::once(NavLink::new(homepage_title, HOMEPAGE_HREF))
        .chain(
            config
                .items()
                .map(|(_, item)| NavLink::new(&item.title, &item.href)),
        )
        .collect()
}

/// Find the neighbors of `href` in the chain.
///
/// Matching is exact: `/guide` and `/guide/` are different pages here. When `href` is not in the chain at all,
/// both links are `None`. If it appears more than once, the first occurrence wins.
pub fn resolve_neighbors(config: &DocsConfig, href: &str) -> PageNeighbors {
    let chain = nav_chain(config);

    let Some(index) = chain.iter().position(|link| link.href == href) else {
        return PageNeighbors::default();
    };

    PageNeighbors {
        prev: index.checked_sub(1).map(|prev| chain[prev].clone()),
        next: chain.get(index + 1).cloned(),
    }
}

/// Normalize an href for comparison.
///
/// Backslashes become slashes, the query string and fragment are dropped and trailing slashes are removed, except
/// for the root itself. An empty href is the root.
///
/// ## Example
/// ```rust
/// use folio::navigation::normalize_href;
///
/// assert_eq!(normalize_href("/guide/?tab=1#setup"), "/guide");
/// assert_eq!(normalize_href("\\guide\\install"), "/guide/install");
/// assert_eq!(normalize_href(""), "/");
/// ```
pub fn normalize_href(href: &str) -> String {
    if href.is_empty() || href == HOMEPAGE_HREF {
        return HOMEPAGE_HREF.to_string();
    }

    let href = href.replace('\\', "/");
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');

    if path.is_empty() {
        HOMEPAGE_HREF.to_string()
    } else {
        path.to_string()
    }
}

/// The chain with duplicate pages removed, comparing hrefs after [`normalize_href`].
///
/// Hrefs in the result are kept as written in the config.
pub fn deduplicated_chain(config: &DocsConfig) -> Vec<NavLink> {
    let mut seen = FxHashSet::default();

    nav_chain(config)
        .into_iter()
        .filter(|link| seen.insert(normalize_href(&link.href)))
        .collect()
}

/// The "next" link shown on the homepage.
pub fn homepage_next(config: &DocsConfig) -> Option<NavLink> {
    deduplicated_chain(config).into_iter().nth(1)
}
