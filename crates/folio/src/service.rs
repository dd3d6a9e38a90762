//! The read operations behind the docs API: config, single page, search.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    DocsOptions,
    cache::{Clock, ResponseCache, SystemClock},
    config::{DocsConfig, NavItem},
    content::{Heading, MarkdownSection, TocEntry, build_toc, split_sections_with},
    errors::FolioError,
    navigation::{HOMEPAGE_HREF, NavLink, homepage_next, resolve_neighbors},
    repository::PagesRepository,
    search::{SearchResult, search},
};

pub const HOMEPAGE_SECTION: &str = "Homepage";

/// Everything the view layer needs to render one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocPage {
    pub title: String,
    /// Title of the sidebar section the page belongs to.
    pub section: String,
    pub content: String,
    pub headings: Vec<Heading>,
    pub href: String,
    pub sections: Vec<MarkdownSection>,
    pub toc: Vec<TocEntry>,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLookup {
    /// The synthetic homepage, built from the config's `homepage` record.
    Homepage(DocPage),
    Page(DocPage),
    NotFound,
}

/// Ties the repository, the Markdown processing and the navigation together.
///
/// Resolved pages are cached by href for [`DocsOptions::cache_ttl`]. Saving through the service clears the cache.
#[derive(Debug)]
pub struct DocsService<C = SystemClock> {
    repository: PagesRepository,
    cache: ResponseCache<DocPage, C>,
}

impl DocsService<SystemClock> {
    pub fn new(options: DocsOptions) -> Self {
        Self::with_clock(options, SystemClock)
    }
}

impl<C: Clock> DocsService<C> {
    pub fn with_clock(options: DocsOptions, clock: C) -> Self {
        Self {
            repository: PagesRepository::from_options(&options),
            cache: ResponseCache::with_clock(options.cache_ttl, clock),
        }
    }

    pub fn repository(&self) -> &PagesRepository {
        &self.repository
    }

    pub fn config(&self) -> DocsConfig {
        self.repository.load_config()
    }

    /// Resolve `href` to a page.
    ///
    /// `/`, hrefs that aren't in the config and pages without a backing file resolve to the homepage. Only a page
    /// whose file can't be read is not found.
    pub fn page(&self, href: &str) -> PageLookup {
        if let Some(page) = self.cache.get(href) {
            debug!("Serving {} from cache", href);
            return PageLookup::Page(page);
        }

        let config = self.repository.load_config();
        if href == HOMEPAGE_HREF {
            return PageLookup::Homepage(homepage(&config, href));
        }

        let Some((section_title, file)) = config
            .items()
            .filter(|(_, item)| item.href == href)
            .find_map(|(section, item)| {
                backing_file(item).map(|file| (section.title.clone(), file.to_string()))
            })
        else {
            return PageLookup::Homepage(homepage(&config, href));
        };

        let Some(markdown) = self.repository.load_markdown_page(&file) else {
            return PageLookup::NotFound;
        };

        let neighbors = resolve_neighbors(&config, href);
        let page = DocPage {
            title: markdown.title,
            section: section_title,
            sections: split_sections_with(&markdown.content, self.repository.parse_options()),
            toc: build_toc(&markdown.headings),
            content: markdown.content,
            headings: markdown.headings,
            href: href.to_string(),
            prev: neighbors.prev,
            next: neighbors.next,
        };

        self.cache.insert(href, page.clone());
        PageLookup::Page(page)
    }

    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        search(&self.repository, &self.repository.load_config(), query)
    }

    pub fn save_config(&self, config: &DocsConfig) -> Result<(), FolioError> {
        self.repository.save_config(config)?;
        self.cache.clear();
        Ok(())
    }

    pub fn save_page(&self, file: &str, content: &str) -> Result<(), FolioError> {
        self.repository.save_markdown_page(file, content)?;
        self.cache.clear();
        Ok(())
    }
}

fn backing_file(item: &NavItem) -> Option<&str> {
    item.file.as_deref().filter(|file| !file.is_empty())
}

fn homepage(config: &DocsConfig, href: &str) -> DocPage {
    DocPage {
        title: config.homepage.title.clone(),
        section: HOMEPAGE_SECTION.to_string(),
        content: config.homepage.description.clone(),
        headings: Vec::new(),
        href: href.to_string(),
        sections: Vec::new(),
        toc: Vec::new(),
        prev: None,
        next: homepage_next(config),
    }
}
