//! Full-text search over section titles, page titles, headings and page content.
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{config::DocsConfig, repository::PagesRepository};

/// Queries shorter than this many characters return nothing.
pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_RESULTS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultKind {
    Section,
    Page,
    Heading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: SearchResultKind,
    pub title: String,
    pub href: String,
    pub parent_title: String,
}

impl SearchResult {
    fn new(kind: SearchResultKind, title: &str, href: String, parent_title: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            href,
            parent_title,
        }
    }
}

/// Search the whole site for `query`, case-insensitively.
///
/// Results come in config order: for each section, the section itself, then for each of its pages the page and its
/// matching headings. A page whose body matches but none of whose headings do is listed once as a page.
///
/// Each href appears at most once and at most [`MAX_RESULTS`] results are returned. Pages that fail to load are
/// skipped.
pub fn search(repository: &PagesRepository, config: &DocsConfig, query: &str) -> Vec<SearchResult> {
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let query = query.to_lowercase();
    let matches = |text: &str| text.to_lowercase().contains(&query);
    let mut results = Vec::new();

    for section in &config.sections {
        if matches(&section.title)
            && let Some(first_item) = section.items.first()
        {
            results.push(SearchResult::new(
                SearchResultKind::Section,
                &section.title,
                first_item.href.clone(),
                "Section".to_string(),
            ));
        }

        for item in &section.items {
            if matches(&item.title) {
                results.push(SearchResult::new(
                    SearchResultKind::Page,
                    &item.title,
                    item.href.clone(),
                    section.title.clone(),
                ));
            }

            let Some(file) = &item.file else {
                continue;
            };
            let Some(page) = repository.load_markdown_page(file) else {
                continue;
            };

            let mut heading_matched = false;
            for heading in page.headings.iter().filter(|heading| matches(&heading.text)) {
                heading_matched = true;
                results.push(SearchResult::new(
                    SearchResultKind::Heading,
                    &heading.text,
                    format!("{}#{}", item.href, heading.id),
                    format!("{} → {}", section.title, item.title),
                ));
            }

            if !heading_matched
                && matches(&page.content)
                && !results.iter().any(|result| result.href == item.href)
            {
                results.push(SearchResult::new(
                    SearchResultKind::Page,
                    &item.title,
                    item.href.clone(),
                    section.title.clone(),
                ));
            }
        }
    }

    let mut seen = FxHashSet::default();
    results
        .into_iter()
        .filter(|result| seen.insert(result.href.clone()))
        .take(MAX_RESULTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSection, NavItem};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn item(title: &str, href: &str, file: Option<&str>) -> NavItem {
        NavItem {
            title: title.to_string(),
            href: href.to_string(),
            file: file.map(str::to_string),
        }
    }

    fn fixture(files: &[(&str, &str)]) -> (TempDir, PagesRepository) {
        let dir = tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let repository = PagesRepository::new(dir.path());
        (dir, repository)
    }

    fn sample_config() -> DocsConfig {
        DocsConfig {
            sections: vec![
                ConfigSection {
                    title: "Privacy".into(),
                    items: vec![
                        item("Tracking Protection", "/tracking", Some("tracking.md")),
                        item("Cookies", "/cookies", Some("cookies.md")),
                    ],
                    ..Default::default()
                },
                ConfigSection {
                    title: "Features".into(),
                    items: vec![
                        item("Tabs", "/tabs", Some("tabs.md")),
                        item("Missing", "/missing", Some("missing.md")),
                        item("External", "/external", None),
                    ],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn sample_files() -> Vec<(&'static str, &'static str)> {
        vec![
            (
                "tracking.md",
                "# Tracking Protection\n\n## Blocking trackers\nSolar blocks privacy-invading scripts.\n",
            ),
            (
                "cookies.md",
                "# Cookies\n\n## Clearing cookies\nOpen the privacy menu.\n",
            ),
            ("tabs.md", "# Tabs\n\n## Pinned tabs\nKeep tabs around.\n"),
        ]
    }

    #[test]
    fn test_short_query_is_empty() {
        let (_dir, repo) = fixture(&sample_files());
        let config = sample_config();

        assert!(search(&repo, &config, "").is_empty());
        assert!(search(&repo, &config, "t").is_empty());
        assert!(search(&repo, &config, "é").is_empty());
    }

    #[test]
    fn test_section_page_and_heading_results_in_order() {
        let (_dir, repo) = fixture(&sample_files());
        let results = search(&repo, &sample_config(), "PRIVACY");

        let summary: Vec<(SearchResultKind, &str, &str)> = results
            .iter()
            .map(|r| (r.kind, r.href.as_str(), r.parent_title.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (SearchResultKind::Section, "/tracking", "Section"),
                (SearchResultKind::Page, "/cookies", "Privacy"),
            ]
        );
    }

    #[test]
    fn test_heading_results() {
        let (_dir, repo) = fixture(&sample_files());
        let results = search(&repo, &sample_config(), "pinned");

        assert_eq!(
            results,
            vec![SearchResult {
                kind: SearchResultKind::Heading,
                title: "Pinned tabs".into(),
                href: "/tabs#pinned-tabs".into(),
                parent_title: "Features → Tabs".into(),
            }]
        );
    }

    #[test]
    fn test_title_match_prevents_content_duplicate() {
        let (_dir, repo) = fixture(&sample_files());
        let results = search(&repo, &sample_config(), "tabs");

        let hrefs: Vec<&str> = results.iter().map(|r| r.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/tabs", "/tabs#tabs", "/tabs#pinned-tabs"]);
        assert_eq!(results[0].kind, SearchResultKind::Page);
    }

    #[test]
    fn test_unreadable_pages_are_skipped() {
        let (_dir, repo) = fixture(&sample_files());
        let results = search(&repo, &sample_config(), "missing");

        // The title still matches even though the file can't be read.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].href, "/missing");
    }

    #[test]
    fn test_results_capped_and_unique() {
        let content = (0..20)
            .map(|i| format!("## Topic {}\n", i))
            .collect::<String>();
        let (_dir, repo) = fixture(&[("topics.md", content.as_str()), ("more.md", "## Topic 0\n")]);
        let config = DocsConfig {
            sections: vec![ConfigSection {
                title: "Topics".into(),
                items: vec![
                    item("Topics", "/topics", Some("topics.md")),
                    item("Topics again", "/topics", Some("more.md")),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };

        let results = search(&repo, &config, "topic");
        assert_eq!(results.len(), MAX_RESULTS);

        let unique: FxHashSet<&str> = results.iter().map(|r| r.href.as_str()).collect();
        assert_eq!(unique.len(), results.len());
        assert_eq!(results[0].kind, SearchResultKind::Section);
    }

    #[test]
    fn test_result_serialization() {
        let result = SearchResult::new(
            SearchResultKind::Heading,
            "Pinned tabs",
            "/tabs#pinned-tabs".into(),
            "Features → Tabs".into(),
        );

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "type": "heading",
                "title": "Pinned tabs",
                "href": "/tabs#pinned-tabs",
                "parentTitle": "Features → Tabs",
            })
        );
    }
}
