//! The navigation model of a docs site, as stored in its `config.json`.
//!
//! ```json
//! {
//!   "sections": [
//!     {
//!       "title": "Getting Started",
//!       "icon": "rocket",
//!       "order": 1,
//!       "items": [
//!         { "title": "Installation", "href": "/installation", "file": "installation.md" }
//!       ]
//!     }
//!   ],
//!   "homepage": { "title": "Docs", "description": "Welcome!" }
//! }
//! ```
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocsConfig {
    #[serde(default)]
    pub sections: Vec<ConfigSection>,
    #[serde(default)]
    pub homepage: Homepage,
}

/// A group of pages in the sidebar. Not to be confused with a [`MarkdownSection`](crate::content::MarkdownSection).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSection {
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub href: String,
    /// Markdown file backing this page, relative to the pages directory. Pages without one have no content of
    /// their own and render as the homepage.
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Homepage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl DocsConfig {
    /// Every page of the site in sidebar order, paired with the section it belongs to.
    pub fn items(&self) -> impl Iterator<Item = (&ConfigSection, &NavItem)> {
        self.sections
            .iter()
            .flat_map(|section| section.items.iter().map(move |item| (section, item)))
    }

    /// First page whose `href` is exactly `href`.
    pub fn find_item(&self, href: &str) -> Option<(&ConfigSection, &NavItem)> {
        self.items().find(|(_, item)| item.href == href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let config: DocsConfig = serde_json::from_str(
            r#"{ "sections": [{ "title": "Guides", "items": [{ "title": "Home", "href": "/home", "file": null }] }] }"#,
        )
        .unwrap();

        assert_eq!(config.homepage, Homepage::default());
        assert_eq!(config.sections[0].icon, "");
        assert_eq!(config.sections[0].order, 0);
        assert_eq!(config.sections[0].items[0].file, None);
    }

    #[test]
    fn test_serialize_keeps_null_file() {
        let item = NavItem {
            title: "Home".into(),
            href: "/".into(),
            file: None,
        };

        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"title":"Home","href":"/","file":null}"#
        );
    }

    #[test]
    fn test_items_and_find_item() {
        let config = DocsConfig {
            sections: vec![
                ConfigSection {
                    title: "A".into(),
                    items: vec![NavItem {
                        title: "One".into(),
                        href: "/one".into(),
                        file: Some("one.md".into()),
                    }],
                    ..Default::default()
                },
                ConfigSection {
                    title: "B".into(),
                    items: vec![NavItem {
                        title: "Two".into(),
                        href: "/two".into(),
                        file: None,
                    }],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let hrefs: Vec<&str> = config.items().map(|(_, item)| item.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/one", "/two"]);

        let (section, item) = config.find_item("/two").unwrap();
        assert_eq!(section.title, "B");
        assert_eq!(item.title, "Two");
        assert!(config.find_item("/two/").is_none());
    }
}
