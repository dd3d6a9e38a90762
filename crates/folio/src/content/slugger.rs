use rustc_hash::FxHashMap;

use super::atx::is_pattern_whitespace;

/// Turn heading text into an anchor id.
///
/// Lowercases the text, drops everything that isn't an ASCII letter, digit, `_`, `-` or whitespace, then replaces
/// each run of whitespace with a single `-`. Leading and trailing hyphens are kept, and nothing is done about
/// collisions, see [`Slugger`] for that.
///
/// ## Example
/// ```rust
/// use folio::content::slugify;
///
/// assert_eq!(slugify("Getting Started!"), "getting-started");
/// assert_eq!(slugify("  Hello   World "), "-hello-world-");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for c in text.to_lowercase().chars() {
        if is_pattern_whitespace(c) {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
            in_whitespace = false;
        }
        // Removed characters do not end a whitespace run: "a ! b" is "a-b".
    }

    slug
}

/// Generates slugs for the headings of a single document.
///
/// By default every heading gets [`slugify`]'s output as-is, so two identical headings share an id. With
/// [`Slugger::unique`], repeated ids get a `-1`, `-2`, ... suffix in document order.
#[derive(Debug, Default)]
pub struct Slugger {
    unique: bool,
    generated_slugs: FxHashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique() -> Self {
        Self {
            unique: true,
            ..Default::default()
        }
    }

    pub fn with_unique(unique: bool) -> Self {
        if unique { Self::unique() } else { Self::new() }
    }

    pub fn slugify(&mut self, text: &str) -> String {
        let base = slugify(text);
        if !self.unique {
            return base;
        }

        let mut slug = base.clone();
        let mut counter = self.generated_slugs.get(&base).copied().unwrap_or(0);
        while self.generated_slugs.contains_key(&slug) {
            counter += 1;
            slug = format!("{}-{}", base, counter);
        }

        if slug != base {
            self.generated_slugs.insert(slug.clone(), 0);
        }
        self.generated_slugs.insert(base, counter);
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Getting Started!"), "getting-started");
        assert_eq!(slugify("Title"), "title");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        let text = "Install & Configure (v2)";
        assert_eq!(slugify(text), slugify(text));
        assert_eq!(slugify(text), "install-configure-v2");
    }

    #[test]
    fn test_slugify_keeps_edge_hyphens() {
        assert_eq!(slugify(" padded "), "-padded-");
        assert_eq!(slugify("-dash-"), "-dash-");
    }

    #[test]
    fn test_slugify_collapses_whitespace_across_removed_chars() {
        assert_eq!(slugify("a ! b"), "a-b");
        assert_eq!(slugify("tab\tand\u{a0}nbsp"), "tab-and-nbsp");
    }

    #[test]
    fn test_slugify_drops_non_ascii_letters() {
        assert_eq!(slugify("Café Crème"), "caf-crme");
        assert_eq!(slugify("snake_case_name"), "snake_case_name");
    }

    #[test]
    fn test_slugger_default_keeps_collisions() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slugify("Usage"), "usage");
        assert_eq!(slugger.slugify("Usage"), "usage");
    }

    #[test]
    fn test_slugger_unique_suffixes() {
        let mut slugger = Slugger::unique();
        assert_eq!(slugger.slugify("Usage"), "usage");
        assert_eq!(slugger.slugify("Usage"), "usage-1");
        assert_eq!(slugger.slugify("Usage"), "usage-2");
    }

    #[test]
    fn test_slugger_unique_avoids_literal_suffix_clash() {
        let mut slugger = Slugger::unique();
        assert_eq!(slugger.slugify("Usage 1"), "usage-1");
        assert_eq!(slugger.slugify("Usage"), "usage");
        assert_eq!(slugger.slugify("Usage"), "usage-2");
    }
}
