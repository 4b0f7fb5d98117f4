use serde::Serialize;

/// Display color assigned to a search term. Irrelevant to matching; the
/// renderer uses it to highlight matched substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermColor {
    Yellow,
    Cyan,
    Magenta,
    Green,
    Blue,
    Red,
}

impl TermColor {
    pub const PALETTE: [TermColor; 6] = [
        TermColor::Yellow,
        TermColor::Cyan,
        TermColor::Magenta,
        TermColor::Green,
        TermColor::Blue,
        TermColor::Red,
    ];

    /// ANSI escape starting this color
    pub fn ansi(self) -> &'static str {
        match self {
            TermColor::Yellow => "\x1b[33m",
            TermColor::Cyan => "\x1b[36m",
            TermColor::Magenta => "\x1b[35m",
            TermColor::Green => "\x1b[32m",
            TermColor::Blue => "\x1b[34m",
            TermColor::Red => "\x1b[31m",
        }
    }
}

/// One parsed search term. `text` is lowercased and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTerm {
    pub text: String,
    pub color: TermColor,
    pub exclude: bool,
    pub site_filter: bool,
}

/// Parse raw search input into an ordered term list.
///
/// Tokens are whitespace-split. `site:<suffix>` is a site filter, even with
/// a leading `-` (ignored there rather than read as an exclusion). On other
/// tokens a leading `-` marks an exclude term. Tokens that are empty after
/// stripping prefixes produce no term.
pub fn parse_search_input(input: &str) -> Vec<SearchTerm> {
    let mut terms = Vec::new();
    let mut palette = TermColor::PALETTE.iter().cycle();

    for token in input.split_whitespace() {
        let stripped = token.strip_prefix('-');
        let body = stripped.unwrap_or(token);

        if let Some(suffix) = body.strip_prefix("site:") {
            let text = suffix.trim().to_lowercase();
            if text.is_empty() {
                continue;
            }
            terms.push(SearchTerm {
                text,
                color: TermColor::Blue,
                exclude: false,
                site_filter: true,
            });
        } else {
            let text = body.trim().to_lowercase();
            if text.is_empty() {
                continue;
            }
            let color = palette.next().copied().unwrap_or(TermColor::Yellow);
            terms.push(SearchTerm {
                text,
                color,
                exclude: stripped.is_some(),
                site_filter: false,
            });
        }
    }

    terms
}

/// The three term groups the filter evaluates, in evaluation order.
/// A pure function of the term list, rebuilt on every filter pass.
#[derive(Debug, Default)]
pub struct TermPartition<'a> {
    pub site: Vec<&'a SearchTerm>,
    pub exclude: Vec<&'a SearchTerm>,
    pub include: Vec<&'a SearchTerm>,
}

pub fn partition(terms: &[SearchTerm]) -> TermPartition<'_> {
    let mut parts = TermPartition::default();
    for term in terms {
        if term.site_filter {
            parts.site.push(term);
        } else if term.exclude {
            parts.exclude.push(term);
        } else {
            parts.include.push(term);
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_include_exclude_and_site_terms() {
        let terms = parse_search_input("foo -bar site:example.com");
        assert_eq!(terms.len(), 3);
        assert!(!terms[0].exclude && !terms[0].site_filter);
        assert!(terms[1].exclude && !terms[1].site_filter);
        assert!(terms[2].site_filter && !terms[2].exclude);
        assert_eq!(terms[2].text, "example.com");
    }

    #[test]
    fn site_prefix_wins_over_exclude_prefix() {
        let terms = parse_search_input("-site:example.com");
        assert_eq!(terms.len(), 1);
        assert!(terms[0].site_filter);
        assert!(!terms[0].exclude);
    }

    #[test]
    fn lowercases_and_drops_empty_tokens() {
        let terms = parse_search_input("FOO  -  site: ");
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].text, "foo");
    }

    #[test]
    fn include_terms_cycle_the_palette_in_order() {
        let terms = parse_search_input("a b c");
        assert_eq!(terms[0].color, TermColor::PALETTE[0]);
        assert_eq!(terms[1].color, TermColor::PALETTE[1]);
        assert_eq!(terms[2].color, TermColor::PALETTE[2]);
    }

    #[test]
    fn partition_preserves_group_membership() {
        let terms = parse_search_input("foo -bar site:a.com baz");
        let parts = partition(&terms);
        assert_eq!(parts.include.len(), 2);
        assert_eq!(parts.exclude.len(), 1);
        assert_eq!(parts.site.len(), 1);
    }
}
