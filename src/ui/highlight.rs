use crate::filter::SearchTerm;

const RESET: &str = "\x1b[0m";

/// Apply case-insensitive substring highlighting with ANSI colors.
/// - Colors all non-overlapping occurrences of each matched term
/// - Earliest match wins when terms overlap; scanning resumes after it
/// - Keeps allocations minimal; O(n * terms) over text length
pub fn highlight_matches(text: &str, terms: &[SearchTerm], color_enabled: bool) -> String {
    if !color_enabled || terms.is_empty() {
        return text.to_string();
    }

    let lower = text.to_lowercase();
    // Lowercasing can change byte lengths outside ASCII; indices into the
    // lowered text would then not map back. Skip highlighting in that case.
    if lower.len() != text.len() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;

    while i < text.len() {
        let next = terms
            .iter()
            .filter(|t| !t.text.is_empty())
            .filter_map(|t| lower[i..].find(&t.text).map(|pos| (i + pos, t)))
            .min_by_key(|(pos, t)| (*pos, std::cmp::Reverse(t.text.len())));

        match next {
            Some((start, term)) => {
                let end = start + term.text.len();
                out.push_str(&text[i..start]);
                out.push_str(term.color.ansi());
                out.push_str(&text[start..end]);
                out.push_str(RESET);
                i = end;
            }
            None => {
                out.push_str(&text[i..]);
                break;
            }
        }
    }

    out
}
