//! Answer region segmentation into list items

use regex::Regex;
use std::sync::OnceLock;

/// A list line from the answer region, bullet removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListItem {
    /// 1-based line number within the answer region
    pub line_number: usize,

    /// Line text after the bullet or enumeration
    pub text: String,

    /// True if the item appeared after the mandatory section closed
    pub after_break: bool,
}

fn bullet_regex() -> &'static Regex {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    BULLET.get_or_init(|| {
        Regex::new(r"^\s*(?:\d+[.)]\s*|[*\-•+]\s+)").expect("bullet pattern is valid")
    })
}

fn rationale_regex() -> &'static Regex {
    static RATIONALE: OnceLock<Regex> = OnceLock::new();
    RATIONALE.get_or_init(|| {
        Regex::new(r"(?i)^[*_`\s]*rationale[*_`\s]*:").expect("rationale pattern is valid")
    })
}

/// Split the answer region into list items
///
/// Non-list lines are ignored. The first blank line after at least one item
/// closes the mandatory section; afterwards only items that `keep_late`
/// accepts are returned, flagged with `after_break`.
pub(crate) fn list_items<F>(region: &str, keep_late: F) -> Vec<ListItem>
where
    F: Fn(&str) -> bool,
{
    let mut items = Vec::new();
    let mut mandatory = true;

    for (idx, line) in region.lines().enumerate() {
        if line.trim().is_empty() {
            if !items.is_empty() {
                mandatory = false;
            }
            continue;
        }

        let Some(bullet) = bullet_regex().find(line) else {
            continue;
        };
        let text = line[bullet.end()..].trim();
        if text.is_empty() || rationale_regex().is_match(text) {
            continue;
        }
        if !mandatory && !keep_late(text) {
            continue;
        }

        items.push(ListItem {
            line_number: idx + 1,
            text: text.to_string(),
            after_break: !mandatory,
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[ListItem]) -> Vec<&str> {
        items.iter().map(|i| i.text.as_str()).collect()
    }

    #[test]
    fn test_bullets_and_numbers() {
        let region = "\n1. Customer\n2) Order\n* Invoice\n- Product\n• Cart\n";
        let items = list_items(region, |_| false);
        assert_eq!(texts(&items), vec!["Customer", "Order", "Invoice", "Product", "Cart"]);
        assert_eq!(items[0].line_number, 2);
    }

    #[test]
    fn test_non_list_lines_ignored() {
        let region = "Here they are:\n1. Customer\nThis is prose.\n**Order**\n";
        let items = list_items(region, |_| true);
        assert_eq!(texts(&items), vec!["Customer"]);
    }

    #[test]
    fn test_numbers_without_space() {
        let region = "1.Customer\n2)Order\n**Bold** header\n*Invoice\n";
        let items = list_items(region, |_| true);
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Customer", "Order"]);
        assert_eq!(items[1].line_number, 2);
    }

    #[test]
    fn test_rationale_skipped() {
        let region = "1. Customer\n2. **Rationale:** because\n- Rationale: more\n3. Order\n";
        let items = list_items(region, |_| true);
        assert_eq!(texts(&items), vec!["Customer", "Order"]);
    }

    #[test]
    fn test_blank_line_closes_mandatory_section() {
        let region = "1. Customer\n2. Order\n\n3. Invoice (optional)\n4. Note\n";
        let items = list_items(region, |t| t.contains("(optional)"));
        assert_eq!(texts(&items), vec!["Customer", "Order", "Invoice (optional)"]);
        assert!(!items[1].after_break);
        assert!(items[2].after_break);
    }

    #[test]
    fn test_leading_blank_lines_do_not_close_section() {
        let region = "\n\n1. Customer\n";
        let items = list_items(region, |_| false);
        assert_eq!(items.len(), 1);
        assert!(!items[0].after_break);
    }

    #[test]
    fn test_empty_region() {
        assert!(list_items("", |_| true).is_empty());
    }
}
