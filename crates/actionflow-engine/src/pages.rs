//! Page lookup by name.

use crate::types::Page;

/// Find the page whose name equals `name` exactly (case-sensitive).
///
/// Scans left to right and returns the first match, so duplicate names
/// resolve to the earliest page in the list.
pub fn resolve_page<'a>(name: &str, pages: &'a [Page]) -> Option<&'a Page> {
    pages.iter().find(|page| page.page_name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<Page> {
        vec![
            Page::new("p1", "Home"),
            Page::new("p2", "Settings"),
            Page::new("p3", "Home"),
        ]
    }

    #[test]
    fn exact_match() {
        let pages = pages();
        let page = resolve_page("Settings", &pages).unwrap();
        assert_eq!(page.page_id, "p2");
    }

    #[test]
    fn duplicates_resolve_to_first() {
        let pages = pages();
        assert_eq!(resolve_page("Home", &pages).unwrap().page_id, "p1");
    }

    #[test]
    fn no_normalization() {
        let pages = pages();
        assert!(resolve_page("home", &pages).is_none());
        assert!(resolve_page(" Home", &pages).is_none());
        assert!(resolve_page("Hom", &pages).is_none());
    }

    #[test]
    fn empty_list() {
        assert!(resolve_page("Home", &[]).is_none());
    }
}
