//! Catalog data types

use chrono::{DateTime, Utc};

/// One upstream catalog item. Immutable once fetched; identity is
/// `(contest_id, index)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub contest_id: i64,
    pub index: String,
    pub name: String,
    pub rating: Option<i64>,
    pub tags: Vec<String>,
}

impl CatalogItem {
    pub fn url(&self) -> String {
        format!(
            "https://codeforces.com/problemset/problem/{}/{}",
            self.contest_id, self.index
        )
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// A full point-in-time copy of the catalog. Replaced wholesale on refresh,
/// never mutated in place.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub items: Vec<CatalogItem>,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_points_at_the_problem() {
        let item = CatalogItem {
            contest_id: 1842,
            index: "C".to_string(),
            name: "Tenzing and Balls".to_string(),
            rating: Some(1600),
            tags: vec!["dp".to_string()],
        };
        assert_eq!(
            item.url(),
            "https://codeforces.com/problemset/problem/1842/C"
        );
    }

    #[test]
    fn tag_match_is_case_insensitive() {
        let item = CatalogItem {
            contest_id: 1,
            index: "A".to_string(),
            name: "Theatre Square".to_string(),
            rating: Some(1000),
            tags: vec!["Math".to_string()],
        };
        assert!(item.has_tag("math"));
        assert!(item.has_tag("MATH"));
        assert!(!item.has_tag("dp"));
    }
}
