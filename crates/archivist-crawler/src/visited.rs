//! Concurrent visited-URL set (spec §4.3 "unseen -> fetching ->
//! (stored|failed)"), shared across the worker pool.

use dashmap::DashSet;

#[derive(Default)]
pub struct VisitedUrls {
    seen: DashSet<String>,
}

impl VisitedUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically check-and-mark: returns `true` the first time a URL is
    /// seen, `false` on every subsequent call for the same URL.
    pub fn mark(&self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_a_url_only_once() {
        let visited = VisitedUrls::new();
        assert!(visited.mark("https://example.com/a"));
        assert!(!visited.mark("https://example.com/a"));
        assert!(visited.mark("https://example.com/b"));
        assert_eq!(visited.len(), 2);
    }
}
