//! Crawl frontier
//!
//! Tracks every URL seen so far, which of them have been handed out in a
//! batch, and the page each one was first found on.
//!
//! Invariants:
//! - `visited` is a subset of `discovered`
//! - every discovered URL has exactly one origin, set on first discovery

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
pub struct Frontier {
    discovered: BTreeSet<String>,
    visited: BTreeSet<String>,
    origins: HashMap<String, String>,
}

impl Frontier {
    /// Creates a frontier holding only the root, which is its own origin
    pub fn new(root: &str) -> Self {
        let mut frontier = Self {
            discovered: BTreeSet::new(),
            visited: BTreeSet::new(),
            origins: HashMap::new(),
        };
        frontier.discover(root, root);
        frontier
    }

    /// Records a link found on `origin`
    ///
    /// Returns true if the URL was not known before. Known URLs keep their
    /// first origin.
    pub fn discover(&mut self, url: &str, origin: &str) -> bool {
        if !self.discovered.insert(url.to_string()) {
            return false;
        }
        self.origins
            .entry(url.to_string())
            .or_insert_with(|| origin.to_string());
        true
    }

    /// Takes up to `size` unvisited URLs and marks them visited
    pub fn next_batch(&mut self, size: usize) -> Vec<String> {
        let batch: Vec<String> = self
            .discovered
            .difference(&self.visited)
            .take(size)
            .cloned()
            .collect();

        self.visited.extend(batch.iter().cloned());
        batch
    }

    /// The page a URL was first found on
    pub fn origin_of(&self, url: &str) -> Option<&str> {
        self.origins.get(url).map(String::as_str)
    }

    /// True once every discovered URL has been visited
    pub fn is_exhausted(&self) -> bool {
        self.discovered.len() == self.visited.len()
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.discovered.len() - self.visited.len()
    }
}
