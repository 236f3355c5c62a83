use crate::canonical::is_binary;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// A URL waiting to be fetched, with its link distance from the start page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

/// FIFO queue of pages to visit plus the visited set that gates it.
///
/// A URL is marked visited when it is first enqueued, so it can sit in the
/// queue at most once no matter how many pages link to it.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    max_depth: usize,
}

impl Frontier {
    pub fn new(max_depth: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Enqueue the start page at depth 0.
    pub fn seed(&mut self, url: String) -> bool {
        self.push(url, 0)
    }

    /// Enqueue `url` unless it was seen before or lies beyond the depth bound.
    pub fn push(&mut self, url: String, depth: usize) -> bool {
        if depth > self.max_depth {
            return false;
        }
        if !self.visited.insert(url.clone()) {
            return false;
        }
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Next entry eligible for fetching, in discovery order.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        while let Some(entry) = self.queue.pop_front() {
            if entry.depth > self.max_depth {
                debug!("Skipping {} (depth {})", entry.url, entry.depth);
                continue;
            }
            if is_binary(&entry.url) {
                debug!("Skipping binary {}", entry.url);
                continue;
            }
            return Some(entry);
        }
        None
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
