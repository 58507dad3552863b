//! Request pacing and crawl budgets
//!
//! This module handles:
//! - Enforcing a fixed politeness delay between consecutive outbound requests
//! - Counting requests issued during a run
//! - Node-count and wall-clock budgets that stop a crawl from growing

use std::time::{Duration, Instant};

/// Serial request pacer
///
/// Every outbound request (HEAD or GET) goes through [`Pacer::wait`], which
/// sleeps until at least `delay` has passed since the previous request.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last_request: Option<Instant>,
    requests: u64,
}

impl Pacer {
    /// Creates a new pacer
    ///
    /// # Arguments
    ///
    /// * `delay` - Minimum time between the starts of two requests
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
            requests: 0,
        }
    }

    /// Waits for the next request slot and claims it
    ///
    /// The first request is never delayed.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let ready_at = last + self.delay;
            let now = Instant::now();

            if ready_at > now {
                let wait = ready_at - now;
                tracing::trace!("Pacing: waiting {:?} before next request", wait);
                tokio::time::sleep(wait).await;
            }
        }

        self.last_request = Some(Instant::now());
        self.requests += 1;
    }

    /// Number of request slots claimed so far
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Limits on how far a single crawl run may grow
#[derive(Debug, Clone)]
pub struct CrawlBudget {
    max_nodes: Option<usize>,
    deadline: Option<Instant>,
}

impl CrawlBudget {
    /// Creates a budget starting now
    ///
    /// # Arguments
    ///
    /// * `max_nodes` - Maximum number of nodes in the graph, if any
    /// * `time_budget` - Wall-clock time after which no new expansion starts, if any
    pub fn new(max_nodes: Option<usize>, time_budget: Option<Duration>) -> Self {
        Self {
            max_nodes,
            deadline: time_budget.map(|budget| Instant::now() + budget),
        }
    }

    /// A budget that never runs out
    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    /// Whether the wall-clock budget has run out
    pub fn is_expired(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    /// Whether a graph that currently holds `node_count` nodes may grow by one
    pub fn allows_new_node(&self, node_count: usize) -> bool {
        if self.is_expired() {
            return false;
        }

        match self.max_nodes {
            Some(max) => node_count < max,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_not_delayed() {
        let mut pacer = Pacer::new(Duration::from_secs(5));
        let start = Instant::now();

        pacer.wait().await;

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(pacer.requests(), 1);
    }

    #[tokio::test]
    async fn test_consecutive_requests_are_spaced() {
        let delay = Duration::from_millis(50);
        let mut pacer = Pacer::new(delay);
        let start = Instant::now();

        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;

        assert!(start.elapsed() >= delay * 2);
        assert_eq!(pacer.requests(), 3);
    }

    #[tokio::test]
    async fn test_zero_delay() {
        let mut pacer = Pacer::new(Duration::ZERO);
        for _ in 0..10 {
            pacer.wait().await;
        }
        assert_eq!(pacer.requests(), 10);
        assert_eq!(pacer.delay(), Duration::ZERO);
    }

    #[test]
    fn test_unlimited_budget() {
        let budget = CrawlBudget::unlimited();
        assert!(!budget.is_expired());
        assert!(budget.allows_new_node(0));
        assert!(budget.allows_new_node(1_000_000));
    }

    #[test]
    fn test_node_budget() {
        let budget = CrawlBudget::new(Some(3), None);
        assert!(budget.allows_new_node(0));
        assert!(budget.allows_new_node(2));
        assert!(!budget.allows_new_node(3));
        assert!(!budget.allows_new_node(4));
    }

    #[test]
    fn test_time_budget_expires() {
        let budget = CrawlBudget::new(None, Some(Duration::ZERO));
        assert!(budget.is_expired());
        assert!(!budget.allows_new_node(0));

        let budget = CrawlBudget::new(None, Some(Duration::from_secs(3600)));
        assert!(!budget.is_expired());
        assert!(budget.allows_new_node(0));
    }
}
