//! Page graph module
//!
//! Owns the in-memory link graph built during a crawl: one node per canonical
//! URL, directed edges from a page to the pages it links to.

mod store;

pub use store::{NodeIndex, PageGraph, PageNode};
