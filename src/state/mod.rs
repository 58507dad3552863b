//! State module for tracking how far each page got
//!
//! Every node in the graph ends a crawl with exactly one `PageState` that
//! records why it has (or does not have) outgoing edges.

mod page_state;

pub use page_state::PageState;
