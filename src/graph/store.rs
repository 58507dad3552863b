//! Page graph store
//!
//! Bidirectional mapping between canonical URL and a stable node index, plus
//! the node records themselves. Indices are handed out monotonically and are
//! never reused, so they stay valid for the lifetime of a crawl run.

use crate::state::PageState;
use crate::url::CanonicalUrl;
use std::collections::HashMap;

/// Stable identity of a page node
pub type NodeIndex = usize;

/// A crawled (or discovered) page
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    index: NodeIndex,
    depth: u32,
    children: Vec<NodeIndex>,
    state: PageState,
    error: Option<String>,
}

impl PageNode {
    fn new(index: NodeIndex, depth: u32) -> Self {
        Self {
            index,
            depth,
            children: Vec::new(),
            state: PageState::Discovered,
            error: None,
        }
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Remaining hop budget recorded when the node was created
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Indices of the pages this page links to, in discovery order
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Diagnostic message for nodes that failed to expand
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Records the final outcome of expanding this node
    pub fn set_state(&mut self, state: PageState, error: Option<String>) {
        self.state = state;
        self.error = error;
    }
}

/// The graph of pages discovered during one crawl run
#[derive(Debug, Clone, Default)]
pub struct PageGraph {
    url_to_index: HashMap<CanonicalUrl, NodeIndex>,
    index_to_url: Vec<CanonicalUrl>,
    nodes: Vec<PageNode>,
}

impl PageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `url`, creating it if this is the first encounter
    ///
    /// `depth` is only used when the node is created; an existing node keeps
    /// the depth it was created with.
    pub fn get_or_create(&mut self, url: &CanonicalUrl, depth: u32) -> NodeIndex {
        self.insert(url, depth).0
    }

    /// Like [`get_or_create`](Self::get_or_create), also reporting whether a
    /// node was created
    pub fn insert(&mut self, url: &CanonicalUrl, depth: u32) -> (NodeIndex, bool) {
        if let Some(&index) = self.url_to_index.get(url) {
            return (index, false);
        }

        let index = self.nodes.len();
        self.url_to_index.insert(url.clone(), index);
        self.index_to_url.push(url.clone());
        self.nodes.push(PageNode::new(index, depth));

        (index, true)
    }

    pub fn exists(&self, url: &CanonicalUrl) -> bool {
        self.url_to_index.contains_key(url)
    }

    pub fn index_of(&self, url: &CanonicalUrl) -> Option<NodeIndex> {
        self.url_to_index.get(url).copied()
    }

    pub fn url_of(&self, index: NodeIndex) -> Option<&CanonicalUrl> {
        self.index_to_url.get(index)
    }

    pub fn get(&self, index: NodeIndex) -> Option<&PageNode> {
        self.nodes.get(index)
    }

    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut PageNode> {
        self.nodes.get_mut(index)
    }

    /// Appends a directed edge `from -> to`
    ///
    /// Not deduplicated here; callers avoid adding the same child twice for
    /// one page. Returns false if either index is unknown.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        if to >= self.nodes.len() {
            return false;
        }

        match self.nodes.get_mut(from) {
            Some(node) => {
                node.children.push(to);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    /// Iterates nodes in index order together with their URLs
    pub fn nodes(&self) -> impl Iterator<Item = (&CanonicalUrl, &PageNode)> {
        self.index_to_url.iter().zip(self.nodes.iter())
    }

    /// Iterates all edges as `(from, to)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.nodes
            .iter()
            .flat_map(|node| node.children.iter().map(move |&child| (node.index, child)))
    }
}
