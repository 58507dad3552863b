//! URL handling module for Sitegraph
//!
//! Every URL that enters the graph (the root, extracted child links and
//! post-redirect effective URLs) goes through the same rule set here, so that
//! differently spelled but equivalent URLs map to the same node.

mod canonical;
mod domain;
mod normalize;

pub use canonical::CanonicalUrl;
pub use domain::extract_domain;
pub use normalize::{canonicalize, is_valid, normalize, resolve};
