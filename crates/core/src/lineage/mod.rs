mod inbreeding;
mod traversal;

pub use inbreeding::inbreeding_coefficient;
pub use traversal::{ancestor_traits, collect_ancestors, AncestorHop};
