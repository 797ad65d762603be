pub mod breeding;
pub mod engine;
pub mod error;
pub mod lineage;
pub mod model;
pub mod registry;
pub mod snapshot;
pub mod types;

pub use error::{GeneticsError, Result};
