pub mod builder;
pub mod listing;
pub mod scan;
pub mod tree;

pub use builder::*;
pub use listing::{Entry, Group, Listing, Trace, WEIGHT_FILE_EXTENSION, WeightDeclaration};
pub use scan::*;
pub use tree::*;
