pub mod contract;
pub mod dispatch;
pub mod dummy;
pub mod registry;
pub mod sanitize_headers;

pub use contract::*;
pub use dispatch::*;
pub use registry::*;
