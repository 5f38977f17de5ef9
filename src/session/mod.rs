pub mod denylist;
pub mod har;
pub mod request;

pub use denylist::*;
pub use har::*;
pub use request::*;
