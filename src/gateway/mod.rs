pub mod cache;
pub mod http;
pub mod memory;
pub mod reachability;
pub mod traits;

pub use cache::*;
pub use http::*;
pub use memory::*;
pub use reachability::*;
pub use traits::*;
