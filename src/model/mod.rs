pub mod category;
pub mod common;
pub mod property;
pub mod response;
pub mod selection;
pub mod snapshot;

pub use category::*;
pub use common::*;
pub use property::*;
pub use response::*;
pub use selection::*;
pub use snapshot::*;
