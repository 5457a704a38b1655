pub mod engine;
pub mod selector;
pub mod session;
pub mod validate;

pub use engine::*;
pub use selector::*;
pub use session::*;
pub use validate::*;
