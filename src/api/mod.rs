pub mod handlers;
pub mod routes;
pub mod service;

pub use handlers::*;
pub use routes::*;
pub use service::*;
