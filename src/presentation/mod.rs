//! Presentation layer: endpoint handlers independent of any HTTP framework.

pub mod handlers;

pub use handlers::{Handlers, HandlerResponse, ResponseBody, Status};
