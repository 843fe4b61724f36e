mod engine;
mod errors;
mod service;
mod service_builder;

pub use engine::{CancellationFlag, Engine, EngineError, Terminated};
pub use errors::Error;
pub use service::Service;
pub use service_builder::ServiceBuilder;
