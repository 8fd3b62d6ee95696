// Application layer - use cases and orchestration on top of the repository.

pub mod error;
pub mod reporting;
mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
