pub mod health;
pub mod invoke;

pub use health::health_handler;
pub use invoke::{InvocationError, InvokeRequest, InvokeResponse, invoke_handler};
