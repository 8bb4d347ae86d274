pub mod logging;

pub use logging::{logging_middleware, to_response, ApiError};
