use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = start.elapsed();
    match response.extensions().get::<Result<(), ApiError>>() {
        Some(Ok(())) => info!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            "Processed request"
        ),
        Some(Err(value)) => warn!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            value = %value,
            "Failed to process request"
        ),
        None => debug!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            "Processed request, but no Response extension is set"
        ),
    }

    response
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to {operation}: {message}")]
    ActionFailed {
        operation: &'static str,
        message: String,
    },
    #[error("Failed to validate: {0}")]
    ValidationFail(String),
}

pub fn to_response<T: IntoResponse>(
    response: T,               //The response that we are sending + StatusCode
    ext: Result<(), ApiError>, //The extension, that we want to give logging middleware
) -> Response {
    let mut response = response.into_response();

    response.extensions_mut().insert(ext);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn response_carries_the_outcome() {
        let err = ApiError::NotFound("No product with 9 id was found.".into());
        let response = to_response(StatusCode::NOT_FOUND, Err(err.clone()));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.extensions().get::<Result<(), ApiError>>(),
            Some(&Err(err))
        );
    }

    #[test]
    fn action_failures_name_the_operation() {
        let err = ApiError::ActionFailed {
            operation: "update_order",
            message: "Cannot move order from pending to shipped".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to update_order: Cannot move order from pending to shipped"
        );
    }
}
