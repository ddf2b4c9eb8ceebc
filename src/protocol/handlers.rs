//! Request handlers
//!
//! Dispatches parsed requests to the mediation layer and turns the outcome
//! into a response line.

use log::debug;

use crate::error::ProxyError;
use crate::error::handlers::{error_to_code, handle_error};
use crate::mediation::FsProxy;
use crate::protocol::commands::{Request, parse_request};
use crate::protocol::responses::{self, format_response};

/// Represents the outcome status of handling a request.
#[derive(Debug, PartialEq)]
pub enum ResponseStatus {
    Success,
    Failure,
    CloseConnection,
}

/// Struct encapsulating the full result of a request.
#[derive(Debug)]
pub struct RequestResult {
    pub status: ResponseStatus,
    pub message: String,
}

impl RequestResult {
    fn success(message: String) -> Self {
        Self {
            status: ResponseStatus::Success,
            message,
        }
    }

    fn failure(err: ProxyError) -> Self {
        handle_error(&err);
        Self {
            status: ResponseStatus::Failure,
            message: format_response(error_to_code(&err), &err.to_string()),
        }
    }
}

/// Parses one request line and handles it.
///
/// Runs the proxy operation synchronously; callers on an async runtime
/// should invoke this on a blocking thread.
pub fn handle_line(proxy: &FsProxy, line: &str, max_request_length: usize) -> RequestResult {
    if line.len() > max_request_length {
        return RequestResult::failure(
            crate::error::ProtocolError::RequestTooLong(max_request_length).into(),
        );
    }

    match parse_request(line) {
        Ok(request) => handle_request(proxy, &request),
        Err(e) => RequestResult::failure(e.into()),
    }
}

/// Dispatches a parsed request to its operation.
pub fn handle_request(proxy: &FsProxy, request: &Request) -> RequestResult {
    debug!("Handling {}", request.verb());
    let outcome = match request {
        Request::PathExists(path) => proxy.path_exists(path).map(responses::boolean),
        Request::PathValid(path) => proxy.path_valid(path).map(responses::boolean),
        Request::Mkdir(path) => proxy.mkdir(path).map(|_| responses::ok()),
        Request::Rmdir { path, force } => proxy.rmdir(path, *force).map(|_| responses::ok()),
        Request::LinkPath { target, link } => {
            proxy.link_path(target, link).map(|_| responses::ok())
        }
        Request::IsMountPoint(path) => proxy.is_mount_point(path).map(responses::boolean),
        Request::Quit => {
            return RequestResult {
                status: ResponseStatus::CloseConnection,
                message: format_response(responses::GOODBYE, "Goodbye"),
            };
        }
    };

    match outcome {
        Ok(message) => RequestResult::success(message),
        Err(e) => RequestResult::failure(e),
    }
}
