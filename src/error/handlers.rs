//! Error handlers
//!
//! Maps proxy errors to log output and wire response codes.

use crate::error::types::ProxyError;
use crate::protocol::responses;
use log::{error, warn};

/// Log a proxy error at the level its category deserves
pub fn handle_error(err: &ProxyError) {
    match err {
        ProxyError::Fs(_) | ProxyError::Validation(_) => error!("{}", err),
        ProxyError::Request(_) | ProxyError::Protocol(_) => warn!("{}", err),
    }
}

/// Convert error to response code
pub fn error_to_code(err: &ProxyError) -> u16 {
    match err {
        ProxyError::Request(_) => responses::REQUEST_REJECTED,
        ProxyError::Validation(_) => responses::VALIDATION_FAILED,
        ProxyError::Fs(_) => responses::FILESYSTEM_ERROR,
        ProxyError::Protocol(crate::error::ProtocolError::UnknownCommand(_)) => {
            responses::UNKNOWN_COMMAND
        }
        ProxyError::Protocol(_) => responses::SYNTAX_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FsError, ProtocolError, RequestError};
    use std::io;
    use std::path::Path;

    #[test]
    fn codes_follow_error_category() {
        let fs = ProxyError::from(FsError::new(
            "rmdir",
            Path::new("/x"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        ));
        assert_eq!(error_to_code(&fs), 550);
        assert_eq!(error_to_code(&RequestError::EmptyPath.into()), 450);
        assert_eq!(
            error_to_code(&ProtocolError::UnknownCommand("FOO".into()).into()),
            500
        );
        assert_eq!(
            error_to_code(&ProtocolError::MissingArgument("path").into()),
            501
        );
    }
}
