//! Error types
//!
//! Defines domain-specific error types for each layer of the proxy.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Primitive filesystem errors.
///
/// Raw OS failures with the name of the primitive that produced them. A
/// "not found" failure is still an `FsError`; callers whose contract treats
/// absence as a normal answer check `is_not_found` and translate it.
#[derive(Debug)]
pub struct FsError {
    op: &'static str,
    path: PathBuf,
    source: io::Error,
}

impl FsError {
    pub fn new(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.source.kind() == io::ErrorKind::NotFound
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error on {}: {}", self.op, self.path.display(), self.source)
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Path validation engine errors.
///
/// Raised when the resolution mechanism itself could not give an answer, as
/// opposed to answering "no".
#[derive(Debug)]
pub enum ValidationError {
    Spawn { program: String, source: io::Error },
    Failed { status: ExitStatus, output: String },
    Unparseable { output: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Spawn { program, source } => {
                write!(f, "Failed to run {}: {}", program, source)
            }
            ValidationError::Failed { status, output } => {
                write!(f, "Resolver exited with {}, returned output: {}", status, output)
            }
            ValidationError::Unparseable { output } => {
                write!(f, "Unrecognised resolver output: {}", output)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Request checks and operation preconditions rejected by the mediation layer.
#[derive(Debug, PartialEq)]
pub enum RequestError {
    EmptyPath,
    InvalidCharacters(String),
    NotAbsolute(String),
    PathTraversal(String),
    OutsideAllowedRoots(String),
    ProtectedRoot(String),
    LinkAlreadyExists(String),
    TargetNotFound(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::EmptyPath => write!(f, "Empty path"),
            RequestError::InvalidCharacters(p) => write!(f, "Invalid characters in path: {:?}", p),
            RequestError::NotAbsolute(p) => write!(f, "Path is not absolute: {}", p),
            RequestError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            RequestError::OutsideAllowedRoots(p) => {
                write!(f, "Path is outside the allowed roots: {}", p)
            }
            RequestError::ProtectedRoot(p) => write!(f, "Refusing to remove allowed root: {}", p),
            RequestError::LinkAlreadyExists(p) => write!(f, "Link path already exists: {}", p),
            RequestError::TargetNotFound(p) => write!(f, "Link target not found: {}", p),
        }
    }
}

impl std::error::Error for RequestError {}

/// Wire protocol errors
#[derive(Debug, PartialEq)]
pub enum ProtocolError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    TooManyArguments(String),
    InvalidFlag(String),
    UnterminatedQuote,
    RequestTooLong(usize),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownCommand(c) => write!(f, "Unknown command: {}", c),
            ProtocolError::MissingArgument(a) => write!(f, "Missing argument: {}", a),
            ProtocolError::TooManyArguments(c) => write!(f, "Too many arguments for {}", c),
            ProtocolError::InvalidFlag(v) => write!(f, "Expected true or false, got {}", v),
            ProtocolError::UnterminatedQuote => write!(f, "Unterminated quote"),
            ProtocolError::RequestTooLong(n) => write!(f, "Request exceeds {} bytes", n),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Client stub errors
#[derive(Debug)]
pub enum ClientError {
    Io(io::Error),
    InvalidArgument(String),
    ConnectionClosed,
    UnexpectedResponse(String),
    Remote { code: u16, message: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Io(e) => write!(f, "I/O error: {}", e),
            ClientError::InvalidArgument(a) => write!(f, "Cannot send argument: {:?}", a),
            ClientError::ConnectionClosed => write!(f, "Connection closed by server"),
            ClientError::UnexpectedResponse(r) => write!(f, "Unexpected response: {}", r),
            ClientError::Remote { code, message } => write!(f, "{} {}", code, message),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        ClientError::Io(error)
    }
}

/// General proxy error that encompasses all error types
#[derive(Debug)]
pub enum ProxyError {
    Fs(FsError),
    Validation(ValidationError),
    Request(RequestError),
    Protocol(ProtocolError),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::Fs(e) => write!(f, "Filesystem error: {}", e),
            ProxyError::Validation(e) => write!(f, "Validation error: {}", e),
            ProxyError::Request(e) => write!(f, "Request rejected: {}", e),
            ProxyError::Protocol(e) => write!(f, "Protocol error: {}", e),
        }
    }
}

impl std::error::Error for ProxyError {}

impl From<FsError> for ProxyError {
    fn from(error: FsError) -> Self {
        ProxyError::Fs(error)
    }
}

impl From<ValidationError> for ProxyError {
    fn from(error: ValidationError) -> Self {
        ProxyError::Validation(error)
    }
}

impl From<RequestError> for ProxyError {
    fn from(error: RequestError) -> Self {
        ProxyError::Request(error)
    }
}

impl From<ProtocolError> for ProxyError {
    fn from(error: ProtocolError) -> Self {
        ProxyError::Protocol(error)
    }
}
