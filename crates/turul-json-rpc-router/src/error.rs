use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::path::{PathComparison, RpcPath};

/// JSON-RPC error codes
///
/// Parsing and routing never produce `InvalidParams`. It completes the table
/// for hosts that bind parameters against a resolved method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => crate::error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => crate::error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => crate::error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => crate::error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => crate::error_codes::INTERNAL_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC Error object
///
/// The `error` member of a response envelope. Building the envelope is left to
/// the host; this crate only maps its own failures onto the standard codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::ParseError, None, data)
    }

    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidRequest, None, data)
    }

    /// For hosts whose parameter binding fails against a resolved method
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidParams, Some(message.into()), None)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            JsonRpcErrorCode::MethodNotFound,
            Some(format!("Method '{}' not found", method)),
            None,
        )
    }
}

/// Malformed route path syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Invalid path '{path}': empty segment at position {position}")]
    EmptySegment { path: String, position: usize },

    #[error("Invalid path '{path}': reserved character {character:?}")]
    ReservedCharacter { path: String, character: char },
}

/// Why a request document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequestReason {
    #[error("request body is empty")]
    EmptyInput,

    #[error("request body is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("top-level JSON value must be an object or an array")]
    NotAnObjectOrArray,

    #[error("batch request must contain at least one request")]
    EmptyBatch,

    #[error("batch of {len} requests exceeds the limit of {limit}")]
    BatchTooLarge { len: usize, limit: usize },

    #[error("request must be a JSON object")]
    NotAnObject,

    #[error("missing 'jsonrpc' member")]
    MissingVersion,

    #[error("unsupported 'jsonrpc' version {0}")]
    UnsupportedVersion(String),

    #[error("missing 'method' member")]
    MissingMethod,

    #[error("'method' must be a non-empty string")]
    InvalidMethod,

    #[error("'id' must be an integer or a string, got {0}")]
    InvalidId(String),

    #[error("'params' must be an array or an object, got {0}")]
    InvalidParams(String),
}

/// A JSON-RPC structural violation.
///
/// `index` names the offending element when the document is a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRequestError {
    pub reason: InvalidRequestReason,
    pub index: Option<usize>,
}

impl InvalidRequestError {
    pub fn new(reason: InvalidRequestReason) -> Self {
        Self {
            reason,
            index: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// The JSON-RPC code a host should report for this failure.
    pub fn code(&self) -> JsonRpcErrorCode {
        match self.reason {
            InvalidRequestReason::MalformedJson(_) => JsonRpcErrorCode::ParseError,
            _ => JsonRpcErrorCode::InvalidRequest,
        }
    }

    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        let mut data = json!({ "reason": self.reason.to_string() });
        if let Some(index) = self.index {
            data["index"] = json!(index);
        }
        JsonRpcErrorObject::new(self.code(), None, Some(data))
    }
}

impl From<InvalidRequestReason> for InvalidRequestError {
    fn from(reason: InvalidRequestReason) -> Self {
        Self::new(reason)
    }
}

impl fmt::Display for InvalidRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "Invalid request at batch index {}: {}", index, self.reason),
            None => write!(f, "Invalid request: {}", self.reason),
        }
    }
}

impl std::error::Error for InvalidRequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

/// Route registration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Method '{method}' is registered twice on route '{path}'")]
    DuplicateMethod { path: RpcPath, method: String },

    #[error("Method name must not be empty (route '{0}')")]
    EmptyMethodName(RpcPath),

    #[error("Route table compares with {table:?} but the router is configured for {router:?}")]
    ComparisonMismatch {
        table: PathComparison,
        router: PathComparison,
    },
}

/// Top-level router errors
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Request(#[from] InvalidRequestError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Path '{path}' is outside the base path '{base}'")]
    PathOutsideBase { path: RpcPath, base: RpcPath },
}

impl RouterError {
    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            RouterError::Request(e) => e.to_error_object(),
            RouterError::Path(_) | RouterError::PathOutsideBase { .. } => {
                JsonRpcErrorObject::invalid_request(Some(json!({ "reason": self.to_string() })))
            }
            RouterError::Route(e) => JsonRpcErrorObject::new(
                JsonRpcErrorCode::InternalError,
                Some(e.to_string()),
                None,
            ),
        }
    }
}
