//! # JSON-RPC 2.0 Request Router
//!
//! Transport-agnostic ingestion and routing for JSON-RPC 2.0. Raw request
//! text becomes validated [`RpcRequest`]s, and each request is resolved to a
//! registered [`MethodDescriptor`] by route path and method name.
//!
//! ## Features
//! - Single and batch requests with all-or-nothing validation
//! - Exact request ids: integers never pass through floating point
//! - Hierarchical, case-insensitive route paths with composition
//! - Route tables built once by explicit registration
//! - Pluggable JSON decoding
//!
//! ## Quick Start
//!
//! ```rust
//! use turul_json_rpc_router::prelude::*;
//!
//! let table = RouteTableBuilder::new()
//!     .route(
//!         RpcPath::parse("/math").unwrap(),
//!         None,
//!         vec![MethodDescriptor::new("subtract", "i64")],
//!     )
//!     .build()
//!     .unwrap();
//!
//! let router = RpcRouter::new(table, RouterConfig::default()).unwrap();
//! let routed = router
//!     .route(
//!         "/math",
//!         r#"{"jsonrpc": "2.0", "method": "subtract", "params": [42, 23], "id": 1}"#,
//!     )
//!     .unwrap();
//!
//! assert!(!routed.is_batch);
//! assert_eq!(routed.requests[0].request.id, Some(RequestId::Number(1)));
//! assert!(routed.requests[0].is_resolved());
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod parser;
pub mod path;
pub mod request;
pub mod route;
pub mod router;
pub mod types;

pub mod prelude;

// Re-export main types
pub use config::{ParserConfig, RouterConfig};
pub use decoder::{JsonDecoder, SerdeJsonDecoder};
pub use error::{
    InvalidRequestError, InvalidRequestReason, JsonRpcErrorCode, JsonRpcErrorObject, PathError,
    RouteError, RouterError,
};
pub use parser::{ParsedRequests, RequestParser};
pub use path::{PathComparison, RpcPath};
pub use request::{RequestParams, RpcRequest};
pub use route::{
    MethodDescriptor, ParameterDescriptor, ParameterKind, RouteInfo, RouteTable,
    RouteTableBuilder, StaticRouteTable,
};
pub use router::{RoutedRequest, RoutedRequests, RpcRouter};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Result type for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

/// Standard JSON-RPC 2.0 error codes
///
/// `INVALID_PARAMS` is for hosts binding parameters; the router never reports
/// it.
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}
