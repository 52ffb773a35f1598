//! # JSON-RPC Router Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use turul_json_rpc_router::prelude::*;
//! ```

pub use crate::config::{ParserConfig, RouterConfig};
pub use crate::decoder::{JsonDecoder, SerdeJsonDecoder};
pub use crate::error::{InvalidRequestError, InvalidRequestReason, PathError, RouterError};
pub use crate::parser::{ParsedRequests, RequestParser};
pub use crate::path::{PathComparison, RpcPath};
pub use crate::request::{RequestParams, RpcRequest};
pub use crate::route::{
    MethodDescriptor, ParameterDescriptor, ParameterKind, RouteTable, RouteTableBuilder,
    StaticRouteTable,
};
pub use crate::router::{RoutedRequest, RoutedRequests, RpcRouter};
pub use crate::types::{JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
