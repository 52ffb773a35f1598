//! # Request Routing
//!
//! [`RpcRouter`] is the entry point a host calls with the URL path a request
//! arrived on and its body. It strips the configured base path, parses the
//! body and resolves every request against the route table. Invoking the
//! resolved methods and writing responses stay with the host.

use tracing::{debug, warn};

use crate::config::RouterConfig;
use crate::decoder::{JsonDecoder, SerdeJsonDecoder};
use crate::error::{JsonRpcErrorObject, RouteError, RouterError};
use crate::parser::RequestParser;
use crate::path::RpcPath;
use crate::request::RpcRequest;
use crate::route::{MethodDescriptor, RouteTable};

/// A parsed request together with the method it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedRequest<'t> {
    pub request: RpcRequest,
    pub method: Option<&'t MethodDescriptor>,
}

impl RoutedRequest<'_> {
    pub fn is_resolved(&self) -> bool {
        self.method.is_some()
    }

    /// The error object to answer an unresolved request with.
    ///
    /// `None` when the method resolved, or when the request is a notification
    /// and therefore gets no response.
    pub fn unresolved_error(&self) -> Option<JsonRpcErrorObject> {
        if self.method.is_some() || self.request.is_notification() {
            return None;
        }
        Some(JsonRpcErrorObject::method_not_found(&self.request.method))
    }
}

/// Outcome of routing one request document.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedRequests<'t> {
    /// Route path after removing the base path
    pub path: RpcPath,
    pub requests: Vec<RoutedRequest<'t>>,
    pub is_batch: bool,
}

impl<'t> RoutedRequests<'t> {
    pub fn resolved(&self) -> impl Iterator<Item = (&RpcRequest, &'t MethodDescriptor)> + '_ {
        self.requests
            .iter()
            .filter_map(|r| r.method.map(|m| (&r.request, m)))
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &RpcRequest> {
        self.requests
            .iter()
            .filter(|r| r.method.is_none())
            .map(|r| &r.request)
    }
}

/// Parses request documents and resolves them against a route table.
#[derive(Debug, Clone)]
pub struct RpcRouter<T, D = SerdeJsonDecoder> {
    table: T,
    parser: RequestParser<D>,
    config: RouterConfig,
}

impl<T: RouteTable> RpcRouter<T> {
    /// Fails when `config.comparison` disagrees with the table's comparison.
    pub fn new(table: T, config: RouterConfig) -> Result<Self, RouterError> {
        if table.comparison() != config.comparison {
            return Err(RouteError::ComparisonMismatch {
                table: table.comparison(),
                router: config.comparison,
            }
            .into());
        }
        Ok(Self {
            parser: RequestParser::new(config.parser.clone()),
            table,
            config,
        })
    }
}

impl<T: RouteTable, D: JsonDecoder> RpcRouter<T, D> {
    /// Replace the JSON decoder used for request bodies.
    pub fn with_decoder<D2: JsonDecoder>(self, decoder: D2) -> RpcRouter<T, D2> {
        RpcRouter {
            parser: RequestParser::with_decoder(self.config.parser.clone(), decoder),
            table: self.table,
            config: self.config,
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn parser(&self) -> &RequestParser<D> {
        &self.parser
    }

    /// Map a URL path onto a route path by removing the configured base.
    pub fn route_path(&self, url_path: &str) -> Result<RpcPath, RouterError> {
        let full = RpcPath::parse(url_path)?;
        full.strip_base(&self.config.base_path, self.config.comparison)
            .ok_or_else(|| RouterError::PathOutsideBase {
                path: full.clone(),
                base: self.config.base_path.clone(),
            })
    }

    /// Resolve one request on an already-computed route path.
    pub fn resolve(&self, path: &RpcPath, request: &RpcRequest) -> Option<&MethodDescriptor> {
        let method = self.table.lookup(path, &request.method);
        match method {
            Some(_) => debug!(path = %path, method = %request.method, "Resolved RPC method"),
            None => warn!(path = %path, method = %request.method, "RPC method not found"),
        }
        method
    }

    /// Parse `body` and resolve every request in it against `url_path`.
    pub fn route(&self, url_path: &str, body: &str) -> Result<RoutedRequests<'_>, RouterError> {
        let path = self.route_path(url_path)?;
        let parsed = self.parser.parse_requests(body)?;
        let is_batch = parsed.is_batch;

        let requests = parsed
            .into_iter()
            .map(|request| RoutedRequest {
                method: self.resolve(&path, &request),
                request,
            })
            .collect();

        Ok(RoutedRequests {
            path,
            requests,
            is_batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathComparison;
    use crate::route::{RouteTableBuilder, StaticRouteTable};
    use crate::types::RequestId;

    fn table() -> StaticRouteTable {
        RouteTableBuilder::new()
            .route(
                RpcPath::parse("/math").unwrap(),
                None,
                vec![MethodDescriptor::new("add", "i64")],
            )
            .base_method(MethodDescriptor::new("ping", "string"))
            .build()
            .unwrap()
    }

    fn router() -> RpcRouter<StaticRouteTable> {
        let config = RouterConfig::default().with_base_path(RpcPath::parse("/rpc").unwrap());
        RpcRouter::new(table(), config).unwrap()
    }

    #[test]
    fn test_route_path_strips_base() {
        let router = router();
        assert_eq!(router.route_path("/rpc/math").unwrap(), RpcPath::parse("math").unwrap());
        assert!(router.route_path("/RPC").unwrap().is_root());
        assert!(matches!(
            router.route_path("/other/math"),
            Err(RouterError::PathOutsideBase { .. })
        ));
        assert!(matches!(router.route_path("/rpc//x"), Err(RouterError::Path(_))));
    }

    #[test]
    fn test_route_single_request() {
        let router = router();
        let routed = router
            .route(
                "/rpc/math",
                r#"{"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 1}"#,
            )
            .unwrap();

        assert!(!routed.is_batch);
        assert_eq!(routed.requests.len(), 1);
        assert_eq!(routed.requests[0].method.map(|m| m.name.as_str()), Some("add"));
        assert_eq!(routed.resolved().count(), 1);
    }

    #[test]
    fn test_route_batch_with_unknown_method() {
        let router = router();
        let routed = router
            .route(
                "/rpc",
                r#"[{"jsonrpc": "2.0", "method": "ping", "id": 1},
                    {"jsonrpc": "2.0", "method": "add", "id": 2},
                    {"jsonrpc": "2.0", "method": "add"}]"#,
            )
            .unwrap();

        assert!(routed.is_batch);
        assert!(routed.requests[0].is_resolved());
        assert!(!routed.requests[1].is_resolved());

        let error = routed.requests[1].unresolved_error().unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method 'add' not found");

        // Notifications never get an error response
        assert!(routed.requests[2].unresolved_error().is_none());

        let unresolved: Vec<_> = routed.unresolved().map(|r| r.id.clone()).collect();
        assert_eq!(unresolved, [Some(RequestId::Number(2)), None]);
    }

    #[test]
    fn test_route_invalid_body() {
        let err = router().route("/rpc", "{}").unwrap_err();
        assert!(matches!(err, RouterError::Request(_)));
        assert_eq!(err.to_error_object().code, -32600);
    }

    #[test]
    fn test_batch_limit_from_router_config() {
        let config = RouterConfig::default().with_batch_request_limit(1);
        let router = RpcRouter::new(table(), config).unwrap();
        let err = router
            .route(
                "/",
                r#"[{"jsonrpc": "2.0", "method": "ping"}, {"jsonrpc": "2.0", "method": "ping"}]"#,
            )
            .unwrap_err();
        assert!(matches!(err, RouterError::Request(_)));
    }

    #[test]
    fn test_with_decoder() {
        let router = RpcRouter::new(table(), RouterConfig::default())
            .unwrap()
            .with_decoder(|text: &str| -> Result<serde_json::Value, String> {
                serde_json::from_str(text.trim_end_matches('\0')).map_err(|e| e.to_string())
            });
        let routed = router
            .route("/", "{\"jsonrpc\": \"2.0\", \"method\": \"ping\", \"id\": 3}\0")
            .unwrap();
        assert!(routed.requests[0].is_resolved());
    }

    #[test]
    fn test_comparison_mismatch_rejected() {
        let config = RouterConfig::default().with_comparison(PathComparison::Ordinal);
        let err = RpcRouter::new(table(), config).unwrap_err();
        assert!(matches!(
            err,
            RouterError::Route(RouteError::ComparisonMismatch {
                table: PathComparison::IgnoreCase,
                router: PathComparison::Ordinal,
            })
        ));
    }

    #[test]
    fn test_ordinal_router_matches_exactly() {
        let table = RouteTableBuilder::new()
            .comparison(PathComparison::Ordinal)
            .route(
                RpcPath::parse("/math").unwrap(),
                None,
                vec![MethodDescriptor::new("add", "i64")],
            )
            .build()
            .unwrap();
        let config = RouterConfig::default()
            .with_base_path(RpcPath::parse("/rpc").unwrap())
            .with_comparison(PathComparison::Ordinal);
        let router = RpcRouter::new(table, config).unwrap();

        let body = r#"{"jsonrpc": "2.0", "method": "ADD", "id": 1}"#;
        let routed = router.route("/rpc/MATH", body).unwrap();
        assert!(!routed.requests[0].is_resolved());

        let body = r#"{"jsonrpc": "2.0", "method": "add", "id": 1}"#;
        assert!(router.route("/rpc/math", body).unwrap().requests[0].is_resolved());
        assert!(matches!(
            router.route("/RPC/math", body),
            Err(RouterError::PathOutsideBase { .. })
        ));
    }
}
