//! Request Routing Example
//!
//! Registers a small calculator API, loads router configuration from JSON and
//! routes a handful of request documents, printing how each one resolves.
//!
//! Run with `RUST_LOG=debug` to see the parser and router logs.

use anyhow::Result;
use tracing::info;
use turul_json_rpc_router::prelude::*;

fn build_table() -> Result<StaticRouteTable> {
    let operands = || {
        vec![
            ParameterDescriptor::new("a", ParameterKind::Number),
            ParameterDescriptor::new("b", ParameterKind::Number),
        ]
    };

    let mut add = MethodDescriptor::new("add", "f64").with_annotation("Sum of a and b");
    add.parameters = operands();
    let mut subtract = MethodDescriptor::new("subtract", "f64");
    subtract.parameters = operands();

    let table = RouteTableBuilder::new()
        .route(RpcPath::parse("/calculator")?, Some("Arithmetic"), vec![add, subtract])
        .base_method(MethodDescriptor::new("ping", "string"))
        .base_method(
            MethodDescriptor::new("schedule", "bool").with_parameter(
                ParameterDescriptor::new("at", ParameterKind::DateTime).with_annotation("ISO-8601"),
            ),
        )
        .build()?;
    Ok(table)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config: RouterConfig = serde_json::from_str(
        r#"{"base_path": "/rpc", "parser": {"batch_request_limit": 16}}"#,
    )?;
    let router = RpcRouter::new(build_table()?, config)?;

    info!("Registered routes:");
    for route in router.table().route_infos() {
        let path = route.path.map_or_else(|| "<base>".to_string(), |p| p.to_string());
        let methods: Vec<_> = route.methods.iter().map(|m| m.name.as_str()).collect();
        info!("  {} -> {:?}", path, methods);
    }

    let documents = [
        (
            "/rpc/calculator",
            r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": 5, "b": 3}, "id": 1}"#,
        ),
        (
            "/rpc/Calculator",
            r#"[{"jsonrpc": "2.0", "method": "Subtract", "params": [10, 4], "id": "two"},
                {"jsonrpc": "2.0", "method": "multiply", "params": [2, 3], "id": 3}]"#,
        ),
        (
            "/rpc",
            r#"{"jsonrpc": "2.0", "method": "schedule", "params": ["2000-12-15T22:11:03"]}"#,
        ),
        ("/rpc", r#"{"jsonrpc": "1.0", "method": "ping", "id": 4}"#),
        ("/elsewhere", r#"{"jsonrpc": "2.0", "method": "ping", "id": 5}"#),
    ];

    for (i, (url_path, body)) in documents.iter().enumerate() {
        println!("\n--- Document {} ({}) ---", i + 1, url_path);
        match router.route(url_path, body) {
            Ok(routed) => {
                println!("route path: {}, batch: {}", routed.path, routed.is_batch);
                for entry in &routed.requests {
                    let id = entry
                        .request
                        .id
                        .as_ref()
                        .map_or_else(|| "notification".to_string(), |id| id.to_string());
                    match (entry.method, entry.unresolved_error()) {
                        (Some(method), _) => println!(
                            "  [{}] {} -> {} ({} params)",
                            id,
                            entry.request.method,
                            method.return_type,
                            entry.request.params.len()
                        ),
                        (None, Some(error)) => {
                            println!("  [{}] {}", id, serde_json::to_string(&error)?)
                        }
                        (None, None) => println!("  [{}] dropped unknown notification", id),
                    }
                }
            }
            Err(e) => {
                println!("rejected: {}", e);
                println!("error object: {}", serde_json::to_string(&e.to_error_object())?);
            }
        }
    }

    Ok(())
}
