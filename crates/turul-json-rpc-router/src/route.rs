//! # Route Table
//!
//! Maps an [`RpcPath`] and a method name to the [`MethodDescriptor`] a host
//! dispatches to. Tables are built once by explicit registration and are
//! read-only afterwards.
//!
//! ```rust
//! use turul_json_rpc_router::{
//!     MethodDescriptor, ParameterDescriptor, ParameterKind, RouteTable, RouteTableBuilder,
//!     RpcPath,
//! };
//!
//! let table = RouteTableBuilder::new()
//!     .route(
//!         RpcPath::parse("/math").unwrap(),
//!         Some("Arithmetic"),
//!         vec![MethodDescriptor::new("add", "i64")
//!             .with_parameter(ParameterDescriptor::new("a", ParameterKind::Integer))
//!             .with_parameter(ParameterDescriptor::new("b", ParameterKind::Integer))],
//!     )
//!     .base_method(MethodDescriptor::new("ping", "string"))
//!     .build()
//!     .unwrap();
//!
//! assert!(table.lookup(&RpcPath::parse("/Math").unwrap(), "add").is_some());
//! assert!(table.lookup(&RpcPath::root(), "ping").is_some());
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RouteError;
use crate::path::{PathComparison, RpcPath};

/// Declared type of a method parameter, used by parameter binding at
/// dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Any,
    Bool,
    Integer,
    Number,
    String,
    /// ISO-8601 timestamp carried as a JSON string
    DateTime,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotation: None,
            optional: false,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// An invocable method as registered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    /// Name of the type the method returns, for documentation listings
    pub return_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            annotation: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter().filter(|p| !p.optional)
    }
}

/// Metadata listing for one route.
///
/// `path` is `None` for the base methods that are bound to no route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub path: Option<RpcPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    pub methods: Vec<MethodDescriptor>,
}

/// Lookup contract the router resolves requests against.
pub trait RouteTable: Send + Sync {
    /// Find `method` on the route registered under `path`.
    fn lookup(&self, path: &RpcPath, method: &str) -> Option<&MethodDescriptor>;

    /// Methods bound to no route.
    fn base_methods(&self) -> &[MethodDescriptor];

    /// Comparison `lookup` applies to path segments and method names.
    fn comparison(&self) -> PathComparison {
        PathComparison::IgnoreCase
    }
}

#[derive(Debug, Clone)]
struct RouteEntry {
    path: RpcPath,
    annotation: Option<String>,
    methods: Vec<MethodDescriptor>,
}

/// Route table built once by [`RouteTableBuilder`].
#[derive(Debug, Clone, Default)]
pub struct StaticRouteTable {
    routes: Vec<RouteEntry>,
    base_methods: Vec<MethodDescriptor>,
    comparison: PathComparison,
}

impl StaticRouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new()
    }

    /// Registered route paths, in registration order
    pub fn paths(&self) -> impl Iterator<Item = &RpcPath> {
        self.routes.iter().map(|r| &r.path)
    }

    /// Every route with its methods, followed by the base methods under
    /// `path: None`.
    pub fn route_infos(&self) -> Vec<RouteInfo> {
        self.routes
            .iter()
            .map(|route| RouteInfo {
                path: Some(route.path.clone()),
                annotation: route.annotation.clone(),
                methods: route.methods.clone(),
            })
            .chain(std::iter::once(RouteInfo {
                path: None,
                annotation: None,
                methods: self.base_methods.clone(),
            }))
            .collect()
    }

    fn find_method<'a>(
        &self,
        methods: &'a [MethodDescriptor],
        name: &str,
    ) -> Option<&'a MethodDescriptor> {
        methods
            .iter()
            .find(|m| self.comparison.equals(&m.name, name))
    }
}

impl RouteTable for StaticRouteTable {
    fn lookup(&self, path: &RpcPath, method: &str) -> Option<&MethodDescriptor> {
        if path.is_root() {
            return self.find_method(&self.base_methods, method);
        }
        self.routes
            .iter()
            .find(|route| route.path.matches(path, self.comparison))
            .and_then(|route| self.find_method(&route.methods, method))
    }

    fn base_methods(&self) -> &[MethodDescriptor] {
        &self.base_methods
    }

    fn comparison(&self) -> PathComparison {
        self.comparison
    }
}

/// Explicit registration step producing a [`StaticRouteTable`].
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<RouteEntry>,
    base_methods: Vec<MethodDescriptor>,
    comparison: PathComparison,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comparison(mut self, comparison: PathComparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// Register methods under `path`. Registering the same path again adds
    /// to its methods; the first non-empty annotation wins.
    ///
    /// Methods registered under the root path are base methods.
    pub fn route(
        mut self,
        path: RpcPath,
        annotation: Option<&str>,
        methods: Vec<MethodDescriptor>,
    ) -> Self {
        if path.is_root() {
            self.base_methods.extend(methods);
            return self;
        }
        self.routes.push(RouteEntry {
            path,
            annotation: annotation.map(str::to_string),
            methods,
        });
        self
    }

    pub fn base_method(mut self, method: MethodDescriptor) -> Self {
        self.base_methods.push(method);
        self
    }

    /// Merge same-path registrations and reject duplicate or empty method
    /// names.
    pub fn build(self) -> Result<StaticRouteTable, RouteError> {
        let comparison = self.comparison;
        let mut routes: Vec<RouteEntry> = Vec::with_capacity(self.routes.len());

        for entry in self.routes {
            match routes.iter_mut().find(|r| r.path.matches(&entry.path, comparison)) {
                Some(existing) => {
                    if existing.annotation.is_none() {
                        existing.annotation = entry.annotation;
                    }
                    existing.methods.extend(entry.methods);
                }
                None => routes.push(entry),
            }
        }

        for route in &routes {
            check_methods(&route.path, &route.methods, comparison)?;
        }
        check_methods(&RpcPath::root(), &self.base_methods, comparison)?;

        debug!(
            routes = routes.len(),
            base_methods = self.base_methods.len(),
            "Built route table"
        );

        Ok(StaticRouteTable {
            routes,
            base_methods: self.base_methods,
            comparison,
        })
    }
}

fn check_methods(
    path: &RpcPath,
    methods: &[MethodDescriptor],
    comparison: PathComparison,
) -> Result<(), RouteError> {
    for (i, method) in methods.iter().enumerate() {
        if method.name.is_empty() {
            return Err(RouteError::EmptyMethodName(path.clone()));
        }
        if methods[..i].iter().any(|m| comparison.equals(&m.name, &method.name)) {
            return Err(RouteError::DuplicateMethod {
                path: path.clone(),
                method: method.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> RpcPath {
        RpcPath::parse(s).unwrap()
    }

    fn sample_table() -> StaticRouteTable {
        RouteTableBuilder::new()
            .route(
                path("/users"),
                Some("User management"),
                vec![
                    MethodDescriptor::new("GetUser", "User")
                        .with_parameter(ParameterDescriptor::new("id", ParameterKind::Integer)),
                    MethodDescriptor::new("ListUsers", "User[]"),
                ],
            )
            .route(
                path("/users/admin"),
                None,
                vec![MethodDescriptor::new("Promote", "bool")],
            )
            .base_method(MethodDescriptor::new("Ping", "string").with_annotation("Health check"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup_by_path_and_method() {
        let table = sample_table();
        let method = table.lookup(&path("/users"), "GetUser").unwrap();
        assert_eq!(method.return_type, "User");
        assert_eq!(method.parameters[0].kind, ParameterKind::Integer);

        assert!(table.lookup(&path("/users/admin"), "Promote").is_some());
        assert!(table.lookup(&path("/users"), "Promote").is_none());
        assert!(table.lookup(&path("/missing"), "GetUser").is_none());
    }

    #[test]
    fn test_lookup_ignores_case_by_default() {
        let table = sample_table();
        assert!(table.lookup(&path("/USERS"), "getuser").is_some());
        assert!(table.lookup(&RpcPath::root(), "ping").is_some());
    }

    #[test]
    fn test_ordinal_lookup() {
        let table = RouteTableBuilder::new()
            .comparison(PathComparison::Ordinal)
            .route(path("/Users"), None, vec![MethodDescriptor::new("Get", "User")])
            .build()
            .unwrap();
        assert!(table.lookup(&path("/Users"), "Get").is_some());
        assert!(table.lookup(&path("/users"), "Get").is_none());
        assert!(table.lookup(&path("/Users"), "get").is_none());
        assert_eq!(table.comparison(), PathComparison::Ordinal);
        assert_eq!(sample_table().comparison(), PathComparison::IgnoreCase);
    }

    #[test]
    fn test_root_route_registers_base_methods() {
        let table = RouteTableBuilder::new()
            .route(RpcPath::root(), Some("ignored"), vec![MethodDescriptor::new("echo", "string")])
            .build()
            .unwrap();
        assert_eq!(table.base_methods().len(), 1);
        assert!(table.lookup(&RpcPath::root(), "echo").is_some());
    }

    #[test]
    fn test_same_path_registrations_merge() {
        let table = RouteTableBuilder::new()
            .route(path("/a"), None, vec![MethodDescriptor::new("one", "()")])
            .route(path("/A"), Some("Merged"), vec![MethodDescriptor::new("two", "()")])
            .build()
            .unwrap();
        assert_eq!(table.paths().count(), 1);
        assert!(table.lookup(&path("/a"), "two").is_some());
        assert_eq!(table.route_infos()[0].annotation.as_deref(), Some("Merged"));
    }

    #[test]
    fn test_duplicate_method_rejected() {
        let err = RouteTableBuilder::new()
            .route(path("/a"), None, vec![MethodDescriptor::new("one", "()")])
            .route(path("/a"), None, vec![MethodDescriptor::new("ONE", "()")])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::DuplicateMethod {
                path: path("/a"),
                method: "ONE".to_string()
            }
        );

        let err = RouteTableBuilder::new()
            .base_method(MethodDescriptor::new("", "()"))
            .build()
            .unwrap_err();
        assert_eq!(err, RouteError::EmptyMethodName(RpcPath::root()));
    }

    #[test]
    fn test_route_infos() {
        let infos = sample_table().route_infos();
        assert_eq!(infos.len(), 3);
        assert_eq!(infos[0].path, Some(path("/users")));
        assert_eq!(infos[0].annotation.as_deref(), Some("User management"));
        assert_eq!(infos[0].methods.len(), 2);
        assert_eq!(infos[2].path, None);
        assert_eq!(infos[2].methods[0].annotation.as_deref(), Some("Health check"));
    }

    #[test]
    fn test_route_info_serialization() {
        let infos = sample_table().route_infos();
        let value = serde_json::to_value(&infos[0]).unwrap();
        assert_eq!(value["path"], json!("/users"));
        assert_eq!(value["methods"][0]["parameters"][0]["kind"], json!("integer"));
        assert_eq!(serde_json::to_value(&infos[2]).unwrap()["path"], json!(null));
    }

    #[test]
    fn test_required_parameters() {
        let method = MethodDescriptor::new("find", "User")
            .with_parameter(ParameterDescriptor::new("name", ParameterKind::String))
            .with_parameter(
                ParameterDescriptor::new("since", ParameterKind::DateTime)
                    .with_annotation("ISO-8601")
                    .optional(),
            );
        let required: Vec<_> = method.required_parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(required, ["name"]);
    }
}
