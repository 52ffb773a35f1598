//! Configuration types for the request parser and router

use serde::{Deserialize, Serialize};

use crate::path::{PathComparison, RpcPath};

/// Main router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// URL path the router is mounted under; stripped before route lookup
    pub base_path: RpcPath,

    /// Segment comparison for base-path stripping. Must equal the route
    /// table's comparison, which governs lookups.
    pub comparison: PathComparison,

    /// Request parsing limits
    pub parser: ParserConfig,
}

/// Request parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum number of requests accepted in one batch (unlimited when unset)
    pub batch_request_limit: Option<usize>,
}

impl RouterConfig {
    pub fn with_base_path(mut self, base_path: RpcPath) -> Self {
        self.base_path = base_path;
        self
    }

    pub fn with_comparison(mut self, comparison: PathComparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn with_batch_request_limit(mut self, limit: usize) -> Self {
        self.parser.batch_request_limit = Some(limit);
        self
    }
}

impl ParserConfig {
    /// Check a batch length against the configured limit
    pub fn allows_batch_of(&self, len: usize) -> bool {
        self.batch_request_limit.is_none_or(|limit| len <= limit)
    }
}
