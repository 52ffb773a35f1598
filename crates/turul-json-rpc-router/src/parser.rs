//! # Request Parsing
//!
//! Turns request text into validated [`RpcRequest`]s. A top-level array is a
//! batch; a single object is treated as a batch of one with `is_batch` unset.
//!
//! Validation is all-or-nothing: the first structural violation anywhere in
//! the document fails the whole call, and the error names the batch index.
//! Members of each request object are checked in a fixed order (`jsonrpc`,
//! `method`, `id`, `params`) so the reported reason is deterministic.

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::config::ParserConfig;
use crate::decoder::{JsonDecoder, SerdeJsonDecoder};
use crate::error::{InvalidRequestError, InvalidRequestReason};
use crate::request::{RequestParams, RpcRequest};
use crate::types::{JsonRpcVersion, RequestId};

/// Requests decoded from one document, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequests {
    pub requests: Vec<RpcRequest>,
    /// Whether the document was a JSON array, regardless of its length
    pub is_batch: bool,
}

impl ParsedRequests {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RpcRequest> {
        self.requests.iter()
    }
}

impl IntoIterator for ParsedRequests {
    type Item = RpcRequest;
    type IntoIter = std::vec::IntoIter<RpcRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

/// Validating JSON-RPC 2.0 request parser.
///
/// Stateless after construction; one instance can serve any number of
/// threads.
#[derive(Debug, Clone, Default)]
pub struct RequestParser<D = SerdeJsonDecoder> {
    config: ParserConfig,
    decoder: D,
}

impl RequestParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            decoder: SerdeJsonDecoder,
        }
    }
}

impl<D: JsonDecoder> RequestParser<D> {
    pub fn with_decoder(config: ParserConfig, decoder: D) -> Self {
        Self { config, decoder }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse possibly-absent request text. `None` is rejected like empty text.
    pub fn parse_optional(
        &self,
        raw: Option<&str>,
    ) -> Result<ParsedRequests, InvalidRequestError> {
        self.parse_requests(raw.unwrap_or_default())
    }

    /// Parse a single request or a batch.
    pub fn parse_requests(&self, raw: &str) -> Result<ParsedRequests, InvalidRequestError> {
        let result = self.parse_document(raw);
        match &result {
            Ok(parsed) => debug!(
                count = parsed.len(),
                is_batch = parsed.is_batch,
                "Parsed JSON-RPC request document"
            ),
            Err(e) => warn!(error = %e, "Rejected JSON-RPC request document"),
        }
        result
    }

    fn parse_document(&self, raw: &str) -> Result<ParsedRequests, InvalidRequestError> {
        if raw.trim().is_empty() {
            return Err(InvalidRequestReason::EmptyInput.into());
        }

        let document = self
            .decoder
            .decode(raw)
            .map_err(InvalidRequestReason::MalformedJson)?;

        match document {
            Value::Array(elements) => {
                if elements.is_empty() {
                    return Err(InvalidRequestReason::EmptyBatch.into());
                }
                if !self.config.allows_batch_of(elements.len()) {
                    return Err(InvalidRequestReason::BatchTooLarge {
                        len: elements.len(),
                        limit: self.config.batch_request_limit.unwrap_or_default(),
                    }
                    .into());
                }

                let requests = elements
                    .into_iter()
                    .enumerate()
                    .map(|(index, element)| match element {
                        Value::Object(object) => {
                            parse_request_object(object).map_err(|e| e.at(index))
                        }
                        _ => Err(InvalidRequestError::new(InvalidRequestReason::NotAnObject)
                            .at(index)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(ParsedRequests {
                    requests,
                    is_batch: true,
                })
            }
            Value::Object(object) => Ok(ParsedRequests {
                requests: vec![parse_request_object(object)?],
                is_batch: false,
            }),
            _ => Err(InvalidRequestReason::NotAnObjectOrArray.into()),
        }
    }
}

/// Validate one request object and take ownership of its members.
fn parse_request_object(
    mut object: Map<String, Value>,
) -> Result<RpcRequest, InvalidRequestError> {
    let version = match object.get("jsonrpc") {
        None => return Err(InvalidRequestReason::MissingVersion.into()),
        Some(Value::String(s)) => JsonRpcVersion::parse(s)
            .ok_or_else(|| InvalidRequestReason::UnsupportedVersion(format!("\"{}\"", s)))?,
        Some(other) => {
            return Err(InvalidRequestReason::UnsupportedVersion(other.to_string()).into());
        }
    };

    let method = match object.remove("method") {
        None => return Err(InvalidRequestReason::MissingMethod.into()),
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(_) => return Err(InvalidRequestReason::InvalidMethod.into()),
    };

    let id = match object.get("id") {
        None => None,
        Some(value) => Some(
            RequestId::from_value(value)
                .ok_or_else(|| InvalidRequestReason::InvalidId(describe(value)))?,
        ),
    };

    let params = match object.remove("params") {
        None => RequestParams::default(),
        Some(Value::Array(values)) => RequestParams::Array(values),
        Some(Value::Object(map)) => RequestParams::Object(map),
        Some(other) => return Err(InvalidRequestReason::InvalidParams(describe(&other)).into()),
    };

    trace!(method = %method, ?id, params = params.len(), "Validated request object");

    Ok(RpcRequest {
        version,
        id,
        method,
        params,
    })
}

/// Short description of an offending value for error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(n) => format!("the number {}", n),
        Value::String(_) => "a string".to_string(),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}
