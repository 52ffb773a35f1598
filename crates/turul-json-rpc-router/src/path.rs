//! # Route Paths
//!
//! An [`RpcPath`] addresses a group of RPC methods the way a URL path
//! addresses a resource: `/api/users` is the two segments `api` and `users`.
//! Paths compare segment by segment, case-insensitively by default.
//!
//! ```rust
//! use turul_json_rpc_router::RpcPath;
//!
//! let base = RpcPath::parse("/Base").unwrap();
//! let full = base.add(&RpcPath::parse("test").unwrap());
//! assert_eq!(full, RpcPath::parse("/base/TEST").unwrap());
//! assert_eq!(full.to_string(), "/Base/test");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// Segment separator
pub const PATH_SEPARATOR: char = '/';

const RESERVED_CHARACTERS: &[char] = &['?', '#', '\\'];

/// How two path segments (and method names in a route table) are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathComparison {
    /// Case-insensitive ordinal comparison
    #[default]
    IgnoreCase,
    /// Exact ordinal comparison
    Ordinal,
}

impl PathComparison {
    pub fn equals(&self, a: &str, b: &str) -> bool {
        match self {
            PathComparison::Ordinal => a == b,
            PathComparison::IgnoreCase => a
                .chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase)),
        }
    }
}

/// An immutable, ordered sequence of non-empty path segments.
///
/// The zero-segment path is the root. Segments keep the casing they were
/// parsed with; `==` ignores case.
#[derive(Debug, Clone, Default)]
pub struct RpcPath {
    segments: Vec<String>,
}

impl RpcPath {
    /// The zero-segment path
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-separated path.
    ///
    /// One leading and one trailing separator are ignored, so `""`, `"/"`,
    /// `"a"`, `"/a"` and `"/a/"` are all accepted. Any other empty segment is an
    /// error, as is a segment containing whitespace, a control character, or
    /// one of `?`, `#`, `\`.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let trimmed = text.strip_prefix(PATH_SEPARATOR).unwrap_or(text);
        let mut parts: Vec<&str> = trimmed.split(PATH_SEPARATOR).collect();
        if parts.last().is_some_and(|last| last.is_empty()) {
            parts.pop();
        }

        let mut segments = Vec::with_capacity(parts.len());
        for (position, part) in parts.into_iter().enumerate() {
            if part.is_empty() {
                return Err(PathError::EmptySegment {
                    path: text.to_string(),
                    position,
                });
            }
            if let Some(character) = part.chars().find(|c| is_reserved(*c)) {
                return Err(PathError::ReservedCharacter {
                    path: text.to_string(),
                    character,
                });
            }
            segments.push(part.to_string());
        }

        Ok(Self { segments })
    }

    /// Parse an optional path; `None` is the root.
    pub fn parse_optional(text: Option<&str>) -> Result<Self, PathError> {
        text.map_or_else(|| Ok(Self::root()), Self::parse)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// `self` followed by `other`. Neither operand changes.
    pub fn add(&self, other: &RpcPath) -> RpcPath {
        let mut segments = Vec::with_capacity(self.segments.len() + other.segments.len());
        segments.extend(self.segments.iter().cloned());
        segments.extend(other.segments.iter().cloned());
        RpcPath { segments }
    }

    /// Compare under an explicit segment comparison.
    pub fn matches(&self, other: &RpcPath, comparison: PathComparison) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| comparison.equals(a, b))
    }

    pub fn starts_with(&self, base: &RpcPath, comparison: PathComparison) -> bool {
        base.segments.len() <= self.segments.len()
            && base
                .segments
                .iter()
                .zip(&self.segments)
                .all(|(a, b)| comparison.equals(a, b))
    }

    /// The remainder of `self` after removing `base`, or `None` when `self`
    /// does not start with `base`.
    pub fn strip_base(&self, base: &RpcPath, comparison: PathComparison) -> Option<RpcPath> {
        self.starts_with(base, comparison).then(|| RpcPath {
            segments: self.segments[base.segments.len()..].to_vec(),
        })
    }
}

fn is_reserved(c: char) -> bool {
    c.is_whitespace() || c.is_control() || RESERVED_CHARACTERS.contains(&c)
}

impl PartialEq for RpcPath {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other, PathComparison::IgnoreCase)
    }
}

impl Eq for RpcPath {}

impl Hash for RpcPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.segments.len());
        for segment in &self.segments {
            for c in segment.chars().flat_map(char::to_lowercase) {
                c.hash(state);
            }
            state.write_u8(0xff);
        }
    }
}

impl fmt::Display for RpcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{}", PATH_SEPARATOR);
        }
        for segment in &self.segments {
            write!(f, "{}{}", PATH_SEPARATOR, segment)?;
        }
        Ok(())
    }
}

impl FromStr for RpcPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for RpcPath {
    type Error = PathError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl<'a> Add<&'a RpcPath> for &'a RpcPath {
    type Output = RpcPath;

    fn add(self, other: &'a RpcPath) -> RpcPath {
        RpcPath::add(self, other)
    }
}

impl Serialize for RpcPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RpcPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RpcPath::parse(&s).map_err(serde::de::Error::custom)
    }
}
