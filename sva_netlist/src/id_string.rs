//! Names for wires and cells.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

lazy_static! {
    static ref NAMED_IDSTRING_RE: Regex = Regex::new(r"^\\(\S+)$").unwrap();
    static ref UNNAMED_IDSTRING_RE: Regex = Regex::new(r"^\$([^\$]+)\$(\d+)$").unwrap();
}

/// A netlist identifier, spelled the way yosys spells them.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
pub enum IdString {
    // "\\[name]"
    Named(String),
    // $sva$17
    Unnamed {
        /// Scope the id was allocated in.
        scope: String,
        /// Counter value within the allocating module.
        id: u64,
    },
}

impl IdString {
    /// A user-visible name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// An auto-generated name.
    pub fn unnamed(scope: impl Into<String>, id: u64) -> Self {
        Self::Unnamed {
            scope: scope.into(),
            id,
        }
    }

    /// Whether this id was produced by a unique-id allocator.
    #[must_use]
    pub const fn is_unnamed(&self) -> bool {
        matches!(self, Self::Unnamed { .. })
    }
}

impl Display for IdString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "\\{name}"),
            Self::Unnamed { scope, id } => write!(f, "${scope}${id}"),
        }
    }
}

/// Failure to parse an [`IdString`].
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum IdStringError {
    /// The text is neither `\name` nor `$scope$N`.
    #[error("invalid id string '{0}'")]
    InvalidFormat(String),
}

impl From<&str> for IdString {
    /// Plain text that is not already an escaped id becomes a named id.
    fn from(value: &str) -> Self {
        parse_idstring(value).unwrap_or_else(|_| Self::Named(value.to_string()))
    }
}

/// Parses the textual form produced by [`Display`].
pub fn parse_idstring(id_string: &str) -> Result<IdString, IdStringError> {
    if let Some(caps) = NAMED_IDSTRING_RE.captures(id_string) {
        return Ok(IdString::Named(caps[1].to_string()));
    } else if let Some(caps) = UNNAMED_IDSTRING_RE.captures(id_string) {
        let id = caps[2]
            .parse()
            .map_err(|_| IdStringError::InvalidFormat(id_string.to_string()))?;
        return Ok(IdString::Unnamed {
            scope: caps[1].to_string(),
            id,
        });
    }
    Err(IdStringError::InvalidFormat(id_string.to_string()))
}
