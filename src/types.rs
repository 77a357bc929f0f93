// NetSim: Network Topology Simulator written in Rust
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Module containing all type definitions

use itertools::Itertools;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use thiserror::Error;

pub(crate) type IndexType = u32;

/// Element identification (and index into the topology graph)
pub type ElementId = NodeIndex<IndexType>;

/// Connection identification (and index into the topology graph)
pub type ConnectionId = EdgeIndex<IndexType>;

/// The topology graph. Node and edge payloads live in side tables on the
/// [`Topology`](crate::topology::Topology); the graph only captures the structure.
pub type TopologyGraph = StableGraph<(), (), petgraph::Directed, IndexType>;

/// Errors raised while checking a single element's configuration against the rules of its kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A mandatory property key is missing from the property map.
    #[error("property {0:?} is missing")]
    MissingProperty(&'static str),
    /// A property exists but holds the wrong kind of value.
    #[error("property {0:?} holds the wrong kind of value")]
    WrongKind(&'static str),
    /// A property must be a well-formed dotted-quad IPv4 address.
    #[error("property {0:?} is not a valid IPv4 address")]
    InvalidIpAddress(&'static str),
    /// A property must be a non-empty string.
    #[error("property {0:?} must not be empty")]
    EmptyProperty(&'static str),
    /// A property must be a strictly positive number.
    #[error("property {0:?} must be positive")]
    NotPositive(&'static str),
    /// A property must be a list with at least one entry.
    #[error("property {0:?} must contain at least one entry")]
    EmptyList(&'static str),
    /// A wireless password falls outside the length bounds of the security type.
    #[error("property {0:?} must be between {1} and {2} characters long")]
    PasswordLength(&'static str, usize, usize),
}

/// Errors raised by the full topology validation pass. Validation stops at the first failing
/// rule and reports it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// The topology contains no elements at all.
    #[error("the topology contains no elements")]
    NoElements,
    /// The topology contains elements but no connections.
    #[error("the topology contains no connections")]
    NoConnections,
    /// One or more elements are not an endpoint of any connection.
    #[error("the following elements are not connected to anything: {}", .0.iter().join(", "))]
    IsolatedElements(Vec<String>),
    /// A connection references an element that is not part of the topology.
    #[error("connection {label:?} references an element that is not in the topology")]
    DanglingEndpoint {
        /// Label of the offending connection.
        label: String,
    },
    /// A connection parameter is outside its allowed range (bandwidth > 0, latency >= 0,
    /// packet loss within 0..=100).
    #[error("connection {label:?} has an invalid {param}: {value}")]
    InvalidParameter {
        /// Label of the offending connection.
        label: String,
        /// Name of the offending parameter.
        param: &'static str,
        /// The out-of-range value.
        value: f64,
    },
    /// An element fails the configuration rules of its kind.
    #[error("invalid configuration for {name}: {source}")]
    InvalidElementConfig {
        /// Display name of the offending element.
        name: String,
        /// The rule that failed.
        source: ConfigError,
    },
}

/// Errors raised while reading the tagged on-disk container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The input is shorter than the magic tag.
    #[error("the file is truncated")]
    Truncated,
    /// The input neither starts with the magic tag nor parses as a plain JSON document.
    #[error("the file is not a tagged network document, and not plain JSON either")]
    MissingMagic,
    /// The payload after the magic tag can neither be decompressed nor parsed as legacy
    /// uncompressed JSON.
    #[error("the payload after the magic tag is corrupt")]
    Corrupt,
}

/// Network Errors
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Element is not present in the topology
    #[error("network element was not found in topology: {0:?}")]
    ElementNotFound(ElementId),
    /// Connection is not present in the topology
    #[error("connection was not found in topology: {0:?}")]
    ConnectionNotFound(ConnectionId),
    /// A connection may not have the same element on both ends.
    #[error("cannot connect element {0:?} to itself")]
    SelfLoop(ElementId),
    /// An endpoint already carries the maximum number of connections for its kind.
    #[error("element {id:?} already carries its maximum of {max} connections")]
    CapacityExceeded {
        /// The element that is at capacity.
        id: ElementId,
        /// The maximum connection count of the element's kind.
        max: usize,
    },
    /// The topology fails one of its invariants.
    #[error("validation error: {0}")]
    Validation(#[from] TopologyError),
    /// The persisted document has an invalid container format.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    /// Json error
    #[error("{0}")]
    JsonError(Box<serde_json::Error>),
    /// I/O error while reading or writing a persisted document.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for NetworkError {
    fn from(value: serde_json::Error) -> Self {
        Self::JsonError(Box::new(value))
    }
}

impl PartialEq for NetworkError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ElementNotFound(l0), Self::ElementNotFound(r0)) => l0 == r0,
            (Self::ConnectionNotFound(l0), Self::ConnectionNotFound(r0)) => l0 == r0,
            (Self::SelfLoop(l0), Self::SelfLoop(r0)) => l0 == r0,
            (
                Self::CapacityExceeded { id: l0, max: l1 },
                Self::CapacityExceeded { id: r0, max: r1 },
            ) => l0 == r0 && l1 == r1,
            (Self::Validation(l0), Self::Validation(r0)) => l0 == r0,
            (Self::Format(l0), Self::Format(r0)) => l0 == r0,
            (Self::JsonError(l), Self::JsonError(r)) => l.to_string() == r.to_string(),
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}
