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

//! Module defining the network topology, the main datastructure of this crate.

use std::collections::HashMap;

use crate::connection::{Connection, ConnectionKind};
use crate::element::{Element, ElementKind};
use crate::types::{ConnectionId, ElementId, NetworkError, TopologyError, TopologyGraph};

/// The network topology.
///
/// Elements and connections live in side tables keyed by their graph index; the
/// [`TopologyGraph`] itself only captures the structure. Indices are stable across removals, so
/// an [`ElementId`] handed out once stays valid until that element is removed.
///
/// Structural invariants (existing endpoints, no self-loops, per-kind connection capacity) are
/// enforced at mutation time and mutations that would break them leave the topology unchanged.
/// Value-level invariants (parameter ranges, per-element configuration) are only checked by the
/// explicit [`Topology::validate`] pass, so a topology may be edited through invalid
/// intermediate states.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    graph: TopologyGraph,
    elements: HashMap<ElementId, Element>,
    connections: HashMap<ConnectionId, Connection>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new element of the given kind, initialized with the default properties of that
    /// kind, and return its id.
    pub fn add_element(&mut self, kind: ElementKind, name: impl Into<String>) -> ElementId {
        let id = self.graph.add_node(());
        let element = Element::new(kind, id, name.into());
        self.elements.insert(id, element);
        id
    }

    /// Insert an element that was constructed elsewhere (e.g., read from a persisted document).
    /// A fresh id is assigned, and the stored properties are overlaid over the defaults of the
    /// element's kind, so documents written by older versions pick up keys added since.
    pub fn insert_element(&mut self, element: Element) -> ElementId {
        let id = self.graph.add_node(());
        let mut fresh = Element::new(element.kind(), id, element.name);
        fresh.description = element.description;
        fresh.position = element.position;
        fresh.enabled = element.enabled;
        fresh.properties.extend(element.properties);
        self.elements.insert(id, fresh);
        id
    }

    /// Remove an element and all connections incident to it. Returns the removed element, or
    /// `None` if the id is not present.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let element = self.elements.remove(&id)?;
        let incident: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| c.touches(id))
            .map(|c| c.id())
            .collect();
        for conn in incident {
            self.remove_connection(conn);
        }
        self.graph.remove_node(id);
        Some(element)
    }

    /// Add a connection between two elements and return its id. The connection starts out
    /// active, with the default link parameters and the label "`source` - `target`".
    ///
    /// Fails with [`NetworkError::ElementNotFound`] if either endpoint is missing, with
    /// [`NetworkError::SelfLoop`] if both endpoints are the same element, and with
    /// [`NetworkError::CapacityExceeded`] if either endpoint already carries the maximum number
    /// of connections for its kind. The topology is unchanged on failure.
    pub fn add_connection(
        &mut self,
        source: ElementId,
        target: ElementId,
        kind: ConnectionKind,
    ) -> Result<ConnectionId, NetworkError> {
        let src = self
            .elements
            .get(&source)
            .ok_or(NetworkError::ElementNotFound(source))?;
        let dst = self
            .elements
            .get(&target)
            .ok_or(NetworkError::ElementNotFound(target))?;
        if source == target {
            return Err(NetworkError::SelfLoop(source));
        }
        for (id, element) in [(source, src), (target, dst)] {
            if let Some(max) = element.kind().max_connections() {
                if self.degree(id) >= max {
                    return Err(NetworkError::CapacityExceeded { id, max });
                }
            }
        }
        let label = format!("{} - {}", src.name, dst.name);
        let conn = self.graph.add_edge(source, target, ());
        self.connections
            .insert(conn, Connection::new(conn, source, target, kind, label));
        Ok(conn)
    }

    /// Remove a connection. Returns the removed connection, or `None` if the id is not present.
    pub fn remove_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let connection = self.connections.remove(&id)?;
        self.graph.remove_edge(id);
        Some(connection)
    }

    /// Get a reference to an element.
    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Get a mutable reference to an element.
    pub fn get_element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// Get a reference to a connection.
    pub fn get_connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// Get a mutable reference to a connection.
    pub fn get_connection_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(&id)
    }

    /// Iterate over all elements in index order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.graph.node_indices().filter_map(|id| self.elements.get(&id))
    }

    /// Iterate over all connections in index order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph
            .edge_indices()
            .filter_map(|id| self.connections.get(&id))
    }

    /// Iterate over all connections incident to an element.
    pub fn incident_connections(&self, id: ElementId) -> impl Iterator<Item = &Connection> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.connections.get(&e))
            .filter(move |c| c.touches(id))
    }

    /// The number of connections incident to an element.
    pub fn degree(&self, id: ElementId) -> usize {
        self.graph.neighbors_undirected(id).count()
    }

    /// The number of elements in the topology.
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// The number of connections in the topology.
    pub fn num_connections(&self) -> usize {
        self.connections.len()
    }

    /// Return a detached deep copy of an element. The copy keeps the original's id for
    /// reference, but is not part of any topology; pass it to [`Topology::insert_element`] to
    /// materialize it (which assigns a fresh id).
    pub fn clone_element(&self, id: ElementId) -> Result<Element, NetworkError> {
        self.elements
            .get(&id)
            .cloned()
            .ok_or(NetworkError::ElementNotFound(id))
    }

    /// Run the full validation pass. Checks are ordered; the first failing rule is reported.
    ///
    /// 1. The topology must contain at least one element.
    /// 2. The topology must contain at least one connection.
    /// 3. Every element must be an endpoint of at least one connection. All isolated elements
    ///    are reported together.
    /// 4. Every connection must reference elements of the topology and carry parameters within
    ///    range (bandwidth > 0, latency >= 0, packet loss within `0..=100`).
    /// 5. Every element must satisfy the configuration rules of its kind.
    ///
    /// This never mutates the topology.
    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.elements.is_empty() {
            return Err(TopologyError::NoElements);
        }
        if self.connections.is_empty() {
            return Err(TopologyError::NoConnections);
        }

        let isolated: Vec<String> = self
            .elements()
            .filter(|e| self.degree(e.id()) == 0)
            .map(|e| e.name.clone())
            .collect();
        if !isolated.is_empty() {
            return Err(TopologyError::IsolatedElements(isolated));
        }

        for conn in self.connections() {
            if !self.elements.contains_key(&conn.source())
                || !self.elements.contains_key(&conn.target())
            {
                return Err(TopologyError::DanglingEndpoint {
                    label: conn.label.clone(),
                });
            }
            for (param, value, ok) in [
                ("bandwidth", conn.bandwidth, conn.bandwidth > 0.0),
                ("latency", conn.latency, conn.latency >= 0.0),
                (
                    "packet loss",
                    conn.packet_loss,
                    (0.0..=100.0).contains(&conn.packet_loss),
                ),
            ] {
                if !ok {
                    return Err(TopologyError::InvalidParameter {
                        label: conn.label.clone(),
                        param,
                        value,
                    });
                }
            }
        }

        for element in self.elements() {
            element
                .validate_config()
                .map_err(|source| TopologyError::InvalidElementConfig {
                    name: element.name.clone(),
                    source,
                })?;
        }

        Ok(())
    }
}
