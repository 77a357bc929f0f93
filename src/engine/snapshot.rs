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

//! The owned snapshot of the topology handed to the simulation worker.
//!
//! The worker never touches the caller's collections. All element references inside the
//! snapshot are positions into its own element vector, resolved once when the snapshot is
//! built. Runtime state changes of the simulation (link up/down) mutate the snapshot only.

use std::collections::HashMap;

use crate::connection::{Connection, ConnectionKind};
use crate::element::{Element, ElementKind};
use crate::types::ElementId;

/// A link in the snapshot. Endpoints are positions into [`SimSnapshot::elements`].
#[derive(Debug, Clone)]
pub(crate) struct SimConnection {
    pub source: usize,
    pub target: usize,
    pub kind: ConnectionKind,
    pub label: String,
    pub active: bool,
    pub latency: f64,
    pub packet_loss: f64,
}

/// A device in the snapshot. Only the fields the simulation consumes are kept.
#[derive(Debug, Clone)]
pub(crate) struct SimElement {
    pub name: String,
    pub kind: ElementKind,
}

/// The owned state a simulation run operates on.
#[derive(Debug, Clone, Default)]
pub(crate) struct SimSnapshot {
    pub elements: Vec<SimElement>,
    pub connections: Vec<SimConnection>,
}

impl SimSnapshot {
    /// Build a snapshot from owned copies of the elements and connections. Connections whose
    /// endpoints do not appear in `elements` are dropped with a warning.
    pub fn new(elements: &[Element], connections: &[Connection]) -> Self {
        let positions: HashMap<ElementId, usize> =
            elements.iter().enumerate().map(|(i, e)| (e.id(), i)).collect();
        let connections = connections
            .iter()
            .filter_map(|c| {
                match (positions.get(&c.source()), positions.get(&c.target())) {
                    (Some(&source), Some(&target)) => Some(SimConnection {
                        source,
                        target,
                        kind: c.kind,
                        label: c.label.clone(),
                        active: c.active,
                        latency: c.latency,
                        packet_loss: c.packet_loss,
                    }),
                    _ => {
                        log::warn!(
                            "connection {:?} references an element outside the snapshot",
                            c.label
                        );
                        None
                    }
                }
            })
            .collect();
        Self {
            elements: elements
                .iter()
                .map(|e| SimElement {
                    name: e.name.clone(),
                    kind: e.kind(),
                })
                .collect(),
            connections,
        }
    }
}
