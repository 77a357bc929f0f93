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

//! Links between network elements.

use serde::{Deserialize, Serialize};

use crate::types::{ConnectionId, ElementId};

/// The physical (or logical) medium of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Wired ethernet.
    Ethernet,
    /// Wireless LAN.
    WiFi,
    /// Optical fiber.
    Fiber,
    /// Serial line.
    Serial,
    /// USB tethering.
    #[serde(rename = "USB")]
    Usb,
    /// Bluetooth.
    Bluetooth,
    /// Anything else.
    Custom,
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Ethernet => "Ethernet",
            Self::WiFi => "WiFi",
            Self::Fiber => "Fiber",
            Self::Serial => "Serial",
            Self::Usb => "USB",
            Self::Bluetooth => "Bluetooth",
            Self::Custom => "Custom",
        })
    }
}

/// A link between two elements of the topology.
///
/// Connections are directed in the underlying graph but treated as symmetric by validation and
/// by the simulation. The link parameters (bandwidth, latency, packet loss) are plain fields;
/// their ranges are enforced by [`Topology::validate`](crate::topology::Topology::validate),
/// not at mutation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    id: ConnectionId,
    source: ElementId,
    target: ElementId,
    /// The medium of this connection.
    pub kind: ConnectionKind,
    /// Display label, defaults to "`source` - `target`" using the endpoint names.
    pub label: String,
    /// Whether the link currently carries traffic.
    pub active: bool,
    /// Link bandwidth in Mb/s. Must be strictly positive.
    pub bandwidth: f64,
    /// Link latency in milliseconds. Must not be negative.
    pub latency: f64,
    /// Packet loss in percent, within `0..=100`.
    pub packet_loss: f64,
}

impl Connection {
    pub(crate) fn new(
        id: ConnectionId,
        source: ElementId,
        target: ElementId,
        kind: ConnectionKind,
        label: String,
    ) -> Self {
        Self {
            id,
            source,
            target,
            kind,
            label,
            active: true,
            bandwidth: 1000.0,
            latency: 1.0,
            packet_loss: 0.0,
        }
    }

    /// The stable, unique id of this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The element at the source end.
    pub fn source(&self) -> ElementId {
        self.source
    }

    /// The element at the target end.
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Whether `id` is one of the two endpoints.
    pub fn touches(&self, id: ElementId) -> bool {
        self.source == id || self.target == id
    }

    pub(crate) fn set_ids(&mut self, id: ConnectionId, source: ElementId, target: ElementId) {
        self.id = id;
        self.source = source;
        self.target = target;
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.kind)
    }
}
