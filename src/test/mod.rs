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

//! Module for testing netsim

mod test_engine;
mod test_persist;
mod test_record;

use crate::connection::ConnectionKind;
use crate::element::ElementKind;
use crate::topology::Topology;
use crate::types::{ConnectionId, ElementId};

/// A small valid network: a router connected to a switch, with a computer and a server hanging
/// off the switch.
pub(crate) fn small_office() -> (Topology, Vec<ElementId>, Vec<ConnectionId>) {
    let mut t = Topology::new();
    let router = t.add_element(ElementKind::Router, "Edge Router");
    let switch = t.add_element(ElementKind::Switch, "Core Switch");
    let pc = t.add_element(ElementKind::Computer, "Workstation");
    let srv = t.add_element(ElementKind::Server, "File Server");
    let c1 = t.add_connection(router, switch, ConnectionKind::Ethernet).unwrap();
    let c2 = t.add_connection(switch, pc, ConnectionKind::Ethernet).unwrap();
    let c3 = t.add_connection(switch, srv, ConnectionKind::Ethernet).unwrap();
    (t, vec![router, switch, pc, srv], vec![c1, c2, c3])
}
