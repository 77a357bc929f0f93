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

#![deny(missing_docs, missing_debug_implementations)]

//! # NetSim
//!
//! This is a library for composing network topologies out of typed devices and running a
//! lightweight, timed simulation over them.
//!
//! ## Main Concepts
//!
//! The [`topology::Topology`] is the main datastructure to operate on. It owns a set of
//! [`element::Element`]s (routers, switches, servers, and so on) and the
//! [`connection::Connection`]s between them, stored on a graph (see
//! [Petgraph](https://docs.rs/petgraph/latest/petgraph/index.html)). The topology enforces the
//! graph invariants (connection capacity per device kind, no self-loops) at mutation time, and
//! offers a full validation pass ([`topology::Topology::validate`]) plus JSON import/export and a
//! compressed on-disk container (see [`persist`]).
//!
//! Each element carries an open, string-keyed property map of tagged values
//! ([`properties::PropertyValue`]). The keys, defaults, and validation rules for each device kind
//! are expressed as data tables keyed by [`element::ElementKind`], not as a type hierarchy.
//!
//! The [`engine::Simulator`] consumes a snapshot of the topology and runs a cancellable
//! background loop that advances simulated time, transfers packets over active connections, and
//! triggers random network events. Everything the simulation observes or does is appended to a
//! bounded, thread-safe [`record::SimulationLog`].
//!
//! ## Example usage
//!
//! ```
//! use netsim::prelude::*;
//!
//! fn main() -> Result<(), NetworkError> {
//!     let mut t = Topology::new();
//!
//!     let pc = t.add_element(ElementKind::Computer, "Workstation");
//!     let srv = t.add_element(ElementKind::Server, "File Server");
//!     t.add_connection(pc, srv, ConnectionKind::Ethernet)?;
//!
//!     // check all topology invariants before simulating
//!     t.validate()?;
//!
//!     let sim = Simulator::new();
//!     sim.set_topology(&t);
//!     sim.start();
//!     // ... poll sim.log_entries() or subscribe ...
//!     sim.stop();
//!
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod element;
pub mod engine;
pub mod persist;
pub mod prelude;
pub mod properties;
pub mod record;
pub mod topology;
pub mod types;

#[cfg(test)]
mod test;
