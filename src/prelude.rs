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

//! Module containing convenient re-exports

pub use crate::connection::{Connection, ConnectionKind};
pub use crate::element::{Element, ElementKind, Position};
pub use crate::engine::Simulator;
pub use crate::persist::{
    export_file, from_json_str, import_file, load_json, read_tagged, save_json, to_json_str,
    write_tagged,
};
pub use crate::properties::{PropertyMap, PropertyValue};
pub use crate::record::{LogEntry, LogLevel, SimulationLog};
pub use crate::topology::Topology;
pub use crate::types::{
    ConfigError, ConnectionId, ElementId, FormatError, NetworkError, TopologyError,
};
