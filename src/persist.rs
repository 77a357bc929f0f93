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

//! Saving and restoring topologies.
//!
//! Two on-disk shapes exist. The *plain* document is the bare JSON
//! `{"elements": [...], "connections": [...]}` used by [`to_json_str`] / [`from_json_str`] and
//! the `save_json` / `load_json` path helpers. The *tagged* container used by [`write_tagged`] /
//! [`read_tagged`] wraps the same data in a versioned envelope, compresses it with lz4, and
//! prefixes the magic tag [`MAGIC`]. The reader is lenient: it falls back to uncompressed JSON
//! after the magic, and to a bare plain document when the magic is missing entirely.
//!
//! Ids serialize as the raw graph indices. On import they are remapped, so documents written by
//! a topology with holes in its index space load into a freshly packed one.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::connection::ConnectionKind;
use crate::element::{Element, ElementKind, Position};
use crate::properties::PropertyMap;
use crate::topology::Topology;
use crate::types::{ElementId, FormatError, NetworkError};

/// The magic tag that opens a tagged container.
pub const MAGIC: &[u8; 3] = b"NET";

/// The format version written into tagged containers.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementRecord {
    id: u32,
    name: String,
    description: String,
    position: Position,
    #[serde(rename = "type")]
    kind: ElementKind,
    enabled: bool,
    properties: PropertyMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionRecord {
    id: u32,
    source_id: u32,
    target_id: u32,
    label: String,
    connection_type: ConnectionKind,
    is_active: bool,
    bandwidth: f64,
    latency: f64,
    packet_loss: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TopologyDocument {
    #[serde(default)]
    elements: Vec<ElementRecord>,
    #[serde(default)]
    connections: Vec<ConnectionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaggedDocument {
    format_version: String,
    created_with: String,
    created_date: String,
    configuration: TopologyDocument,
}

fn to_document(topology: &Topology) -> TopologyDocument {
    TopologyDocument {
        elements: topology
            .elements()
            .map(|e| ElementRecord {
                id: e.id().index() as u32,
                name: e.name.clone(),
                description: e.description.clone(),
                position: e.position,
                kind: e.kind(),
                enabled: e.enabled,
                properties: e.properties.clone(),
            })
            .collect(),
        connections: topology
            .connections()
            .map(|c| ConnectionRecord {
                id: c.id().index() as u32,
                source_id: c.source().index() as u32,
                target_id: c.target().index() as u32,
                label: c.label.clone(),
                connection_type: c.kind,
                is_active: c.active,
                bandwidth: c.bandwidth,
                latency: c.latency,
                packet_loss: c.packet_loss,
            })
            .collect(),
    }
}

fn from_document(doc: TopologyDocument) -> Result<Topology, NetworkError> {
    let mut topology = Topology::new();
    let mut ids: HashMap<u32, ElementId> = HashMap::new();
    for rec in doc.elements {
        let mut element = Element::new(rec.kind, ElementId::from(rec.id), rec.name);
        element.description = rec.description;
        element.position = rec.position;
        element.enabled = rec.enabled;
        element.properties = rec.properties;
        ids.insert(rec.id, topology.insert_element(element));
    }
    for rec in doc.connections {
        let (source, target) = match (ids.get(&rec.source_id), ids.get(&rec.target_id)) {
            (Some(s), Some(t)) => (*s, *t),
            _ => {
                log::warn!(
                    "dropping connection {:?}: unresolved endpoint {} or {}",
                    rec.label,
                    rec.source_id,
                    rec.target_id
                );
                continue;
            }
        };
        let conn = topology.add_connection(source, target, rec.connection_type)?;
        let c = topology
            .get_connection_mut(conn)
            .ok_or(NetworkError::ConnectionNotFound(conn))?;
        c.label = rec.label;
        c.active = rec.is_active;
        c.bandwidth = rec.bandwidth;
        c.latency = rec.latency;
        c.packet_loss = rec.packet_loss;
    }
    Ok(topology)
}

/// Serialize a topology as a plain, pretty-printed JSON document.
pub fn to_json_str(topology: &Topology) -> Result<String, NetworkError> {
    Ok(serde_json::to_string_pretty(&to_document(topology))?)
}

/// Restore a topology from a plain JSON document. Connections whose endpoints cannot be
/// resolved are dropped with a warning. The result is *not* validated; run
/// [`Topology::validate`] if needed.
pub fn from_json_str(s: &str) -> Result<Topology, NetworkError> {
    from_document(serde_json::from_str(s)?)
}

/// Write a topology to a writer as a tagged, lz4-compressed container. The topology is
/// validated first, so only well-formed networks can be exported.
pub fn write_tagged<W: Write>(topology: &Topology, mut writer: W) -> Result<(), NetworkError> {
    topology.validate()?;
    let doc = TaggedDocument {
        format_version: FORMAT_VERSION.to_string(),
        created_with: "netsim".to_string(),
        created_date: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
        configuration: to_document(topology),
    };
    let json = serde_json::to_vec(&doc)?;
    writer.write_all(MAGIC)?;
    writer.write_all(&compress_prepend_size(&json))?;
    // a buffered writer's Drop discards flush errors
    writer.flush()?;
    Ok(())
}

/// Read a topology back from a tagged container, with two fallbacks: a payload after the magic
/// that does not decompress is retried as uncompressed JSON, and an input without the magic is
/// retried once as a plain JSON document. The restored topology is validated before it is
/// returned.
pub fn read_tagged<R: Read>(mut reader: R) -> Result<Topology, NetworkError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let topology = if bytes.starts_with(MAGIC) {
        let payload = &bytes[MAGIC.len()..];
        let doc: TaggedDocument = match decompress_size_prepended(payload) {
            Ok(json) => serde_json::from_slice(&json)
                .map_err(|_| NetworkError::Format(FormatError::Corrupt))?,
            // legacy exporters wrote the JSON uncompressed after the magic
            Err(_) => serde_json::from_slice(payload)
                .map_err(|_| NetworkError::Format(FormatError::Corrupt))?,
        };
        from_document(doc.configuration)?
    } else if let Ok(doc) = serde_json::from_slice::<TopologyDocument>(&bytes) {
        from_document(doc)?
    } else if bytes.len() < MAGIC.len() {
        return Err(FormatError::Truncated.into());
    } else {
        return Err(FormatError::MissingMagic.into());
    };

    topology.validate().map_err(NetworkError::Validation)?;
    Ok(topology)
}

/// Save a topology as a plain JSON file.
pub fn save_json(topology: &Topology, path: impl AsRef<Path>) -> Result<(), NetworkError> {
    let mut file = File::create(path)?;
    file.write_all(to_json_str(topology)?.as_bytes())?;
    Ok(())
}

/// Load a topology from a plain JSON file (no validation).
pub fn load_json(path: impl AsRef<Path>) -> Result<Topology, NetworkError> {
    let mut s = String::new();
    File::open(path)?.read_to_string(&mut s)?;
    from_json_str(&s)
}

/// Export a topology to a tagged container file.
pub fn export_file(topology: &Topology, path: impl AsRef<Path>) -> Result<(), NetworkError> {
    write_tagged(topology, BufWriter::new(File::create(path)?))
}

/// Import a topology from a tagged container file.
pub fn import_file(path: impl AsRef<Path>) -> Result<Topology, NetworkError> {
    read_tagged(BufReader::new(File::open(path)?))
}
