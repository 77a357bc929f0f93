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

use std::io::{self, Write};

use pretty_assertions::assert_eq;

use super::small_office;
use crate::connection::ConnectionKind;
use crate::element::ElementKind;
use crate::persist::{from_json_str, read_tagged, to_json_str, write_tagged, MAGIC};
use crate::topology::Topology;
use crate::types::{FormatError, NetworkError, TopologyError};

#[test]
fn json_round_trip() {
    let (mut t, ids, conns) = small_office();
    t.get_element_mut(ids[2])
        .unwrap()
        .properties
        .insert("Hostname".to_string(), "PC-042".into());
    t.get_connection_mut(conns[1]).unwrap().bandwidth = 100.0;
    t.get_connection_mut(conns[1]).unwrap().latency = 5.0;

    let restored = from_json_str(&to_json_str(&t).unwrap()).unwrap();

    assert_eq!(restored.num_elements(), t.num_elements());
    assert_eq!(restored.num_connections(), t.num_connections());
    for (a, b) in t.elements().zip(restored.elements()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.properties, b.properties);
    }
    for (a, b) in t.connections().zip(restored.connections()) {
        assert_eq!(a.label, b.label);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.active, b.active);
        assert_eq!(a.bandwidth, b.bandwidth);
        assert_eq!(a.latency, b.latency);
        assert_eq!(a.packet_loss, b.packet_loss);
    }
    restored.validate().unwrap();
}

#[test]
fn json_round_trip_preserves_relationships() {
    let (t, _, _) = small_office();
    let restored = from_json_str(&to_json_str(&t).unwrap()).unwrap();
    for (a, b) in t.connections().zip(restored.connections()) {
        let a_src = &t.get_element(a.source()).unwrap().name;
        let a_dst = &t.get_element(a.target()).unwrap().name;
        let b_src = &restored.get_element(b.source()).unwrap().name;
        let b_dst = &restored.get_element(b.target()).unwrap().name;
        assert_eq!((a_src, a_dst), (b_src, b_dst));
    }
}

#[test]
fn tagged_round_trip() {
    let (t, _, _) = small_office();
    let mut buf = Vec::new();
    write_tagged(&t, &mut buf).unwrap();
    assert!(buf.starts_with(MAGIC));

    let restored = read_tagged(buf.as_slice()).unwrap();
    assert_eq!(restored.num_elements(), 4);
    assert_eq!(restored.num_connections(), 3);
}

#[test]
fn tagged_reader_accepts_plain_json() {
    let (t, _, _) = small_office();
    let json = to_json_str(&t).unwrap();
    let restored = read_tagged(json.as_bytes()).unwrap();
    assert_eq!(restored.num_elements(), 4);
}

#[test]
fn tagged_reader_rejects_garbage() {
    assert_eq!(
        read_tagged(&b"this is not a network"[..]).unwrap_err(),
        NetworkError::Format(FormatError::MissingMagic)
    );
    assert_eq!(
        read_tagged(&b"NE"[..]).unwrap_err(),
        NetworkError::Format(FormatError::Truncated)
    );

    let mut corrupt = MAGIC.to_vec();
    corrupt.extend_from_slice(b"\xff\xff\xff\xff junk");
    assert_eq!(
        read_tagged(corrupt.as_slice()).unwrap_err(),
        NetworkError::Format(FormatError::Corrupt)
    );
}

/// A writer that buffers all writes but fails at flush time, like a `BufWriter` over a full
/// disk.
struct FailingFlush(Vec<u8>);

impl Write for FailingFlush {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"))
    }
}

#[test]
fn export_surfaces_flush_errors() {
    let (t, _, _) = small_office();
    let err = write_tagged(&t, FailingFlush(Vec::new())).unwrap_err();
    assert!(matches!(err, NetworkError::IoError(_)));
}

#[test]
fn usb_connections_serialize_with_their_display_name() {
    let mut t = Topology::new();
    let pc = t.add_element(ElementKind::Computer, "PC");
    let printer = t.add_element(ElementKind::Printer, "Printer");
    t.add_connection(pc, printer, ConnectionKind::Usb).unwrap();

    let json = to_json_str(&t).unwrap();
    assert!(json.contains("\"connectionType\": \"USB\""));

    let restored = from_json_str(&json).unwrap();
    assert_eq!(restored.connections().next().unwrap().kind, ConnectionKind::Usb);
}

#[test]
fn export_requires_valid_topology() {
    let t = Topology::new();
    let mut buf = Vec::new();
    assert_eq!(
        write_tagged(&t, &mut buf),
        Err(NetworkError::Validation(TopologyError::NoElements))
    );
    assert!(buf.is_empty());
}

#[test]
fn import_drops_dangling_connections() {
    let _ = env_logger::builder().is_test(true).try_init();
    let json = r#"{
        "elements": [
            {
                "id": 0,
                "name": "A",
                "description": "",
                "position": { "x": 0.0, "y": 0.0 },
                "type": "Computer",
                "enabled": true,
                "properties": {}
            },
            {
                "id": 1,
                "name": "B",
                "description": "",
                "position": { "x": 10.0, "y": 0.0 },
                "type": "Computer",
                "enabled": true,
                "properties": {}
            }
        ],
        "connections": [
            {
                "id": 0,
                "sourceId": 0,
                "targetId": 1,
                "label": "A - B",
                "connectionType": "Ethernet",
                "isActive": true,
                "bandwidth": 1000.0,
                "latency": 1.0,
                "packetLoss": 0.0
            },
            {
                "id": 1,
                "sourceId": 0,
                "targetId": 99,
                "label": "A - ?",
                "connectionType": "Ethernet",
                "isActive": true,
                "bandwidth": 1000.0,
                "latency": 1.0,
                "packetLoss": 0.0
            }
        ]
    }"#;
    let t = from_json_str(json).unwrap();
    assert_eq!(t.num_elements(), 2);
    assert_eq!(t.num_connections(), 1);
    assert_eq!(t.connections().next().unwrap().label, "A - B");
}

#[test]
fn import_fills_missing_properties_from_defaults() {
    let json = r#"{
        "elements": [
            {
                "id": 7,
                "name": "Old Router",
                "description": "from an older file",
                "position": { "x": 1.0, "y": 2.0 },
                "type": "Router",
                "enabled": false,
                "properties": { "IP Address": "10.0.0.1" }
            }
        ],
        "connections": []
    }"#;
    let t = from_json_str(json).unwrap();
    let e = t.elements().next().unwrap();
    assert_eq!(e.name, "Old Router");
    assert!(!e.enabled);
    assert_eq!(e.properties.get("IP Address"), Some(&"10.0.0.1".into()));
    // keys absent from the document come from the kind defaults
    assert_eq!(e.properties.get("DNS Server"), Some(&"8.8.8.8".into()));
}
