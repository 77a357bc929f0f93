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

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::record::{LogEntry, LogLevel, SimulationLog, LOG_CAPACITY};

#[test]
fn log_evicts_oldest_entries() {
    let log = SimulationLog::new();
    for i in 0..1500 {
        log.append(LogEntry::info("Test", format!("entry {i}")));
    }
    assert_eq!(log.len(), LOG_CAPACITY);

    let entries = log.snapshot();
    assert_eq!(entries.first().unwrap().message, "entry 500");
    assert_eq!(entries.last().unwrap().message, "entry 1499");
}

#[test]
fn log_notifies_on_append_and_clear() {
    let log = SimulationLog::new();
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    log.subscribe(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });

    for _ in 0..5 {
        log.append(LogEntry::debug("Test", "x"));
    }
    assert_eq!(count.load(Ordering::SeqCst), 5);

    log.clear();
    assert!(log.is_empty());
    assert_eq!(count.load(Ordering::SeqCst), 6);
}

#[test]
fn entry_constructors() {
    let entry = LogEntry::warning("PacketLoss", "Packet lost from A to B")
        .with_detail("Size: 1000 bytes");
    assert_eq!(entry.level, LogLevel::Warning);
    assert_eq!(entry.source, "PacketLoss");
    assert_eq!(entry.detail.as_deref(), Some("Size: 1000 bytes"));
}

#[test]
fn entry_display_format() {
    let entry = LogEntry::info("Simulation", "Simulation started");
    let rendered = entry.to_string();
    assert!(rendered.starts_with('['));
    assert!(rendered.ends_with("[INFO] [Simulation] Simulation started"));
}

#[test]
fn level_ordering() {
    assert!(LogLevel::Debug < LogLevel::Info);
    assert!(LogLevel::Warning < LogLevel::Error);
    assert!(LogLevel::Error < LogLevel::Critical);
}
