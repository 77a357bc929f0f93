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

use std::sync::atomic::Ordering;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::small_office;
use crate::connection::ConnectionKind;
use crate::element::ElementKind;
use crate::engine::snapshot::{SimConnection, SimElement, SimSnapshot};
use crate::engine::worker::{TickError, Worker};
use crate::engine::{Shared, Simulator};
use crate::record::LogLevel;
use crate::topology::Topology;

/// Build a worker over an owned snapshot of the topology, driven by a seeded rng.
fn worker_for(t: &Topology, seed: u64) -> (Worker, Arc<Shared>) {
    let elements: Vec<_> = t.elements().cloned().collect();
    let connections: Vec<_> = t.connections().cloned().collect();
    let shared = Arc::new(Shared::default());
    let snapshot = SimSnapshot::new(&elements, &connections);
    let worker = Worker::new(snapshot, shared.clone(), StdRng::seed_from_u64(seed));
    (worker, shared)
}

fn two_hosts(packet_loss: f64) -> Topology {
    let mut t = Topology::new();
    let pc = t.add_element(ElementKind::Computer, "PC");
    let srv = t.add_element(ElementKind::Server, "Server");
    let c = t.add_connection(pc, srv, ConnectionKind::Ethernet).unwrap();
    t.get_connection_mut(c).unwrap().packet_loss = packet_loss;
    t
}

#[test]
fn speed_is_clamped() {
    let sim = Simulator::new();
    assert_eq!(sim.speed(), 1.0);
    sim.set_speed(0.0);
    assert_eq!(sim.speed(), 0.1);
    sim.set_speed(50.0);
    assert_eq!(sim.speed(), 10.0);
    sim.set_speed(2.5);
    assert_eq!(sim.speed(), 2.5);
}

#[test]
fn lifecycle_is_idempotent() {
    let (t, _, _) = small_office();
    let sim = Simulator::new();
    sim.set_topology(&t);

    sim.start();
    assert!(sim.is_running());
    sim.start();
    assert!(sim.is_running());

    sim.stop();
    assert!(!sim.is_running());
    sim.stop();
    assert!(!sim.is_running());

    let entries = sim.log_entries();
    let started = entries.iter().filter(|e| e.message == "Simulation started").count();
    let stopped = entries.iter().filter(|e| e.message == "Simulation stopped").count();
    assert_eq!(started, 1);
    assert_eq!(stopped, 1);
}

#[test]
fn reset_zeroes_counters_but_keeps_speed() {
    let (t, _, _) = small_office();
    let sim = Simulator::new();
    sim.set_topology(&t);
    sim.set_speed(3.0);

    sim.start();
    sim.stop();
    sim.reset();

    assert!(!sim.is_running());
    assert_eq!(sim.simulation_time(), 0.0);
    assert_eq!(sim.packet_count(), 0);
    assert!(sim.log_entries().is_empty());
    assert_eq!(sim.speed(), 3.0);
}

#[test]
fn state_change_fires_on_start_and_stop() {
    use std::sync::atomic::AtomicUsize;
    let (t, _, _) = small_office();
    let sim = Simulator::new();
    sim.set_topology(&t);
    let transitions = Arc::new(AtomicUsize::new(0));
    let c = transitions.clone();
    sim.on_state_changed(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });

    sim.start();
    sim.stop();
    // one for the start, one for the worker-side stop; link toggles would add more, but a
    // run this short never ticks
    assert!(transitions.load(Ordering::SeqCst) >= 2);
}

#[test]
fn lossless_link_only_sends() {
    let t = two_hosts(0.0);
    let (mut worker, shared) = worker_for(&t, 42);
    for _ in 0..200 {
        worker.tick().unwrap();
    }

    let entries = shared.log.snapshot();
    let sent = entries.iter().filter(|e| e.source == "PacketTransfer").count();
    let lost = entries.iter().filter(|e| e.source == "PacketLoss").count();
    assert_eq!(lost, 0);
    assert!(sent > 0);
    assert_eq!(shared.packets.load(Ordering::SeqCst), sent as u64);
}

#[test]
fn full_loss_link_never_sends() {
    let t = two_hosts(100.0);
    let (mut worker, shared) = worker_for(&t, 42);
    for _ in 0..200 {
        worker.tick().unwrap();
    }

    let entries = shared.log.snapshot();
    let sent = entries.iter().filter(|e| e.source == "PacketTransfer").count();
    let lost = entries.iter().filter(|e| e.source == "PacketLoss").count();
    assert_eq!(sent, 0);
    assert!(lost > 0);
    assert!(entries
        .iter()
        .filter(|e| e.source == "PacketLoss")
        .all(|e| e.level == LogLevel::Warning));
    // the lost entries name the link parameters, just like the sent ones
    assert!(entries
        .iter()
        .filter(|e| e.source == "PacketLoss")
        .all(|e| {
            let detail = e.detail.as_deref().unwrap_or("");
            detail.contains("Latency: 1 ms") && detail.contains("Type: Ethernet")
        }));
    assert_eq!(shared.packets.load(Ordering::SeqCst), lost as u64);
}

#[test]
fn seeded_runs_are_reproducible() {
    let t = two_hosts(50.0);
    let run = |seed| {
        let (mut worker, shared) = worker_for(&t, seed);
        for _ in 0..100 {
            worker.tick().unwrap();
        }
        let messages: Vec<_> = shared.log.snapshot().into_iter().map(|e| e.message).collect();
        (shared.packets.load(Ordering::SeqCst), messages)
    };
    assert_eq!(run(7), run(7));
    assert_ne!(run(7), run(8));
}

#[test]
fn time_advances_with_speed() {
    let t = two_hosts(0.0);
    let (mut worker, shared) = worker_for(&t, 1);
    shared.clock.lock().unwrap().speed = 2.0;
    for _ in 0..50 {
        worker.tick().unwrap();
    }
    let time = shared.clock.lock().unwrap().time;
    assert!((time - 10.0).abs() < 1e-9);
}

#[test]
fn bad_snapshot_endpoints_fault_the_tick_but_nothing_else() {
    let shared = Arc::new(Shared::default());
    // at speed 10 the transfer draw fires on every tick
    shared.clock.lock().unwrap().speed = 10.0;
    let snapshot = SimSnapshot {
        elements: vec![SimElement {
            name: "A".to_string(),
            kind: ElementKind::Computer,
        }],
        connections: vec![SimConnection {
            source: 0,
            target: 5,
            kind: ConnectionKind::Ethernet,
            label: "A - ?".to_string(),
            active: true,
            latency: 1.0,
            packet_loss: 0.0,
        }],
    };
    let mut worker = Worker::new(snapshot, shared.clone(), StdRng::seed_from_u64(1));

    let err = worker.tick().unwrap_err();
    assert_eq!(
        err,
        TickError::BadEndpoint {
            label: "A - ?".to_string(),
            position: 5,
        }
    );

    // the fault left no trace: no packet was counted, and the next tick still runs
    assert_eq!(shared.packets.load(Ordering::SeqCst), 0);
    assert!(worker.tick().is_err());
    assert!((shared.clock.lock().unwrap().time - 2.0).abs() < 1e-9);
}

#[test]
fn link_toggles_stay_in_the_snapshot() {
    let (t, _, _) = small_office();
    let (mut worker, shared) = worker_for(&t, 3);
    for _ in 0..2000 {
        worker.tick().unwrap();
    }
    // the seeded run flipped at least one link
    assert!(shared
        .log
        .snapshot()
        .iter()
        .any(|e| e.source == "LinkStatus"));
    // but only inside the worker's own copy
    assert!(t.connections().all(|c| c.active));
}
