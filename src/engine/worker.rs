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

//! The simulation worker: the tick loop and everything that happens inside a tick.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;

use super::snapshot::SimSnapshot;
use super::Shared;
use crate::element::ElementKind;
use crate::record::LogEntry;

/// Wall-clock period of one tick.
pub(crate) const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Simulated seconds one tick advances at speed 1.0.
const BASE_TIME_INCREMENT: f64 = 0.1;

/// Per-tick, per-active-connection packet transfer probability at speed 1.0.
const TRANSFER_PROBABILITY: f64 = 0.2;

/// Per-tick random event probability at speed 1.0.
const EVENT_PROBABILITY: f64 = 0.05;

/// A fault inside a single tick. Logged and swallowed; never ends the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum TickError {
    /// A snapshot connection points outside the snapshot's element vector.
    #[error("connection {label:?} references element position {position} outside the snapshot")]
    BadEndpoint {
        label: String,
        position: usize,
    },
}

/// The state owned by the worker thread. Tests drive [`Worker::tick`] directly with a seeded
/// rng instead of spawning the loop.
#[derive(Debug)]
pub(crate) struct Worker {
    pub(crate) snapshot: SimSnapshot,
    pub(crate) shared: Arc<Shared>,
    pub(crate) rng: StdRng,
}

impl Worker {
    pub(crate) fn new(snapshot: SimSnapshot, shared: Arc<Shared>, rng: StdRng) -> Self {
        Self {
            snapshot,
            shared,
            rng,
        }
    }

    /// The loop of the worker thread. The sleep doubles as the cancellation point: a message
    /// (or a dropped sender) on `cancel` ends the run immediately.
    pub(crate) fn run(mut self, cancel: Receiver<()>) {
        self.shared
            .record(LogEntry::info("Simulation", "Simulation started"));
        loop {
            match cancel.recv_timeout(TICK_PERIOD) {
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = self.tick() {
                        self.shared
                            .record(LogEntry::error("Simulation", e.to_string()));
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.shared
            .record(LogEntry::info("Simulation", "Simulation stopped"));
        self.shared.running.store(false, Ordering::SeqCst);
        self.shared.notify_state();
    }

    /// Advance the simulation by one tick: move simulated time forward, give every active
    /// connection a chance to transfer a packet, and maybe trigger one random event.
    pub(crate) fn tick(&mut self) -> Result<(), TickError> {
        let speed = {
            let mut clock = self.shared.clock.lock().unwrap();
            clock.time += BASE_TIME_INCREMENT * clock.speed;
            clock.speed
        };

        let transfer_p = (TRANSFER_PROBABILITY * speed).min(1.0);
        for ci in 0..self.snapshot.connections.len() {
            if self.snapshot.connections[ci].active && self.rng.gen::<f64>() < transfer_p {
                self.transfer_packet(ci)?;
            }
        }

        if self.rng.gen::<f64>() < (EVENT_PROBABILITY * speed).min(1.0) {
            self.random_event()?;
        }
        Ok(())
    }

    fn element_name(&self, label: &str, position: usize) -> Result<&str, TickError> {
        self.snapshot
            .elements
            .get(position)
            .map(|e| e.name.as_str())
            .ok_or_else(|| TickError::BadEndpoint {
                label: label.to_string(),
                position,
            })
    }

    fn transfer_packet(&mut self, ci: usize) -> Result<(), TickError> {
        let conn = &self.snapshot.connections[ci];
        let (label, source, target) = (conn.label.clone(), conn.source, conn.target);
        let (kind, latency, packet_loss) = (conn.kind, conn.latency, conn.packet_loss);
        let from = self.element_name(&label, source)?.to_string();
        let to = self.element_name(&label, target)?.to_string();

        self.shared.packets.fetch_add(1, Ordering::SeqCst);
        let size: u32 = self.rng.gen_range(64..=1500);
        let lost = self.rng.gen::<f64>() < packet_loss / 100.0;
        let entry = if lost {
            LogEntry::warning("PacketLoss", format!("Packet lost from {from} to {to}"))
                .with_detail(format!(
                    "Size: {size} bytes, Latency: {latency} ms, Type: {kind}"
                ))
        } else {
            LogEntry::debug("PacketTransfer", format!("Packet sent from {from} to {to}"))
                .with_detail(format!(
                    "Size: {size} bytes, Latency: {latency} ms, Type: {kind}"
                ))
        };
        self.shared.record(entry);
        Ok(())
    }

    /// One of five event categories, applied to a uniformly chosen element. Categories that do
    /// not apply to the chosen element (e.g. a DHCP renewal on a printer) do nothing.
    fn random_event(&mut self) -> Result<(), TickError> {
        if self.snapshot.elements.is_empty() {
            return Ok(());
        }
        let ei = self.rng.gen_range(0..self.snapshot.elements.len());
        let name = self.snapshot.elements[ei].name.clone();
        let kind = self.snapshot.elements[ei].kind;

        match self.rng.gen_range(0..5) {
            0 => self.toggle_incident_link(ei),
            1 => {
                let (cpu_range, ram) = match kind {
                    ElementKind::Server => (50..=100u32, 64),
                    ElementKind::Computer => (30..=90u32, 16),
                    _ => return Ok(()),
                };
                let cpu = self.rng.gen_range(cpu_range);
                self.shared.record(
                    LogEntry::info("ResourceUsage", format!("{name} CPU usage at {cpu}%"))
                        .with_detail(format!("RAM: {ram} GB")),
                );
            }
            2 => {
                if kind == ElementKind::Router {
                    self.shared.record(
                        LogEntry::info("DHCP", format!("{name} renewed DHCP leases"))
                            .with_detail("IP pool: 192.168.1.0/24"),
                    );
                }
            }
            3 => {
                let usage = self.rng.gen_range(1..=100u32);
                self.shared.record(LogEntry::info(
                    "BandwidthUsage",
                    format!("{name} bandwidth utilization at {usage}%"),
                ));
            }
            _ => {
                if self.rng.gen::<f64>() < 0.3 {
                    let octet = self.rng.gen_range(2..=254u32);
                    self.shared.record(
                        LogEntry::warning(
                            "Security",
                            format!("Suspicious connection attempt blocked on {name}"),
                        )
                        .with_detail(format!("Source: 192.168.1.{octet}")),
                    );
                } else {
                    self.shared.record(
                        LogEntry::info("Security", format!("Authentication successful on {name}"))
                            .with_detail("User: admin"),
                    );
                }
            }
        }
        Ok(())
    }

    /// Flip the active flag of a uniformly chosen connection incident to the given element (if
    /// it has any). This mutates the snapshot only; the topology the snapshot was taken from is
    /// untouched.
    fn toggle_incident_link(&mut self, ei: usize) {
        let incident: Vec<usize> = self
            .snapshot
            .connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.source == ei || c.target == ei)
            .map(|(i, _)| i)
            .collect();
        if incident.is_empty() {
            return;
        }
        let ci = incident[self.rng.gen_range(0..incident.len())];
        let conn = &mut self.snapshot.connections[ci];
        conn.active = !conn.active;
        let state = if conn.active {
            "came back up"
        } else {
            "went down"
        };
        let entry = LogEntry::info("LinkStatus", format!("Link {} {}", conn.label, state));
        self.shared.record(entry);
        self.shared.notify_state();
    }
}
