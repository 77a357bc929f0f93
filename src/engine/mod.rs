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

//! The simulation engine.
//!
//! The [`Simulator`] is the control surface: it holds owned copies of the elements and
//! connections to simulate, and moves between `Idle` and `Running`. [`Simulator::start`] takes
//! a snapshot of those copies and hands it to a background worker thread that ticks every
//! 100 ms until cancelled; the worker owns the snapshot exclusively, so topology edits made
//! while a run is active only affect the *next* run.
//!
//! All simulation activity lands in a bounded [`SimulationLog`](crate::record::SimulationLog)
//! shared between the worker and any number of reader threads.

pub(crate) mod snapshot;
pub(crate) mod worker;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Sender};
use rand::rngs::StdRng;
use rand::SeedableRng;

use self::snapshot::SimSnapshot;
use self::worker::Worker;
use crate::connection::Connection;
use crate::element::Element;
use crate::record::{LogEntry, SimulationLog};
use crate::topology::Topology;

/// The lower bound of the speed factor.
pub const MIN_SPEED: f64 = 0.1;

/// The upper bound of the speed factor.
pub const MAX_SPEED: f64 = 10.0;

/// Simulated clock state. Written by the worker, read by everyone.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Clock {
    pub time: f64,
    pub speed: f64,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            time: 0.0,
            speed: 1.0,
        }
    }
}

type Callback = Box<dyn Fn() + Send + Sync + 'static>;

/// State shared between the control surface and the worker thread.
pub(crate) struct Shared {
    pub running: AtomicBool,
    pub packets: AtomicU64,
    pub clock: Mutex<Clock>,
    pub log: SimulationLog,
    state_subscribers: Mutex<Vec<Callback>>,
}

impl Default for Shared {
    fn default() -> Self {
        Self {
            running: AtomicBool::new(false),
            packets: AtomicU64::new(0),
            clock: Mutex::new(Clock::default()),
            log: SimulationLog::new(),
            state_subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl Shared {
    pub(crate) fn record(&self, entry: LogEntry) {
        self.log.append(entry);
    }

    pub(crate) fn notify_state(&self) {
        for f in self.state_subscribers.lock().unwrap().iter() {
            f();
        }
    }
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("running", &self.running.load(Ordering::SeqCst))
            .field("packets", &self.packets.load(Ordering::SeqCst))
            .field("clock", &*self.clock.lock().unwrap())
            .finish()
    }
}

struct WorkerHandle {
    cancel: Sender<()>,
    thread: JoinHandle<()>,
}

/// The simulation control surface.
///
/// All methods take `&self`; the simulator is safe to share between threads (e.g. behind an
/// `Arc`). `start`, `stop` and `reset` are idempotent. Dropping a simulator stops and joins a
/// running worker.
pub struct Simulator {
    shared: Arc<Shared>,
    elements: Mutex<Vec<Element>>,
    connections: Mutex<Vec<Connection>>,
    worker: Mutex<Option<WorkerHandle>>,
    seed: Mutex<Option<u64>>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// Create an idle simulator with no topology and speed 1.0.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            elements: Mutex::new(Vec::new()),
            connections: Mutex::new(Vec::new()),
            worker: Mutex::new(None),
            seed: Mutex::new(None),
        }
    }

    /// Like [`Simulator::new`], but every run draws its randomness from the given seed, making
    /// runs reproducible.
    pub fn with_seed(seed: u64) -> Self {
        let sim = Self::new();
        *sim.seed.lock().unwrap() = Some(seed);
        sim
    }

    /// Replace the elements used by the next run. A run that is already active keeps its
    /// snapshot.
    pub fn set_elements(&self, elements: Vec<Element>) {
        *self.elements.lock().unwrap() = elements;
    }

    /// Replace the connections used by the next run. A run that is already active keeps its
    /// snapshot.
    pub fn set_connections(&self, connections: Vec<Connection>) {
        *self.connections.lock().unwrap() = connections;
    }

    /// Store owned copies of all elements and connections of the topology for the next run.
    pub fn set_topology(&self, topology: &Topology) {
        self.set_elements(topology.elements().cloned().collect());
        self.set_connections(topology.connections().cloned().collect());
    }

    /// Set the speed factor, clamped to `[0.1, 10.0]`. Takes effect on the next tick, also for
    /// a run that is already active.
    pub fn set_speed(&self, speed: f64) {
        self.shared.clock.lock().unwrap().speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// The current speed factor.
    pub fn speed(&self) -> f64 {
        self.shared.clock.lock().unwrap().speed
    }

    /// The simulated time in seconds since the last reset.
    pub fn simulation_time(&self) -> f64 {
        self.shared.clock.lock().unwrap().time
    }

    /// The number of packets transferred (sent or lost) since the last reset.
    pub fn packet_count(&self) -> u64 {
        self.shared.packets.load(Ordering::SeqCst)
    }

    /// Whether a run is currently active.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// The simulation log.
    pub fn log(&self) -> &SimulationLog {
        &self.shared.log
    }

    /// An owned snapshot of the simulation log, oldest entry first.
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.shared.log.snapshot()
    }

    /// Register a callback that fires after every log append.
    pub fn on_log_changed(&self, f: impl Fn() + Send + Sync + 'static) {
        self.shared.log.subscribe(f);
    }

    /// Register a callback that fires on every run-state transition (start, stop) and on
    /// simulated link toggles.
    pub fn on_state_changed(&self, f: impl Fn() + Send + Sync + 'static) {
        self.shared.state_subscribers.lock().unwrap().push(Box::new(f));
    }

    /// Start a run. Takes a snapshot of the stored elements and connections and spawns the
    /// worker thread. Does nothing if a run is already active.
    pub fn start(&self) {
        let mut slot = self.worker.lock().unwrap();
        if self.is_running() {
            return;
        }
        // a finished handle may still sit in the slot after a worker-side shutdown
        if let Some(handle) = slot.take() {
            drop(handle.cancel);
            let _ = handle.thread.join();
        }

        let snapshot = SimSnapshot::new(
            &self.elements.lock().unwrap(),
            &self.connections.lock().unwrap(),
        );
        let rng = match *self.seed.lock().unwrap() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.shared.running.store(true, Ordering::SeqCst);
        self.shared.notify_state();

        let (cancel_tx, cancel_rx) = bounded(1);
        let worker = Worker::new(snapshot, self.shared.clone(), rng);
        let thread = std::thread::spawn(move || worker.run(cancel_rx));
        *slot = Some(WorkerHandle {
            cancel: cancel_tx,
            thread,
        });
    }

    /// Stop the active run and wait for the worker to finish. Does nothing if no run is
    /// active.
    pub fn stop(&self) {
        let handle = self.worker.lock().unwrap().take();
        if let Some(handle) = handle {
            drop(handle.cancel);
            let _ = handle.thread.join();
        }
    }

    /// Stop the active run, zero the simulated time and the packet counter, and clear the log.
    /// The speed factor is kept.
    pub fn reset(&self) {
        self.stop();
        self.shared.clock.lock().unwrap().time = 0.0;
        self.shared.packets.store(0, Ordering::SeqCst);
        self.shared.log.clear();
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("running", &self.is_running())
            .field("time", &self.simulation_time())
            .field("packets", &self.packet_count())
            .finish()
    }
}
