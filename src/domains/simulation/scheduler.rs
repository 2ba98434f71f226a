use super::clock::SimClock;
use super::ports::{DynCollector, DynHasher, Measurement};
use super::scenario::{PollConfig, Scenario};
use super::task::{EmissionPayload, ScheduledTask, TaskKind};
use crate::common::{AggregateRoot, DomainError, DomainEvent, DomainResult};
use crate::domains::antenna::Antenna;
use crate::domains::jitter::randomize;
use crate::domains::logger::DynLogger;
use crate::domains::person::Person;
use crate::domains::propagation::DynPropagationModel;
use rand::rngs::StdRng;
use std::collections::BinaryHeap;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub ticks: u64,
    pub scheduled_emissions: u64,
    pub delivered: u64,
    pub dropped: u64,
    pub skipped_pairs: u64,
    pub registration_attempts: u64,
    pub registration_failures: u64,
}

/// Outcome of a remote call, handed back to the run loop.
enum Completion {
    Registration { antenna: usize, outcome: DomainResult<i64> },
    Emission { antenna_id: i64, outcome: DomainResult<()> },
}

enum Wake {
    Completed(Completion),
    Due,
}

/// Fixed-interval simulation loop.
///
/// Owns the working set of persons and antennas and a queue of deferred
/// tasks (ticks, registration attempts, emissions). Only the run loop mutates
/// entity state; remote calls run on spawned tasks and report back through a
/// channel.
pub struct Simulation {
    poll: PollConfig,
    registration_backoff_ms: u64,
    model: DynPropagationModel,
    persons: Vec<Person>,
    antennas: Vec<Antenna>,
    collector: DynCollector,
    hasher: DynHasher,
    logger: DynLogger,
    clock: Box<dyn SimClock>,
    rng: StdRng,
    queue: BinaryHeap<ScheduledTask>,
    next_seq: u64,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    started: bool,
    stats: SimulationStats,
}

impl Simulation {
    pub fn new(
        scenario: Scenario,
        collector: DynCollector,
        hasher: DynHasher,
        logger: DynLogger,
        clock: Box<dyn SimClock>,
        rng: StdRng,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            poll: scenario.poll,
            registration_backoff_ms: scenario.registration_backoff_ms,
            model: scenario.model,
            persons: scenario.persons,
            antennas: scenario.antennas,
            collector,
            hasher,
            logger,
            clock,
            rng,
            queue: BinaryHeap::new(),
            next_seq: 0,
            completion_tx,
            completion_rx,
            in_flight: 0,
            started: false,
            stats: SimulationStats::default(),
        }
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn antennas(&self) -> &[Antenna] {
        &self.antennas
    }

    /// Collector identifiers of the antennas currently taking part.
    pub fn visible_antennas(&self) -> Vec<i64> {
        self.antennas.iter().filter_map(Antenna::collector_id).collect()
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Queues one registration per antenna and the first tick. Idempotent.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let now = self.clock.now_ms();
        for index in 0..self.antennas.len() {
            self.schedule(now, TaskKind::Register { antenna: index });
        }
        self.schedule(now, TaskKind::Tick);

        self.logger.info(&format!(
            "Simulation started: {} persons, {} antennas, {} model, poll every {} ms",
            self.persons.len(),
            self.antennas.len(),
            self.model.name(),
            self.poll.interval_ms
        ));
    }

    pub async fn run_for(&mut self, duration_ms: u64) -> DomainResult<()> {
        let deadline = self.clock.now_ms().saturating_add(duration_ms);
        self.run_until(deadline).await
    }

    pub async fn run_forever(&mut self) -> DomainResult<()> {
        self.run_until(u64::MAX).await
    }

    /// Executes every task due at or before `deadline_ms`.
    pub async fn run_until(&mut self, deadline_ms: u64) -> DomainResult<()> {
        self.start();

        loop {
            while let Ok(completion) = self.completion_rx.try_recv() {
                self.settle(completion);
            }

            if self.clock.is_virtual() && self.in_flight > 0 {
                if let Some(completion) = self.completion_rx.recv().await {
                    self.settle(completion);
                }
                continue;
            }

            let due = match self.queue.peek() {
                Some(task) if task.fire_at <= deadline_ms => task.fire_at,
                _ => break,
            };

            if self.in_flight > 0 {
                let wake = tokio::select! {
                    biased;
                    Some(completion) = self.completion_rx.recv() => Wake::Completed(completion),
                    _ = self.clock.wait_until(due) => Wake::Due,
                };
                if let Wake::Completed(completion) = wake {
                    self.settle(completion);
                    continue;
                }
            } else {
                self.clock.wait_until(due).await;
            }

            if let Some(task) = self.queue.pop() {
                self.execute(task)?;
            }
        }

        Ok(())
    }

    fn schedule(&mut self, fire_at: u64, kind: TaskKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(ScheduledTask { fire_at, seq, kind });
    }

    fn execute(&mut self, task: ScheduledTask) -> DomainResult<()> {
        match task.kind {
            TaskKind::Tick => self.tick(),
            TaskKind::Register { antenna } => self.register(antenna),
            TaskKind::Emit(payload) => self.emit(payload),
        }
    }

    fn tick(&mut self) -> DomainResult<()> {
        let now = self.clock.now_ms();
        let interval = self.poll.interval_ms;
        let delta_seconds = interval as f64 / 1000.0;
        let mut emissions = Vec::new();

        for person in self.persons.iter_mut() {
            person.advance(delta_seconds);

            for antenna in &self.antennas {
                let Some(antenna_id) = antenna.collector_id() else {
                    continue;
                };
                let distance = person.position.distance_to(&antenna.position);
                match self.model.in_range(distance) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        self.stats.skipped_pairs += 1;
                        self.logger.warn(&format!(
                            "Skipping person {} at antenna {}: {}",
                            person.imsi, antenna.id, e
                        ));
                        continue;
                    }
                }

                let delay = randomize(&mut self.rng, interval as f64 / 2.0, &self.poll.deviance)?;
                let fire_at = now.saturating_add(delay.max(0.0).round() as u64);
                emissions.push((
                    fire_at,
                    EmissionPayload {
                        imsi: person.imsi,
                        antenna_id,
                        distance,
                        signal_strength: person.signal_strength,
                    },
                ));
            }
        }

        self.stats.ticks += 1;
        self.stats.scheduled_emissions += emissions.len() as u64;
        for (fire_at, payload) in emissions {
            self.schedule(fire_at, TaskKind::Emit(payload));
        }
        self.schedule(now.saturating_add(interval), TaskKind::Tick);
        Ok(())
    }

    fn register(&mut self, index: usize) -> DomainResult<()> {
        let antenna = self.antennas.get_mut(index).ok_or_else(|| {
            DomainError::invalid_argument(format!("no antenna at index {}", index))
        })?;
        if antenna.is_registered() {
            return Ok(());
        }
        antenna.begin_registration()?;
        let position = antenna.position;
        self.flush_events(index);
        self.stats.registration_attempts += 1;

        let collector = self.collector.clone();
        let tx = self.completion_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = collector.register_antenna(position.x, position.y).await;
            let _ = tx.send(Completion::Registration { antenna: index, outcome });
        });
        Ok(())
    }

    fn emit(&mut self, payload: EmissionPayload) -> DomainResult<()> {
        let identifier = self.hasher.hash(&payload.imsi.to_string());
        let expected = self.model.strength_at(payload.distance)?;
        let signal_strength = randomize(&mut self.rng, expected, &payload.signal_strength)?;
        let measurement = Measurement {
            identifier,
            antenna_id: payload.antenna_id,
            timestamp_ms: self.clock.timestamp_ms(),
            signal_strength,
        };

        let collector = self.collector.clone();
        let tx = self.completion_tx.clone();
        let antenna_id = payload.antenna_id;
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = collector.log_measurement(measurement).await;
            let _ = tx.send(Completion::Emission { antenna_id, outcome });
        });
        Ok(())
    }

    fn settle(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Registration { antenna, outcome } => self.settle_registration(antenna, outcome),
            Completion::Emission { antenna_id, outcome } => match outcome {
                Ok(()) => self.stats.delivered += 1,
                Err(e) => {
                    // Not retried: the next tick produces a fresher measurement.
                    self.stats.dropped += 1;
                    self.logger.error(&format!("Log error for antenna {}: {}", antenna_id, e));
                }
            },
        }
    }

    fn settle_registration(&mut self, index: usize, outcome: DomainResult<i64>) {
        let Some(antenna) = self.antennas.get_mut(index) else {
            return;
        };

        let failure = match outcome.and_then(|id| antenna.complete_registration(id).map(|_| id)) {
            Ok(id) => {
                self.logger.info(&format!("Successfully registered antenna {}, id: {}", antenna.id, id));
                None
            }
            Err(e) => {
                let reason = e.to_string();
                if let Err(transition) = antenna.registration_failed(reason.clone()) {
                    self.logger.warn(&transition.to_string());
                }
                self.logger.warn(&format!(
                    "Could not register antenna {}, retrying in {} ms: {}",
                    antenna.id, self.registration_backoff_ms, reason
                ));
                Some(reason)
            }
        };
        self.flush_events(index);

        if failure.is_some() {
            self.stats.registration_failures += 1;
            let retry_at = self.clock.now_ms().saturating_add(self.registration_backoff_ms);
            self.schedule(retry_at, TaskKind::Register { antenna: index });
        }
    }

    fn flush_events(&mut self, index: usize) {
        if let Some(antenna) = self.antennas.get_mut(index) {
            for event in antenna.uncommitted_events() {
                tracing::debug!(
                    antenna = event.aggregate_id(),
                    event = event.event_type(),
                    at = %event.occurred_at(),
                    "antenna event"
                );
            }
            antenna.mark_events_as_committed();
        }
    }
}
