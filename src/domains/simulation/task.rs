use crate::domains::jitter::Randomizer;
use std::cmp::Ordering;

/// Everything a deferred emission needs, captured when it is scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionPayload {
    pub imsi: u64,
    pub antenna_id: i64,
    /// Distance at the start of the tick that scheduled the emission.
    pub distance: f64,
    pub signal_strength: Randomizer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    Tick,
    Register { antenna: usize },
    Emit(EmissionPayload),
}

#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub fire_at: u64,
    /// Insertion order, breaks ties between tasks due at the same time.
    pub seq: u64,
    pub kind: TaskKind,
}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the earliest task first
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
