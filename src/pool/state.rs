//! Worker lifecycle states and the table that stores them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally observable lifecycle phase of one worker.
///
/// A worker moves `Starting -> (Idle | Working)* -> Terminating`. `Sigterm`
/// is written by the pool, never by the worker, and once set it is only ever
/// replaced by the worker's final `Terminating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerState {
    /// Spawned, first loop iteration not reached yet
    Starting,
    /// Executing a dequeued job
    Working,
    /// Found the queue empty and is sleeping
    Idle,
    /// Asked by the pool to stop after the current iteration
    Sigterm,
    /// Left its loop; the thread is about to finish
    Terminating,
}

impl WorkerState {
    /// Returns true for states in which the worker still loops.
    pub fn is_live(self) -> bool {
        !matches!(self, WorkerState::Terminating)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Starting => "STARTING",
            WorkerState::Working => "WORKING",
            WorkerState::Idle => "IDLE",
            WorkerState::Sigterm => "SIGTERM",
            WorkerState::Terminating => "TERMINATING",
        };
        f.write_str(name)
    }
}

/// State vector indexed by worker id.
///
/// Always accessed under the pool's state lock. Its length tracks the number
/// of worker handles the pool holds.
#[derive(Debug, Default, Clone)]
pub(crate) struct StateTable {
    states: Vec<WorkerState>,
}

impl StateTable {
    /// Registers a new worker in `Starting` and returns its id.
    pub(crate) fn push_starting(&mut self) -> usize {
        self.states.push(WorkerState::Starting);
        self.states.len() - 1
    }

    /// Removes the most recently registered slot (spawn rollback).
    pub(crate) fn pop(&mut self) -> Option<WorkerState> {
        self.states.pop()
    }

    pub(crate) fn get(&self, id: usize) -> Option<WorkerState> {
        self.states.get(id).copied()
    }

    /// Worker-side transition: a pending `Sigterm` is never overwritten.
    ///
    /// Returns the state the slot holds afterwards.
    pub(crate) fn announce(&mut self, id: usize, next: WorkerState) -> Option<WorkerState> {
        let slot = self.states.get_mut(id)?;
        if *slot != WorkerState::Sigterm {
            *slot = next;
        }
        Some(*slot)
    }

    /// Unconditional write, used for the final `Terminating`.
    pub(crate) fn set(&mut self, id: usize, state: WorkerState) {
        if let Some(slot) = self.states.get_mut(id) {
            *slot = state;
        }
    }

    /// Sends `Sigterm` to every worker that has not already left its loop.
    pub(crate) fn signal_all(&mut self) {
        for slot in self.states.iter_mut().filter(|s| s.is_live()) {
            *slot = WorkerState::Sigterm;
        }
    }

    pub(crate) fn any_working(&self) -> bool {
        self.states.iter().any(|s| *s == WorkerState::Working)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_live()).count()
    }

    pub(crate) fn snapshot(&self) -> Vec<WorkerState> {
        self.states.clone()
    }

    pub(crate) fn clear(&mut self) {
        self.states.clear();
    }
}
