//! Grid store
//!
//! Owns the fixed-size visit counter grid and the recording flag. The flag
//! and the counters sit behind one short-lived lock, so concurrent
//! increments never lose updates, a snapshot never sees a torn cell, and no
//! increment lands after `stop` has returned.

use crate::recorder::state::RecordingState;
use parking_lot::Mutex as ParkingMutex;

struct GridCells {
    is_recording: bool,
    counts: Vec<u32>,
    total: u64,
}

pub struct GridStore {
    width: u32,
    height: u32,
    cells: ParkingMutex<GridCells>,
}

impl GridStore {
    /// Create a zeroed `width x height` grid in the `Idle` state.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: ParkingMutex::new(GridCells {
                is_recording: false,
                counts: vec![0; len],
                total: 0,
            }),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y)
    }

    /// Switch to `Recording`. Returns the resulting state.
    pub fn start(&self) -> RecordingState {
        let was_recording = std::mem::replace(&mut self.cells.lock().is_recording, true);
        if was_recording {
            tracing::debug!("start requested while already recording");
        }
        RecordingState::Recording
    }

    /// Switch to `Idle`. Returns the resulting state.
    ///
    /// Once this returns, no further increment can change the grid until the
    /// next `start`.
    pub fn stop(&self) -> RecordingState {
        let was_recording = std::mem::replace(&mut self.cells.lock().is_recording, false);
        if !was_recording {
            tracing::debug!("stop requested while idle");
        }
        RecordingState::Idle
    }

    pub fn state(&self) -> RecordingState {
        RecordingState::from_flag(self.cells.lock().is_recording)
    }

    /// Count one visit at `(x, y)`.
    ///
    /// No-op unless recording and in bounds. Returns whether a cell changed.
    pub fn increment(&self, x: i64, y: i64) -> bool {
        if !self.contains(x, y) {
            return false;
        }

        let index = y as usize * self.width as usize + x as usize;
        let mut cells = self.cells.lock();
        if !cells.is_recording {
            return false;
        }
        let cell = &mut cells.counts[index];
        // Saturated cells stay at the maximum.
        if *cell == u32::MAX {
            return false;
        }
        *cell += 1;
        cells.total += 1;
        true
    }

    /// Visit count at `(x, y)`, or `None` when out of bounds.
    pub fn cell(&self, x: i64, y: i64) -> Option<u32> {
        if !self.contains(x, y) {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        Some(self.cells.lock().counts[index])
    }

    /// Sum over all cells.
    pub fn total(&self) -> u64 {
        self.cells.lock().total
    }

    /// Copy the whole grid under the lock.
    pub fn snapshot(&self) -> GridSnapshot {
        let cells = self.cells.lock();
        GridSnapshot {
            width: self.width,
            height: self.height,
            counts: cells.counts.clone(),
            total: cells.total,
        }
    }
}

/// Point-in-time copy of the grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    pub width: u32,
    pub height: u32,
    pub counts: Vec<u32>,
    pub total: u64,
}

impl GridSnapshot {
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.counts[y as usize * self.width as usize + x as usize]
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
