use crate::error::{Error, Result};

/// Counts how many tasks wait in the workflow buffer and how many were handed to the system.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStateSensor {
    buffered: usize,
    released: usize,
}

impl TaskStateSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer_tasks(&mut self, count: usize) {
        self.buffered += count;
    }

    /// Moves `count` tasks from buffered to released.
    pub fn release_tasks(&mut self, count: usize) -> Result<()> {
        if count > self.buffered {
            return Err(Error::TaskStateViolation(format!("cannot release {} tasks, only {} are buffered", count, self.buffered)));
        }
        self.buffered -= count;
        self.released += count;
        Ok(())
    }

    pub fn buffered_tasks(&self) -> usize {
        self.buffered
    }

    pub fn released_tasks(&self) -> usize {
        self.released
    }
}
