use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Value handed across the channel, or the reserved terminal signal.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentResult<T> {
    Continue(T),
    Truncated,
}

impl<T> AgentResult<T> {
    pub fn is_truncated(&self) -> bool {
        matches!(self, AgentResult::Truncated)
    }
}

#[derive(Debug)]
enum Slot<O, A> {
    Empty,
    /// Published by the simulation, not yet picked up by the bridge.
    Observation(O),
    /// Picked up by the bridge, waiting for the answer.
    AwaitingAction,
    Action(A),
}

#[derive(Debug)]
struct ChannelState<O, A> {
    slot: Slot<O, A>,
    shutdown: bool,
}

/// Single-slot synchronous handoff between the simulation thread and the bridge thread.
///
/// Every action answers the most recent observation; nothing is queued. After
/// [`DecisionChannel::shutdown`] every blocked or later call returns immediately.
#[derive(Debug)]
pub struct DecisionChannel<O, A> {
    pair: Arc<(Mutex<ChannelState<O, A>>, Condvar)>,
}

impl<O, A> Clone for DecisionChannel<O, A> {
    fn clone(&self) -> Self {
        Self { pair: self.pair.clone() }
    }
}

impl<O, A> Default for DecisionChannel<O, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, A> DecisionChannel<O, A> {
    pub fn new() -> Self {
        let state = ChannelState { slot: Slot::Empty, shutdown: false };
        Self { pair: Arc::new((Mutex::new(state), Condvar::new())) }
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState<O, A>> {
        self.pair.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, ChannelState<O, A>>) -> MutexGuard<'a, ChannelState<O, A>> {
        self.pair.1.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulation side: publishes `observation` and blocks until it is answered or the channel shuts down.
    pub fn publish_observation(&self, observation: O) -> Result<AgentResult<A>> {
        let mut state = self.lock();
        if state.shutdown {
            return Ok(AgentResult::Truncated);
        }
        if !matches!(state.slot, Slot::Empty) {
            return Err(Error::ObservationPending);
        }

        state.slot = Slot::Observation(observation);
        self.pair.1.notify_all();

        loop {
            if state.shutdown {
                state.slot = Slot::Empty;
                return Ok(AgentResult::Truncated);
            }
            match std::mem::replace(&mut state.slot, Slot::Empty) {
                Slot::Action(action) => return Ok(AgentResult::Continue(action)),
                other => state.slot = other,
            }
            state = self.wait(state);
        }
    }

    /// Bridge side: blocks until an observation is available or the channel shuts down.
    pub fn consume_observation(&self) -> AgentResult<O> {
        let mut state = self.lock();
        loop {
            if let Some(result) = Self::take_observation(&mut state) {
                return result;
            }
            state = self.wait(state);
        }
    }

    /// Like [`DecisionChannel::consume_observation`], but gives up after `timeout`.
    pub fn try_consume_observation(&self, timeout: Duration) -> Option<AgentResult<O>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if let Some(result) = Self::take_observation(&mut state) {
                return Some(result);
            }
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let (guard, _) = self.pair.1.wait_timeout(state, remaining).unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }

    fn take_observation(state: &mut ChannelState<O, A>) -> Option<AgentResult<O>> {
        if state.shutdown {
            return Some(AgentResult::Truncated);
        }
        match std::mem::replace(&mut state.slot, Slot::Empty) {
            Slot::Observation(observation) => {
                state.slot = Slot::AwaitingAction;
                Some(AgentResult::Continue(observation))
            }
            other => {
                state.slot = other;
                None
            }
        }
    }

    /// Bridge side: answers the observation consumed last.
    pub fn publish_action(&self, action: A) -> Result<()> {
        let mut state = self.lock();
        if state.shutdown {
            return Err(Error::ChannelShutdown);
        }
        if !matches!(state.slot, Slot::AwaitingAction) {
            return Err(Error::NoPendingObservation);
        }

        state.slot = Slot::Action(action);
        self.pair.1.notify_all();
        Ok(())
    }

    /// Wakes every waiter with the truncated signal. Calling it again has no effect.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        if !state.shutdown {
            log::debug!("Decision channel shut down.");
        }
        state.shutdown = true;
        self.pair.1.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    /// Blocks until [`DecisionChannel::shutdown`] was called.
    pub fn wait_for_shutdown(&self) {
        let mut state = self.lock();
        while !state.shutdown {
            state = self.wait(state);
        }
    }
}
