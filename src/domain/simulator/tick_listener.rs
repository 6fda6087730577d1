use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::simulator::context::SimulationContext;
use crate::error::Result;

/// A component the [`TickEngine`](crate::domain::simulator::tick_engine::TickEngine) invokes at
/// every scheduling instant.
///
/// Listeners run in registration order. A listener that reports [`TickListener::is_done`] is
/// removed only after all listeners of the current instant ran.
pub trait TickListener {
    /// Name used in log messages.
    fn name(&self) -> &'static str;

    /// Called once per scheduling instant.
    ///
    /// # Arguments
    /// * `time` - The simulated time of the instant.
    /// * `ctx` - Registries and run flags of the current run.
    ///
    /// An error aborts the run.
    fn on_tick(&mut self, time: f64, ctx: &mut SimulationContext) -> Result<()>;

    fn is_done(&self) -> bool {
        false
    }
}

impl<T: TickListener + ?Sized> TickListener for Rc<RefCell<T>> {
    fn name(&self) -> &'static str {
        self.borrow().name()
    }

    fn on_tick(&mut self, time: f64, ctx: &mut SimulationContext) -> Result<()> {
        self.borrow_mut().on_tick(time, ctx)
    }

    fn is_done(&self) -> bool {
        self.borrow().is_done()
    }
}
