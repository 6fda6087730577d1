use crate::domain::simulator::context::SimulationContext;
use crate::domain::simulator::tick_listener::TickListener;
use crate::error::{Error, Result};

/// Drives simulated time and invokes every registered listener at each scheduling instant.
///
/// Instants are the tick boundaries `index * tick_interval` plus every cloudlet start or finish
/// in between, so completion times are observed exactly.
pub struct TickEngine {
    tick_interval: f64,
    listeners: Vec<Box<dyn TickListener>>,
}

impl TickEngine {
    pub fn new(tick_interval: f64) -> Result<Self> {
        if !(tick_interval > 0.0 && tick_interval.is_finite()) {
            return Err(Error::InvalidConfig(format!("tick interval must be positive, got {}", tick_interval)));
        }
        Ok(Self { tick_interval, listeners: Vec::new() })
    }

    /// Adds a listener behind the already registered ones.
    pub fn register(&mut self, listener: Box<dyn TickListener>) {
        log::debug!("Registered tick listener {}.", listener.name());
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Runs until `duration` is reached or the context got truncated. Returns the time of the last instant.
    pub fn run(&mut self, ctx: &mut SimulationContext, duration: f64) -> Result<f64> {
        let mut time = 0.0;
        let mut tick_index: u64 = 0;

        loop {
            ctx.cloudlets.advance_to(time);

            for listener in self.listeners.iter_mut() {
                listener.on_tick(time, ctx).inspect_err(|e| log::error!("Listener {} failed at {}: {}", listener.name(), time, e))?;
            }

            self.remove_finished_listeners();

            if time >= duration || ctx.is_truncated() {
                break;
            }

            while tick_index as f64 * self.tick_interval <= time {
                tick_index += 1;
            }
            let next_tick = tick_index as f64 * self.tick_interval;
            let next = ctx.cloudlets.next_event_after(time).map_or(next_tick, |event| event.min(next_tick));
            time = next.min(duration);
        }

        log::info!("Tick engine stopped at {}.", time);
        Ok(time)
    }

    fn remove_finished_listeners(&mut self) {
        self.listeners.retain(|listener| {
            let done = listener.is_done();
            if done {
                log::debug!("Removed tick listener {}.", listener.name());
            }
            !done
        });
    }
}

impl std::fmt::Debug for TickEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.listeners.iter().map(|listener| listener.name()).collect();
        f.debug_struct("TickEngine").field("tick_interval", &self.tick_interval).field("listeners", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        label: &'static str,
        calls: Rc<RefCell<Vec<(&'static str, f64)>>>,
        stop_after: Option<usize>,
        seen: usize,
    }

    impl TickListener for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }

        fn on_tick(&mut self, time: f64, _ctx: &mut SimulationContext) -> Result<()> {
            self.seen += 1;
            self.calls.borrow_mut().push((self.label, time));
            Ok(())
        }

        fn is_done(&self) -> bool {
            self.stop_after.is_some_and(|limit| self.seen >= limit)
        }
    }

    #[test]
    fn listeners_run_in_registration_order_at_every_tick() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut engine = TickEngine::new(1.0).unwrap();
        engine.register(Box::new(Recorder { label: "first", calls: calls.clone(), ..Default::default() }));
        engine.register(Box::new(Recorder { label: "second", calls: calls.clone(), ..Default::default() }));

        let end = engine.run(&mut SimulationContext::new(), 2.0).unwrap();

        assert_eq!(end, 2.0);
        assert_eq!(*calls.borrow(), vec![("first", 0.0), ("second", 0.0), ("first", 1.0), ("second", 1.0), ("first", 2.0), ("second", 2.0)]);
    }

    #[test]
    fn finished_listener_is_removed_after_the_instant() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut engine = TickEngine::new(1.0).unwrap();
        engine.register(Box::new(Recorder { label: "once", calls: calls.clone(), stop_after: Some(1), ..Default::default() }));
        engine.register(Box::new(Recorder { label: "always", calls: calls.clone(), ..Default::default() }));

        engine.run(&mut SimulationContext::new(), 1.0).unwrap();

        assert_eq!(*calls.borrow(), vec![("once", 0.0), ("always", 0.0), ("always", 1.0)]);
        assert_eq!(engine.listener_count(), 1);
    }

    #[test]
    fn truncation_stops_after_the_current_tick() {
        struct Truncator;
        impl TickListener for Truncator {
            fn name(&self) -> &'static str {
                "truncator"
            }

            fn on_tick(&mut self, time: f64, ctx: &mut SimulationContext) -> Result<()> {
                if time >= 3.0 {
                    ctx.truncate();
                }
                Ok(())
            }
        }

        let mut engine = TickEngine::new(1.0).unwrap();
        engine.register(Box::new(Truncator));
        let mut ctx = SimulationContext::new();

        assert_eq!(engine.run(&mut ctx, 100.0).unwrap(), 3.0);
        assert!(ctx.is_truncated());
    }

    #[test]
    fn non_positive_tick_interval_is_rejected() {
        assert!(matches!(TickEngine::new(0.0), Err(Error::InvalidConfig(_))));
    }
}
