use std::fmt::Debug;

/// Maps a CPU utilization in [0, 1] to the power draw of a host in watt.
pub trait PowerModel: Debug {
    fn power(&self, utilization: f64) -> f64;
}

/// Two-point linear model between idle and peak power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPowerModel {
    idle_watt: f64,
    peak_watt: f64,
}

impl LinearPowerModel {
    pub fn new(idle_watt: f64, peak_watt: f64) -> Self {
        Self { idle_watt, peak_watt }
    }
}

impl PowerModel for LinearPowerModel {
    fn power(&self, utilization: f64) -> f64 {
        let utilization = utilization.clamp(0.0, 1.0);
        self.idle_watt + (self.peak_watt - self.idle_watt) * utilization
    }
}
