use std::fmt;
use std::str::FromStr;

use crate::domain::scheduler::algorithm::{BestFit, EarliestFinish, RandomChoice, RoundRobin, SchedulingAlgorithm};
use crate::error::Error;

/// Static algorithms available to the in-process policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmType {
    #[default]
    RoundRobin,
    BestFit,
    EarliestFinish,
    Random,
}

impl AlgorithmType {
    /// Returns a fresh instance of the algorithm. `seed` is only used by [`AlgorithmType::Random`].
    pub fn get_instance(self, seed: u64) -> Box<dyn SchedulingAlgorithm> {
        match self {
            AlgorithmType::RoundRobin => Box::new(RoundRobin::default()),
            AlgorithmType::BestFit => Box::new(BestFit),
            AlgorithmType::EarliestFinish => Box::new(EarliestFinish),
            AlgorithmType::Random => Box::new(RandomChoice::new(seed)),
        }
    }
}

impl FromStr for AlgorithmType {
    type Err = Error;

    fn from_str(algorithm: &str) -> Result<AlgorithmType, Self::Err> {
        match algorithm {
            "round_robin" => Ok(AlgorithmType::RoundRobin),
            "best_fit" => Ok(AlgorithmType::BestFit),
            "earliest_finish" => Ok(AlgorithmType::EarliestFinish),
            "random" => Ok(AlgorithmType::Random),
            _ => Err(Error::InvalidConfig(format!("unknown scheduling algorithm '{}'", algorithm))),
        }
    }
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmType::RoundRobin => "round_robin",
            AlgorithmType::BestFit => "best_fit",
            AlgorithmType::EarliestFinish => "earliest_finish",
            AlgorithmType::Random => "random",
        };
        write!(f, "{}", name)
    }
}

/// Which policy decides: a static algorithm, or an external agent behind the decision bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyType {
    Static(AlgorithmType),
    Gym,
}

impl Default for PolicyType {
    fn default() -> Self {
        PolicyType::Static(AlgorithmType::default())
    }
}

impl FromStr for PolicyType {
    type Err = Error;

    fn from_str(policy: &str) -> Result<PolicyType, Self::Err> {
        match policy {
            "gym" => Ok(PolicyType::Gym),
            other => other.parse().map(PolicyType::Static),
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyType::Static(algorithm) => algorithm.fmt(f),
            PolicyType::Gym => write!(f, "gym"),
        }
    }
}
