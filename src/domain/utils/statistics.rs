use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::error::Result;

/// Target of the structured `tracing` events describing the run (samples, summary).
pub const ANALYTICS_TARGET: &str = "analytics";

/// Each event consists of a set of key-value-pairs with the measured data or some meta data of the event.
/// This enum specifies all allowed key values and thus the column in the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatParameter {
    /// Simulated time of the sample.
    Time,

    /// Description why this entry was made
    LogDescription,

    /// Id of the sampled host, NA for run-wide entries
    HostId,

    /// CPU utilization of the host in [0, 1]
    CpuUtilization,

    /// Power draw of the host in watt
    PowerWatt,

    /// Number of cloudlets in execution at sample time
    RunningCloudlets,

    /// Tasks waiting in the workflow buffer
    BufferedTasks,

    /// Tasks released into the system so far
    ReleasedTasks,

    /// Tasks that finished execution so far
    CompletedTasks,
}

impl StatParameter {
    /// Defined order of the CSV columns.
    pub const ALL: [StatParameter; 9] = [
        StatParameter::Time,
        StatParameter::LogDescription,
        StatParameter::HostId,
        StatParameter::CpuUtilization,
        StatParameter::PowerWatt,
        StatParameter::RunningCloudlets,
        StatParameter::BufferedTasks,
        StatParameter::ReleasedTasks,
        StatParameter::CompletedTasks,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            StatParameter::Time => "Time",
            StatParameter::LogDescription => "LogDescription",
            StatParameter::HostId => "HostId",
            StatParameter::CpuUtilization => "CpuUtilization",
            StatParameter::PowerWatt => "PowerWatt",
            StatParameter::RunningCloudlets => "RunningCloudlets",
            StatParameter::BufferedTasks => "BufferedTasks",
            StatParameter::ReleasedTasks => "ReleasedTasks",
            StatParameter::CompletedTasks => "CompletedTasks",
        }
    }
}

/// store values in their native format, only format them when writing to the CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<u32> for StatValue {
    fn from(v: u32) -> Self {
        StatValue::Integer(v as i64)
    }
}

impl From<usize> for StatValue {
    fn from(v: usize) -> Self {
        StatValue::Integer(v as i64)
    }
}

impl From<u64> for StatValue {
    fn from(v: u64) -> Self {
        StatValue::Integer(v as i64)
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        StatValue::Float(v)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        StatValue::Text(v.to_string())
    }
}

impl StatValue {
    fn render(&self) -> String {
        match self {
            StatValue::Integer(i) => i.to_string(),
            StatValue::Float(f) => f.to_string(),
            StatValue::Text(t) => t.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatisticEvent {
    data: HashMap<StatParameter, StatValue>,
}

impl StatisticEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<V: Into<StatValue>>(&mut self, param: StatParameter, value: V) -> &mut Self {
        self.data.insert(param, value.into());
        self
    }

    pub fn get(&self, param: StatParameter) -> Option<&StatValue> {
        self.data.get(&param)
    }

    fn to_row(&self) -> Vec<String> {
        StatParameter::ALL
            .iter()
            .map(|param| self.data.get(param).map(StatValue::render).unwrap_or_else(|| "NA".to_string()))
            .collect()
    }
}

/// Messages sent from the simulation thread to the writer thread.
enum StatsMessage {
    Log(StatisticEvent),
    Shutdown,
}

/// Handle that lets the simulation record statistic rows without touching the file itself.
/// It holds the "Sender" side of the channel; the writer thread owns the CSV writer.
pub struct StatsCollector {
    sender: mpsc::Sender<StatsMessage>,
    worker: Option<JoinHandle<()>>,
}

impl StatsCollector {
    /// Creates the output file (or uses stdout for `None`) and spawns the writer thread.
    pub fn init(path: Option<&Path>) -> Result<Self> {
        let writer: Box<dyn Write + Send> = match path {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout()),
        };

        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new().name("statistics-writer".to_string()).spawn(move || Self::worker_loop(rx, writer))?;

        Ok(StatsCollector { sender: tx, worker: Some(worker) })
    }

    fn worker_loop(rx: mpsc::Receiver<StatsMessage>, writer: Box<dyn Write + Send>) {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

        let headers: Vec<&str> = StatParameter::ALL.iter().map(StatParameter::header).collect();
        if let Err(e) = csv_wtr.write_record(&headers) {
            log::error!("Stats Error: Failed to write headers: {}", e);
        }

        for msg in rx {
            match msg {
                StatsMessage::Log(event) => {
                    if let Err(e) = csv_wtr.write_record(event.to_row()) {
                        log::error!("Stats Error: Failed to write record: {}", e);
                    }
                }
                StatsMessage::Shutdown => break,
            }
        }

        if let Err(e) = csv_wtr.flush() {
            log::error!("Stats Error: Failed to flush statistics: {}", e);
        }
    }

    /// Non-blocking, the row is written by the background thread.
    pub fn add_event(&self, event: StatisticEvent) {
        if self.sender.send(StatsMessage::Log(event)).is_err() {
            log::warn!("Statistics writer is gone, event dropped.");
        }
    }

    /// Flushes all pending rows and waits for the writer thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.sender.send(StatsMessage::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Statistics writer thread panicked.");
            }
        }
    }
}

impl Drop for StatsCollector {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for StatsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsCollector").field("running", &self.worker.is_some()).finish()
    }
}
