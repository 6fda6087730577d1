use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;

use crate::api::policy_dto::{ActionDto, BridgeMessage, ObservationDto};
use crate::bridge::channel::{AgentResult, DecisionChannel};
use crate::bridge::codec::BridgeCodec;
use crate::config::BridgeConfig;
use crate::error::{Error, Result};

const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Channel between the external-agent policy and the bridge.
pub type PolicyChannel = DecisionChannel<ObservationDto, ActionDto>;

/// Handle of the running bridge thread.
#[derive(Debug)]
pub struct BridgeHandle {
    local_addr: SocketAddr,
    done: mpsc::Receiver<()>,
    thread: Option<JoinHandle<()>>,
}

impl BridgeHandle {
    /// Address the bridge accepts the agent on. Useful when binding port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Waits at most `timeout` for the bridge thread. Returns false if it is still running,
    /// in which case the thread is left detached.
    pub fn join_timeout(mut self, timeout: Duration) -> bool {
        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                if let Some(thread) = self.thread.take() {
                    if thread.join().is_err() {
                        log::error!("Decision bridge thread panicked.");
                    }
                }
                true
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                log::warn!("Decision bridge did not stop within {:?}, leaving it behind.", timeout);
                false
            }
        }
    }
}

/// Binds the listening socket and starts the bridge on its own thread.
///
/// The bridge serves a single agent connection. It shuts `channel` down when the agent
/// disconnects or violates the protocol, and sends a truncated frame once the channel is shut
/// down from the simulation side.
pub fn spawn_bridge(config: &BridgeConfig, channel: PolicyChannel) -> Result<BridgeHandle> {
    let listener = std::net::TcpListener::bind((config.host.as_str(), config.port))?;
    listener.set_nonblocking(true)?;
    let local_addr = listener.local_addr()?;

    let (done_tx, done_rx) = mpsc::channel();
    let thread = thread::Builder::new().name("decision-bridge".to_string()).spawn(move || {
        match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => {
                if let Err(e) = runtime.block_on(serve(listener, channel.clone())) {
                    log::error!("{}", e);
                }
                channel.shutdown();
                runtime.shutdown_timeout(Duration::from_secs(1));
            }
            Err(e) => {
                log::error!("Failed to start the decision bridge runtime: {}", e);
                channel.shutdown();
            }
        }
        let _ = done_tx.send(());
    })?;

    log::info!("Decision bridge listening on {}.", local_addr);
    Ok(BridgeHandle { local_addr, done: done_rx, thread: Some(thread) })
}

/// Resolves once `channel` is shut down.
async fn shutdown_requested(channel: &PolicyChannel) {
    let mut ticker = tokio::time::interval(SHUTDOWN_POLL_INTERVAL);
    while !channel.is_shutdown() {
        ticker.tick().await;
    }
}

async fn serve(listener: std::net::TcpListener, channel: PolicyChannel) -> Result<()> {
    let listener = TcpListener::from_std(listener)?;
    let shutdown_waiter = channel.clone();

    let stream = tokio::select! {
        accepted = listener.accept() => {
            let (stream, peer) = accepted?;
            log::info!("Agent connected from {}.", peer);
            stream
        }
        _ = tokio::task::spawn_blocking(move || shutdown_waiter.wait_for_shutdown()) => {
            log::info!("Decision bridge stopped before an agent connected.");
            return Ok(());
        }
    };

    relay(stream, channel).await
}

async fn relay(stream: TcpStream, channel: PolicyChannel) -> Result<()> {
    let mut framed = Framed::new(stream, BridgeCodec::new());

    loop {
        let consumer = channel.clone();
        let observation = match tokio::task::spawn_blocking(move || consumer.consume_observation())
            .await
            .map_err(|e| Error::BridgeError(e.to_string()))?
        {
            AgentResult::Continue(observation) => observation,
            AgentResult::Truncated => {
                if let Err(e) = framed.send(BridgeMessage::Truncated).await {
                    log::debug!("Agent gone before the truncated frame: {}", e);
                }
                return Ok(());
            }
        };

        framed.send(BridgeMessage::Observation(observation)).await?;

        let reply = tokio::select! {
            frame = framed.next() => frame,
            _ = shutdown_requested(&channel) => {
                log::info!("Decision channel shut down while the agent was deciding.");
                if let Err(e) = framed.send(BridgeMessage::Truncated).await {
                    log::debug!("Agent gone before the truncated frame: {}", e);
                }
                return Ok(());
            }
        };

        match reply {
            Some(Ok(BridgeMessage::Action(action))) => channel.publish_action(action)?,
            Some(Ok(other)) => return Err(Error::BridgeError(format!("expected an action frame, got {:?}", other))),
            Some(Err(e)) => return Err(Error::BridgeError(format!("unreadable frame from agent: {}", e))),
            None => {
                log::warn!("Agent disconnected.");
                return Ok(());
            }
        }
    }
}
