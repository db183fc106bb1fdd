//! The replay server: acceptor task plus the framer → pacer → broadcaster
//! pipeline.
//!
//! File and gzip reads are synchronous, so framing runs on a blocking task
//! that feeds framed messages through a bounded channel into the async
//! replay task. The channel preserves order, so every subscriber sees the
//! framer's output byte-for-byte. A shared shutdown flag, set by signal or
//! at end-of-stream, is polled by every task at its blocking boundaries.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::broadcast::{Broadcaster, MAX_SUBSCRIBERS};
use crate::errors::ReplayError;
use crate::framer::{FramerStats, MessageStream};
use crate::pacer::Pacer;
use crate::source;
use crate::stats::SessionStats;

// Bounded capacity for the framer -> pacer channel; keeps a fast reader
// from buffering the whole file ahead of the pacer.
const FRAME_CHANNEL_CAP: usize = 4096;

#[derive(Debug, Clone)]
///
/// Replay server configuration
///
pub struct ServerConfig {
  /// Path to the ITCH data; a `.gz` suffix enables decompression
  pub file: PathBuf,
  /// TCP port to listen on; 0 picks an ephemeral port
  pub port: u16,
  /// Replay speed multiplier. Positive values scale the feed clock
  /// (1.0 = real-time); 0.0 replays unpaced, as fast as possible.
  pub speed: f64,
  /// Pause between listening and replay so early subscribers can attach
  pub warmup: Duration,
  /// Subscriber slot capacity
  pub max_subscribers: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      file: PathBuf::new(),
      port: 9999,
      speed: 1.0,
      warmup: Duration::from_secs(2),
      max_subscribers: MAX_SUBSCRIBERS,
    }
  }
}

/// Totals reported after a completed replay.
#[derive(Debug, Clone, Copy)]
pub struct ReplaySummary {
  pub messages: u64,
  pub bytes: u64,
  pub framer: FramerStats,
}

#[derive(Debug)]
///
/// A bound replay server, ready to run
///
pub struct ReplayServer {
  config: ServerConfig,
  listener: TcpListener,
  broadcaster: Arc<Broadcaster>,
  shutdown: Arc<AtomicBool>,
}

impl ReplayServer {
  /// Bind the listening socket. Fails on socket or bind errors.
  pub async fn bind(config: ServerConfig) -> Result<Self, ReplayError> {
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    Ok(Self {
      broadcaster: Arc::new(Broadcaster::with_capacity(
        config.max_subscribers,
      )),
      shutdown: Arc::new(AtomicBool::new(false)),
      config,
      listener,
    })
  }

  pub fn local_addr(&self) -> io::Result<SocketAddr> {
    self.listener.local_addr()
  }

  /// Flag observed by every task; setting it requests a cooperative stop.
  pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
    Arc::clone(&self.shutdown)
  }

  /// Run the acceptor and the replay pipeline until end-of-stream or
  /// shutdown, then retire every subscriber.
  pub async fn run(self) -> Result<ReplaySummary, ReplayError> {
    let mut pacer = if self.config.speed == 0.0 {
      Pacer::unpaced()
    } else {
      Pacer::new(self.config.speed)?
    };

    // Open the ingress source up front so a bad path fails fast.
    let reader = source::open(&self.config.file)?;

    log::info!(
      "replaying {} at {}",
      self.config.file.display(),
      if pacer.is_unpaced() {
        "full speed".to_string()
      } else {
        format!("{}x", self.config.speed)
      }
    );

    let accept_handle = tokio::spawn(accept_loop(
      self.listener,
      Arc::clone(&self.broadcaster),
      Arc::clone(&self.shutdown),
    ));

    if !self.config.warmup.is_zero() {
      log::info!(
        "waiting {:.1}s for subscribers before replay",
        self.config.warmup.as_secs_f64()
      );
      tokio::time::sleep(self.config.warmup).await;
    }

    let (frame_tx, mut frame_rx) = mpsc::channel(FRAME_CHANNEL_CAP);
    let shutdown = Arc::clone(&self.shutdown);
    let reader_handle = tokio::task::spawn_blocking(move || {
      let mut stream = MessageStream::new(reader);
      while !shutdown.load(Ordering::Relaxed) {
        match stream.next_message() {
          Ok(Some(frame)) => {
            if frame_tx.blocking_send(frame).is_err() {
              break;
            }
          }
          Ok(None) => break,
          Err(e) => {
            log::error!("read error on replay source: {}", e);
            break;
          }
        }
      }
      stream.stats()
    });

    let mut stats = SessionStats::new();
    while let Some(frame) = frame_rx.recv().await {
      if self.shutdown.load(Ordering::Relaxed) {
        break;
      }
      pacer.pace(frame.timestamp).await;
      self.broadcaster.deliver(&frame.bytes).await;
      if stats.record(frame.kind, frame.bytes.len()) {
        log::info!(
          "sent {} messages ({:.2} MiB)",
          stats.total_messages(),
          stats.mib()
        );
      }
    }
    drop(frame_rx);

    // End-of-stream or external stop: raise the flag for every task.
    self.shutdown.store(true, Ordering::Relaxed);
    let framer = reader_handle.await.unwrap_or_else(|e| {
      log::error!("framer task failed: {}", e);
      FramerStats::default()
    });
    accept_handle.abort();
    let _ = accept_handle.await;
    self.broadcaster.shutdown().await;

    log::info!(
      "replay complete: {} messages, {:.2} MiB",
      stats.total_messages(),
      stats.mib()
    );
    Ok(ReplaySummary {
      messages: stats.total_messages(),
      bytes: stats.total_bytes(),
      framer,
    })
  }
}

/// Admit subscribers until shutdown. Accept errors are logged and the loop
/// keeps going; capacity rejections close the new socket immediately.
async fn accept_loop(
  listener: TcpListener,
  broadcaster: Arc<Broadcaster>,
  shutdown: Arc<AtomicBool>,
) {
  loop {
    if shutdown.load(Ordering::Relaxed) {
      break;
    }
    match listener.accept().await {
      Ok((stream, peer)) => {
        let _ = stream.set_nodelay(true);
        match broadcaster.attach(stream, peer).await {
          Ok(slot) => {
            log::info!("slot {} connected from {}", slot, peer);
          }
          Err(e) => {
            // Dropping the stream closes the rejected connection.
            log::warn!("rejecting {}: {}", peer, e);
          }
        }
      }
      Err(e) => {
        log::warn!("accept failed: {}", e);
      }
    }
  }
}
