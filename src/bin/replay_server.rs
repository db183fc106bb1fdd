use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::Parser;
use itch_replay::{ReplayServer, ServerConfig};

/// Replay a NASDAQ TotalView-ITCH 5.0 file over TCP with original timing.
#[derive(Parser, Debug)]
#[command(name = "itch-replay-server", version, about)]
struct Args {
  /// Path to the ITCH data file; a .gz suffix enables gzip decompression
  itch_file: PathBuf,

  /// TCP port to listen on
  #[arg(default_value_t = 9999)]
  port: u16,

  /// Speed multiplier: 1.0 real-time, 2.0 twice as fast, 0.5 half speed.
  /// 0 replays unpaced, as fast as possible.
  #[arg(default_value_t = 1.0)]
  speed_multiplier: f64,

  /// Seconds to wait after listening before replay begins, so early
  /// subscribers can attach
  #[arg(long, default_value_t = 2.0)]
  warmup: f64,
}

#[tokio::main]
async fn main() -> ExitCode {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("info"),
  )
  .init();
  // Argument failures exit 1, like every other startup failure.
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(e) => {
      let failed = e.use_stderr();
      let _ = e.print();
      return if failed {
        ExitCode::FAILURE
      } else {
        ExitCode::SUCCESS // --help / --version
      };
    }
  };

  if !args.speed_multiplier.is_finite()
    || args.speed_multiplier < 0.0
    || !args.warmup.is_finite()
    || args.warmup < 0.0
  {
    eprintln!("speed multiplier and warmup must be non-negative");
    return ExitCode::FAILURE;
  }

  let config = ServerConfig {
    file: args.itch_file,
    port: args.port,
    speed: args.speed_multiplier,
    warmup: Duration::from_secs_f64(args.warmup),
    ..Default::default()
  };

  let server = match ReplayServer::bind(config).await {
    Ok(server) => server,
    Err(e) => {
      eprintln!("failed to start server: {}", e);
      return ExitCode::FAILURE;
    }
  };
  match server.local_addr() {
    Ok(addr) => log::info!("listening on {}", addr),
    Err(e) => log::warn!("listening (local addr unavailable: {})", e),
  }

  let shutdown = server.shutdown_flag();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      log::info!("shutdown requested");
      shutdown.store(true, Ordering::Relaxed);
    }
  });

  match server.run().await {
    Ok(_) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("replay failed: {}", e);
      ExitCode::FAILURE
    }
  }
}
