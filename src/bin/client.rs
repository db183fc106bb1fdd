use std::process::ExitCode;

use clap::Parser;
use itch_replay::{Message, ReplayClient, SessionStats};

/// Connect to an ITCH replay server and report stream statistics.
#[derive(Parser, Debug)]
#[command(name = "itch-client", version, about)]
struct Args {
  /// Server host
  #[arg(default_value = "127.0.0.1")]
  host: String,

  /// Server port
  #[arg(default_value_t = 9999)]
  port: u16,

  /// Decode and print every message
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("info"),
  )
  .init();
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

  let mut client = match ReplayClient::connect(&args.host, args.port) {
    Ok(client) => client,
    Err(e) => {
      eprintln!("failed to connect to {}:{}: {}", args.host, args.port, e);
      return ExitCode::FAILURE;
    }
  };
  log::info!("connected to {}", client.peer_addr());

  let mut stats = SessionStats::new();
  loop {
    match client.next_frame() {
      Ok(Some(frame)) => {
        if args.verbose {
          match Message::decode(&frame.bytes) {
            Ok(msg) => println!("{}", msg),
            Err(e) => log::warn!("decode failed: {}", e),
          }
        }
        if stats.record(frame.kind, frame.bytes.len()) {
          log::info!(
            "received {} messages ({:.2} MiB)",
            stats.total_messages(),
            stats.mib()
          );
        }
      }
      Ok(None) => {
        log::info!("server closed the stream");
        break;
      }
      Err(e) => {
        log::error!("receive error: {}", e);
        break;
      }
    }
  }

  print!("{}", stats);
  ExitCode::SUCCESS
}
