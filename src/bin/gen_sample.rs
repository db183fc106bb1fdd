use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use itch_replay::{put_stock, put_timestamp, put_u16, put_u32, put_u64};

/// Generate a small synthetic ITCH 5.0 file for testing the replay server.
#[derive(Parser, Debug)]
#[command(name = "itch-gen", version, about)]
struct Args {
  /// Output path
  #[arg(default_value = "sample.itch")]
  output: PathBuf,

  /// Number of buy/sell order pairs to generate
  #[arg(long, default_value_t = 100)]
  pairs: u32,
}

struct Builder {
  msg: [u8; 50],
  ts: u64,
  tracking: u16,
}

impl Builder {
  fn header(&mut self, kind: u8, stock_locate: u16) {
    self.msg.fill(0);
    self.msg[0] = kind;
    put_u16(&mut self.msg[1..3], stock_locate);
    put_u16(&mut self.msg[3..5], self.tracking);
    put_timestamp(&mut self.msg[5..11], self.ts);
    self.tracking = self.tracking.wrapping_add(1);
  }

  fn directory(&mut self, stock_locate: u16, stock: &str) -> &[u8] {
    self.header(b'R', stock_locate);
    put_stock(&mut self.msg[11..19], stock);
    self.msg[19] = b'Q'; // NASDAQ
    self.msg[20] = b'N'; // normal financial status
    put_u32(&mut self.msg[21..25], 100);
    self.msg[25] = b'Y';
    self.msg[26] = b'P';
    self.msg[27] = b' '; // blank issue sub-type
    self.msg[28] = b' ';
    self.msg[29] = b'P';
    self.msg[30] = b'N';
    self.msg[31] = b' ';
    self.msg[32] = b'1';
    self.msg[33] = b'N';
    put_u32(&mut self.msg[34..38], 1);
    self.msg[38] = b'N';
    &self.msg[..39]
  }

  fn add_order(
    &mut self,
    stock_locate: u16,
    order_ref: u64,
    side: u8,
    shares: u32,
    stock: &str,
    price: u32,
  ) -> &[u8] {
    self.header(b'A', stock_locate);
    put_u64(&mut self.msg[11..19], order_ref);
    self.msg[19] = side;
    put_u32(&mut self.msg[20..24], shares);
    put_stock(&mut self.msg[24..32], stock);
    put_u32(&mut self.msg[32..36], price);
    &self.msg[..36]
  }

  fn executed(
    &mut self,
    stock_locate: u16,
    order_ref: u64,
    shares: u32,
    match_number: u64,
  ) -> &[u8] {
    self.header(b'E', stock_locate);
    put_u64(&mut self.msg[11..19], order_ref);
    put_u32(&mut self.msg[19..23], shares);
    put_u64(&mut self.msg[23..31], match_number);
    &self.msg[..31]
  }

  fn system_event(&mut self, code: u8) -> &[u8] {
    self.header(b'S', 0);
    self.msg[11] = code;
    &self.msg[..12]
  }
}

fn main() -> ExitCode {
  env_logger::init();
  let args = Args::parse();

  let file = match File::create(&args.output) {
    Ok(file) => file,
    Err(e) => {
      eprintln!("failed to create {}: {}", args.output.display(), e);
      return ExitCode::FAILURE;
    }
  };
  let mut out = BufWriter::new(file);
  let mut b = Builder {
    msg: [0u8; 50],
    ts: 34_200_000_000_000, // 9:30 AM in nanoseconds since midnight
    tracking: 0,
  };
  let mut messages = 0u64;

  let result = (|| -> std::io::Result<()> {
    out.write_all(b.system_event(b'O'))?;
    messages += 1;
    b.ts += 1_000_000;

    for (locate, stock) in [(1u16, "AAPL"), (2u16, "TSLA")] {
      out.write_all(b.directory(locate, stock))?;
      messages += 1;
      b.ts += 1_000_000;
    }

    for i in 0..args.pairs {
      let shares = 100 + i * 10;
      out.write_all(b.add_order(
        1,
        1_000_000 + u64::from(i),
        b'B',
        shares,
        "AAPL",
        1_500_000 + i * 100,
      ))?;
      messages += 1;
      b.ts += 50_000_000; // 50ms between orders

      out.write_all(b.add_order(
        1,
        2_000_000 + u64::from(i),
        b'S',
        shares,
        "AAPL",
        1_500_100 + i * 100,
      ))?;
      messages += 1;
      b.ts += 50_000_000;

      if i % 5 == 0 {
        out.write_all(b.executed(
          1,
          1_000_000 + u64::from(i),
          50,
          3_000_000 + u64::from(i),
        ))?;
        messages += 1;
        b.ts += 10_000_000;
      }
    }

    out.write_all(b.system_event(b'C'))?;
    messages += 1;
    out.flush()
  })();

  match result {
    Ok(()) => {
      println!(
        "wrote {} messages to {}",
        messages,
        args.output.display()
      );
      ExitCode::SUCCESS
    }
    Err(e) => {
      eprintln!("write failed: {}", e);
      ExitCode::FAILURE
    }
  }
}
