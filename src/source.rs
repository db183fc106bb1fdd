//! Ingress byte sources for replay.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;

/// Open the replay source. A `.gz` suffix on the path selects on-the-fly
/// gzip decompression; there is no magic-byte sniffing.
pub fn open(path: &Path) -> io::Result<Box<dyn Read + Send>> {
  let file = File::open(path)?;
  if path.extension().is_some_and(|ext| ext == "gz") {
    Ok(Box::new(GzDecoder::new(file)))
  } else {
    Ok(Box::new(file))
  }
}
