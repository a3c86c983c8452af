// src/integrity/digest.rs

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of a single file, hex-encoded.
///
/// Streams the contents in fixed-size chunks so large files never get
/// buffered whole. Identical contents always produce the identical digest,
/// regardless of file name or timestamps.
pub fn compute_file_digest(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("opening file for hashing: {:?}", path))?;

    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
