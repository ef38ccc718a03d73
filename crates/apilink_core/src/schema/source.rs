use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::schema::{Result, SchemaError};

const MAX_DECOMPRESSED_BYTES: usize = 64 * 1024 * 1024;
/// zstd frame magic.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Plain JSON text.
	None,
	/// zstd-compressed JSON.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Read and parse a JSON schema file, decompressing zstd input.
pub fn load_json(path: impl AsRef<Path>) -> Result<Value> {
	let path = path.as_ref();
	let raw = fs::read(path)?;
	let (compression, bytes) = decode_bytes(raw)?;
	debug!(path = %path.display(), compression = compression.as_str(), bytes = bytes.len(), "loaded schema");
	Ok(serde_json::from_slice(&bytes)?)
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw)?;
		return Ok((Compression::Zstd, out));
	}
	Ok((Compression::None, raw))
}

fn decode_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(SchemaError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::{Compression, decode_bytes};

	#[test]
	fn plain_json_passes_through() {
		let (mode, bytes) = decode_bytes(br#"{"a": 1}"#.to_vec()).expect("decodes");
		assert_eq!(mode, Compression::None);
		assert_eq!(bytes, br#"{"a": 1}"#);
	}

	#[test]
	fn zstd_frame_is_decompressed() {
		let text = br#"{"void": {"category": "native"}}"#;
		let packed = zstd::stream::encode_all(&text[..], 3).expect("compresses");
		let (mode, bytes) = decode_bytes(packed).expect("decodes");
		assert_eq!(mode, Compression::Zstd);
		assert_eq!(bytes, text);
	}
}
