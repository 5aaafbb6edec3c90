//! Compression codecs and framing.
//!
//! Zstandard is the built-in codec; callers may supply their own pair.
//! Compressed data on the store's raw path is framed with a magic tag and
//! the format name so reads can detect compression without any stored
//! metadata. Envelope payloads instead rely on the package's `compressed`
//! flag and are not framed.

use crate::error::{EncodingError, EncodingResult};
use std::fmt;
use std::sync::Arc;

/// Compression callback: data in, compressed data out.
pub type CompressorFn = Arc<dyn Fn(&[u8]) -> EncodingResult<Vec<u8>> + Send + Sync>;

/// Decompression callback: compressed data in, data out.
pub type DecompressorFn = Arc<dyn Fn(&[u8]) -> EncodingResult<Vec<u8>> + Send + Sync>;

/// Supported compression formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompressionFormat {
    #[default]
    None,
    Zstd,
    Custom,
}

impl CompressionFormat {
    pub fn name(self) -> &'static str {
        match self {
            CompressionFormat::None => "",
            CompressionFormat::Zstd => "zstd",
            CompressionFormat::Custom => "custom",
        }
    }

    fn from_name(name: &[u8]) -> CompressionFormat {
        match name {
            b"zstd" => CompressionFormat::Zstd,
            b"custom" => CompressionFormat::Custom,
            _ => CompressionFormat::None,
        }
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compresses a buffer with Zstandard.
pub fn zstd_compress(data: &[u8]) -> EncodingResult<Vec<u8>> {
    zstd::stream::encode_all(data, zstd::DEFAULT_COMPRESSION_LEVEL)
        .map_err(|e| EncodingError::Compression(e.to_string()))
}

/// Decompresses a Zstandard buffer.
pub fn zstd_decompress(data: &[u8]) -> EncodingResult<Vec<u8>> {
    zstd::stream::decode_all(data).map_err(|e| EncodingError::Compression(e.to_string()))
}

const FORMAT_TAG: [u8; 8] = [0x0B, 0x0A, 0x0D, 0x0A, 0x05, 0x05, 0x05, 0x0B];
const FORMAT_SEPARATOR: u8 = 0x1E; // US-ASCII Record Separator

/// Prepends the compression format marker to compressed data.
pub fn encode_format(data: &[u8], format: CompressionFormat) -> Vec<u8> {
    if format == CompressionFormat::None || data.is_empty() {
        return data.to_vec();
    }
    let name = format.name().as_bytes();
    let mut out = Vec::with_capacity(FORMAT_TAG.len() + name.len() + data.len() + 2);
    out.extend_from_slice(&FORMAT_TAG);
    out.push(FORMAT_SEPARATOR);
    out.extend_from_slice(name);
    out.push(FORMAT_SEPARATOR);
    out.extend_from_slice(data);
    out
}

/// Splits the compression format marker off framed data. Data without a
/// marker is returned whole with `CompressionFormat::None`.
pub fn decode_format(data: &[u8]) -> (&[u8], CompressionFormat) {
    let Some(rest) = data.strip_prefix(&FORMAT_TAG[..]) else {
        return (data, CompressionFormat::None);
    };
    let Some(rest) = rest.strip_prefix(&[FORMAT_SEPARATOR]) else {
        return (data, CompressionFormat::None);
    };
    let Some(sep) = rest.iter().position(|&b| b == FORMAT_SEPARATOR) else {
        return (data, CompressionFormat::None);
    };
    let format = CompressionFormat::from_name(&rest[..sep]);
    if format == CompressionFormat::None {
        return (data, CompressionFormat::None);
    }
    (&rest[sep + 1..], format)
}
