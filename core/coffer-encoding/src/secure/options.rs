use crate::compress::{
    zstd_compress, zstd_decompress, CompressionFormat, CompressorFn, DecompressorFn,
};
use std::sync::Arc;

/// Options for a [`SecureEncoder`](super::SecureEncoder) session.
#[derive(Clone, Default)]
pub struct EncodeOptions {
    pub(crate) compressor: Option<CompressorFn>,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compresses sealed payloads with the given callback.
    pub fn with_compressor(
        mut self,
        compressor: impl Fn(&[u8]) -> crate::EncodingResult<Vec<u8>> + Send + Sync + 'static,
    ) -> Self {
        self.compressor = Some(Arc::new(compressor));
        self
    }

    /// Compresses sealed payloads with an already-shared callback.
    pub fn with_compressor_fn(mut self, compressor: CompressorFn) -> Self {
        self.compressor = Some(compressor);
        self
    }

    /// Compresses sealed payloads with a named format. Only Zstd has a
    /// built-in codec; other formats leave the options unchanged.
    pub fn with_compression(self, format: CompressionFormat) -> Self {
        match format {
            CompressionFormat::Zstd => self.with_compressor(zstd_compress),
            _ => self,
        }
    }
}

/// Options for a [`SecureDecoder`](super::SecureDecoder) session.
#[derive(Clone, Default)]
pub struct DecodeOptions {
    pub(crate) decompressor: Option<DecompressorFn>,
    pub(crate) sparse: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decompresses envelope payloads with the given callback.
    pub fn with_decompressor(
        mut self,
        decompressor: impl Fn(&[u8]) -> crate::EncodingResult<Vec<u8>> + Send + Sync + 'static,
    ) -> Self {
        self.decompressor = Some(Arc::new(decompressor));
        self
    }

    /// Decompresses envelope payloads with an already-shared callback.
    pub fn with_decompressor_fn(mut self, decompressor: DecompressorFn) -> Self {
        self.decompressor = Some(decompressor);
        self
    }

    /// Decompresses envelope payloads with a named format. Only Zstd has
    /// a built-in codec; other formats leave the options unchanged.
    pub fn with_compression(self, format: CompressionFormat) -> Self {
        match format {
            CompressionFormat::Zstd => self.with_decompressor(zstd_decompress),
            _ => self,
        }
    }

    /// Decode sparsely: skip decryption and substitute empty values for
    /// secure fields. Has no effect on envelopes without secure fields.
    pub fn sparse(mut self) -> Self {
        self.sparse = true;
        self
    }
}
