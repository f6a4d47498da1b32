//! Share tokens: a whole session packed into a URL-safe string.
//!
//! A token is `<mode>.<base64url payload>`. Mode `g` carries a gzip
//! compressed JSON payload, mode `p` the raw JSON. Compression is only an
//! optimization: when the injected [`Compressor`] is unavailable or fails, the
//! codec emits a `p` token instead.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::error::{DecodeError, EncodeError};
use crate::session::Session;

/// Upper bound on a decompressed payload.
pub const MAX_PAYLOAD_BYTES: usize = 8 * 1024 * 1024;

const MODE_COMPRESSED: &str = "g";
const MODE_PLAIN: &str = "p";

/// Byte-level compression capability.
pub trait Compressor: Send + Sync {
    /// Whether this compressor can run at all in the current environment.
    fn is_available(&self) -> bool;

    /// `None` when compression is unavailable or failed.
    fn compress(&self, raw: &[u8]) -> Option<Vec<u8>>;

    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, DecodeError>;
}

/// gzip via flate2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gzip;

impl Compressor for Gzip {
    fn is_available(&self) -> bool {
        true
    }

    fn compress(&self, raw: &[u8]) -> Option<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(raw).ok()?;
        encoder.finish().ok()
    }

    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::new();
        GzDecoder::new(data)
            .take(limit as u64 + 1)
            .read_to_end(&mut out)
            .map_err(DecodeError::Decompression)?;
        if out.len() > limit {
            return Err(DecodeError::TooLarge { limit });
        }
        Ok(out)
    }
}

/// Never compresses; cannot read `g` tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompression;

impl Compressor for NoCompression {
    fn is_available(&self) -> bool {
        false
    }

    fn compress(&self, _raw: &[u8]) -> Option<Vec<u8>> {
        None
    }

    fn decompress(&self, _data: &[u8], _limit: usize) -> Result<Vec<u8>, DecodeError> {
        Err(DecodeError::DecompressionUnavailable)
    }
}

pub struct ShareCodec {
    compressor: Box<dyn Compressor>,
}

impl ShareCodec {
    pub fn new(compressor: Box<dyn Compressor>) -> Self {
        Self { compressor }
    }

    pub fn gzip() -> Self {
        Self::new(Box::new(Gzip))
    }

    pub fn plain() -> Self {
        Self::new(Box::new(NoCompression))
    }

    pub fn encode(&self, session: &Session) -> Result<String, EncodeError> {
        let raw = plain_payload(session)?;
        let compressed = if self.compressor.is_available() {
            self.compressor.compress(&raw)
        } else {
            None
        };

        Ok(match compressed {
            Some(bytes) => format!("{MODE_COMPRESSED}.{}", URL_SAFE_NO_PAD.encode(bytes)),
            None => format!("{MODE_PLAIN}.{}", URL_SAFE_NO_PAD.encode(raw)),
        })
    }

    /// Decode a token, discarding the reason on failure.
    pub fn decode(&self, token: &str) -> Option<Session> {
        self.try_decode(token).ok()
    }

    pub fn try_decode(&self, token: &str) -> Result<Session, DecodeError> {
        let (mode, data) = token.split_once('.').ok_or(DecodeError::MissingSeparator)?;
        let data = data.trim_end_matches('=');
        if data.is_empty() {
            return Err(DecodeError::EmptyPayload);
        }
        let bytes = URL_SAFE_NO_PAD.decode(data)?;

        let raw = match mode {
            MODE_COMPRESSED => self.compressor.decompress(&bytes, MAX_PAYLOAD_BYTES)?,
            MODE_PLAIN if bytes.len() > MAX_PAYLOAD_BYTES => {
                return Err(DecodeError::TooLarge {
                    limit: MAX_PAYLOAD_BYTES,
                })
            }
            MODE_PLAIN => bytes,
            other => return Err(DecodeError::UnknownMode(other.to_string())),
        };

        let session: Session = serde_json::from_slice(&raw)?;
        session.validate()?;
        Ok(session)
    }
}

impl Default for ShareCodec {
    fn default() -> Self {
        Self::gzip()
    }
}

/// The canonical uncompressed serialization carried by `p` tokens.
pub fn plain_payload(session: &Session) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(session)?)
}

/// Human-readable dump with the same structure as [`plain_payload`].
pub fn export_snapshot(session: &Session) -> Result<String, EncodeError> {
    Ok(serde_json::to_string_pretty(session)?)
}

/// `<base>#q=<token>`.
pub fn share_url(base: &str, token: &str) -> String {
    let base = base.split('#').next().unwrap_or(base);
    format!("{base}#q={token}")
}

/// Pull the `q` token out of a fragment (`#q=...&x=y`) or a full URL.
pub fn token_from_fragment(input: &str) -> Option<&str> {
    let fragment = input.split_once('#').map_or(input, |(_, f)| f);
    fragment
        .split('&')
        .find_map(|pair| pair.strip_prefix("q="))
        .filter(|token| !token.is_empty())
}
