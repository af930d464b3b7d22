//! Downloaded hologram payloads.
//!
//! The storage accessor serves holograms as binary glTF (GLB). Only the
//! 12-byte container header is checked here; decoding chunks and building a
//! scene is the rendering host's job.

use crate::error::ApiError;

/// `glTF` read as a little-endian u32.
pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_HEADER_LEN: usize = 12;
pub const GLB_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbHeader {
    pub version: u32,
    /// Total length of the container as declared by the header.
    pub length: u32,
}

impl GlbHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, ApiError> {
        if bytes.len() < GLB_HEADER_LEN {
            return Err(ApiError::InvalidAsset(format!(
                "{} bytes is shorter than a GLB header",
                bytes.len()
            )));
        }
        let word = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        if word(0) != GLB_MAGIC {
            return Err(ApiError::InvalidAsset("missing glTF magic".to_string()));
        }
        let version = word(4);
        if version != GLB_VERSION {
            return Err(ApiError::InvalidAsset(format!(
                "unsupported GLB version {version}"
            )));
        }
        let length = word(8);
        if length as usize > bytes.len() {
            return Err(ApiError::InvalidAsset(format!(
                "header declares {length} bytes but only {} were received",
                bytes.len()
            )));
        }
        Ok(Self { version, length })
    }
}

/// Raw bytes of one downloaded hologram, with a validated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HologramAsset {
    pub hid: String,
    pub header: GlbHeader,
    pub bytes: Vec<u8>,
}

impl HologramAsset {
    pub fn new(hid: &str, bytes: Vec<u8>) -> Result<Self, ApiError> {
        let header = GlbHeader::parse(&bytes)?;
        Ok(Self {
            hid: hid.to_string(),
            header,
            bytes,
        })
    }

    /// The container as declared by its header, without trailing bytes.
    pub fn glb(&self) -> &[u8] {
        &self.bytes[..self.header.length as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glb(declared: u32, total: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(total);
        bytes.extend_from_slice(b"glTF");
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&declared.to_le_bytes());
        bytes.resize(total, 0);
        bytes
    }

    #[test]
    fn parses_valid_header() {
        let header = GlbHeader::parse(&glb(20, 20)).unwrap();
        assert_eq!(header, GlbHeader { version: 2, length: 20 });
    }

    #[test]
    fn rejects_short_buffer() {
        let err = GlbHeader::parse(b"glTF").unwrap_err();
        assert!(matches!(err, ApiError::InvalidAsset(_)));
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = glb(12, 12);
        bytes[0] = b'x';
        assert!(GlbHeader::parse(&bytes).is_err());
    }

    #[test]
    fn rejects_truncated_body() {
        let err = GlbHeader::parse(&glb(100, 40)).unwrap_err();
        assert!(err.to_string().contains("declares 100 bytes"));
    }

    #[test]
    fn glb_slice_drops_trailing_bytes() {
        let asset = HologramAsset::new("h1", glb(16, 24)).unwrap();
        assert_eq!(asset.glb().len(), 16);
        assert_eq!(asset.bytes.len(), 24);
    }
}
