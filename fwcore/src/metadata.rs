//! Fixed-layout descriptor of the covered firmware image.
//!
//! Bit-exact with the host tool that writes it: every field is a plain
//! little-endian integer or byte array, no padding, no derived `repr`.

/// Constant sentinel identifying a populated metadata record.
pub const MAGIC: u32 = 0xDEAD_BEEF;

/// Value the metadata's `reserved` field must hold once written.
pub const RESERVED: [u8; 32] = [0u8; 32];

/// Size in bytes of [`MetadataRecord::to_bytes`]'s output.
///
/// `magic(4) + version(4) + size(4) + crc32(4) + sha256(32) + timestamp(4)
/// + reserved(32)` = 84. spec.md quotes 80; the field widths it lists
/// (including a 256-bit `reserved`) sum to 84, matching the original
/// `FirmwareMetadata_t` struct, so 84 is what this crate implements.
pub const RECORD_SIZE: usize = 84;

/// The metadata record at `META_BASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct MetadataRecord {
    pub magic: u32,
    pub version: u32,
    pub size: u32,
    pub crc32: u32,
    pub sha256: [u8; 32],
    pub timestamp: u32,
    pub reserved: [u8; 32],
}

impl MetadataRecord {
    /// Builds a record for a freshly-measured image. `reserved` is
    /// always written zero, per spec.
    pub fn new(version: u32, size: u32, crc32: u32, sha256: [u8; 32], timestamp: u32) -> Self {
        Self {
            magic: MAGIC,
            version,
            size,
            crc32,
            sha256,
            timestamp,
            reserved: RESERVED,
        }
    }

    /// Serializes the record into its on-flash byte layout.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        let mut off = 0;
        out[off..off + 4].copy_from_slice(&self.magic.to_le_bytes());
        off += 4;
        out[off..off + 4].copy_from_slice(&self.version.to_le_bytes());
        off += 4;
        out[off..off + 4].copy_from_slice(&self.size.to_le_bytes());
        off += 4;
        out[off..off + 4].copy_from_slice(&self.crc32.to_le_bytes());
        off += 4;
        out[off..off + 32].copy_from_slice(&self.sha256);
        off += 32;
        out[off..off + 4].copy_from_slice(&self.timestamp.to_le_bytes());
        off += 4;
        out[off..off + 32].copy_from_slice(&self.reserved);
        out
    }

    /// Parses a record out of a raw byte slice read from flash.
    ///
    /// Returns `None` if `bytes` is shorter than [`RECORD_SIZE`]; this
    /// is a layout failure distinct from the magic-value check in
    /// [`crate::verify::verify_record`].
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < RECORD_SIZE {
            return None;
        }
        let mut off = 0;
        let take4 = |off: &mut usize| -> [u8; 4] {
            let a = [bytes[*off], bytes[*off + 1], bytes[*off + 2], bytes[*off + 3]];
            *off += 4;
            a
        };
        let magic = u32::from_le_bytes(take4(&mut off));
        let version = u32::from_le_bytes(take4(&mut off));
        let size = u32::from_le_bytes(take4(&mut off));
        let crc32 = u32::from_le_bytes(take4(&mut off));
        let mut sha256 = [0u8; 32];
        sha256.copy_from_slice(&bytes[off..off + 32]);
        off += 32;
        let timestamp = u32::from_le_bytes(take4(&mut off));
        let mut reserved = [0u8; 32];
        reserved.copy_from_slice(&bytes[off..off + 32]);

        Some(Self {
            magic,
            version,
            size,
            crc32,
            sha256,
            timestamp,
            reserved,
        })
    }
}
