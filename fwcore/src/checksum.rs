//! CRC-32 (poly `0xEDB88320`, init/final-xor `0xFFFFFFFF`) — the
//! Ethernet/zlib/PKZIP variant, `CRC_32_ISO_HDLC` in the `crc` crate.
//!
//! The teacher's bootloader uses the `crc` crate with `CRC_32_ISCSI`
//! (Castagnoli) for flash-block checksums; this system needs the IEEE
//! 802.3 variant instead, so only the algorithm constant differs.

use crc::{Crc, CRC_32_ISO_HDLC};

const ALGORITHM: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Computes the CRC-32 of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    ALGORITHM.checksum(data)
}
