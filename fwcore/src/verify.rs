//! The stage-A decision procedure (§4.3): an ordered sequence of
//! integrity checks over a metadata record and the image bytes it
//! describes. Pure function — no flash or peripheral access — so it is
//! fully exercised on the host; `stage-a` only supplies the byte
//! slices.

use crate::checksum::crc32;
use crate::hash::Sha256;
use crate::metadata::{MetadataRecord, MAGIC};

/// Mask applied to the image's initial stack pointer; the result must
/// equal [`SP_EXPECT`] for the value to plausibly point into on-chip
/// SRAM.
const SP_MASK: u32 = 0x2FFE_0000;
const SP_EXPECT: u32 = 0x2000_0000;

/// A verification failure. Each variant drives a distinct fault
/// indicator pattern (§4.5) and is terminal — there is no rollback
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum VerifyError {
    BadMagic,
    BadSize,
    BadStackPointer,
    BadCrc,
    BadHash,
}

/// Runs the ordered checks of §4.3 and returns the first failure, if
/// any.
///
/// `image` must be at least `img_max` bytes — the full flash window
/// the metadata's `size` field is bounded by. Reading fewer bytes than
/// `meta.size` describes is itself a `BadSize` failure: a record
/// cannot describe more image than was provided.
pub fn verify_record(meta: &MetadataRecord, image: &[u8], img_max: u32) -> Result<(), VerifyError> {
    if meta.magic != MAGIC {
        return Err(VerifyError::BadMagic);
    }

    if meta.size == 0 || meta.size > img_max || meta.size as usize > image.len() {
        return Err(VerifyError::BadSize);
    }

    if image.len() < 4 {
        return Err(VerifyError::BadStackPointer);
    }
    let sp = u32::from_le_bytes([image[0], image[1], image[2], image[3]]);
    if sp & SP_MASK != SP_EXPECT {
        return Err(VerifyError::BadStackPointer);
    }

    let covered = &image[..meta.size as usize];

    if crc32(covered) != meta.crc32 {
        return Err(VerifyError::BadCrc);
    }

    if Sha256::digest(covered) != meta.sha256 {
        return Err(VerifyError::BadHash);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_valid_sp<const N: usize>() -> [u8; N] {
        let mut buf = [0u8; N];
        buf[0..4].copy_from_slice(&0x2000_4FE0u32.to_le_bytes());
        buf
    }

    fn record_for(image: &[u8]) -> MetadataRecord {
        MetadataRecord::new(1, image.len() as u32, crc32(image), Sha256::digest(image), 0x6000_0000)
    }

    #[test]
    fn happy_path_is_valid() {
        let image = image_with_valid_sp::<16384>();
        let meta = record_for(&image);
        assert_eq!(verify_record(&meta, &image, 16384), Ok(()));
    }

    #[test]
    fn bad_magic_is_first_failure() {
        let image = image_with_valid_sp::<16>();
        let mut meta = record_for(&image);
        meta.magic = 0;
        assert_eq!(verify_record(&meta, &image, 16), Err(VerifyError::BadMagic));
    }

    #[test]
    fn size_zero_is_rejected() {
        let image = image_with_valid_sp::<16>();
        let mut meta = record_for(&image);
        meta.size = 0;
        assert_eq!(verify_record(&meta, &image, 16), Err(VerifyError::BadSize));
    }

    #[test]
    fn size_at_img_max_passes_bound_check() {
        let image = image_with_valid_sp::<16>();
        let meta = record_for(&image);
        assert_eq!(meta.size, 16);
        assert_eq!(verify_record(&meta, &image, 16), Ok(()));
    }

    #[test]
    fn size_over_img_max_is_rejected() {
        let image = image_with_valid_sp::<17>();
        let mut meta = record_for(&image);
        meta.size = 17;
        assert_eq!(verify_record(&meta, &image, 16), Err(VerifyError::BadSize));
    }

    #[test]
    fn stack_pointer_boundaries() {
        for (sp, ok) in [(0x2000_0000u32, true), (0x2000_4FFFu32, true), (0x0800_0000u32, false), (0xFFFF_FFFFu32, false)] {
            let mut image = image_with_valid_sp::<16>();
            image[0..4].copy_from_slice(&sp.to_le_bytes());
            let meta = record_for(&image);
            let res = verify_record(&meta, &image, 16);
            if ok {
                assert_eq!(res, Ok(()));
            } else {
                assert_eq!(res, Err(VerifyError::BadStackPointer));
            }
        }
    }

    #[test]
    fn crc_tamper_is_caught_before_hash() {
        let mut image = image_with_valid_sp::<32>();
        let meta = record_for(&image);
        image[20] ^= 0x01;
        assert_eq!(verify_record(&meta, &image, 32), Err(VerifyError::BadCrc));
    }

    #[test]
    fn hash_tamper_is_caught_when_crc_collides() {
        // A record whose crc32 matches the image but whose sha256 was
        // corrupted after computation, to exercise BadHash specifically
        // rather than relying on CRC to always be the one that catches it.
        let image = image_with_valid_sp::<32>();
        let mut meta = record_for(&image);
        meta.sha256[0] ^= 0xFF;
        assert_eq!(verify_record(&meta, &image, 32), Err(VerifyError::BadHash));
    }
}
