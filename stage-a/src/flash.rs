//! Memory-mapped flash reader.
//!
//! On this part flash is addressable like RAM, so reads are plain
//! loads; the [`embedded_storage::nor_flash::ReadNorFlash`] impl
//! exists so the verifier's flash access goes through the same trait
//! boundary the rest of the ecosystem expects, rather than `fwcore`
//! depending on raw pointers directly.

use embedded_storage::nor_flash::{ErrorType, NorFlashError, NorFlashErrorKind, ReadNorFlash};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashReadError;

impl NorFlashError for FlashReadError {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::Other
    }
}

/// A read-only view of the whole flash address space, starting at
/// address 0.
pub struct MappedFlash;

impl ErrorType for MappedFlash {
    type Error = FlashReadError;
}

impl ReadNorFlash for MappedFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        // Safety: flash is mapped and readable for its whole address
        // range on this part; the verifier never reads past what
        // `fwcore::verify_record`'s own bounds checks allow.
        unsafe {
            core::ptr::copy_nonoverlapping(offset as *const u8, bytes.as_mut_ptr(), bytes.len());
        }
        Ok(())
    }

    fn capacity(&self) -> usize {
        u32::MAX as usize
    }
}
