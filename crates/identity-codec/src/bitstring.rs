use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::{GzDecoder, GzEncoder};
use flate2::Compression;
use identity_core::IdentityError;
use std::io::Read;

/// A StatusList2021 bitstring. Bit 0 of byte 0 is index 0 (little-endian
/// within each byte). Decoded length is always `8 * byte_count` — the
/// original bit-count is not preserved through encode/decode, so
/// out-of-range reads return `false` instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitstring {
    bytes: Vec<u8>,
}

impl Bitstring {
    /// A zero-filled bitstring of at least `bits` bits, rounded up to a
    /// whole byte.
    pub fn zeroed(bits: u64) -> Self {
        let byte_len = (bits as usize).div_ceil(8);
        Self {
            bytes: vec![0u8; byte_len],
        }
    }

    pub fn bit_len(&self) -> u64 {
        (self.bytes.len() * 8) as u64
    }

    /// Out-of-range reads return `false` rather than erroring.
    pub fn get(&self, index: u64) -> bool {
        let byte_idx = (index / 8) as usize;
        let bit_idx = (index % 8) as u32;
        match self.bytes.get(byte_idx) {
            Some(byte) => (byte >> bit_idx) & 1 == 1,
            None => false,
        }
    }

    pub fn set(&mut self, index: u64, value: bool) -> Result<(), IdentityError> {
        let byte_idx = (index / 8) as usize;
        let bit_idx = (index % 8) as u32;
        let byte = self
            .bytes
            .get_mut(byte_idx)
            .ok_or_else(|| IdentityError::InvalidInput(format!("bit index {index} out of range")))?;
        if value {
            *byte |= 1 << bit_idx;
        } else {
            *byte &= !(1 << bit_idx);
        }
        Ok(())
    }

    /// Grows the bitstring by `extra_bits`, zero-filling the new tail.
    /// Length only ever grows — never shrinks.
    pub fn expand(&mut self, extra_bits: u64) {
        let extra_bytes = (extra_bits as usize).div_ceil(8);
        self.bytes.extend(std::iter::repeat(0u8).take(extra_bytes));
    }

    /// Scans forward from `from` for the first unset bit.
    pub fn first_zero_from(&self, from: u64) -> Option<u64> {
        (from..self.bit_len()).find(|&i| !self.get(i))
    }

    pub fn encode(&self, compression_level: u32) -> Result<String, IdentityError> {
        let level = Compression::new(compression_level.min(9));
        let mut encoder = GzEncoder::new(self.bytes.as_slice(), level);
        let mut compressed = Vec::new();
        encoder
            .read_to_end(&mut compressed)
            .map_err(|e| IdentityError::Integrity(format!("gzip encode failed: {e}")))?;
        Ok(BASE64.encode(compressed))
    }

    pub fn decode(encoded: &str) -> Result<Self, IdentityError> {
        let compressed = BASE64
            .decode(encoded)
            .map_err(|e| IdentityError::Integrity(format!("base64 decode failed: {e}")))?;
        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut bytes = Vec::new();
        decoder
            .read_to_end(&mut bytes)
            .map_err(|e| IdentityError::Integrity(format!("gzip decode failed: {e}")))?;
        Ok(Self { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_pattern() {
        let mut bs = Bitstring::zeroed(96);
        for i in (0..96).step_by(3) {
            bs.set(i, true).unwrap();
        }
        let encoded = bs.encode(6).unwrap();
        let decoded = Bitstring::decode(&encoded).unwrap();
        for i in 0..96 {
            assert_eq!(bs.get(i), decoded.get(i), "bit {i} mismatch");
        }
    }

    #[test]
    fn out_of_range_reads_false() {
        let bs = Bitstring::zeroed(8);
        assert!(!bs.get(1000));
    }

    #[test]
    fn allocate_first_zero() {
        let mut bs = Bitstring::zeroed(8);
        bs.set(0, true).unwrap();
        bs.set(1, true).unwrap();
        assert_eq!(bs.first_zero_from(0), Some(2));
    }

    #[test]
    fn expand_grows_without_truncating() {
        let mut bs = Bitstring::zeroed(8);
        bs.set(3, true).unwrap();
        bs.expand(8);
        assert_eq!(bs.bit_len(), 16);
        assert!(bs.get(3));
        assert!(!bs.get(12));
    }

    #[test]
    fn little_endian_bit_order() {
        let mut bs = Bitstring::zeroed(8);
        bs.set(0, true).unwrap();
        assert_eq!(bs.bytes[0], 0b0000_0001);
    }
}
