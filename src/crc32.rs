/*
 * The `.atr` file format's specific reflected CRC-32 variant (spec.md §4.C).
 *
 * This is deliberately not the "plain" CRC-32/ISO-HDLC variant that
 * `crc32fast` implements: it folds the final XOR-out step into the
 * generated table instead of applying it once to the finished accumulator,
 * so the raw running accumulator *is* the stored checksum with no separate
 * xor-out step at the end. The loader and writer in this crate both go
 * through this module, so they necessarily agree; nothing outside `.atr`
 * handling should assume this matches any standard CRC-32 variant.
 */

const POLYNOMIAL: u32 = 0xedb88320;
const TABLE_XOR: u32 = 0xff000000;

fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut c = i as u32;
        let mut bit = 0;
        while bit < 8 {
            c = if c & 1 != 0 {
                POLYNOMIAL ^ (c >> 1)
            } else {
                c >> 1
            };
            bit += 1;
        }
        table[i] = c ^ TABLE_XOR;
        i += 1;
    }
    table
}

/// A running checksum over this crate's `.atr` CRC variant. Seeded at
/// `0xFFFFFFFF`; call [`Crc32::finish`] to get the stored checksum value —
/// there is no further xor-out step to apply.
pub struct Crc32 {
    table: [u32; 256],
    accumulator: u32,
}

impl Crc32 {
    pub fn new() -> Self {
        Self {
            table: build_table(),
            accumulator: 0xffff_ffff,
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for &b in bytes {
            let index = ((self.accumulator ^ b as u32) & 0xff) as usize;
            self.accumulator = self.table[index] ^ (self.accumulator >> 8);
        }
    }

    pub fn finish(&self) -> u32 {
        self.accumulator
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience one-shot checksum over a single byte slice.
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(bytes);
    crc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic() {
        assert_eq!(checksum(b"hello, world"), checksum(b"hello, world"));
    }

    #[test]
    fn differs_between_inputs() {
        assert_ne!(checksum(b"hello"), checksum(b"world"));
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut crc = Crc32::new();
        crc.update(b"hello, ");
        crc.update(b"world");
        assert_eq!(crc.finish(), checksum(b"hello, world"));
    }

    #[test]
    fn single_bit_flip_changes_checksum() {
        let mut data = b"the quick brown fox".to_vec();
        let original = checksum(&data);
        data[3] ^= 0x01;
        assert_ne!(checksum(&data), original);
    }

    /// This module's variant folds the final XOR-out into the table instead
    /// of applying it once at the end, so it is not a drop-in replacement
    /// for the standard CRC-32/ISO-HDLC that `crc32fast` computes. Guards
    /// against someone "simplifying" the `.atr` reader/writer to call
    /// `crc32fast` directly and silently breaking checksum compatibility.
    #[test]
    fn differs_from_standard_crc32() {
        let data = b"the quick brown fox";
        let mut standard = crc32fast::Hasher::new();
        standard.update(data);
        assert_ne!(checksum(data), standard.finalize());
    }
}
