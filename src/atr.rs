/*
 * `.atr` chunked trie file format (spec.md §4.C), read and written here the
 * way the teacher reads gzip's fixed-then-variable header in
 * `decompress_gzip.rs::libdeflate_gzip_decompress`: fields are pulled off a
 * byte cursor in file order, each one checked before moving on, with a
 * typed `Error` returned the first time something doesn't match rather than
 * partially constructing a trie and hoping the caller notices.
 *
 * Unlike the teacher's bitstream-based DEFLATE reader, there is no bit-level
 * packing here — every field is byte-aligned, so this reads the whole
 * stream into memory up front and walks it as a slice rather than through a
 * windowed chunked buffer; a `.atr` file is expected to be small compared to
 * a compressed data stream.
 */

use std::io::{Read, Write};

use crate::crc32;
use crate::error::Error;
use crate::trie::Trie;

const MAGIC: &[u8; 8] = b"ARBOTRIE";
const VERSION: u16 = 0;

const TAG_FORM: [u8; 4] = *b"FORM";
const TAG_DATA: [u8; 4] = *b"DATA";
const TAG_INDX: [u8; 4] = *b"INDX";

/// Reads one `.atr` stream per spec.md §4.C, returning the trie it encodes
/// or the first error found. On any error no partial trie is exposed.
pub fn load_trie<R: Read>(mut reader: R) -> Result<Trie, Error> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse(&buf)
}

fn parse(buf: &[u8]) -> Result<Trie, Error> {
    if buf.len() < MAGIC.len() + 4 + 2 || &buf[..MAGIC.len()] != MAGIC {
        return Err(Error::BadMagic);
    }

    let stored_crc = u32::from_le_bytes(buf[8..12].try_into().unwrap());
    let version = u16::from_le_bytes(buf[12..14].try_into().unwrap());
    if version != VERSION {
        return Err(Error::BadVersion(version));
    }

    // CRC covers everything after the checksum field: the version field
    // plus every chunk header and payload.
    let computed = crc32::checksum(&buf[12..]);
    if computed != stored_crc {
        log::warn!(
            "atr checksum mismatch: file says {stored_crc:#010x}, computed {computed:#010x}"
        );
        return Err(Error::ChecksumMismatch {
            expected: stored_crc,
            computed,
        });
    }

    let mut default_value = None;
    let mut high_end = None;
    let mut data = Vec::new();
    let mut indices = Vec::new();

    let mut pos = 14;
    while pos < buf.len() {
        if pos + 8 > buf.len() {
            return Err(Error::TruncatedChunk { tag: *b"????" });
        }
        let tag: [u8; 4] = buf[pos..pos + 4].try_into().unwrap();
        let len = u32::from_le_bytes(buf[pos + 4..pos + 8].try_into().unwrap()) as usize;
        pos += 8;

        if pos + len > buf.len() {
            return Err(Error::TruncatedChunk { tag });
        }
        let payload = &buf[pos..pos + len];
        pos += len;

        match tag {
            TAG_FORM => {
                if len != 8 {
                    return Err(Error::MalformedFormChunk { len: len as u32 });
                }
                default_value = Some(u32::from_le_bytes(payload[0..4].try_into().unwrap()));
                high_end = Some(u32::from_le_bytes(payload[4..8].try_into().unwrap()));
            }
            TAG_DATA => {
                data = payload
                    .chunks_exact(4)
                    .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
                    .collect();
            }
            TAG_INDX => {
                indices = payload
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes(c.try_into().unwrap()))
                    .collect();
            }
            other => {
                log::debug!(
                    "skipping unknown atr chunk {:?}",
                    String::from_utf8_lossy(&other)
                );
            }
        }
    }

    let (default_value, high_end) = match (default_value, high_end) {
        (Some(d), Some(h)) => (d, h),
        _ => return Err(Error::MissingFormChunk),
    };

    log::debug!(
        "loaded atr trie: {} data entries, {} indices entries, high_end {high_end:#x}",
        data.len(),
        indices.len()
    );

    Ok(Trie::from_parts(data, indices, high_end, default_value))
}

/// Writes `trie` as a `.atr` stream. Chunk order (`FORM`, `DATA`, `INDX`) is
/// not mandated by the format but is fixed here for reproducible output; a
/// conformant reader must accept any order.
pub fn write_trie<W: Write>(trie: &Trie, mut writer: W) -> Result<(), Error> {
    let mut body = Vec::new();
    body.extend_from_slice(&VERSION.to_le_bytes());

    let mut form_payload = Vec::with_capacity(8);
    form_payload.extend_from_slice(&trie.default_value().to_le_bytes());
    form_payload.extend_from_slice(&trie.high_end().to_le_bytes());
    write_chunk(&mut body, &TAG_FORM, &form_payload);

    let data_payload: Vec<u8> = trie.data().iter().flat_map(|v| v.to_le_bytes()).collect();
    write_chunk(&mut body, &TAG_DATA, &data_payload);

    let indices_payload: Vec<u8> = trie.indices().iter().flat_map(|v| v.to_le_bytes()).collect();
    write_chunk(&mut body, &TAG_INDX, &indices_payload);

    let crc = crc32::checksum(&body);

    writer.write_all(MAGIC)?;
    writer.write_all(&crc.to_le_bytes())?;
    writer.write_all(&body)?;
    Ok(())
}

fn write_chunk(buf: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    buf.extend_from_slice(tag);
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trie() -> Trie {
        let mut data = vec![0u32; 128];
        data[65] = 5;
        Trie::from_parts(data, vec![1, 2, 3], 0x7f, 0)
    }

    #[test]
    fn round_trips_through_bytes() {
        let trie = sample_trie();
        let mut bytes = Vec::new();
        write_trie(&trie, &mut bytes).unwrap();

        let loaded = load_trie(&bytes[..]).unwrap();
        assert_eq!(loaded.default_value(), trie.default_value());
        assert_eq!(loaded.high_end(), trie.high_end());
        assert_eq!(loaded.data(), trie.data());
        assert_eq!(loaded.indices(), trie.indices());
        for cp in 0..0x110000u32 {
            if cp % 4001 == 0 {
                assert_eq!(loaded.lookup(cp), trie.lookup(cp));
            }
        }
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = Vec::new();
        write_trie(&sample_trie(), &mut bytes).unwrap();
        bytes[0] = b'X';
        assert!(matches!(load_trie(&bytes[..]), Err(Error::BadMagic)));
    }

    #[test]
    fn rejects_bit_flip_in_body() {
        let mut bytes = Vec::new();
        write_trie(&sample_trie(), &mut bytes).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        assert!(matches!(
            load_trie(&bytes[..]),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn rejects_short_read() {
        let mut bytes = Vec::new();
        write_trie(&sample_trie(), &mut bytes).unwrap();
        bytes.truncate(bytes.len() - 4);
        assert!(load_trie(&bytes[..]).is_err());
    }

    #[test]
    fn skips_unknown_chunks() {
        let trie = sample_trie();
        let mut body = Vec::new();
        body.extend_from_slice(&VERSION.to_le_bytes());
        write_chunk(&mut body, b"XTRA", b"ignore me");
        let mut form_payload = Vec::with_capacity(8);
        form_payload.extend_from_slice(&trie.default_value().to_le_bytes());
        form_payload.extend_from_slice(&trie.high_end().to_le_bytes());
        write_chunk(&mut body, &TAG_FORM, &form_payload);

        let crc = crc32::checksum(&body);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&body);

        let loaded = load_trie(&bytes[..]).unwrap();
        assert_eq!(loaded.default_value(), trie.default_value());
    }
}
