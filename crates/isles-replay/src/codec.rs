//! Binary encode/decode for the replay format.
//!
//! All multi-byte integers are little-endian. The keyframe record uses
//! an explicit 10-byte packed layout rather than native struct
//! marshaling, so files are portable across platforms. The format is
//! intentionally simple — no compression, no alignment padding, no
//! self-describing schema.

use std::io::{Read, Write};

use crate::error::ReplayError;
use crate::hash::WORLD_DIGEST_LEN;
use crate::types::{Keyframe, ReplayHeader};
use crate::{FORMAT_VERSION, MAGIC};

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), ReplayError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u16.
pub fn write_u16_le(w: &mut dyn Write, v: u16) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f32.
pub fn write_f32_le(w: &mut dyn Write, v: f32) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, ReplayError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u16.
pub fn read_u16_le(r: &mut dyn Read) -> Result<u16, ReplayError> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, ReplayError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, ReplayError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a little-endian f32.
pub fn read_f32_le(r: &mut dyn Read) -> Result<f32, ReplayError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

// ── Header encode/decode ────────────────────────────────────────

/// Encode the replay file header (magic, version, world name, digest).
///
/// Validates the world name length before emitting anything, so a
/// [`ReplayError::NameTooLong`] never leaves a partial header behind.
pub fn encode_header(w: &mut dyn Write, header: &ReplayHeader) -> Result<(), ReplayError> {
    let name = header.world_file_name.as_bytes();
    if name.len() > u8::MAX as usize {
        return Err(ReplayError::NameTooLong { len: name.len() });
    }

    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_u8(w, name.len() as u8)?;
    w.write_all(name)?;
    w.write_all(&header.world_digest)?;
    Ok(())
}

/// Decode and validate the replay file header.
pub fn decode_header(r: &mut dyn Read) -> Result<ReplayHeader, ReplayError> {
    let mut magic = [0u8; 12];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ReplayError::InvalidMagic);
    }

    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(ReplayError::UnsupportedVersion { found: version });
    }

    let name_len = read_u8(r)? as usize;
    let mut name = vec![0u8; name_len];
    r.read_exact(&mut name)?;
    let world_file_name = String::from_utf8_lossy(&name).into_owned();

    let mut world_digest = [0u8; WORLD_DIGEST_LEN];
    r.read_exact(&mut world_digest)?;

    Ok(ReplayHeader {
        world_file_name,
        world_digest,
    })
}

// ── Keyframe encode/decode ──────────────────────────────────────

/// Encode one keyframe as the packed 10-byte record
/// `time:f32 | command_id:u16 | offset:u32`.
pub fn encode_keyframe(w: &mut dyn Write, kf: &Keyframe) -> Result<(), ReplayError> {
    write_f32_le(w, kf.time)?;
    write_u16_le(w, kf.command_id)?;
    write_u32_le(w, kf.offset)?;
    Ok(())
}

/// Decode one packed 10-byte keyframe record.
pub fn decode_keyframe(r: &mut dyn Read) -> Result<Keyframe, ReplayError> {
    let time = read_f32_le(r)?;
    let command_id = read_u16_le(r)?;
    let offset = read_u32_le(r)?;
    Ok(Keyframe {
        time,
        command_id,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Primitive round-trip tests ──────────────────────────────

    proptest! {
        #[test]
        fn roundtrip_u8(v in any::<u8>()) {
            let mut buf = Vec::new();
            write_u8(&mut buf, v).unwrap();
            let got = read_u8(&mut buf.as_slice()).unwrap();
            prop_assert_eq!(v, got);
        }

        #[test]
        fn roundtrip_u16(v in any::<u16>()) {
            let mut buf = Vec::new();
            write_u16_le(&mut buf, v).unwrap();
            let got = read_u16_le(&mut buf.as_slice()).unwrap();
            prop_assert_eq!(v, got);
        }

        #[test]
        fn roundtrip_u32(v in any::<u32>()) {
            let mut buf = Vec::new();
            write_u32_le(&mut buf, v).unwrap();
            let got = read_u32_le(&mut buf.as_slice()).unwrap();
            prop_assert_eq!(v, got);
        }

        #[test]
        fn roundtrip_i32(v in any::<i32>()) {
            let mut buf = Vec::new();
            write_i32_le(&mut buf, v).unwrap();
            let got = read_i32_le(&mut buf.as_slice()).unwrap();
            prop_assert_eq!(v, got);
        }

        #[test]
        fn roundtrip_f32(v in any::<u32>()) {
            let f = f32::from_bits(v);
            let mut buf = Vec::new();
            write_f32_le(&mut buf, f).unwrap();
            let got = read_f32_le(&mut buf.as_slice()).unwrap();
            prop_assert_eq!(v, got.to_bits());
        }
    }

    // ── Keyframe round-trip ─────────────────────────────────────

    proptest! {
        #[test]
        fn roundtrip_keyframe(time in any::<u32>(), id in any::<u16>(), offset in any::<u32>()) {
            let kf = Keyframe {
                time: f32::from_bits(time),
                command_id: id,
                offset,
            };
            let mut buf = Vec::new();
            encode_keyframe(&mut buf, &kf).unwrap();
            prop_assert_eq!(buf.len(), Keyframe::ENCODED_LEN);
            let got = decode_keyframe(&mut buf.as_slice()).unwrap();
            prop_assert_eq!(kf.time.to_bits(), got.time.to_bits());
            prop_assert_eq!(kf.command_id, got.command_id);
            prop_assert_eq!(kf.offset, got.offset);
        }
    }

    #[test]
    fn keyframe_layout_is_packed() {
        let kf = Keyframe {
            time: 1.5,
            command_id: 0x0201,
            offset: 0x06050403,
        };
        let mut buf = Vec::new();
        encode_keyframe(&mut buf, &kf).unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&1.5f32.to_le_bytes());
        expected.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(buf, expected);
    }

    // ── Header round-trip ───────────────────────────────────────

    #[test]
    fn roundtrip_header() {
        let header = ReplayHeader {
            world_file_name: "Content/Levels/Demo.xml".into(),
            world_digest: [7u8; WORLD_DIGEST_LEN],
        };

        let mut buf = Vec::new();
        encode_header(&mut buf, &header).unwrap();
        assert_eq!(buf.len(), header.encoded_len());

        let got = decode_header(&mut buf.as_slice()).unwrap();
        assert_eq!(header, got);
    }

    #[test]
    fn roundtrip_header_empty_name() {
        let header = ReplayHeader {
            world_file_name: String::new(),
            world_digest: [0u8; WORLD_DIGEST_LEN],
        };
        let mut buf = Vec::new();
        encode_header(&mut buf, &header).unwrap();
        let got = decode_header(&mut buf.as_slice()).unwrap();
        assert_eq!(header, got);
    }

    #[test]
    fn bad_magic_rejected() {
        let data = b"Xsles Replay\x00";
        let result = decode_header(&mut data.as_slice());
        assert!(matches!(result, Err(ReplayError::InvalidMagic)));
    }

    #[test]
    fn bad_version_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.push(99);
        let result = decode_header(&mut buf.as_slice());
        assert!(matches!(
            result,
            Err(ReplayError::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn oversized_name_rejected_before_write() {
        let header = ReplayHeader {
            world_file_name: "x".repeat(256),
            world_digest: [0u8; WORLD_DIGEST_LEN],
        };
        let mut buf = Vec::new();
        let result = encode_header(&mut buf, &header);
        assert!(matches!(result, Err(ReplayError::NameTooLong { len: 256 })));
        assert!(buf.is_empty(), "nothing may be emitted on failure");
    }

    #[test]
    fn truncated_header_is_io_error() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.push(FORMAT_VERSION);
        buf.push(10); // name length 10, but no name bytes follow
        let result = decode_header(&mut buf.as_slice());
        assert!(matches!(result, Err(ReplayError::Io(_))));
    }
}
