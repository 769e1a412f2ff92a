//! Minimal PNG writer: 8-bit RGB, one IDAT chunk, no filtering.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::canvas::PixelBuffer;
use crate::error::EncodeError;

pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest width or height the container can describe.
const MAX_DIMENSION: u32 = (1 << 31) - 1;

const CRC_POLY: u32 = 0xEDB8_8320;

/// Reflected CRC-32 over `bytes`, computed bit by bit.
pub fn crc32(bytes: &[u8]) -> u32 {
    crc32_update(0xFFFF_FFFF, bytes) ^ 0xFFFF_FFFF
}

fn crc32_update(mut crc: u32, bytes: &[u8]) -> u32 {
    for &byte in bytes {
        crc ^= byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (CRC_POLY & mask);
        }
    }
    crc
}

/// Serialize one chunk: length, type, payload, CRC over type and payload.
pub fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    let crc = crc32_update(crc32_update(0xFFFF_FFFF, kind), payload) ^ 0xFFFF_FFFF;
    out.extend_from_slice(&crc.to_be_bytes());
}

fn header(width: u32, height: u32) -> [u8; 13] {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&width.to_be_bytes());
    ihdr[4..8].copy_from_slice(&height.to_be_bytes());
    ihdr[8] = 8; // bit depth
    ihdr[9] = 2; // truecolor
    // compression, filter and interlace methods stay 0
    ihdr
}

/// Encode row-major RGB bytes as a complete PNG file.
pub fn encode(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let stride = width as usize * 3;
    let expected = stride * height as usize;
    if rgb.len() != expected {
        return Err(EncodeError::BufferSizeMismatch {
            expected,
            actual: rgb.len(),
        });
    }

    let mut scanlines = Vec::with_capacity(expected + height as usize);
    for row in rgb.chunks_exact(stride) {
        scanlines.push(0);
        scanlines.extend_from_slice(row);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&scanlines)?;
    let idat = encoder.finish()?;

    let mut out = Vec::with_capacity(idat.len() + 64);
    out.extend_from_slice(&SIGNATURE);
    write_chunk(&mut out, b"IHDR", &header(width, height));
    write_chunk(&mut out, b"IDAT", &idat);
    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

pub fn encode_buffer(buf: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    encode(buf.as_raw(), buf.width(), buf.height())
}

/// Encode `buf` and write it to `path`.
pub fn write_png<P: AsRef<Path>>(path: P, buf: &PixelBuffer) -> Result<(), EncodeError> {
    let bytes = encode_buffer(buf)?;
    fs::write(path, bytes)?;
    Ok(())
}
