// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk format for one index's postings.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ HEADER (5 bytes): magic "NGDX" + version u8  │
//! ├──────────────────────────────────────────────┤
//! │ BODY: brotli(JSON array of postings)         │
//! ├──────────────────────────────────────────────┤
//! │ FOOTER (8 bytes): crc32 LE + magic "XDGN"    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The CRC covers header and body. JSON compresses extremely well here since
//! consecutive postings share most of their keys and often their document id.

use std::io::{Read, Write};

use crc32fast::Hasher as Crc32Hasher;

use crate::error::StoreError;
use crate::types::Posting;

pub const MAGIC: [u8; 4] = *b"NGDX";
pub const FOOTER_MAGIC: [u8; 4] = *b"XDGN";
pub const VERSION: u8 = 1;
pub const HEADER_SIZE: usize = 5;
pub const FOOTER_SIZE: usize = 8;

/// File extension for snapshots.
pub const EXTENSION: &str = "ngx";

const BROTLI_QUALITY: u32 = 9;
const BROTLI_LGWIN: u32 = 22;
const BUFFER_SIZE: usize = 4096;

/// Serialize postings into a snapshot.
pub fn encode(postings: &[Posting]) -> Result<Vec<u8>, StoreError> {
    let json = serde_json::to_vec(postings)?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + json.len() / 4 + FOOTER_SIZE);
    bytes.extend_from_slice(&MAGIC);
    bytes.push(VERSION);

    let mut encoder =
        brotli::CompressorWriter::new(&mut bytes, BUFFER_SIZE, BROTLI_QUALITY, BROTLI_LGWIN);
    encoder.write_all(&json)?;
    drop(encoder);

    let crc = compute_crc32(&bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&FOOTER_MAGIC);
    Ok(bytes)
}

/// Parse and verify a snapshot.
pub fn decode(bytes: &[u8]) -> Result<Vec<Posting>, StoreError> {
    let info = read_info(bytes)?;
    if info.version != VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: info.version,
            expected: VERSION,
        });
    }
    if !info.checksum_ok() {
        return Err(StoreError::ChecksumMismatch {
            stored: info.stored_crc,
            computed: info.computed_crc,
        });
    }

    let body = &bytes[HEADER_SIZE..HEADER_SIZE + info.body_len];
    let mut json = Vec::new();
    brotli::Decompressor::new(body, BUFFER_SIZE).read_to_end(&mut json)?;
    Ok(serde_json::from_slice(&json)?)
}

/// Framing details of a snapshot, read without decompressing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub version: u8,
    pub total_len: usize,
    pub body_len: usize,
    pub stored_crc: u32,
    pub computed_crc: u32,
}

impl SnapshotInfo {
    pub fn checksum_ok(&self) -> bool {
        self.stored_crc == self.computed_crc
    }
}

/// Check the framing and read the checksums. Does not verify the CRC.
pub fn read_info(bytes: &[u8]) -> Result<SnapshotInfo, StoreError> {
    if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
        return Err(StoreError::Truncated { len: bytes.len() });
    }
    if bytes[..4] != MAGIC {
        return Err(StoreError::BadMagic {
            expected: MAGIC,
            actual: bytes[..4].to_vec(),
        });
    }

    let footer_start = bytes.len() - FOOTER_SIZE;
    let footer = &bytes[footer_start..];
    if footer[4..] != FOOTER_MAGIC {
        return Err(StoreError::BadMagic {
            expected: FOOTER_MAGIC,
            actual: footer[4..].to_vec(),
        });
    }

    Ok(SnapshotInfo {
        version: bytes[4],
        total_len: bytes.len(),
        body_len: footer_start - HEADER_SIZE,
        stored_crc: u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]),
        computed_crc: compute_crc32(&bytes[..footer_start]),
    })
}

/// Compute CRC32 over the given bytes
pub fn compute_crc32(data: &[u8]) -> u32 {
    let mut hasher = Crc32Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
