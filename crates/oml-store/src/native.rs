use std::io::{Read, Seek, SeekFrom, Write};

use oml_types::{PlatformVersion, VersionNumber};
use oml_xml::XmlElement;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{NativeDocument, NativeFragment};
use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, ReadSeek};

const MAGIC: &[u8; 4] = b"OMLC";
const FORMAT_VERSION: u32 = 1;
const CHECKSUM_LEN: usize = 32;
const DEFAULT_LEVEL: i32 = 3;

/// Header block, bincode-encoded after the preamble.
#[derive(Serialize, Deserialize)]
struct HeaderBlock {
    platform: VersionNumber,
    label: String,
    headers: Vec<(String, String)>,
}

/// Reference container codec.
///
/// Layout (integers big-endian, lengths as LEB128 varints):
///
/// ```text
/// "OMLC" | u32 format | varint len | bincode HeaderBlock
///        | varint fragment count
///        | { varint name len | name | varint payload len | u32 crc32 | zstd(xml) }*
///        | blake3(everything above)
/// ```
#[derive(Clone, Debug)]
pub struct NativeContainerStore {
    level: i32,
}

impl NativeContainerStore {
    pub fn new() -> Self {
        Self {
            level: DEFAULT_LEVEL,
        }
    }

    /// Use a specific zstd compression level for fragment payloads.
    pub fn with_compression_level(level: i32) -> Self {
        Self { level }
    }

    /// Encode a handle into container bytes.
    pub fn encode(&self, document: &NativeDocument) -> StoreResult<Vec<u8>> {
        let mut data = Vec::new();
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(&FORMAT_VERSION.to_be_bytes());

        let block = HeaderBlock {
            platform: document.platform(),
            label: document.platform_label().to_string(),
            headers: document.headers().to_vec(),
        };
        let block =
            bincode::serialize(&block).map_err(|e| StoreError::Serialization(e.to_string()))?;
        encode_varint(&mut data, block.len() as u64);
        data.extend_from_slice(&block);

        encode_varint(&mut data, document.fragments().len() as u64);
        for fragment in document.fragments() {
            encode_varint(&mut data, fragment.name.len() as u64);
            data.extend_from_slice(fragment.name.as_bytes());
            encode_varint(&mut data, fragment.payload.len() as u64);
            data.extend_from_slice(&crc32fast::hash(&fragment.payload).to_be_bytes());
            data.extend_from_slice(&fragment.payload);
        }

        let checksum = *blake3::hash(&data).as_bytes();
        data.extend_from_slice(&checksum);
        Ok(data)
    }

    /// Decode container bytes, rejecting documents newer than `version`.
    pub fn decode(&self, data: &[u8], version: &PlatformVersion) -> StoreResult<NativeDocument> {
        if data.len() < MAGIC.len() + 4 + CHECKSUM_LEN {
            return Err(StoreError::Corrupt {
                offset: 0,
                reason: "container too short".into(),
            });
        }
        if &data[0..4] != MAGIC {
            return Err(StoreError::InvalidMagic {
                expected: String::from_utf8_lossy(MAGIC).into(),
                actual: String::from_utf8_lossy(&data[0..4]).into(),
            });
        }
        let mut format = [0u8; 4];
        format.copy_from_slice(&data[4..8]);
        let format = u32::from_be_bytes(format);
        if format != FORMAT_VERSION {
            return Err(StoreError::UnsupportedFormat(format));
        }

        let (body, trailer) = data.split_at(data.len() - CHECKSUM_LEN);
        let computed = blake3::hash(body);
        if computed.as_bytes().as_slice() != trailer {
            return Err(StoreError::ChecksumMismatch {
                expected: hex::encode(trailer),
                computed: computed.to_hex().to_string(),
            });
        }

        let mut cursor = Cursor::new(body, 8);
        let block_len = cursor.varint()?;
        let block: HeaderBlock = bincode::deserialize(cursor.take(block_len)?)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if block.platform.major > version.major() {
            return Err(StoreError::NewerPlatform {
                document: block.platform,
                requested: version.label().to_string(),
            });
        }

        let count = cursor.varint()?;
        let mut fragments: Vec<NativeFragment> = Vec::new();
        for _ in 0..count {
            let offset = cursor.pos as u64;
            let name_len = cursor.varint()?;
            let name = std::str::from_utf8(cursor.take(name_len)?)
                .map_err(|e| StoreError::Corrupt {
                    offset,
                    reason: format!("fragment name is not UTF-8: {e}"),
                })?
                .to_string();
            if fragments.iter().any(|f| f.name == name) {
                return Err(StoreError::Corrupt {
                    offset,
                    reason: format!("duplicate fragment name \"{name}\""),
                });
            }
            let payload_len = cursor.varint()?;
            let expected_crc = cursor.u32()?;
            let payload = cursor.take(payload_len)?.to_vec();
            if crc32fast::hash(&payload) != expected_crc {
                return Err(StoreError::CrcMismatch(name));
            }
            fragments.push(NativeFragment { name, payload });
        }

        if cursor.pos != body.len() {
            return Err(StoreError::Corrupt {
                offset: cursor.pos as u64,
                reason: "trailing bytes before checksum".into(),
            });
        }

        Ok(NativeDocument::from_parts(
            block.platform,
            block.label,
            block.headers,
            fragments,
        ))
    }
}

impl Default for NativeContainerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for NativeContainerStore {
    fn load(
        &self,
        reader: &mut dyn ReadSeek,
        version: &PlatformVersion,
    ) -> StoreResult<NativeDocument> {
        reader.seek(SeekFrom::Start(0))?;
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let document = self.decode(&data, version)?;
        debug!(
            bytes = data.len(),
            fragments = document.fragments().len(),
            platform = %document.platform(),
            "decoded container"
        );
        Ok(document)
    }

    fn read_fragment(
        &self,
        document: &NativeDocument,
        name: &str,
    ) -> StoreResult<Option<XmlElement>> {
        let Some(fragment) = document.fragment(name) else {
            return Ok(None);
        };
        let decode_err = |reason: String| StoreError::FragmentDecode {
            name: name.to_string(),
            reason,
        };
        let raw = zstd::decode_all(fragment.payload.as_slice()).map_err(|e| decode_err(e.to_string()))?;
        let text = String::from_utf8(raw).map_err(|e| decode_err(e.to_string()))?;
        let xml = oml_xml::parse_element(&text).map_err(|e| decode_err(e.to_string()))?;
        Ok(Some(xml))
    }

    fn write_fragment(
        &self,
        document: &mut NativeDocument,
        name: &str,
        xml: &XmlElement,
    ) -> StoreResult<()> {
        let text = xml
            .to_unformatted_string()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let payload = zstd::encode_all(text.as_bytes(), self.level)
            .map_err(|e| StoreError::Compression(e.to_string()))?;
        document.put_fragment(name, payload);
        Ok(())
    }

    fn save(&self, document: &NativeDocument, sink: &mut dyn Write) -> StoreResult<()> {
        let data = self.encode(document)?;
        sink.write_all(&data)?;
        sink.flush()?;
        debug!(bytes = data.len(), fragments = document.fragments().len(), "encoded container");
        Ok(())
    }
}

/// Bounds-checked reader over the container body.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn varint(&mut self) -> StoreResult<u64> {
        let (value, consumed) = decode_varint(&self.data[self.pos..], self.pos as u64)?;
        self.pos += consumed;
        Ok(value)
    }

    fn u32(&mut self) -> StoreResult<u32> {
        let bytes = self.take(4)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        Ok(u32::from_be_bytes(buf))
    }

    fn take(&mut self, len: u64) -> StoreResult<&'a [u8]> {
        let remaining = (self.data.len() - self.pos) as u64;
        if len > remaining {
            return Err(StoreError::Corrupt {
                offset: self.pos as u64,
                reason: format!("need {len} bytes, {remaining} left"),
            });
        }
        let start = self.pos;
        self.pos += len as usize;
        Ok(&self.data[start..self.pos])
    }
}

/// Encode a u64 as a variable-length integer.
fn encode_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value > 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decode a variable-length integer. Returns (value, bytes_consumed).
fn decode_varint(data: &[u8], offset: u64) -> StoreResult<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0;
    for (i, &byte) in data.iter().enumerate() {
        value |= ((byte & 0x7F) as u64) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        if shift >= 64 {
            return Err(StoreError::Corrupt {
                offset,
                reason: "varint overflow".into(),
            });
        }
    }
    Err(StoreError::Corrupt {
        offset,
        reason: "truncated varint".into(),
    })
}
