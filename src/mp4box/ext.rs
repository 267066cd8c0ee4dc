use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{box_start, BoxHeader, BoxType, Mp4Box, Result, HEADER_SIZE};
use crate::tree::{BoxMeta, ParseContext};

/// A sample-entry extension box (`avcC`, `hvcC`, `esds`, `clap`, `pasp`,
/// `colr`, `btrt`, `stsl`, `chan`, `ftab`, ...) captured as an opaque
/// payload. Decoding codec-specific configuration bitstreams is out of
/// scope for this reader; callers that need `avcC`'s SPS/PPS or `esds`'s
/// ES descriptor can parse `payload` themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionBox {
    pub meta: BoxMeta,
    pub box_type: BoxType,

    #[serde(skip_serializing)]
    pub payload: Vec<u8>,
}

impl ExtensionBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + self.payload.len() as u64
    }
}

impl Mp4Box for ExtensionBox {
    fn box_type(&self) -> BoxType {
        self.box_type
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize extension box"))
    }

    fn summary(&self) -> Result<String> {
        Ok(format!("payload_len={}", self.payload.len()))
    }
}

/// Reads one child box under a sample entry as an [`ExtensionBox`], using
/// the already-consumed header so the real box type is recorded.
pub fn read_extension<R: Read + Seek>(
    reader: &mut R,
    header: BoxHeader,
    ctx: &mut ParseContext,
    depth: u32,
) -> Result<ExtensionBox> {
    let start = box_start(reader, &header)?;
    ctx.record_node(depth, header.name, start, header.size);
    let payload_len = header.size.saturating_sub(HEADER_SIZE);
    let mut payload = vec![0u8; payload_len as usize];
    reader.read_exact(&mut payload)?;

    Ok(ExtensionBox {
        meta: BoxMeta::new(start, header.size, header.name),
        box_type: header.name,
        payload,
    })
}
