use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek};

use crate::mp4box::{box_start, BoxHeader, skip_bytes_to, BoxType, Mp4Box, ReadBox, Result, HEADER_SIZE};
use crate::tree::{BoxMeta, ParseContext};
use crate::types::FourCC;
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FtypBox {
    pub meta: BoxMeta,
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

impl FtypBox {
    pub fn get_size(&self) -> u64 {
        HEADER_SIZE + 8 + (4 * self.compatible_brands.len() as u64)
    }
}

impl Mp4Box for FtypBox {
    fn box_type(&self) -> BoxType {
        BoxType::FtypBox
    }

    fn box_size(&self) -> u64 {
        self.get_size()
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self).expect("serialize ftyp"))
    }

    fn summary(&self) -> Result<String> {
        let brands: Vec<String> = self.compatible_brands.iter().map(|b| b.to_string()).collect();
        Ok(format!(
            "major_brand={} minor_version={} compatible_brands={}",
            self.major_brand,
            self.minor_version,
            brands.join("-")
        ))
    }
}

impl<R: Read + Seek> ReadBox<&mut R> for FtypBox {
    fn read_box(reader: &mut R, header: BoxHeader, ctx: &mut ParseContext, depth: u32) -> Result<Self> {
        let size = header.size;
        let start = box_start(reader, &header)?;
        ctx.record_node(depth, BoxType::FtypBox, start, size);

        if size < 16 || size % 4 != 0 {
            return Err(Error::InvalidData("ftyp size too small or not aligned"));
        }
        let brand_count = (size - 16) / 4;
        let major_brand = FourCC::from(reader.read_u32::<BigEndian>()?);
        let minor_version = reader.read_u32::<BigEndian>()?;

        let mut compatible_brands = Vec::with_capacity(brand_count as usize);
        for _ in 0..brand_count {
            compatible_brands.push(FourCC::from(reader.read_u32::<BigEndian>()?));
        }

        skip_bytes_to(reader, start + size)?;

        Ok(Self {
            meta: BoxMeta::new(start, size, BoxType::FtypBox),
            major_brand,
            minor_version,
            compatible_brands,
        })
    }
}
