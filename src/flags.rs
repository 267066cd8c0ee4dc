//! Bit-level packing for fragment sample flags and the `tfhd`/`trun` flag words.
//!
//! Grounded in ISO/IEC 14496-12 §8.8.3.1 (`sample_flags`) and §8.8.7/§8.8.8
//! (`tfhd`/`trun` optional-field flags), and in the field layout used by
//! `l-smash`'s `read.c` for the same boxes.

/// `tfhd` flag bits selecting which optional fields follow the track ID.
pub const TFHD_BASE_DATA_OFFSET_PRESENT: u32 = 0x00_0001;
pub const TFHD_SAMPLE_DESCRIPTION_INDEX_PRESENT: u32 = 0x00_0002;
pub const TFHD_DEFAULT_SAMPLE_DURATION_PRESENT: u32 = 0x00_0008;
pub const TFHD_DEFAULT_SAMPLE_SIZE_PRESENT: u32 = 0x00_0010;
pub const TFHD_DEFAULT_SAMPLE_FLAGS_PRESENT: u32 = 0x00_0020;
pub const TFHD_DURATION_IS_EMPTY: u32 = 0x01_0000;
pub const TFHD_DEFAULT_BASE_IS_MOOF: u32 = 0x02_0000;

/// `trun` flag bits selecting which optional fields are present.
pub const TRUN_DATA_OFFSET_PRESENT: u32 = 0x00_0001;
pub const TRUN_FIRST_SAMPLE_FLAGS_PRESENT: u32 = 0x00_0004;
pub const TRUN_SAMPLE_DURATION_PRESENT: u32 = 0x00_0100;
pub const TRUN_SAMPLE_SIZE_PRESENT: u32 = 0x00_0200;
pub const TRUN_SAMPLE_FLAGS_PRESENT: u32 = 0x00_0400;
pub const TRUN_SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT: u32 = 0x00_0800;

/// Decoded view of a packed 32-bit `sample_flags` word.
///
/// ```text
/// bits    field
/// 0-3     reserved
/// 4-5     is_leading
/// 6-7     sample_depends_on
/// 8-9     sample_is_depended_on
/// 10-11   sample_has_redundancy
/// 12-14   sample_padding_value
/// 15      sample_is_non_sync_sample
/// 16-31   sample_degradation_priority
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct SampleFlags {
    pub is_leading: u8,
    pub depends_on: u8,
    pub is_depended_on: u8,
    pub has_redundancy: u8,
    pub padding_value: u8,
    pub is_non_sync: bool,
    pub degradation_priority: u16,
}

impl SampleFlags {
    pub fn unpack(word: u32) -> Self {
        Self {
            is_leading: ((word >> 26) & 0x3) as u8,
            depends_on: ((word >> 24) & 0x3) as u8,
            is_depended_on: ((word >> 22) & 0x3) as u8,
            has_redundancy: ((word >> 20) & 0x3) as u8,
            padding_value: ((word >> 17) & 0x7) as u8,
            is_non_sync: (word >> 16) & 0x1 == 1,
            degradation_priority: (word & 0xffff) as u16,
        }
    }

    pub fn pack(&self) -> u32 {
        ((self.is_leading as u32 & 0x3) << 26)
            | ((self.depends_on as u32 & 0x3) << 24)
            | ((self.is_depended_on as u32 & 0x3) << 22)
            | ((self.has_redundancy as u32 & 0x3) << 20)
            | ((self.padding_value as u32 & 0x7) << 17)
            | (((self.is_non_sync as u32) & 0x1) << 16)
            | (self.degradation_priority as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_round_trip() {
        let flags = SampleFlags {
            is_leading: 1,
            depends_on: 2,
            is_depended_on: 1,
            has_redundancy: 3,
            padding_value: 5,
            is_non_sync: true,
            degradation_priority: 0x1234,
        };
        let packed = flags.pack();
        assert_eq!(SampleFlags::unpack(packed), flags);
    }

    #[test]
    fn sync_sample_is_all_zero() {
        let flags = SampleFlags::unpack(0);
        assert!(!flags.is_non_sync);
        assert_eq!(flags.depends_on, 0);
    }
}
