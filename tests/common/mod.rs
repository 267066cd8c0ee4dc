//! Hand-built box byte-vectors for the end-to-end fixtures in `tests/`.
//!
//! Nothing here reads a sample file from disk: every fixture is assembled
//! byte-by-byte so the test suite has no external data dependency.

/// Wraps `body` in an ordinary (non-fullbox) box header: 4-byte big-endian
/// size (header-inclusive) followed by the 4CC.
pub fn bx(fourcc: &[u8; 4], body: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + body.len());
    let size = 8 + body.len() as u32;
    out.extend_from_slice(&size.to_be_bytes());
    out.extend_from_slice(fourcc);
    out.extend_from_slice(&body);
    out
}

/// A fullbox's leading 4-byte version+flags word.
pub fn ext(version: u8, flags: u32) -> Vec<u8> {
    let mut out = vec![version];
    out.extend_from_slice(&flags.to_be_bytes()[1..]);
    out
}

/// Concatenates a list of already-boxed children into one container body.
pub fn children(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.concat()
}

pub fn u32(v: u32) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

pub fn u16(v: u16) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

pub fn ftyp() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(b"isom"); // major_brand
    body.extend(u32(0)); // minor_version
    body.extend(b"isom"); // compatible_brands[0]
    bx(b"ftyp", body)
}

pub fn mdat(payload: &[u8]) -> Vec<u8> {
    bx(b"mdat", payload.to_vec())
}

pub fn mvhd(version: u8) -> Vec<u8> {
    let mut body = ext(version, 0);
    if version == 1 {
        body.extend(vec![0u8; 8]); // creation_time
        body.extend(vec![0u8; 8]); // modification_time
        body.extend(u32(1000)); // timescale
        body.extend(vec![0u8; 8]); // duration
    } else {
        body.extend(u32(0)); // creation_time
        body.extend(u32(0)); // modification_time
        body.extend(u32(1000)); // timescale
        body.extend(u32(0)); // duration
    }
    body.extend(u32(0x00010000)); // rate = 1.0
    body.extend(u16(0x0100)); // volume = 1.0
    body.extend(u16(0)); // reserved
    body.extend(vec![0u8; 8]); // reserved
    body.extend(u32(0x00010000)); // matrix: a
    body.extend(vec![0u8; 4 * 8]); // matrix: b..w (8 more i32 fields)
    body.extend(vec![0u8; 24]); // pre_defined
    body.extend(u32(2)); // next_track_id
    bx(b"mvhd", body)
}

pub fn tkhd(track_id: u32) -> Vec<u8> {
    let mut body = ext(0, 0x000001); // track enabled
    body.extend(u32(0)); // creation_time
    body.extend(u32(0)); // modification_time
    body.extend(u32(track_id));
    body.extend(u32(0)); // reserved
    body.extend(u32(0)); // duration
    body.extend(vec![0u8; 8]); // reserved
    body.extend(u16(0)); // layer
    body.extend(u16(0)); // alternate_group
    body.extend(u16(0)); // volume
    body.extend(u16(0)); // reserved
    body.extend(u32(0x00010000)); // matrix a
    body.extend(vec![0u8; 4 * 8]); // matrix b..w
    body.extend(u32(0)); // width
    body.extend(u32(0)); // height
    bx(b"tkhd", body)
}

pub fn mdhd() -> Vec<u8> {
    let mut body = ext(0, 0);
    body.extend(u32(0)); // creation_time
    body.extend(u32(0)); // modification_time
    body.extend(u32(1000)); // timescale
    body.extend(u32(0)); // duration
    body.extend(u16(0x55c4)); // language = "und"
    body.extend(u16(0)); // pre_defined
    bx(b"mdhd", body)
}

pub fn hdlr(handler_type: &[u8; 4], name: &str) -> Vec<u8> {
    let mut body = ext(0, 0);
    body.extend(u32(0)); // pre_defined
    body.extend(handler_type);
    body.extend(vec![0u8; 12]); // reserved
    body.extend(name.as_bytes());
    body.push(0); // NUL terminator
    bx(b"hdlr", body)
}

pub fn vmhd() -> Vec<u8> {
    let mut body = ext(0, 1);
    body.extend(u16(0)); // graphics_mode
    body.extend(u16(0)); // op_color.red
    body.extend(u16(0)); // op_color.green
    body.extend(u16(0)); // op_color.blue
    bx(b"vmhd", body)
}

pub fn dinf_empty() -> Vec<u8> {
    bx(b"dinf", Vec::new())
}

pub fn stsd_empty() -> Vec<u8> {
    let mut body = ext(0, 0);
    body.extend(u32(0)); // entry_count
    bx(b"stsd", body)
}

pub fn stts_empty() -> Vec<u8> {
    let mut body = ext(0, 0);
    body.extend(u32(0)); // entry_count
    bx(b"stts", body)
}

/// An `stts` whose declared `entry_count` cannot possibly fit the box's
/// own size: this exercises the overflow guard in `stts::read_box`.
pub fn stts_entry_count_lie() -> Vec<u8> {
    let mut body = ext(0, 0);
    body.extend(u32(u32::MAX)); // entry_count far exceeds what the box can hold
    bx(b"stts", body)
}

pub fn stsc_empty() -> Vec<u8> {
    let mut body = ext(0, 0);
    body.extend(u32(0)); // entry_count
    bx(b"stsc", body)
}

pub fn stbl(stts_box: Vec<u8>) -> Vec<u8> {
    bx(b"stbl", children(&[stsd_empty(), stts_box, stsc_empty()]))
}

pub fn minf(stbl_box: Vec<u8>) -> Vec<u8> {
    bx(b"minf", children(&[vmhd(), dinf_empty(), stbl_box]))
}

pub fn mdia(stbl_box: Vec<u8>) -> Vec<u8> {
    bx(
        b"mdia",
        children(&[mdhd(), hdlr(b"vide", "video handler"), minf(stbl_box)]),
    )
}

pub fn trak(track_id: u32) -> Vec<u8> {
    bx(
        b"trak",
        children(&[tkhd(track_id), mdia(stts_empty_table())]),
    )
}

fn stts_empty_table() -> Vec<u8> {
    stbl(stts_empty())
}

pub fn moov(traks: &[Vec<u8>]) -> Vec<u8> {
    let mut parts = vec![mvhd(0)];
    parts.extend(traks.iter().cloned());
    bx(b"moov", children(&parts))
}

pub fn mfhd(sequence_number: u32) -> Vec<u8> {
    let mut body = ext(0, 0);
    body.extend(u32(sequence_number));
    bx(b"mfhd", body)
}

pub fn tfhd(track_id: u32) -> Vec<u8> {
    let mut body = ext(0, 0);
    body.extend(u32(track_id));
    bx(b"tfhd", body)
}

pub fn tfdt(base_media_decode_time: u32) -> Vec<u8> {
    let mut body = ext(0, 0);
    body.extend(u32(base_media_decode_time));
    bx(b"tfdt", body)
}

/// A `trun` with `data-offset-present` and `sample-size-present` set,
/// carrying `sample_sizes.len()` samples.
pub fn trun(data_offset: i32, sample_sizes: &[u32]) -> Vec<u8> {
    let mut body = ext(0, 0x000201);
    body.extend(u32(sample_sizes.len() as u32));
    body.extend(data_offset.to_be_bytes());
    for size in sample_sizes {
        body.extend(u32(*size));
    }
    bx(b"trun", body)
}

pub fn traf(track_id: u32, base_time: u32, sample_sizes: &[u32]) -> Vec<u8> {
    bx(
        b"traf",
        children(&[
            tfhd(track_id),
            tfdt(base_time),
            trun(0, sample_sizes),
        ]),
    )
}

pub fn moof(sequence_number: u32, trafs: &[Vec<u8>]) -> Vec<u8> {
    let mut parts = vec![mfhd(sequence_number)];
    parts.extend(trafs.iter().cloned());
    bx(b"moof", children(&parts))
}
