//! Dumps the box tree of an MP4/ISOBMFF file in document order.
//!
//! Usage: `boxdump <path>` or `boxdump -` to read standard input.

use std::io::{self, Read};

use isobmff::{PrintEntry, Root};

fn main() -> io::Result<()> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: boxdump <path|->");
        std::process::exit(2);
    });

    let root = if path == "-" {
        let mut stdin = io::stdin();
        let mut buf = Vec::new();
        stdin.read_to_end(&mut buf)?;
        Root::read_stream(&buf[..], true)
    } else {
        Root::read(std::fs::File::open(&path)?, true)
    };

    let root = match root {
        Ok(root) => root,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    for entry in root.print_handlers() {
        let indent = "  ".repeat(entry.depth() as usize);
        match entry {
            PrintEntry::Node {
                box_type,
                pos,
                size,
                ..
            } => {
                println!("{indent}{box_type:?} pos={pos} size={size}");
            }
            PrintEntry::Unknown { unknown, .. } => {
                println!(
                    "{indent}[unknown {}] pos={} size={}",
                    unknown.fourcc, unknown.pos, unknown.size
                );
            }
            PrintEntry::Opaque { opaque, .. } => {
                println!(
                    "{indent}[opaque {:?}] pos={} size={}",
                    opaque.box_type, opaque.pos, opaque.size
                );
            }
        }
    }

    if let Some(ftyp) = &root.ftyp {
        println!("ftyp: {}", ftyp.summary().unwrap_or_default());
    }
    if let Some(moov) = &root.moov {
        println!("moov: {}", moov.summary().unwrap_or_default());
    }
    println!("moof count: {}", root.moofs.len());

    Ok(())
}
