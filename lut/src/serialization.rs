// dimmer/lut/src/serialization.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The binary table format.
//!
//! A table is a bare sequence of 8-byte records, each four little-endian
//! `u16`s in the order R, G, B, pad. There is no header and no compression.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crate::error::LutError;
use crate::lut1d::Lut1D;
use crate::lut3d::Lut3D;
use crate::record::TableRecord;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

pub trait TableSerialize {
    fn write<W>(&self, writer: &mut W) -> io::Result<()> where W: Write;

    /// Writes the table to `path` so that the file either holds the complete
    /// table or is left as it was.
    fn write_to(&self, path: &Path) -> Result<(), LutError> {
        let temp_path = temporary_path(path);
        let result = write_file(&temp_path, |writer| self.write(writer))
            .and_then(|()| fs::rename(&temp_path, path));
        if let Err(error) = result {
            error!("Failed to write table to {}: {}", path.display(), error);
            drop(fs::remove_file(&temp_path));
            return Err(LutError::Io(error));
        }
        debug!("wrote table to {}", path.display());
        Ok(())
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![];
        // Writing into a `Vec` cannot fail.
        drop(self.write(&mut bytes));
        bytes
    }
}

impl TableSerialize for [TableRecord] {
    fn write<W>(&self, writer: &mut W) -> io::Result<()> where W: Write {
        for record in self {
            writer.write_u16::<LittleEndian>(record.r)?;
            writer.write_u16::<LittleEndian>(record.g)?;
            writer.write_u16::<LittleEndian>(record.b)?;
            writer.write_u16::<LittleEndian>(record.pad)?;
        }
        Ok(())
    }
}

impl TableSerialize for Lut1D {
    #[inline]
    fn write<W>(&self, writer: &mut W) -> io::Result<()> where W: Write {
        self.records().write(writer)
    }
}

impl TableSerialize for Lut3D {
    #[inline]
    fn write<W>(&self, writer: &mut W) -> io::Result<()> where W: Write {
        self.records().write(writer)
    }
}

/// Reads exactly `count` records and checks that nothing follows them.
pub fn read_records<R>(reader: &mut R, count: usize) -> Result<Vec<TableRecord>, LutError>
                       where R: Read {
    let mut bytes = vec![];
    reader.read_to_end(&mut bytes)?;
    let expected = count * TableRecord::SIZE;
    if bytes.len() != expected {
        return Err(LutError::UnexpectedSize { expected, actual: bytes.len() });
    }

    let mut cursor = &bytes[..];
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let r = cursor.read_u16::<LittleEndian>()?;
        let g = cursor.read_u16::<LittleEndian>()?;
        let b = cursor.read_u16::<LittleEndian>()?;
        let pad = cursor.read_u16::<LittleEndian>()?;
        records.push(TableRecord { r, g, b, pad });
    }
    Ok(records)
}

fn write_file<F>(path: &Path, body: F) -> io::Result<()>
                 where F: FnOnce(&mut BufWriter<File>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    body(&mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

// Unique per process, so concurrent writers never share a temporary file.
fn temporary_path(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().map(OsString::from).unwrap_or_default();
    file_name.push(format!(".{}.tmp", process::id()));
    path.with_file_name(file_name)
}

#[cfg(test)]
mod test {
    use super::{read_records, temporary_path, TableSerialize};
    use crate::error::LutError;
    use crate::lut1d::{Lut1D, LUT1D_SIZE};
    use crate::lut3d::{Lut3D, LUT3D_SIZE};
    use crate::record::TableRecord;
    use quickcheck;
    use std::fs;
    use std::path::Path;
    use tempfile;

    #[test]
    fn test_record_layout() {
        let bytes = [TableRecord::new(0x0102, 0xa0b0, 0xffff)].to_bytes();
        assert_eq!(bytes, vec![0x02, 0x01, 0xb0, 0xa0, 0xff, 0xff, 0x00, 0x00]);
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(Lut1D::generate(0.5).unwrap().to_bytes().len(), 32768);
        assert_eq!(Lut3D::identity().to_bytes().len(), 39304);
    }

    #[test]
    fn test_parse_back() {
        quickcheck::quickcheck(prop_parse_back as fn(u16) -> bool);

        fn prop_parse_back(level: u16) -> bool {
            let brightness = level as f64 / u16::MAX as f64;
            let lut1d = Lut1D::generate(brightness).unwrap();
            let lut3d = Lut3D::generate(brightness).unwrap();
            Lut1D::read_from(&mut &lut1d.to_bytes()[..]).unwrap() == lut1d &&
                Lut3D::read_from(&mut &lut3d.to_bytes()[..]).unwrap() == lut3d
        }
    }

    #[test]
    fn test_rejects_truncated_table() {
        let bytes = Lut1D::generate(1.0).unwrap().to_bytes();
        match read_records(&mut &bytes[..bytes.len() - 1], LUT1D_SIZE) {
            Err(LutError::UnexpectedSize { expected: 32768, actual: 32767 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match Lut3D::read_from(&mut &bytes[..]) {
            Err(LutError::UnexpectedSize { expected, .. }) => assert_eq!(expected, LUT3D_SIZE * 8),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_write_to_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dim.lut1d");
        fs::write(&path, b"stale").unwrap();

        let lut = Lut1D::generate(0.3).unwrap();
        lut.write_to(&path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), lut.to_bytes());
        assert!(!temporary_path(&path).exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dim.lut1d");
        let previous = Lut1D::generate(0.6).unwrap();
        previous.write_to(&path).unwrap();

        // A directory in the way of the temporary file makes the write fail.
        fs::create_dir(temporary_path(&path)).unwrap();
        match Lut1D::generate(0.1).unwrap().write_to(&path) {
            Err(LutError::Io(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        assert_eq!(fs::read(&path).unwrap(), previous.to_bytes());
        assert!(temporary_path(&path).is_dir());
    }

    #[test]
    fn test_temporary_path_is_a_sibling() {
        let path = Path::new("/run/dimmer/dim.lut3d");
        let temp_path = temporary_path(path);
        assert_eq!(temp_path.parent(), path.parent());
        assert_ne!(temp_path, path);
        assert!(temp_path.to_string_lossy().contains(&std::process::id().to_string()));
    }

    #[test]
    fn test_write_to_missing_directory_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dim.lut3d");
        match Lut3D::identity().write_to(&path) {
            Err(LutError::Io(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
