//! ROM file loading.
//!
//! Accepts either a raw image or a zip archive; archives are detected by
//! their leading magic, not the file extension, and the first regular
//! entry inside is taken as the image. Reads are capped well above any
//! plausible cartridge so a mistyped path to a huge file cannot balloon
//! memory.

use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use log::info;

/// Upper bound on a loaded image, before and after extraction.
pub const MAX_ROM_SIZE: usize = 4 * 1024 * 1024;

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

#[derive(Debug)]
pub enum RomError {
    Io(std::io::Error),
    Zip(zip::result::ZipError),
    TooLarge { limit: usize },
    Empty,
    EmptyArchive,
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RomError::Io(err) => write!(f, "ROM read failed: {}", err),
            RomError::Zip(err) => write!(f, "ROM archive unreadable: {}", err),
            RomError::TooLarge { limit } => write!(f, "ROM exceeds the {} byte limit", limit),
            RomError::Empty => write!(f, "ROM file is empty"),
            RomError::EmptyArchive => write!(f, "archive contains no regular files"),
        }
    }
}

impl std::error::Error for RomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RomError::Io(err) => Some(err),
            RomError::Zip(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RomError {
    fn from(err: std::io::Error) -> Self {
        RomError::Io(err)
    }
}

impl From<zip::result::ZipError> for RomError {
    fn from(err: zip::result::ZipError) -> Self {
        RomError::Zip(err)
    }
}

/// Read a ROM image from disk, transparently unpacking zip archives.
pub fn read_rom_file(path: &Path) -> Result<Vec<u8>, RomError> {
    let file = File::open(path)?;
    let mut data = Vec::new();
    // Read one byte past the cap so oversized files are detectable
    // without trusting metadata.
    file.take(MAX_ROM_SIZE as u64 + 1).read_to_end(&mut data)?;
    if data.len() > MAX_ROM_SIZE {
        return Err(RomError::TooLarge {
            limit: MAX_ROM_SIZE,
        });
    }

    if data.starts_with(&ZIP_MAGIC) {
        return extract_first_entry(&data);
    }
    if data.is_empty() {
        return Err(RomError::Empty);
    }
    Ok(data)
}

fn extract_first_entry(data: &[u8]) -> Result<Vec<u8>, RomError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();

        let mut rom = Vec::new();
        entry.take(MAX_ROM_SIZE as u64 + 1).read_to_end(&mut rom)?;
        if rom.len() > MAX_ROM_SIZE {
            return Err(RomError::TooLarge {
                limit: MAX_ROM_SIZE,
            });
        }
        if rom.is_empty() {
            return Err(RomError::Empty);
        }
        info!("extracted \"{}\" from archive ({} bytes)", name, rom.len());
        return Ok(rom);
    }
    Err(RomError::EmptyArchive)
}
