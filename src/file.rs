//! Whole-file handling: compression auto-detection, gzip/zlib framing,
//! and load/save against byte buffers or filesystem paths.

use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::{GzEncoder, ZlibEncoder};
use flate2::write::{GzDecoder, ZlibDecoder};

use crate::de::{self, Filter};
use crate::error::{Error, Result};
use crate::ser;
use crate::stream::{ByteStream, Endian};
use crate::tag::NbtTag;
use crate::Tag;

/// Compression framing of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Infer the framing from the first byte of the input. Only meaningful
    /// when loading; saving with it is an error.
    AutoDetect,
    None,
    Gzip,
    Zlib,
}

/// Infer the compression framing from the first byte of `data`: a Compound
/// tag code means bare NBT, the gzip and zlib magic bytes mean their
/// framings, anything else is unrecognisable.
pub fn detect_compression(data: &[u8]) -> Result<Compression> {
    match data.first() {
        Some(0x0a) => Ok(Compression::None),
        Some(0x1f) => Ok(Compression::Gzip),
        Some(0x78) => Ok(Compression::Zlib),
        _ => Err(Error::format("cannot auto-detect compression")),
    }
}

/// An NBT file: a named root compound plus the endianness and compression
/// it moves through the wire with.
///
/// ```
/// use nbtree::{Compression, NbtFile, NbtTag};
///
/// let mut file = NbtFile::new();
/// file.root().set_name("hello world").unwrap();
/// file.root().add(NbtTag::string("Bananrama").named("name")).unwrap();
///
/// let bytes = file.save_to_bytes(Some(Compression::None)).unwrap();
/// let back = NbtFile::from_bytes(&bytes).unwrap();
/// assert_eq!(back.root(), file.root());
/// ```
pub struct NbtFile {
    root: NbtTag,
    endian: Endian,
    compression: Option<Compression>,
}

impl NbtFile {
    /// An empty file: a root compound named `""`, the process-default
    /// endianness, and no compression used yet (saving defaults to gzip).
    pub fn new() -> Self {
        Self::with_endian(crate::default_endian())
    }

    /// An empty file with an explicit endianness.
    pub fn with_endian(endian: Endian) -> Self {
        NbtFile {
            root: NbtTag::compound().named(""),
            endian,
            compression: None,
        }
    }

    /// A file around an existing root, which must be a named, detached
    /// compound.
    pub fn with_root(root: NbtTag) -> Result<Self> {
        let mut file = Self::new();
        file.set_root(root)?;
        Ok(file)
    }

    /// Load a file from bytes, auto-detecting compression.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut file = Self::new();
        file.load_bytes(data, Compression::AutoDetect)?;
        Ok(file)
    }

    /// Load a file from a filesystem path, auto-detecting compression.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = Self::new();
        file.load_path(path, Compression::AutoDetect)?;
        Ok(file)
    }

    /// The root compound. The returned handle aliases the file's own root,
    /// so edits through it are edits of the file.
    pub fn root(&self) -> NbtTag {
        self.root.clone()
    }

    /// Replace the root. The new root must be a named, detached compound.
    pub fn set_root(&mut self, root: NbtTag) -> Result<()> {
        if root.tag_type() != Tag::Compound {
            return Err(Error::no_root_compound());
        }
        if root.name().is_none() {
            return Err(Error::format("root tag must be named"));
        }
        if root.parent().is_some() {
            return Err(Error::format("root tag must be detached"));
        }
        self.root = root;
        Ok(())
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// The compression the file was last loaded or saved with, if any.
    pub fn compression(&self) -> Option<Compression> {
        self.compression
    }

    /// Decode `data` into this file, replacing the root.
    pub fn load_bytes(&mut self, data: &[u8], compression: Compression) -> Result<()> {
        self.load(data, compression, None)
    }

    /// Like [`load_bytes`][Self::load_bytes], with a predicate consulted
    /// after each tag (and everything under it) is decoded. Tags the
    /// predicate rejects are dropped; the rest of the input still parses.
    pub fn load_bytes_filtered(
        &mut self,
        data: &[u8],
        compression: Compression,
        mut filter: impl FnMut(&NbtTag) -> bool,
    ) -> Result<()> {
        self.load(data, compression, Some(&mut filter))
    }

    /// Read a whole file from `path` and decode it.
    pub fn load_path(&mut self, path: impl AsRef<Path>, compression: Compression) -> Result<()> {
        let data = fs::read(path)?;
        self.load_bytes(&data, compression)
    }

    pub fn load_path_filtered(
        &mut self,
        path: impl AsRef<Path>,
        compression: Compression,
        mut filter: impl FnMut(&NbtTag) -> bool,
    ) -> Result<()> {
        let data = fs::read(path)?;
        self.load(&data, compression, Some(&mut filter))
    }

    fn load(
        &mut self,
        data: &[u8],
        compression: Compression,
        filter: Option<Filter<'_>>,
    ) -> Result<()> {
        let compression = match compression {
            Compression::AutoDetect => detect_compression(data)?,
            explicit => explicit,
        };
        let plain = decompress(data, compression)?;
        let mut stream = ByteStream::from_vec(plain);
        stream.set_endian(self.endian);
        self.root = de::read_root(&mut stream, filter)?;
        self.compression = Some(compression);
        Ok(())
    }

    /// Encode the file. `None` falls back to the compression last used by a
    /// load or save, and to gzip for a fresh file. Passing
    /// `Some(Compression::AutoDetect)` is an error.
    pub fn save_to_bytes(&mut self, compression: Option<Compression>) -> Result<Vec<u8>> {
        let compression = match compression {
            Some(Compression::AutoDetect) => {
                return Err(Error::range("cannot save with auto-detect compression"))
            }
            Some(explicit) => explicit,
            None => self.compression.unwrap_or(Compression::Gzip),
        };
        let mut stream = ByteStream::with_endian(self.endian);
        ser::write_root(&mut stream, &self.root)?;
        let out = compress(&stream.into_vec(), compression)?;
        self.compression = Some(compression);
        Ok(out)
    }

    /// Encode the file and write it to `path` in one call.
    pub fn save_to_path(
        &mut self,
        path: impl AsRef<Path>,
        compression: Option<Compression>,
    ) -> Result<()> {
        let bytes = self.save_to_bytes(compression)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

impl Default for NbtFile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NbtFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

fn decompress(data: &[u8], compression: Compression) -> Result<Vec<u8>> {
    match compression {
        Compression::None => Ok(data.to_vec()),
        Compression::Gzip => {
            let mut decoder = GzDecoder::new(vec![]);
            decoder.write_all(data)?;
            Ok(decoder.finish()?)
        }
        Compression::Zlib => {
            let mut decoder = ZlibDecoder::new(vec![]);
            decoder.write_all(data)?;
            Ok(decoder.finish()?)
        }
        Compression::AutoDetect => Err(Error::invalid_reader_state(
            "compression must be resolved before decompressing",
        )),
    }
}

fn compress(data: &[u8], compression: Compression) -> Result<Vec<u8>> {
    match compression {
        Compression::None => Ok(data.to_vec()),
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(data, flate2::Compression::default());
            let mut out = vec![];
            encoder.read_to_end(&mut out)?;
            Ok(out)
        }
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(data, flate2::Compression::default());
            let mut out = vec![];
            encoder.read_to_end(&mut out)?;
            Ok(out)
        }
        Compression::AutoDetect => Err(Error::invalid_reader_state(
            "compression must be resolved before compressing",
        )),
    }
}
