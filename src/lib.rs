//! nbtree is a mutable tag-tree library for NBT data as used by *Minecraft:
//! Java Edition*. Where a serde-based codec maps NBT straight onto your own
//! types, this crate materializes the data as a tree of named, typed tags
//! that can be inspected and rearranged before being written back out,
//! byte-exact, with optional gzip or zlib framing.
//!
//! * For loading and saving whole files see [`NbtFile`].
//! * For building and editing trees see [`NbtTag`].
//! * For the low-level byte buffer both codec halves run on see
//!   [`ByteStream`](stream::ByteStream).
//!
//! ```toml
//! [dependencies]
//! nbtree = "0.1"
//! ```
//!
//! # Quick example
//!
//! Load a player dat file, bump an invulnerability flag, and save it back
//! with the same compression it arrived with.
//!
//! ```no_run
//! use nbtree::{NbtFile, NbtTag};
//! use nbtree::error::Result;
//!
//! fn main() -> Result<()> {
//!     let mut file = NbtFile::from_path("player.dat")?;
//!
//!     let root = file.root();
//!     if let Some(abilities) = root.get("abilities") {
//!         abilities.remove("invulnerable");
//!         abilities.add(NbtTag::byte(1).named("invulnerable"))?;
//!     }
//!
//!     file.save_to_path("player.dat", None)?;
//!     Ok(())
//! }
//! ```
//!
//! # Trees, names and parents
//!
//! Tags are created detached. Inserting a tag into a compound or list moves
//! ownership into the container and records a weak back-reference used for
//! [`path`][NbtTag::path] queries and rename validation. A tag can only ever
//! sit in one container, names within a compound are unique, and lists only
//! accept elements of their declared type.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use once_cell::sync::Lazy;

pub mod error;
pub mod stream;

mod de;
mod file;
mod ser;
mod tag;

pub use file::{detect_compression, Compression, NbtFile};
pub use stream::Endian;
pub use tag::NbtTag;

#[cfg(test)]
mod test;

use std::convert::TryFrom;

/// An NBT tag type. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64.
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents an array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other tags, all of the same type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents an array of Int (i32).
    IntArray = 11,
    /// Represents an array of Long (i64).
    LongArray = 12,
    /// Placeholder element type of an empty list that has not resolved its
    /// type yet. Never written to or read from the wire.
    Unknown = 0xff,
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead write it out manually, the tags will very rarely
// change so isn't a massive burden, but saves a significant amount of
// compile time.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl Tag {
    /// The classic `TAG_*` spelling used by textual NBT dumps.
    pub fn wire_name(self) -> &'static str {
        match self {
            Tag::End => "TAG_End",
            Tag::Byte => "TAG_Byte",
            Tag::Short => "TAG_Short",
            Tag::Int => "TAG_Int",
            Tag::Long => "TAG_Long",
            Tag::Float => "TAG_Float",
            Tag::Double => "TAG_Double",
            Tag::ByteArray => "TAG_Byte_Array",
            Tag::String => "TAG_String",
            Tag::List => "TAG_List",
            Tag::Compound => "TAG_Compound",
            Tag::IntArray => "TAG_Int_Array",
            Tag::LongArray => "TAG_Long_Array",
            Tag::Unknown => "TAG_Unknown",
        }
    }
}

static DEFAULT_BIG_ENDIAN: AtomicBool = AtomicBool::new(true);

static DEFAULT_INDENT: Lazy<RwLock<String>> = Lazy::new(|| RwLock::new("  ".to_string()));

/// The endianness newly constructed [`NbtFile`]s and
/// [`ByteStream`](stream::ByteStream)s pick up. On-disk NBT is big-endian,
/// which is the initial value.
pub fn default_endian() -> Endian {
    if DEFAULT_BIG_ENDIAN.load(Ordering::Relaxed) {
        Endian::Big
    } else {
        Endian::Little
    }
}

/// Change the process-wide default endianness. Only consulted at
/// construction time; files and streams that already exist keep the
/// endianness they were built with. Constructions that start after this
/// call returns observe the new value.
pub fn set_default_endian(endian: Endian) {
    DEFAULT_BIG_ENDIAN.store(endian == Endian::Big, Ordering::Relaxed);
}

/// The indent string used by `Display` pretty printing. Two spaces
/// initially.
pub fn default_indent() -> String {
    DEFAULT_INDENT
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

/// Change the process-wide pretty-print indent. Mostly useful for tests and
/// dump tools.
pub fn set_default_indent(indent: impl Into<String>) {
    *DEFAULT_INDENT.write().unwrap_or_else(|e| e.into_inner()) = indent.into();
}
