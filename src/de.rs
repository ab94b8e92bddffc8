//! Wire decoding: drives a [`ByteStream`] through the recursive NBT
//! grammar and builds the tag tree, parent links included. Decode errors
//! are fatal, no partial tree escapes.

use std::convert::TryFrom;

use crate::error::{Error, Result};
use crate::stream::ByteStream;
use crate::tag::NbtTag;
use crate::Tag;

/// Predicate consulted after each non-root tag is fully decoded. Returning
/// false discards the tag; the stream has already advanced past it.
pub(crate) type Filter<'a> = &'a mut dyn FnMut(&NbtTag) -> bool;

pub(crate) fn read_root(stream: &mut ByteStream, mut filter: Option<Filter<'_>>) -> Result<NbtTag> {
    let code = stream.read_u8()?;
    if code != u8::from(Tag::Compound) {
        return Err(Error::no_root_compound());
    }
    let name = stream.read_string()?;
    let root = NbtTag::compound().named(name);
    read_compound_children(stream, &root, &mut filter)?;
    Ok(root)
}

fn read_compound_children(
    stream: &mut ByteStream,
    parent: &NbtTag,
    filter: &mut Option<Filter<'_>>,
) -> Result<()> {
    loop {
        let code = stream.read_u8()?;
        if code == u8::from(Tag::End) {
            return Ok(());
        }
        let tag = u8_to_tag(code)?;
        let name = stream.read_string()?;
        let child = read_payload(stream, tag, filter)?;
        child.set_name(&name)?;
        if keep(filter, &child) {
            parent.add(child)?;
        }
    }
}

fn read_payload(
    stream: &mut ByteStream,
    tag: Tag,
    filter: &mut Option<Filter<'_>>,
) -> Result<NbtTag> {
    match tag {
        Tag::Byte => Ok(NbtTag::byte(stream.read_i8()?)),
        Tag::Short => Ok(NbtTag::short(stream.read_i16()?)),
        Tag::Int => Ok(NbtTag::int(stream.read_i32()?)),
        Tag::Long => Ok(NbtTag::long(stream.read_i64()?)),
        Tag::Float => Ok(NbtTag::float_raw(stream.read_f32()?)),
        Tag::Double => Ok(NbtTag::double_raw(stream.read_f64()?)),
        Tag::String => Ok(NbtTag::string(stream.read_string()?)),
        Tag::ByteArray => {
            let len = read_len(stream)?;
            let raw = stream.read_bytes(len);
            if raw.len() < len {
                return Err(Error::eof());
            }
            Ok(NbtTag::byte_array(raw.into_iter().map(|b| b as i8).collect()))
        }
        Tag::IntArray => {
            let len = read_len(stream)?;
            let mut values = Vec::with_capacity(len.min(stream.remaining() / 4));
            for _ in 0..len {
                values.push(stream.read_i32()?);
            }
            Ok(NbtTag::int_array(values))
        }
        Tag::LongArray => {
            let len = read_len(stream)?;
            let mut values = Vec::with_capacity(len.min(stream.remaining() / 8));
            for _ in 0..len {
                values.push(stream.read_i64()?);
            }
            Ok(NbtTag::long_array(values))
        }
        Tag::Compound => {
            let compound = NbtTag::compound();
            read_compound_children(stream, &compound, filter)?;
            Ok(compound)
        }
        Tag::List => {
            let elem = u8_to_tag(stream.read_u8()?)?;
            let len = read_len(stream)?;
            if elem == Tag::End && len > 0 {
                return Err(Error::format("non-empty list of End tags"));
            }
            // An empty list legally carries End as its declared type; it is
            // kept so the list writes back out unchanged.
            let list = NbtTag::list_of(elem);
            for _ in 0..len {
                let item = read_payload(stream, elem, filter)?;
                if keep(filter, &item) {
                    list.push(item)?;
                }
            }
            Ok(list)
        }
        Tag::End | Tag::Unknown => {
            Err(Error::invalid_reader_state("no payload to read for this tag"))
        }
    }
}

fn read_len(stream: &mut ByteStream) -> Result<usize> {
    let len = stream.read_i32()?;
    if len < 0 {
        return Err(Error::negative_length(len));
    }
    Ok(len as usize)
}

fn keep(filter: &mut Option<Filter<'_>>, tag: &NbtTag) -> bool {
    match filter {
        Some(f) => f(tag),
        None => true,
    }
}

fn u8_to_tag(tag: u8) -> Result<Tag> {
    Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
}
