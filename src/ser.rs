//! Wire encoding: the inverse walk of [`crate::de`], writing
//! `type | name | payload` frames into a [`ByteStream`].

use std::convert::TryInto;

use crate::error::{Error, Result};
use crate::stream::ByteStream;
use crate::tag::{NbtTag, Payload};
use crate::Tag;

pub(crate) fn write_root(stream: &mut ByteStream, root: &NbtTag) -> Result<()> {
    if root.tag_type() != Tag::Compound {
        return Err(Error::no_root_compound());
    }
    let name = root
        .name()
        .ok_or_else(|| Error::format("root tag must be named"))?;
    stream.write_u8(Tag::Compound.into())?;
    stream.write_string(&name)?;
    write_payload(stream, root)
}

fn write_payload(stream: &mut ByteStream, tag: &NbtTag) -> Result<()> {
    match &*tag.payload() {
        Payload::Byte(v) => stream.write_i8(*v),
        Payload::Short(v) => stream.write_i16(*v),
        Payload::Int(v) => stream.write_i32(*v),
        Payload::Long(v) => stream.write_i64(*v),
        Payload::Float(v) => stream.write_f32(*v),
        Payload::Double(v) => stream.write_f64(*v),
        Payload::String(v) => stream.write_string(v),
        Payload::ByteArray(v) => {
            write_len(stream, v.len())?;
            let raw: Vec<u8> = v.iter().map(|b| *b as u8).collect();
            stream.write_bytes(&raw)
        }
        Payload::IntArray(v) => {
            write_len(stream, v.len())?;
            for value in v {
                stream.write_i32(*value)?;
            }
            Ok(())
        }
        Payload::LongArray(v) => {
            write_len(stream, v.len())?;
            for value in v {
                stream.write_i64(*value)?;
            }
            Ok(())
        }
        Payload::Compound(children) => {
            for child in children {
                let name = child
                    .name()
                    .ok_or_else(|| Error::format("members of a compound must be named"))?;
                stream.write_u8(child.tag_type().into())?;
                stream.write_string(&name)?;
                write_payload(stream, child)?;
            }
            stream.write_u8(Tag::End.into())
        }
        Payload::List(data) => {
            if data.elem == Tag::Unknown {
                return Err(Error::format(
                    "list element type is unresolved, set a type before saving",
                ));
            }
            stream.write_u8(data.elem.into())?;
            write_len(stream, data.items.len())?;
            for item in &data.items {
                write_payload(stream, item)?;
            }
            Ok(())
        }
    }
}

fn write_len(stream: &mut ByteStream, len: usize) -> Result<()> {
    let len: i32 = len
        .try_into()
        .map_err(|_| Error::format("len too large"))?;
    stream.write_i32(len)
}
