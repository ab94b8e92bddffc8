//! List operations. A list is an ordered sequence of unnamed tags sharing
//! one element type. The type of a fresh list is unresolved and fixed by
//! the first insertion.

use super::{NbtTag, Payload};
use crate::error::{Error, Result};
use crate::Tag;

impl NbtTag {
    /// Append a tag to this list. The tag must be unnamed, detached and not
    /// an ancestor of the list, and must match the declared element type
    /// (or fix it, if still unresolved).
    pub fn push(&self, tag: NbtTag) -> Result<()> {
        self.admit_list_element(&tag)?;
        match &mut *self.payload_mut() {
            Payload::List(data) => data.items.push(tag.clone()),
            _ => return Err(Error::format("not a List tag")),
        }
        tag.set_parent(Some(self));
        Ok(())
    }

    /// Insert a tag at `index`, shifting later elements up. `index` may
    /// equal the length to append.
    pub fn insert(&self, index: usize, tag: NbtTag) -> Result<()> {
        // Bounds first, so a failed insert cannot have fixed the element
        // type as a side effect.
        match &*self.payload() {
            Payload::List(data) => {
                if index > data.items.len() {
                    return Err(Error::range(format!("index {} out of bounds", index)));
                }
            }
            _ => return Err(Error::format("not a List tag")),
        }
        self.admit_list_element(&tag)?;
        match &mut *self.payload_mut() {
            Payload::List(data) => data.items.insert(index, tag.clone()),
            _ => unreachable!("tag type checked above"),
        }
        tag.set_parent(Some(self));
        Ok(())
    }

    /// The element at `index`.
    pub fn at(&self, index: usize) -> Result<NbtTag> {
        match &*self.payload() {
            Payload::List(data) => data
                .items
                .get(index)
                .cloned()
                .ok_or_else(|| Error::range(format!("index {} out of bounds", index))),
            _ => Err(Error::format("not a List tag")),
        }
    }

    /// Remove and return the element at `index`, detaching it.
    pub fn remove_at(&self, index: usize) -> Result<NbtTag> {
        let tag = match &mut *self.payload_mut() {
            Payload::List(data) => {
                if index >= data.items.len() {
                    return Err(Error::range(format!("index {} out of bounds", index)));
                }
                data.items.remove(index)
            }
            _ => return Err(Error::format("not a List tag")),
        };
        tag.set_parent(None);
        Ok(tag)
    }

    /// Position of a tag (by identity) in this list.
    pub fn index_of(&self, tag: &NbtTag) -> Option<usize> {
        match &*self.payload() {
            Payload::List(data) => data.items.iter().position(|item| item.same(tag)),
            _ => None,
        }
    }

    /// Declared element type of a list. `Tag::Unknown` until the first
    /// element fixes it.
    pub fn list_type(&self) -> Option<Tag> {
        match &*self.payload() {
            Payload::List(data) => Some(data.elem),
            _ => None,
        }
    }

    /// Declare the element type. Allowed on an empty list with any code
    /// (`End` marks an empty list on the wire, `Unknown` resets it), or as
    /// a no-op matching the current element type.
    pub fn set_list_type(&self, elem: Tag) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::List(data) => {
                if data.items.is_empty() || data.elem == elem {
                    data.elem = elem;
                    Ok(())
                } else {
                    Err(Error::format(format!(
                        "cannot declare a list of {:?} holding {:?} elements",
                        elem, data.elem
                    )))
                }
            }
            _ => Err(Error::format("not a List tag")),
        }
    }

    fn admit_list_element(&self, tag: &NbtTag) -> Result<()> {
        self.check_admission(tag)?;
        if tag.name().is_some() {
            return Err(Error::format("members of a list are unnamed"));
        }
        let elem = tag.tag_type();
        match &mut *self.payload_mut() {
            Payload::List(data) => {
                if data.elem == Tag::Unknown {
                    data.elem = elem;
                    Ok(())
                } else if data.elem == elem {
                    Ok(())
                } else {
                    Err(Error::format(format!(
                        "list of {:?} cannot accept a {:?} element",
                        data.elem, elem
                    )))
                }
            }
            _ => Err(Error::format("not a List tag")),
        }
    }
}
