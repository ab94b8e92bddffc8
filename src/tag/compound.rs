//! Compound operations. A compound is an order-irrelevant collection of
//! named tags with unique names; insertion order is kept internally so a
//! decoded file writes back in the order it arrived.

use super::{NbtTag, Payload};
use crate::error::{Error, Result};

impl NbtTag {
    /// Move a tag into this compound. The tag must be named, detached, and
    /// not an ancestor of this compound, and its name must not collide with
    /// a sibling.
    pub fn add(&self, tag: NbtTag) -> Result<()> {
        let name = match tag.name() {
            Some(name) => name,
            None => return Err(Error::format("members of a compound must be named")),
        };
        self.check_admission(&tag)?;
        match &mut *self.payload_mut() {
            Payload::Compound(children) => {
                if children.iter().any(|child| child.name().as_deref() == Some(&*name)) {
                    return Err(Error::duplicate_name(&name));
                }
                children.push(tag.clone());
            }
            _ => return Err(Error::format("not a Compound tag")),
        }
        tag.set_parent(Some(self));
        Ok(())
    }

    /// Look up a member by name.
    pub fn get(&self, name: &str) -> Option<NbtTag> {
        match &*self.payload() {
            Payload::Compound(children) => children
                .iter()
                .find(|child| child.name().as_deref() == Some(name))
                .cloned(),
            _ => None,
        }
    }

    pub fn contains_name(&self, name: &str) -> bool {
        match &*self.payload() {
            Payload::Compound(children) => children
                .iter()
                .any(|child| child.name().as_deref() == Some(name)),
            _ => false,
        }
    }

    /// Whether this container holds exactly that tag (by identity, not by
    /// value).
    pub fn contains_tag(&self, tag: &NbtTag) -> bool {
        match &*self.payload() {
            Payload::Compound(children) => children.iter().any(|child| child.same(tag)),
            Payload::List(data) => data.items.iter().any(|item| item.same(tag)),
            _ => false,
        }
    }

    /// Remove a member by name, returning the now-detached tag.
    pub fn remove(&self, name: &str) -> Option<NbtTag> {
        let removed = match &mut *self.payload_mut() {
            Payload::Compound(children) => {
                let index = children
                    .iter()
                    .position(|child| child.name().as_deref() == Some(name))?;
                Some(children.remove(index))
            }
            _ => None,
        };
        if let Some(tag) = &removed {
            tag.set_parent(None);
        }
        removed
    }

    /// Remove a specific tag (by identity) from this compound or list.
    pub fn remove_tag(&self, tag: &NbtTag) -> bool {
        let removed = match &mut *self.payload_mut() {
            Payload::Compound(children) => {
                match children.iter().position(|child| child.same(tag)) {
                    Some(index) => Some(children.remove(index)),
                    None => None,
                }
            }
            Payload::List(data) => match data.items.iter().position(|item| item.same(tag)) {
                Some(index) => Some(data.items.remove(index)),
                None => None,
            },
            _ => None,
        };
        match removed {
            Some(tag) => {
                tag.set_parent(None);
                true
            }
            None => false,
        }
    }

    /// Rename the member `old` to `new`. No-op when the names are equal;
    /// fails when `old` is missing or `new` collides.
    pub fn rename_tag(&self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let tag = match &*self.payload() {
            Payload::Compound(children) => {
                if children.iter().any(|child| child.name().as_deref() == Some(new)) {
                    return Err(Error::duplicate_name(new));
                }
                children
                    .iter()
                    .find(|child| child.name().as_deref() == Some(old))
                    .cloned()
                    .ok_or_else(|| Error::format(format!("no tag named {:?}", old)))?
            }
            _ => return Err(Error::format("not a Compound tag")),
        };
        tag.node.borrow_mut().name = Some(new.to_owned());
        Ok(())
    }

    /// Detach every member of this compound or list.
    pub fn clear(&self) -> Result<()> {
        let children = match &mut *self.payload_mut() {
            Payload::Compound(children) => std::mem::take(children),
            Payload::List(data) => std::mem::take(&mut data.items),
            _ => return Err(Error::format("not a container tag")),
        };
        for child in children {
            child.set_parent(None);
        }
        Ok(())
    }

    /// The member names of a compound, in insertion order. Empty for any
    /// other tag type.
    pub fn names(&self) -> Vec<String> {
        match &*self.payload() {
            Payload::Compound(children) => {
                children.iter().filter_map(|child| child.name()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Snapshot of the children of this compound or list. Mutating the
    /// container afterwards does not affect the snapshot.
    pub fn tags(&self) -> Vec<NbtTag> {
        match &*self.payload() {
            Payload::Compound(children) => children.to_vec(),
            Payload::List(data) => data.items.to_vec(),
            _ => Vec::new(),
        }
    }

    /// Snapshot of `(name, tag)` pairs of a compound.
    pub fn entries(&self) -> Vec<(String, NbtTag)> {
        match &*self.payload() {
            Payload::Compound(children) => children
                .iter()
                .filter_map(|child| child.name().map(|name| (name, child.clone())))
                .collect(),
            _ => Vec::new(),
        }
    }
}
