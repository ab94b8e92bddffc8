//! The tag tree. [`NbtTag`] is a handle to a node carrying an optional
//! name, a payload, and a weak back-reference to the container holding it.
//! Ownership runs strictly downward; the parent edge exists only for path
//! queries and rename validation.

mod compound;
mod list;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::Tag;

pub(crate) struct Node {
    name: Option<String>,
    parent: Weak<RefCell<Node>>,
    payload: Payload,
}

#[derive(Debug)]
pub(crate) enum Payload {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(ListData),
    Compound(Vec<NbtTag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

#[derive(Debug)]
pub(crate) struct ListData {
    pub(crate) elem: Tag,
    pub(crate) items: Vec<NbtTag>,
}

impl Payload {
    pub(crate) fn tag_type(&self) -> Tag {
        match self {
            Payload::Byte(_) => Tag::Byte,
            Payload::Short(_) => Tag::Short,
            Payload::Int(_) => Tag::Int,
            Payload::Long(_) => Tag::Long,
            Payload::Float(_) => Tag::Float,
            Payload::Double(_) => Tag::Double,
            Payload::ByteArray(_) => Tag::ByteArray,
            Payload::String(_) => Tag::String,
            Payload::List(_) => Tag::List,
            Payload::Compound(_) => Tag::Compound,
            Payload::IntArray(_) => Tag::IntArray,
            Payload::LongArray(_) => Tag::LongArray,
        }
    }
}

/// A tag in an NBT tree.
///
/// `NbtTag` is a cheap handle: `Clone` aliases the same underlying node, so
/// a tag fetched out of a compound and the compound's own child are one and
/// the same. A structural copy is made with [`deep_clone`][Self::deep_clone],
/// and [`same`][Self::same] tells handles to one node apart from equal but
/// distinct trees.
///
/// Tags are created detached via the named constructors and moved into
/// containers with the compound/list operations:
///
/// ```
/// use nbtree::NbtTag;
///
/// let root = NbtTag::compound().named("root");
/// root.add(NbtTag::int(7).named("data-version")).unwrap();
///
/// let list = NbtTag::list().named("positions");
/// list.push(NbtTag::double(12.5)).unwrap();
/// root.add(list).unwrap();
///
/// assert_eq!(root.get("positions").unwrap().len(), Some(1));
/// ```
pub struct NbtTag {
    node: Rc<RefCell<Node>>,
}

impl Clone for NbtTag {
    /// Aliases the same node. See [`deep_clone`][Self::deep_clone] for a
    /// structural copy.
    fn clone(&self) -> Self {
        NbtTag {
            node: Rc::clone(&self.node),
        }
    }
}

impl NbtTag {
    pub(crate) fn from_payload(payload: Payload) -> Self {
        NbtTag {
            node: Rc::new(RefCell::new(Node {
                name: None,
                parent: Weak::new(),
                payload,
            })),
        }
    }

    pub fn byte(value: i8) -> Self {
        Self::from_payload(Payload::Byte(value))
    }

    pub fn short(value: i16) -> Self {
        Self::from_payload(Payload::Short(value))
    }

    pub fn int(value: i32) -> Self {
        Self::from_payload(Payload::Int(value))
    }

    pub fn long(value: i64) -> Self {
        Self::from_payload(Payload::Long(value))
    }

    /// A Float tag. The value is normalized to 7 significant digits, the
    /// precision the format guarantees for floats.
    pub fn float(value: f32) -> Self {
        Self::from_payload(Payload::Float(normalize_f32(value)))
    }

    /// A Double tag. The value is normalized to 15 significant digits.
    pub fn double(value: f64) -> Self {
        Self::from_payload(Payload::Double(normalize_f64(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::from_payload(Payload::String(value.into()))
    }

    pub fn byte_array(values: Vec<i8>) -> Self {
        Self::from_payload(Payload::ByteArray(values))
    }

    /// A ByteArray tag of `len` zeroed elements.
    pub fn byte_array_with_len(len: usize) -> Self {
        Self::from_payload(Payload::ByteArray(vec![0; len]))
    }

    pub fn int_array(values: Vec<i32>) -> Self {
        Self::from_payload(Payload::IntArray(values))
    }

    pub fn int_array_with_len(len: usize) -> Self {
        Self::from_payload(Payload::IntArray(vec![0; len]))
    }

    pub fn long_array(values: Vec<i64>) -> Self {
        Self::from_payload(Payload::LongArray(values))
    }

    pub fn long_array_with_len(len: usize) -> Self {
        Self::from_payload(Payload::LongArray(vec![0; len]))
    }

    /// An empty List tag with an unresolved element type. The first element
    /// pushed fixes the type; serializing before then fails.
    pub fn list() -> Self {
        Self::from_payload(Payload::List(ListData {
            elem: Tag::Unknown,
            items: Vec::new(),
        }))
    }

    /// An empty List tag with a declared element type.
    pub fn list_of(elem: Tag) -> Self {
        Self::from_payload(Payload::List(ListData {
            elem,
            items: Vec::new(),
        }))
    }

    /// An empty Compound tag.
    pub fn compound() -> Self {
        Self::from_payload(Payload::Compound(Vec::new()))
    }

    // Decoded values skip assignment normalization so foreign files
    // re-encode bit-exact.
    pub(crate) fn float_raw(value: f32) -> Self {
        Self::from_payload(Payload::Float(value))
    }

    pub(crate) fn double_raw(value: f64) -> Self {
        Self::from_payload(Payload::Double(value))
    }

    /// Name this tag, builder-style.
    ///
    /// # Panics
    ///
    /// Panics if the tag already sits in a container; rename attached tags
    /// through [`set_name`][Self::set_name] so collisions surface as
    /// errors.
    pub fn named(self, name: impl Into<String>) -> Self {
        if self.parent().is_some() {
            panic!("named() on an attached tag, use set_name");
        }
        self.node.borrow_mut().name = Some(name.into());
        self
    }

    /// The wire type of this tag.
    pub fn tag_type(&self) -> Tag {
        self.node.borrow().payload.tag_type()
    }

    pub fn name(&self) -> Option<String> {
        self.node.borrow().name.clone()
    }

    /// Rename this tag. For a compound member the rename is atomic: a
    /// collision with a sibling fails and the old name stays. Members of a
    /// list cannot be named.
    pub fn set_name(&self, name: &str) -> Result<()> {
        match self.parent() {
            Some(parent) if parent.tag_type() == Tag::Compound => {
                if self.node.borrow().name.as_deref() == Some(name) {
                    return Ok(());
                }
                if parent.contains_name(name) {
                    return Err(Error::duplicate_name(name));
                }
            }
            Some(_) => return Err(Error::format("members of a list are unnamed")),
            None => {}
        }
        self.node.borrow_mut().name = Some(name.to_owned());
        Ok(())
    }

    /// Remove this tag's name. Fails for a compound member, which must stay
    /// named.
    pub fn clear_name(&self) -> Result<()> {
        if let Some(parent) = self.parent() {
            if parent.tag_type() == Tag::Compound {
                return Err(Error::format("members of a compound must be named"));
            }
        }
        self.node.borrow_mut().name = None;
        Ok(())
    }

    /// The container this tag sits in, if any.
    pub fn parent(&self) -> Option<NbtTag> {
        self.node.borrow().parent.upgrade().map(|node| NbtTag { node })
    }

    /// Whether two handles alias the same node.
    pub fn same(&self, other: &NbtTag) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Dotted path of this tag from its root: `root.child` for compound
    /// descent, `root.child[3]` for a list element. A detached tag's path
    /// is its name, or the empty string when unnamed.
    pub fn path(&self) -> String {
        match self.parent() {
            None => self.name().unwrap_or_default(),
            Some(parent) => {
                if parent.tag_type() == Tag::List {
                    let index = parent.index_of(self).unwrap_or(0);
                    format!("{}[{}]", parent.path(), index)
                } else {
                    format!("{}.{}", parent.path(), self.name().unwrap_or_default())
                }
            }
        }
    }

    /// A structural copy of this tag and everything under it, detached from
    /// any parent.
    pub fn deep_clone(&self) -> NbtTag {
        let node = self.node.borrow();
        let payload = match &node.payload {
            Payload::Byte(v) => Payload::Byte(*v),
            Payload::Short(v) => Payload::Short(*v),
            Payload::Int(v) => Payload::Int(*v),
            Payload::Long(v) => Payload::Long(*v),
            Payload::Float(v) => Payload::Float(*v),
            Payload::Double(v) => Payload::Double(*v),
            Payload::ByteArray(v) => Payload::ByteArray(v.clone()),
            Payload::String(v) => Payload::String(v.clone()),
            Payload::IntArray(v) => Payload::IntArray(v.clone()),
            Payload::LongArray(v) => Payload::LongArray(v.clone()),
            Payload::List(data) => Payload::List(ListData {
                elem: data.elem,
                items: data.items.iter().map(NbtTag::deep_clone).collect(),
            }),
            Payload::Compound(children) => {
                Payload::Compound(children.iter().map(NbtTag::deep_clone).collect())
            }
        };
        let copy = NbtTag::from_payload(payload);
        copy.node.borrow_mut().name = node.name.clone();
        copy.adopt_children();
        copy
    }

    /// Point the children of a freshly built container at it.
    fn adopt_children(&self) {
        let node = self.node.borrow();
        let children: Vec<NbtTag> = match &node.payload {
            Payload::List(data) => data.items.to_vec(),
            Payload::Compound(children) => children.to_vec(),
            _ => return,
        };
        drop(node);
        for child in children {
            child.node.borrow_mut().parent = Rc::downgrade(&self.node);
        }
    }

    pub(crate) fn set_parent(&self, parent: Option<&NbtTag>) {
        self.node.borrow_mut().parent = match parent {
            Some(parent) => Rc::downgrade(&parent.node),
            None => Weak::new(),
        };
    }

    /// Whether this tag appears on `other`'s parent chain.
    pub(crate) fn is_ancestor_of(&self, other: &NbtTag) -> bool {
        let mut current = other.parent();
        while let Some(tag) = current {
            if self.same(&tag) {
                return true;
            }
            current = tag.parent();
        }
        false
    }

    /// Checks shared by both containers: a tag being inserted must be
    /// detached and must not introduce a cycle.
    pub(crate) fn check_admission(&self, tag: &NbtTag) -> Result<()> {
        if tag.same(self) {
            return Err(Error::format("cannot insert a tag into itself"));
        }
        if tag.parent().is_some() {
            return Err(Error::format("tag already belongs to a container"));
        }
        if tag.is_ancestor_of(self) {
            return Err(Error::format("tag is an ancestor of this container"));
        }
        Ok(())
    }

    pub(crate) fn payload(&self) -> Ref<'_, Payload> {
        Ref::map(self.node.borrow(), |node| &node.payload)
    }

    pub(crate) fn payload_mut(&self) -> RefMut<'_, Payload> {
        RefMut::map(self.node.borrow_mut(), |node| &mut node.payload)
    }

    pub fn as_byte(&self) -> Option<i8> {
        match *self.payload() {
            Payload::Byte(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match *self.payload() {
            Payload::Short(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match *self.payload() {
            Payload::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match *self.payload() {
            Payload::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self.payload() {
            Payload::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match *self.payload() {
            Payload::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the text of a String tag.
    pub fn as_str(&self) -> Option<Ref<'_, str>> {
        Ref::filter_map(self.payload(), |payload| match payload {
            Payload::String(s) => Some(s.as_str()),
            _ => None,
        })
        .ok()
    }

    pub fn byte_array_values(&self) -> Option<Ref<'_, [i8]>> {
        Ref::filter_map(self.payload(), |payload| match payload {
            Payload::ByteArray(v) => Some(v.as_slice()),
            _ => None,
        })
        .ok()
    }

    pub fn int_array_values(&self) -> Option<Ref<'_, [i32]>> {
        Ref::filter_map(self.payload(), |payload| match payload {
            Payload::IntArray(v) => Some(v.as_slice()),
            _ => None,
        })
        .ok()
    }

    pub fn long_array_values(&self) -> Option<Ref<'_, [i64]>> {
        Ref::filter_map(self.payload(), |payload| match payload {
            Payload::LongArray(v) => Some(v.as_slice()),
            _ => None,
        })
        .ok()
    }

    /// Mutably borrow the elements of a ByteArray tag.
    pub fn byte_array_values_mut(&self) -> Option<RefMut<'_, Vec<i8>>> {
        RefMut::filter_map(self.payload_mut(), |payload| match payload {
            Payload::ByteArray(v) => Some(v),
            _ => None,
        })
        .ok()
    }

    pub fn int_array_values_mut(&self) -> Option<RefMut<'_, Vec<i32>>> {
        RefMut::filter_map(self.payload_mut(), |payload| match payload {
            Payload::IntArray(v) => Some(v),
            _ => None,
        })
        .ok()
    }

    pub fn long_array_values_mut(&self) -> Option<RefMut<'_, Vec<i64>>> {
        RefMut::filter_map(self.payload_mut(), |payload| match payload {
            Payload::LongArray(v) => Some(v),
            _ => None,
        })
        .ok()
    }

    pub fn set_byte(&self, value: i8) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::Byte(v) => {
                *v = value;
                Ok(())
            }
            _ => Err(Error::format("not a Byte tag")),
        }
    }

    pub fn set_short(&self, value: i16) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::Short(v) => {
                *v = value;
                Ok(())
            }
            _ => Err(Error::format("not a Short tag")),
        }
    }

    pub fn set_int(&self, value: i32) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::Int(v) => {
                *v = value;
                Ok(())
            }
            _ => Err(Error::format("not an Int tag")),
        }
    }

    pub fn set_long(&self, value: i64) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::Long(v) => {
                *v = value;
                Ok(())
            }
            _ => Err(Error::format("not a Long tag")),
        }
    }

    /// Assign a Float tag's value, normalized to 7 significant digits.
    pub fn set_float(&self, value: f32) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::Float(v) => {
                *v = normalize_f32(value);
                Ok(())
            }
            _ => Err(Error::format("not a Float tag")),
        }
    }

    /// Assign a Double tag's value, normalized to 15 significant digits.
    pub fn set_double(&self, value: f64) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::Double(v) => {
                *v = normalize_f64(value);
                Ok(())
            }
            _ => Err(Error::format("not a Double tag")),
        }
    }

    pub fn set_string(&self, value: impl Into<String>) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::String(v) => {
                *v = value.into();
                Ok(())
            }
            _ => Err(Error::format("not a String tag")),
        }
    }

    pub fn set_byte_array(&self, values: Vec<i8>) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::ByteArray(v) => {
                *v = values;
                Ok(())
            }
            _ => Err(Error::format("not a ByteArray tag")),
        }
    }

    pub fn set_int_array(&self, values: Vec<i32>) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::IntArray(v) => {
                *v = values;
                Ok(())
            }
            _ => Err(Error::format("not an IntArray tag")),
        }
    }

    pub fn set_long_array(&self, values: Vec<i64>) -> Result<()> {
        match &mut *self.payload_mut() {
            Payload::LongArray(v) => {
                *v = values;
                Ok(())
            }
            _ => Err(Error::format("not a LongArray tag")),
        }
    }

    /// Element, entry or byte count of this tag: children for containers,
    /// elements for arrays, bytes for strings. `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match &*self.payload() {
            Payload::Compound(children) => Some(children.len()),
            Payload::List(data) => Some(data.items.len()),
            Payload::ByteArray(v) => Some(v.len()),
            Payload::IntArray(v) => Some(v.len()),
            Payload::LongArray(v) => Some(v.len()),
            Payload::String(s) => Some(s.len()),
            _ => None,
        }
    }

    /// Render the tree in the classic `TAG_*` dump format with an explicit
    /// indent string.
    pub fn pretty(&self, indent: &str) -> String {
        let mut out = String::new();
        self.pretty_into(&mut out, indent, 0);
        out
    }

    fn pretty_into(&self, out: &mut String, indent: &str, level: usize) {
        for _ in 0..level {
            out.push_str(indent);
        }
        let node = self.node.borrow();
        out.push_str(node.payload.tag_type().wire_name());
        if let Some(name) = &node.name {
            out.push_str(&format!("({:?})", name));
        }
        out.push_str(": ");
        match &node.payload {
            Payload::Byte(v) => out.push_str(&v.to_string()),
            Payload::Short(v) => out.push_str(&v.to_string()),
            Payload::Int(v) => out.push_str(&v.to_string()),
            Payload::Long(v) => out.push_str(&v.to_string()),
            Payload::Float(v) => out.push_str(&v.to_string()),
            Payload::Double(v) => out.push_str(&v.to_string()),
            Payload::String(v) => out.push_str(v),
            Payload::ByteArray(v) => out.push_str(&format!("[{} bytes]", v.len())),
            Payload::IntArray(v) => out.push_str(&format!("[{} ints]", v.len())),
            Payload::LongArray(v) => out.push_str(&format!("[{} longs]", v.len())),
            Payload::Compound(children) => {
                out.push_str(&format!("{} entries", children.len()));
                push_block(out, indent, level, children, |child, out| {
                    child.pretty_into(out, indent, level + 1)
                });
            }
            Payload::List(data) => {
                out.push_str(&format!("{} entries", data.items.len()));
                push_block(out, indent, level, &data.items, |child, out| {
                    child.pretty_into(out, indent, level + 1)
                });
            }
        }
    }
}

fn push_block<T>(
    out: &mut String,
    indent: &str,
    level: usize,
    children: &[T],
    mut each: impl FnMut(&T, &mut String),
) {
    out.push('\n');
    for _ in 0..level {
        out.push_str(indent);
    }
    out.push('{');
    for child in children {
        out.push('\n');
        each(child, out);
    }
    out.push('\n');
    for _ in 0..level {
        out.push_str(indent);
    }
    out.push('}');
}

impl fmt::Display for NbtTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty(&crate::default_indent()))
    }
}

impl fmt::Debug for NbtTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node.try_borrow() {
            Ok(node) => f
                .debug_struct("NbtTag")
                .field("name", &node.name)
                .field("payload", &node.payload)
                .finish(),
            Err(_) => f.write_str("NbtTag { .. }"),
        }
    }
}

/// Structural equality: variant, name and value, recursively. Compounds
/// compare as name-keyed sets, lists in order. Parents are ignored.
impl PartialEq for NbtTag {
    fn eq(&self, other: &Self) -> bool {
        if self.same(other) {
            return true;
        }
        let a = self.node.borrow();
        let b = other.node.borrow();
        a.name == b.name && payload_eq(&a.payload, &b.payload)
    }
}

fn payload_eq(a: &Payload, b: &Payload) -> bool {
    match (a, b) {
        (Payload::Byte(x), Payload::Byte(y)) => x == y,
        (Payload::Short(x), Payload::Short(y)) => x == y,
        (Payload::Int(x), Payload::Int(y)) => x == y,
        (Payload::Long(x), Payload::Long(y)) => x == y,
        (Payload::Float(x), Payload::Float(y)) => x == y,
        (Payload::Double(x), Payload::Double(y)) => x == y,
        (Payload::ByteArray(x), Payload::ByteArray(y)) => x == y,
        (Payload::String(x), Payload::String(y)) => x == y,
        (Payload::IntArray(x), Payload::IntArray(y)) => x == y,
        (Payload::LongArray(x), Payload::LongArray(y)) => x == y,
        (Payload::List(x), Payload::List(y)) => {
            if x.items.is_empty() && y.items.is_empty() {
                // Declared type of an empty list is a placeholder and not
                // part of the value.
                true
            } else {
                x.elem == y.elem && x.items == y.items
            }
        }
        (Payload::Compound(x), Payload::Compound(y)) => {
            x.len() == y.len()
                && x.iter().all(|child| {
                    let name = child.name();
                    y.iter()
                        .any(|candidate| candidate.name() == name && candidate == child)
                })
        }
        _ => false,
    }
}

pub(crate) fn normalize_f32(value: f32) -> f32 {
    if value.is_finite() {
        format!("{:.6e}", value).parse().unwrap_or(value)
    } else {
        value
    }
}

pub(crate) fn normalize_f64(value: f64) -> f64 {
    if value.is_finite() {
        format!("{:.14e}", value).parse().unwrap_or(value)
    } else {
        value
    }
}
