use crate::error::ErrorKind;
use crate::{NbtTag, Tag};

#[test]
fn scalar_values_read_back_exactly() {
    assert_eq!(NbtTag::byte(i8::MIN).as_byte(), Some(i8::MIN));
    assert_eq!(NbtTag::byte(i8::MAX).as_byte(), Some(i8::MAX));
    assert_eq!(NbtTag::short(i16::MIN).as_short(), Some(i16::MIN));
    assert_eq!(NbtTag::int(i32::MAX).as_int(), Some(i32::MAX));
    assert_eq!(NbtTag::long(i64::MIN).as_long(), Some(i64::MIN));
    assert_eq!(NbtTag::string("hi").as_str().unwrap().to_owned(), "hi");
}

#[test]
fn accessors_are_variant_checked() {
    let tag = NbtTag::int(1);
    assert_eq!(tag.tag_type(), Tag::Int);
    assert_eq!(tag.as_byte(), None);
    assert_eq!(tag.as_str().map(|s| s.to_owned()), None);
    assert_eq!(*tag.set_byte(2).unwrap_err().kind(), ErrorKind::Format);
}

#[test]
fn float_normalizes_to_7_significant_digits() {
    let tag = NbtTag::float(std::f32::consts::PI);
    assert_eq!(tag.as_float(), Some(3.141593));

    // Values already within 7 digits survive unchanged.
    assert_eq!(NbtTag::float(1.5).as_float(), Some(1.5));
    assert_eq!(NbtTag::float(-0.25).as_float(), Some(-0.25));
}

#[test]
fn double_normalizes_to_15_significant_digits() {
    let tag = NbtTag::double(std::f64::consts::PI);
    assert_eq!(tag.as_double(), Some(3.14159265358979));

    assert_eq!(NbtTag::double(12.5).as_double(), Some(12.5));
}

#[test]
fn normalization_is_idempotent() {
    let once = NbtTag::float(std::f32::consts::E).as_float().unwrap();
    let twice = NbtTag::float(once).as_float().unwrap();
    assert_eq!(once, twice);

    let once = NbtTag::double(std::f64::consts::E).as_double().unwrap();
    let twice = NbtTag::double(once).as_double().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn normalization_applies_on_set_too() {
    let tag = NbtTag::double(0.0);
    tag.set_double(std::f64::consts::PI).unwrap();
    assert_eq!(tag.as_double(), Some(3.14159265358979));
}

#[test]
fn non_finite_floats_pass_through() {
    assert_eq!(NbtTag::float(f32::INFINITY).as_float(), Some(f32::INFINITY));
    assert!(NbtTag::double(f64::NAN).as_double().unwrap().is_nan());
}

#[test]
fn arrays_expose_elements() {
    let tag = NbtTag::int_array(vec![1, 2, 3]);
    assert_eq!(&*tag.int_array_values().unwrap(), &[1, 2, 3]);
    assert_eq!(tag.len(), Some(3));

    tag.int_array_values_mut().unwrap().push(4);
    assert_eq!(tag.len(), Some(4));

    let zeroed = NbtTag::long_array_with_len(2);
    assert_eq!(&*zeroed.long_array_values().unwrap(), &[0, 0]);
}

#[test]
fn detached_tags_rename_freely() {
    let tag = NbtTag::byte(1);
    assert_eq!(tag.name(), None);
    tag.set_name("a").unwrap();
    assert_eq!(tag.name().as_deref(), Some("a"));
    tag.clear_name().unwrap();
    assert_eq!(tag.name(), None);
}

#[test]
fn compound_member_cannot_lose_its_name() {
    let root = NbtTag::compound().named("root");
    root.add(NbtTag::byte(1).named("a")).unwrap();
    let a = root.get("a").unwrap();

    let err = a.clear_name().unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::Format);
    assert_eq!(a.name().as_deref(), Some("a"));
}

#[test]
fn list_member_cannot_gain_a_name() {
    let list = NbtTag::list();
    list.push(NbtTag::int(1)).unwrap();
    let item = list.at(0).unwrap();

    assert_eq!(*item.set_name("x").unwrap_err().kind(), ErrorKind::Format);
    assert_eq!(item.name(), None);
    item.clear_name().unwrap();
}

#[test]
fn rename_through_tag_is_atomic_in_compound() {
    let root = NbtTag::compound().named("root");
    root.add(NbtTag::byte(1).named("a")).unwrap();
    root.add(NbtTag::byte(2).named("b")).unwrap();

    let a = root.get("a").unwrap();
    let err = a.set_name("b").unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::Format);
    assert_eq!(a.name().as_deref(), Some("a"));

    a.set_name("c").unwrap();
    assert!(root.get("c").unwrap().same(&a));
    assert!(root.get("a").is_none());

    // Renaming to the current name is a no-op, not a collision.
    a.set_name("c").unwrap();
}

#[test]
fn paths_walk_up_to_the_root() {
    let root = NbtTag::compound().named("root");
    let child = NbtTag::compound().named("child");
    let list = NbtTag::list().named("items");
    root.add(child.clone()).unwrap();
    child.add(list.clone()).unwrap();
    list.push(NbtTag::int(10)).unwrap();
    list.push(NbtTag::int(20)).unwrap();

    assert_eq!(root.path(), "root");
    assert_eq!(child.path(), "root.child");
    assert_eq!(list.path(), "root.child.items");
    assert_eq!(list.at(1).unwrap().path(), "root.child.items[1]");
}

#[test]
fn unnamed_root_path_is_empty() {
    let root = NbtTag::compound();
    assert_eq!(root.path(), "");

    let named_empty = NbtTag::compound().named("");
    named_empty.add(NbtTag::byte(1).named("b")).unwrap();
    assert_eq!(named_empty.get("b").unwrap().path(), ".b");
}

#[test]
fn handle_clone_aliases_the_node() {
    let tag = NbtTag::int(1);
    let alias = tag.clone();
    assert!(tag.same(&alias));
    alias.set_int(2).unwrap();
    assert_eq!(tag.as_int(), Some(2));
}

#[test]
fn deep_clone_copies_and_detaches() {
    let root = NbtTag::compound().named("root");
    let inner = NbtTag::compound().named("inner");
    inner.add(NbtTag::string("x").named("s")).unwrap();
    root.add(inner).unwrap();

    let copy = root.get("inner").unwrap().deep_clone();
    assert!(copy.parent().is_none());
    assert_eq!(copy, root.get("inner").unwrap());
    assert!(!copy.same(&root.get("inner").unwrap()));

    // The copy's children hang off the copy, not the original.
    assert!(copy.get("s").unwrap().parent().unwrap().same(&copy));

    copy.get("s").unwrap().set_string("y").unwrap();
    assert_eq!(
        root.get("inner").unwrap().get("s").unwrap().as_str().unwrap().to_owned(),
        "x"
    );
}

#[test]
fn deep_clone_preserves_list_type() {
    let list = NbtTag::list_of(Tag::Int);
    let copy = list.deep_clone();
    assert_eq!(copy.list_type(), Some(Tag::Int));
}

#[test]
fn equality_is_structural() {
    let a = NbtTag::compound().named("c");
    a.add(NbtTag::byte(1).named("x")).unwrap();
    a.add(NbtTag::byte(2).named("y")).unwrap();

    // Same members, different insertion order.
    let b = NbtTag::compound().named("c");
    b.add(NbtTag::byte(2).named("y")).unwrap();
    b.add(NbtTag::byte(1).named("x")).unwrap();

    assert_eq!(a, b);

    b.get("y").unwrap().set_byte(3).unwrap();
    assert_ne!(a, b);
}

#[test]
fn equality_of_lists_is_ordered() {
    let a = NbtTag::list();
    a.push(NbtTag::int(1)).unwrap();
    a.push(NbtTag::int(2)).unwrap();

    let b = NbtTag::list();
    b.push(NbtTag::int(2)).unwrap();
    b.push(NbtTag::int(1)).unwrap();

    assert_ne!(a, b);
}

#[test]
fn pretty_print_uses_classic_dump_format() {
    let root = NbtTag::compound().named("root");
    root.add(NbtTag::byte(42).named("b")).unwrap();
    let list = NbtTag::list().named("l");
    list.push(NbtTag::int(1)).unwrap();
    root.add(list).unwrap();

    let expected = "\
TAG_Compound(\"root\"): 2 entries
{
  TAG_Byte(\"b\"): 42
  TAG_List(\"l\"): 1 entries
  {
    TAG_Int: 1
  }
}";
    assert_eq!(root.pretty("  "), expected);
}

#[test]
fn pretty_print_array_bodies_are_summaries() {
    let tag = NbtTag::byte_array(vec![1, 2, 3]).named("data");
    assert_eq!(tag.pretty(" "), "TAG_Byte_Array(\"data\"): [3 bytes]");

    let tag = NbtTag::string("Bananrama").named("name");
    assert_eq!(tag.pretty(" "), "TAG_String(\"name\"): Bananrama");
}
