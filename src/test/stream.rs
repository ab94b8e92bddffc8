use std::io::SeekFrom;

use crate::error::ErrorKind;
use crate::stream::{ByteStream, Endian};

#[test]
fn primitives_round_trip_big_endian() {
    let mut s = ByteStream::with_endian(Endian::Big);
    s.write_i8(-5).unwrap();
    s.write_i16(-300).unwrap();
    s.write_i32(70_000).unwrap();
    s.write_i64(-5_000_000_000).unwrap();
    s.write_f32(1.5).unwrap();
    s.write_f64(-2.25).unwrap();
    s.write_string("hëllo").unwrap();

    s.set_position(0).unwrap();
    assert_eq!(s.read_i8().unwrap(), -5);
    assert_eq!(s.read_i16().unwrap(), -300);
    assert_eq!(s.read_i32().unwrap(), 70_000);
    assert_eq!(s.read_i64().unwrap(), -5_000_000_000);
    assert_eq!(s.read_f32().unwrap(), 1.5);
    assert_eq!(s.read_f64().unwrap(), -2.25);
    assert_eq!(s.read_string().unwrap(), "hëllo");
    assert_eq!(s.remaining(), 0);
}

#[test]
fn big_endian_layout() {
    let mut s = ByteStream::with_endian(Endian::Big);
    s.write_i32(0x0102_0304).unwrap();
    assert_eq!(s.as_slice(), &[0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn little_endian_layout() {
    let mut s = ByteStream::with_endian(Endian::Little);
    s.write_i32(0x0102_0304).unwrap();
    assert_eq!(s.as_slice(), &[0x04, 0x03, 0x02, 0x01]);
}

// The 64-bit path gets its own check: a word-swapped or big-endian write
// here would still round-trip through its own reader.
#[test]
fn little_endian_64_bit_layout() {
    let mut s = ByteStream::with_endian(Endian::Little);
    s.write_i64(0x0102_0304_0506_0708).unwrap();
    assert_eq!(
        s.as_slice(),
        &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
    );
}

#[test]
fn little_endian_string_prefix() {
    let mut s = ByteStream::with_endian(Endian::Little);
    s.write_string("ab").unwrap();
    assert_eq!(s.as_slice(), &[0x02, 0x00, b'a', b'b']);
}

#[test]
fn read_past_end_is_eof() {
    let mut s = ByteStream::from_vec(vec![1, 2]);
    s.set_endian(Endian::Big);
    let err = s.read_i32().unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::EndOfStream);
    // A failed read does not advance.
    assert_eq!(s.position(), 0);
    assert_eq!(s.read_i16().unwrap(), 0x0102);
}

#[test]
fn read_bytes_truncates_instead_of_failing() {
    let mut s = ByteStream::from_vec(vec![1, 2, 3]);
    assert_eq!(s.read_bytes(8), vec![1, 2, 3]);
    assert_eq!(s.read_bytes(8), Vec::<u8>::new());
}

#[test]
fn invalid_utf8_string_is_format_error() {
    let mut s = ByteStream::from_vec(vec![0x00, 0x02, 0xff, 0xfe]);
    s.set_endian(Endian::Big);
    let err = s.read_string().unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::Format);
}

#[test]
fn truncated_string_is_eof() {
    let mut s = ByteStream::from_vec(vec![0x00, 0x05, b'h']);
    s.set_endian(Endian::Big);
    let err = s.read_string().unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::EndOfStream);
}

#[test]
fn growth_starts_at_256() {
    let mut s = ByteStream::with_endian(Endian::Big);
    assert_eq!(s.capacity(), 0);
    s.write_u8(1).unwrap();
    assert_eq!(s.capacity(), 256);
    assert_eq!(s.len(), 1);
}

#[test]
fn growth_doubles_capacity() {
    let mut s = ByteStream::with_capacity(300);
    s.set_position(300).unwrap();
    s.write_u8(1).unwrap();
    assert_eq!(s.capacity(), 600);
    assert_eq!(s.len(), 301);
}

#[test]
fn growth_jumps_to_required_when_doubling_is_short() {
    let mut s = ByteStream::with_capacity(4);
    s.write_bytes(&[0; 2000]).unwrap();
    assert_eq!(s.capacity(), 2000);
}

#[test]
fn write_past_len_zero_fills() {
    let mut s = ByteStream::with_endian(Endian::Big);
    s.write_bytes(&[1, 2, 3]).unwrap();
    s.set_position(5).unwrap();
    s.write_u8(9).unwrap();
    assert_eq!(s.as_slice(), &[1, 2, 3, 0, 0, 9]);
}

#[test]
fn shrunk_stream_does_not_leak_stale_bytes() {
    let mut s = ByteStream::with_endian(Endian::Big);
    s.write_bytes(&[1, 2, 3, 4, 5, 6]).unwrap();
    s.set_len(2).unwrap();
    s.set_position(4).unwrap();
    s.write_u8(9).unwrap();
    assert_eq!(s.as_slice(), &[1, 2, 0, 0, 9]);
}

#[test]
fn shrinking_len_clamps_position() {
    let mut s = ByteStream::with_endian(Endian::Big);
    s.write_bytes(&[1, 2, 3, 4]).unwrap();
    assert_eq!(s.position(), 4);
    s.set_len(2).unwrap();
    assert_eq!(s.position(), 2);
}

#[test]
fn fixed_stream_cannot_grow() {
    let mut s = ByteStream::from_vec(vec![0; 4]);
    s.set_endian(Endian::Big);
    s.set_position(2).unwrap();
    let err = s.write_i32(1).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::EndOfStream);
}

#[test]
fn fixed_stream_can_overwrite_in_place() {
    let mut s = ByteStream::from_vec(vec![0; 4]);
    s.set_endian(Endian::Big);
    s.write_i32(0x0102_0304).unwrap();
    assert_eq!(s.as_slice(), &[1, 2, 3, 4]);
}

#[test]
fn wrap_is_a_window() {
    let mut s = ByteStream::wrap(vec![1, 2, 3, 4, 5], 1, 3).unwrap();
    s.set_endian(Endian::Big);
    assert_eq!(s.len(), 3);
    assert_eq!(s.position(), 0);
    assert_eq!(s.read_u8().unwrap(), 2);
    assert_eq!(s.as_slice(), &[2, 3, 4]);

    s.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(s.read_u8().unwrap(), 2);
}

#[test]
fn wrap_outside_buffer_fails() {
    let err = ByteStream::wrap(vec![1, 2, 3], 2, 2).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::Range);
}

#[test]
fn seek_from_end_and_current() {
    let mut s = ByteStream::from_vec(vec![1, 2, 3, 4, 5]);
    assert_eq!(s.seek(SeekFrom::End(-2)).unwrap(), 3);
    assert_eq!(s.read_u8().unwrap(), 4);
    assert_eq!(s.seek(SeekFrom::Current(-1)).unwrap(), 3);
    assert_eq!(s.read_u8().unwrap(), 4);
}

#[test]
fn seek_before_origin_fails() {
    let mut s = ByteStream::from_vec(vec![1, 2, 3]);
    let err = s.seek(SeekFrom::Current(-1)).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::Range);

    let mut w = ByteStream::wrap(vec![1, 2, 3], 1, 2).unwrap();
    w.seek(SeekFrom::Start(0)).unwrap();
    assert!(w.seek(SeekFrom::Current(-1)).is_err());
}

#[test]
fn set_capacity_checks() {
    let mut s = ByteStream::with_endian(Endian::Big);
    s.write_bytes(&[1, 2, 3]).unwrap();
    let err = s.set_capacity(2).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::Range);
    s.set_capacity(1024).unwrap();
    assert_eq!(s.capacity(), 1024);
    assert_eq!(s.len(), 3);
}

#[test]
fn into_vec_returns_live_region() {
    let mut s = ByteStream::with_endian(Endian::Big);
    s.write_bytes(&[9, 8, 7]).unwrap();
    assert_eq!(s.into_vec(), vec![9, 8, 7]);

    let w = ByteStream::wrap(vec![1, 2, 3, 4], 1, 2).unwrap();
    assert_eq!(w.into_vec(), vec![2, 3]);
}
