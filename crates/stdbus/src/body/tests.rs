use crate::error::ErrorKind;
use crate::{ty, Body, BodyBuf, Endianness, Signature, Variant};

#[test]
fn struct_with_array_and_dict() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);

    let st = buf
        .store_struct::<(i32, ty::Array<ty::Str>, ty::Dict<ty::Str, i32>)>()
        .unwrap();

    let st = st.store(42i32);

    let st = st
        .store_array(|tags| {
            tags.store("ipc");
            tags.store("dbus");
        })
        .unwrap();

    let st = st
        .store_dict(|scores| {
            scores.store("A", 10i32);
            scores.store("B", 20i32);
        })
        .unwrap();

    st.finish();

    assert_eq!(buf.signature(), "(iasa{si})");

    assert_eq!(
        buf.get(),
        &[
            42, 0, 0, 0, // i
            17, 0, 0, 0, // as byte length
            3, 0, 0, 0, b'i', b'p', b'c', 0, // "ipc"
            4, 0, 0, 0, b'd', b'b', b'u', b's', 0, // "dbus"
            0, 0, 0, // padding to the a{si} length
            28, 0, 0, 0, // a{si} byte length
            1, 0, 0, 0, b'A', 0, // "A"
            0, 0, // padding to i
            10, 0, 0, 0, // 10
            0, 0, 0, 0, // padding to the second entry
            1, 0, 0, 0, b'B', 0, // "B"
            0, 0, // padding to i
            20, 0, 0, 0, // 20
        ][..]
    );

    let mut body = buf.as_body();

    let (id, mut tags, mut scores) = body
        .load_struct::<(i32, ty::Array<ty::Str>, ty::Dict<ty::Str, i32>)>()
        .unwrap();

    assert_eq!(id, 42);
    assert_eq!(tags.load().unwrap(), Some("ipc"));
    assert_eq!(tags.load().unwrap(), Some("dbus"));
    assert_eq!(tags.load().unwrap(), None);
    assert_eq!(scores.load_entry().unwrap(), Some(("A", 10)));
    assert_eq!(scores.load_entry().unwrap(), Some(("B", 20)));
    assert_eq!(scores.load_entry().unwrap(), None);
    assert!(body.is_empty());
}

#[test]
fn empty_array_still_pads_for_elements() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);

    let array = buf.store_array::<u64>().unwrap();
    array.finish().unwrap();

    assert_eq!(buf.signature(), "at");
    // Length, then padding up to the element alignment of eight.
    assert_eq!(buf.get(), &[0, 0, 0, 0, 0, 0, 0, 0]);

    let mut body = buf.as_body();
    let mut array = body.load_array::<u64>().unwrap();
    assert_eq!(array.load().unwrap(), None);
    assert!(body.is_empty());
}

#[test]
fn nested_arrays() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);

    let mut outer = buf.store_array::<ty::Array<u16>>().unwrap();

    outer
        .store_array(|inner| {
            inner.store(1u16);
            inner.store(2u16);
        })
        .unwrap();

    outer
        .store_array(|inner| {
            inner.store(3u16);
        })
        .unwrap();

    outer.finish().unwrap();

    assert_eq!(buf.signature(), "aaq");

    let mut body = buf.as_body();
    let mut outer = body.load_array::<ty::Array<u16>>().unwrap();

    let mut inner = outer.load().unwrap().unwrap();
    assert_eq!(inner.load().unwrap(), Some(1));
    assert_eq!(inner.load().unwrap(), Some(2));
    assert_eq!(inner.load().unwrap(), None);

    let mut inner = outer.load().unwrap().unwrap();
    assert_eq!(inner.load().unwrap(), Some(3));
    assert_eq!(inner.load().unwrap(), None);

    assert!(outer.load().unwrap().is_none());
}

#[test]
fn array_of_structs() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);

    let mut array = buf.store_array::<ty::Struct<(u8, ty::Str)>>().unwrap();
    array.store_struct(|st| st.store(1u8).store("one"));
    array.store_struct(|st| st.store(2u8).store("two"));
    array.finish().unwrap();

    assert_eq!(buf.signature(), "a(ys)");

    let mut body = buf.as_body();
    let mut array = body.load_array::<ty::Struct<(u8, ty::Str)>>().unwrap();

    assert_eq!(array.load().unwrap(), Some((1, "one")));
    assert_eq!(array.load().unwrap(), Some((2, "two")));
    assert_eq!(array.load().unwrap(), None);
}

#[test]
fn dict_of_variants() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);

    let mut dict = buf.store_dict::<ty::Str, ty::Variant>().unwrap();
    dict.store("Count", Variant::Int32(7));
    dict.store("Name", Variant::String("count"));
    dict.finish().unwrap();

    assert_eq!(buf.signature(), "a{sv}");

    let mut body = buf.as_body();
    let mut dict = body.load_dict::<ty::Str, ty::Variant>().unwrap();

    assert_eq!(dict.load_entry().unwrap(), Some(("Count", Variant::Int32(7))));
    assert_eq!(
        dict.load_entry().unwrap(),
        Some(("Name", Variant::String("count")))
    );
    assert_eq!(dict.load_entry().unwrap(), None);
}

#[test]
fn big_endian_round_trip() {
    let mut buf = BodyBuf::with_endianness(Endianness::Big);
    buf.store(0x0102u16).unwrap();
    buf.store(0x01020304u32).unwrap();
    buf.store(core::f64::consts::PI).unwrap();
    buf.store("päivää").unwrap();

    assert_eq!(buf.signature(), "quds");
    assert_eq!(&buf.get()[..2], &[1, 2]);
    assert_eq!(&buf.get()[4..8], &[1, 2, 3, 4]);

    let mut body = buf.as_body();
    assert_eq!(body.load::<u16>().unwrap(), 0x0102);
    assert_eq!(body.load::<u32>().unwrap(), 0x01020304);
    assert_eq!(body.load::<f64>().unwrap(), core::f64::consts::PI);
    assert_eq!(body.read::<str>().unwrap(), "päivää");
    assert!(body.is_empty());
}

#[test]
fn string_boundaries() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);
    buf.store("").unwrap();

    let long = "x".repeat(1 << 16);
    buf.store(long.as_str()).unwrap();

    let mut body = buf.as_body();
    assert_eq!(body.read::<str>().unwrap(), "");
    assert_eq!(body.read::<str>().unwrap(), long);
}

#[test]
fn bool_on_the_wire_must_be_zero_or_one() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);
    buf.store(true).unwrap();
    assert_eq!(buf.get(), &[1, 0, 0, 0]);
    assert!(buf.as_body().load_bool().unwrap());

    let bytes = [2u8, 0, 0, 0];
    let mut body = Body::new(&bytes, Endianness::Little, Signature::BOOLEAN);

    let error = body.load_bool().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::InvalidBool(2)));
}

#[test]
fn missing_nul_terminator() {
    // Length claims four bytes, but the byte after them is not NUL.
    let bytes = [4u8, 0, 0, 0, b'a', b'b', b'c', b'd', 1];
    let mut body = Body::new(&bytes, Endianness::Little, Signature::STRING);

    let error = body.read::<str>().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::NotNullTerminated));
}

#[test]
fn signature_mismatch() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);
    buf.store(1u32).unwrap();

    let mut body = buf.as_body();
    let error = body.load::<u16>().unwrap_err();

    assert!(matches!(
        error.kind(),
        ErrorKind::SignatureMismatch { expected, actual }
            if *expected == *Signature::UINT16 && *actual == *Signature::UINT32
    ));
}

#[test]
fn signature_exhausted() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);
    buf.store(1u32).unwrap();

    let mut body = buf.as_body();
    body.load::<u32>().unwrap();

    let error = body.load::<u32>().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::SignatureEnd(..)));
}

#[test]
fn end_of_body() {
    let bytes = [1u8, 0];
    let mut body = Body::new(&bytes, Endianness::Little, Signature::UINT32);

    let error = body.load::<u32>().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::EndOfBody));
}

#[test]
fn array_length_is_bounded() {
    // A claimed array length over 2^26 is refused before any element is
    // visited.
    let bytes = [0xff, 0xff, 0xff, 0x07];
    let mut body = Body::new(&bytes, Endianness::Little, Signature::new_const(b"au"));

    let error = body.load_array::<u32>().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::ArrayTooLong(..)));
}

#[test]
fn array_length_must_fit_the_body() {
    let bytes = [16u8, 0, 0, 0, 1, 0, 0, 0];
    let mut body = Body::new(&bytes, Endianness::Little, Signature::new_const(b"au"));

    let error = body.load_array::<u32>().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::EndOfBody));
}

#[test]
fn variants_of_each_basic_kind() {
    let path = crate::ObjectPath::new_const(b"/a/b");

    let variants = [
        Variant::Byte(7),
        Variant::Bool(true),
        Variant::Int16(-2),
        Variant::Uint16(2),
        Variant::Int32(-3),
        Variant::Uint32(3),
        Variant::Int64(-4),
        Variant::Uint64(4),
        Variant::Double(1.5),
        Variant::UnixFd(crate::UnixFd(0)),
        Variant::String("hello"),
        Variant::ObjectPath(path),
        Variant::Signature(Signature::new_const(b"a{sv}")),
    ];

    let mut buf = BodyBuf::with_endianness(Endianness::Little);

    for variant in variants {
        buf.store(variant).unwrap();
    }

    assert_eq!(buf.signature(), "vvvvvvvvvvvvv");

    let mut body = buf.as_body();

    for variant in variants {
        assert_eq!(body.load_variant().unwrap(), variant);
    }

    assert!(body.is_empty());
}

#[test]
fn container_variants_are_refused() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);
    // A variant holding an empty array of u32, hand-encoded.
    buf.store(Signature::new_const(b"au")).unwrap();

    let bytes = {
        let mut bytes = buf.get().to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes
    };

    let mut body = Body::new(&bytes, Endianness::Little, Signature::VARIANT);
    let error = body.load_variant().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnsupportedVariant(..)));
}

#[test]
fn unix_fd_index_is_distinct_from_u32() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);
    buf.store(crate::UnixFd(1)).unwrap();
    buf.store(1u32).unwrap();

    assert_eq!(buf.signature(), "hu");
}

#[test]
fn byte_array_fast_path() {
    let mut buf = BodyBuf::with_endianness(Endianness::Little);
    buf.store(&b"\x00\x01\x02"[..]).unwrap();

    assert_eq!(buf.signature(), "ay");
    assert_eq!(buf.get(), &[3, 0, 0, 0, 0, 1, 2]);

    let mut body = buf.as_body();
    assert_eq!(body.read::<[u8]>().unwrap(), b"\x00\x01\x02");
}
