use crate::buf::{padding_to, WireBuf};
use crate::Endianness;

#[test]
fn padding() {
    assert_eq!(padding_to(1, 3), 0);
    assert_eq!(padding_to(4, 0), 0);
    assert_eq!(padding_to(4, 1), 3);
    assert_eq!(padding_to(4, 4), 0);
    assert_eq!(padding_to(8, 9), 7);
    assert_eq!(padding_to(8, 16), 0);
}

#[test]
fn store_aligns_and_pads_with_zeros() {
    let mut buf = WireBuf::new(Endianness::Little);
    buf.store(1u8);
    buf.store(2u32);

    assert_eq!(buf.get(), &[1, 0, 0, 0, 2, 0, 0, 0]);
}

#[test]
fn store_endianness() {
    let mut buf = WireBuf::new(Endianness::Big);
    buf.store(0x01020304u32);
    assert_eq!(buf.get(), &[1, 2, 3, 4]);

    let mut buf = WireBuf::new(Endianness::Little);
    buf.store(0x01020304u32);
    assert_eq!(buf.get(), &[4, 3, 2, 1]);
}

#[test]
fn reserve_and_backpatch() {
    let mut buf = WireBuf::new(Endianness::Little);
    buf.store(1u8);

    let at = buf.reserve::<u32>();
    buf.extend_from_slice(b"abc");
    buf.store_at(at, 3);

    assert_eq!(buf.get(), &[1, 0, 0, 0, 3, 0, 0, 0, b'a', b'b', b'c']);
}

#[test]
fn rebase_restarts_padding() {
    let mut buf = WireBuf::new(Endianness::Little);
    buf.extend_from_slice(&[0xff; 3]);
    buf.rebase();

    // Relative to the new base the buffer is empty, so no padding goes in.
    buf.store(7u32);
    assert_eq!(buf.stream_len(), 4);
    assert_eq!(&buf.get()[3..], &[7, 0, 0, 0]);
}

#[test]
fn nul_terminated_slices() {
    let mut buf = WireBuf::new(Endianness::Little);
    buf.extend_from_slice_nul(b"hi");
    assert_eq!(buf.get(), &[b'h', b'i', 0]);
}
