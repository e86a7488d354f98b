use core::num::NonZeroU32;
use std::os::unix::net::UnixStream;

use crate::buf::WireBuf;
use crate::error::ErrorKind;
use crate::transport::Transport;
use crate::{
    BodyBuf, Endianness, Flags, MessageKind, ObjectPath, RecvBuf, SendBuf, Serial, Signature,
};

const PATH: &ObjectPath = ObjectPath::new_const(b"/org/freedesktop/DBus");

fn transport_pair() -> (Transport, Transport) {
    let (a, b) = UnixStream::pair().unwrap();
    (Transport::new(a), Transport::new(b))
}

fn deliver(bytes: &[u8]) -> RecvBuf {
    let (mut near, mut far) = transport_pair();
    near.send_all(bytes).unwrap();

    let mut recv = RecvBuf::new();
    recv.read_frame(&mut far).unwrap();
    recv
}

#[test]
fn method_call_round_trip() {
    let mut send = SendBuf::new();
    let mut body = BodyBuf::new();
    body.store("org.freedesktop.DBus").unwrap();

    let message = send
        .method_call(PATH, "NameHasOwner")
        .with_interface("org.freedesktop.DBus")
        .with_destination("org.freedesktop.DBus")
        .with_body(&body);

    let sent = message.clone();
    send.write_message(&message).unwrap();

    let recv = deliver(send.bytes());
    let parsed = recv.message().unwrap();

    assert_eq!(parsed, sent);
    assert_eq!(parsed.signature(), "s");
    assert_eq!(
        parsed.body().read::<str>().unwrap(),
        "org.freedesktop.DBus"
    );
}

#[test]
fn every_kind_round_trips() {
    let mut send = SendBuf::new();
    let reply_serial = Serial::new(NonZeroU32::new(42).unwrap());

    let mut body = BodyBuf::new();
    body.store(7u32).unwrap();

    let messages = [
        send.method_call(PATH, "Ping").to_owned(),
        send.method_return(reply_serial).with_body(&body).to_owned(),
        send.error("org.freedesktop.DBus.Error.Failed", reply_serial)
            .to_owned(),
        send.signal(PATH, "NameOwnerChanged")
            .with_interface("org.freedesktop.DBus")
            .to_owned(),
    ];

    for message in &messages {
        send.write_message(&message.borrow()).unwrap();
        let recv = deliver(send.bytes());
        send.clear();

        assert_eq!(recv.message().unwrap(), message.borrow());
    }
}

#[test]
fn flags_survive_the_wire() {
    let mut send = SendBuf::new();

    let message = send
        .method_call(PATH, "Ping")
        .with_flags(Flags::NO_REPLY_EXPECTED | Flags::NO_AUTO_START);

    let sent = message.clone();
    send.write_message(&message).unwrap();

    let recv = deliver(send.bytes());
    let parsed = recv.message().unwrap();

    assert_eq!(parsed.flags(), sent.flags());
    assert!(parsed.flags().contains(Flags::NO_REPLY_EXPECTED));
}

#[test]
fn big_endian_message_round_trip() {
    let mut send = SendBuf::new();
    let mut body = BodyBuf::with_endianness(Endianness::Big);
    body.store(0xdeadbeefu32).unwrap();

    let message = send.method_call(PATH, "Ping").with_body(&body);
    let sent = message.clone();
    send.write_message(&message).unwrap();

    // The endianness marker follows the body.
    assert_eq!(send.bytes()[0], b'B');

    let recv = deliver(send.bytes());
    let parsed = recv.message().unwrap();

    assert_eq!(parsed, sent);
    assert_eq!(parsed.body().load::<u32>().unwrap(), 0xdeadbeef);
}

#[test]
fn consecutive_messages_keep_their_own_alignment() {
    let mut send = SendBuf::new();
    let mut body = BodyBuf::new();
    // An odd-length body, so the next message starts unaligned in the
    // buffer.
    body.store(1u8).unwrap();

    let first = send.method_call(PATH, "One").with_body(&body).to_owned();
    let second = send.method_call(PATH, "Two").with_body(&body).to_owned();

    send.write_message(&first.borrow()).unwrap();
    send.write_message(&second.borrow()).unwrap();

    let (mut near, mut far) = transport_pair();
    near.send_all(send.bytes()).unwrap();

    let mut recv = RecvBuf::new();

    recv.read_frame(&mut far).unwrap();
    assert_eq!(recv.message().unwrap(), first.borrow());

    recv.read_frame(&mut far).unwrap();
    assert_eq!(recv.message().unwrap(), second.borrow());
}

/// Hand-frame a method call which carries one header field this library has
/// no name for.
fn frame_with_unknown_field() -> Vec<u8> {
    let mut b = WireBuf::new(Endianness::Little);
    b.extend_from_slice(&[b'l', 1, 0, 1]);
    b.store(0u32);
    b.store(1u32);

    let fields_len = b.reserve::<u32>();
    let start = b.len();

    b.pad_to(8);
    b.store(1u8);
    b.extend_from_slice(&[1, b'o', 0]);
    b.store(4u32);
    b.extend_from_slice_nul(b"/a/b");

    b.pad_to(8);
    b.store(3u8);
    b.extend_from_slice(&[1, b's', 0]);
    b.store(4u32);
    b.extend_from_slice_nul(b"Ping");

    b.pad_to(8);
    b.store(200u8);
    b.extend_from_slice(&[1, b'u', 0]);
    b.store(42u32);

    b.store_at(fields_len, (b.len() - start) as u32);
    b.pad_to(8);
    b.get().to_vec()
}

#[test]
fn unknown_header_field_is_skipped_by_default() {
    let bytes = frame_with_unknown_field();

    let (mut near, mut far) = transport_pair();
    near.send_all(&bytes).unwrap();

    let mut recv = RecvBuf::new();
    recv.read_frame(&mut far).unwrap();

    let message = recv.message().unwrap();

    match message.kind() {
        MessageKind::MethodCall { path, member } => {
            assert_eq!(path, ObjectPath::new_const(b"/a/b"));
            assert_eq!(member, "Ping");
        }
        other => panic!("expected method call, got {other:?}"),
    }
}

#[test]
fn unknown_header_field_is_refused_when_strict() {
    let bytes = frame_with_unknown_field();

    let (mut near, mut far) = transport_pair();
    near.send_all(&bytes).unwrap();

    let mut recv = RecvBuf::new();
    recv.read_frame(&mut far).unwrap();

    let error = recv.message_strict().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnknownHeaderField(200)));
}

#[test]
fn bad_endian_flag_is_fatal() {
    let (mut near, mut far) = transport_pair();
    near.send_all(&[b'x', 1, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0])
        .unwrap();

    let mut recv = RecvBuf::new();
    let error = recv.read_frame(&mut far).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::BadEndianFlag(b'x')));
}

#[test]
fn zero_serial_is_refused() {
    let (mut near, mut far) = transport_pair();
    near.send_all(&[b'l', 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
        .unwrap();

    let mut recv = RecvBuf::new();
    let error = recv.read_frame(&mut far).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::ZeroSerial));
}

#[test]
fn method_call_requires_path_and_member() {
    let mut b = WireBuf::new(Endianness::Little);
    b.extend_from_slice(&[b'l', 1, 0, 1]);
    b.store(0u32);
    b.store(1u32);

    let fields_len = b.reserve::<u32>();
    let start = b.len();

    b.pad_to(8);
    b.store(1u8);
    b.extend_from_slice(&[1, b'o', 0]);
    b.store(4u32);
    b.extend_from_slice_nul(b"/a/b");

    b.store_at(fields_len, (b.len() - start) as u32);
    b.pad_to(8);

    let (mut near, mut far) = transport_pair();
    near.send_all(b.get()).unwrap();

    let mut recv = RecvBuf::new();
    recv.read_frame(&mut far).unwrap();

    let error = recv.message().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::MissingMember));
}

#[test]
fn signature_field_applies_to_the_body() {
    let mut send = SendBuf::new();
    let mut body = BodyBuf::new();
    body.store(1u16).unwrap();
    body.store("x").unwrap();

    let message = send.method_call(PATH, "Ping").with_body(&body);
    send.write_message(&message).unwrap();

    let recv = deliver(send.bytes());
    let parsed = recv.message().unwrap();

    assert_eq!(parsed.signature(), Signature::new_const(b"qs"));

    let mut parsed_body = parsed.body();
    assert_eq!(parsed_body.load::<u16>().unwrap(), 1);
    assert_eq!(parsed_body.read::<str>().unwrap(), "x");
    assert!(parsed_body.is_empty());
}
