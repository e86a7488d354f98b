use core::num::NonZeroU32;

use log::debug;

use crate::buf::{padding_to, MAX_BODY_LENGTH, MAX_HEADER_LENGTH};
use crate::error::{Error, ErrorKind, Result};
use crate::proto::{self, FieldCode};
use crate::transport::Transport;
use crate::{Body, Endianness, Flags, Message, MessageKind, ObjectPath, Serial, Signature};

/// The fixed-size prelude of a received message, parsed as soon as its
/// sixteen bytes are in.
#[derive(Debug, Clone, Copy)]
struct Prelude {
    endianness: Endianness,
    message_type: proto::MessageType,
    flags: Flags,
    serial: Serial,
    fields_end: usize,
    body_start: usize,
    body_end: usize,
}

/// The buffer a single incoming message is read into.
///
/// A message is parsed in place: [`message`] borrows every string directly
/// out of the receive buffer, and the next read overwrites it. Use
/// [`Message::to_owned`] to keep a message across reads.
///
/// [`message`]: Self::message
/// [`Message::to_owned`]: crate::Message::to_owned
pub struct RecvBuf {
    buf: Vec<u8>,
    prelude: Option<Prelude>,
}

impl RecvBuf {
    /// Construct a new receive buffer.
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            prelude: None,
        }
    }

    /// Read exactly one message frame from the transport.
    ///
    /// Reads the fixed prelude, the header fields, the padding up to the
    /// 8-byte boundary and the full body before returning, so no partial
    /// message is ever left on the socket.
    pub(crate) fn read_frame(&mut self, transport: &mut Transport) -> Result<()> {
        self.prelude = None;
        self.buf.clear();

        transport.read_exact_into(&mut self.buf, 16)?;

        let endianness = match Endianness::from_byte(self.buf[0]) {
            Some(endianness) => endianness,
            None => return Err(Error::new(ErrorKind::BadEndianFlag(self.buf[0]))),
        };

        let message_type = proto::MessageType::new(self.buf[1]);
        let flags = Flags::new(self.buf[2]);

        if self.buf[3] != 1 {
            return Err(Error::new(ErrorKind::InvalidProtocolVersion(self.buf[3])));
        }

        let body_length = read_u32(endianness, &self.buf[4..8]) as u64;
        let serial = read_u32(endianness, &self.buf[8..12]);
        let fields_length = read_u32(endianness, &self.buf[12..16]) as u64;

        let Some(serial) = NonZeroU32::new(serial) else {
            return Err(Error::new(ErrorKind::ZeroSerial));
        };

        if body_length > MAX_BODY_LENGTH {
            return Err(Error::new(ErrorKind::BodyTooLong(body_length)));
        }

        if fields_length > MAX_HEADER_LENGTH {
            return Err(Error::new(ErrorKind::HeaderTooLong(fields_length)));
        }

        let fields_end = 16 + fields_length as usize;
        let body_start = fields_end + padding_to(8, fields_end);
        let body_end = body_start + body_length as usize;

        transport.read_exact_into(&mut self.buf, body_end - 16)?;

        self.prelude = Some(Prelude {
            endianness,
            message_type,
            flags,
            serial: Serial::new(serial),
            fields_end,
            body_start,
            body_end,
        });

        Ok(())
    }

    /// Parse the buffered message.
    ///
    /// Header fields with an unknown code are skipped over by decoding their
    /// variant signature and striding past the value.
    pub fn message(&self) -> Result<Message<'_>> {
        self.parse_message(false)
    }

    /// Parse the buffered message, refusing header fields with unknown
    /// codes.
    pub fn message_strict(&self) -> Result<Message<'_>> {
        self.parse_message(true)
    }

    fn parse_message(&self, strict: bool) -> Result<Message<'_>> {
        let Some(prelude) = self.prelude else {
            return Err(Error::new(ErrorKind::EndOfBody));
        };

        let mut st = Body::from_raw_parts(
            &self.buf,
            16,
            prelude.fields_end,
            prelude.endianness,
            Signature::EMPTY,
        );

        let mut path = None;
        let mut interface = None;
        let mut member = None;
        let mut error_name = None;
        let mut reply_serial = None;
        let mut destination = None;
        let mut sender = None;
        let mut signature = Signature::EMPTY;

        while !st.is_empty() {
            // Each header field is a struct, aligned to 8.
            st.align_to(8)?;
            let code = FieldCode::new(st.load_frame::<u8>()?);
            let value_signature = st.read_unchecked::<Signature>()?;

            match (code, value_signature.as_bytes()) {
                (FieldCode::PATH, b"o") => {
                    path = Some(st.read_unchecked::<ObjectPath>()?);
                }
                (FieldCode::INTERFACE, b"s") => {
                    interface = Some(st.read_unchecked::<str>()?);
                }
                (FieldCode::MEMBER, b"s") => {
                    member = Some(st.read_unchecked::<str>()?);
                }
                (FieldCode::ERROR_NAME, b"s") => {
                    error_name = Some(st.read_unchecked::<str>()?);
                }
                (FieldCode::REPLY_SERIAL, b"u") => {
                    let number = st.load_frame::<u32>()?;

                    let Some(number) = NonZeroU32::new(number) else {
                        return Err(Error::new(ErrorKind::ZeroReplySerial));
                    };

                    reply_serial = Some(Serial::new(number));
                }
                (FieldCode::DESTINATION, b"s") => {
                    destination = Some(st.read_unchecked::<str>()?);
                }
                (FieldCode::SENDER, b"s") => {
                    sender = Some(st.read_unchecked::<str>()?);
                }
                (FieldCode::SIGNATURE, b"g") => {
                    signature = st.read_unchecked::<Signature>()?;
                }
                (FieldCode::UNIX_FDS, b"u") => {
                    // Only the index type is supported; the count is not
                    // retained.
                    st.load_frame::<u32>()?;
                }
                (
                    FieldCode::PATH
                    | FieldCode::INTERFACE
                    | FieldCode::MEMBER
                    | FieldCode::ERROR_NAME
                    | FieldCode::REPLY_SERIAL
                    | FieldCode::DESTINATION
                    | FieldCode::SENDER
                    | FieldCode::SIGNATURE
                    | FieldCode::UNIX_FDS,
                    _,
                ) => {
                    return Err(Error::new(ErrorKind::BadHeaderField(code.get())));
                }
                (code, _) => {
                    if strict {
                        return Err(Error::new(ErrorKind::UnknownHeaderField(code.get())));
                    }

                    debug!(
                        "Skipping unknown header field {} with signature {:?}",
                        code.get(),
                        value_signature
                    );
                    st.skip_value(value_signature)?;
                }
            }
        }

        let kind = match prelude.message_type {
            proto::MessageType::METHOD_CALL => {
                let Some(path) = path else {
                    return Err(Error::new(ErrorKind::MissingPath));
                };

                let Some(member) = member else {
                    return Err(Error::new(ErrorKind::MissingMember));
                };

                MessageKind::MethodCall { path, member }
            }
            proto::MessageType::METHOD_RETURN => {
                let Some(reply_serial) = reply_serial else {
                    return Err(Error::new(ErrorKind::MissingReplySerial));
                };

                MessageKind::MethodReturn { reply_serial }
            }
            proto::MessageType::ERROR => {
                let Some(error_name) = error_name else {
                    return Err(Error::new(ErrorKind::MissingErrorName));
                };

                let Some(reply_serial) = reply_serial else {
                    return Err(Error::new(ErrorKind::MissingReplySerial));
                };

                MessageKind::Error {
                    error_name,
                    reply_serial,
                }
            }
            proto::MessageType::SIGNAL => {
                let Some(path) = path else {
                    return Err(Error::new(ErrorKind::MissingPath));
                };

                if interface.is_none() {
                    return Err(Error::new(ErrorKind::MissingInterface));
                }

                let Some(member) = member else {
                    return Err(Error::new(ErrorKind::MissingMember));
                };

                MessageKind::Signal { path, member }
            }
            other => return Err(Error::new(ErrorKind::InvalidMessageType(other.get()))),
        };

        Ok(Message {
            kind,
            serial: prelude.serial,
            flags: prelude.flags,
            interface,
            destination,
            sender,
            body: Body::from_raw_parts(
                &self.buf,
                prelude.body_start,
                prelude.body_end,
                prelude.endianness,
                signature,
            ),
        })
    }
}

fn read_u32(endianness: Endianness, bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(bytes);

    match endianness {
        Endianness::Little => u32::from_le_bytes(raw),
        Endianness::Big => u32::from_be_bytes(raw),
    }
}

impl Default for RecvBuf {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
