use core::num::NonZeroU32;

use crate::buf::{WireBuf, MAX_BODY_LENGTH, MAX_HEADER_LENGTH};
use crate::error::{Error, ErrorKind, Result};
use crate::proto::FieldCode;
use crate::{Endianness, Message, MessageKind, ObjectPath, Serial, Signature};

/// The buffer outgoing messages are framed into, and the home of the serial
/// counter.
///
/// # Examples
///
/// ```
/// use stdbus::SendBuf;
///
/// let mut send = SendBuf::new();
/// assert_ne!(send.next_serial(), send.next_serial());
/// ```
pub struct SendBuf {
    buf: WireBuf,
    serial: u32,
}

impl SendBuf {
    /// Construct a new send buffer.
    pub fn new() -> Self {
        Self {
            buf: WireBuf::new(Endianness::NATIVE),
            serial: 0,
        }
    }

    /// The next serial for this buffer, always positive.
    pub fn next_serial(&mut self) -> Serial {
        loop {
            let Some(serial) = NonZeroU32::new(self.serial.wrapping_add(1)) else {
                self.serial = 1;
                continue;
            };

            self.serial = serial.get();
            break Serial::new(serial);
        }
    }

    /// Construct a method call [`Message`] with the next serial.
    pub fn method_call<'a>(&mut self, path: &'a ObjectPath, member: &'a str) -> Message<'a> {
        Message::method_call(path, member, self.next_serial())
    }

    /// Construct a signal [`Message`] with the next serial.
    pub fn signal<'a>(&mut self, path: &'a ObjectPath, member: &'a str) -> Message<'a> {
        Message::signal(path, member, self.next_serial())
    }

    /// Construct a method return [`Message`] with the next serial, replying
    /// to `reply_serial`.
    pub fn method_return<'a>(&mut self, reply_serial: Serial) -> Message<'a> {
        Message::method_return(reply_serial, self.next_serial())
    }

    /// Construct an error [`Message`] with the next serial, replying to
    /// `reply_serial`.
    pub fn error<'a>(&mut self, error_name: &'a str, reply_serial: Serial) -> Message<'a> {
        Message::error(error_name, reply_serial, self.next_serial())
    }

    /// Frame a message into the buffer.
    ///
    /// The message is written in the byte order of its body, and its header
    /// is padded to the 8-byte boundary the body starts on.
    pub fn write_message(&mut self, message: &Message<'_>) -> Result<Serial> {
        let body = message.body();

        let Some(body_length) = u32::try_from(body.len())
            .ok()
            .filter(|len| (*len as u64) <= MAX_BODY_LENGTH)
        else {
            return Err(Error::new(ErrorKind::BodyTooLong(body.len() as u64)));
        };

        self.buf.set_endianness(body.endianness());
        self.buf.rebase();

        self.buf.extend_from_slice(&[
            body.endianness().to_byte(),
            message.message_type().get(),
            message.flags().get(),
            1,
        ]);
        self.buf.store(body_length);
        self.buf.store(message.serial().get());

        let fields_len = self.buf.reserve::<u32>();
        let start = self.buf.len();

        match message.kind() {
            MessageKind::MethodCall { path, member } => {
                self.field_path(FieldCode::PATH, path);
                self.field_str(FieldCode::MEMBER, member);
            }
            MessageKind::MethodReturn { reply_serial } => {
                self.field_u32(FieldCode::REPLY_SERIAL, reply_serial.get());
            }
            MessageKind::Error {
                error_name,
                reply_serial,
            } => {
                self.field_str(FieldCode::ERROR_NAME, error_name);
                self.field_u32(FieldCode::REPLY_SERIAL, reply_serial.get());
            }
            MessageKind::Signal { path, member } => {
                self.field_path(FieldCode::PATH, path);
                self.field_str(FieldCode::MEMBER, member);
            }
        }

        if let Some(interface) = message.interface() {
            self.field_str(FieldCode::INTERFACE, interface);
        }

        if let Some(destination) = message.destination() {
            self.field_str(FieldCode::DESTINATION, destination);
        }

        if let Some(sender) = message.sender() {
            self.field_str(FieldCode::SENDER, sender);
        }

        if !body.signature().is_empty() {
            self.field_signature(FieldCode::SIGNATURE, body.signature());
        }

        let header_length = self.buf.len() - start;

        let Some(header_length) = u32::try_from(header_length)
            .ok()
            .filter(|len| (*len as u64) <= MAX_HEADER_LENGTH)
        else {
            return Err(Error::new(ErrorKind::HeaderTooLong(header_length as u64)));
        };

        self.buf.store_at(fields_len, header_length);

        self.buf.pad_to(8);
        self.buf.extend_from_slice(body.get());
        Ok(message.serial())
    }

    /// The framed bytes not yet flushed.
    pub(crate) fn bytes(&self) -> &[u8] {
        self.buf.get()
    }

    /// Discard the framed bytes after they have been flushed.
    pub(crate) fn clear(&mut self) {
        self.buf.clear();
    }

    /// A header field holding a string, variant signature `s`.
    fn field_str(&mut self, code: FieldCode, value: &str) {
        self.buf.pad_to(8);
        self.buf.store(code.get());
        self.buf.extend_from_slice(&[1, b's', 0]);
        self.buf.store(value.len() as u32);
        self.buf.extend_from_slice_nul(value.as_bytes());
    }

    /// A header field holding an object path, variant signature `o`.
    fn field_path(&mut self, code: FieldCode, value: &ObjectPath) {
        self.buf.pad_to(8);
        self.buf.store(code.get());
        self.buf.extend_from_slice(&[1, b'o', 0]);
        self.buf.store(value.len() as u32);
        self.buf.extend_from_slice_nul(value.as_bytes());
    }

    /// A header field holding a `u32`, variant signature `u`.
    fn field_u32(&mut self, code: FieldCode, value: u32) {
        self.buf.pad_to(8);
        self.buf.store(code.get());
        self.buf.extend_from_slice(&[1, b'u', 0]);
        self.buf.store(value);
    }

    /// A header field holding a signature, variant signature `g`.
    fn field_signature(&mut self, code: FieldCode, value: &Signature) {
        self.buf.pad_to(8);
        self.buf.store(code.get());
        self.buf.extend_from_slice(&[1, b'g', 0]);
        self.buf.store(value.len() as u8);
        self.buf.extend_from_slice_nul(value.as_bytes());
    }
}

impl Default for SendBuf {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
