use crate::message::OwnedMessageKind;
use crate::{BodyBuf, Flags, Message, MessageKind, Serial};

/// An owned D-Bus message, typically one moved off a receive buffer so it
/// can outlive the next read.
///
/// # Examples
///
/// ```
/// use stdbus::{MessageKind, ObjectPath, SendBuf};
///
/// const PATH: &ObjectPath = ObjectPath::new_const(b"/org/freedesktop/DBus");
///
/// let mut send = SendBuf::new();
///
/// let m = send.method_call(PATH, "Hello").to_owned();
/// assert!(matches!(m.kind(), MessageKind::MethodCall { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBuf {
    kind: OwnedMessageKind,
    serial: Serial,
    flags: Flags,
    interface: Option<String>,
    destination: Option<String>,
    sender: Option<String>,
    body: BodyBuf,
}

impl MessageBuf {
    pub(crate) fn from_message(message: &Message<'_>) -> Self {
        let body = message.body();

        Self {
            kind: OwnedMessageKind::from(message.kind),
            serial: message.serial,
            flags: message.flags,
            interface: message.interface.map(str::to_owned),
            destination: message.destination.map(str::to_owned),
            sender: message.sender.map(str::to_owned),
            body: BodyBuf::from_parts(
                body.get(),
                body.endianness(),
                body.remaining_signature().to_owned(),
            ),
        }
    }

    /// Borrow as a [`Message`].
    pub fn borrow(&self) -> Message<'_> {
        Message {
            kind: self.kind.borrow(),
            serial: self.serial,
            flags: self.flags,
            interface: self.interface.as_deref(),
            destination: self.destination.as_deref(),
            sender: self.sender.as_deref(),
            body: self.body.as_body(),
        }
    }

    /// The kind of the message.
    pub fn kind(&self) -> MessageKind<'_> {
        self.kind.borrow()
    }

    /// The serial of the message.
    pub fn serial(&self) -> Serial {
        self.serial
    }

    /// The flags of the message.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The serial this message replies to, if it is a reply.
    pub fn reply_serial(&self) -> Option<Serial> {
        match self.kind {
            OwnedMessageKind::MethodReturn { reply_serial } => Some(reply_serial),
            OwnedMessageKind::Error { reply_serial, .. } => Some(reply_serial),
            _ => None,
        }
    }
}
