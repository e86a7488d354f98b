use crate::proto;
use crate::{Body, BodyBuf, Flags, MessageBuf, MessageKind, ObjectPath, Serial, Signature};

/// A D-Bus message borrowing its fields, either from the caller while being
/// built or from a receive buffer after being parsed.
///
/// Messages are constructed through [`SendBuf`], which assigns their serial.
///
/// [`SendBuf`]: crate::SendBuf
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
/// let m = send
///     .method_call(PATH, "Hello")
///     .with_destination("org.freedesktop.DBus");
///
/// assert!(matches!(m.kind(), MessageKind::MethodCall { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<'a> {
    pub(crate) kind: MessageKind<'a>,
    pub(crate) serial: Serial,
    pub(crate) flags: Flags,
    pub(crate) interface: Option<&'a str>,
    pub(crate) destination: Option<&'a str>,
    pub(crate) sender: Option<&'a str>,
    pub(crate) body: Body<'a>,
}

impl<'a> Message<'a> {
    pub(crate) fn new(kind: MessageKind<'a>, serial: Serial) -> Self {
        Self {
            kind,
            serial,
            flags: Flags::EMPTY,
            interface: None,
            destination: None,
            sender: None,
            body: Body::empty(),
        }
    }

    /// Construct a method call.
    pub(crate) fn method_call(path: &'a ObjectPath, member: &'a str, serial: Serial) -> Self {
        Self::new(MessageKind::MethodCall { path, member }, serial)
    }

    /// Construct a method return replying to `reply_serial`.
    pub(crate) fn method_return(reply_serial: Serial, serial: Serial) -> Self {
        Self::new(MessageKind::MethodReturn { reply_serial }, serial)
    }

    /// Construct an error replying to `reply_serial`.
    pub(crate) fn error(error_name: &'a str, reply_serial: Serial, serial: Serial) -> Self {
        Self::new(
            MessageKind::Error {
                error_name,
                reply_serial,
            },
            serial,
        )
    }

    /// Construct a signal.
    pub(crate) fn signal(path: &'a ObjectPath, member: &'a str, serial: Serial) -> Self {
        Self::new(MessageKind::Signal { path, member }, serial)
    }

    /// The kind of the message.
    pub fn kind(&self) -> MessageKind<'a> {
        self.kind
    }

    /// The serial of the message.
    pub fn serial(&self) -> Serial {
        self.serial
    }

    /// The flags of the message.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The interface of the message, if set.
    pub fn interface(&self) -> Option<&'a str> {
        self.interface
    }

    /// The destination of the message, if set.
    pub fn destination(&self) -> Option<&'a str> {
        self.destination
    }

    /// The sender of the message, if set.
    ///
    /// On messages routed through a bus this is filled in with the unique
    /// name of the sending connection.
    pub fn sender(&self) -> Option<&'a str> {
        self.sender
    }

    /// The signature of the body.
    pub fn signature(&self) -> &'a Signature {
        self.body.signature()
    }

    /// A reader over the body of the message.
    pub fn body(&self) -> Body<'a> {
        self.body.clone()
    }

    /// The serial this message replies to, if it is a reply.
    pub fn reply_serial(&self) -> Option<Serial> {
        match self.kind {
            MessageKind::MethodReturn { reply_serial } => Some(reply_serial),
            MessageKind::Error { reply_serial, .. } => Some(reply_serial),
            _ => None,
        }
    }

    /// Modify the flags of the message.
    pub fn with_flags(self, flags: Flags) -> Self {
        Self { flags, ..self }
    }

    /// Modify the interface of the message.
    pub fn with_interface(self, interface: &'a str) -> Self {
        Self {
            interface: Some(interface),
            ..self
        }
    }

    /// Modify the destination of the message.
    pub fn with_destination(self, destination: &'a str) -> Self {
        Self {
            destination: Some(destination),
            ..self
        }
    }

    /// Modify the sender of the message.
    pub fn with_sender(self, sender: &'a str) -> Self {
        Self {
            sender: Some(sender),
            ..self
        }
    }

    /// Attach a body to the message.
    ///
    /// # Examples
    ///
    /// ```
    /// use stdbus::{BodyBuf, ObjectPath, SendBuf};
    ///
    /// const PATH: &ObjectPath = ObjectPath::new_const(b"/org/freedesktop/DBus");
    ///
    /// let mut send = SendBuf::new();
    /// let mut body = BodyBuf::new();
    /// body.store("NameLost")?;
    ///
    /// let m = send.method_call(PATH, "AddMatch").with_body(&body);
    /// assert_eq!(m.signature(), "s");
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn with_body(self, body: &'a BodyBuf) -> Self {
        Self {
            body: body.as_body(),
            ..self
        }
    }

    /// Copy the message into an owned [`MessageBuf`].
    pub fn to_owned(&self) -> MessageBuf {
        MessageBuf::from_message(self)
    }

    pub(crate) fn message_type(&self) -> proto::MessageType {
        match self.kind {
            MessageKind::MethodCall { .. } => proto::MessageType::METHOD_CALL,
            MessageKind::MethodReturn { .. } => proto::MessageType::METHOD_RETURN,
            MessageKind::Error { .. } => proto::MessageType::ERROR,
            MessageKind::Signal { .. } => proto::MessageType::SIGNAL,
        }
    }
}
