use std::io;

use core::fmt;
use core::str::Utf8Error;

use crate::{ObjectPathError, Signature, SignatureBuf, SignatureError};

/// Result alias using an [`Error`] as the error type by default.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// An error raised by this crate.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    #[inline]
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Self { kind }
    }

    /// Construct an error representing an error reply from a peer.
    #[inline]
    pub(crate) fn remote(name: &str, message: Option<&str>) -> Error {
        Self::new(ErrorKind::Remote {
            name: name.into(),
            message: message.map(Box::from),
        })
    }

    /// The D-Bus error name, if this error is an error reply from a peer.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stdbus::{BodyBuf, Connection, ObjectPath, Proxy};
    ///
    /// const PATH: &ObjectPath = ObjectPath::new_const(b"/org/freedesktop/DBus");
    ///
    /// let mut c = Connection::session_bus()?;
    /// let mut proxy = Proxy::new(&mut c, "org.freedesktop.DBus", PATH, "org.freedesktop.DBus");
    ///
    /// let error = proxy.call("NoSuchMethod", &BodyBuf::new()).unwrap_err();
    /// assert!(error.remote_name().is_some());
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn remote_name(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Remote { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The human-readable message of an error reply from a peer, if present.
    pub fn remote_message(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Remote { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl From<SignatureError> for Error {
    #[inline]
    fn from(error: SignatureError) -> Self {
        Self::new(ErrorKind::Signature(error))
    }
}

impl From<ObjectPathError> for Error {
    #[inline]
    fn from(error: ObjectPathError) -> Self {
        Self::new(ErrorKind::ObjectPath(error))
    }
}

impl From<io::Error> for Error {
    #[inline]
    fn from(error: io::Error) -> Self {
        Self::new(ErrorKind::Io(error))
    }
}

impl From<Utf8Error> for Error {
    #[inline]
    fn from(error: Utf8Error) -> Self {
        Self::new(ErrorKind::Utf8Error(error))
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ErrorKind::Io(..) => write!(f, "I/O error"),
            ErrorKind::Signature(..) => write!(f, "Signature error"),
            ErrorKind::ObjectPath(..) => write!(f, "Object path error"),
            ErrorKind::Utf8Error(..) => write!(f, "UTF-8 error"),
            ErrorKind::EnvVarNotFound(var) => {
                write!(f, "Environment variable `{var}` is not set")
            }
            ErrorKind::InvalidAddress(address) => {
                write!(f, "Unsupported bus address `{address}`")
            }
            ErrorKind::HandshakeFailed(reason) => {
                write!(f, "Authentication handshake failed: {reason}")
            }
            ErrorKind::UnexpectedEof => write!(f, "Connection closed mid-message"),
            ErrorKind::BadEndianFlag(byte) => {
                write!(f, "Invalid endianness marker {byte:#04x} in message header")
            }
            ErrorKind::InvalidMessageType(ty) => {
                write!(f, "Invalid message type {ty:#04x} in message header")
            }
            ErrorKind::InvalidProtocolVersion(version) => {
                write!(f, "Unsupported major protocol version {version}")
            }
            ErrorKind::UnknownHeaderField(code) => {
                write!(f, "Unknown header field code {code}")
            }
            ErrorKind::BadHeaderField(code) => {
                write!(f, "Header field {code} carries an unexpected type")
            }
            ErrorKind::ZeroSerial => write!(f, "Zero serial in message header"),
            ErrorKind::ZeroReplySerial => write!(f, "Zero REPLY_SERIAL header field"),
            ErrorKind::MissingPath => write!(f, "Missing required PATH header field"),
            ErrorKind::MissingInterface => {
                write!(f, "Missing required INTERFACE header field")
            }
            ErrorKind::MissingMember => write!(f, "Missing required MEMBER header field"),
            ErrorKind::MissingReplySerial => {
                write!(f, "Missing required REPLY_SERIAL header field")
            }
            ErrorKind::MissingErrorName => {
                write!(f, "Missing required ERROR_NAME header field")
            }
            ErrorKind::NotNullTerminated => write!(f, "String is not NUL terminated"),
            ErrorKind::EndOfBody => write!(f, "Read past the end of the body"),
            ErrorKind::SignatureMismatch { expected, actual } => {
                write!(f, "Expected signature `{expected}`, but found `{actual}`")
            }
            ErrorKind::SignatureEnd(expected) => {
                write!(f, "Expected signature `{expected}`, but body signature is exhausted")
            }
            ErrorKind::InvalidBool(value) => {
                write!(f, "Boolean must be 0 or 1, got {value}")
            }
            ErrorKind::ArrayTooLong(length) => {
                write!(f, "Array of length {length} is too long (max is 67108864)")
            }
            ErrorKind::BodyTooLong(length) => {
                write!(f, "Body of length {length} is too long (max is 134217728)")
            }
            ErrorKind::HeaderTooLong(length) => {
                write!(f, "Header of length {length} is too long (max is 134217728)")
            }
            ErrorKind::UnsupportedVariant(signature) => {
                write!(f, "Unsupported variant signature {signature:?}")
            }
            ErrorKind::SignalNotBound(member) => {
                write!(f, "Signal `{member}` is not declared by the registered object")
            }
            ErrorKind::InvalidHandle(handle) => {
                write!(f, "No object is registered under handle {handle}")
            }
            ErrorKind::NameNotAcquired(reply) => {
                write!(f, "Could not acquire bus name: {reply:?}")
            }
            ErrorKind::Remote { name, message } => match message {
                Some(message) => write!(f, "Peer replied with error {name}: {message}"),
                None => write!(f, "Peer replied with error {name}"),
            },
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(error) => Some(error),
            ErrorKind::Signature(error) => Some(error),
            ErrorKind::ObjectPath(error) => Some(error),
            ErrorKind::Utf8Error(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) enum ErrorKind {
    Io(io::Error),
    Signature(SignatureError),
    ObjectPath(ObjectPathError),
    Utf8Error(Utf8Error),
    EnvVarNotFound(&'static str),
    InvalidAddress(Box<str>),
    HandshakeFailed(Box<str>),
    UnexpectedEof,
    BadEndianFlag(u8),
    InvalidMessageType(u8),
    InvalidProtocolVersion(u8),
    UnknownHeaderField(u8),
    BadHeaderField(u8),
    ZeroSerial,
    ZeroReplySerial,
    MissingPath,
    MissingInterface,
    MissingMember,
    MissingReplySerial,
    MissingErrorName,
    NotNullTerminated,
    EndOfBody,
    SignatureMismatch {
        expected: SignatureBuf,
        actual: SignatureBuf,
    },
    SignatureEnd(SignatureBuf),
    InvalidBool(u32),
    ArrayTooLong(u64),
    BodyTooLong(u64),
    HeaderTooLong(u64),
    UnsupportedVariant(Box<Signature>),
    SignalNotBound(Box<str>),
    InvalidHandle(usize),
    NameNotAcquired(crate::org_freedesktop_dbus::RequestNameReply),
    Remote {
        name: Box<str>,
        message: Option<Box<str>>,
    },
}
