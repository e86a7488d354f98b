use crate::{MessageKind, ObjectPathBuf, Serial};

/// The owned variant of a [`MessageKind`].
///
/// [`MessageKind`]: crate::MessageKind
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OwnedMessageKind {
    MethodCall {
        path: ObjectPathBuf,
        member: String,
    },
    MethodReturn {
        reply_serial: Serial,
    },
    Error {
        error_name: String,
        reply_serial: Serial,
    },
    Signal {
        path: ObjectPathBuf,
        member: String,
    },
}

impl OwnedMessageKind {
    /// Borrow as a [`MessageKind`].
    pub(crate) fn borrow(&self) -> MessageKind<'_> {
        match self {
            OwnedMessageKind::MethodCall { path, member } => MessageKind::MethodCall {
                path: path.as_object_path(),
                member: member.as_str(),
            },
            OwnedMessageKind::MethodReturn { reply_serial } => MessageKind::MethodReturn {
                reply_serial: *reply_serial,
            },
            OwnedMessageKind::Error {
                error_name,
                reply_serial,
            } => MessageKind::Error {
                error_name: error_name.as_str(),
                reply_serial: *reply_serial,
            },
            OwnedMessageKind::Signal { path, member } => MessageKind::Signal {
                path: path.as_object_path(),
                member: member.as_str(),
            },
        }
    }
}

impl From<MessageKind<'_>> for OwnedMessageKind {
    fn from(kind: MessageKind<'_>) -> Self {
        match kind {
            MessageKind::MethodCall { path, member } => OwnedMessageKind::MethodCall {
                path: path.to_owned(),
                member: member.to_owned(),
            },
            MessageKind::MethodReturn { reply_serial } => {
                OwnedMessageKind::MethodReturn { reply_serial }
            }
            MessageKind::Error {
                error_name,
                reply_serial,
            } => OwnedMessageKind::Error {
                error_name: error_name.to_owned(),
                reply_serial,
            },
            MessageKind::Signal { path, member } => OwnedMessageKind::Signal {
                path: path.to_owned(),
                member: member.to_owned(),
            },
        }
    }
}
