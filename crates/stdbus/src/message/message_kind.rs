use crate::{ObjectPath, Serial};

/// The kind of a [`Message`], together with the header fields required for
/// that kind.
///
/// [`Message`]: crate::Message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind<'a> {
    /// A method call, requiring a path and a member.
    MethodCall {
        /// The path of the object being called.
        path: &'a ObjectPath,
        /// The method being called.
        member: &'a str,
    },
    /// A successful reply, requiring the serial it replies to.
    MethodReturn {
        /// The serial of the call this replies to.
        reply_serial: Serial,
    },
    /// An error reply, requiring an error name and the serial it replies to.
    Error {
        /// The name of the error.
        error_name: &'a str,
        /// The serial of the call this replies to.
        reply_serial: Serial,
    },
    /// A broadcast signal, requiring a path and a member.
    Signal {
        /// The path of the object emitting the signal.
        path: &'a ObjectPath,
        /// The member of the signal being emitted.
        member: &'a str,
    },
}
