//! Names, flags and helpers for talking to the `org.freedesktop.DBus`
//! message bus service and the standard interfaces it defines.

use core::fmt;

use crate::ObjectPath;

/// The well-known name of the message bus itself.
pub const SERVICE: &str = "org.freedesktop.DBus";

/// The object path of the message bus itself.
pub const PATH: &ObjectPath = ObjectPath::new_const(b"/org/freedesktop/DBus");

/// The interface of the message bus itself.
pub const INTERFACE: &str = "org.freedesktop.DBus";

/// The standard introspection interface, answered by every exported object.
pub const INTROSPECTABLE: &str = "org.freedesktop.DBus.Introspectable";

/// The standard properties interface, answered by every exported object.
pub const PROPERTIES: &str = "org.freedesktop.DBus.Properties";

/// The standard peer interface, answered by every exported object.
pub const PEER: &str = "org.freedesktop.DBus.Peer";

/// Well-known error names.
pub mod error_name {
    /// The called method does not exist.
    pub const UNKNOWN_METHOD: &str = "org.freedesktop.DBus.Error.UnknownMethod";

    /// An argument was malformed or referred to something which does not
    /// exist, such as an unknown property.
    pub const INVALID_ARGS: &str = "org.freedesktop.DBus.Error.InvalidArgs";

    /// A catch-all for failures inside a handler.
    pub const FAILED: &str = "org.freedesktop.DBus.Error.Failed";
}

/// Flags for [`RequestName`].
///
/// [`RequestName`]: crate::Connection::request_name
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct RequestNameFlags(u32);

impl RequestNameFlags {
    /// No flags.
    pub const EMPTY: Self = Self(0);

    /// Allow another connection to take the name over later.
    pub const ALLOW_REPLACEMENT: Self = Self(0x1);

    /// Take the name over from its current owner if it allows that.
    pub const REPLACE_EXISTING: Self = Self(0x2);

    /// Fail instead of queueing if the name is taken.
    pub const DO_NOT_QUEUE: Self = Self(0x4);

    /// The raw wire value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::ops::BitOr for RequestNameFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The reply of a [`RequestName`] call.
///
/// [`RequestName`]: crate::Connection::request_name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RequestNameReply {
    /// The connection is now the primary owner of the name.
    PrimaryOwner,
    /// The name is taken and the connection was placed in its queue.
    InQueue,
    /// The name is taken and the connection chose not to queue.
    Exists,
    /// The connection already owned the name.
    AlreadyOwner,
    /// A reply code this library does not know about.
    Unknown(u32),
}

impl RequestNameReply {
    pub(crate) fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::PrimaryOwner,
            2 => Self::InQueue,
            3 => Self::Exists,
            4 => Self::AlreadyOwner,
            other => Self::Unknown(other),
        }
    }

    /// Test if the connection ended up owning the name.
    pub fn is_owner(self) -> bool {
        matches!(self, Self::PrimaryOwner | Self::AlreadyOwner)
    }
}

/// A builder for bus match rules, used to subscribe to signals.
///
/// # Examples
///
/// ```
/// use stdbus::org_freedesktop_dbus::MatchRule;
///
/// let rule = MatchRule::signal()
///     .interface("org.freedesktop.DBus")
///     .member("NameOwnerChanged");
///
/// assert_eq!(
///     rule.to_string(),
///     "type='signal',interface='org.freedesktop.DBus',member='NameOwnerChanged'"
/// );
/// ```
#[derive(Default, Debug, Clone)]
pub struct MatchRule {
    message_type: Option<&'static str>,
    sender: Option<String>,
    interface: Option<String>,
    member: Option<String>,
    path: Option<String>,
}

impl MatchRule {
    /// A rule with no criteria, matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A rule matching signals.
    pub fn signal() -> Self {
        Self {
            message_type: Some("signal"),
            ..Self::default()
        }
    }

    /// Match the sender of a message.
    pub fn sender(mut self, sender: &str) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Match the interface of a message.
    pub fn interface(mut self, interface: &str) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Match the member of a message.
    pub fn member(mut self, member: &str) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Match the object path of a message.
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;

        let mut item = |f: &mut fmt::Formatter<'_>, key: &str, value: &str| {
            if !core::mem::take(&mut first) {
                write!(f, ",")?;
            }

            write!(f, "{key}='{value}'")
        };

        if let Some(value) = self.message_type {
            item(f, "type", value)?;
        }

        if let Some(value) = &self.sender {
            item(f, "sender", value)?;
        }

        if let Some(value) = &self.interface {
            item(f, "interface", value)?;
        }

        if let Some(value) = &self.member {
            item(f, "member", value)?;
        }

        if let Some(value) = &self.path {
            item(f, "path", value)?;
        }

        Ok(())
    }
}
