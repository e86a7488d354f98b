use crate::connection::expect_return;
use crate::error::Result;
use crate::org_freedesktop_dbus as fdo;
use crate::{
    Body, BodyBuf, Connection, Message, MessageBuf, ObjectPath, ObjectPathBuf, OwnedVariant,
    Variant,
};

/// A client-side handle bundling a destination, a path and an interface,
/// through which typed calls are made.
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
/// let mut body = BodyBuf::new();
/// body.store("org.freedesktop.DBus")?;
///
/// let reply = proxy.call("NameHasOwner", &body)?;
/// assert!(reply.body().load_bool()?);
/// # Ok::<_, stdbus::Error>(())
/// ```
pub struct Proxy<'c> {
    connection: &'c mut Connection,
    destination: String,
    path: ObjectPathBuf,
    interface: String,
}

impl<'c> Proxy<'c> {
    /// Construct a new proxy over the given connection.
    pub fn new(
        connection: &'c mut Connection,
        destination: &str,
        path: &ObjectPath,
        interface: &str,
    ) -> Self {
        Self {
            connection,
            destination: destination.into(),
            path: path.to_owned(),
            interface: interface.into(),
        }
    }

    /// Call a method on the proxy interface.
    ///
    /// An error reply from the peer converts into an [`Error`] carrying the
    /// remote error name.
    ///
    /// [`Error`]: crate::Error
    pub fn call(&mut self, member: &str, body: &BodyBuf) -> Result<Reply> {
        let reply = self.connection.method_call(
            &self.destination,
            &self.path,
            Some(&self.interface),
            member,
            body,
        )?;

        Ok(Reply {
            message: expect_return(reply)?,
        })
    }

    /// Call a method on an explicit interface of the proxy object.
    pub fn call_on(&mut self, interface: &str, member: &str, body: &BodyBuf) -> Result<Reply> {
        let reply = self.connection.method_call(
            &self.destination,
            &self.path,
            Some(interface),
            member,
            body,
        )?;

        Ok(Reply {
            message: expect_return(reply)?,
        })
    }

    /// Read a property of the proxy interface, owning the result.
    pub fn get_property(&mut self, name: &str) -> Result<OwnedVariant> {
        let mut body = BodyBuf::new();
        body.store(self.interface.as_str())?;
        body.store(name)?;

        let reply = self.call_on(fdo::PROPERTIES, "Get", &body)?;
        Ok(reply.body().load_variant()?.to_owned())
    }

    /// Write a property of the proxy interface.
    pub fn set_property(&mut self, name: &str, value: Variant<'_>) -> Result<()> {
        let mut body = BodyBuf::new();
        body.store(self.interface.as_str())?;
        body.store(name)?;
        body.store(value)?;

        self.call_on(fdo::PROPERTIES, "Set", &body)?;
        Ok(())
    }

    /// The destination the proxy calls.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The path the proxy calls.
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// The interface the proxy calls.
    pub fn interface(&self) -> &str {
        &self.interface
    }
}

/// A successful method reply, owning its message.
///
/// # Examples
///
/// ```no_run
/// use stdbus::{BodyBuf, Connection, Proxy};
/// use stdbus::org_freedesktop_dbus as fdo;
///
/// let mut c = Connection::session_bus()?;
/// let mut proxy = Proxy::new(&mut c, fdo::SERVICE, fdo::PATH, fdo::INTERFACE);
///
/// let reply = proxy.call("ListNames", &BodyBuf::new())?;
///
/// let mut body = reply.body();
/// let mut names = body.load_array::<stdbus::ty::Str>()?;
///
/// while let Some(name) = names.load()? {
///     println!("{name}");
/// }
/// # Ok::<_, stdbus::Error>(())
/// ```
pub struct Reply {
    message: MessageBuf,
}

impl core::fmt::Debug for Reply {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reply")
            .field("message", &self.message)
            .finish()
    }
}

impl Reply {
    /// Borrow the reply message.
    pub fn message(&self) -> Message<'_> {
        self.message.borrow()
    }

    /// A reader over the body of the reply.
    pub fn body(&self) -> Body<'_> {
        self.message.borrow().body()
    }
}
