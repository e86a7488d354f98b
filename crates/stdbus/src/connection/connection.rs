use std::collections::VecDeque;
use std::os::unix::net::UnixStream;

use log::{debug, trace, warn};

use crate::address::{Address, Bus};
use crate::connection::object::{introspect_children, machine_id, CallError, Interface, Inventory};
use crate::error::{Error, ErrorKind, Result};
use crate::org_freedesktop_dbus as fdo;
use crate::org_freedesktop_dbus::{MatchRule, RequestNameFlags, RequestNameReply};
use crate::transport::Transport;
use crate::{
    sasl, Body, BodyBuf, Flags, Message, MessageBuf, MessageKind, ObjectPath, ObjectPathBuf,
    RecvBuf, SendBuf, Serial,
};

/// A callback invoked for each received signal matching its registration.
type SignalCallback = Box<dyn FnMut(&Message<'_>)>;

struct SignalHandler {
    interface: String,
    member: String,
    callback: SignalCallback,
}

struct RegisteredObject {
    path: ObjectPathBuf,
    inventory: Inventory,
    object: Box<dyn Interface>,
}

/// A handle to an object registered with [`Connection::register_object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectHandle(usize);

#[cfg(test)]
pub(crate) fn bogus_handle() -> ObjectHandle {
    ObjectHandle(usize::MAX)
}

/// A blocking connection to a D-Bus bus.
///
/// The connection owns the socket, the serial counter, the queue of messages
/// read while waiting for something else, the registered signal handlers and
/// the registered objects. It is not internally synchronized; wrap it in
/// your own lock if it must be shared across threads.
///
/// # Examples
///
/// ```no_run
/// use stdbus::{BodyBuf, Connection};
/// use stdbus::org_freedesktop_dbus as fdo;
///
/// let mut c = Connection::session_bus()?;
///
/// let reply = c.method_call(
///     fdo::SERVICE,
///     fdo::PATH,
///     Some(fdo::INTERFACE),
///     "GetId",
///     &BodyBuf::new(),
/// )?;
///
/// let id = reply.borrow().body().read::<str>()?.to_owned();
/// println!("bus id: {id}");
/// # Ok::<_, stdbus::Error>(())
/// ```
pub struct Connection {
    transport: Transport,
    send: SendBuf,
    recv: RecvBuf,
    pending: VecDeque<MessageBuf>,
    handlers: Vec<SignalHandler>,
    objects: Vec<RegisteredObject>,
    unique_name: Option<String>,
    server_guid: Option<String>,
}

impl Connection {
    /// Connect to the session bus.
    ///
    /// Resolves `DBUS_SESSION_BUS_ADDRESS`, authenticates and performs the
    /// `Hello` handshake with the bus.
    pub fn session_bus() -> Result<Self> {
        Self::connect(Bus::Session)
    }

    /// Connect to the system bus.
    pub fn system_bus() -> Result<Self> {
        Self::connect(Bus::System)
    }

    /// Connect to the accessibility bus.
    pub fn accessibility_bus() -> Result<Self> {
        Self::connect(Bus::Accessibility)
    }

    /// Connect to the given bus.
    pub fn connect(bus: Bus) -> Result<Self> {
        let address = Address::bus(bus)?;
        debug!("Connecting to {:?} at {:?}", bus, address.path());

        let stream = address.connect()?;
        let mut transport = Transport::new(stream);
        let guid = sasl::authenticate(&mut transport)?;
        trace!("Authenticated, server guid {guid}");

        let mut connection = Self::with_transport(transport);
        connection.server_guid = Some(guid);
        connection.hello()?;
        Ok(connection)
    }

    /// Construct a connection over an already established, already
    /// authenticated stream.
    ///
    /// No `Hello` is exchanged, which suits peer-to-peer connections where
    /// the other end is not a bus.
    pub fn from_stream(stream: UnixStream) -> Self {
        Self::with_transport(Transport::new(stream))
    }

    fn with_transport(transport: Transport) -> Self {
        Self {
            transport,
            send: SendBuf::new(),
            recv: RecvBuf::new(),
            pending: VecDeque::new(),
            handlers: Vec::new(),
            objects: Vec::new(),
            unique_name: None,
            server_guid: None,
        }
    }

    /// The unique `:x.y` name the bus assigned to this connection, if it was
    /// learned through `Hello`.
    pub fn unique_name(&self) -> Option<&str> {
        self.unique_name.as_deref()
    }

    /// The GUID the server reported during authentication, if any.
    pub fn server_guid(&self) -> Option<&str> {
        self.server_guid.as_deref()
    }

    /// Perform the mandatory `Hello` call and record the unique name.
    fn hello(&mut self) -> Result<()> {
        let reply = self.method_call(
            fdo::SERVICE,
            fdo::PATH,
            Some(fdo::INTERFACE),
            "Hello",
            &BodyBuf::new(),
        )?;

        let reply = expect_return(reply)?;
        let name = reply.borrow().body().read::<str>()?.to_owned();
        debug!("Connected as {name}");
        self.unique_name = Some(name);
        Ok(())
    }

    /// Issue a method call and block until its reply arrives.
    ///
    /// Messages received in the meantime are buffered, except for signals
    /// with a matching registered handler, which are dispatched and
    /// consumed. The returned message is the reply and can also be of the
    /// error kind; use [`Proxy`] for a client which converts error replies
    /// into [`Error`] values.
    ///
    /// [`Proxy`]: crate::Proxy
    pub fn method_call(
        &mut self,
        destination: &str,
        path: &ObjectPath,
        interface: Option<&str>,
        member: &str,
        body: &BodyBuf,
    ) -> Result<MessageBuf> {
        let mut message = self
            .send
            .method_call(path, member)
            .with_destination(destination)
            .with_body(body);

        if let Some(interface) = interface {
            message = message.with_interface(interface);
        }

        let serial = self.send.write_message(&message)?;
        self.flush()?;
        self.wait_for_reply(serial)
    }

    /// Write a message to the socket.
    ///
    /// Construct messages through [`send_buf`] so they carry a serial from
    /// this connection.
    ///
    /// [`send_buf`]: Self::send_buf
    pub fn send_message(&mut self, message: &Message<'_>) -> Result<Serial> {
        let serial = self.send.write_message(message)?;
        self.flush()?;
        Ok(serial)
    }

    /// The send buffer of the connection, the source of outgoing messages
    /// and serials.
    pub fn send_buf(&mut self) -> &mut SendBuf {
        &mut self.send
    }

    /// Add a match rule on the bus, subscribing this connection to the
    /// signals it selects.
    pub fn add_match(&mut self, rule: &str) -> Result<()> {
        let mut body = BodyBuf::new();
        body.store(rule)?;

        let reply = self.method_call(
            fdo::SERVICE,
            fdo::PATH,
            Some(fdo::INTERFACE),
            "AddMatch",
            &body,
        )?;

        expect_return(reply)?;
        Ok(())
    }

    /// Add a typed match rule on the bus.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stdbus::Connection;
    /// use stdbus::org_freedesktop_dbus::MatchRule;
    ///
    /// let mut c = Connection::session_bus()?;
    ///
    /// c.add_match_rule(
    ///     &MatchRule::signal()
    ///         .interface("org.freedesktop.DBus")
    ///         .member("NameOwnerChanged"),
    /// )?;
    /// # Ok::<_, stdbus::Error>(())
    /// ```
    pub fn add_match_rule(&mut self, rule: &MatchRule) -> Result<()> {
        self.add_match(&rule.to_string())
    }

    /// Request a well-known name, replacing an existing owner if it allows
    /// that and failing instead of queueing.
    pub fn request_name(&mut self, name: &str) -> Result<RequestNameReply> {
        let flags = RequestNameFlags::REPLACE_EXISTING | RequestNameFlags::DO_NOT_QUEUE;

        let mut body = BodyBuf::new();
        body.store(name)?;
        body.store(flags.get())?;

        let reply = self.method_call(
            fdo::SERVICE,
            fdo::PATH,
            Some(fdo::INTERFACE),
            "RequestName",
            &body,
        )?;

        let reply = expect_return(reply)?;
        let code = reply.borrow().body().load::<u32>()?;
        Ok(RequestNameReply::from_u32(code))
    }

    /// Register a callback for signals matching the given interface and
    /// member.
    ///
    /// Matching signals are dispatched synchronously on this thread while
    /// the connection reads messages, and are consumed by the dispatch.
    pub fn register_signal_handler<F>(&mut self, interface: &str, member: &str, callback: F)
    where
        F: FnMut(&Message<'_>) + 'static,
    {
        self.handlers.push(SignalHandler {
            interface: interface.into(),
            member: member.into(),
            callback: Box::new(callback),
        });
    }

    /// Export an object at the given path, claiming the given well-known
    /// name.
    ///
    /// The object is served while the connection sits in [`serve`]. The
    /// returned handle addresses the registration in
    /// [`emit_signal`].
    ///
    /// [`serve`]: Self::serve
    /// [`emit_signal`]: Self::emit_signal
    pub fn register_object(
        &mut self,
        bus_name: &str,
        path: &ObjectPath,
        object: Box<dyn Interface>,
    ) -> Result<ObjectHandle> {
        let reply = self.request_name(bus_name)?;

        if !reply.is_owner() {
            return Err(Error::new(ErrorKind::NameNotAcquired(reply)));
        }

        let inventory = object.inventory();
        debug!(
            "Registering {} at {path} as {bus_name}",
            inventory.interface()
        );

        self.objects.push(RegisteredObject {
            path: path.to_owned(),
            inventory,
            object,
        });

        Ok(ObjectHandle(self.objects.len() - 1))
    }

    /// Emit one of the signals declared by a registered object.
    ///
    /// The signal carries the path and interface the object was registered
    /// under. Emitting a signal the inventory does not declare is refused.
    pub fn emit_signal(
        &mut self,
        handle: ObjectHandle,
        member: &str,
        body: &BodyBuf,
    ) -> Result<()> {
        let Some(object) = self.objects.get(handle.0) else {
            return Err(Error::new(ErrorKind::InvalidHandle(handle.0)));
        };

        if object.inventory.find_signal(member).is_none() {
            return Err(Error::new(ErrorKind::SignalNotBound(member.into())));
        }

        let message = self
            .send
            .signal(&object.path, member)
            .with_interface(object.inventory.interface())
            .with_body(body);

        self.send.write_message(&message)?;
        self.flush()
    }

    /// Reply to a method call with the given body.
    ///
    /// The reply correlates through the request serial and is addressed to
    /// the request sender, if one is known. Requests which do not expect a
    /// reply are honored by sending nothing.
    pub fn send_reply(&mut self, request: &Message<'_>, body: &BodyBuf) -> Result<()> {
        if request.flags().contains(Flags::NO_REPLY_EXPECTED) {
            return Ok(());
        }

        let mut message = self.send.method_return(request.serial()).with_body(body);

        if let Some(sender) = request.sender() {
            message = message.with_destination(sender);
        }

        self.send.write_message(&message)?;
        self.flush()
    }

    /// Reply to a method call with an error.
    pub fn send_error(
        &mut self,
        request: &Message<'_>,
        error_name: &str,
        error_message: &str,
    ) -> Result<()> {
        if request.flags().contains(Flags::NO_REPLY_EXPECTED) {
            return Ok(());
        }

        let mut body = BodyBuf::new();
        body.store(error_message)?;

        let mut message = self
            .send
            .error(error_name, request.serial())
            .with_body(&body);

        if let Some(sender) = request.sender() {
            message = message.with_destination(sender);
        }

        self.send.write_message(&message)?;
        self.flush()
    }

    /// Block until a message arrives which is not consumed by a registered
    /// signal handler, and return it.
    ///
    /// Messages buffered while waiting for a reply are drained first.
    pub fn wait_message(&mut self) -> Result<MessageBuf> {
        if let Some(message) = self.pending.pop_front() {
            return Ok(message);
        }

        loop {
            self.recv.read_frame(&mut self.transport)?;
            let message = self.recv.message()?;

            if let MessageKind::Signal { member, .. } = message.kind() {
                if dispatch_signal(&mut self.handlers, member, &message) {
                    continue;
                }
            }

            return Ok(message.to_owned());
        }
    }

    /// Serve registered objects forever.
    ///
    /// Routes each incoming method call to the matching registered object,
    /// answering the standard `Introspectable`, `Properties` and `Peer`
    /// interfaces inline. Signals keep being dispatched to registered
    /// handlers; other messages are logged and dropped.
    pub fn serve(&mut self) -> Result<()> {
        loop {
            self.recv.read_frame(&mut self.transport)?;
            let message = self.recv.message()?;

            match message.kind() {
                MessageKind::MethodCall { path, member } => {
                    dispatch_call(
                        &mut self.send,
                        &mut self.transport,
                        &mut self.objects,
                        &message,
                        path,
                        member,
                    )?;
                }
                MessageKind::Signal { member, .. } => {
                    if !dispatch_signal(&mut self.handlers, member, &message) {
                        debug!("Dropping unclaimed signal {member}");
                    }
                }
                _ => {
                    debug!("Ignoring message while serving: {:?}", message.kind());
                }
            }
        }
    }

    /// Close the connection, dropping buffered messages and registered
    /// objects and shutting the socket down.
    ///
    /// Dropping the connection does the same; this only spells it out.
    pub fn close(self) {}

    /// Block until the reply to `serial` arrives.
    fn wait_for_reply(&mut self, serial: Serial) -> Result<MessageBuf> {
        let at = self
            .pending
            .iter()
            .position(|message| message.reply_serial() == Some(serial));

        if let Some(message) = at.and_then(|at| self.pending.remove(at)) {
            return Ok(message);
        }

        loop {
            self.recv.read_frame(&mut self.transport)?;
            let message = self.recv.message()?;

            if message.reply_serial() == Some(serial) {
                return Ok(message.to_owned());
            }

            match message.kind() {
                MessageKind::Signal { member, .. } => {
                    if !dispatch_signal(&mut self.handlers, member, &message) {
                        self.pending.push_back(message.to_owned());
                    }
                }
                _ => {
                    self.pending.push_back(message.to_owned());
                }
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.transport.send_all(self.send.bytes())?;
        self.send.clear();
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.pending.clear();
        self.objects.clear();
        self.transport.shutdown();
    }
}

/// Convert an error reply into an [`Error`], passing other messages
/// through.
pub(crate) fn expect_return(message: MessageBuf) -> Result<MessageBuf> {
    if let MessageKind::Error { error_name, .. } = message.kind() {
        let error_name = error_name.to_owned();
        let borrowed = message.borrow();
        let mut body = borrowed.body();

        let error_message = match body.signature().as_bytes().first() {
            Some(b's') => body.read::<str>().ok(),
            _ => None,
        };

        return Err(Error::remote(&error_name, error_message));
    }

    Ok(message)
}

/// Invoke every handler matching the signal. Returns whether any handler
/// matched.
fn dispatch_signal(handlers: &mut [SignalHandler], member: &str, message: &Message<'_>) -> bool {
    let interface = message.interface();
    let mut matched = false;

    for handler in handlers.iter_mut() {
        if handler.member != member || Some(handler.interface.as_str()) != interface {
            continue;
        }

        trace!("Dispatching signal {}.{member}", handler.interface);
        (handler.callback)(message);
        matched = true;
    }

    matched
}

/// Route an incoming method call to a registered object and answer it.
fn dispatch_call(
    send: &mut SendBuf,
    transport: &mut Transport,
    objects: &mut [RegisteredObject],
    message: &Message<'_>,
    path: &ObjectPath,
    member: &str,
) -> Result<()> {
    let Some(at) = objects.iter().position(|object| object.path == *path) else {
        return dispatch_unregistered(send, transport, objects, message, path, member);
    };

    // Collect the first-level children of this path for introspection
    // before borrowing the target object.
    let children = child_names(objects, path);
    let object = &mut objects[at];

    let interface = message.interface();
    let mut body = message.body();

    let outcome = if interface == Some(fdo::INTROSPECTABLE) && member == "Introspect" {
        let names = children.iter().map(String::as_str).collect::<Vec<_>>();
        let xml = object.inventory.introspect(&names);

        let mut reply = BodyBuf::new();
        reply.store(xml)?;
        Ok(reply)
    } else if interface == Some(fdo::PROPERTIES) {
        dispatch_properties(send, transport, object, message, member, &mut body)?
    } else if interface == Some(fdo::PEER) {
        dispatch_peer(member)
    } else if interface.is_none() || interface == Some(object.inventory.interface()) {
        match object.inventory.find_method(member) {
            Some(..) => object.object.call(member, &mut body),
            None => Err(CallError::UnknownMethod),
        }
    } else {
        Err(CallError::UnknownMethod)
    };

    match outcome {
        Ok(reply) => send_reply_to(send, transport, message, &reply),
        Err(error) => send_error_to(
            send,
            transport,
            message,
            error.name(),
            &error.message(member),
        ),
    }
}

/// Handle the `org.freedesktop.DBus.Properties` interface for an object.
///
/// Successful writes also emit the `PropertiesChanged` signal. The outer
/// result covers connection failures while emitting it; the inner result is
/// what gets replied to the caller.
fn dispatch_properties(
    send: &mut SendBuf,
    transport: &mut Transport,
    object: &mut RegisteredObject,
    message: &Message<'_>,
    member: &str,
    body: &mut Body<'_>,
) -> Result<Result<BodyBuf, CallError>> {
    match member {
        "Get" => Ok(properties_get(object, body)),
        "GetAll" => Ok(properties_get_all(object, body)),
        "Set" => {
            let outcome = properties_set(object, body);

            if let Ok((name, ..)) = &outcome {
                emit_properties_changed(send, transport, object, name)?;
            }

            Ok(outcome.map(|(.., reply)| reply))
        }
        _ => Ok(Err(CallError::UnknownMethod)),
    }
}

fn properties_get(object: &RegisteredObject, body: &mut Body<'_>) -> Result<BodyBuf, CallError> {
    let interface = body.read::<str>()?;
    let name = body.read::<str>()?;

    if interface != object.inventory.interface() {
        return Err(CallError::UnknownProperty);
    }

    let Some(property) = object.inventory.find_property(name) else {
        return Err(CallError::UnknownProperty);
    };

    if !property.access.is_readable() {
        // Write-only properties exist; answering with an error beats
        // leaving the caller to time out.
        return Err(CallError::InvalidArgs);
    }

    let value = object.object.get_property(name)?;

    let mut reply = BodyBuf::new();
    reply.store(value.as_variant())?;
    Ok(reply)
}

fn properties_get_all(
    object: &RegisteredObject,
    body: &mut Body<'_>,
) -> Result<BodyBuf, CallError> {
    let interface = body.read::<str>()?;

    let mut reply = BodyBuf::new();
    let mut dict = reply.store_dict::<crate::ty::Str, crate::ty::Variant>()?;

    if interface == object.inventory.interface() {
        for property in object.inventory.readable_properties() {
            let value = object.object.get_property(&property.name)?;
            dict.store(property.name.as_str(), &value);
        }
    }

    dict.finish()?;
    Ok(reply)
}

/// Write a property, returning its name alongside the empty reply so that
/// the change can be signalled.
fn properties_set<'m>(
    object: &mut RegisteredObject,
    body: &mut Body<'m>,
) -> Result<(&'m str, BodyBuf), CallError> {
    let interface = body.read::<str>()?;
    let name = body.read::<str>()?;
    let value = body.load_variant()?;

    if interface != object.inventory.interface() {
        return Err(CallError::UnknownProperty);
    }

    let Some(property) = object.inventory.find_property(name) else {
        return Err(CallError::UnknownProperty);
    };

    if !property.access.is_writable() {
        return Err(CallError::InvalidArgs);
    }

    if *property.signature != *value.signature() {
        return Err(CallError::InvalidArgs);
    }

    object.object.set_property(name, value)?;
    Ok((name, BodyBuf::new()))
}

fn dispatch_peer(member: &str) -> Result<BodyBuf, CallError> {
    match member {
        "Ping" => Ok(BodyBuf::new()),
        "GetMachineId" => {
            let mut reply = BodyBuf::new();
            reply.store(machine_id()?)?;
            Ok(reply)
        }
        _ => Err(CallError::UnknownMethod),
    }
}

/// Emit `PropertiesChanged` for a property which was just written, carrying
/// its freshly read value.
fn emit_properties_changed(
    send: &mut SendBuf,
    transport: &mut Transport,
    object: &RegisteredObject,
    name: &str,
) -> Result<()> {
    let Ok(value) = object.object.get_property(name) else {
        return Ok(());
    };

    let mut body = BodyBuf::new();
    body.store(object.inventory.interface())?;

    let mut changed = body.store_dict::<crate::ty::Str, crate::ty::Variant>()?;
    changed.store(name, &value);
    changed.finish()?;

    let invalidated = body.store_array::<crate::ty::Str>()?;
    invalidated.finish()?;

    let message = send
        .signal(&object.path, "PropertiesChanged")
        .with_interface(fdo::PROPERTIES)
        .with_body(&body);

    send.write_message(&message)?;
    transport.send_all(send.bytes())?;
    send.clear();
    Ok(())
}

/// Answer a call on a path no object is registered under.
///
/// Introspection of an ancestor of registered objects enumerates its
/// children; everything else is an error.
fn dispatch_unregistered(
    send: &mut SendBuf,
    transport: &mut Transport,
    objects: &[RegisteredObject],
    message: &Message<'_>,
    path: &ObjectPath,
    member: &str,
) -> Result<()> {
    let children = child_names(objects, path);

    if message.interface() == Some(fdo::INTROSPECTABLE)
        && member == "Introspect"
        && !children.is_empty()
    {
        let names = children.iter().map(String::as_str).collect::<Vec<_>>();

        let mut reply = BodyBuf::new();
        reply.store(introspect_children(&names))?;
        return send_reply_to(send, transport, message, &reply);
    }

    warn!("Call to unregistered path {path}");

    send_error_to(
        send,
        transport,
        message,
        fdo::error_name::UNKNOWN_METHOD,
        &format!("No object at path {path}"),
    )
}

/// The unique first-level child segments of registered object paths below
/// `path`.
fn child_names(objects: &[RegisteredObject], path: &ObjectPath) -> Vec<String> {
    let mut children: Vec<String> = Vec::new();

    for object in objects {
        let Some(segment) = path.child_segment_of(&object.path) else {
            continue;
        };

        if !children.iter().any(|child| child == segment) {
            children.push(segment.to_owned());
        }
    }

    children
}

fn send_reply_to(
    send: &mut SendBuf,
    transport: &mut Transport,
    request: &Message<'_>,
    body: &BodyBuf,
) -> Result<()> {
    if request.flags().contains(Flags::NO_REPLY_EXPECTED) {
        return Ok(());
    }

    let mut message = send.method_return(request.serial()).with_body(body);

    if let Some(sender) = request.sender() {
        message = message.with_destination(sender);
    }

    send.write_message(&message)?;
    transport.send_all(send.bytes())?;
    send.clear();
    Ok(())
}

fn send_error_to(
    send: &mut SendBuf,
    transport: &mut Transport,
    request: &Message<'_>,
    error_name: &str,
    error_message: &str,
) -> Result<()> {
    if request.flags().contains(Flags::NO_REPLY_EXPECTED) {
        return Ok(());
    }

    let mut body = BodyBuf::new();
    body.store(error_message)?;

    let mut message = send.error(error_name, request.serial()).with_body(&body);

    if let Some(sender) = request.sender() {
        message = message.with_destination(sender);
    }

    send.write_message(&message)?;
    transport.send_all(send.bytes())?;
    send.clear();
    Ok(())
}
