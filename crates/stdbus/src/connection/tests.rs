use core::num::NonZeroU32;
use std::cell::RefCell;
use std::os::unix::net::UnixStream;
use std::rc::Rc;
use std::thread;

use crate::connection::object::{CallError, Interface, Inventory};
use crate::error::ErrorKind;
use crate::org_freedesktop_dbus as fdo;
use crate::{
    ty, Access, Body, BodyBuf, Connection, MessageKind, ObjectPath, OwnedVariant, Proxy, Serial,
    Signature, Variant,
};

const TEST_PATH: &ObjectPath = ObjectPath::new_const(b"/dev/myinterface/test");
const TEST_INTERFACE: &str = "dev.myinterface.test";

fn serial(n: u32) -> Serial {
    Serial::new(NonZeroU32::new(n).unwrap())
}

/// The exported object of the end-to-end tests: one method, one read-write
/// property, one declared signal.
struct TestObject {
    count: i32,
}

impl Interface for TestObject {
    fn inventory(&self) -> Inventory {
        Inventory::new(TEST_INTERFACE)
            .method("Testing", Signature::EMPTY, Signature::STRING)
            .property("Count", Signature::INT32, Access::ReadWrite)
            .signal("Changed", Signature::INT32)
    }

    fn call(&mut self, member: &str, _: &mut Body<'_>) -> Result<BodyBuf, CallError> {
        match member {
            "Testing" => {
                let mut reply = BodyBuf::new();
                reply.store("Hello")?;
                Ok(reply)
            }
            _ => Err(CallError::UnknownMethod),
        }
    }

    fn get_property(&self, name: &str) -> Result<OwnedVariant, CallError> {
        match name {
            "Count" => Ok(OwnedVariant::Int32(self.count)),
            _ => Err(CallError::UnknownProperty),
        }
    }

    fn set_property(&mut self, name: &str, value: Variant<'_>) -> Result<(), CallError> {
        match (name, value) {
            ("Count", Variant::Int32(count)) => {
                self.count = count;
                Ok(())
            }
            _ => Err(CallError::UnknownProperty),
        }
    }
}

/// Answer the `RequestName` call a registering connection makes, as the bus
/// would.
fn grant_request_name(bus: &mut Connection) {
    let message = bus.wait_message().unwrap();
    let borrowed = message.borrow();

    match borrowed.kind() {
        MessageKind::MethodCall { path, member } => {
            assert_eq!(path, fdo::PATH);
            assert_eq!(member, "RequestName");
        }
        other => panic!("expected RequestName, got {other:?}"),
    }

    let mut reply = BodyBuf::new();
    reply.store(1u32).unwrap();
    bus.send_reply(&borrowed, &reply).unwrap();
}

#[test]
fn replies_are_correlated_and_other_traffic_is_buffered() {
    let (near, far) = UnixStream::pair().unwrap();

    let peer = thread::spawn(move || {
        let mut peer = Connection::from_stream(far);
        let send = peer.send_buf();

        // An unrelated signal, an unrelated reply and finally the reply the
        // caller is waiting for.
        let signal = send
            .signal(ObjectPath::new_const(b"/sig"), "Ping")
            .with_interface("test.Iface")
            .to_owned();

        let unrelated = send.method_return(serial(99)).to_owned();

        let mut body = BodyBuf::new();
        body.store("hi").unwrap();
        let reply = send.method_return(serial(1)).with_body(&body).to_owned();

        peer.send_message(&signal.borrow()).unwrap();
        peer.send_message(&unrelated.borrow()).unwrap();
        peer.send_message(&reply.borrow()).unwrap();
    });

    let mut c = Connection::from_stream(near);

    let reply = c
        .method_call("test.Peer", TEST_PATH, Some(TEST_INTERFACE), "Hi", &BodyBuf::new())
        .unwrap();

    assert_eq!(reply.reply_serial(), Some(serial(1)));
    assert_eq!(reply.borrow().body().read::<str>().unwrap(), "hi");

    // What was read past while waiting is observable afterwards, in order.
    let buffered = c.wait_message().unwrap();
    assert!(matches!(buffered.kind(), MessageKind::Signal { .. }));

    let buffered = c.wait_message().unwrap();
    assert_eq!(buffered.reply_serial(), Some(serial(99)));

    peer.join().unwrap();
}

#[test]
fn matching_signals_are_dispatched_and_consumed() {
    let (near, far) = UnixStream::pair().unwrap();

    let peer = thread::spawn(move || {
        let mut peer = Connection::from_stream(far);
        let send = peer.send_buf();

        let mut body = BodyBuf::new();
        body.store(7i32).unwrap();

        let matching = send
            .signal(TEST_PATH, "Changed")
            .with_interface(TEST_INTERFACE)
            .with_body(&body)
            .to_owned();

        let other = send
            .signal(TEST_PATH, "Other")
            .with_interface(TEST_INTERFACE)
            .to_owned();

        let reply = send.method_return(serial(1)).to_owned();

        peer.send_message(&matching.borrow()).unwrap();
        peer.send_message(&other.borrow()).unwrap();
        peer.send_message(&reply.borrow()).unwrap();
    });

    let mut c = Connection::from_stream(near);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let capture = Rc::clone(&seen);

    c.register_signal_handler(TEST_INTERFACE, "Changed", move |message| {
        let value = message.body().load::<i32>().unwrap();
        capture.borrow_mut().push(value);
    });

    c.method_call("test.Peer", TEST_PATH, None, "Hi", &BodyBuf::new())
        .unwrap();

    // The matching signal was consumed by the handler during the call.
    assert_eq!(*seen.borrow(), [7]);

    // The non-matching one is still observable.
    let leftover = c.wait_message().unwrap();

    match leftover.kind() {
        MessageKind::Signal { member, .. } => assert_eq!(member, "Other"),
        other => panic!("expected signal, got {other:?}"),
    }

    peer.join().unwrap();
}

#[test]
fn serves_methods_properties_and_introspection() {
    let (near, far) = UnixStream::pair().unwrap();

    let caller = thread::spawn(move || {
        let mut c = Connection::from_stream(far);

        grant_request_name(&mut c);

        // Introspection names the method, the property and the standard
        // interfaces.
        let reply = c
            .method_call(
                TEST_INTERFACE,
                TEST_PATH,
                Some(fdo::INTROSPECTABLE),
                "Introspect",
                &BodyBuf::new(),
            )
            .unwrap();

        let borrowed = reply.borrow();
        let xml = borrowed.body().read::<str>().unwrap();

        let node = stdbus_xml::parse_node(xml).unwrap();
        let interfaces = node
            .interfaces
            .iter()
            .map(|interface| interface.name)
            .collect::<Vec<_>>();

        assert!(interfaces.contains(&TEST_INTERFACE));
        assert!(interfaces.contains(&fdo::INTROSPECTABLE));
        assert!(interfaces.contains(&fdo::PROPERTIES));

        let testing = node
            .interfaces
            .iter()
            .find(|interface| interface.name == TEST_INTERFACE)
            .unwrap();

        let method = testing
            .methods
            .iter()
            .find(|method| method.name == "Testing")
            .unwrap();

        assert_eq!(method.arguments.len(), 1);
        assert_eq!(method.arguments[0].ty, "s");
        assert!(matches!(
            method.arguments[0].direction,
            stdbus_xml::Direction::Out
        ));

        assert!(testing
            .properties
            .iter()
            .any(|property| property.name == "Count"));

        {
            // A plain method call.
            let mut proxy = Proxy::new(&mut c, TEST_INTERFACE, TEST_PATH, TEST_INTERFACE);
            let reply = proxy.call("Testing", &BodyBuf::new()).unwrap();
            assert_eq!(reply.body().read::<str>().unwrap(), "Hello");

            // Setting a property emits PropertiesChanged before the empty
            // reply; the signal is buffered while the reply is awaited.
            proxy.set_property("Count", Variant::Int32(7)).unwrap();
            assert_eq!(proxy.get_property("Count").unwrap(), OwnedVariant::Int32(7));

            // An unknown member surfaces as a remote error with a name.
            let error = proxy.call("Nope", &BodyBuf::new()).unwrap_err();
            assert_eq!(error.remote_name(), Some(fdo::error_name::UNKNOWN_METHOD));

            // GetAll only answers for the matching interface.
            let mut body = BodyBuf::new();
            body.store(TEST_INTERFACE).unwrap();

            let reply = proxy.call_on(fdo::PROPERTIES, "GetAll", &body).unwrap();
            let mut reply_body = reply.body();
            let mut all = reply_body.load_dict::<ty::Str, ty::Variant>().unwrap();
            assert_eq!(
                all.load_entry().unwrap(),
                Some(("Count", Variant::Int32(7)))
            );
            assert_eq!(all.load_entry().unwrap(), None);

            let mut body = BodyBuf::new();
            body.store("some.other.Interface").unwrap();

            let reply = proxy.call_on(fdo::PROPERTIES, "GetAll", &body).unwrap();
            let mut reply_body = reply.body();
            let mut all = reply_body.load_dict::<ty::Str, ty::Variant>().unwrap();
            assert_eq!(all.load_entry().unwrap(), None);
        }

        // The buffered PropertiesChanged signal from the Set above.
        let signal = c.wait_message().unwrap();
        let borrowed = signal.borrow();

        match borrowed.kind() {
            MessageKind::Signal { path, member } => {
                assert_eq!(path, TEST_PATH);
                assert_eq!(member, "PropertiesChanged");
            }
            other => panic!("expected PropertiesChanged, got {other:?}"),
        }

        assert_eq!(borrowed.interface(), Some(fdo::PROPERTIES));

        let mut body = borrowed.body();
        assert_eq!(body.read::<str>().unwrap(), TEST_INTERFACE);

        let mut changed = body.load_dict::<ty::Str, ty::Variant>().unwrap();
        assert_eq!(
            changed.load_entry().unwrap(),
            Some(("Count", Variant::Int32(7)))
        );
        assert_eq!(changed.load_entry().unwrap(), None);

        let mut invalidated = body.load_array::<ty::Str>().unwrap();
        assert_eq!(invalidated.load().unwrap(), None);

        // Introspecting an unregistered ancestor lists its children.
        let reply = c
            .method_call(
                TEST_INTERFACE,
                ObjectPath::new_const(b"/dev/myinterface"),
                Some(fdo::INTROSPECTABLE),
                "Introspect",
                &BodyBuf::new(),
            )
            .unwrap();

        let borrowed = reply.borrow();
        let xml = borrowed.body().read::<str>().unwrap();
        let node = stdbus_xml::parse_node(xml).unwrap();

        assert!(node.interfaces.is_empty());
        assert_eq!(node.nodes.len(), 1);
        assert_eq!(node.nodes[0].name, Some("test"));
    });

    let mut server = Connection::from_stream(near);

    server
        .register_object(TEST_INTERFACE, TEST_PATH, Box::new(TestObject { count: 0 }))
        .unwrap();

    // Serving ends when the caller hangs up.
    let error = server.serve().unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnexpectedEof));

    caller.join().unwrap();
}

#[test]
fn emitted_signals_carry_the_registration_binding() {
    let (near, far) = UnixStream::pair().unwrap();

    let caller = thread::spawn(move || {
        let mut c = Connection::from_stream(far);

        grant_request_name(&mut c);

        let message = c.wait_message().unwrap();
        let borrowed = message.borrow();

        match borrowed.kind() {
            MessageKind::Signal { path, member } => {
                assert_eq!(path, TEST_PATH);
                assert_eq!(member, "Changed");
            }
            other => panic!("expected signal, got {other:?}"),
        }

        assert_eq!(borrowed.interface(), Some(TEST_INTERFACE));
        assert_eq!(borrowed.body().load::<i32>().unwrap(), 3);
    });

    let mut server = Connection::from_stream(near);

    let handle = server
        .register_object(TEST_INTERFACE, TEST_PATH, Box::new(TestObject { count: 0 }))
        .unwrap();

    let mut body = BodyBuf::new();
    body.store(3i32).unwrap();
    server.emit_signal(handle, "Changed", &body).unwrap();

    // Signals not declared in the inventory are refused.
    let error = server.emit_signal(handle, "Nope", &body).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::SignalNotBound(..)));

    // As are handles that never existed.
    let bogus = super::connection::bogus_handle();
    let error = server.emit_signal(bogus, "Changed", &body).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::InvalidHandle(..)));

    caller.join().unwrap();
}
