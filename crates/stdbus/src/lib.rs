//! A pure Rust, blocking D-Bus implementation.
//!
//! This crate speaks the D-Bus wire protocol over Unix domain sockets
//! without a runtime: every blocking operation runs on the calling thread.
//! It covers typed marshalling, the message codec, SASL EXTERNAL
//! authentication, a request/reply correlating [`Connection`], exported
//! objects with the standard `Introspectable`/`Properties`/`Peer`
//! interfaces, and client-side [`Proxy`] calls.
//!
//! # Examples
//!
//! Calling the message bus:
//!
//! ```no_run
//! use stdbus::{BodyBuf, Connection, Proxy};
//! use stdbus::org_freedesktop_dbus as fdo;
//!
//! let mut c = Connection::session_bus()?;
//! let mut proxy = Proxy::new(&mut c, fdo::SERVICE, fdo::PATH, fdo::INTERFACE);
//!
//! let reply = proxy.call("GetId", &BodyBuf::new())?;
//! println!("bus id: {}", reply.body().read::<str>()?);
//! # Ok::<_, stdbus::Error>(())
//! ```

#![deny(missing_docs)]
#![allow(clippy::module_inception)]

#[macro_use]
mod macros;

#[doc(inline)]
pub use stdbus_core::proto::{Endianness, Flags};
pub(crate) mod proto {
    pub(crate) use stdbus_core::proto::{FieldCode, MessageType};
}

/// Signature types, re-exported from the core crate.
pub mod signature {
    #[doc(inline)]
    pub use stdbus_core::signature::{
        Iter, Signature, SignatureBuf, SignatureBuilder, SignatureError,
    };
}

#[doc(inline)]
pub use self::signature::{Signature, SignatureBuf, SignatureError};

#[doc(inline)]
pub use self::error::{Error, Result};
mod error;

pub(crate) mod buf;

#[doc(inline)]
pub use self::frame::{Frame, UnixFd};
mod frame;

#[doc(inline)]
pub use self::object_path::{ObjectPath, ObjectPathBuf, ObjectPathError};
mod object_path;

#[doc(inline)]
pub use self::write::Write;
mod write;

#[doc(inline)]
pub use self::read::Read;
mod read;

#[doc(inline)]
pub use self::storable::Storable;
pub(crate) mod storable;

#[doc(inline)]
pub use self::arguments::Arguments;
pub(crate) mod arguments;

#[doc(inline)]
pub use self::variant::{OwnedVariant, Variant};
mod variant;

pub mod ty;

#[doc(inline)]
pub use self::body::{ArrayReader, Body, DictReader};
mod body;

#[doc(inline)]
pub use self::body_buf::{BodyBuf, StoreArray, StoreDict, StoreStruct};
mod body_buf;

#[doc(inline)]
pub use self::message::{Message, MessageBuf, MessageKind, Serial};
mod message;

#[doc(inline)]
pub use self::send_buf::SendBuf;
mod send_buf;

#[doc(inline)]
pub use self::recv_buf::RecvBuf;
mod recv_buf;

#[doc(inline)]
pub use self::address::{Address, Bus};
mod address;

mod sasl;

pub(crate) mod transport;

#[doc(inline)]
pub use self::connection::{
    Access, CallError, Connection, Interface, Inventory, ObjectHandle, Proxy, Reply,
};
mod connection;

pub mod org_freedesktop_dbus;
