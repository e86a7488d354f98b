//! The blocking connection, exported objects and client proxies.

pub use self::connection::{Connection, ObjectHandle};
pub(crate) use self::connection::expect_return;
mod connection;

pub use self::object::{Access, CallError, Interface, Inventory};
mod object;

pub use self::proxy::{Proxy, Reply};
mod proxy;

#[cfg(test)]
mod tests;
