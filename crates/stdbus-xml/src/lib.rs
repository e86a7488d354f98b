//! Introspection XML support for the stdbus D-Bus implementation.
//!
//! Parses `org.freedesktop.DBus.Introspectable` documents into an element
//! tree, and renders such a tree back into a document.

#![deny(missing_docs)]

pub use self::elements::{Access, Argument, Direction, Interface, Method, Node, Property, Signal};
mod elements;

pub use self::error::{Error, Result};
mod error;

pub use self::parser::parse_node;
mod parser;

pub use self::writer::to_xml;
mod writer;

#[cfg(test)]
mod tests;
