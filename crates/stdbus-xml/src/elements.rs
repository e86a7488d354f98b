//! The element tree of an introspection document.

/// A D-Bus node, the root of an introspection document.
#[derive(Debug, Default)]
pub struct Node<'a> {
    /// The name of the node. Absolute on a root node, a single relative
    /// segment on a child node.
    pub name: Option<&'a str>,
    /// Interfaces implemented by the node.
    pub interfaces: Vec<Interface<'a>>,
    /// Child nodes, usually bare names.
    pub nodes: Vec<Node<'a>>,
}

/// A single interface of a node.
#[derive(Debug, Default)]
pub struct Interface<'a> {
    /// The name of the interface.
    pub name: &'a str,
    /// Methods of the interface.
    pub methods: Vec<Method<'a>>,
    /// Signals of the interface.
    pub signals: Vec<Signal<'a>>,
    /// Properties of the interface.
    pub properties: Vec<Property<'a>>,
}

/// A method of an interface.
#[derive(Debug, Default)]
pub struct Method<'a> {
    /// The name of the method.
    pub name: &'a str,
    /// Arguments of the method, in both directions.
    pub arguments: Vec<Argument<'a>>,
}

/// A signal of an interface.
///
/// Signal arguments always flow out, so their direction is omitted.
#[derive(Debug, Default)]
pub struct Signal<'a> {
    /// The name of the signal.
    pub name: &'a str,
    /// Arguments carried by the signal.
    pub arguments: Vec<Argument<'a>>,
}

/// A property of an interface.
#[derive(Debug)]
pub struct Property<'a> {
    /// The name of the property.
    pub name: &'a str,
    /// The type of the property, a single complete signature.
    pub ty: &'a str,
    /// How the property may be accessed.
    pub access: Access,
}

/// A method or signal argument.
#[derive(Debug, Clone, Copy)]
pub struct Argument<'a> {
    /// The name of the argument, if any.
    pub name: Option<&'a str>,
    /// The type of the argument, a single complete signature.
    pub ty: &'a str,
    /// The direction of the argument.
    pub direction: Direction,
}

/// The direction of a method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// An input argument.
    In,
    /// An output argument.
    Out,
}

/// The access mode of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The property can only be read.
    Read,
    /// The property can only be written.
    Write,
    /// The property can be read and written.
    ReadWrite,
}

impl Access {
    /// Test if the property can be read.
    pub fn is_readable(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    /// Test if the property can be written.
    pub fn is_writable(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }

    /// The attribute value naming this access mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
            Access::ReadWrite => "readwrite",
        }
    }
}
