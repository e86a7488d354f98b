use core::fmt;
use std::fs;

use crate::error::Error;
use crate::org_freedesktop_dbus as fdo;
use crate::{Body, BodyBuf, OwnedVariant, Signature, SignatureBuf, Variant};

pub use stdbus_xml::Access;

/// An object exported on a connection.
///
/// An implementation describes itself through [`inventory`] and handles the
/// primitive operations the dispatcher routes to it. The standard
/// `Introspectable`, `Properties` and `Peer` interfaces are answered by the
/// connection on the object's behalf, driven by the inventory.
///
/// [`inventory`]: Self::inventory
///
/// # Examples
///
/// ```
/// use stdbus::{Access, Body, BodyBuf, CallError, Interface, Inventory};
/// use stdbus::{OwnedVariant, Signature, Variant};
///
/// struct Test {
///     count: i32,
/// }
///
/// impl Interface for Test {
///     fn inventory(&self) -> Inventory {
///         Inventory::new("dev.myinterface.test")
///             .method("Testing", Signature::EMPTY, Signature::STRING)
///             .property("Count", Signature::INT32, Access::ReadWrite)
///     }
///
///     fn call(&mut self, member: &str, _: &mut Body<'_>) -> Result<BodyBuf, CallError> {
///         match member {
///             "Testing" => {
///                 let mut reply = BodyBuf::new();
///                 reply.store("Hello")?;
///                 Ok(reply)
///             }
///             _ => Err(CallError::UnknownMethod),
///         }
///     }
///
///     fn get_property(&self, name: &str) -> Result<OwnedVariant, CallError> {
///         match name {
///             "Count" => Ok(OwnedVariant::Int32(self.count)),
///             _ => Err(CallError::UnknownProperty),
///         }
///     }
///
///     fn set_property(&mut self, name: &str, value: Variant<'_>) -> Result<(), CallError> {
///         match (name, value) {
///             ("Count", Variant::Int32(count)) => {
///                 self.count = count;
///                 Ok(())
///             }
///             _ => Err(CallError::UnknownProperty),
///         }
///     }
/// }
/// ```
pub trait Interface {
    /// Describe the methods, properties and signals of this object.
    ///
    /// Called once when the object is registered; the result also drives the
    /// introspection document.
    fn inventory(&self) -> Inventory;

    /// Handle a call to one of the methods named in the inventory.
    ///
    /// The returned body becomes the reply. Arguments are read out of
    /// `args`; a decoding failure converts into [`CallError::InvalidArgs`]
    /// through `?`.
    fn call(&mut self, member: &str, args: &mut Body<'_>) -> Result<BodyBuf, CallError>;

    /// Read a property named in the inventory.
    ///
    /// Only invoked for properties the inventory declares readable.
    fn get_property(&self, name: &str) -> Result<OwnedVariant, CallError> {
        let _ = name;
        Err(CallError::UnknownProperty)
    }

    /// Write a property named in the inventory.
    ///
    /// Only invoked for properties the inventory declares writable, and only
    /// with a value whose signature matches the declaration.
    fn set_property(&mut self, name: &str, value: Variant<'_>) -> Result<(), CallError> {
        let _ = (name, value);
        Err(CallError::UnknownProperty)
    }
}

/// An error returned by an [`Interface`] handler, converted into an error
/// reply to the caller.
#[derive(Debug)]
pub enum CallError {
    /// The member is not a method of this interface.
    UnknownMethod,
    /// The property does not exist on this interface.
    UnknownProperty,
    /// The arguments did not decode or did not make sense.
    InvalidArgs,
    /// The handler failed with a message of its own.
    Failed(String),
}

impl CallError {
    /// The D-Bus error name of this error.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            CallError::UnknownMethod => fdo::error_name::UNKNOWN_METHOD,
            CallError::UnknownProperty => fdo::error_name::INVALID_ARGS,
            CallError::InvalidArgs => fdo::error_name::INVALID_ARGS,
            CallError::Failed(..) => fdo::error_name::FAILED,
        }
    }

    /// The human-readable message of this error.
    pub(crate) fn message(&self, member: &str) -> String {
        match self {
            CallError::UnknownMethod => format!("No such method `{member}`"),
            CallError::UnknownProperty => format!("No such property `{member}`"),
            CallError::InvalidArgs => format!("Invalid arguments to `{member}`"),
            CallError::Failed(message) => message.clone(),
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::UnknownMethod => write!(f, "Unknown method"),
            CallError::UnknownProperty => write!(f, "Unknown property"),
            CallError::InvalidArgs => write!(f, "Invalid arguments"),
            CallError::Failed(message) => write!(f, "{message}"),
        }
    }
}

impl core::error::Error for CallError {}

/// Decoding failures inside a handler surface to the caller as invalid
/// arguments.
impl From<Error> for CallError {
    #[inline]
    fn from(_: Error) -> Self {
        CallError::InvalidArgs
    }
}

/// The declared surface of an exported object: its interface name and the
/// methods, properties and signals it exposes.
///
/// See [`Interface`] for an example.
#[derive(Debug, Clone)]
pub struct Inventory {
    interface: String,
    methods: Vec<MethodDecl>,
    properties: Vec<PropertyDecl>,
    signals: Vec<SignalDecl>,
}

#[derive(Debug, Clone)]
pub(crate) struct MethodDecl {
    pub(crate) name: String,
    pub(crate) in_signature: SignatureBuf,
    pub(crate) out_signature: SignatureBuf,
}

#[derive(Debug, Clone)]
pub(crate) struct PropertyDecl {
    pub(crate) name: String,
    pub(crate) signature: SignatureBuf,
    pub(crate) access: Access,
}

#[derive(Debug, Clone)]
pub(crate) struct SignalDecl {
    pub(crate) name: String,
    pub(crate) signature: SignatureBuf,
}

impl Inventory {
    /// Construct an empty inventory for the given interface name.
    pub fn new(interface: &str) -> Self {
        Self {
            interface: interface.into(),
            methods: Vec::new(),
            properties: Vec::new(),
            signals: Vec::new(),
        }
    }

    /// Declare a method with its input and output signatures.
    pub fn method(mut self, name: &str, in_signature: &Signature, out_signature: &Signature) -> Self {
        self.methods.push(MethodDecl {
            name: name.into(),
            in_signature: in_signature.to_owned(),
            out_signature: out_signature.to_owned(),
        });

        self
    }

    /// Declare a property with its type and access mode.
    pub fn property(mut self, name: &str, signature: &Signature, access: Access) -> Self {
        self.properties.push(PropertyDecl {
            name: name.into(),
            signature: signature.to_owned(),
            access,
        });

        self
    }

    /// Declare a signal with the signature of its payload.
    pub fn signal(mut self, name: &str, signature: &Signature) -> Self {
        self.signals.push(SignalDecl {
            name: name.into(),
            signature: signature.to_owned(),
        });

        self
    }

    /// The interface name of the inventory.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub(crate) fn find_method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|method| method.name == name)
    }

    pub(crate) fn find_property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub(crate) fn find_signal(&self, name: &str) -> Option<&SignalDecl> {
        self.signals.iter().find(|signal| signal.name == name)
    }

    pub(crate) fn readable_properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.properties
            .iter()
            .filter(|property| property.access.is_readable())
    }

    /// Render the introspection document of an object described by this
    /// inventory, advertising the standard interfaces next to the declared
    /// one and listing `children` as child nodes.
    pub(crate) fn introspect(&self, children: &[&str]) -> String {
        let mut node = stdbus_xml::Node::default();

        let mut interface = stdbus_xml::Interface {
            name: &self.interface,
            methods: Vec::new(),
            signals: Vec::new(),
            properties: Vec::new(),
        };

        for method in &self.methods {
            interface.methods.push(stdbus_xml::Method {
                name: &method.name,
                arguments: arguments(&method.in_signature, &method.out_signature),
            });
        }

        for signal in &self.signals {
            interface.signals.push(stdbus_xml::Signal {
                name: &signal.name,
                arguments: arguments(Signature::EMPTY, &signal.signature),
            });
        }

        for property in &self.properties {
            interface.properties.push(stdbus_xml::Property {
                name: &property.name,
                ty: property.signature.as_str(),
                access: property.access,
            });
        }

        node.interfaces.push(interface);

        node.interfaces.push(stdbus_xml::Interface {
            name: fdo::INTROSPECTABLE,
            methods: vec![stdbus_xml::Method {
                name: "Introspect",
                arguments: vec![stdbus_xml::Argument {
                    name: Some("xml_data"),
                    ty: "s",
                    direction: stdbus_xml::Direction::Out,
                }],
            }],
            signals: Vec::new(),
            properties: Vec::new(),
        });

        node.interfaces.push(stdbus_xml::Interface {
            name: fdo::PROPERTIES,
            methods: vec![
                stdbus_xml::Method {
                    name: "Get",
                    arguments: vec![
                        argument("interface_name", "s", stdbus_xml::Direction::In),
                        argument("property_name", "s", stdbus_xml::Direction::In),
                        argument("value", "v", stdbus_xml::Direction::Out),
                    ],
                },
                stdbus_xml::Method {
                    name: "Set",
                    arguments: vec![
                        argument("interface_name", "s", stdbus_xml::Direction::In),
                        argument("property_name", "s", stdbus_xml::Direction::In),
                        argument("value", "v", stdbus_xml::Direction::In),
                    ],
                },
                stdbus_xml::Method {
                    name: "GetAll",
                    arguments: vec![
                        argument("interface_name", "s", stdbus_xml::Direction::In),
                        argument("properties", "a{sv}", stdbus_xml::Direction::Out),
                    ],
                },
            ],
            signals: vec![stdbus_xml::Signal {
                name: "PropertiesChanged",
                arguments: vec![
                    argument("interface_name", "s", stdbus_xml::Direction::Out),
                    argument("changed_properties", "a{sv}", stdbus_xml::Direction::Out),
                    argument("invalidated_properties", "as", stdbus_xml::Direction::Out),
                ],
            }],
            properties: Vec::new(),
        });

        node.interfaces.push(stdbus_xml::Interface {
            name: fdo::PEER,
            methods: vec![
                stdbus_xml::Method {
                    name: "Ping",
                    arguments: Vec::new(),
                },
                stdbus_xml::Method {
                    name: "GetMachineId",
                    arguments: vec![argument("machine_uuid", "s", stdbus_xml::Direction::Out)],
                },
            ],
            signals: Vec::new(),
            properties: Vec::new(),
        });

        for child in children {
            node.nodes.push(stdbus_xml::Node {
                name: Some(child),
                ..stdbus_xml::Node::default()
            });
        }

        stdbus_xml::to_xml(&node)
    }
}

/// Render a node holding nothing but child names, answering introspection
/// of an unregistered ancestor path.
pub(crate) fn introspect_children(children: &[&str]) -> String {
    let mut node = stdbus_xml::Node::default();

    for child in children {
        node.nodes.push(stdbus_xml::Node {
            name: Some(child),
            ..stdbus_xml::Node::default()
        });
    }

    stdbus_xml::to_xml(&node)
}

/// The machine id answered by `org.freedesktop.DBus.Peer.GetMachineId`.
pub(crate) fn machine_id() -> Result<String, CallError> {
    for path in ["/etc/machine-id", "/var/lib/dbus/machine-id"] {
        if let Ok(id) = fs::read_to_string(path) {
            return Ok(id.trim().to_owned());
        }
    }

    Err(CallError::Failed("Machine id is not available".into()))
}

fn arguments<'a>(
    in_signature: &'a Signature,
    out_signature: &'a Signature,
) -> Vec<stdbus_xml::Argument<'a>> {
    let mut arguments = Vec::new();

    for ty in in_signature.iter() {
        arguments.push(stdbus_xml::Argument {
            name: None,
            ty: ty.as_str(),
            direction: stdbus_xml::Direction::In,
        });
    }

    for ty in out_signature.iter() {
        arguments.push(stdbus_xml::Argument {
            name: None,
            ty: ty.as_str(),
            direction: stdbus_xml::Direction::Out,
        });
    }

    arguments
}

fn argument<'a>(
    name: &'a str,
    ty: &'a str,
    direction: stdbus_xml::Direction,
) -> stdbus_xml::Argument<'a> {
    stdbus_xml::Argument {
        name: Some(name),
        ty,
        direction,
    }
}
