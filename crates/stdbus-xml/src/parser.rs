use xmlparser::{ElementEnd, Token, Tokenizer};

use stdbus_core::signature::Signature;

use crate::error::ErrorKind;
use crate::{Access, Argument, Direction, Error, Interface, Method, Node, Property, Result, Signal};

/// Parse an introspection document into its element tree.
///
/// Unknown elements such as `<annotation>` are skipped, including their
/// contents, since peers are free to extend their documents.
///
/// # Examples
///
/// ```
/// let node = stdbus_xml::parse_node(
///     r#"
///     <node>
///       <interface name="org.freedesktop.DBus.Introspectable">
///         <method name="Introspect">
///           <arg name="xml" type="s" direction="out"/>
///         </method>
///       </interface>
///       <node name="child"/>
///     </node>
///     "#,
/// )?;
///
/// assert_eq!(node.interfaces.len(), 1);
/// assert_eq!(node.interfaces[0].methods[0].name, "Introspect");
/// assert_eq!(node.nodes[0].name, Some("child"));
/// # Ok::<_, stdbus_xml::Error>(())
/// ```
pub fn parse_node(doc: &str) -> Result<Node<'_>> {
    let mut stack: Vec<State<'_>> = Vec::new();
    let mut root = None;

    for token in Tokenizer::from(doc) {
        match token? {
            Token::ElementStart { local, .. } => {
                let state = match (stack.last(), local.as_str()) {
                    (None | Some(State::Node(..)), "node") => State::Node(Node::default()),
                    (Some(State::Node(..)), "interface") => {
                        State::Interface(Interface::default())
                    }
                    (Some(State::Interface(..)), "method") => State::Method(Method::default()),
                    (Some(State::Interface(..)), "signal") => State::Signal(Signal::default()),
                    (Some(State::Interface(..)), "property") => {
                        State::Property(PropertyBuilder::default())
                    }
                    (Some(State::Method(..) | State::Signal(..)), "arg") => {
                        State::Argument(ArgumentBuilder::default())
                    }
                    (Some(State::Skip(..)), _) => State::Skip(local.as_str()),
                    (None, element) => {
                        return Err(Error::new(ErrorKind::UnexpectedElement(element.into())));
                    }
                    // Anything unknown below the root is somebody's
                    // extension, parse past it.
                    (Some(..), _) => State::Skip(local.as_str()),
                };

                stack.push(state);
            }
            Token::Attribute { local, value, .. } => {
                let Some(top) = stack.last_mut() else {
                    return Err(Error::new(ErrorKind::UnexpectedEnd));
                };

                top.attribute(local.as_str(), value.as_str())?;
            }
            Token::ElementEnd { end, .. } => {
                match end {
                    ElementEnd::Open => continue,
                    ElementEnd::Close(..) | ElementEnd::Empty => {}
                }

                let Some(top) = stack.pop() else {
                    return Err(Error::new(ErrorKind::UnexpectedEnd));
                };

                let closed = top.build()?;

                match (stack.last_mut(), closed) {
                    (None, Closed::Node(node)) => {
                        root = Some(node);
                    }
                    (Some(State::Node(parent)), Closed::Node(node)) => {
                        parent.nodes.push(node);
                    }
                    (Some(State::Node(parent)), Closed::Interface(interface)) => {
                        parent.interfaces.push(interface);
                    }
                    (Some(State::Interface(parent)), Closed::Method(method)) => {
                        parent.methods.push(method);
                    }
                    (Some(State::Interface(parent)), Closed::Signal(signal)) => {
                        parent.signals.push(signal);
                    }
                    (Some(State::Interface(parent)), Closed::Property(property)) => {
                        parent.properties.push(property);
                    }
                    (Some(State::Method(parent)), Closed::Argument(argument)) => {
                        parent.arguments.push(argument);
                    }
                    (Some(State::Signal(parent)), Closed::Argument(mut argument)) => {
                        // Signal arguments always flow out.
                        argument.direction = Direction::Out;
                        parent.arguments.push(argument);
                    }
                    (_, Closed::Skipped) => {}
                    _ => return Err(Error::new(ErrorKind::UnexpectedEnd)),
                }
            }
            // Declarations, the doctype, comments and inter-element text are
            // of no interest.
            _ => {}
        }
    }

    root.ok_or_else(|| Error::new(ErrorKind::UnexpectedEnd))
}

enum State<'a> {
    Node(Node<'a>),
    Interface(Interface<'a>),
    Method(Method<'a>),
    Signal(Signal<'a>),
    Property(PropertyBuilder<'a>),
    Argument(ArgumentBuilder<'a>),
    Skip(&'a str),
}

enum Closed<'a> {
    Node(Node<'a>),
    Interface(Interface<'a>),
    Method(Method<'a>),
    Signal(Signal<'a>),
    Property(Property<'a>),
    Argument(Argument<'a>),
    Skipped,
}

impl<'a> State<'a> {
    fn attribute(&mut self, name: &str, value: &'a str) -> Result<()> {
        match (self, name) {
            (State::Node(node), "name") => node.name = Some(value),
            (State::Interface(interface), "name") => interface.name = value,
            (State::Method(method), "name") => method.name = value,
            (State::Signal(signal), "name") => signal.name = value,
            (State::Property(property), "name") => property.name = Some(value),
            (State::Property(property), "type") => property.ty = Some(validate_type(value)?),
            (State::Property(property), "access") => {
                property.access = Some(match value {
                    "read" => Access::Read,
                    "write" => Access::Write,
                    "readwrite" => Access::ReadWrite,
                    other => return Err(Error::new(ErrorKind::BadAccess(other.into()))),
                });
            }
            (State::Argument(argument), "name") => argument.name = Some(value),
            (State::Argument(argument), "type") => argument.ty = Some(validate_type(value)?),
            (State::Argument(argument), "direction") => {
                argument.direction = Some(match value {
                    "in" => Direction::In,
                    "out" => Direction::Out,
                    other => return Err(Error::new(ErrorKind::BadDirection(other.into()))),
                });
            }
            _ => {}
        }

        Ok(())
    }

    fn build(self) -> Result<Closed<'a>> {
        let closed = match self {
            State::Node(node) => Closed::Node(node),
            State::Interface(interface) => {
                if interface.name.is_empty() {
                    return Err(Error::new(ErrorKind::MissingAttribute(
                        "name",
                        "interface".into(),
                    )));
                }

                Closed::Interface(interface)
            }
            State::Method(method) => {
                if method.name.is_empty() {
                    return Err(Error::new(ErrorKind::MissingAttribute(
                        "name",
                        "method".into(),
                    )));
                }

                Closed::Method(method)
            }
            State::Signal(signal) => {
                if signal.name.is_empty() {
                    return Err(Error::new(ErrorKind::MissingAttribute(
                        "name",
                        "signal".into(),
                    )));
                }

                Closed::Signal(signal)
            }
            State::Property(property) => {
                let Some(name) = property.name else {
                    return Err(Error::new(ErrorKind::MissingAttribute(
                        "name",
                        "property".into(),
                    )));
                };

                let Some(ty) = property.ty else {
                    return Err(Error::new(ErrorKind::MissingAttribute(
                        "type",
                        "property".into(),
                    )));
                };

                let Some(access) = property.access else {
                    return Err(Error::new(ErrorKind::MissingAttribute(
                        "access",
                        "property".into(),
                    )));
                };

                Closed::Property(Property { name, ty, access })
            }
            State::Argument(argument) => {
                let Some(ty) = argument.ty else {
                    return Err(Error::new(ErrorKind::MissingAttribute("type", "arg".into())));
                };

                Closed::Argument(Argument {
                    name: argument.name,
                    ty,
                    // Per the introspection DTD the direction of a method
                    // argument defaults to "in".
                    direction: argument.direction.unwrap_or(Direction::In),
                })
            }
            State::Skip(..) => Closed::Skipped,
        };

        Ok(closed)
    }
}

#[derive(Default)]
struct PropertyBuilder<'a> {
    name: Option<&'a str>,
    ty: Option<&'a str>,
    access: Option<Access>,
}

#[derive(Default)]
struct ArgumentBuilder<'a> {
    name: Option<&'a str>,
    ty: Option<&'a str>,
    direction: Option<Direction>,
}

fn validate_type(ty: &str) -> Result<&str> {
    match Signature::new(ty) {
        Ok(..) => Ok(ty),
        Err(error) => Err(Error::new(ErrorKind::BadSignature(error))),
    }
}
