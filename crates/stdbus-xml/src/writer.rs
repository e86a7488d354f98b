use core::fmt::Write;

use crate::{Direction, Node};

/// The doctype advertised at the top of every rendered document.
const DOCTYPE: &str = "<!DOCTYPE node PUBLIC \"-//freedesktop//DTD D-BUS Object Introspection 1.0//EN\"\n \"http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd\">\n";

/// Render a node into an introspection document.
///
/// # Examples
///
/// ```
/// use stdbus_xml::{Interface, Method, Node};
///
/// let mut node = Node::default();
///
/// node.interfaces.push(Interface {
///     name: "org.freedesktop.DBus.Peer",
///     methods: vec![Method {
///         name: "Ping",
///         arguments: Vec::new(),
///     }],
///     signals: Vec::new(),
///     properties: Vec::new(),
/// });
///
/// let doc = stdbus_xml::to_xml(&node);
/// assert!(doc.contains("<interface name=\"org.freedesktop.DBus.Peer\">"));
/// assert!(doc.contains("<method name=\"Ping\"/>"));
/// ```
pub fn to_xml(node: &Node<'_>) -> String {
    let mut out = String::from(DOCTYPE);
    write_node(&mut out, node, 0);
    out
}

fn write_node(out: &mut String, node: &Node<'_>, depth: usize) {
    indent(out, depth);
    out.push_str("<node");

    if let Some(name) = node.name {
        attribute(out, "name", name);
    }

    if node.interfaces.is_empty() && node.nodes.is_empty() {
        out.push_str("/>\n");
        return;
    }

    out.push_str(">\n");

    for interface in &node.interfaces {
        indent(out, depth + 1);

        if interface.methods.is_empty()
            && interface.signals.is_empty()
            && interface.properties.is_empty()
        {
            out.push_str("<interface");
            attribute(out, "name", interface.name);
            out.push_str("/>\n");
            continue;
        }

        out.push_str("<interface");
        attribute(out, "name", interface.name);
        out.push_str(">\n");

        for method in &interface.methods {
            indent(out, depth + 2);
            out.push_str("<method");
            attribute(out, "name", method.name);

            if method.arguments.is_empty() {
                out.push_str("/>\n");
                continue;
            }

            out.push_str(">\n");

            for argument in &method.arguments {
                indent(out, depth + 3);
                out.push_str("<arg");

                if let Some(name) = argument.name {
                    attribute(out, "name", name);
                }

                attribute(out, "type", argument.ty);

                attribute(
                    out,
                    "direction",
                    match argument.direction {
                        Direction::In => "in",
                        Direction::Out => "out",
                    },
                );

                out.push_str("/>\n");
            }

            indent(out, depth + 2);
            out.push_str("</method>\n");
        }

        for signal in &interface.signals {
            indent(out, depth + 2);
            out.push_str("<signal");
            attribute(out, "name", signal.name);

            if signal.arguments.is_empty() {
                out.push_str("/>\n");
                continue;
            }

            out.push_str(">\n");

            for argument in &signal.arguments {
                indent(out, depth + 3);
                out.push_str("<arg");

                if let Some(name) = argument.name {
                    attribute(out, "name", name);
                }

                attribute(out, "type", argument.ty);
                out.push_str("/>\n");
            }

            indent(out, depth + 2);
            out.push_str("</signal>\n");
        }

        for property in &interface.properties {
            indent(out, depth + 2);
            out.push_str("<property");
            attribute(out, "name", property.name);
            attribute(out, "type", property.ty);
            attribute(out, "access", property.access.as_str());
            out.push_str("/>\n");
        }

        indent(out, depth + 1);
        out.push_str("</interface>\n");
    }

    for child in &node.nodes {
        write_node(out, child, depth + 1);
    }

    indent(out, depth);
    out.push_str("</node>\n");
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn attribute(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"");

    // The names and signatures written here rarely need escaping, but a
    // child node name is caller input.
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }

    out.push('"');
}
