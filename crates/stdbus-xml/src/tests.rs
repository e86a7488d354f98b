use crate::{parse_node, to_xml, Access, Direction, Interface, Method, Node, Signal};

const SESSION_BUS_SAMPLE: &str = r#"<!DOCTYPE node PUBLIC "-//freedesktop//DTD D-BUS Object Introspection 1.0//EN"
 "http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd">
<node>
  <interface name="org.freedesktop.DBus">
    <method name="Hello">
      <arg direction="out" type="s"/>
    </method>
    <method name="RequestName">
      <arg direction="in" type="s"/>
      <arg direction="in" type="u"/>
      <arg direction="out" type="u"/>
    </method>
    <signal name="NameOwnerChanged">
      <arg type="s"/>
      <arg type="s"/>
      <arg type="s"/>
    </signal>
    <property name="Features" type="as" access="read">
      <annotation name="org.freedesktop.DBus.Property.EmitsChangedSignal" value="const"/>
    </property>
  </interface>
  <node name="org"/>
</node>
"#;

#[test]
fn parse_bus_document() {
    let node = parse_node(SESSION_BUS_SAMPLE).unwrap();

    assert_eq!(node.name, None);
    assert_eq!(node.interfaces.len(), 1);

    let interface = &node.interfaces[0];
    assert_eq!(interface.name, "org.freedesktop.DBus");
    assert_eq!(interface.methods.len(), 2);

    let hello = &interface.methods[0];
    assert_eq!(hello.name, "Hello");
    assert_eq!(hello.arguments.len(), 1);
    assert_eq!(hello.arguments[0].ty, "s");
    assert!(matches!(hello.arguments[0].direction, Direction::Out));

    let request_name = &interface.methods[1];
    assert_eq!(request_name.arguments.len(), 3);

    assert_eq!(interface.signals.len(), 1);
    assert_eq!(interface.signals[0].arguments.len(), 3);

    assert_eq!(interface.properties.len(), 1);
    assert_eq!(interface.properties[0].name, "Features");
    assert_eq!(interface.properties[0].ty, "as");
    assert_eq!(interface.properties[0].access, Access::Read);

    assert_eq!(node.nodes.len(), 1);
    assert_eq!(node.nodes[0].name, Some("org"));
}

#[test]
fn direction_defaults_to_in() {
    let node = parse_node(
        r#"<node><interface name="a.b"><method name="M"><arg type="i"/></method></interface></node>"#,
    )
    .unwrap();

    let arg = node.interfaces[0].methods[0].arguments[0];
    assert!(matches!(arg.direction, Direction::In));
}

#[test]
fn rejects_bad_type_signatures() {
    assert!(parse_node(
        r#"<node><interface name="a.b"><method name="M"><arg type="zz"/></method></interface></node>"#,
    )
    .is_err());
}

#[test]
fn rejects_misplaced_elements() {
    assert!(parse_node(r#"<interface name="a.b"/>"#).is_err());
    assert!(parse_node(r#"<node><method name="M"/></node>"#).is_ok());
}

#[test]
fn skips_unknown_elements() {
    let node = parse_node(
        r#"<node>
             <interface name="a.b">
               <annotation name="a" value="b"/>
               <method name="M">
                 <doc><line>Ignored prose.</line></doc>
               </method>
             </interface>
           </node>"#,
    )
    .unwrap();

    assert_eq!(node.interfaces[0].methods.len(), 1);
}

#[test]
fn render_round_trips_through_parse() {
    let mut node = Node::default();

    node.interfaces.push(Interface {
        name: "dev.myinterface.test",
        methods: vec![Method {
            name: "Testing",
            arguments: vec![crate::Argument {
                name: None,
                ty: "s",
                direction: Direction::Out,
            }],
        }],
        signals: vec![Signal {
            name: "Changed",
            arguments: Vec::new(),
        }],
        properties: vec![crate::Property {
            name: "Count",
            ty: "i",
            access: Access::ReadWrite,
        }],
    });

    node.nodes.push(Node {
        name: Some("child"),
        ..Node::default()
    });

    let doc = to_xml(&node);
    assert!(doc.starts_with("<!DOCTYPE node"));

    let parsed = parse_node(&doc).unwrap();
    assert_eq!(parsed.interfaces.len(), 1);

    let interface = &parsed.interfaces[0];
    assert_eq!(interface.name, "dev.myinterface.test");
    assert_eq!(interface.methods[0].name, "Testing");
    assert_eq!(interface.methods[0].arguments[0].ty, "s");
    assert!(matches!(
        interface.methods[0].arguments[0].direction,
        Direction::Out
    ));
    assert_eq!(interface.properties[0].access, Access::ReadWrite);
    assert_eq!(parsed.nodes[0].name, Some("child"));
}
