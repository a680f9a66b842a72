//! WSDL 1.1 and XML Schema element tree to [`WsdlDefinition`].

use tracing::debug;

use loopgen_core::domain::{
    QName,
    wsdl::{
        AttributeDecl, BindingOperation, BindingStyle, ComplexType, ElementDecl, ElementKind,
        MaxOccurs, Message, MessagePart, PartReference, PortType, PortTypeOperation, SchemaSet,
        SimpleType, WsdlBinding, WsdlDefinition, WsdlPort, WsdlService,
    },
};

use super::{
    WsdlReadError,
    xml::{XmlNode, parse_document},
};

const WSDL_NS: &str = "http://schemas.xmlsoap.org/wsdl/";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
const SOAP_NAMESPACES: [&str; 2] = [
    "http://schemas.xmlsoap.org/wsdl/soap/",
    "http://schemas.xmlsoap.org/wsdl/soap12/",
];

fn is_soap(node: &XmlNode) -> bool {
    node.namespace
        .as_deref()
        .is_some_and(|ns| SOAP_NAMESPACES.contains(&ns))
}

/// Parse a WSDL 1.1 document.
pub fn parse_wsdl(xml: &str) -> Result<WsdlDefinition, WsdlReadError> {
    let root = parse_document(xml)?;
    if !root.is(WSDL_NS, "definitions") {
        return Err(WsdlReadError::NotWsdl {
            root: root.local.clone(),
        });
    }

    let mut definition = WsdlDefinition {
        name: root.attr("name").map(str::to_string),
        target_namespace: root.attr("targetNamespace").map(str::to_string),
        ..Default::default()
    };

    for child in &root.children {
        match child.local.as_str() {
            "types" => {
                for schema in child.children_named("schema") {
                    parse_schema(schema, &mut definition.schema)?;
                }
            }
            "message" => definition.messages.push(parse_message(child)?),
            "portType" => definition.port_types.push(parse_port_type(child)?),
            "binding" => {
                // Only SOAP bindings describe callable operations.
                if let Some(binding) = parse_binding(child)? {
                    definition.bindings.push(binding);
                }
            }
            "service" => definition.services.push(parse_service(child)?),
            "import" => {
                debug!(location = ?child.attr("location"), "wsdl:import is not followed");
            }
            _ => {}
        }
    }

    Ok(definition)
}

fn parse_message(node: &XmlNode) -> Result<Message, WsdlReadError> {
    let mut parts = Vec::new();
    for part in node.children_named("part") {
        let name = part.required_attr("name")?.to_string();
        let reference = match (part.qname_attr("element")?, part.qname_attr("type")?) {
            (Some(element), _) => PartReference::Element(element),
            (None, Some(type_name)) => PartReference::Type(type_name),
            (None, None) => {
                return Err(WsdlReadError::MissingAttribute {
                    element: format!("part '{name}'"),
                    attribute: "element or type".into(),
                });
            }
        };
        parts.push(MessagePart { name, reference });
    }
    Ok(Message {
        name: node.required_attr("name")?.to_string(),
        parts,
    })
}

fn parse_port_type(node: &XmlNode) -> Result<PortType, WsdlReadError> {
    let mut operations = Vec::new();
    for op in node.children_named("operation") {
        operations.push(PortTypeOperation {
            name: op.required_attr("name")?.to_string(),
            input: op.child("input").map(|n| n.qname_attr("message")).transpose()?.flatten(),
            output: op
                .child("output")
                .map(|n| n.qname_attr("message"))
                .transpose()?
                .flatten(),
        });
    }
    Ok(PortType {
        name: node.required_attr("name")?.to_string(),
        operations,
    })
}

fn parse_binding(node: &XmlNode) -> Result<Option<WsdlBinding>, WsdlReadError> {
    let Some(soap) = node.children_named("binding").find(|n| is_soap(n)) else {
        debug!(binding = ?node.attr("name"), "skipping non-SOAP binding");
        return Ok(None);
    };

    let style = soap.attr("style").map(parse_style).transpose()?.unwrap_or_default();

    let mut operations = Vec::new();
    for op in node.children_named("operation") {
        let soap_op = op.children_named("operation").find(|n| is_soap(n));
        operations.push(BindingOperation {
            name: op.required_attr("name")?.to_string(),
            soap_action: soap_op
                .and_then(|n| n.attr("soapAction"))
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            style: soap_op
                .and_then(|n| n.attr("style"))
                .map(parse_style)
                .transpose()?,
        });
    }

    Ok(Some(WsdlBinding {
        name: node.required_attr("name")?.to_string(),
        port_type: node
            .qname_attr("type")?
            .ok_or_else(|| WsdlReadError::MissingAttribute {
                element: "binding".into(),
                attribute: "type".into(),
            })?,
        style,
        operations,
    }))
}

fn parse_style(value: &str) -> Result<BindingStyle, WsdlReadError> {
    match value {
        "document" => Ok(BindingStyle::Document),
        "rpc" => Ok(BindingStyle::Rpc),
        other => Err(WsdlReadError::InvalidValue {
            attribute: "style".into(),
            value: other.to_string(),
        }),
    }
}

fn parse_service(node: &XmlNode) -> Result<WsdlService, WsdlReadError> {
    let mut ports = Vec::new();
    for port in node.children_named("port") {
        ports.push(WsdlPort {
            name: port.required_attr("name")?.to_string(),
            binding: port
                .qname_attr("binding")?
                .ok_or_else(|| WsdlReadError::MissingAttribute {
                    element: "port".into(),
                    attribute: "binding".into(),
                })?,
            address: port
                .child("address")
                .and_then(|a| a.attr("location"))
                .map(str::to_string),
        });
    }
    Ok(WsdlService {
        name: node.required_attr("name")?.to_string(),
        ports,
    })
}

// ── XML Schema ────────────────────────────────────────────────────────────────

struct SchemaContext {
    target_namespace: Option<String>,
}

impl SchemaContext {
    fn qualify(&self, local: &str) -> QName {
        QName::new(self.target_namespace.clone(), local)
    }
}

fn parse_schema(node: &XmlNode, set: &mut SchemaSet) -> Result<(), WsdlReadError> {
    let ctx = SchemaContext {
        target_namespace: node.attr("targetNamespace").map(str::to_string),
    };

    for child in &node.children {
        match child.local.as_str() {
            "element" => set.elements.push(parse_element(child, &ctx)?),
            "complexType" => {
                let name = ctx.qualify(child.required_attr("name")?);
                set.complex_types.push(parse_complex(child, Some(name), &ctx)?);
            }
            "simpleType" => {
                let name = ctx.qualify(child.required_attr("name")?);
                set.simple_types.push(parse_simple(child, Some(name))?);
            }
            "import" | "include" => {
                debug!(location = ?child.attr("schemaLocation"), "schema import is not followed");
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_element(node: &XmlNode, ctx: &SchemaContext) -> Result<ElementDecl, WsdlReadError> {
    let min_occurs = node
        .attr("minOccurs")
        .map(|v| parse_count("minOccurs", v))
        .transpose()?;
    let max_occurs = match node.attr("maxOccurs") {
        None => MaxOccurs::default(),
        Some("unbounded") => MaxOccurs::Unbounded,
        Some(v) => MaxOccurs::Bounded(parse_count("maxOccurs", v)?),
    };

    if let Some(target) = node.qname_attr("ref")? {
        return Ok(ElementDecl {
            name: target.clone(),
            kind: ElementKind::Ref(target),
            min_occurs,
            max_occurs,
        });
    }

    let name = ctx.qualify(node.required_attr("name")?);
    let kind = if let Some(type_name) = node.qname_attr("type")? {
        ElementKind::Named(type_name)
    } else if let Some(complex) = node.child("complexType") {
        ElementKind::InlineComplex(Box::new(parse_complex(complex, None, ctx)?))
    } else if let Some(simple) = node.child("simpleType") {
        ElementKind::InlineSimple(Box::new(parse_simple(simple, None)?))
    } else {
        ElementKind::Untyped
    };

    Ok(ElementDecl {
        name,
        kind,
        min_occurs,
        max_occurs,
    })
}

fn parse_count(attribute: &str, value: &str) -> Result<u32, WsdlReadError> {
    value.trim().parse().map_err(|_| WsdlReadError::InvalidValue {
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}

fn parse_complex(
    node: &XmlNode,
    name: Option<QName>,
    ctx: &SchemaContext,
) -> Result<ComplexType, WsdlReadError> {
    let mut complex = ComplexType {
        name,
        ..Default::default()
    };
    collect_content(node, &mut complex, ctx)?;
    Ok(complex)
}

fn collect_content(
    node: &XmlNode,
    complex: &mut ComplexType,
    ctx: &SchemaContext,
) -> Result<(), WsdlReadError> {
    for child in &node.children {
        match child.local.as_str() {
            "sequence" | "all" | "choice" => collect_group(child, complex, ctx)?,
            "attribute" => complex.attributes.push(parse_attribute(child)?),
            "complexContent" => {
                if let Some(extension) = child.child("extension") {
                    complex.base = extension.qname_attr("base")?;
                    collect_content(extension, complex, ctx)?;
                } else if let Some(restriction) = child.child("restriction") {
                    let base = restriction
                        .attr("base")
                        .unwrap_or("anyType")
                        .to_string();
                    complex.unsupported.push(format!("complexContent restriction of {base}"));
                }
            }
            "simpleContent" => complex.unsupported.push("simpleContent".into()),
            "group" => complex.unsupported.push(group_label(child)),
            "attributeGroup" => complex.unsupported.push("attributeGroup".into()),
            "annotation" | "anyAttribute" => {}
            other => complex.unsupported.push(format!("xsd:{other}")),
        }
    }
    Ok(())
}

fn collect_group(
    node: &XmlNode,
    complex: &mut ComplexType,
    ctx: &SchemaContext,
) -> Result<(), WsdlReadError> {
    for child in &node.children {
        match child.local.as_str() {
            "element" => complex.elements.push(parse_element(child, ctx)?),
            "sequence" | "all" | "choice" => collect_group(child, complex, ctx)?,
            "any" => complex.unsupported.push("xsd:any".into()),
            "group" => complex.unsupported.push(group_label(child)),
            _ => {}
        }
    }
    Ok(())
}

fn group_label(node: &XmlNode) -> String {
    match node.attr("ref") {
        Some(r) => format!("xsd:group ref={r}"),
        None => "xsd:group".into(),
    }
}

fn parse_attribute(node: &XmlNode) -> Result<AttributeDecl, WsdlReadError> {
    let name = match node.attr("name") {
        Some(name) => name.to_string(),
        None => node.required_attr("ref")?.rsplit(':').next().unwrap_or_default().to_string(),
    };
    Ok(AttributeDecl {
        name,
        type_name: node.qname_attr("type")?,
        required: node.attr("use") == Some("required"),
    })
}

fn parse_simple(node: &XmlNode, name: Option<QName>) -> Result<SimpleType, WsdlReadError> {
    let mut simple = SimpleType {
        name,
        ..Default::default()
    };

    if let Some(restriction) = node.child("restriction") {
        simple.base = restriction.qname_attr("base")?;
        simple.enumeration = restriction
            .children_named("enumeration")
            .filter_map(|e| e.attr("value"))
            .map(str::to_string)
            .collect();
    } else if let Some(list) = node.child("list") {
        simple.list_item = match list.qname_attr("itemType")? {
            Some(item) => Some(item),
            // Anonymous item types are treated as strings.
            None => Some(QName::new(Some(XSD_NS.into()), "string")),
        };
    } else if node.child("union").is_some() {
        simple.is_union = true;
    }

    Ok(simple)
}
