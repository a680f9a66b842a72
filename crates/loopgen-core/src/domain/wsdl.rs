//! Parsed WSDL 1.1 definitions.
//!
//! This is the subset of a WSDL document the SOAP generator needs: services
//! and their ports, bindings, port types, messages, and the XML Schema
//! declarations reachable from message parts. Reading the XML lives in the
//! adapters crate; everything here is plain data plus name lookups.

use std::fmt;

use crate::domain::error::DomainError;

/// XML Schema namespaces whose built-in types map to JSON primitives.
pub const XSD_NAMESPACES: [&str; 4] = [
    "http://www.w3.org/2001/XMLSchema",
    "http://www.w3.org/2000/10/XMLSchema",
    "http://www.w3.org/1999/XMLSchema",
    // SOAP-encoding redeclares the XSD simple types under its own namespace.
    "http://schemas.xmlsoap.org/soap/encoding/",
];

/// A namespace-qualified name.
///
/// `namespace` is `None` when the source document used an unprefixed name
/// and declared no default namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(namespace: Option<String>, local: impl Into<String>) -> Self {
        Self {
            namespace,
            local: local.into(),
        }
    }

    pub fn local(local: impl Into<String>) -> Self {
        Self::new(None, local)
    }

    pub fn xsd(local: impl Into<String>) -> Self {
        Self::new(Some(XSD_NAMESPACES[0].to_string()), local)
    }

    pub fn is_xsd(&self) -> bool {
        self.namespace
            .as_deref()
            .is_some_and(|ns| XSD_NAMESPACES.contains(&ns))
    }

    /// Local names must agree; namespaces only when both sides carry one.
    pub fn matches(&self, other: &QName) -> bool {
        self.local == other.local
            && match (&self.namespace, &other.namespace) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingStyle {
    #[default]
    Document,
    Rpc,
}

impl BindingStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Rpc => "rpc",
        }
    }
}

impl fmt::Display for BindingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WsdlDefinition {
    pub name: Option<String>,
    pub target_namespace: Option<String>,
    pub services: Vec<WsdlService>,
    pub bindings: Vec<WsdlBinding>,
    pub port_types: Vec<PortType>,
    pub messages: Vec<Message>,
    pub schema: SchemaSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WsdlService {
    pub name: String,
    pub ports: Vec<WsdlPort>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WsdlPort {
    pub name: String,
    pub binding: QName,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WsdlBinding {
    pub name: String,
    pub port_type: QName,
    pub style: BindingStyle,
    pub operations: Vec<BindingOperation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindingOperation {
    pub name: String,
    pub soap_action: Option<String>,
    /// Per-operation override of the binding style.
    pub style: Option<BindingStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortType {
    pub name: String,
    pub operations: Vec<PortTypeOperation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortTypeOperation {
    pub name: String,
    pub input: Option<QName>,
    pub output: Option<QName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessagePart {
    pub name: String,
    pub reference: PartReference,
}

/// `element=` parts are document style; `type=` parts are rpc style.
#[derive(Debug, Clone, PartialEq)]
pub enum PartReference {
    Element(QName),
    Type(QName),
}

// ============================================================================
// XML Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaSet {
    pub elements: Vec<ElementDecl>,
    pub complex_types: Vec<ComplexType>,
    pub simple_types: Vec<SimpleType>,
}

/// `maxOccurs` of an element particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl Default for MaxOccurs {
    fn default() -> Self {
        Self::Bounded(1)
    }
}

impl MaxOccurs {
    pub fn is_repeated(self) -> bool {
        match self {
            Self::Bounded(n) => n > 1,
            Self::Unbounded => true,
        }
    }
}

/// An `xsd:element`, top-level or nested in a content model.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDecl {
    pub name: QName,
    pub kind: ElementKind,
    pub min_occurs: Option<u32>,
    pub max_occurs: MaxOccurs,
}

impl ElementDecl {
    /// Absent `minOccurs` defaults to 1.
    pub fn is_required(&self) -> bool {
        self.min_occurs.is_none_or(|n| n >= 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// `type="ns:Name"`
    Named(QName),
    /// `ref="ns:Name"`, pointing at a top-level element.
    Ref(QName),
    InlineComplex(Box<ComplexType>),
    InlineSimple(Box<SimpleType>),
    /// No type given, which XML Schema reads as `xsd:anyType`.
    Untyped,
}

/// An `xsd:complexType`, flattened to its element and attribute fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplexType {
    /// `None` for anonymous types nested in an element.
    pub name: Option<QName>,
    /// `complexContent/extension` base, whose fields come first.
    pub base: Option<QName>,
    /// Elements of `sequence`, `all` and `choice` groups, in document order.
    pub elements: Vec<ElementDecl>,
    pub attributes: Vec<AttributeDecl>,
    /// Content-model constructs seen but not representable as properties
    /// (`xsd:any`, `xsd:group` references, `simpleContent`, ...).
    pub unsupported: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDecl {
    pub name: String,
    pub type_name: Option<QName>,
    pub required: bool,
}

/// An `xsd:simpleType` restriction, list or union.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleType {
    pub name: Option<QName>,
    pub base: Option<QName>,
    pub list_item: Option<QName>,
    pub is_union: bool,
    pub enumeration: Vec<String>,
}

// ============================================================================
// Lookups
// ============================================================================

impl WsdlDefinition {
    pub fn service(&self, name: &str) -> Result<&WsdlService, DomainError> {
        self.services
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| not_found("service", name, self.services.iter().map(|s| &s.name)))
    }

    pub fn binding(&self, name: &str) -> Result<&WsdlBinding, DomainError> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| not_found("binding", name, self.bindings.iter().map(|b| &b.name)))
    }

    pub fn binding_by_qname(&self, name: &QName) -> Result<&WsdlBinding, DomainError> {
        self.binding(&name.local)
    }

    /// Bindings reachable through the ports of `service`, without duplicates.
    pub fn service_bindings(&self, service: &WsdlService) -> Vec<&WsdlBinding> {
        let mut out: Vec<&WsdlBinding> = Vec::new();
        for port in &service.ports {
            if let Ok(binding) = self.binding_by_qname(&port.binding) {
                if !out.iter().any(|b| b.name == binding.name) {
                    out.push(binding);
                }
            }
        }
        out
    }

    pub fn port_type(&self, name: &QName) -> Result<&PortType, DomainError> {
        self.port_types
            .iter()
            .find(|p| p.name == name.local)
            .ok_or_else(|| {
                not_found(
                    "portType",
                    &name.local,
                    self.port_types.iter().map(|p| &p.name),
                )
            })
    }

    pub fn message(&self, name: &QName) -> Result<&Message, DomainError> {
        self.messages
            .iter()
            .find(|m| m.name == name.local)
            .ok_or_else(|| {
                not_found("message", &name.local, self.messages.iter().map(|m| &m.name))
            })
    }

    pub fn element(&self, name: &QName) -> Result<&ElementDecl, DomainError> {
        self.schema
            .elements
            .iter()
            .find(|e| e.name.matches(name))
            .ok_or_else(|| {
                not_found(
                    "element",
                    &name.local,
                    self.schema.elements.iter().map(|e| &e.name.local),
                )
            })
    }

    pub fn complex_type(&self, name: &QName) -> Option<&ComplexType> {
        self.schema
            .complex_types
            .iter()
            .find(|t| t.name.as_ref().is_some_and(|n| n.matches(name)))
    }

    pub fn simple_type(&self, name: &QName) -> Option<&SimpleType> {
        self.schema
            .simple_types
            .iter()
            .find(|t| t.name.as_ref().is_some_and(|n| n.matches(name)))
    }

    /// Names of all named schema types, for error messages.
    pub fn type_names(&self) -> Vec<String> {
        self.schema
            .complex_types
            .iter()
            .filter_map(|t| t.name.as_ref())
            .chain(self.schema.simple_types.iter().filter_map(|t| t.name.as_ref()))
            .map(|n| n.local.clone())
            .collect()
    }
}

impl WsdlBinding {
    pub fn operation(&self, name: &str) -> Result<&BindingOperation, DomainError> {
        self.operations
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| not_found("operation", name, self.operations.iter().map(|o| &o.name)))
    }

    pub fn operation_names(&self) -> Vec<String> {
        self.operations.iter().map(|o| o.name.clone()).collect()
    }
}

impl BindingOperation {
    pub fn effective_style(&self, binding: &WsdlBinding) -> BindingStyle {
        self.style.unwrap_or(binding.style)
    }
}

impl PortType {
    pub fn operation(&self, name: &str) -> Result<&PortTypeOperation, DomainError> {
        self.operations
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| not_found("operation", name, self.operations.iter().map(|o| &o.name)))
    }
}

fn not_found<'a>(
    kind: &'static str,
    name: &str,
    available: impl Iterator<Item = &'a String>,
) -> DomainError {
    DomainError::WsdlItemNotFound {
        kind,
        name: name.to_string(),
        available: available.cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> WsdlDefinition {
        WsdlDefinition {
            services: vec![WsdlService {
                name: "Calculator".into(),
                ports: vec![
                    WsdlPort {
                        name: "CalculatorSoap".into(),
                        binding: QName::local("CalculatorSoap"),
                        address: Some("http://www.dneonline.com/calculator.asmx".into()),
                    },
                    WsdlPort {
                        name: "CalculatorSoap12".into(),
                        binding: QName::local("CalculatorSoap12"),
                        address: None,
                    },
                ],
            }],
            bindings: vec![
                WsdlBinding {
                    name: "CalculatorSoap".into(),
                    port_type: QName::local("CalculatorSoap"),
                    style: BindingStyle::Document,
                    operations: vec![BindingOperation {
                        name: "Add".into(),
                        soap_action: Some("http://tempuri.org/Add".into()),
                        style: None,
                    }],
                },
                WsdlBinding {
                    name: "CalculatorSoap12".into(),
                    port_type: QName::local("CalculatorSoap"),
                    style: BindingStyle::Document,
                    operations: vec![],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn qname_matching_ignores_missing_namespace() {
        let a = QName::new(Some("urn:a".into()), "Add");
        assert!(a.matches(&QName::local("Add")));
        assert!(!a.matches(&QName::new(Some("urn:b".into()), "Add")));
        assert!(QName::xsd("int").is_xsd());
    }

    #[test]
    fn missing_binding_lists_alternatives() {
        let err = definition().binding("Nope").unwrap_err();
        assert_eq!(
            err,
            DomainError::WsdlItemNotFound {
                kind: "binding",
                name: "Nope".into(),
                available: vec!["CalculatorSoap".into(), "CalculatorSoap12".into()],
            }
        );
    }

    #[test]
    fn service_bindings_follow_ports() {
        let def = definition();
        let service = def.service("Calculator").unwrap();
        let names: Vec<_> = def
            .service_bindings(service)
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(names, ["CalculatorSoap", "CalculatorSoap12"]);
    }

    #[test]
    fn max_occurs_repetition() {
        assert!(!MaxOccurs::default().is_repeated());
        assert!(MaxOccurs::Bounded(3).is_repeated());
        assert!(MaxOccurs::Unbounded.is_repeated());
    }
}
