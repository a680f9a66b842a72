//! WSDL operation to LoopBack model mapping.
//!
//! For each selected operation the mapper derives a request model from the
//! input message, a response model from the output message, and one model
//! per named complex type reachable from either. Each model is generated
//! once, however many operations refer to it.
//!
//! A message with a single `element=` part whose element has complex
//! content maps to a model named after that element (document/literal:
//! `GetQuote`, `GetQuoteResponse`). Any other message (rpc-style `type=`
//! parts, several parts, a simple element) maps to a model named after the
//! operation, or `<Operation>Response`, with one property per part.
//!
//! Two sources may only share a model name when they describe the same
//! content. An anonymous inline type whose name is taken by a different
//! shape is renamed to `<Owner><Element>`; every other clash is an error.

use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::api::{ApiModel, RemoteMethod};
use super::model::{ModelDefinition, PropertyDefinition, PropertyType};
use crate::domain::entities::ordered_map::OrderedMap;
use crate::domain::error::DomainError;
use crate::domain::naming;
use crate::domain::wsdl::{
    ComplexType, ElementDecl, ElementKind, Message, PartReference, QName, SimpleType,
    WsdlDefinition,
};

/// Everything generated for one binding.
#[derive(Debug, Clone, PartialEq)]
pub struct SoapApi {
    /// Request, response and complex-type models in generation order.
    pub models: Vec<ModelDefinition>,
    pub api: ApiModel,
}

impl SoapApi {
    pub fn model(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.iter().find(|m| m.name == name)
    }

    /// API model document. `options.soap` records the binding and the
    /// models generated with it, so a later run can tell its own files
    /// from files it must not overwrite.
    pub fn api_json(&self) -> Value {
        let models: Vec<&str> = self.models.iter().map(|m| m.name.as_str()).collect();
        let mut doc = self.api.to_json();
        doc["options"]["soap"] = json!({
            "service": self.api.service,
            "binding": self.api.binding,
            "models": models
        });
        doc
    }
}

/// Where a model name came from.
#[derive(Debug, Clone)]
enum Origin {
    Complex {
        content: ComplexType,
        label: String,
    },
    /// Properties collected from the parts of a message.
    Message(String),
}

impl Origin {
    fn same_content(&self, other: &Origin) -> bool {
        match (self, other) {
            (Self::Complex { content: a, .. }, Self::Complex { content: b, .. }) => a == b,
            (Self::Message(a), Self::Message(b)) => a == b,
            _ => false,
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Complex { label, .. } => label.clone(),
            Self::Message(name) => format!("message '{name}'"),
        }
    }
}

/// Maps operations of a WSDL binding to model definitions.
pub struct SoapMapper<'a> {
    wsdl: &'a WsdlDefinition,
    models: Vec<ModelDefinition>,
    origins: HashMap<String, Origin>,
    /// Models whose properties are being collected, innermost last.
    owners: Vec<String>,
}

impl<'a> SoapMapper<'a> {
    /// Map `operations` of `binding` in `service`. An empty selection maps
    /// every operation of the binding.
    #[instrument(skip_all, fields(service = %service, binding = %binding))]
    pub fn map(
        wsdl: &'a WsdlDefinition,
        service: &str,
        binding: &str,
        operations: &[String],
    ) -> Result<SoapApi, DomainError> {
        let svc = wsdl.service(service)?;
        let bindings = wsdl.service_bindings(svc);
        let binding = bindings
            .iter()
            .copied()
            .find(|b| b.name == binding)
            .ok_or_else(|| DomainError::WsdlItemNotFound {
                kind: "binding",
                name: binding.to_string(),
                available: bindings.iter().map(|b| b.name.clone()).collect(),
            })?;
        let port_type = wsdl.port_type(&binding.port_type)?;

        let selected: Vec<String> = if operations.is_empty() {
            binding.operation_names()
        } else {
            let mut unique: Vec<String> = Vec::new();
            for op in operations {
                if !unique.contains(op) {
                    unique.push(op.clone());
                }
            }
            unique
        };

        let mut mapper = SoapMapper {
            wsdl,
            models: Vec::new(),
            origins: HashMap::new(),
            owners: Vec::new(),
        };
        let mut methods = Vec::with_capacity(selected.len());

        for name in &selected {
            let op = binding.operation(name)?;
            let abstract_op = port_type.operation(name)?;
            debug!(operation = %name, style = %op.effective_style(binding), "Mapping operation");

            let request = abstract_op
                .input
                .as_ref()
                .map(|msg| mapper.message_model(msg, name.clone()))
                .transpose()?;
            let response = abstract_op
                .output
                .as_ref()
                .map(|msg| mapper.message_model(msg, format!("{name}Response")))
                .transpose()?;

            methods.push(RemoteMethod {
                operation: name.clone(),
                soap_action: op.soap_action.clone(),
                request,
                response,
            });
        }

        Ok(SoapApi {
            models: mapper.models,
            api: ApiModel::for_binding(&svc.name, &binding.name, methods),
        })
    }

    /// Map a message to a model and return the model name.
    fn message_model(&mut self, message: &QName, fallback: String) -> Result<String, DomainError> {
        let wsdl = self.wsdl;
        let msg = wsdl.message(message)?;
        let context = format!("message '{}'", msg.name);

        if let [part] = msg.parts.as_slice() {
            if let PartReference::Element(name) = &part.reference {
                let element = self.resolve_ref(wsdl.element(name)?)?;
                if let Some(complex) = self.complex_content(element) {
                    let model = element.name.local.clone();
                    let origin = Origin::Complex {
                        content: complex.clone(),
                        label: format!("element '{model}'"),
                    };
                    self.complex_model(&model, complex, origin, &context)?;
                    return Ok(model);
                }
            }
        }

        if !self.claim(&fallback, Origin::Message(msg.name.clone()))? {
            return Ok(fallback);
        }
        self.owners.push(fallback.clone());
        let properties = self.part_properties(msg, &context);
        self.owners.pop();
        self.fill(&fallback, properties?);
        Ok(fallback)
    }

    fn part_properties(
        &mut self,
        msg: &Message,
        context: &str,
    ) -> Result<OrderedMap<PropertyDefinition>, DomainError> {
        let wsdl = self.wsdl;
        let mut properties = OrderedMap::new();
        for part in &msg.parts {
            let property = match &part.reference {
                PartReference::Element(name) => {
                    let element = wsdl.element(name)?;
                    self.element_property(element, context)?
                }
                PartReference::Type(name) => {
                    PropertyDefinition::new(self.named_type(name, context)?, true)
                }
            };
            properties.insert(part.name.clone(), property);
        }
        Ok(properties)
    }

    /// Complex content of a top-level element, inline or by type name.
    fn complex_content(&self, element: &'a ElementDecl) -> Option<&'a ComplexType> {
        match &element.kind {
            ElementKind::InlineComplex(complex) => Some(complex.as_ref()),
            ElementKind::Named(name) if !name.is_xsd() => self.wsdl.complex_type(name),
            _ => None,
        }
    }

    fn resolve_ref(&self, element: &'a ElementDecl) -> Result<&'a ElementDecl, DomainError> {
        match &element.kind {
            ElementKind::Ref(target) => self.wsdl.element(target),
            _ => Ok(element),
        }
    }

    /// Generate the model for a complex type unless it already exists.
    fn complex_model(
        &mut self,
        name: &str,
        complex: &ComplexType,
        origin: Origin,
        context: &str,
    ) -> Result<(), DomainError> {
        if !self.claim(name, origin)? {
            return Ok(());
        }
        let context = format!("{context}, type '{name}'");
        self.owners.push(name.to_string());
        let properties = self.complex_properties(complex, &context);
        self.owners.pop();
        self.fill(name, properties?);
        Ok(())
    }

    /// Model for an anonymous type nested in `element`, renamed after its
    /// owner when the plain name already holds a different shape.
    fn inline_model(
        &mut self,
        element: &str,
        complex: &ComplexType,
        context: &str,
    ) -> Result<String, DomainError> {
        let name = naming::to_pascal_case(element);
        let owner = self.owners.last().cloned();
        let origin = Origin::Complex {
            content: complex.clone(),
            label: match &owner {
                Some(owner) => format!("inline type of element '{element}' in '{owner}'"),
                None => format!("inline type of element '{element}'"),
            },
        };

        let taken = self
            .origins
            .get(&name)
            .is_some_and(|existing| !existing.same_content(&origin));
        let name = match (taken, owner) {
            (true, Some(owner)) => {
                let qualified = format!("{owner}{name}");
                debug!(model = %name, renamed = %qualified, "Inline type name taken");
                qualified
            }
            _ => name,
        };
        self.complex_model(&name, complex, origin, context)?;
        Ok(name)
    }

    fn complex_properties(
        &mut self,
        complex: &ComplexType,
        context: &str,
    ) -> Result<OrderedMap<PropertyDefinition>, DomainError> {
        let wsdl = self.wsdl;
        if let Some(construct) = complex.unsupported.first() {
            return Err(DomainError::UnsupportedWsdlConstruct {
                context: context.to_string(),
                construct: construct.clone(),
            });
        }

        let mut properties = OrderedMap::new();

        if let Some(base) = complex.base.as_ref().filter(|b| !b.is_xsd()) {
            let base_type = wsdl
                .complex_type(base)
                .ok_or_else(|| self.unknown_type(base))?;
            properties = self.complex_properties(base_type, context)?;
        }

        for element in &complex.elements {
            let name = match &element.kind {
                ElementKind::Ref(target) => target.local.clone(),
                _ => element.name.local.clone(),
            };
            let property = self.element_property(element, context)?;
            properties.insert(name, property);
        }

        for attribute in &complex.attributes {
            let property_type = match &attribute.type_name {
                Some(name) => self.named_type(name, context)?,
                None => PropertyType::String,
            };
            properties.insert(
                attribute.name.clone(),
                PropertyDefinition::new(property_type, attribute.required),
            );
        }

        Ok(properties)
    }

    /// Property for an element particle; occurrence comes from the particle
    /// even when the type comes from a referenced element.
    fn element_property(
        &mut self,
        element: &ElementDecl,
        context: &str,
    ) -> Result<PropertyDefinition, DomainError> {
        let wsdl = self.wsdl;
        let target = match &element.kind {
            ElementKind::Ref(name) => wsdl.element(name)?,
            _ => element,
        };
        let item = self.element_type(target, context)?;
        let property_type = if element.max_occurs.is_repeated() {
            PropertyType::array_of(item)
        } else {
            item
        };
        Ok(PropertyDefinition::new(property_type, element.is_required()))
    }

    fn element_type(
        &mut self,
        element: &ElementDecl,
        context: &str,
    ) -> Result<PropertyType, DomainError> {
        let wsdl = self.wsdl;
        match &element.kind {
            ElementKind::Named(name) => self.named_type(name, context),
            ElementKind::InlineComplex(complex) => {
                let model = self.inline_model(&element.name.local, complex, context)?;
                Ok(PropertyType::Model(model))
            }
            ElementKind::InlineSimple(simple) => self.simple_type(simple, context),
            ElementKind::Ref(name) => {
                let target = wsdl.element(name)?;
                if matches!(target.kind, ElementKind::Ref(_)) {
                    return Err(DomainError::UnsupportedWsdlConstruct {
                        context: context.to_string(),
                        construct: format!("chained element reference '{}'", name.local),
                    });
                }
                self.element_type(target, context)
            }
            ElementKind::Untyped => Err(DomainError::UnsupportedWsdlConstruct {
                context: context.to_string(),
                construct: format!(
                    "element '{}' without a type (xsd:anyType)",
                    element.name.local
                ),
            }),
        }
    }

    fn named_type(&mut self, name: &QName, context: &str) -> Result<PropertyType, DomainError> {
        let wsdl = self.wsdl;
        if name.is_xsd() {
            return builtin_type(&name.local).ok_or_else(|| DomainError::UnsupportedWsdlConstruct {
                context: context.to_string(),
                construct: format!("xsd:{}", name.local),
            });
        }

        if let Some(complex) = wsdl.complex_type(name) {
            let origin = Origin::Complex {
                content: complex.clone(),
                label: format!("complex type '{}'", name.local),
            };
            self.complex_model(&name.local, complex, origin, context)?;
            return Ok(PropertyType::Model(name.local.clone()));
        }

        if let Some(simple) = wsdl.simple_type(name) {
            return self.simple_type(simple, context);
        }

        Err(self.unknown_type(name))
    }

    /// Simple types collapse onto their restriction base; lists become arrays.
    fn simple_type(
        &mut self,
        simple: &SimpleType,
        context: &str,
    ) -> Result<PropertyType, DomainError> {
        if let Some(item) = &simple.list_item {
            return Ok(PropertyType::array_of(self.named_type(item, context)?));
        }
        if simple.is_union {
            return Ok(PropertyType::String);
        }
        match &simple.base {
            Some(base) if simple.name.as_ref().is_some_and(|n| n == base) => {
                Err(DomainError::UnsupportedWsdlConstruct {
                    context: context.to_string(),
                    construct: format!("simple type '{}' restricts itself", base.local),
                })
            }
            Some(base) => self.named_type(base, context),
            None => Ok(PropertyType::String),
        }
    }

    fn unknown_type(&self, name: &QName) -> DomainError {
        DomainError::WsdlItemNotFound {
            kind: "type",
            name: name.local.clone(),
            available: self.wsdl.type_names(),
        }
    }

    /// Claim a model name. `Ok(false)` means the same content was
    /// generated under this name already.
    fn claim(&mut self, name: &str, origin: Origin) -> Result<bool, DomainError> {
        if let Some(existing) = self.origins.get(name) {
            if existing.same_content(&origin) {
                return Ok(false);
            }
            return Err(DomainError::ModelNameConflict {
                model: name.to_string(),
                first: existing.label(),
                second: origin.label(),
            });
        }
        self.origins.insert(name.to_string(), origin);
        self.models.push(ModelDefinition::new(name));
        Ok(true)
    }

    fn fill(&mut self, name: &str, properties: OrderedMap<PropertyDefinition>) {
        if let Some(model) = self.models.iter_mut().find(|m| m.name == name) {
            model.properties = properties;
        }
    }
}

/// JSON type of an XML Schema built-in.
///
/// `anyType` and `anySimpleType` carry no usable shape and are rejected.
pub fn builtin_type(local: &str) -> Option<PropertyType> {
    let ty = match local {
        "string" | "normalizedString" | "token" | "language" | "Name" | "NCName" | "ID"
        | "IDREF" | "IDREFS" | "ENTITY" | "ENTITIES" | "NMTOKEN" | "NMTOKENS" | "anyURI"
        | "QName" | "NOTATION" | "date" | "dateTime" | "time" | "duration" | "gYear"
        | "gYearMonth" | "gMonth" | "gMonthDay" | "gDay" | "base64Binary" | "hexBinary" => {
            PropertyType::String
        }
        "decimal" | "integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" | "nonPositiveInteger" | "negativeInteger" | "unsignedLong"
        | "unsignedInt" | "unsignedShort" | "unsignedByte" | "float" | "double" => {
            PropertyType::Number
        }
        "boolean" => PropertyType::Boolean,
        _ => return None,
    };
    Some(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wsdl::*;

    const TNS: &str = "http://tempuri.org/";

    fn tns(local: &str) -> QName {
        QName::new(Some(TNS.into()), local)
    }

    fn el(name: &str, kind: ElementKind, min: Option<u32>, max: MaxOccurs) -> ElementDecl {
        ElementDecl {
            name: tns(name),
            kind,
            min_occurs: min,
            max_occurs: max,
        }
    }

    fn xsd_el(name: &str, ty: &str, min: Option<u32>) -> ElementDecl {
        el(name, ElementKind::Named(QName::xsd(ty)), min, MaxOccurs::default())
    }

    fn inline(elements: Vec<ElementDecl>) -> ElementKind {
        ElementKind::InlineComplex(Box::new(ComplexType {
            elements,
            ..Default::default()
        }))
    }

    fn message(name: &str, element: &str) -> Message {
        Message {
            name: name.into(),
            parts: vec![MessagePart {
                name: "parameters".into(),
                reference: PartReference::Element(tns(element)),
            }],
        }
    }

    fn document_wsdl(
        service: &str,
        binding: &str,
        ops: &[&str],
        elements: Vec<ElementDecl>,
        complex_types: Vec<ComplexType>,
    ) -> WsdlDefinition {
        let mut messages = Vec::new();
        let mut port_ops = Vec::new();
        let mut binding_ops = Vec::new();
        for op in ops {
            messages.push(message(&format!("{op}SoapIn"), op));
            messages.push(message(&format!("{op}SoapOut"), &format!("{op}Response")));
            port_ops.push(PortTypeOperation {
                name: op.to_string(),
                input: Some(tns(&format!("{op}SoapIn"))),
                output: Some(tns(&format!("{op}SoapOut"))),
            });
            binding_ops.push(BindingOperation {
                name: op.to_string(),
                soap_action: Some(format!("{TNS}{op}")),
                style: None,
            });
        }

        WsdlDefinition {
            target_namespace: Some(TNS.into()),
            services: vec![WsdlService {
                name: service.into(),
                ports: vec![WsdlPort {
                    name: binding.into(),
                    binding: tns(binding),
                    address: Some("http://localhost/svc".into()),
                }],
            }],
            bindings: vec![WsdlBinding {
                name: binding.into(),
                port_type: tns(&format!("{binding}PortType")),
                style: BindingStyle::Document,
                operations: binding_ops,
            }],
            port_types: vec![PortType {
                name: format!("{binding}PortType"),
                operations: port_ops,
            }],
            messages,
            schema: SchemaSet {
                elements,
                complex_types,
                simple_types: vec![],
            },
            ..Default::default()
        }
    }

    fn calculator() -> WsdlDefinition {
        let ops = ["Add", "Divide", "Multiply", "Subtract"];
        let mut elements = Vec::new();
        for op in ops {
            elements.push(el(
                op,
                inline(vec![
                    xsd_el("intA", "int", Some(1)),
                    xsd_el("intB", "int", Some(1)),
                ]),
                None,
                MaxOccurs::default(),
            ));
            elements.push(el(
                &format!("{op}Response"),
                inline(vec![xsd_el(&format!("{op}Result"), "int", Some(1))]),
                None,
                MaxOccurs::default(),
            ));
        }
        document_wsdl("Calculator", "CalculatorSoap", &ops, elements, vec![])
    }

    fn stock_quote() -> WsdlDefinition {
        let elements = vec![
            el(
                "GetQuote",
                inline(vec![
                    xsd_el("symbol", "string", Some(0)),
                    el(
                        "globals",
                        ElementKind::Named(tns("Globals")),
                        Some(1),
                        MaxOccurs::default(),
                    ),
                ]),
                None,
                MaxOccurs::default(),
            ),
            el(
                "GetQuoteResponse",
                inline(vec![xsd_el("GetQuoteResult", "string", Some(0))]),
                None,
                MaxOccurs::default(),
            ),
        ];
        let globals = ComplexType {
            name: Some(tns("Globals")),
            elements: vec![xsd_el("Promise", "boolean", Some(1))],
            ..Default::default()
        };
        document_wsdl("StockQuote", "StockQuoteSoap", &["GetQuote"], elements, vec![globals])
    }

    fn ops(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn calculator_operations_map_to_numeric_models() {
        let wsdl = calculator();
        let api = SoapMapper::map(
            &wsdl,
            "Calculator",
            "CalculatorSoap",
            &ops(&["Add", "Divide", "Multiply", "Subtract"]),
        )
        .unwrap();

        for op in ["Add", "Divide", "Multiply", "Subtract"] {
            let request = api.model(op).unwrap();
            assert_eq!(
                request.properties.get("intA").unwrap().property_type,
                PropertyType::Number
            );
            assert_eq!(
                request.properties.get("intB").unwrap().property_type,
                PropertyType::Number
            );
            assert!(request.properties.get("intA").unwrap().required);

            let response = api.model(&format!("{op}Response")).unwrap();
            assert_eq!(
                response
                    .properties
                    .get(&format!("{op}Result"))
                    .unwrap()
                    .property_type,
                PropertyType::Number
            );
        }
        assert_eq!(api.models.len(), 8);
        assert_eq!(api.api.methods.len(), 4);
    }

    #[test]
    fn stock_quote_generates_nested_complex_type_once() {
        let wsdl = stock_quote();
        let api = SoapMapper::map(&wsdl, "StockQuote", "StockQuoteSoap", &ops(&["GetQuote"]))
            .unwrap();

        let names: Vec<_> = api.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["GetQuote", "Globals", "GetQuoteResponse"]);

        let request = api.model("GetQuote").unwrap();
        let symbol = request.properties.get("symbol").unwrap();
        assert_eq!(symbol.property_type, PropertyType::String);
        assert!(!symbol.required);
        assert_eq!(
            request.properties.get("globals").unwrap().property_type,
            PropertyType::Model("Globals".into())
        );
        assert_eq!(
            api.model("Globals")
                .unwrap()
                .properties
                .get("Promise")
                .unwrap()
                .property_type,
            PropertyType::Boolean
        );
    }

    #[test]
    fn empty_selection_maps_every_operation() {
        let wsdl = calculator();
        let api = SoapMapper::map(&wsdl, "Calculator", "CalculatorSoap", &[]).unwrap();
        let methods: Vec<_> = api.api.methods.iter().map(|m| m.operation.as_str()).collect();
        assert_eq!(methods, ["Add", "Divide", "Multiply", "Subtract"]);
    }

    #[test]
    fn rpc_parts_become_operation_model_properties() {
        let mut wsdl = document_wsdl("RPCLiteralService", "RPCLiteralTest2.0Binding", &[], vec![], vec![]);
        wsdl.bindings[0].style = BindingStyle::Rpc;
        wsdl.bindings[0].operations.push(BindingOperation {
            name: "myMethod".into(),
            soap_action: None,
            style: None,
        });
        wsdl.port_types[0].operations.push(PortTypeOperation {
            name: "myMethod".into(),
            input: Some(tns("myMethodRequest")),
            output: Some(tns("empty")),
        });
        wsdl.messages = vec![
            Message {
                name: "myMethodRequest".into(),
                parts: vec![
                    MessagePart {
                        name: "x".into(),
                        reference: PartReference::Type(QName::xsd("int")),
                    },
                    MessagePart {
                        name: "y".into(),
                        reference: PartReference::Type(QName::xsd("float")),
                    },
                ],
            },
            Message {
                name: "empty".into(),
                parts: vec![],
            },
        ];

        let api = SoapMapper::map(&wsdl, "RPCLiteralService", "RPCLiteralTest2.0Binding", &[])
            .unwrap();

        let request = api.model("myMethod").unwrap();
        assert_eq!(request.properties.keys().collect::<Vec<_>>(), ["x", "y"]);
        assert!(api.model("myMethodResponse").unwrap().properties.is_empty());
        assert_eq!(api.api.file_stem, "soap-rpc-literal-test-2-0-binding");
    }

    #[test]
    fn unbounded_elements_become_arrays() {
        let mut wsdl = stock_quote();
        wsdl.schema.complex_types[0]
            .elements
            .push(el("tags", ElementKind::Named(QName::xsd("string")), Some(0), MaxOccurs::Unbounded));

        let api = SoapMapper::map(&wsdl, "StockQuote", "StockQuoteSoap", &[]).unwrap();
        assert_eq!(
            api.model("Globals").unwrap().properties.get("tags").unwrap().property_type,
            PropertyType::array_of(PropertyType::String)
        );
    }

    #[test]
    fn simple_types_resolve_through_restriction_base() {
        let mut wsdl = stock_quote();
        wsdl.schema.simple_types.push(SimpleType {
            name: Some(tns("Currency")),
            base: Some(QName::xsd("decimal")),
            enumeration: vec![],
            ..Default::default()
        });
        wsdl.schema.complex_types[0].elements.push(el(
            "price",
            ElementKind::Named(tns("Currency")),
            None,
            MaxOccurs::default(),
        ));

        let api = SoapMapper::map(&wsdl, "StockQuote", "StockQuoteSoap", &[]).unwrap();
        let price = api.model("Globals").unwrap().properties.get("price").cloned().unwrap();
        assert_eq!(price, PropertyDefinition::new(PropertyType::Number, true));
    }

    #[test]
    fn any_type_is_rejected_with_context() {
        let mut wsdl = stock_quote();
        wsdl.schema.complex_types[0]
            .elements
            .push(xsd_el("payload", "anyType", None));

        let err = SoapMapper::map(&wsdl, "StockQuote", "StockQuoteSoap", &[]).unwrap_err();
        match err {
            DomainError::UnsupportedWsdlConstruct { context, construct } => {
                assert!(context.contains("Globals"));
                assert_eq!(construct, "xsd:anyType");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_lists_declared_types() {
        let mut wsdl = stock_quote();
        wsdl.schema.complex_types[0].elements.push(el(
            "missing",
            ElementKind::Named(tns("Nope")),
            None,
            MaxOccurs::default(),
        ));

        let err = SoapMapper::map(&wsdl, "StockQuote", "StockQuoteSoap", &[]).unwrap_err();
        assert_eq!(
            err,
            DomainError::WsdlItemNotFound {
                kind: "type",
                name: "Nope".into(),
                available: vec!["Globals".into()],
            }
        );
    }

    #[test]
    fn unknown_selection_lists_alternatives() {
        let wsdl = calculator();

        let err = SoapMapper::map(&wsdl, "Calc", "CalculatorSoap", &[]).unwrap_err();
        assert!(matches!(err, DomainError::WsdlItemNotFound { kind: "service", .. }));

        let err = SoapMapper::map(&wsdl, "Calculator", "Nope", &[]).unwrap_err();
        assert!(err.to_string().contains("CalculatorSoap"));

        let err =
            SoapMapper::map(&wsdl, "Calculator", "CalculatorSoap", &ops(&["Modulo"])).unwrap_err();
        match err {
            DomainError::WsdlItemNotFound {
                kind, available, ..
            } => {
                assert_eq!(kind, "operation");
                assert_eq!(available, ["Add", "Divide", "Multiply", "Subtract"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unsupported_content_model_is_reported() {
        let mut wsdl = stock_quote();
        wsdl.schema.complex_types[0].unsupported.push("xsd:any".into());

        let err = SoapMapper::map(&wsdl, "StockQuote", "StockQuoteSoap", &[]).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedWsdlConstruct { .. }));
    }

    fn filtered_calculator() -> WsdlDefinition {
        let filter = |fields: &[(&str, &str)]| {
            el(
                "filter",
                inline(fields.iter().map(|(n, t)| xsd_el(n, t, Some(1))).collect()),
                Some(1),
                MaxOccurs::default(),
            )
        };
        let elements = vec![
            el(
                "Add",
                inline(vec![filter(&[("limit", "int")])]),
                None,
                MaxOccurs::default(),
            ),
            el(
                "AddResponse",
                inline(vec![xsd_el("AddResult", "int", Some(1))]),
                None,
                MaxOccurs::default(),
            ),
            el(
                "Divide",
                inline(vec![filter(&[("divisor", "int"), ("exact", "boolean")])]),
                None,
                MaxOccurs::default(),
            ),
            el(
                "DivideResponse",
                inline(vec![xsd_el("DivideResult", "int", Some(1))]),
                None,
                MaxOccurs::default(),
            ),
        ];
        document_wsdl("Calculator", "CalculatorSoap", &["Add", "Divide"], elements, vec![])
    }

    #[test]
    fn differing_inline_types_with_one_name_are_kept_apart() {
        let wsdl = filtered_calculator();
        let api = SoapMapper::map(&wsdl, "Calculator", "CalculatorSoap", &[]).unwrap();

        let names: Vec<_> = api.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            ["Add", "Filter", "AddResponse", "Divide", "DivideFilter", "DivideResponse"]
        );
        assert_eq!(
            api.model("Add").unwrap().properties.get("filter").unwrap().property_type,
            PropertyType::Model("Filter".into())
        );
        assert_eq!(
            api.model("Divide").unwrap().properties.get("filter").unwrap().property_type,
            PropertyType::Model("DivideFilter".into())
        );

        let filter = api.model("Filter").unwrap();
        assert!(filter.properties.get("limit").is_some());
        assert!(filter.properties.get("divisor").is_none());
        let divide_filter = api.model("DivideFilter").unwrap();
        assert!(divide_filter.properties.get("divisor").is_some());
        assert!(divide_filter.properties.get("exact").is_some());
    }

    #[test]
    fn identical_inline_types_share_one_model() {
        let mut wsdl = filtered_calculator();
        let add_filter = wsdl.schema.elements[0].clone();
        wsdl.schema.elements[2] = ElementDecl {
            name: tns("Divide"),
            ..add_filter
        };

        let api = SoapMapper::map(&wsdl, "Calculator", "CalculatorSoap", &[]).unwrap();
        assert!(api.model("DivideFilter").is_none());
        assert_eq!(
            api.model("Divide").unwrap().properties.get("filter").unwrap().property_type,
            PropertyType::Model("Filter".into())
        );
    }

    #[test]
    fn named_type_clashing_with_element_model_is_a_conflict() {
        let mut wsdl = stock_quote();
        wsdl.schema.complex_types.push(ComplexType {
            name: Some(tns("GetQuoteResponse")),
            elements: vec![xsd_el("price", "double", Some(1))],
            ..Default::default()
        });
        if let ElementKind::InlineComplex(complex) = &mut wsdl.schema.elements[0].kind {
            complex.elements.push(el(
                "last",
                ElementKind::Named(tns("GetQuoteResponse")),
                Some(0),
                MaxOccurs::default(),
            ));
        }

        let err = SoapMapper::map(&wsdl, "StockQuote", "StockQuoteSoap", &[]).unwrap_err();
        match err {
            DomainError::ModelNameConflict { model, .. } => assert_eq!(model, "GetQuoteResponse"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn builtin_type_table() {
        assert_eq!(builtin_type("dateTime"), Some(PropertyType::String));
        assert_eq!(builtin_type("unsignedShort"), Some(PropertyType::Number));
        assert_eq!(builtin_type("boolean"), Some(PropertyType::Boolean));
        assert_eq!(builtin_type("anyType"), None);
    }
}
