//! Namespace-aware element tree built from quick-xml events.
//!
//! WSDL cross-references elements by prefixed names in attribute values
//! (`type="tns:Quote"`), so each node keeps the prefix bindings in scope at
//! its position in the document.

use std::{collections::HashMap, rc::Rc};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use loopgen_core::domain::QName;

use super::WsdlReadError;

type Scope = Rc<HashMap<String, String>>;

#[derive(Debug, Clone)]
pub(crate) struct XmlNode {
    pub namespace: Option<String>,
    pub local: String,
    attributes: Vec<(String, String)>,
    scope: Scope,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn required_attr(&self, name: &str) -> Result<&str, WsdlReadError> {
        self.attr(name).ok_or_else(|| WsdlReadError::MissingAttribute {
            element: self.local.clone(),
            attribute: name.to_string(),
        })
    }

    /// Resolve a `prefix:local` attribute value against the in-scope bindings.
    pub fn qname_attr(&self, name: &str) -> Result<Option<QName>, WsdlReadError> {
        self.attr(name).map(|value| self.resolve(value)).transpose()
    }

    pub fn resolve(&self, value: &str) -> Result<QName, WsdlReadError> {
        let value = value.trim();
        match value.split_once(':') {
            Some((prefix, local)) => {
                let namespace = self.scope.get(prefix).cloned().ok_or_else(|| {
                    WsdlReadError::UnboundPrefix {
                        prefix: prefix.to_string(),
                        value: value.to_string(),
                    }
                })?;
                Ok(QName::new(Some(namespace), local))
            }
            None => Ok(QName::new(self.scope.get("").cloned(), value)),
        }
    }

    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.local == local && self.namespace.as_deref().is_none_or(|ns| ns == namespace)
    }

    pub fn children_named<'a, 'b>(&'a self, local: &'b str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.local == local)
    }

    pub fn child(&self, local: &str) -> Option<&XmlNode> {
        self.children_named(local).next()
    }
}

/// Parse a complete document and return its root element.
pub(crate) fn parse_document(xml: &str) -> Result<XmlNode, WsdlReadError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let parent = stack.last().map(|n| Rc::clone(&n.scope));
                stack.push(open(&e, parent)?);
            }
            Ok(Event::Empty(e)) => {
                let parent = stack.last().map(|n| Rc::clone(&n.scope));
                let node = open(&e, parent)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack.pop().ok_or_else(|| WsdlReadError::Xml {
                    position,
                    message: "unexpected closing tag".into(),
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(WsdlReadError::Xml {
                    position,
                    message: e.to_string(),
                });
            }
            // Text only appears in documentation and annotations.
            Ok(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(WsdlReadError::Xml {
            position: reader.buffer_position(),
            message: format!("unclosed element <{}>", stack[stack.len() - 1].local),
        });
    }
    root.ok_or(WsdlReadError::Empty)
}

fn open(e: &BytesStart<'_>, parent: Option<Scope>) -> Result<XmlNode, WsdlReadError> {
    let mut attributes = Vec::new();
    let mut declared: Vec<(String, String)> = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| WsdlReadError::Xml {
            position: 0,
            message: err.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| WsdlReadError::Xml {
                position: 0,
                message: err.to_string(),
            })?
            .into_owned();

        if key == "xmlns" {
            declared.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declared.push((prefix.to_string(), value));
        } else {
            // Attributes in this vocabulary are unprefixed.
            let local = key.rsplit(':').next().unwrap_or(&key).to_string();
            attributes.push((local, value));
        }
    }

    let scope = match (parent, declared.is_empty()) {
        (Some(parent), true) => parent,
        (parent, _) => {
            let mut map = parent.map(|p| (*p).clone()).unwrap_or_default();
            map.extend(declared);
            Rc::new(map)
        }
    };

    let raw = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let (prefix, local) = match raw.split_once(':') {
        Some((prefix, local)) => (prefix.to_string(), local.to_string()),
        None => (String::new(), raw),
    };
    let namespace = scope.get(&prefix).cloned();

    Ok(XmlNode {
        namespace,
        local,
        attributes,
        scope,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), WsdlReadError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(WsdlReadError::Xml {
                position: 0,
                message: format!("second root element <{}>", node.local),
            });
        }
    }
    Ok(())
}
