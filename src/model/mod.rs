//! Canonical interface model.
//!
//! An [`InterfaceModel`] is the categorized view of one IDL interface:
//! constructor signatures, the five member partitions, runtime flags, and
//! the identifier keys derived from them. It is built once per source file
//! by [`InterfaceModel::from_definitions`] and is read-only afterwards.

mod classify;

pub use classify::argument_string;

use std::fmt;

use serde::Serialize;

/// Classified subtype of an interface member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// `getter` operation
    Getter,
    /// `setter` operation
    Setter,
    /// `deleter` operation
    Deleter,
    /// `stringifier` operation
    Stringifier,
    /// Regular operation or promise-typed attribute
    Method,
    /// Plain attribute
    Property,
    /// `EventHandler`-typed attribute
    #[serde(rename = "eventhandler")]
    EventHandler,
}

impl MemberKind {
    /// Returns the lowercase name used in output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Deleter => "deleter",
            Self::Stringifier => "stringifier",
            Self::Method => "method",
            Self::Property => "property",
            Self::EventHandler => "eventhandler",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified interface member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedMember {
    /// Member subtype
    #[serde(rename = "type")]
    pub kind: MemberKind,
    /// Member name; `None` for stringifiers and unnamed getters
    pub name: Option<String>,
    /// Display form with arguments, e.g. `bar(DOMString x)`
    #[serde(rename = "interface", skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl ClassifiedMember {
    pub(crate) fn new(kind: MemberKind, name: Option<String>) -> Self {
        Self {
            kind,
            name,
            signature: None,
        }
    }

    /// The part of an identifier key contributed by this member.
    ///
    /// The interface form prefers the signature and falls back to the name.
    #[must_use]
    pub fn key_part(&self, form: KeyForm) -> Option<&str> {
        match form {
            KeyForm::Name => self.name.as_deref(),
            KeyForm::Interface => self.signature.as_deref().or(self.name.as_deref()),
        }
    }
}

/// Which member field identifier keys are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyForm {
    /// Bare member names: `Foo.bar`
    Name,
    /// Signatures with arguments: `Foo.bar(DOMString x)`
    Interface,
}

/// Type of a generated documentation page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    /// Interface landing page
    Interface,
    /// Constructor page
    Constructor,
    /// Method page
    Method,
    /// Property page
    Property,
    /// Event handler page
    Handler,
}

impl PageType {
    /// Returns the name used for templates and output files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::Constructor => "constructor",
            Self::Method => "method",
            Self::Property => "property",
            Self::Handler => "handler",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page to generate: the documented entity's name and its page type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSpec {
    /// Page name, e.g. the method name
    pub name: String,
    /// Page type, selects the template
    #[serde(rename = "type")]
    pub page_type: PageType,
}

/// Categorized model of one WebIDL interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceModel {
    /// Interface identifier
    pub name: String,
    /// A constructor is declared
    pub has_constructor: bool,
    /// Parenthesized argument lists, one per constructor
    pub constructor_signatures: Vec<String>,
    /// Runtime flag guarding the interface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Origin trial the interface belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_trial: Option<String>,
    /// `EventHandler` attributes
    pub event_handlers: Vec<ClassifiedMember>,
    /// Getter operations
    pub getters: Vec<ClassifiedMember>,
    /// Operations, promise attributes, stringifiers and members implied by
    /// iterable, maplike and setlike declarations
    pub methods: Vec<ClassifiedMember>,
    /// Plain attributes
    pub properties: Vec<ClassifiedMember>,
    /// Setter and deleter operations
    pub setters: Vec<ClassifiedMember>,
}

impl InterfaceModel {
    /// Iterates every classified member across the five partitions.
    pub fn members(&self) -> impl Iterator<Item = &ClassifiedMember> {
        self.event_handlers
            .iter()
            .chain(&self.getters)
            .chain(&self.methods)
            .chain(&self.properties)
            .chain(&self.setters)
    }

    /// Derives identifier keys of the form `Name<sep>member`.
    ///
    /// The list starts with the interface name, then the constructor (one
    /// key, or one per signature for [`KeyForm::Interface`]), then event
    /// handlers, getters, methods, properties and setters. Setters are keyed
    /// `Name[]` without a separator. Unnamed members contribute no key.
    #[must_use]
    pub fn identifier_keys(&self, separator: &str, form: KeyForm) -> Vec<String> {
        let name = &self.name;
        let mut keys = vec![name.clone()];

        if self.has_constructor {
            let base = format!("{name}{separator}{name}");
            match form {
                KeyForm::Interface => {
                    keys.extend(self.constructor_signatures.iter().map(|s| format!("{base}{s}")));
                }
                KeyForm::Name => keys.push(base),
            }
        }

        let separated = self
            .event_handlers
            .iter()
            .chain(&self.getters)
            .chain(&self.methods)
            .chain(&self.properties);
        for member in separated {
            if let Some(part) = member.key_part(form) {
                keys.push(format!("{name}{separator}{part}"));
            }
        }

        for member in &self.setters {
            if let Some(part) = member.key_part(form) {
                match member.kind {
                    MemberKind::Setter => keys.push(format!("{name}{part}")),
                    _ => keys.push(format!("{name}{separator}{part}")),
                }
            }
        }

        keys
    }

    /// Compatibility lookup keys: `Foo.bar`.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.identifier_keys(".", KeyForm::Name)
    }

    /// Keys with signatures: `Foo.bar(DOMString x)`.
    #[must_use]
    pub fn interfaces(&self) -> Vec<String> {
        self.identifier_keys(".", KeyForm::Interface)
    }

    /// Documentation path fragments: `Foo/bar`.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.identifier_keys("/", KeyForm::Name)
    }

    /// Derives the pages to generate, in build order.
    ///
    /// Overloaded methods produce a single page.
    #[must_use]
    pub fn page_specs(&self) -> Vec<PageSpec> {
        let mut pages = vec![PageSpec {
            name: self.name.clone(),
            page_type: PageType::Interface,
        }];
        if self.has_constructor {
            pages.push(PageSpec {
                name: self.name.clone(),
                page_type: PageType::Constructor,
            });
        }

        let groups = [
            (&self.methods, PageType::Method),
            (&self.properties, PageType::Property),
            (&self.event_handlers, PageType::Handler),
        ];
        for (members, page_type) in groups {
            for member in members {
                let Some(name) = member.name.as_ref() else {
                    continue;
                };
                let spec = PageSpec {
                    name: name.clone(),
                    page_type,
                };
                if !pages.contains(&spec) {
                    pages.push(spec);
                }
            }
        }
        pages
    }

    /// Returns a confirmation message when the interface is behind a
    /// runtime flag or in an origin trial.
    #[must_use]
    pub fn flag_warning(&self) -> Option<String> {
        let lead = match (&self.origin_trial, &self.flag) {
            (Some(_), Some(_)) => "This interface is in an origin trial and behind a flag",
            (Some(_), None) => "This interface is in an origin trial",
            (None, Some(_)) => "This interface is behind a flag",
            (None, None) => return None,
        };
        Some(format!(
            "{lead} and therefore should not be documented on MDN. Do you want to proceed?"
        ))
    }
}
