//! Interface model construction from a WebIDL syntax tree.

use tracing::{debug, warn};

use super::{ClassifiedMember, InterfaceModel, MemberKind};
use crate::error::IdlError;
use crate::idl::syntax::{
    Argument, Attribute, Definition, ExtendedAttribute, Interface, Member, Operation, Special,
};

/// Extended attribute marking a constructible interface.
const CONSTRUCTOR_ATTR: &str = "Constructor";

/// Extended attribute naming the runtime flag that guards an interface.
const RUNTIME_FLAG_ATTR: &str = "RuntimeEnabled";

/// Extended attribute naming the origin trial an interface belongs to.
const ORIGIN_TRIAL_ATTR: &str = "OriginTrialEnabled";

/// Attribute that `maplike` and `setlike` declarations add.
const SIZE_ATTR: &str = "size";

/// Members added by `iterable<...>`.
const ITERABLE_MEMBERS: &[&str] = &["entries", "forEach", "keys", "values"];

/// Members added by `async iterable<...>`.
const ASYNC_ITERABLE_MEMBERS: &[&str] = &["entries", "keys", "values"];

/// Members added by `maplike<...>`.
const MAPLIKE_MEMBERS: &[&str] = &[
    "clear", "delete", "entries", "forEach", "get", "has", "keys", "set", "size", "values",
];

/// Members added by `readonly maplike<...>`.
const READONLY_MAPLIKE_MEMBERS: &[&str] =
    &["entries", "forEach", "get", "has", "keys", "size", "values"];

/// Members added by `setlike<...>`.
const SETLIKE_MEMBERS: &[&str] = &[
    "add", "clear", "delete", "entries", "forEach", "has", "keys", "size", "values",
];

/// Members added by `readonly setlike<...>`.
const READONLY_SETLIKE_MEMBERS: &[&str] = &["entries", "forEach", "has", "keys", "size", "values"];

/// Joins arguments as `Type name` pairs separated by `", "`.
///
/// Constructor and method signatures both use this, so there is exactly one
/// trimming rule: no trailing separator.
#[must_use]
pub fn argument_string(args: &[Argument]) -> String {
    args.iter()
        .map(|arg| format!("{} {}", arg.idl_type.base_name(), arg.name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl InterfaceModel {
    /// Builds the model from the definitions in one source file.
    ///
    /// The first non-partial, non-mixin interface is documented; partial
    /// interfaces and mixins are used only when nothing else is present.
    ///
    /// # Errors
    ///
    /// Returns `IdlError::WrongDeclarationKind` if the source defines a
    /// dictionary, or `IdlError::NoInterfaceFound` if it defines no
    /// interface.
    pub fn from_definitions(defs: &[Definition], source_name: &str) -> Result<Self, IdlError> {
        let mut primary: Option<&Interface> = None;
        let mut fallback: Option<&Interface> = None;

        for def in defs {
            match def {
                Definition::Dictionary(dict) => {
                    return Err(IdlError::WrongDeclarationKind {
                        source_name: source_name.to_string(),
                        name: dict.name.clone(),
                    });
                }
                Definition::Interface(iface) if !iface.partial && !iface.mixin => {
                    primary.get_or_insert(iface);
                }
                Definition::Interface(iface) => {
                    fallback.get_or_insert(iface);
                }
                _ => {}
            }
        }

        let iface = primary
            .or(fallback)
            .ok_or_else(|| IdlError::NoInterfaceFound {
                source_name: source_name.to_string(),
            })?;

        let mut model = Self {
            name: iface.name.clone(),
            ..Self::default()
        };
        model.load_ext_attrs(&iface.ext_attrs);
        model.load_members(&iface.members);

        debug!(
            interface = %model.name,
            event_handlers = model.event_handlers.len(),
            getters = model.getters.len(),
            methods = model.methods.len(),
            properties = model.properties.len(),
            setters = model.setters.len(),
            constructors = model.constructor_signatures.len(),
            "classified interface"
        );
        Ok(model)
    }

    fn load_ext_attrs(&mut self, ext_attrs: &[ExtendedAttribute]) {
        for attr in ext_attrs {
            match attr.name.as_str() {
                CONSTRUCTOR_ATTR => {
                    let args = attr.arguments.as_deref().unwrap_or_default();
                    self.add_constructor(args);
                }
                RUNTIME_FLAG_ATTR => {
                    self.flag = attr.rhs.as_ref().map(|v| v.value());
                }
                ORIGIN_TRIAL_ATTR => {
                    self.origin_trial = attr.rhs.as_ref().map(|v| v.value());
                }
                _ => {}
            }
        }
    }

    fn add_constructor(&mut self, args: &[Argument]) {
        self.has_constructor = true;
        self.constructor_signatures
            .push(format!("({})", argument_string(args)));
    }

    fn load_members(&mut self, members: &[Member]) {
        let mut declarations = Vec::new();
        for member in members {
            let classified = match member {
                Member::Attribute(attr) => classify_attribute(attr),
                Member::Operation(op) => classify_operation(op),
                Member::Constructor { arguments } => {
                    self.add_constructor(arguments);
                    continue;
                }
                Member::Declaration { kind, readonly, .. } => {
                    declarations.push((kind.as_str(), *readonly));
                    continue;
                }
                Member::Const { .. } => continue,
            };
            if classified.name.is_none() && classified.kind != MemberKind::Stringifier {
                warn!(
                    interface = %self.name,
                    kind = %classified.kind,
                    "member has no name; it will be missing from generated pages"
                );
            }
            self.push(classified);
        }

        // Declared members come last so explicit overrides keep their
        // signatures.
        for (kind, readonly) in declarations {
            self.add_declared(kind, readonly);
        }
    }

    fn add_declared(&mut self, kind: &str, readonly: bool) {
        for &name in declared_members(kind, readonly) {
            let taken = self
                .methods
                .iter()
                .chain(&self.properties)
                .any(|m| m.name.as_deref() == Some(name));
            if taken {
                continue;
            }
            let member_kind = if name == SIZE_ATTR {
                MemberKind::Property
            } else {
                MemberKind::Method
            };
            self.push(ClassifiedMember::new(member_kind, Some(name.to_string())));
        }
    }

    fn push(&mut self, member: ClassifiedMember) {
        let partition = match member.kind {
            MemberKind::EventHandler => &mut self.event_handlers,
            MemberKind::Getter => &mut self.getters,
            MemberKind::Method | MemberKind::Stringifier => &mut self.methods,
            MemberKind::Property => &mut self.properties,
            MemberKind::Setter | MemberKind::Deleter => &mut self.setters,
        };
        partition.push(member);
    }
}

/// Members implied by an `iterable`, `maplike` or `setlike` declaration.
fn declared_members(kind: &str, readonly: bool) -> &'static [&'static str] {
    match (kind, readonly) {
        ("iterable", _) => ITERABLE_MEMBERS,
        ("async_iterable", _) => ASYNC_ITERABLE_MEMBERS,
        ("maplike", false) => MAPLIKE_MEMBERS,
        ("maplike", true) => READONLY_MAPLIKE_MEMBERS,
        ("setlike", false) => SETLIKE_MEMBERS,
        ("setlike", true) => READONLY_SETLIKE_MEMBERS,
        _ => &[],
    }
}

/// Classifies an attribute by the base name of its type.
fn classify_attribute(attr: &Attribute) -> ClassifiedMember {
    let kind = match attr.idl_type.base_name().as_str() {
        "EventHandler" => MemberKind::EventHandler,
        "Promise" => MemberKind::Method,
        _ => MemberKind::Property,
    };
    ClassifiedMember::new(kind, Some(attr.name.clone()))
}

/// Classifies an operation; the first matching special wins in the order
/// stringifier, getter, setter, deleter, then plain method.
fn classify_operation(op: &Operation) -> ClassifiedMember {
    if op.is(Special::Stringifier) {
        return ClassifiedMember::new(MemberKind::Stringifier, None);
    }
    if op.is(Special::Getter) {
        return with_arguments(MemberKind::Getter, getter_name(op), op);
    }
    if op.is(Special::Setter) {
        return ClassifiedMember::new(MemberKind::Setter, Some("[]".to_string()));
    }
    if op.is(Special::Deleter) {
        return ClassifiedMember::new(MemberKind::Deleter, Some("deleter".to_string()));
    }
    with_arguments(MemberKind::Method, op.name.clone(), op)
}

/// Getters are often anonymous, so the name falls back to the return type
/// and then to the first extended attribute's value.
fn getter_name(op: &Operation) -> Option<String> {
    match (&op.name, &op.return_type, op.ext_attrs.first()) {
        (Some(name), _, _) => Some(name.clone()),
        (None, Some(ty), _) => Some(ty.base_name()),
        (None, None, Some(ExtendedAttribute { rhs: Some(rhs), .. })) => Some(rhs.value()),
        _ => None,
    }
}

fn with_arguments(kind: MemberKind, name: Option<String>, op: &Operation) -> ClassifiedMember {
    let signature = match (&name, &op.arguments) {
        (Some(name), Some(args)) => Some(format!("{name}({})", argument_string(args))),
        _ => None,
    };
    ClassifiedMember {
        kind,
        name,
        signature,
    }
}
