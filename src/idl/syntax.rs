//! WebIDL syntax tree.
//!
//! Produced by [`super::parser`] or decoded from a pre-parsed JSON file.
//! Member kinds are a tagged union so consumers pattern-match on the
//! variant instead of probing for optional fields.

use serde::{Deserialize, Serialize};

/// A top-level WebIDL definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Definition {
    /// `interface Name : Base { ... };` (also `partial` and `mixin` forms)
    Interface(Interface),
    /// `dictionary Name : Base { ... };`
    Dictionary(Dictionary),
    /// `enum Name { "a", "b" };`
    Enum {
        /// Enum name
        name: String,
        /// String values in declaration order
        values: Vec<String>,
    },
    /// `callback Name = Return (args);` or `callback interface Name { ... };`
    Callback {
        /// Callback name
        name: String,
    },
    /// `typedef Type Name;`
    Typedef {
        /// New type name
        name: String,
        /// Aliased type
        idl_type: IdlType,
    },
    /// `Target includes Mixin;`
    Includes {
        /// Interface receiving the mixin
        target: String,
        /// Mixin being included
        mixin: String,
    },
}

impl Definition {
    /// Returns the defined name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Interface(i) => &i.name,
            Self::Dictionary(d) => &d.name,
            Self::Enum { name, .. } | Self::Callback { name } | Self::Typedef { name, .. } => name,
            Self::Includes { target, .. } => target,
        }
    }
}

/// An interface definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Interface name
    pub name: String,
    /// Inherited interface, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritance: Option<String>,
    /// `partial interface`
    #[serde(default)]
    pub partial: bool,
    /// `interface mixin`
    #[serde(default)]
    pub mixin: bool,
    /// Extended attributes preceding the definition
    #[serde(default)]
    pub ext_attrs: Vec<ExtendedAttribute>,
    /// Members in declaration order
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A dictionary definition. Members are kept only by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    /// Dictionary name
    pub name: String,
    /// Inherited dictionary, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritance: Option<String>,
    /// Extended attributes preceding the definition
    #[serde(default)]
    pub ext_attrs: Vec<ExtendedAttribute>,
    /// Field names in declaration order
    #[serde(default)]
    pub fields: Vec<String>,
}

/// An extended attribute such as `[Exposed=Window]` or `[Constructor(long x)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedAttribute {
    /// Attribute name
    pub name: String,
    /// Right-hand side of `Name=Value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhs: Option<ExtAttrValue>,
    /// Argument list of `Name(args)` or `Name=Value(args)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Argument>>,
}

/// Right-hand side of an extended attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtAttrValue {
    /// `Name=Value`
    Single(String),
    /// `Name=(A, B)`
    List(Vec<String>),
}

impl ExtAttrValue {
    /// Returns the value as one string; lists are comma-joined.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::Single(v) => v.clone(),
            Self::List(items) => items.join(","),
        }
    }
}

/// An interface member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Member {
    /// `attribute Type name;`
    Attribute(Attribute),
    /// `Type name(args);` with optional special keywords
    Operation(Operation),
    /// `constructor(args);`
    Constructor {
        /// Constructor arguments
        #[serde(default)]
        arguments: Vec<Argument>,
    },
    /// `const Type NAME = value;`
    Const {
        /// Constant name
        name: String,
        /// Constant type
        idl_type: IdlType,
        /// Literal value as written
        value: String,
    },
    /// `iterable<...>`, `maplike<...>` or `setlike<...>`
    Declaration {
        /// `iterable`, `async_iterable`, `maplike` or `setlike`
        kind: String,
        /// `readonly maplike<...>`
        #[serde(default)]
        readonly: bool,
        /// Type parameters
        type_args: Vec<IdlType>,
    },
}

/// An attribute member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name with any leading `_` escape removed
    pub name: String,
    /// Attribute type
    pub idl_type: IdlType,
    /// `readonly`
    #[serde(default)]
    pub readonly: bool,
    /// `static`
    #[serde(default)]
    pub is_static: bool,
    /// `stringifier attribute`
    #[serde(default)]
    pub stringifier: bool,
    /// Extended attributes on the member
    #[serde(default)]
    pub ext_attrs: Vec<ExtendedAttribute>,
}

/// Special keyword prefixing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    /// `getter`
    Getter,
    /// `setter`
    Setter,
    /// `deleter`
    Deleter,
    /// `stringifier`
    Stringifier,
    /// `static`
    Static,
}

/// An operation member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Special keywords in source order
    #[serde(default)]
    pub specials: Vec<Special>,
    /// Operation name, absent for anonymous special operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Return type; a bare `stringifier;` has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<IdlType>,
    /// Argument list; a bare `stringifier;` has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Argument>>,
    /// Extended attributes on the member
    #[serde(default)]
    pub ext_attrs: Vec<ExtendedAttribute>,
}

impl Operation {
    /// Returns `true` if the operation carries the given special keyword.
    #[must_use]
    pub fn is(&self, special: Special) -> bool {
        self.specials.contains(&special)
    }
}

/// An operation, constructor or extended-attribute argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name
    pub name: String,
    /// Argument type
    pub idl_type: IdlType,
    /// `optional`
    #[serde(default)]
    pub optional: bool,
    /// `Type... name`
    #[serde(default)]
    pub variadic: bool,
    /// Default value as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A WebIDL type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdlType {
    /// `DOMString`, `unsigned long`, `Node?`
    Single {
        /// Type name, multi-word names space-separated
        name: String,
        /// Trailing `?`
        #[serde(default)]
        nullable: bool,
    },
    /// `Promise<T>`, `sequence<T>`, `record<K, V>`
    Generic {
        /// Generic name
        name: String,
        /// Type arguments
        args: Vec<IdlType>,
        /// Trailing `?`
        #[serde(default)]
        nullable: bool,
    },
    /// `(A or B)`
    Union {
        /// Member types
        members: Vec<IdlType>,
        /// Trailing `?`
        #[serde(default)]
        nullable: bool,
    },
}

impl IdlType {
    /// Shorthand for a non-nullable single type.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Single {
            name: name.into(),
            nullable: false,
        }
    }

    /// The base name used in argument strings and classification.
    ///
    /// Generic types report their generic name (`Promise<void>` is
    /// `Promise`); unions report `(A or B)`.
    #[must_use]
    pub fn base_name(&self) -> String {
        match self {
            Self::Single { name, .. } | Self::Generic { name, .. } => name.clone(),
            Self::Union { members, .. } => {
                let parts: Vec<String> = members.iter().map(Self::base_name).collect();
                format!("({})", parts.join(" or "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_of_generic_is_generic_name() {
        let ty = IdlType::Generic {
            name: "Promise".to_string(),
            args: vec![IdlType::named("void")],
            nullable: false,
        };
        assert_eq!(ty.base_name(), "Promise");
    }

    #[test]
    fn base_name_of_union_lists_members() {
        let ty = IdlType::Union {
            members: vec![IdlType::named("DOMString"), IdlType::named("long")],
            nullable: true,
        };
        assert_eq!(ty.base_name(), "(DOMString or long)");
    }

    #[test]
    fn member_json_is_tagged() {
        let member = Member::Attribute(Attribute {
            name: "onload".to_string(),
            idl_type: IdlType::named("EventHandler"),
            readonly: false,
            is_static: false,
            stringifier: false,
            ext_attrs: Vec::new(),
        });
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["type"], "attribute");
        assert_eq!(json["idl_type"]["kind"], "single");

        let back: Member = serde_json::from_value(json).unwrap();
        assert_eq!(back, member);
    }

    #[test]
    fn ext_attr_list_value_joins() {
        let v = ExtAttrValue::List(vec!["Window".to_string(), "Worker".to_string()]);
        assert_eq!(v.value(), "Window,Worker");
    }
}
