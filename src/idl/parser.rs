//! Recursive-descent WebIDL parser.
//!
//! Covers the definitions and member forms that appear in browser IDL
//! files. `namespace` blocks and `callback interface` bodies are skipped
//! over since they never describe a documentable interface.

use super::lexer::{Token, TokenKind, tokenize};
use super::syntax::{
    Argument, Attribute, Definition, Dictionary, ExtAttrValue, ExtendedAttribute, IdlType,
    Interface, Member, Operation, Special,
};
use crate::error::IdlError;

/// Generic type names that take `<...>` parameters.
const GENERIC_TYPES: &[&str] = &[
    "Promise",
    "sequence",
    "FrozenArray",
    "ObservableArray",
    "record",
    "async_sequence",
];

/// Deepest nesting of types and argument lists.
const MAX_NESTING: usize = 64;

/// Parses WebIDL source text into a list of definitions.
///
/// # Errors
///
/// Returns `IdlError::Syntax` if the text is not valid WebIDL.
pub fn parse(source: &str) -> Result<Vec<Definition>, IdlError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    parser.definitions()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn peek_ident(&self) -> Option<&str> {
        match self.peek() {
            Some(TokenKind::Ident(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    fn is_punct(&self, c: char) -> bool {
        self.peek() == Some(&TokenKind::Punct(c))
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.is_punct(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_ident() == Some(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<(), IdlError> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), IdlError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{keyword}'")))
        }
    }

    fn expect_ident(&mut self) -> Result<String, IdlError> {
        match self.peek() {
            Some(TokenKind::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.error("expected identifier")),
        }
    }

    /// Identifiers may be escaped with a leading `_` to avoid keywords.
    fn expect_name(&mut self) -> Result<String, IdlError> {
        let raw = self.expect_ident()?;
        Ok(raw.strip_prefix('_').map_or_else(|| raw.clone(), str::to_string))
    }

    fn error(&self, message: &str) -> IdlError {
        let (line, column, found) = match self.tokens.get(self.pos) {
            Some(token) => (token.line, token.column, describe(&token.kind)),
            None => self
                .tokens
                .last()
                .map_or((1, 1, "end of input".to_string()), |t| {
                    (t.line, t.column, "end of input".to_string())
                }),
        };
        IdlError::Syntax {
            line,
            column,
            message: format!("{message}, found {found}"),
        }
    }

    /// Skips a balanced `{ ... }` block starting at the current `{`.
    fn skip_block(&mut self) -> Result<(), IdlError> {
        self.expect_punct('{')?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek() {
                None => return Err(self.error("unterminated block")),
                Some(TokenKind::Punct('{')) => depth += 1,
                Some(TokenKind::Punct('}')) => depth -= 1,
                Some(_) => {}
            }
            self.pos += 1;
        }
        Ok(())
    }

    /// Runs a recursive production, failing once nesting exceeds
    /// [`MAX_NESTING`]. Every cycle in the grammar passes through a type or
    /// an argument list.
    fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, IdlError>,
    ) -> Result<T, IdlError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn skip_to_semicolon(&mut self) -> Result<(), IdlError> {
        while !self.eat_punct(';') {
            if self.peek().is_none() {
                return Err(self.error("expected ';'"));
            }
            self.pos += 1;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Definitions
    // ------------------------------------------------------------------

    fn definitions(&mut self) -> Result<Vec<Definition>, IdlError> {
        let mut defs = Vec::new();
        while self.peek().is_some() {
            let ext_attrs = self.ext_attrs()?;
            if let Some(def) = self.definition(ext_attrs)? {
                defs.push(def);
            }
        }
        Ok(defs)
    }

    fn definition(
        &mut self,
        ext_attrs: Vec<ExtendedAttribute>,
    ) -> Result<Option<Definition>, IdlError> {
        let partial = self.eat_keyword("partial");
        match self.peek_ident() {
            Some("interface") => {
                self.pos += 1;
                self.interface(ext_attrs, partial).map(Some)
            }
            Some("dictionary") => {
                self.pos += 1;
                self.dictionary(ext_attrs).map(Some)
            }
            Some("namespace") => {
                self.pos += 1;
                self.expect_ident()?;
                self.skip_block()?;
                self.expect_punct(';')?;
                Ok(None)
            }
            Some("enum") if !partial => {
                self.pos += 1;
                self.enumeration().map(Some)
            }
            Some("callback") if !partial => {
                self.pos += 1;
                self.callback().map(Some)
            }
            Some("typedef") if !partial => {
                self.pos += 1;
                self.ext_attrs()?;
                let idl_type = self.idl_type()?;
                let name = self.expect_name()?;
                self.expect_punct(';')?;
                Ok(Some(Definition::Typedef { name, idl_type }))
            }
            Some(_) if !partial && self.peek_at(1) == Some(&TokenKind::Ident("includes".into())) => {
                let target = self.expect_name()?;
                self.expect_keyword("includes")?;
                let mixin = self.expect_name()?;
                self.expect_punct(';')?;
                Ok(Some(Definition::Includes { target, mixin }))
            }
            _ => Err(self.error("expected definition")),
        }
    }

    fn interface(
        &mut self,
        ext_attrs: Vec<ExtendedAttribute>,
        partial: bool,
    ) -> Result<Definition, IdlError> {
        let mixin = self.eat_keyword("mixin");
        let name = self.expect_name()?;
        let inheritance = if self.eat_punct(':') {
            Some(self.expect_name()?)
        } else {
            None
        };
        self.expect_punct('{')?;
        let mut members = Vec::new();
        while !self.eat_punct('}') {
            if self.peek().is_none() {
                return Err(self.error("expected '}'"));
            }
            members.push(self.member()?);
        }
        self.expect_punct(';')?;
        Ok(Definition::Interface(Interface {
            name,
            inheritance,
            partial,
            mixin,
            ext_attrs,
            members,
        }))
    }

    fn dictionary(&mut self, ext_attrs: Vec<ExtendedAttribute>) -> Result<Definition, IdlError> {
        let name = self.expect_name()?;
        let inheritance = if self.eat_punct(':') {
            Some(self.expect_name()?)
        } else {
            None
        };
        self.expect_punct('{')?;
        let mut fields = Vec::new();
        while !self.eat_punct('}') {
            self.ext_attrs()?;
            self.eat_keyword("required");
            self.idl_type()?;
            fields.push(self.expect_name()?);
            if self.eat_punct('=') {
                self.default_value()?;
            }
            self.expect_punct(';')?;
        }
        self.expect_punct(';')?;
        Ok(Definition::Dictionary(Dictionary {
            name,
            inheritance,
            ext_attrs,
            fields,
        }))
    }

    fn enumeration(&mut self) -> Result<Definition, IdlError> {
        let name = self.expect_name()?;
        self.expect_punct('{')?;
        let mut values = Vec::new();
        while !self.eat_punct('}') {
            match self.peek() {
                Some(TokenKind::Str(value)) => {
                    values.push(value.clone());
                    self.pos += 1;
                }
                _ => return Err(self.error("expected enum value")),
            }
            if !self.eat_punct(',') && !self.is_punct('}') {
                return Err(self.error("expected ',' or '}'"));
            }
        }
        self.expect_punct(';')?;
        Ok(Definition::Enum { name, values })
    }

    fn callback(&mut self) -> Result<Definition, IdlError> {
        if self.eat_keyword("interface") {
            let name = self.expect_name()?;
            self.skip_block()?;
            self.expect_punct(';')?;
            return Ok(Definition::Callback { name });
        }
        let name = self.expect_name()?;
        self.skip_to_semicolon()?;
        Ok(Definition::Callback { name })
    }

    // ------------------------------------------------------------------
    // Extended attributes
    // ------------------------------------------------------------------

    fn ext_attrs(&mut self) -> Result<Vec<ExtendedAttribute>, IdlError> {
        let mut attrs = Vec::new();
        if !self.eat_punct('[') {
            return Ok(attrs);
        }
        loop {
            attrs.push(self.ext_attr()?);
            if self.eat_punct(']') {
                break;
            }
            self.expect_punct(',')?;
        }
        Ok(attrs)
    }

    fn ext_attr(&mut self) -> Result<ExtendedAttribute, IdlError> {
        let name = self.expect_ident()?;
        let rhs = if self.eat_punct('=') {
            Some(self.ext_attr_value()?)
        } else {
            None
        };
        let arguments = if self.is_punct('(') {
            Some(self.arguments()?)
        } else {
            None
        };
        Ok(ExtendedAttribute {
            name,
            rhs,
            arguments,
        })
    }

    fn ext_attr_value(&mut self) -> Result<ExtAttrValue, IdlError> {
        if self.eat_punct('(') {
            let mut items = Vec::new();
            while !self.eat_punct(')') {
                items.push(self.ext_attr_atom()?);
                if !self.eat_punct(',') && !self.is_punct(')') {
                    return Err(self.error("expected ',' or ')'"));
                }
            }
            return Ok(ExtAttrValue::List(items));
        }
        self.ext_attr_atom().map(ExtAttrValue::Single)
    }

    fn ext_attr_atom(&mut self) -> Result<String, IdlError> {
        let value = match self.peek() {
            Some(TokenKind::Ident(v) | TokenKind::Str(v) | TokenKind::Number(v)) => v.clone(),
            Some(TokenKind::Punct('*')) => "*".to_string(),
            _ => return Err(self.error("expected extended attribute value")),
        };
        self.pos += 1;
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    fn member(&mut self) -> Result<Member, IdlError> {
        let ext_attrs = self.ext_attrs()?;

        if self.eat_keyword("const") {
            let idl_type = self.idl_type()?;
            let name = self.expect_name()?;
            self.expect_punct('=')?;
            let value = self.default_value()?;
            self.expect_punct(';')?;
            return Ok(Member::Const {
                name,
                idl_type,
                value,
            });
        }

        if self.peek_ident() == Some("constructor") && self.peek_at(1) == Some(&TokenKind::Punct('('))
        {
            self.pos += 1;
            let arguments = self.arguments()?;
            self.expect_punct(';')?;
            return Ok(Member::Constructor { arguments });
        }

        let mut specials = Vec::new();
        let mut readonly = false;
        let mut is_async = false;
        loop {
            match self.peek_ident() {
                Some("static") => specials.push(Special::Static),
                Some("stringifier") => specials.push(Special::Stringifier),
                Some("getter") => specials.push(Special::Getter),
                Some("setter") => specials.push(Special::Setter),
                Some("deleter") => specials.push(Special::Deleter),
                Some("readonly") => readonly = true,
                Some("inherit") => {}
                Some("async") if self.peek_at(1) == Some(&TokenKind::Ident("iterable".into())) => {
                    is_async = true;
                }
                _ => break,
            }
            self.pos += 1;
        }

        match self.peek_ident() {
            Some("attribute") => {
                self.pos += 1;
                let idl_type = self.idl_type()?;
                let name = self.expect_name()?;
                self.expect_punct(';')?;
                return Ok(Member::Attribute(Attribute {
                    name,
                    idl_type,
                    readonly,
                    is_static: specials.contains(&Special::Static),
                    stringifier: specials.contains(&Special::Stringifier),
                    ext_attrs,
                }));
            }
            Some(kind @ ("iterable" | "maplike" | "setlike")) => {
                let kind = if is_async {
                    format!("async_{kind}")
                } else {
                    kind.to_string()
                };
                self.pos += 1;
                let type_args = self.type_args()?;
                if self.is_punct('(') {
                    self.arguments()?;
                }
                self.expect_punct(';')?;
                return Ok(Member::Declaration {
                    kind,
                    readonly,
                    type_args,
                });
            }
            _ => {}
        }

        if specials.contains(&Special::Stringifier) && self.eat_punct(';') {
            return Ok(Member::Operation(Operation {
                specials,
                name: None,
                return_type: None,
                arguments: None,
                ext_attrs,
            }));
        }

        let return_type = self.idl_type()?;
        let name = if self.is_punct('(') {
            None
        } else {
            Some(self.expect_name()?)
        };
        let arguments = self.arguments()?;
        self.expect_punct(';')?;
        Ok(Member::Operation(Operation {
            specials,
            name,
            return_type: Some(return_type),
            arguments: Some(arguments),
            ext_attrs,
        }))
    }

    fn arguments(&mut self) -> Result<Vec<Argument>, IdlError> {
        self.nested(Self::argument_list)
    }

    fn argument_list(&mut self) -> Result<Vec<Argument>, IdlError> {
        self.expect_punct('(')?;
        let mut args = Vec::new();
        while !self.eat_punct(')') {
            self.ext_attrs()?;
            let optional = self.eat_keyword("optional");
            let idl_type = self.idl_type()?;
            let variadic = matches!(self.peek(), Some(TokenKind::Ellipsis));
            if variadic {
                self.pos += 1;
            }
            let name = self.expect_name()?;
            let default = if self.eat_punct('=') {
                Some(self.default_value()?)
            } else {
                None
            };
            args.push(Argument {
                name,
                idl_type,
                optional,
                variadic,
                default,
            });
            if !self.eat_punct(',') && !self.is_punct(')') {
                return Err(self.error("expected ',' or ')'"));
            }
        }
        Ok(args)
    }

    fn default_value(&mut self) -> Result<String, IdlError> {
        if self.eat_punct('[') {
            self.expect_punct(']')?;
            return Ok("[]".to_string());
        }
        if self.eat_punct('{') {
            self.expect_punct('}')?;
            return Ok("{}".to_string());
        }
        let value = match self.peek() {
            Some(TokenKind::Ident(v) | TokenKind::Number(v)) => v.clone(),
            Some(TokenKind::Str(v)) => format!("\"{v}\""),
            _ => return Err(self.error("expected default value")),
        };
        self.pos += 1;
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn idl_type(&mut self) -> Result<IdlType, IdlError> {
        self.nested(Self::type_body)
    }

    fn type_body(&mut self) -> Result<IdlType, IdlError> {
        self.ext_attrs()?;
        let ty = if self.eat_punct('(') {
            let mut members = vec![self.idl_type()?];
            while self.eat_keyword("or") {
                members.push(self.idl_type()?);
            }
            self.expect_punct(')')?;
            if members.len() < 2 {
                return Err(self.error("union type needs at least two members"));
            }
            IdlType::Union {
                members,
                nullable: false,
            }
        } else {
            let name = self.type_name()?;
            if GENERIC_TYPES.contains(&name.as_str()) {
                let args = self.type_args()?;
                IdlType::Generic {
                    name,
                    args,
                    nullable: false,
                }
            } else {
                IdlType::Single {
                    name,
                    nullable: false,
                }
            }
        };
        if self.eat_punct('?') {
            return Ok(match ty {
                IdlType::Single { name, .. } => IdlType::Single {
                    name,
                    nullable: true,
                },
                IdlType::Generic { name, args, .. } => IdlType::Generic {
                    name,
                    args,
                    nullable: true,
                },
                IdlType::Union { members, .. } => IdlType::Union {
                    members,
                    nullable: true,
                },
            });
        }
        Ok(ty)
    }

    /// Reads a type name, joining multi-word primitives.
    fn type_name(&mut self) -> Result<String, IdlError> {
        let first = self.expect_ident()?;
        let name = match first.as_str() {
            "unsigned" => {
                let next = self.expect_ident()?;
                if next == "long" && self.eat_keyword("long") {
                    "unsigned long long".to_string()
                } else {
                    format!("unsigned {next}")
                }
            }
            "unrestricted" => format!("unrestricted {}", self.expect_ident()?),
            "long" if self.eat_keyword("long") => "long long".to_string(),
            _ => first,
        };
        Ok(name)
    }

    fn type_args(&mut self) -> Result<Vec<IdlType>, IdlError> {
        self.expect_punct('<')?;
        let mut args = vec![self.idl_type()?];
        while self.eat_punct(',') {
            args.push(self.idl_type()?);
        }
        self.expect_punct('>')?;
        Ok(args)
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(v) => format!("'{v}'"),
        TokenKind::Number(v) => format!("number {v}"),
        TokenKind::Str(v) => format!("string \"{v}\""),
        TokenKind::Ellipsis => "'...'".to_string(),
        TokenKind::Punct(c) => format!("'{c}'"),
    }
}
