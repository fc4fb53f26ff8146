//! Recursive-descent parser for type descriptor strings.
//!
//! The grammar:
//!
//! ```text
//! TypeList  := Type (Separator Type)*
//! Separator := ',' | ':' | ';'
//! Type      := PrimitiveName
//!            | 'list' '<' Type '>'
//!            | 'map' '<' Type ',' Type '>'
//!            | 'struct' '<' Field (',' Field)* '>'
//! Field     := Identifier ':' Type
//! ```
//!
//! For example, `"int,string,map<string,int>,list<struct<a:int,b:string>>"`
//! parses into four descriptors.
//!
//! Whitespace is not skipped: a space is an ordinary single-character token and
//! is rejected wherever the grammar does not expect it.

use strata_common::{Result, error::Error};

use crate::{
    descriptor::{
        LIST_TYPE_NAME, MAP_TYPE_NAME, TypeDescriptor, is_composite_keyword,
    },
    primitive::{PrimitiveRegistry, StandardPrimitiveRegistry},
    tokenizer::{Token, tokenize},
};

/// Parses a separator-delimited list of type descriptors using the standard
/// primitive registry.
pub fn parse_all(s: &str) -> Result<Vec<TypeDescriptor>> {
    TypeDescriptorParser::new(s, &StandardPrimitiveRegistry).parse_all()
}

/// Parses a single type descriptor using the standard primitive registry.
///
/// See [`TypeDescriptorParser::parse_first`] for the treatment of trailing input.
pub fn parse(s: &str) -> Result<TypeDescriptor> {
    TypeDescriptorParser::new(s, &StandardPrimitiveRegistry).parse_first()
}

/// What the parser required at the point of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expected {
    /// A composite keyword or a registered primitive name.
    Type,
    /// A field name: any token starting with a letter or digit.
    Name,
    /// An exact punctuation token.
    Literal(&'static str),
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Type => f.write_str("type"),
            Expected::Name => f.write_str("name"),
            Expected::Literal(text) => write!(f, "'{text}'"),
        }
    }
}

const SEPARATORS: [&str; 3] = [",", ":", ";"];

/// Deepest allowed nesting of `list`, `map` and `struct` types. Deeper input
/// is rejected as malformed instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Single-pass type descriptor parser with one token of lookahead.
pub struct TypeDescriptorParser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    cursor: usize,
    depth: usize,
    registry: &'a dyn PrimitiveRegistry,
}

impl<'a> TypeDescriptorParser<'a> {
    pub fn new(source: &'a str, registry: &'a dyn PrimitiveRegistry) -> TypeDescriptorParser<'a> {
        TypeDescriptorParser {
            source,
            tokens: tokenize(source),
            cursor: 0,
            depth: 0,
            registry,
        }
    }

    /// Parses the whole source as a type list. Separators between the types
    /// may be `,`, `:` or `;`. An empty source yields an empty list, and a
    /// single trailing separator is accepted.
    pub fn parse_all(&mut self) -> Result<Vec<TypeDescriptor>> {
        self.cursor = 0;
        self.depth = 0;
        let mut types = Vec::new();
        while self.cursor < self.tokens.len() {
            types.push(self.parse_type()?);
            if let Some(separator) = self.tokens.get(self.cursor) {
                if !SEPARATORS.contains(&separator.text) {
                    return Err(Error::malformed(
                        "',', ':', or ';'",
                        Some(separator.position),
                        self.source,
                    ));
                }
                self.cursor += 1;
            }
        }
        Ok(types)
    }

    /// Parses the source as a type list and returns its first element.
    ///
    /// The rest of the list is validated but discarded, so `"int,string"`
    /// yields `int` while `"int extra"` fails at the space after `int`.
    pub fn parse_first(&mut self) -> Result<TypeDescriptor> {
        self.parse_all()?
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed(Expected::Type.to_string(), None, self.source))
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor> {
        let t = self.expect(Expected::Type, None)?;

        if let Some(kind) = self.registry.kind_of(t.text) {
            return Ok(TypeDescriptor::Primitive(kind));
        }

        if !is_composite_keyword(t.text) {
            return Err(Error::malformed(
                Expected::Type.to_string(),
                Some(t.position),
                self.source,
            ));
        }
        if self.depth == MAX_NESTING_DEPTH {
            return Err(Error::malformed(
                format!("type nested at most {MAX_NESTING_DEPTH} levels deep"),
                Some(t.position),
                self.source,
            ));
        }
        self.depth += 1;
        let composite = self.parse_composite(t);
        self.depth -= 1;
        composite
    }

    fn parse_composite(&mut self, t: Token<'a>) -> Result<TypeDescriptor> {
        self.expect(Expected::Literal("<"), None)?;
        match t.text {
            LIST_TYPE_NAME => {
                let element = self.parse_type()?;
                self.expect(Expected::Literal(">"), None)?;
                Ok(TypeDescriptor::list(element))
            }
            MAP_TYPE_NAME => {
                let key = self.parse_type()?;
                self.expect(Expected::Literal(","), None)?;
                let value = self.parse_type()?;
                self.expect(Expected::Literal(">"), None)?;
                Ok(TypeDescriptor::map(key, value))
            }
            _ => {
                let mut fields = Vec::new();
                loop {
                    let name = self.expect(Expected::Name, None)?;
                    self.expect(Expected::Literal(":"), None)?;
                    fields.push((name.text, self.parse_type()?));
                    // Either the struct ends here or another field follows.
                    let separator = self.expect(Expected::Literal(">"), Some(","))?;
                    if separator.text == ">" {
                        break;
                    }
                }
                Ok(TypeDescriptor::structure(fields))
            }
        }
    }

    /// Consumes the current token if it satisfies `expected` or equals
    /// `alternative`, and fails at the token's position otherwise.
    fn expect(&mut self, expected: Expected, alternative: Option<&str>) -> Result<Token<'a>> {
        let Some(&t) = self.tokens.get(self.cursor) else {
            return Err(Error::malformed(expected.to_string(), None, self.source));
        };
        let is_alternative = alternative == Some(t.text);
        let matches = match expected {
            Expected::Type => {
                is_composite_keyword(t.text) || self.registry.kind_of(t.text).is_some()
            }
            Expected::Name => t.is_alphanumeric,
            Expected::Literal(text) => t.text == text,
        };
        if !matches && !is_alternative {
            return Err(Error::malformed(
                expected.to_string(),
                Some(t.position),
                self.source,
            ));
        }
        self.cursor += 1;
        Ok(t)
    }
}
