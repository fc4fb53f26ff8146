//! Primitive (scalar) kinds and the registry that maps type names to them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_common::{Result, error::Error};

/// Scalar kinds that can appear as leaves of a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Void,
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    String,
    Binary,
    Timestamp,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 11] = [
        PrimitiveKind::Void,
        PrimitiveKind::Boolean,
        PrimitiveKind::TinyInt,
        PrimitiveKind::SmallInt,
        PrimitiveKind::Int,
        PrimitiveKind::BigInt,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::String,
        PrimitiveKind::Binary,
        PrimitiveKind::Timestamp,
    ];

    /// Short type name, as it appears in a type descriptor string.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::TinyInt => "tinyint",
            PrimitiveKind::SmallInt => "smallint",
            PrimitiveKind::Int => "int",
            PrimitiveKind::BigInt => "bigint",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::String => "string",
            PrimitiveKind::Binary => "binary",
            PrimitiveKind::Timestamp => "timestamp",
        }
    }
}

impl FromStr for PrimitiveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::invalid_arg("primitive kind", format!("unknown kind '{s}'")))
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping between primitive type names and their kinds.
///
/// The parser consults `kind_of` to decide whether a token names a primitive,
/// and canonical rendering uses `short_name` for the inverse direction.
pub trait PrimitiveRegistry: Send + Sync {
    /// Resolves a type name to its kind, or `None` if the name is not a primitive.
    fn kind_of(&self, name: &str) -> Option<PrimitiveKind>;

    /// Returns the short display name of the kind.
    fn short_name(&self, kind: PrimitiveKind) -> &str {
        kind.name()
    }
}

/// Registry that recognizes exactly the short names of [`PrimitiveKind`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPrimitiveRegistry;

impl PrimitiveRegistry for StandardPrimitiveRegistry {
    fn kind_of(&self, name: &str) -> Option<PrimitiveKind> {
        PrimitiveKind::from_str(name).ok()
    }
}

/// Registry that accepts additional names on top of the standard ones.
///
/// Aliases only affect parsing; rendering always uses the standard short name.
#[derive(Debug, Clone, Default)]
pub struct AliasPrimitiveRegistry {
    aliases: ahash::AHashMap<String, PrimitiveKind>,
}

impl AliasPrimitiveRegistry {
    pub fn new() -> AliasPrimitiveRegistry {
        Default::default()
    }

    /// Registers `alias` as another name for `kind`.
    ///
    /// Fails if the alias is one of the composite keywords or is not a single
    /// alphanumeric token, since the parser could never match it.
    pub fn with_alias(mut self, alias: impl Into<String>, kind: PrimitiveKind) -> Result<Self> {
        let alias = alias.into();
        if crate::descriptor::is_composite_keyword(&alias) {
            return Err(Error::invalid_arg("alias", format!("'{alias}' is reserved")));
        }
        if alias.is_empty() || !alias.chars().all(char::is_alphanumeric) {
            return Err(Error::invalid_arg(
                "alias",
                format!("'{alias}' is not an alphanumeric name"),
            ));
        }
        self.aliases.insert(alias, kind);
        Ok(self)
    }
}

impl PrimitiveRegistry for AliasPrimitiveRegistry {
    fn kind_of(&self, name: &str) -> Option<PrimitiveKind> {
        StandardPrimitiveRegistry
            .kind_of(name)
            .or_else(|| self.aliases.get(name).copied())
    }
}
