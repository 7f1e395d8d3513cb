//! Message and enum definitions.
//!
//! A [`Schema`] owns every message and enum of a set of `.proto` files.
//! Fields refer to other definitions by [`MessageId`] / [`EnumId`], so a
//! message can contain itself without the schema holding an infinite tree.
//! Messages are declared first and defined afterwards for exactly that
//! reason.

use std::fmt;

use num_bigint::BigInt;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Handle to a message definition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct MessageId(u32);

/// Handle to an enum definition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct EnumId(u32);

/// Scalar field types.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Scalar {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl Scalar {
    pub const ALL: [Self; 15] = [
        Self::Double,
        Self::Float,
        Self::Int32,
        Self::Int64,
        Self::Uint32,
        Self::Uint64,
        Self::Sint32,
        Self::Sint64,
        Self::Fixed32,
        Self::Fixed64,
        Self::Sfixed32,
        Self::Sfixed64,
        Self::Bool,
        Self::String,
        Self::Bytes,
    ];

    /// Name as written in a `.proto` file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    pub fn is_integer(self) -> bool {
        self.bits().is_some()
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::Double | Self::Float)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::Uint32 | Self::Uint64 | Self::Fixed32 | Self::Fixed64
        )
    }

    /// Width of an integer scalar.
    pub fn bits(self) -> Option<u32> {
        match self {
            Self::Int32 | Self::Uint32 | Self::Sint32 | Self::Fixed32 | Self::Sfixed32 => Some(32),
            Self::Int64 | Self::Uint64 | Self::Sint64 | Self::Fixed64 | Self::Sfixed64 => Some(64),
            _ => None,
        }
    }

    /// Inclusive range of an integer scalar. Advisory, like the Candid
    /// fixed-width bounds.
    pub fn bounds(self) -> Option<(BigInt, BigInt)> {
        let bits = self.bits()?;
        if self.is_unsigned() {
            Some((BigInt::from(0), (BigInt::from(1) << bits) - 1))
        } else {
            let half = BigInt::from(1) << (bits - 1);
            Some((-half.clone(), half - 1))
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a field holds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    Scalar(Scalar),
    Enum(EnumId),
    Message(MessageId),
}

/// How many values a field holds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Cardinality {
    /// Exactly one value (proto3 implicit presence, or a message with
    /// explicit presence).
    #[default]
    Single,
    /// Zero or one value with explicit presence.
    Optional,
    /// Zero or more values.
    Repeated,
}

/// A field type: kind plus cardinality.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Ty {
    pub kind: Kind,
    pub cardinality: Cardinality,
}

impl Ty {
    pub const fn scalar(scalar: Scalar) -> Self {
        Self {
            kind: Kind::Scalar(scalar),
            cardinality: Cardinality::Single,
        }
    }

    pub const fn message(id: MessageId) -> Self {
        Self {
            kind: Kind::Message(id),
            cardinality: Cardinality::Single,
        }
    }

    pub const fn enumeration(id: EnumId) -> Self {
        Self {
            kind: Kind::Enum(id),
            cardinality: Cardinality::Single,
        }
    }

    #[must_use]
    pub const fn optional(self) -> Self {
        Self {
            cardinality: Cardinality::Optional,
            ..self
        }
    }

    #[must_use]
    pub const fn repeated(self) -> Self {
        Self {
            cardinality: Cardinality::Repeated,
            ..self
        }
    }

    /// The type of one element: the same kind, single.
    #[must_use]
    pub const fn single(self) -> Self {
        Self {
            cardinality: Cardinality::Single,
            ..self
        }
    }
}

/// One field of a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub number: u32,
    pub ty: Ty,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, number: u32, ty: Ty) -> Self {
        Self {
            name: name.into(),
            number,
            ty,
        }
    }

    /// The lowerCamelCase name the JSON mapping uses (`created_at` becomes
    /// `createdAt`).
    pub fn json_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut upper = false;
        for c in self.name.chars() {
            if c == '_' {
                upper = true;
            } else if upper {
                out.push(c.to_ascii_uppercase());
                upper = false;
            } else {
                out.push(c);
            }
        }
        out
    }
}

#[derive(Clone, Debug)]
pub struct MessageDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Clone, Debug)]
pub struct EnumDef {
    pub name: String,
    /// `(name, number)` in declaration order. The first is the default.
    pub values: Vec<(String, i32)>,
}

impl EnumDef {
    pub fn by_name(&self, name: &str) -> Option<&(String, i32)> {
        self.values.iter().find(|(n, _)| n == name)
    }

    pub fn by_number(&self, number: i32) -> Option<&(String, i32)> {
        self.values.iter().find(|(_, n)| *n == number)
    }
}

/// A unary rpc.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcMethod {
    pub name: String,
    pub input: MessageId,
    pub output: MessageId,
    /// `option idempotency_level = NO_SIDE_EFFECTS`.
    pub read_only: bool,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("message `{message}` declares field `{field}` twice")]
    DuplicateFieldName { message: String, field: String },
    #[error("message `{message}` uses field number {number} twice")]
    DuplicateFieldNumber { message: String, number: u32 },
    #[error("enum `{0}` has no values")]
    EmptyEnum(String),
    #[error("`{0}` is already defined")]
    Redefined(String),
}

/// All messages, enums and rpc methods of a service description.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    messages: Vec<MessageDef>,
    defined: Vec<bool>,
    enums: Vec<EnumDef>,
    names: FxHashMap<String, Kind>,
    methods: Vec<RpcMethod>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    // === Construction ===

    /// Reserve a message so fields can refer to it before it is defined.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "message count fits u32"
    )]
    pub fn declare_message(&mut self, name: impl Into<String>) -> MessageId {
        let name = name.into();
        if let Some(Kind::Message(id)) = self.names.get(&name) {
            return *id;
        }
        let id = MessageId(self.messages.len() as u32);
        self.names.insert(name.clone(), Kind::Message(id));
        self.messages.push(MessageDef {
            name,
            fields: Vec::new(),
        });
        self.defined.push(false);
        id
    }

    /// Give a declared message its fields.
    pub fn define_message(&mut self, id: MessageId, fields: Vec<FieldDef>) -> Result<(), SchemaError> {
        let slot = id.0 as usize;
        let message = &mut self.messages[slot];
        if self.defined[slot] {
            return Err(SchemaError::Redefined(message.name.clone()));
        }
        for (i, field) in fields.iter().enumerate() {
            let earlier = &fields[..i];
            if earlier.iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateFieldName {
                    message: message.name.clone(),
                    field: field.name.clone(),
                });
            }
            if earlier.iter().any(|f| f.number == field.number) {
                return Err(SchemaError::DuplicateFieldNumber {
                    message: message.name.clone(),
                    number: field.number,
                });
            }
        }
        message.fields = fields;
        self.defined[slot] = true;
        Ok(())
    }

    /// Declare and define in one step.
    pub fn add_message(
        &mut self,
        name: impl Into<String>,
        fields: Vec<FieldDef>,
    ) -> Result<MessageId, SchemaError> {
        let id = self.declare_message(name);
        self.define_message(id, fields)?;
        Ok(id)
    }

    #[allow(clippy::cast_possible_truncation, reason = "enum count fits u32")]
    pub fn add_enum(
        &mut self,
        name: impl Into<String>,
        values: &[(&str, i32)],
    ) -> Result<EnumId, SchemaError> {
        let name = name.into();
        if values.is_empty() {
            return Err(SchemaError::EmptyEnum(name));
        }
        if self.names.contains_key(&name) {
            return Err(SchemaError::Redefined(name));
        }
        let id = EnumId(self.enums.len() as u32);
        self.names.insert(name.clone(), Kind::Enum(id));
        self.enums.push(EnumDef {
            name,
            values: values.iter().map(|&(n, v)| (n.to_owned(), v)).collect(),
        });
        Ok(id)
    }

    pub fn add_method(&mut self, method: RpcMethod) {
        self.methods.push(method);
    }

    // === Lookup ===

    pub fn message(&self, id: MessageId) -> &MessageDef {
        &self.messages[id.0 as usize]
    }

    pub fn enumeration(&self, id: EnumId) -> &EnumDef {
        &self.enums[id.0 as usize]
    }

    /// Definition registered under a fully qualified name.
    pub fn lookup(&self, name: &str) -> Option<Kind> {
        self.names.get(name).copied()
    }

    pub fn field(&self, id: MessageId, name: &str) -> Option<&FieldDef> {
        self.message(id).fields.iter().find(|f| f.name == name)
    }

    pub fn methods(&self) -> &[RpcMethod] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&RpcMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    // === Formatting ===

    /// The type as it would appear in a field declaration.
    pub fn format_ty(&self, ty: Ty) -> String {
        let base = match ty.kind {
            Kind::Scalar(scalar) => scalar.as_str(),
            Kind::Enum(id) => self.enumeration(id).name.as_str(),
            Kind::Message(id) => self.message(id).name.as_str(),
        };
        match ty.cardinality {
            Cardinality::Single => base.to_owned(),
            Cardinality::Optional => format!("optional {base}"),
            Cardinality::Repeated => format!("repeated {base}"),
        }
    }

    /// Hint text when `n` lies outside the range of an integer field.
    pub fn bounds_hint(&self, ty: Ty, n: &BigInt) -> Option<String> {
        let Kind::Scalar(scalar) = ty.kind else {
            return None;
        };
        let (min, max) = scalar.bounds()?;
        (n < &min || n > &max).then(|| format!("{n} is outside the {scalar} range {min}..={max}"))
    }
}

#[cfg(test)]
mod tests;
