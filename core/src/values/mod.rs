//! Runtime values.
//!
//! A [`Value`] pairs its static type with its [`Memory`]. Values are
//! immutable; payloads use `ecow` containers so copying a value into another
//! evaluation context is a reference-count bump.

mod function;

pub use function::{CallArguments, Function, FunctionMemory, NativeFn};

use core::fmt;

use ecow::{EcoString, EcoVec};

use crate::types::StaticType;

#[derive(Debug, Clone, PartialEq)]
pub struct Value<'a> {
    pub ty: StaticType,
    pub memory: Memory<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Memory<'a> {
    Unit,
    Bool(bool),
    Number(f64),
    /// Strings and colors.
    String(EcoString),
    Array(EcoVec<Value<'a>>),
    Enum {
        case: EcoString,
        data: EcoVec<Value<'a>>,
    },
    /// Fields in declaration order.
    Record(EcoVec<(EcoString, Value<'a>)>),
    Function(FunctionMemory<'a>),
}

impl<'a> Value<'a> {
    pub fn new(ty: StaticType, memory: Memory<'a>) -> Self {
        Self { ty, memory }
    }

    pub fn unit() -> Self {
        Self::new(StaticType::unit(), Memory::Unit)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(StaticType::boolean(), Memory::Bool(value))
    }

    pub fn number(value: f64) -> Self {
        Self::new(StaticType::number(), Memory::Number(value))
    }

    pub fn string(value: impl Into<EcoString>) -> Self {
        Self::new(StaticType::string(), Memory::String(value.into()))
    }

    pub fn color(value: impl Into<EcoString>) -> Self {
        Self::new(StaticType::color(), Memory::String(value.into()))
    }

    pub fn array(element: StaticType, items: impl IntoIterator<Item = Value<'a>>) -> Self {
        Self::new(
            StaticType::array(element),
            Memory::Array(items.into_iter().collect()),
        )
    }

    pub fn enumeration(
        ty: StaticType,
        case: impl Into<EcoString>,
        data: impl IntoIterator<Item = Value<'a>>,
    ) -> Self {
        Self::new(
            ty,
            Memory::Enum {
                case: case.into(),
                data: data.into_iter().collect(),
            },
        )
    }

    pub fn record(
        ty: StaticType,
        fields: impl IntoIterator<Item = (EcoString, Value<'a>)>,
    ) -> Self {
        Self::new(ty, Memory::Record(fields.into_iter().collect()))
    }

    pub fn function(ty: StaticType, function: FunctionMemory<'a>) -> Self {
        Self::new(ty, Memory::Function(function))
    }

    pub fn is_unit(&self) -> bool {
        matches!(self.memory, Memory::Unit)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.memory {
            Memory::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.memory {
            Memory::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.memory {
            Memory::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value<'a>]> {
        match &self.memory {
            Memory::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionMemory<'a>> {
        match &self.memory {
            Memory::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Case name and associated data of an enumeration value.
    pub fn as_enum(&self) -> Option<(&str, &[Value<'a>])> {
        match &self.memory {
            Memory::Enum { case, data } => Some((case.as_str(), data.as_slice())),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value<'a>> {
        match &self.memory {
            Memory::Record(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    mut write: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write(f, item)?;
    }
    Ok(())
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.memory {
            Memory::Unit => f.write_str("unit"),
            Memory::Bool(value) => write!(f, "{value}"),
            // Whole numbers print without a fraction.
            Memory::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Memory::Number(value) => write!(f, "{value}"),
            Memory::String(value) if self.ty == StaticType::color() => write!(f, "{value}"),
            Memory::String(value) => write!(f, "{value:?}"),
            Memory::Array(items) => {
                f.write_str("[")?;
                write_list(f, items.iter(), |f, item| write!(f, "{item}"))?;
                f.write_str("]")
            }
            Memory::Enum { case, data } => {
                write!(f, "{case}")?;
                if !data.is_empty() {
                    f.write_str("(")?;
                    write_list(f, data.iter(), |f, item| write!(f, "{item}"))?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            Memory::Record(fields) => {
                write!(f, "{}(", self.ty)?;
                write_list(f, fields.iter(), |f, (name, value)| {
                    write!(f, "{name}: {value}")
                })?;
                f.write_str(")")
            }
            Memory::Function(function) => write!(f, "{function}"),
        }
    }
}
