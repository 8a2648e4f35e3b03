use core::fmt;

use ecow::EcoString;
use hashbrown::HashMap;

/// One argument of a function type, optionally labeled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionArgument {
    pub label: Option<EcoString>,
    pub ty: StaticType,
}

impl FunctionArgument {
    pub fn unlabeled(ty: StaticType) -> Self {
        Self { label: None, ty }
    }

    pub fn labeled(label: impl Into<EcoString>, ty: StaticType) -> Self {
        Self {
            label: Some(label.into()),
            ty,
        }
    }
}

/// Compile-time type of a Logic expression or declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StaticType {
    /// Unification variable, solved by the unifier.
    Variable(EcoString),
    /// Generic parameter of a declaration, instantiated per reference.
    Generic(EcoString),
    /// Nominal type such as `Number` or `Array<Element>`.
    Constant {
        name: EcoString,
        parameters: Vec<StaticType>,
    },
    Function {
        arguments: Vec<FunctionArgument>,
        return_type: Box<StaticType>,
    },
}

pub const UNIT: &str = "Unit";
pub const BOOLEAN: &str = "Boolean";
pub const NUMBER: &str = "Number";
pub const STRING: &str = "String";
pub const COLOR: &str = "Color";
pub const ARRAY: &str = "Array";

impl StaticType {
    pub fn constant(name: impl Into<EcoString>) -> Self {
        StaticType::Constant {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn generic_constant(name: impl Into<EcoString>, parameters: Vec<StaticType>) -> Self {
        StaticType::Constant {
            name: name.into(),
            parameters,
        }
    }

    pub fn unit() -> Self {
        Self::constant(UNIT)
    }

    pub fn boolean() -> Self {
        Self::constant(BOOLEAN)
    }

    pub fn number() -> Self {
        Self::constant(NUMBER)
    }

    pub fn string() -> Self {
        Self::constant(STRING)
    }

    pub fn color() -> Self {
        Self::constant(COLOR)
    }

    pub fn array(element: StaticType) -> Self {
        Self::generic_constant(ARRAY, vec![element])
    }

    pub fn function(arguments: Vec<FunctionArgument>, return_type: StaticType) -> Self {
        StaticType::Function {
            arguments,
            return_type: Box::new(return_type),
        }
    }

    pub fn variable(name: impl Into<EcoString>) -> Self {
        StaticType::Variable(name.into())
    }

    pub fn generic(name: impl Into<EcoString>) -> Self {
        StaticType::Generic(name.into())
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, StaticType::Variable(_))
    }

    /// Whether the variable `name` appears anywhere inside this type.
    pub fn occurs(&self, name: &str) -> bool {
        match self {
            StaticType::Variable(variable) => variable == name,
            StaticType::Generic(_) => false,
            StaticType::Constant { parameters, .. } => {
                parameters.iter().any(|parameter| parameter.occurs(name))
            }
            StaticType::Function {
                arguments,
                return_type,
            } => {
                arguments.iter().any(|argument| argument.ty.occurs(name))
                    || return_type.occurs(name)
            }
        }
    }

    pub fn has_generics(&self) -> bool {
        match self {
            StaticType::Generic(_) => true,
            StaticType::Variable(_) => false,
            StaticType::Constant { parameters, .. } => parameters.iter().any(Self::has_generics),
            StaticType::Function {
                arguments,
                return_type,
            } => {
                arguments.iter().any(|argument| argument.ty.has_generics())
                    || return_type.has_generics()
            }
        }
    }

    /// Distinct generic names, in order of first appearance.
    pub fn generic_names(&self) -> Vec<EcoString> {
        let mut names = Vec::new();
        self.rebuild(&mut |ty: &StaticType| {
            if let StaticType::Generic(name) = ty {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            None
        });
        names
    }

    /// Replaces generics by name; generics without a replacement are kept.
    pub fn replace_generics(&self, replacements: &HashMap<EcoString, StaticType>) -> StaticType {
        self.rebuild(&mut |ty: &StaticType| match ty {
            StaticType::Generic(name) => replacements.get(name).cloned(),
            _ => None,
        })
    }

    /// Rebuilds the type bottom-up, letting `rewrite` replace any leaf.
    pub(crate) fn rebuild(
        &self,
        rewrite: &mut impl FnMut(&StaticType) -> Option<StaticType>,
    ) -> Self {
        if let Some(replacement) = rewrite(self) {
            return replacement;
        }
        match self {
            StaticType::Variable(_) | StaticType::Generic(_) => self.clone(),
            StaticType::Constant { name, parameters } => StaticType::Constant {
                name: name.clone(),
                parameters: parameters
                    .iter()
                    .map(|parameter| parameter.rebuild(rewrite))
                    .collect(),
            },
            StaticType::Function {
                arguments,
                return_type,
            } => StaticType::Function {
                arguments: arguments
                    .iter()
                    .map(|argument| FunctionArgument {
                        label: argument.label.clone(),
                        ty: argument.ty.rebuild(rewrite),
                    })
                    .collect(),
                return_type: Box::new(return_type.rebuild(rewrite)),
            },
        }
    }
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaticType::Variable(name) => write!(f, "{name}"),
            StaticType::Generic(name) => write!(f, "{name}"),
            StaticType::Constant { name, parameters } => {
                write!(f, "{name}")?;
                if !parameters.is_empty() {
                    write!(f, "<")?;
                    for (i, parameter) in parameters.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{parameter}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            StaticType::Function {
                arguments,
                return_type,
            } => {
                write!(f, "(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(label) = &argument.label {
                        write!(f, "{label}: ")?;
                    }
                    write!(f, "{}", argument.ty)?;
                }
                write!(f, ") -> {return_type}")
            }
        }
    }
}

/// Hands out fresh type-variable names.
///
/// Each unification context owns its generator, so numbering starts over for
/// every compilation.
#[derive(Debug, Clone)]
pub struct TypeVariableGenerator {
    prefix: EcoString,
    next: u64,
}

impl Default for TypeVariableGenerator {
    fn default() -> Self {
        Self::new("?")
    }
}

impl TypeVariableGenerator {
    pub fn new(prefix: impl Into<EcoString>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    pub fn fresh_name(&mut self) -> EcoString {
        let mut name = self.prefix.clone();
        name.push_str(&base36(self.next));
        self.next += 1;
        name
    }

    pub fn fresh(&mut self) -> StaticType {
        StaticType::Variable(self.fresh_name())
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut digits = Vec::new();
    loop {
        digits.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    digits.iter().rev().map(|&digit| digit as char).collect()
}
