use crate::error::Error;
use crate::names::BinaryName;
use std::fmt::{Display, Error as FmtError, Formatter};
use std::iter::Peekable;
use std::str::Chars;

/// Primitive value types
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    fn descriptor_char(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    fn from_descriptor_char(c: char) -> Option<BaseType> {
        match c {
            'B' => Some(BaseType::Byte),
            'C' => Some(BaseType::Char),
            'D' => Some(BaseType::Double),
            'F' => Some(BaseType::Float),
            'I' => Some(BaseType::Int),
            'J' => Some(BaseType::Long),
            'S' => Some(BaseType::Short),
            'Z' => Some(BaseType::Boolean),
            _ => None,
        }
    }
}

/// Type of a field, parameter, or return value
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldType {
    Base(BaseType),
    Object(BinaryName),
    Array(Box<FieldType>),
}

impl FieldType {
    pub const fn int() -> FieldType {
        FieldType::Base(BaseType::Int)
    }

    pub const fn long() -> FieldType {
        FieldType::Base(BaseType::Long)
    }

    pub const fn float() -> FieldType {
        FieldType::Base(BaseType::Float)
    }

    pub const fn double() -> FieldType {
        FieldType::Base(BaseType::Double)
    }

    pub const fn boolean() -> FieldType {
        FieldType::Base(BaseType::Boolean)
    }

    pub fn object(class_name: BinaryName) -> FieldType {
        FieldType::Object(class_name)
    }

    pub fn array(element_type: FieldType) -> FieldType {
        FieldType::Array(Box::new(element_type))
    }

    /// Verification category of a value of this type
    pub fn kind(&self) -> ValueKind {
        ValueKind::from(self)
    }

    /// Parse a field descriptor, requiring the whole string to be consumed
    pub fn parse(source: &str) -> Result<FieldType, Error> {
        let mut chars = source.chars().peekable();
        let typ = FieldType::parse_from(&mut chars)?;
        match chars.next() {
            None => Ok(typ),
            Some(c) => Err(Error::InvalidArgument(format!(
                "Unexpected leftover input '{}'",
                c
            ))),
        }
    }

    fn parse_from(source: &mut Peekable<Chars>) -> Result<FieldType, Error> {
        match source.next() {
            None => Err(Error::InvalidArgument(String::from("Missing field type"))),
            Some('L') => {
                let mut class_name = String::new();
                loop {
                    match source.next() {
                        None => {
                            return Err(Error::InvalidArgument(format!(
                                "Missing terminator for 'L{}'",
                                class_name
                            )))
                        }
                        Some(';') => {
                            return BinaryName::from_string(class_name)
                                .map(FieldType::Object)
                                .map_err(Error::InvalidArgument)
                        }
                        Some(c) => class_name.push(c),
                    }
                }
            }
            Some('[') => FieldType::parse_from(source).map(FieldType::array),
            Some(c) => match BaseType::from_descriptor_char(c) {
                Some(base_type) => Ok(FieldType::Base(base_type)),
                None => Err(Error::InvalidArgument(format!(
                    "Invalid field type character '{}'",
                    c
                ))),
            },
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            FieldType::Base(base_type) => write!(f, "{}", base_type.descriptor_char()),
            FieldType::Object(class_name) => write!(f, "L{};", class_name),
            FieldType::Array(element_type) => write!(f, "[{}", element_type),
        }
    }
}

/// Signature of a callable: parameter types plus a return type, where `None`
/// is `void`
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodType {
    pub parameters: Vec<FieldType>,
    pub return_type: Option<FieldType>,
}

impl MethodType {
    pub fn new(parameters: Vec<FieldType>, return_type: Option<FieldType>) -> MethodType {
        MethodType {
            parameters,
            return_type,
        }
    }

    /// Verification categories of the parameters, in order
    pub fn parameter_kinds(&self) -> Vec<ValueKind> {
        self.parameters.iter().map(ValueKind::from).collect()
    }

    /// Verification category of the return value (`None` = void)
    pub fn return_kind(&self) -> Option<ValueKind> {
        self.return_type.as_ref().map(ValueKind::from)
    }

    /// Parse a method descriptor such as `(ILjava/lang/Object;)V`
    pub fn parse(source: &str) -> Result<MethodType, Error> {
        let mut chars = source.chars().peekable();

        if chars.next() != Some('(') {
            return Err(Error::InvalidArgument(String::from(
                "Expected '(' for method descriptor",
            )));
        }
        let mut parameters = vec![];
        while chars.peek().copied() != Some(')') {
            if chars.peek().is_none() {
                return Err(Error::InvalidArgument(String::from(
                    "Expected ')' for method descriptor",
                )));
            }
            parameters.push(FieldType::parse_from(&mut chars)?);
        }
        let _ = chars.next();

        let return_type = if chars.peek().copied() == Some('V') {
            let _ = chars.next();
            None
        } else {
            Some(FieldType::parse_from(&mut chars)?)
        };

        match chars.next() {
            None => Ok(MethodType {
                parameters,
                return_type,
            }),
            Some(c) => Err(Error::InvalidArgument(format!(
                "Unexpected leftover input '{}'",
                c
            ))),
        }
    }
}

impl Display for MethodType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "(")?;
        for parameter in &self.parameters {
            write!(f, "{}", parameter)?;
        }
        write!(f, ")")?;
        match &self.return_type {
            None => write!(f, "V"),
            Some(typ) => write!(f, "{}", typ),
        }
    }
}

/// Verification category of a value
///
/// Signature compatibility in the combinator resolver is structural: arity
/// plus per-position category agreement. The byte/short/char/boolean types
/// collapse into [`ValueKind::Int`], and all object and array types collapse
/// into [`ValueKind::Reference`]; the exact reference class is carried only
/// for reporting.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ValueKind {
    Int,
    Float,
    Long,
    Double,
    Reference,
}

impl From<&FieldType> for ValueKind {
    fn from(field_type: &FieldType) -> ValueKind {
        match field_type {
            FieldType::Base(BaseType::Byte)
            | FieldType::Base(BaseType::Char)
            | FieldType::Base(BaseType::Short)
            | FieldType::Base(BaseType::Int)
            | FieldType::Base(BaseType::Boolean) => ValueKind::Int,
            FieldType::Base(BaseType::Float) => ValueKind::Float,
            FieldType::Base(BaseType::Long) => ValueKind::Long,
            FieldType::Base(BaseType::Double) => ValueKind::Double,
            FieldType::Object(_) | FieldType::Array(_) => ValueKind::Reference,
        }
    }
}
