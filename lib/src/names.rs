use std::borrow::Cow;
use std::fmt::{Debug, Display, Error as FmtError, Formatter};

/// Names of classes and interfaces, in slash-separated binary form
/// (`java/lang/Object`, `pkg/Outer$Inner`)
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct BinaryName(Cow<'static, str>);

/// Names of fields, methods, and constructors
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct UnqualifiedName(Cow<'static, str>);

impl BinaryName {
    /// Check if a string would be a valid binary name
    pub fn check_valid(name: impl AsRef<str>) -> Result<(), String> {
        let name = name.as_ref();
        if name.is_empty() {
            Err(format!("Binary name '{}' is empty", name))
        } else {
            name.split('/')
                .map(UnqualifiedName::check_valid)
                .collect()
        }
    }

    /// Try to construct a name from a string
    pub fn from_string(name: String) -> Result<Self, String> {
        Self::check_valid(&name).map(|()| BinaryName(Cow::Owned(name)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    /// Package prefix of the name (empty for the default package)
    ///
    /// Nested classes use `$` in their final segment, so `pkg/Outer$Inner`
    /// and `pkg/Outer` share the package `pkg`.
    pub fn package_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    const fn name(value: &'static str) -> BinaryName {
        BinaryName(Cow::Borrowed(value))
    }

    pub const OBJECT: Self = Self::name("java/lang/Object");
    pub const STRING: Self = Self::name("java/lang/String");
    pub const ITERABLE: Self = Self::name("java/lang/Iterable");
    pub const ITERATOR: Self = Self::name("java/util/Iterator");
    pub const LIST: Self = Self::name("java/util/List");
}

impl UnqualifiedName {
    /// Check if a string would be a valid unqualified name
    pub fn check_valid(name: impl AsRef<str>) -> Result<(), String> {
        let name = name.as_ref();
        if name.is_empty() {
            Err(format!("Unqualified name '{}' is empty", name))
        } else if name.contains(&['.', ';', '[', '/'][..]) {
            Err(format!(
                "Unqualified name '{}' contains an illegal character",
                name
            ))
        } else {
            Ok(())
        }
    }

    /// Try to construct a name from a string
    pub fn from_string(name: String) -> Result<Self, String> {
        Self::check_valid(&name).map(|()| UnqualifiedName(Cow::Owned(name)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    const fn name(value: &'static str) -> UnqualifiedName {
        UnqualifiedName(Cow::Borrowed(value))
    }

    // Only these are allowed to have angle brackets in them
    pub const INIT: Self = Self::name("<init>");
    pub const CLINIT: Self = Self::name("<clinit>");
}

impl AsRef<str> for BinaryName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl AsRef<str> for UnqualifiedName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl Debug for BinaryName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl Debug for UnqualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl Display for BinaryName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl Display for UnqualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}
