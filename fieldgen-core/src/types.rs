//! Type descriptions consumed by the field emitter.
//!
//! The emitter never decides what a type *is*; it only asks the
//! questions in [`TypeDescriptor`]. Whatever type system sits above
//! this crate supplies the answers.

/// Read-only view of a declared field type.
pub trait TypeDescriptor {
    /// Whether the surrounding type system knows this type at all.
    fn is_resolvable(&self) -> bool;

    fn is_interface(&self) -> bool;

    fn has_zero_arg_constructor(&self) -> bool;

    /// Fully-qualified source name, e.g. `com.example.ui.Label`.
    fn qualified_name(&self) -> &str;

    /// Last segment of the qualified name.
    fn simple_name(&self) -> &str {
        simple_name_of(self.qualified_name())
    }
}

/// Returns the part of a dotted name after the last `.`.
pub fn simple_name_of(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

/// A type the surrounding type system resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassType {
    pub qualified_name: String,
    pub kind: TypeKind,
    /// Only meaningful for classes.
    pub default_constructor: bool,
}

impl ClassType {
    /// A class with a zero-argument constructor.
    pub fn class(qualified_name: impl Into<String>) -> Self {
        ClassType {
            qualified_name: qualified_name.into(),
            kind: TypeKind::Class,
            default_constructor: true,
        }
    }

    /// A class that can only be built with arguments.
    pub fn class_without_default_ctor(qualified_name: impl Into<String>) -> Self {
        ClassType {
            default_constructor: false,
            ..ClassType::class(qualified_name)
        }
    }

    pub fn interface(qualified_name: impl Into<String>) -> Self {
        ClassType {
            qualified_name: qualified_name.into(),
            kind: TypeKind::Interface,
            default_constructor: false,
        }
    }
}

impl TypeDescriptor for ClassType {
    fn is_resolvable(&self) -> bool {
        true
    }

    fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    fn has_zero_arg_constructor(&self) -> bool {
        self.default_constructor
    }

    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }
}

/// A type known only by name; no validation is possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedType {
    pub qualified_name: String,
}

impl UnresolvedType {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        UnresolvedType {
            qualified_name: qualified_name.into(),
        }
    }
}

impl TypeDescriptor for UnresolvedType {
    fn is_resolvable(&self) -> bool {
        false
    }

    fn is_interface(&self) -> bool {
        false
    }

    fn has_zero_arg_constructor(&self) -> bool {
        false
    }

    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }
}

/// Whether a field of this type needs an explicit initializer.
///
/// Only resolvable concrete classes without a zero-argument constructor
/// qualify; unknown types are given the benefit of the doubt.
pub fn lacks_default_constructor(ty: &dyn TypeDescriptor) -> bool {
    ty.is_resolvable() && !ty.is_interface() && !ty.has_zero_arg_constructor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_is_last_segment() {
        assert_eq!(simple_name_of("com.example.ui.Label"), "Label");
        assert_eq!(simple_name_of("Label"), "Label");
        assert_eq!(ClassType::class("a.b.Panel").simple_name(), "Panel");
    }

    #[test]
    fn only_concrete_classes_without_ctor_are_flagged() {
        assert!(lacks_default_constructor(&ClassType::class_without_default_ctor("a.Image")));
        assert!(!lacks_default_constructor(&ClassType::class("a.Label")));
        assert!(!lacks_default_constructor(&ClassType::interface("a.HasText")));
        assert!(!lacks_default_constructor(&UnresolvedType::new("a.Generated")));
    }
}
