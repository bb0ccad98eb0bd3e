//! Fallback initializers for fields declared without one.
//!
//! The emitter does not know how the target language builds a default
//! instance of a type. It asks a [`DefaultConstructor`] for the whole
//! right-hand side, cast included.

/// Produces the deferred default-construction expression for a type.
pub trait DefaultConstructor {
    fn default_instance(&self, qualified_name: &str) -> String;
}

impl<F> DefaultConstructor for F
where
    F: Fn(&str) -> String,
{
    fn default_instance(&self, qualified_name: &str) -> String {
        self(qualified_name)
    }
}

/// `(T) GWT.create(T.class)`, the default fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GwtCreate;

impl DefaultConstructor for GwtCreate {
    fn default_instance(&self, qualified_name: &str) -> String {
        format!("({qualified_name}) GWT.create({qualified_name}.class)")
    }
}

/// `(T) TOKEN(T)` for targets that wrap construction in a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructMacro {
    pub token: String,
}

impl ConstructMacro {
    pub fn new(token: impl Into<String>) -> Self {
        ConstructMacro {
            token: token.into(),
        }
    }
}

impl DefaultConstructor for ConstructMacro {
    fn default_instance(&self, qualified_name: &str) -> String {
        format!("({qualified_name}) {}({qualified_name})", self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gwt_create_uses_class_literal() {
        assert_eq!(
            GwtCreate.default_instance("com.example.Widget"),
            "(com.example.Widget) GWT.create(com.example.Widget.class)"
        );
    }

    #[test]
    fn macro_token_wraps_type_name() {
        let style = ConstructMacro::new("GWT_DEFAULT_CONSTRUCT");
        assert_eq!(
            style.default_instance("Widget"),
            "(Widget) GWT_DEFAULT_CONSTRUCT(Widget)"
        );
    }

    #[test]
    fn closures_are_constructors() {
        let make = |name: &str| format!("new {name}()");
        assert_eq!(make.default_instance("Foo"), "new Foo()");
    }
}
