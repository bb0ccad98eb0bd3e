//! Dependency-ordered emission of field declarations.
//!
//! Fields are declared and wired on a [`FieldGraphBuilder`], then frozen
//! into a [`FieldGraph`] for emission. Emitting a field first emits every
//! field it needs, in the order the needs were added, and writes each
//! declaration at most once:
//!
//! ```text
//! <qualified type> <name> = <initializer>;
//! ```
//!
//! A field without an explicit initializer gets one from the graph's
//! [`DefaultConstructor`], unless its type is a resolvable concrete class
//! without a zero-argument constructor. That case is reported to the
//! [`Diagnostics`] sink as fatal and the emission fails with
//! [`CoreError::UnableToComplete`]; every generation error is returned
//! through `Result`, after any diagnostic has been reported.
//!
//! The emitted flag belongs to the graph, not to a scope. A field needed
//! from two different enclosing blocks is declared only inside the first
//! one that reaches it. Emission recurses once per dependency link, so
//! chains tens of thousands of fields deep can exhaust the thread's stack.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::construct::{DefaultConstructor, GwtCreate};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::CoreError;
use crate::sink::CodeSink;
use crate::types::{TypeDescriptor, lacks_default_constructor};

pub const NO_DEFAULT_CTOR_ERROR: &str = "{0} has no default (zero args) constructor. To fix this, \
     supply an explicit factory for the field, or annotate a constructor of {1} as the one to use.";

/// Index of a field inside the graph that declared it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(self) -> usize {
        self.0
    }
}

struct FieldDef {
    name: String,
    /// Text written as the declaration's type.
    type_name: String,
    declared_type: Option<Rc<dyn TypeDescriptor>>,
    needs: Vec<FieldId>,
    initializer: Option<String>,
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("typed", &self.declared_type.is_some())
            .field("needs", &self.needs)
            .field("initializer", &self.initializer)
            .finish()
    }
}

/// Mutable construction phase of a field graph.
pub struct FieldGraphBuilder {
    fields: Vec<FieldDef>,
    by_name: HashMap<String, FieldId>,
    constructor: Box<dyn DefaultConstructor>,
}

impl Default for FieldGraphBuilder {
    fn default() -> Self {
        FieldGraphBuilder::new()
    }
}

impl FieldGraphBuilder {
    pub fn new() -> Self {
        FieldGraphBuilder {
            fields: Vec::new(),
            by_name: HashMap::new(),
            constructor: Box::new(GwtCreate),
        }
    }

    /// Replace the fallback initializer style (default: [`GwtCreate`]).
    pub fn with_constructor(mut self, constructor: impl DefaultConstructor + 'static) -> Self {
        self.constructor = Box::new(constructor);
        self
    }

    /// Declare a field whose type is described by the type system.
    pub fn declare_typed(
        &mut self,
        name: impl Into<String>,
        declared_type: Rc<dyn TypeDescriptor>,
    ) -> Result<FieldId, CoreError> {
        let type_name = declared_type.qualified_name().to_string();
        self.declare(name.into(), type_name, Some(declared_type))
    }

    /// Declare a field of a type produced by the generator itself.
    ///
    /// No type information exists at this layer, so the constructor check
    /// is skipped for it.
    pub fn declare_generated(
        &mut self,
        name: impl Into<String>,
        qualified_name: impl Into<String>,
    ) -> Result<FieldId, CoreError> {
        self.declare(name.into(), qualified_name.into(), None)
    }

    fn declare(
        &mut self,
        name: String,
        type_name: String,
        declared_type: Option<Rc<dyn TypeDescriptor>>,
    ) -> Result<FieldId, CoreError> {
        if name.is_empty() {
            return Err(CoreError::EmptyFieldName);
        }
        if self.by_name.contains_key(&name) {
            return Err(CoreError::DuplicateField(name));
        }
        let id = FieldId(self.fields.len());
        self.by_name.insert(name.clone(), id);
        self.fields.push(FieldDef {
            name,
            type_name,
            declared_type,
            needs: Vec::new(),
            initializer: None,
        });
        Ok(id)
    }

    /// Record that `field` must be declared after `dependency`.
    ///
    /// Adding the same dependency again keeps its first position.
    pub fn needs(&mut self, field: FieldId, dependency: FieldId) -> Result<(), CoreError> {
        check_id(field, self.fields.len())?;
        check_id(dependency, self.fields.len())?;
        let needs = &mut self.fields[field.0].needs;
        if !needs.contains(&dependency) {
            needs.push(dependency);
        }
        Ok(())
    }

    /// Bind the field's initializer expression.
    ///
    /// Binding the same text again is accepted; binding different text
    /// is a [`CoreError::InitializerConflict`].
    pub fn set_initializer(
        &mut self,
        field: FieldId,
        initializer: impl Into<String>,
    ) -> Result<(), CoreError> {
        check_id(field, self.fields.len())?;
        let initializer = initializer.into();
        let def = &mut self.fields[field.0];
        match &def.initializer {
            Some(previous) if *previous != initializer => Err(CoreError::InitializerConflict {
                field: def.name.clone(),
                previous: previous.clone(),
                attempted: initializer,
            }),
            Some(_) => Ok(()),
            None => {
                def.initializer = Some(initializer);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<FieldId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, field: FieldId) -> &str {
        &self.fields[field.0].name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Freeze the definitions. Nothing but emission state changes after this.
    pub fn build(self) -> FieldGraph {
        let state = vec![EmitState::Pending; self.fields.len()];
        FieldGraph {
            fields: self.fields,
            by_name: self.by_name,
            state,
            constructor: self.constructor,
        }
    }
}

/// Ids are plain indices, so only ids past the end can be told apart
/// from ids of this graph.
fn check_id(field: FieldId, len: usize) -> Result<(), CoreError> {
    if field.0 < len {
        Ok(())
    } else {
        Err(CoreError::UnknownField(format!("#{}", field.0)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitState {
    Pending,
    /// On the current emission path.
    Emitting,
    Emitted,
    /// An earlier attempt aborted; the field is never written.
    Failed,
}

/// Frozen field definitions plus per-field emission state.
pub struct FieldGraph {
    fields: Vec<FieldDef>,
    by_name: HashMap<String, FieldId>,
    state: Vec<EmitState>,
    constructor: Box<dyn DefaultConstructor>,
}

impl fmt::Debug for FieldGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldGraph")
            .field("fields", &self.fields)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl FieldGraph {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = FieldId> + use<> {
        (0..self.fields.len()).map(FieldId)
    }

    pub fn lookup(&self, name: &str) -> Option<FieldId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, field: FieldId) -> &str {
        &self.fields[field.0].name
    }

    pub fn type_name(&self, field: FieldId) -> &str {
        &self.fields[field.0].type_name
    }

    pub fn initializer(&self, field: FieldId) -> Option<&str> {
        self.fields[field.0].initializer.as_deref()
    }

    pub fn dependencies(&self, field: FieldId) -> &[FieldId] {
        &self.fields[field.0].needs
    }

    pub fn state(&self, field: FieldId) -> EmitState {
        self.state[field.0]
    }

    pub fn is_emitted(&self, field: FieldId) -> bool {
        self.state[field.0] == EmitState::Emitted
    }

    /// Write the declaration of `field`, preceded by anything it needs.
    ///
    /// Already emitted fields are skipped silently.
    pub fn emit(
        &mut self,
        field: FieldId,
        out: &mut dyn CodeSink,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<(), CoreError> {
        check_id(field, self.fields.len())?;
        let mut path = Vec::new();
        self.emit_field(field, out, diagnostics, &mut path)
    }

    /// Emit every field in declaration order, stopping at the first error.
    pub fn emit_all(
        &mut self,
        out: &mut dyn CodeSink,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<(), CoreError> {
        for field in self.ids() {
            self.emit(field, out, diagnostics)?;
        }
        Ok(())
    }

    fn emit_field(
        &mut self,
        field: FieldId,
        out: &mut dyn CodeSink,
        diagnostics: &mut dyn Diagnostics,
        path: &mut Vec<FieldId>,
    ) -> Result<(), CoreError> {
        let state = self
            .state
            .get(field.0)
            .copied()
            .ok_or_else(|| CoreError::UnknownField(format!("#{}", field.0)))?;
        match state {
            EmitState::Pending => {}
            EmitState::Emitted => {
                trace!(field = %self.fields[field.0].name, "already emitted");
                return Ok(());
            }
            EmitState::Emitting => return Err(self.cycle_error(field, path)),
            EmitState::Failed => {
                return Err(CoreError::Aborted {
                    field: self.fields[field.0].name.clone(),
                });
            }
        }

        self.state[field.0] = EmitState::Emitting;
        path.push(field);
        let result = self.emit_needs_then_self(field, out, diagnostics, path);
        path.pop();

        self.state[field.0] = if result.is_ok() {
            EmitState::Emitted
        } else {
            EmitState::Failed
        };
        result
    }

    fn emit_needs_then_self(
        &mut self,
        field: FieldId,
        out: &mut dyn CodeSink,
        diagnostics: &mut dyn Diagnostics,
        path: &mut Vec<FieldId>,
    ) -> Result<(), CoreError> {
        for index in 0..self.fields[field.0].needs.len() {
            let dependency = self.fields[field.0].needs[index];
            self.emit_field(dependency, out, diagnostics, path)?;
        }

        let initializer = self.resolve_initializer(field, diagnostics)?;
        let def = &self.fields[field.0];
        debug!(field = %def.name, ty = %def.type_name, "emitting field declaration");
        out.write_line(&format!("{} {} = {};", def.type_name, def.name, initializer));
        Ok(())
    }

    fn resolve_initializer(
        &self,
        field: FieldId,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<String, CoreError> {
        let def = &self.fields[field.0];
        if let Some(initializer) = &def.initializer {
            return Ok(initializer.clone());
        }

        if let Some(ty) = &def.declared_type {
            if lacks_default_constructor(ty.as_ref()) {
                let diagnostic = Diagnostic::new(
                    NO_DEFAULT_CTOR_ERROR,
                    vec![ty.qualified_name().to_string(), ty.simple_name().to_string()],
                );
                let message = diagnostic.render();
                diagnostics.fatal(diagnostic);
                return Err(CoreError::UnableToComplete {
                    field: def.name.clone(),
                    message,
                });
            }
        }

        Ok(self.constructor.default_instance(&def.type_name))
    }

    fn cycle_error(&self, field: FieldId, path: &[FieldId]) -> CoreError {
        let start = path.iter().position(|id| *id == field).unwrap_or(0);
        let cycle = path[start..]
            .iter()
            .chain(std::iter::once(&field))
            .map(|id| self.fields[id.0].name.clone())
            .collect();
        CoreError::CycleDetected { cycle }
    }
}
