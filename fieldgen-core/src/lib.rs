//! Dependency-ordered field declaration emitter.
//!
//! Generated views declare one local per field, and a field may need
//! other fields declared before it. This crate owns the *how* of that
//! emission:
//!
//!   manifest (.fields) + type catalog (.types)
//!     -> FieldGraphBuilder   (declare, wire needs, bind initializers)
//!     -> FieldGraph          (frozen; emits each field once, deps first)
//!     -> CodeSink            (IndentedWriter or any line collector)
//!
//! The manifest and catalog formats are deliberately small; real
//! generators are expected to drive [`FieldGraphBuilder`] directly.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Collaborators: types, output, fallback construction
// ---------------------------------------------------------------------

pub mod construct;
pub mod sink;
pub mod types;

// ---------------------------------------------------------------------
// Field graph and emission
// ---------------------------------------------------------------------

pub mod field;

// ---------------------------------------------------------------------
// Driver: catalog loading, manifest parsing, orchestration
// ---------------------------------------------------------------------

pub mod catalog;
pub mod generator;
pub mod manifest;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use construct::{ConstructMacro, DefaultConstructor, GwtCreate};
pub use diagnostic::{Diagnostic, DiagnosticLog, Diagnostics};
pub use error::CoreError;
pub use field::{EmitState, FieldGraph, FieldGraphBuilder, FieldId};
pub use generator::{ConstructStyle, GeneratedUnit, GeneratorOptions, generate};
pub use sink::{CodeSink, IndentedWriter};
pub use types::{ClassType, TypeDescriptor, UnresolvedType};
