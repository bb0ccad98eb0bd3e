use std::path::Path;

use tracing::info;

use crate::catalog::TypeCatalog;
use crate::construct::{ConstructMacro, GwtCreate};
use crate::diagnostic::Diagnostics;
use crate::error::CoreError;
use crate::field::{FieldGraph, FieldGraphBuilder};
use crate::manifest::{Manifest, Statement, parse_manifest};
use crate::sink::{CodeSink, IndentedWriter};

/// How fields without an initializer are constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConstructStyle {
    #[default]
    GwtCreate,
    /// `(T) TOKEN(T)`
    Macro(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub indent_width: usize,
    pub construct: ConstructStyle,
    /// Block header such as `void createAndBind()`; fields go inside braces.
    pub enclosing: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            indent_width: 2,
            construct: ConstructStyle::default(),
            enclosing: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub source: String,
    pub fields: usize,
}

/// Parse `source`, load the catalog below `catalog_root` and emit every field.
///
/// Fatal diagnostics land in `diagnostics`, which the caller keeps after
/// the returned error.
pub fn generate(
    source: &str,
    catalog_root: impl AsRef<Path>,
    options: &GeneratorOptions,
    diagnostics: &mut dyn Diagnostics,
) -> Result<GeneratedUnit, CoreError> {
    let catalog = TypeCatalog::load_dir(catalog_root)?;
    let manifest = parse_manifest(source)?;
    generate_with_catalog(&manifest, &catalog, options, diagnostics)
}

pub fn generate_with_catalog(
    manifest: &Manifest,
    catalog: &TypeCatalog,
    options: &GeneratorOptions,
    diagnostics: &mut dyn Diagnostics,
) -> Result<GeneratedUnit, CoreError> {
    let mut graph = build_graph(manifest, catalog, &options.construct)?;
    let mut writer = IndentedWriter::new(options.indent_width);

    if let Some(header) = &options.enclosing {
        writer.write_line(&format!("{header} {{"));
        writer.indent();
    }
    graph.emit_all(&mut writer, diagnostics)?;
    if options.enclosing.is_some() {
        writer.outdent();
        writer.write_line("}");
    }

    info!(fields = graph.len(), "generated field declarations");
    Ok(GeneratedUnit {
        source: writer.into_string(),
        fields: graph.len(),
    })
}

fn build_graph(
    manifest: &Manifest,
    catalog: &TypeCatalog,
    construct: &ConstructStyle,
) -> Result<FieldGraph, CoreError> {
    let mut builder = match construct {
        ConstructStyle::GwtCreate => FieldGraphBuilder::new().with_constructor(GwtCreate),
        ConstructStyle::Macro(token) => {
            FieldGraphBuilder::new().with_constructor(ConstructMacro::new(token.clone()))
        }
    };

    for statement in &manifest.statements {
        if let Statement::Field {
            name,
            type_name,
            initializer,
            ..
        } = statement
        {
            let field = builder.declare_typed(name.clone(), catalog.resolve(type_name))?;
            if let Some(initializer) = initializer {
                builder.set_initializer(field, initializer.clone())?;
            }
        }
    }

    for statement in &manifest.statements {
        if let Statement::Needs {
            field,
            dependencies,
            ..
        } = statement
        {
            let field = builder
                .lookup(field)
                .ok_or_else(|| CoreError::UnknownField(field.clone()))?;
            for dependency in dependencies {
                let dependency = builder
                    .lookup(dependency)
                    .ok_or_else(|| CoreError::UnknownField(dependency.clone()))?;
                builder.needs(field, dependency)?;
            }
        }
    }

    Ok(builder.build())
}
