//! Type catalog loaded from `*.types` files.
//!
//! Each non-blank, non-comment line describes one type:
//!
//! ```text
//! class com.example.ui.Label
//! class com.example.ui.Image no-default-ctor
//! interface com.example.ui.HasText
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::CoreError;
use crate::types::{ClassType, TypeDescriptor, UnresolvedType};

pub const CATALOG_EXTENSION: &str = "types";

#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<String, Rc<ClassType>>,
}

pub fn default_catalog_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../catalog")
}

impl TypeCatalog {
    pub fn new() -> Self {
        TypeCatalog::default()
    }

    /// Load every `*.types` file below `root`, in path order.
    pub fn load_dir(root: impl AsRef<Path>) -> Result<TypeCatalog, CoreError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CoreError::MissingCatalog(root.to_path_buf()));
        }
        let mut catalog = TypeCatalog::new();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == CATALOG_EXTENSION) {
                let contents = fs::read_to_string(path)?;
                let relative = path.strip_prefix(root).unwrap_or(path);
                catalog.parse_into(relative, &contents)?;
            }
        }
        debug!(types = catalog.len(), root = %root.display(), "loaded type catalog");
        Ok(catalog)
    }

    /// Add the entries of one catalog file. `path` is only used in errors.
    pub fn parse_into(&mut self, path: &Path, contents: &str) -> Result<(), CoreError> {
        for (index, raw) in contents.lines().enumerate() {
            let line = index + 1;
            let text = raw.split('#').next().unwrap_or("").trim();
            if text.is_empty() {
                continue;
            }
            let error = |message: String| CoreError::CatalogError {
                path: path.to_path_buf(),
                line,
                message,
            };

            let mut words = text.split_whitespace();
            let keyword = words.next().unwrap_or("");
            let name = words
                .next()
                .ok_or_else(|| error(format!("expected a type name after '{keyword}'")))?;
            let modifier = words.next();
            if let Some(extra) = words.next() {
                return Err(error(format!("unexpected '{extra}'")));
            }

            let ty = match (keyword, modifier) {
                ("class", None) => ClassType::class(name),
                ("class", Some("no-default-ctor")) => ClassType::class_without_default_ctor(name),
                ("interface", None) => ClassType::interface(name),
                (_, Some(other)) if keyword == "class" || keyword == "interface" => {
                    return Err(error(format!("unknown modifier '{other}'")));
                }
                _ => return Err(error(format!("unknown declaration '{keyword}'"))),
            };

            if self.types.contains_key(name) {
                return Err(error(format!("type '{name}' is declared more than once")));
            }
            self.types.insert(name.to_string(), Rc::new(ty));
        }
        Ok(())
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Rc<ClassType>> {
        self.types.get(qualified_name)
    }

    /// Descriptor for `qualified_name`, unresolved if the catalog lacks it.
    pub fn resolve(&self, qualified_name: &str) -> Rc<dyn TypeDescriptor> {
        match self.types.get(qualified_name) {
            Some(ty) => Rc::clone(ty) as Rc<dyn TypeDescriptor>,
            None => Rc::new(UnresolvedType::new(qualified_name)),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
