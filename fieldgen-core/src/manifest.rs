//! Line-oriented field manifest read by the generator.
//!
//! ```text
//! # comment
//! field title: com.example.ui.Label = new Label("Hello")
//! field panel: com.example.ui.FlowPanel
//! needs panel: title
//! ```
//!
//! Initializers run to the end of the line and are kept verbatim.

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Field {
        line: usize,
        name: String,
        type_name: String,
        initializer: Option<String>,
    },
    Needs {
        line: usize,
        field: String,
        dependencies: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub statements: Vec<Statement>,
}

pub fn parse_manifest(source: &str) -> Result<Manifest, CoreError> {
    let mut statements = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let (keyword, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        let statement = match keyword {
            "field" => parse_field(line, rest)?,
            "needs" => parse_needs(line, rest)?,
            other => return Err(parse_error(line, format!("unknown statement '{other}'"))),
        };
        statements.push(statement);
    }
    Ok(Manifest { statements })
}

fn parse_field(line: usize, rest: &str) -> Result<Statement, CoreError> {
    let (name, declaration) = rest
        .split_once(':')
        .ok_or_else(|| parse_error(line, "expected ':' after the field name"))?;
    let name = expect_ident(line, name.trim())?;

    let (type_name, initializer) = match declaration.split_once('=') {
        Some((type_name, initializer)) => {
            let initializer = initializer.trim();
            if initializer.is_empty() {
                return Err(parse_error(line, "expected an initializer after '='"));
            }
            (type_name.trim(), Some(initializer.to_string()))
        }
        None => (declaration.trim(), None),
    };
    if !is_qualified_name(type_name) {
        return Err(parse_error(line, format!("invalid type name '{type_name}'")));
    }

    Ok(Statement::Field {
        line,
        name,
        type_name: type_name.to_string(),
        initializer,
    })
}

fn parse_needs(line: usize, rest: &str) -> Result<Statement, CoreError> {
    let (field, list) = rest
        .split_once(':')
        .ok_or_else(|| parse_error(line, "expected ':' after the field name"))?;
    let field = expect_ident(line, field.trim())?;
    let dependencies = list
        .split(',')
        .map(|dep| expect_ident(line, dep.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Statement::Needs {
        line,
        field,
        dependencies,
    })
}

fn expect_ident(line: usize, text: &str) -> Result<String, CoreError> {
    if is_ident(text) {
        Ok(text.to_string())
    } else if text.is_empty() {
        Err(parse_error(line, "expected a field name"))
    } else {
        Err(parse_error(line, format!("invalid field name '{text}'")))
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> CoreError {
    CoreError::ParseError {
        line,
        message: message.into(),
    }
}

fn is_ident(text: &str) -> bool {
    let mut bytes = text.bytes();
    match bytes.next() {
        Some(first) if is_ident_start(first) => bytes.all(is_ident_continue),
        _ => false,
    }
}

fn is_qualified_name(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_ident)
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'$'
}

fn is_ident_continue(ch: u8) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}
