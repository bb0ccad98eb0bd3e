//! Fatal diagnostics reported while generating field declarations.
//!
//! A diagnostic keeps its message template and positional arguments
//! apart so that sinks can inspect the arguments (e.g. the type name
//! that lacks a constructor) without re-parsing the rendered text.

use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Message text with `{0}`, `{1}`, ... placeholders.
    pub template: &'static str,
    pub args: Vec<String>,
}

impl Diagnostic {
    pub fn new(template: &'static str, args: Vec<String>) -> Self {
        Diagnostic { template, args }
    }

    /// Substitute the positional arguments into the template.
    ///
    /// Placeholders without a matching argument are left as written.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                let arg = self.args.get(index)?;
                Some((arg, close))
            });
            match substituted {
                Some((arg, close)) => {
                    out.push_str(arg);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Receiver for fatal diagnostics raised during a generation pass.
///
/// Once anything has been reported the pass must not produce usable
/// output; callers check [`Diagnostics::has_fatal`] before trusting it.
pub trait Diagnostics {
    fn fatal(&mut self, diagnostic: Diagnostic);

    fn has_fatal(&self) -> bool;
}

/// Collects diagnostics in report order and mirrors them to the log.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        DiagnosticLog::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Diagnostics for DiagnosticLog {
    fn fatal(&mut self, diagnostic: Diagnostic) {
        error!("{}", diagnostic.render());
        self.entries.push(diagnostic);
    }

    fn has_fatal(&self) -> bool {
        !self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn renders_positional_arguments() {
        let diagnostic = Diagnostic::new(
            "{0} is missing; annotate {1}",
            vec!["com.example.Foo".to_string(), "Foo".to_string()],
        );
        assert_eq!(diagnostic.render(), "com.example.Foo is missing; annotate Foo");
    }

    #[test]
    fn leaves_unmatched_placeholders_alone() {
        let diagnostic = Diagnostic::new("{0} and {2} and {x}", vec!["a".to_string()]);
        assert_eq!(diagnostic.render(), "a and {2} and {x}");
    }

    #[test]
    fn log_records_in_report_order() {
        let mut log = DiagnosticLog::new();
        assert!(!log.has_fatal());
        log.fatal(Diagnostic::new("first", Vec::new()));
        log.fatal(Diagnostic::new("second", Vec::new()));
        assert!(log.has_fatal());
        let rendered: Vec<_> = log.entries().iter().map(Diagnostic::render).collect();
        assert_eq!(rendered, vec!["first", "second"]);
    }

    #[test]
    #[traced_test]
    fn fatal_reports_are_logged() {
        let mut log = DiagnosticLog::new();
        log.fatal(Diagnostic::new("{0} exploded", vec!["Widget".to_string()]));
        assert!(logs_contain("Widget exploded"));
    }
}
