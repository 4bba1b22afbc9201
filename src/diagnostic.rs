use std::io;
use std::ops::Range;

use crate::error::{Category, Error};
use crate::syntax::lower::SyntaxError;

/// A checker diagnostic (error or warning).
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Write the report to `out` with ariadne. Micheline input carries no
    /// source spans, so the report is anchored at the start of the file.
    pub fn write_to<W: io::Write>(
        &self,
        filename: &str,
        source: &str,
        color: bool,
        out: W,
    ) -> io::Result<()> {
        use ariadne::{Config, Report, ReportKind, Source};

        let kind = match self.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        };

        let mut report = Report::<(&str, Range<usize>)>::build(kind, filename, 0)
            .with_config(Config::default().with_color(color))
            .with_message(&self.message);

        for note in &self.notes {
            report = report.with_note(note);
        }

        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        report.finish().write((filename, Source::from(source)), out)
    }

    /// Render the diagnostic to stderr.
    pub fn render(&self, filename: &str, source: &str) -> io::Result<()> {
        self.write_to(filename, source, true, io::stderr())
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        let mut d = Diagnostic::error(format!("{}: {}", err.category(), err));
        for step in &err.path {
            d = d.with_note(format!("in {}", step));
        }
        if let Some(stack) = err.stack_note() {
            d = d.with_note(stack);
        }
        match err.category() {
            Category::Unsupported => d.with_help(
                "SELF, CAST and CREATE_CONTRACT are not modelled by this checker".to_string(),
            ),
            Category::ResourceLimit => {
                d.with_help("raise max_depth in the checker config".to_string())
            }
            Category::InternalInvariant => {
                d.with_help("validate the literals before comparing them".to_string())
            }
            _ => d,
        }
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(err: &SyntaxError) -> Self {
        Diagnostic::error(format!("syntax error: {}", err))
    }
}
