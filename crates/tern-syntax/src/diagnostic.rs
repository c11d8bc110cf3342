//! Diagnostics reported alongside (not instead of) a checking result.
//!
//! Fatal problems are returned as errors by the checker. Everything that
//! does not stop a unit, such as a redundant match case or a match that
//! misses values, is a [`Diagnostic`] with [`DiagnosticLevel::Warning`].

use crate::span::Span;
use std::fmt::{self, Write as _};

/// A diagnostic message with a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity
    pub level: DiagnosticLevel,
    /// Stable code such as `W0001`
    pub code: Option<String>,
    /// Primary message
    pub message: String,
    /// Primary location
    pub span: Span,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Secondary messages
    pub notes: Vec<DiagnosticNote>,
}

impl Diagnostic {
    /// Shorthand for a warning without code, notes or suggestions.
    #[must_use]
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        DiagnosticBuilder::new(DiagnosticLevel::Warning, message.into(), span).build()
    }

    /// True for warnings.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.level == DiagnosticLevel::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.span, self.level, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        Ok(())
    }
}

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// The unit was rejected
    Error,
    /// Suspicious but accepted
    Warning,
    /// Additional information
    Note,
    /// Suggestion
    Help,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Note => write!(f, "note"),
            Self::Help => write!(f, "help"),
        }
    }
}

impl DiagnosticLevel {
    /// ANSI color for this level.
    #[must_use]
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Note => "\x1b[36m",
            Self::Help => "\x1b[32m",
        }
    }

    /// ANSI reset.
    #[must_use]
    pub const fn reset_code() -> &'static str {
        "\x1b[0m"
    }

    /// The level name, colored when `use_colors` is set.
    #[must_use]
    pub fn format_colored(&self, use_colors: bool) -> String {
        if use_colors {
            format!("{}{}{}", self.color_code(), self, Self::reset_code())
        } else {
            self.to_string()
        }
    }
}

/// A note attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticNote {
    /// Note message
    pub message: String,
    /// Location the note refers to
    pub span: Span,
}

/// Builder for [`Diagnostic`].
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Starts a diagnostic.
    #[must_use]
    pub fn new(level: DiagnosticLevel, message: String, span: Span) -> Self {
        Self {
            diagnostic: Diagnostic {
                level,
                code: None,
                message,
                span,
                suggestions: Vec::new(),
                notes: Vec::new(),
            },
        }
    }

    /// Sets the code.
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.diagnostic.code = Some(code.into());
        self
    }

    /// Adds a suggestion.
    #[must_use]
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.diagnostic.suggestions.push(suggestion.into());
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn note(mut self, message: impl Into<String>, span: Span) -> Self {
        self.diagnostic.notes.push(DiagnosticNote {
            message: message.into(),
            span,
        });
        self
    }

    /// Finishes the diagnostic.
    #[must_use]
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

/// Renders diagnostics with the offending source lines underlined.
pub struct Emitter {
    use_colors: bool,
}

impl Emitter {
    /// Creates an emitter.
    #[must_use]
    pub const fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Renders `diagnostic` against `source`.
    #[must_use]
    pub fn render(&self, diagnostic: &Diagnostic, source: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_diagnostic(&mut out, diagnostic, source);
        out
    }

    fn write_diagnostic(
        &self,
        out: &mut String,
        diagnostic: &Diagnostic,
        source: &str,
    ) -> fmt::Result {
        let span = diagnostic.span;
        writeln!(
            out,
            "{}:{}: {}: {}",
            span.start_line,
            span.start_col,
            diagnostic.level.format_colored(self.use_colors),
            diagnostic.message
        )?;

        if let Some(code) = &diagnostic.code {
            writeln!(out, "   [{code}]")?;
        }

        self.write_highlight(out, diagnostic.level, span, source)?;

        for suggestion in &diagnostic.suggestions {
            let help = DiagnosticLevel::Help.format_colored(self.use_colors);
            writeln!(out, "   {help}: {suggestion}")?;
        }

        for note in &diagnostic.notes {
            let prefix = DiagnosticLevel::Note.format_colored(self.use_colors);
            writeln!(
                out,
                "   {prefix} at {}:{}: {}",
                note.span.start_line, note.span.start_col, note.message
            )?;
        }
        Ok(())
    }

    fn write_highlight(
        &self,
        out: &mut String,
        level: DiagnosticLevel,
        span: Span,
        source: &str,
    ) -> fmt::Result {
        let lines: Vec<&str> = source.lines().collect();
        // Synthetic spans have line 0 and nothing to point at.
        if lines.is_empty() || span.start_line == 0 {
            return Ok(());
        }

        let last = lines.len() - 1;
        let first_line = (span.start_line - 1).min(last);
        let last_line = span.end_line.saturating_sub(1).clamp(first_line, last);

        for (line_idx, line) in lines
            .iter()
            .enumerate()
            .take(last_line + 1)
            .skip(first_line)
        {
            writeln!(out, "{:4} | {line}", line_idx + 1)?;

            let from = if line_idx == first_line { span.start_col } else { 1 };
            let to = if line_idx == last_line {
                span.end_col
            } else {
                line.len() + 1
            };
            let width = to.saturating_sub(from);
            if width == 0 {
                continue;
            }

            let indent = " ".repeat(from.saturating_sub(1));
            let carets = "^".repeat(width);
            if self.use_colors {
                writeln!(
                    out,
                    "     | {indent}{}{carets}{}",
                    level.color_code(),
                    DiagnosticLevel::reset_code()
                )?;
            } else {
                writeln!(out, "     | {indent}{carets}")?;
            }
        }
        Ok(())
    }
}
