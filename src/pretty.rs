//! Pretty printing for resolution errors.
//!
//! Validation failures are grouped by the section their label belongs to,
//! with the received value under each failure. Errors without diagnostics
//! print their message as a single entry.
//!
//! # Output Format
//!
//! ```text
//! Configuration errors (2):
//!
//!   core:
//!     • core.namespace: must be at least 5 characters
//!         received: "abc"
//!     • core.title: must be at least 5 characters
//!         received: "Tiny"
//! ```

use std::io::Write;

use crate::constants::exit_codes;
use crate::error::{group_by_section, Diagnostic, Diagnostics, ResolveError};

/// Options for pretty printing errors.
#[derive(Debug, Clone)]
pub struct PrettyPrintOptions {
    /// Enable colored output (auto-detected by default).
    pub color: ColorOption,
    /// Group diagnostics by section.
    pub group_by_section: bool,
    /// Show the received value under each diagnostic.
    pub show_received: bool,
    /// Maximum diagnostics to display (None for all).
    pub max_errors: Option<usize>,
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        Self {
            color: ColorOption::Auto,
            group_by_section: true,
            show_received: true,
            max_errors: Some(20),
        }
    }
}

impl PrettyPrintOptions {
    /// Create options with colors disabled.
    pub fn no_color() -> Self {
        Self {
            color: ColorOption::Never,
            ..Default::default()
        }
    }

    /// Create options that show all errors (no truncation).
    pub fn show_all() -> Self {
        Self {
            max_errors: None,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: ColorOption) -> Self {
        self.color = color;
        self
    }

    pub fn with_grouping(mut self, group: bool) -> Self {
        self.group_by_section = group;
        self
    }

    pub fn with_received(mut self, show: bool) -> Self {
        self.show_received = show;
        self
    }

    pub fn with_max_errors(mut self, max: Option<usize>) -> Self {
        self.max_errors = max;
        self
    }
}

/// Color output option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOption {
    /// Auto-detect based on terminal capability.
    Auto,
    Always,
    Never,
}

/// ANSI color codes for terminal output.
struct Colors {
    error: &'static str,
    warning: &'static str,
    info: &'static str,
    path: &'static str,
    value: &'static str,
    reset: &'static str,
}

impl Colors {
    fn enabled() -> Self {
        Self {
            error: "\x1b[1;31m",   // bold red
            warning: "\x1b[1;33m", // bold yellow
            info: "\x1b[1;36m",    // bold cyan
            path: "\x1b[1;37m",    // bold white
            value: "\x1b[33m",     // yellow
            reset: "\x1b[0m",
        }
    }

    fn disabled() -> Self {
        Self {
            error: "",
            warning: "",
            info: "",
            path: "",
            value: "",
            reset: "",
        }
    }
}

struct ErrorPrinter<'a> {
    options: &'a PrettyPrintOptions,
    colors: Colors,
}

impl<'a> ErrorPrinter<'a> {
    fn new(options: &'a PrettyPrintOptions, use_color: bool) -> Self {
        let colors = if use_color {
            Colors::enabled()
        } else {
            Colors::disabled()
        };
        Self { options, colors }
    }

    fn print_error(&self, error: &ResolveError, writer: &mut dyn Write) {
        match error.diagnostics() {
            Some(diagnostics) => self.print_diagnostics(diagnostics, writer),
            None => {
                let c = &self.colors;
                writeln!(writer, "\n{}Configuration error:{}\n", c.error, c.reset).ok();
                for line in error.to_string().lines() {
                    writeln!(writer, "    {}", line).ok();
                }
                writeln!(writer).ok();
            }
        }
    }

    fn print_diagnostics(&self, diagnostics: &Diagnostics, writer: &mut dyn Write) {
        let c = &self.colors;

        writeln!(
            writer,
            "\n{}Configuration errors ({}):{}\n",
            c.error,
            diagnostics.len(),
            c.reset
        )
        .ok();

        if self.options.group_by_section {
            self.print_grouped(diagnostics, writer);
        } else {
            self.print_flat(diagnostics, writer);
        }
    }

    fn print_grouped(&self, diagnostics: &Diagnostics, writer: &mut dyn Write) {
        let c = &self.colors;
        let mut shown = 0;

        for (section, group) in group_by_section(diagnostics) {
            writeln!(writer, "  {}{}:{}", c.info, section, c.reset).ok();

            for diagnostic in group {
                if self.truncated(shown, diagnostics.len(), writer) {
                    return;
                }
                self.print_diagnostic(diagnostic, writer);
                shown += 1;
            }
            writeln!(writer).ok();
        }
    }

    fn print_flat(&self, diagnostics: &Diagnostics, writer: &mut dyn Write) {
        for (shown, diagnostic) in diagnostics.iter().enumerate() {
            if self.truncated(shown, diagnostics.len(), writer) {
                return;
            }
            self.print_diagnostic(diagnostic, writer);
        }
        writeln!(writer).ok();
    }

    fn truncated(&self, shown: usize, total: usize, writer: &mut dyn Write) -> bool {
        match self.options.max_errors {
            Some(max) if shown >= max => {
                let c = &self.colors;
                writeln!(
                    writer,
                    "\n  {}...and {} more errors{}\n",
                    c.warning,
                    total - shown,
                    c.reset
                )
                .ok();
                true
            }
            _ => false,
        }
    }

    fn print_diagnostic(&self, diagnostic: &Diagnostic, writer: &mut dyn Write) {
        let c = &self.colors;
        writeln!(
            writer,
            "    {}•{} {}{}{}: {}",
            c.error, c.reset, c.path, diagnostic.label, c.reset, diagnostic.description
        )
        .ok();

        if self.options.show_received {
            let mut lines = diagnostic.received.lines();
            if let Some(first) = lines.next() {
                writeln!(writer, "        received: {}{}{}", c.value, first, c.reset).ok();
            }
            for line in lines {
                writeln!(writer, "                  {}{}{}", c.value, line, c.reset).ok();
            }
        }
    }
}

/// Detect if stderr is a TTY for color support.
fn should_use_color(color_option: ColorOption) -> bool {
    match color_option {
        ColorOption::Always => true,
        ColorOption::Never => false,
        ColorOption::Auto => {
            use std::io::IsTerminal;
            std::io::stderr().is_terminal()
        }
    }
}

fn format_color(color_option: ColorOption) -> bool {
    // No color for string formatting unless asked for
    color_option == ColorOption::Always
}

impl ResolveError {
    /// Pretty print to stderr.
    pub fn pretty_print(&self, options: &PrettyPrintOptions) {
        let printer = ErrorPrinter::new(options, should_use_color(options.color));
        printer.print_error(self, &mut std::io::stderr());
    }

    /// Pretty print to a string.
    pub fn format(&self, options: &PrettyPrintOptions) -> String {
        let printer = ErrorPrinter::new(options, format_color(options.color));
        let mut buf = Vec::new();
        printer.print_error(self, &mut buf);
        String::from_utf8(buf).unwrap_or_default()
    }

    pub fn pretty_print_default(&self) {
        self.pretty_print(&PrettyPrintOptions::default());
    }

    /// Process exit code for this error.
    ///
    /// Input that could not be loaded is a general error; everything else
    /// is invalid configuration.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::Source { .. } => exit_codes::ERROR,
            _ => exit_codes::INVALID_CONFIG,
        }
    }
}

impl Diagnostics {
    /// Pretty print to a string.
    pub fn format(&self, options: &PrettyPrintOptions) -> String {
        let printer = ErrorPrinter::new(options, format_color(options.color));
        let mut buf = Vec::new();
        printer.print_diagnostics(self, &mut buf);
        String::from_utf8(buf).unwrap_or_default()
    }
}

/// Extension for command-line front ends.
pub trait ResolveExt<T> {
    /// Unwrap or pretty print the error and exit.
    ///
    /// ```ignore
    /// use build_block::{InputSource, RealEnv, ResolveExt, Resolver};
    ///
    /// let resolver = Resolver::with_defaults()?;
    /// let source = InputSource::from_path("build-block.json")?;
    /// let resolved = resolver.resolve_source(&source, &RealEnv).unwrap_or_exit();
    /// ```
    fn unwrap_or_exit(self) -> T;

    /// Unwrap or pretty print with custom options and exit.
    fn unwrap_or_exit_with(self, options: &PrettyPrintOptions) -> T;

    /// Pretty print on error but do not exit.
    fn unwrap_or_print(self) -> Result<T, ResolveError>;
}

impl<T> ResolveExt<T> for Result<T, ResolveError> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_exit_with(&PrettyPrintOptions::default())
    }

    fn unwrap_or_exit_with(self, options: &PrettyPrintOptions) -> T {
        match self {
            Ok(value) => value,
            Err(error) => {
                error.pretty_print(options);
                std::process::exit(error.exit_code());
            }
        }
    }

    fn unwrap_or_print(self) -> Result<T, ResolveError> {
        self.inspect_err(ResolveError::pretty_print_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::Section;
    use crate::value::Value;

    fn diagnostics() -> Diagnostics {
        Diagnostics::from_vec(vec![
            Diagnostic::new("core.namespace", "must be at least 5 characters", &Value::from("abc")),
            Diagnostic::new("core.title", "must be at least 5 characters", &Value::from("Tiny")),
            Diagnostic::new("npm.name", "must not be empty", &Value::from("")),
        ])
        .unwrap()
    }

    fn module_error() -> ResolveError {
        ResolveError::Module {
            section: Section::Core,
            diagnostics: diagnostics(),
        }
        .in_composite()
    }

    #[test]
    fn test_format_header_and_groups() {
        let output = module_error().format(&PrettyPrintOptions::no_color());
        assert!(output.contains("Configuration errors (3):"));
        assert!(output.contains("  core:\n"));
        assert!(output.contains("  npm:\n"));
        assert!(output.contains("• core.namespace: must be at least 5 characters"));
        assert!(output.contains("received: \"abc\""));
    }

    #[test]
    fn test_format_without_received() {
        let options = PrettyPrintOptions::no_color().with_received(false);
        let output = module_error().format(&options);
        assert!(!output.contains("received:"));
    }

    #[test]
    fn test_flat_output() {
        let options = PrettyPrintOptions::no_color().with_grouping(false);
        let output = diagnostics().format(&options);
        assert!(!output.contains("  core:\n"));
        assert!(output.contains("• npm.name: must not be empty"));
    }

    #[test]
    fn test_truncation() {
        let options = PrettyPrintOptions::no_color().with_max_errors(Some(1));
        let output = diagnostics().format(&options);
        assert!(output.contains("...and 2 more errors"));
        assert!(!output.contains("core.title"));

        let output = diagnostics().format(&PrettyPrintOptions::no_color().with_max_errors(None));
        assert!(!output.contains("more errors"));
    }

    #[test]
    fn test_format_plain_error() {
        let error = ResolveError::Normalize {
            reason: "expected an object, got number".into(),
        };
        let output = error.format(&PrettyPrintOptions::no_color());
        assert!(output.contains("Configuration error:"));
        assert!(output.contains("    Failed to normalize unknown input: expected an object, got number"));
    }

    #[test]
    fn test_color_option_always() {
        let output = diagnostics().format(&PrettyPrintOptions::default().with_color(ColorOption::Always));
        assert!(output.contains("\x1b["));
    }

    #[test]
    fn test_color_option_never() {
        let output = diagnostics().format(&PrettyPrintOptions::default().with_color(ColorOption::Never));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(module_error().exit_code(), exit_codes::INVALID_CONFIG);
        let source = ResolveError::Source {
            source_name: "build-block.json".into(),
            message: "file not found".into(),
        };
        assert_eq!(source.exit_code(), exit_codes::ERROR);
    }

    #[test]
    fn test_unwrap_or_print_passes_values_through() {
        let ok: Result<i32, ResolveError> = Ok(3);
        assert_eq!(ok.unwrap_or_print().unwrap(), 3);
    }
}
