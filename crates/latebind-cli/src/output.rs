//! Colored terminal output for CLI commands.
//!
//! Respects the `NO_COLOR` environment variable and the `--color` flag.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Styled stdout writer.
pub struct StyledOutput {
    stdout: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
        }
    }

    fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&spec);
        let _ = writeln!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }

    /// Green bold text.
    pub fn success(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Green), true);
    }

    /// Cyan section heading.
    pub fn heading(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Cyan), true);
    }

    /// Dim label followed by a plain value.
    pub fn field(&mut self, label: &str, value: &str) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::White)).set_dimmed(true);
        let _ = self.stdout.set_color(&spec);
        let _ = write!(self.stdout, "{:<14}", label);
        let _ = self.stdout.reset();
        let _ = writeln!(self.stdout, "{}", value);
    }

    /// Plain line.
    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{}", text);
    }

    pub fn newline(&mut self) {
        let _ = writeln!(self.stdout);
    }
}
