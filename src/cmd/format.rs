/*!
format.rs

Output primitives for `composio-cli`.

  - JSON payloads go to stdout, pretty (2-space indent) by default or
    compact with `--raw`. Compact output only gets a trailing newline when
    stdout is not a terminal.
  - Errors go to stderr as `Error: <message>`, optionally followed by a
    hint line. Color is applied only when stderr is a terminal and
    NO_COLOR is unset.

Public API Summary:
  - render_json(value, raw, is_tty) -> String
  - print_json(value, raw)
  - StyleOptions::detect() -> StyleOptions
  - color(role, text, &StyleOptions) -> String
  - render_error(message, hint, &StyleOptions) -> String
  - report_error(message, hint)
*/

use std::io::{self, IsTerminal, Write};

use serde_json::Value;

/* -------------------------------------------------------------------------- */
/* JSON Output                                                                */
/* -------------------------------------------------------------------------- */

pub fn render_json(value: &Value, raw: bool, is_tty: bool) -> String {
    if raw {
        let mut out = value.to_string();
        if !is_tty {
            out.push('\n');
        }
        out
    } else {
        // serde_json's pretty printer indents with two spaces.
        let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        out.push('\n');
        out
    }
}

pub fn print_json(value: &Value, raw: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let rendered = render_json(value, raw, stdout.is_terminal());
    let mut lock = stdout.lock();
    lock.write_all(rendered.as_bytes())?;
    lock.flush()
}

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    /// Style for the error stream.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        StyleOptions {
            use_color: !no_color && io::stderr().is_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Error => "38;5;196", // red
        Role::Dim => "2",          // faint
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* -------------------------------------------------------------------------- */
/* Error Reporting                                                            */
/* -------------------------------------------------------------------------- */

/// `Error: <message>` plus an optional hint line, newline terminated.
pub fn render_error(message: &str, hint: Option<&str>, style: &StyleOptions) -> String {
    // Keep the error on a single line even when the platform's message isn't.
    let single_line = message
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let mut out = color(Role::Error, format!("Error: {single_line}"), style);
    out.push('\n');
    if let Some(h) = hint {
        out.push_str(&color(Role::Dim, h, style));
        out.push('\n');
    }
    out
}

pub fn report_error(message: &str, hint: Option<&str>) {
    let rendered = render_error(message, hint, &StyleOptions::detect());
    let _ = io::stderr().write_all(rendered.as_bytes());
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
