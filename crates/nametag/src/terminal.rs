//! Terminal messenger and `&` colour-code rendering.
//!
//! `&0`-`&f` pick a colour, `&l`/`&m`/`&n`/`&o` add an effect, `&r` resets
//! and `&k` is dropped. A colour code clears active effects.

use owo_colors::{OwoColorize, Style};

use nametag_core::{CommandSender, Messenger};

const MARKER: char = '&';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Format {
    colour: Option<char>,
    bold: bool,
    strikethrough: bool,
    underline: bool,
    italic: bool,
}

impl Format {
    /// Apply one code, or return `None` when `code` is not a format code.
    fn apply(self, code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        let next = match code {
            '0'..='9' | 'a'..='f' => Self {
                colour: Some(code),
                ..Self::default()
            },
            'k' => self,
            'l' => Self { bold: true, ..self },
            'm' => Self {
                strikethrough: true,
                ..self
            },
            'n' => Self {
                underline: true,
                ..self
            },
            'o' => Self {
                italic: true,
                ..self
            },
            'r' => Self::default(),
            _ => return None,
        };
        Some(next)
    }

    fn style(self) -> Style {
        let mut style = match self.colour {
            Some('0') => Style::new().black(),
            Some('1') => Style::new().blue(),
            Some('2') => Style::new().green(),
            Some('3') => Style::new().cyan(),
            Some('4') => Style::new().red(),
            Some('5') => Style::new().magenta(),
            Some('6') => Style::new().yellow(),
            Some('7') => Style::new().white(),
            Some('8') => Style::new().bright_black(),
            Some('9') => Style::new().bright_blue(),
            Some('a') => Style::new().bright_green(),
            Some('b') => Style::new().bright_cyan(),
            Some('c') => Style::new().bright_red(),
            Some('d') => Style::new().bright_magenta(),
            Some('e') => Style::new().bright_yellow(),
            Some('f') => Style::new().bright_white(),
            _ => Style::new(),
        };
        if self.bold {
            style = style.bold();
        }
        if self.strikethrough {
            style = style.strikethrough();
        }
        if self.underline {
            style = style.underline();
        }
        if self.italic {
            style = style.italic();
        }
        style
    }
}

/// Split `text` into runs of uniformly formatted text.
fn segments(text: &str) -> Vec<(Format, String)> {
    let mut out = Vec::new();
    let mut format = Format::default();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == MARKER {
            if let Some(next) = chars.peek().and_then(|&code| format.apply(code)) {
                chars.next();
                if !current.is_empty() {
                    out.push((format, std::mem::take(&mut current)));
                }
                format = next;
                continue;
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push((format, current));
    }
    out
}

/// Remove every format code.
pub fn strip(text: &str) -> String {
    segments(text).into_iter().map(|(_, s)| s).collect()
}

/// Render format codes as ANSI escapes when `color`, else strip them.
pub fn render(text: &str, color: bool) -> String {
    if !color {
        return strip(text);
    }
    segments(text)
        .into_iter()
        .map(|(format, s)| s.style(format.style()).to_string())
        .collect()
}

// ── Messenger ────────────────────────────────────────────────────────

/// Prints every message to stdout unless quiet. Player-bound lines are
/// addressed as `@name: text`.
#[derive(Debug, Clone)]
pub struct TerminalMessenger {
    color: bool,
    quiet: bool,
}

impl TerminalMessenger {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    pub fn line(&self, to: &CommandSender, text: &str) -> String {
        let body = render(text, self.color);
        match to {
            CommandSender::Console => body,
            CommandSender::Player(p) => {
                let addressee = format!("@{}:", p.name());
                if self.color {
                    format!("{} {body}", addressee.bold())
                } else {
                    format!("{addressee} {body}")
                }
            }
        }
    }
}

impl Messenger for TerminalMessenger {
    fn send(&self, to: &CommandSender, text: &str) {
        if !self.quiet {
            println!("{}", self.line(to, text));
        }
    }
}
