use colored::Colorize;
use std::env;
use std::fmt;

/// Message categories used by the report output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
    Detail,
}

/// `NO_COLOR` set to any non-empty value disables styling.
pub fn colors_enabled() -> bool {
    env::var_os("NO_COLOR").map_or(true, |value| value.is_empty())
}

fn label(kind: MessageKind) -> Option<&'static str> {
    match kind {
        MessageKind::Info => Some("INFO"),
        MessageKind::Success => Some("OK"),
        MessageKind::Warning => Some("WARNING"),
        MessageKind::Error => Some("ERROR"),
        MessageKind::Section | MessageKind::Detail => None,
    }
}

pub fn style(kind: MessageKind, message: impl fmt::Display, use_color: bool) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Detail => format!("  {text}"),
        _ => match label(kind) {
            Some(label) => format!("{label}: {text}"),
            None => text,
        },
    };

    if !use_color {
        return formatted;
    }
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info | MessageKind::Detail => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = style(kind, message, colors_enabled());
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

/// Prints `message` without a label, coloured like `tone`.
pub fn headline(tone: MessageKind, message: impl fmt::Display) {
    let text = message.to_string();
    if !colors_enabled() {
        println!("{text}");
        return;
    }
    let styled = match tone {
        MessageKind::Success => text.bright_green().bold(),
        MessageKind::Warning => text.bright_yellow().bold(),
        MessageKind::Error => text.bright_red().bold(),
        _ => text.bold(),
    };
    println!("{styled}");
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Aligned `label : value` row.
pub fn field(label: &str, value: impl fmt::Display) {
    print(MessageKind::Detail, format!("{label:<18}: {value}"));
}

pub fn detail(message: impl fmt::Display) {
    print(MessageKind::Detail, message);
}
