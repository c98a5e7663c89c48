use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

pub fn current_output_style() -> OutputStyle {
    if std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub fn status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => format!("[{status}] {message}"),
        OutputStyle::Rich => format!(
            "{} {message}",
            colorize(status_style(status), &format!("[{status}]"))
        ),
    }
}

pub fn resolution_progress(style: OutputStyle, total: u64) -> Option<ProgressBar> {
    if style != OutputStyle::Rich || total == 0 {
        return None;
    }

    let progress_bar = ProgressBar::new(total);
    if let Ok(template) = ProgressStyle::with_template(
        "{spinner:.cyan.bold} {msg:<12} [{bar:20.cyan/blue}] {pos:>3}/{len:3}",
    ) {
        progress_bar.set_style(template.progress_chars("=>-"));
    }
    progress_bar.set_message("resolve");
    Some(progress_bar)
}

fn status_style(status: &str) -> Style {
    let color = match status {
        "warn" => AnsiColor::Yellow,
        "done" => AnsiColor::Green,
        _ => AnsiColor::BrightBlue,
    };
    Style::new().fg_color(Some(color.into())).effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
