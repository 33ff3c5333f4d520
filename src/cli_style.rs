//! Terminal styling for the shell and the report views.

use crate::session::{AnalysisSession, SessionState};
use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

pub fn get_styles() -> Styles {
    let bold = |color: AnsiColor| Style::new().bold().fg_color(Some(Color::Ansi(color)));
    Styles::styled()
        .usage(bold(AnsiColor::Magenta).underline())
        .header(bold(AnsiColor::Magenta).underline())
        .literal(bold(AnsiColor::Yellow))
        .invalid(bold(AnsiColor::Red))
        .error(bold(AnsiColor::Red))
        .valid(bold(AnsiColor::Green))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

pub mod colors {
    use crossterm::style::Color;

    const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::Rgb { r, g, b }
    }

    pub const ROSE: Color = rgb(244, 63, 94);
    pub const AMBER: Color = rgb(245, 158, 11);
    pub const GREEN: Color = rgb(52, 211, 153);
    pub const RED: Color = rgb(239, 68, 68);
    pub const DIM: Color = rgb(168, 162, 158);
    pub const TEXT: Color = rgb(250, 250, 249);
}

use colors::{AMBER, DIM, GREEN, RED, ROSE, TEXT};

const SECTION_WIDTH: usize = 60;
/// Fits the longest report label, "Nivel natural detectado:".
const KEY_WIDTH: usize = 25;
const RULE: &str = "─";

// Status lines

fn print_status(glyph: &str, color: CtColor, message: &str) {
    println!(" {} {}", glyph.with(color).bold(), message.with(color));
}

pub fn print_success(message: &str) {
    print_status("✓", GREEN, message);
}

pub fn print_error(message: &str) {
    print_status("✗", RED, message);
}

pub fn print_warning(message: &str) {
    print_status("⚠", AMBER, message);
}

pub fn print_info(message: &str) {
    print_status("·", DIM, message);
}

// Report sections

/// "── Title ───...", padded to the section width.
fn section_rule(title: &str) -> String {
    let label = format!("{RULE}{RULE} {title} ");
    let fill = SECTION_WIDTH.saturating_sub(label.width());
    format!("{}{}", label, RULE.repeat(fill))
}

pub fn print_section_header(title: &str) {
    println!();
    println!("{}", section_rule(title).with(ROSE).bold());
}

pub fn print_section_footer() {
    println!("{}", RULE.repeat(SECTION_WIDTH).with(DIM));
    println!();
}

fn pad_to_width(text: &str, width: usize) -> String {
    format!("{}{}", text, " ".repeat(width.saturating_sub(text.width())))
}

pub fn print_key_value(key: &str, value: &str) {
    let label = pad_to_width(&format!("{key}:"), KEY_WIDTH);
    println!("  {} {}", label.with(DIM), value.with(TEXT));
}

pub fn print_key_value_highlight(key: &str, value: &str) {
    let label = pad_to_width(&format!("{key}:"), KEY_WIDTH);
    println!("  {} {}", label.with(AMBER).bold(), value.with(ROSE).bold());
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn print_paragraph(text: &str) {
    for line in wrap(text, SECTION_WIDTH - 2) {
        println!("  {}", line.with(TEXT));
    }
}

/// Secondary guidance, e.g. photo tips.
pub fn print_note(message: &str) {
    println!("  {}", message.with(DIM).attribute(Attribute::Italic));
}

/// A command the user can run next.
pub fn print_action(command: &str) {
    println!("  {}  {}", "▶".with(ROSE), command.with(TEXT));
}

/// A solid block painted in the given color.
pub fn swatch_block(r: u8, g: u8, b: u8, width: usize) -> String {
    "█".repeat(width).with(CtColor::Rgb { r, g, b }).to_string()
}

// Tables

/// Left-aligned columns sized to their widest cell.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: Vec<&str>) -> Self {
        TableBuilder {
            col_widths: headers.iter().map(|h| h.width()).collect(),
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<&str>) {
        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(row.into_iter().map(String::from).collect());
    }

    fn format_row(&self, cells: &[String]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&self.col_widths)
            .map(|(cell, width)| pad_to_width(cell, *width))
            .collect();
        padded.join("  ").trim_end().to_string()
    }

    pub fn print(&self) {
        let total = self.col_widths.iter().sum::<usize>() + 2 * self.col_widths.len().saturating_sub(1);
        println!("  {}", self.format_row(&self.headers).with(AMBER).bold());
        println!("  {}", RULE.repeat(total).with(DIM));
        for row in &self.rows {
            println!("  {}", self.format_row(row).with(TEXT));
        }
    }
}

// Shell

/// Plain text describing where the session is, e.g. "◐ analyzing #2".
pub fn state_label(state: &SessionState) -> String {
    match state {
        SessionState::Idle { error: None } => "○ idle".to_string(),
        SessionState::Idle { error: Some(_) } => "✗ idle".to_string(),
        SessionState::Analyzing { ticket, .. } => format!("◐ analyzing #{ticket}"),
        SessionState::Displaying { result, .. } => format!("● {}", result.season_id.as_str()),
    }
}

fn state_color(state: &SessionState) -> CtColor {
    match state {
        SessionState::Idle { error: None } => DIM,
        SessionState::Idle { error: Some(_) } => RED,
        SessionState::Analyzing { .. } => AMBER,
        SessionState::Displaying { .. } => GREEN,
    }
}

pub fn get_prompt(state: &SessionState) -> String {
    format!(
        "{} {} ",
        format!("[{}]", state_label(state)).with(state_color(state)),
        "❯".with(ROSE).bold(),
    )
}

pub fn print_welcome(session: &AnalysisSession) {
    let client = session.client();
    println!();
    println!(
        "  {}  {}",
        "ChromaVisage".with(ROSE).bold(),
        "Descubre tu ADN Cromático".with(AMBER)
    );
    print_key_value("Provider", client.provider_name());
    print_key_value("Model", client.model());
    print_key_value("API key", &client.credentials().describe());
    print_key_value("Session", &state_label(session.state()));
    print_note("Type 'help' for available commands");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Analysis,
    Seasons,
    System,
}

impl CommandGroup {
    const ALL: [CommandGroup; 3] = [
        CommandGroup::Analysis,
        CommandGroup::Seasons,
        CommandGroup::System,
    ];

    fn title(&self) -> &'static str {
        match self {
            CommandGroup::Analysis => "Analysis",
            CommandGroup::Seasons => "Seasons",
            CommandGroup::System => "System",
        }
    }
}

pub struct CommandHelp {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
    pub group: CommandGroup,
}

pub fn print_help(commands: &[CommandHelp]) {
    print_section_header("Available Commands");
    for group in CommandGroup::ALL {
        println!("  {}", group.title().with(AMBER).bold());
        for cmd in commands.iter().filter(|c| c.group == group) {
            let usage = pad_to_width(&format!("{} {}", cmd.name, cmd.args), 16);
            println!("    {}  {}", usage.with(GREEN), cmd.description.with(TEXT));
        }
    }
    print_section_footer();
}

pub fn print_goodbye() {
    println!("  {}", "Goodbye! Thanks for using ChromaVisage".with(ROSE).bold());
}

pub fn flush() {
    let _ = io::stdout().flush();
}
