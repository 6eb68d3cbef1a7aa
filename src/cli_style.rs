use agentic_rpg_client::model::GameState;
use agentic_rpg_client::render::snapshot_sections;
use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as TermColor, Stylize};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

pub fn get_styles() -> Styles {
    let gold = Some(Color::Ansi(AnsiColor::Yellow));
    Styles::styled()
        .usage(Style::new().bold().fg_color(gold))
        .header(Style::new().bold().underline().fg_color(gold))
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Magenta))))
        .error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .placeholder(Style::new().italic().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

/// Parchment and torchlight.
mod palette {
    use super::TermColor;

    pub const GOLD: TermColor = TermColor::Rgb { r: 255, g: 196, b: 0 };
    pub const EMBER: TermColor = TermColor::Rgb { r: 255, g: 120, b: 40 };
    pub const MOSS: TermColor = TermColor::Rgb { r: 120, g: 200, b: 90 };
    pub const SKY: TermColor = TermColor::Rgb { r: 90, g: 170, b: 255 };
    pub const BLOOD: TermColor = TermColor::Rgb { r: 220, g: 50, b: 50 };
    pub const ASH: TermColor = TermColor::Rgb { r: 120, g: 120, b: 130 };
    pub const PARCHMENT: TermColor = TermColor::Rgb { r: 240, g: 230, b: 210 };
}

// Double-line frame around world views
const FRAME_WIDTH: usize = 60;
const FRAME_TOP_LEFT: &str = "╔";
const FRAME_TOP_RIGHT: &str = "╗";
const FRAME_BOTTOM_LEFT: &str = "╚";
const FRAME_BOTTOM_RIGHT: &str = "╝";
const FRAME_EDGE: &str = "═";

const GLYPH_SECTION: &str = "❖";
const GLYPH_ENTRY: &str = "›";
const GLYPH_FIELD: &str = "•";
const GLYPH_NOTHING: &str = "·";

const BANNER: &str = r#"
     █████╗  ██████╗ ███████╗███╗   ██╗████████╗██╗ ██████╗    ██████╗ ██████╗  ██████╗
    ██╔══██╗██╔════╝ ██╔════╝████╗  ██║╚══██╔══╝██║██╔════╝    ██╔══██╗██╔══██╗██╔════╝
    ███████║██║  ███╗█████╗  ██╔██╗ ██║   ██║   ██║██║         ██████╔╝██████╔╝██║  ███╗
    ██╔══██║██║   ██║██╔══╝  ██║╚██╗██║   ██║   ██║██║         ██╔══██╗██╔═══╝ ██║   ██║
    ██║  ██║╚██████╔╝███████╗██║ ╚████║   ██║   ██║╚██████╗    ██║  ██║██║     ╚██████╔╝
    ╚═╝  ╚═╝ ╚═════╝ ╚══════╝╚═╝  ╚═══╝   ╚═╝   ╚═╝ ╚═════╝    ╚═╝  ╚═╝╚═╝      ╚═════╝
"#;

pub fn print_banner() {
    // Torchlight fades from gold at the top to ember at the bottom
    let shades = [palette::GOLD, palette::GOLD, palette::EMBER, palette::EMBER];
    for (row, text) in BANNER.lines().enumerate() {
        let shade = shades.get(row / 2).copied().unwrap_or(palette::BLOOD);
        println!("{}", text.with(shade).bold());
    }
    println!(
        "{}",
        format!(
            "    game client {} ({})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH")
        )
        .with(palette::ASH)
        .attribute(Attribute::Italic)
    );
    println!();
}

/// Kind of one-line status message.
#[derive(Clone, Copy)]
pub enum Tone {
    Success,
    Failure,
    Warning,
    Info,
}

impl Tone {
    fn glyph_and_color(self) -> (&'static str, TermColor) {
        match self {
            Tone::Success => ("✔", palette::MOSS),
            Tone::Failure => ("✘", palette::BLOOD),
            Tone::Warning => ("!", palette::EMBER),
            Tone::Info => ("~", palette::SKY),
        }
    }
}

pub fn say(tone: Tone, message: &str) {
    let (glyph, color) = tone.glyph_and_color();
    println!(" {} {}", glyph.with(color).bold(), message.with(color));
}

fn frame_top(title: &str) {
    let fill = FRAME_WIDTH.saturating_sub(title.width() + 2);
    let left = fill / 2;
    println!(
        "\n{}{} {} {}{}",
        FRAME_TOP_LEFT.with(palette::GOLD),
        FRAME_EDGE.repeat(left).with(palette::GOLD),
        title.with(palette::GOLD).bold(),
        FRAME_EDGE.repeat(fill - left).with(palette::GOLD),
        FRAME_TOP_RIGHT.with(palette::GOLD),
    );
}

fn frame_bottom() {
    println!(
        "{}{}{}\n",
        FRAME_BOTTOM_LEFT.with(palette::GOLD),
        FRAME_EDGE.repeat(FRAME_WIDTH).with(palette::GOLD),
        FRAME_BOTTOM_RIGHT.with(palette::GOLD),
    );
}

fn section_title(title: &str, color: TermColor) {
    println!("  {} {}", GLYPH_SECTION.with(color), title.with(color).bold());
}

fn entry(text: &str) {
    println!("    {} {}", GLYPH_ENTRY.with(palette::GOLD), text.with(palette::PARCHMENT));
}

/// A framed block of `label: value` rows.
pub fn print_fields(title: &str, fields: &[(&str, String)]) {
    frame_top(title);
    let label_width = fields.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
    for (label, value) in fields {
        println!(
            "  {} {}  {}",
            GLYPH_FIELD.with(palette::EMBER),
            format!("{:<width$}", label, width = label_width).with(palette::ASH),
            value.as_str().with(palette::PARCHMENT),
        );
    }
    frame_bottom();
}

pub fn print_snapshot(state: &GameState, log_lines: usize) {
    frame_top("The World");
    for section in snapshot_sections(state, log_lines) {
        section_title(&section.title, palette::EMBER);
        if section.lines.is_empty() {
            println!(
                "    {} {}",
                GLYPH_NOTHING.with(palette::ASH),
                "nothing here".with(palette::ASH).attribute(Attribute::Italic)
            );
        }
        for line in &section.lines {
            entry(line);
        }
    }
    frame_bottom();
    flush();
}

pub struct CommandHelp {
    pub name: String,
    pub args: String,
    pub description: String,
}

pub fn print_help(commands: &[CommandHelp]) {
    frame_top("Commands");

    section_title("Actions, sent to the game server", palette::SKY);
    println!(
        "    {} {}  {}",
        "<action>".with(palette::MOSS).bold(),
        "[args...]".with(palette::ASH),
        "e.g. move north, say \"well met\"".with(palette::PARCHMENT)
    );

    section_title("Client commands", palette::EMBER);
    for cmd in commands {
        let usage = if cmd.args.is_empty() {
            format!("/{}", cmd.name)
        } else {
            format!("/{} {}", cmd.name, cmd.args)
        };
        println!(
            "    {}  {}",
            format!("{:<22}", usage).with(palette::MOSS).bold(),
            cmd.description.as_str().with(palette::PARCHMENT)
        );
    }

    frame_bottom();
}

pub fn print_goodbye() {
    println!(
        "\n  {} {}\n",
        "⚔".with(palette::GOLD),
        "Farewell, adventurer.".with(palette::EMBER).bold()
    );
}

pub fn flush() {
    let _ = io::stdout().flush();
}
