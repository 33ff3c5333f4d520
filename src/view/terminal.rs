//! Terminal rendering of views.

use super::{Report, View, UPLOAD_HINT, UPLOAD_SUBTITLE, UPLOAD_TITLE};
use crate::cli_style::{self, colors, TableBuilder};
use crate::seasons::{self, ColorSwatch, SeasonEntry};
use crossterm::style::Stylize;

const SWATCH_WIDTH: usize = 6;

pub fn print_view(view: &View<'_>) {
    match view {
        View::UploadPrompt { error } => {
            cli_style::print_section_header(UPLOAD_TITLE);
            cli_style::print_note(UPLOAD_SUBTITLE);
            cli_style::print_action(UPLOAD_HINT);
            if let Some(error) = error {
                println!();
                cli_style::print_error(error);
            }
            cli_style::print_section_footer();
        }
        View::Loading { title, message } => {
            cli_style::print_section_header(title);
            cli_style::print_paragraph(message);
            cli_style::print_section_footer();
        }
        View::Report(report) => print_report(report),
    }
}

pub fn print_report(report: &Report<'_>) {
    let season = report.season;

    cli_style::print_section_header("Tu Estación Cromática");
    println!(
        "  {}  {}",
        season.display_name.with(colors::AMBER).bold(),
        season.id.as_str().with(colors::DIM)
    );
    cli_style::print_key_value("Confianza", &format!("{}%", report.confidence_percent));
    println!();
    cli_style::print_paragraph(report.reasoning);
    println!();
    cli_style::print_key_value("Matiz (Hue)", report.skin.hue.as_str());
    cli_style::print_key_value("Valor (Value)", report.skin.value.as_str());
    cli_style::print_key_value("Croma", report.skin.chroma.as_str());
    let [previous, next] = report.neighbors;
    cli_style::print_key_value(
        "Estaciones vecinas",
        &format!("{} · {}", previous.entry().display_name, next.entry().display_name),
    );
    cli_style::print_section_footer();

    cli_style::print_section_header("Tu Paleta Maestra");
    cli_style::print_paragraph(season.description);
    println!();
    print_palette(report.palette());
    cli_style::print_section_footer();

    let hair = report.hair;
    cli_style::print_section_header("Formulación Capilar");
    cli_style::print_key_value(
        "Nivel natural detectado",
        &format!("Nivel {}", hair.natural_level),
    );
    cli_style::print_key_value("Fondo de aclaración", &hair.undertone);
    let technical = match &report.reflects {
        Some(reflects) => format!(
            "{}  {} ({})",
            hair.technical_code, hair.recommended_formula, reflects
        ),
        None => format!("{}  {}", hair.technical_code, hair.recommended_formula),
    };
    cli_style::print_key_value_highlight("Recomendación técnica", &technical);
    cli_style::print_key_value("Revelador", &hair.developer_vol);
    if let Some(lift) = report.lift_levels.filter(|lift| *lift > 0) {
        cli_style::print_key_value("Niveles de aclarado", &lift.to_string());
    }
    println!();
    cli_style::print_paragraph(&format!("\"{}\"", hair.explanation));
    if let Some(warning) = &report.lift_warning {
        println!();
        cli_style::print_warning(warning);
    }
    cli_style::print_section_footer();
}

pub fn print_palette(palette: &[ColorSwatch]) {
    for swatch in palette {
        let block = match swatch.rgb() {
            Some((r, g, b)) => cli_style::swatch_block(r, g, b, SWATCH_WIDTH),
            None => " ".repeat(SWATCH_WIDTH),
        };
        println!(
            "  {}  {:<18} {}  {}",
            block,
            swatch.name,
            swatch.hex.with(colors::DIM),
            format!("{:?}", swatch.category).to_lowercase().with(colors::DIM)
        );
    }
}

pub fn print_season(entry: &SeasonEntry) {
    cli_style::print_section_header(entry.display_name);
    cli_style::print_key_value_highlight("Id", entry.id.as_str());
    cli_style::print_key_value("Subtono", entry.characteristics.undertone);
    cli_style::print_key_value("Contraste", entry.characteristics.contrast);
    cli_style::print_key_value("Croma", entry.characteristics.chroma);
    let (previous, next) = entry.id.neighbors();
    cli_style::print_key_value("Vecinas", &format!("{} · {}", previous, next));
    println!();
    cli_style::print_paragraph(entry.description);
    println!();
    print_palette(entry.palette);
    cli_style::print_section_footer();
}

/// All seasons in wheel order.
pub fn print_seasons_table() {
    let mut table = TableBuilder::new(vec!["Id", "Estación", "Subtono", "Contraste", "Croma"]);
    for entry in seasons::seasons() {
        table.add_row(vec![
            entry.id.as_str(),
            entry.display_name,
            entry.characteristics.undertone,
            entry.characteristics.contrast,
            entry.characteristics.chroma,
        ]);
    }
    table.print();
}
