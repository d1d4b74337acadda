//! XLSX input
//!
//! Loads the active worksheet of a workbook into a [`Sheet`], keeping each
//! cell's value and style. Merged ranges of the input are not carried: the
//! pipeline rebuilds its own merges.

use std::path::Path;

use rosterkit_core::{
    Alignment, BorderLine, Borders, Cell, CellStyle, CellValue, ColIndex, Fill, Font,
    HorizontalAlign, Protection, Rgb, RowIndex, Sheet, VerticalAlign,
};
use tracing::{debug, info};
use umya_spreadsheet::Worksheet;

use crate::ReadError;

/// Read the active worksheet of an `.xlsx` file
pub fn read_workbook(path: &Path) -> Result<Sheet, ReadError> {
    if !path.exists() {
        return Err(ReadError::NotFound(path.display().to_string()));
    }
    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| ReadError::Workbook(format!("{}: {}", path.display(), e)))?;
    if book.get_sheet_collection().is_empty() {
        return Err(ReadError::NoWorksheet(path.display().to_string()));
    }
    let sheet = convert_worksheet(book.get_active_sheet());
    info!(
        path = %path.display(),
        rows = sheet.max_row(),
        columns = sheet.max_column(),
        "workbook loaded"
    );
    Ok(sheet)
}

fn convert_worksheet(ws: &Worksheet) -> Sheet {
    let (max_col, max_row) = ws.get_highest_column_and_row();
    let mut sheet = Sheet::new();

    for row in 1..=max_row {
        let mut cells: Vec<Cell> = Vec::new();
        for col in 1..=max_col {
            let Some(source) = ws.get_cell((col, row)) else {
                continue;
            };
            let cell = Cell {
                value: convert_value(
                    &source.get_value(),
                    &source.get_data_type().to_string(),
                ),
                style: convert_style(source.get_style()),
            };
            if cell == Cell::default() {
                continue;
            }
            let idx = (col - 1) as usize;
            if cells.len() <= idx {
                cells.resize_with(idx + 1, Cell::default);
            }
            cells[idx] = cell;
        }
        sheet.push_row(cells);

        if let Some(dimension) = ws.get_row_dimension(&row) {
            let height: f64 = dimension.get_height().clone();
            if height > 0.0 {
                sheet.set_row_height(row as RowIndex, height);
            }
        }
    }

    debug!(rows = max_row, columns = max_col as ColIndex, "worksheet converted");
    sheet
}

fn convert_value(raw: &str, data_type: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }
    match data_type {
        "n" => raw
            .parse::<f64>()
            .map(CellValue::Number)
            .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
        "b" => CellValue::Bool(raw == "1" || raw.eq_ignore_ascii_case("true")),
        _ => CellValue::Text(raw.to_string()),
    }
}

fn convert_style(style: &umya_spreadsheet::Style) -> CellStyle {
    let mut out = CellStyle::default();

    if let Some(font) = style.get_font() {
        let name = font.get_name().to_string();
        let size: f64 = *font.get_size();
        out.font = Font {
            name: (!name.is_empty()).then_some(name),
            size: (size > 0.0).then_some(size),
            bold: *font.get_bold(),
            italic: *font.get_italic(),
            underline: !matches!(font.get_underline().to_string().as_str(), "" | "none"),
            color: parse_argb(&font.get_color().get_argb().to_string()),
        };
    }

    if let Some(borders) = style.get_borders() {
        out.borders = Borders {
            left: border_line(&borders.get_left_border().get_border_style().to_string()),
            right: border_line(&borders.get_right_border().get_border_style().to_string()),
            top: border_line(&borders.get_top_border().get_border_style().to_string()),
            bottom: border_line(&borders.get_bottom_border().get_border_style().to_string()),
        };
    }

    if let Some(color) = style.get_background_color() {
        out.fill = Fill {
            background: parse_argb(&color.get_argb().to_string()),
        };
    }

    if let Some(format) = style.get_number_format() {
        let code = format.get_format_code().to_string();
        if !code.is_empty() && code != "General" {
            out.number_format = Some(code);
        }
    }

    if let Some(protection) = style.get_protection() {
        out.protection = Protection {
            locked: *protection.get_locked(),
            // `get_hidden` borrows mutably
            hidden: *protection.clone().get_hidden(),
        };
    }

    if let Some(alignment) = style.get_alignment() {
        out.alignment = Alignment {
            horizontal: horizontal(&format!("{:?}", alignment.get_horizontal())),
            vertical: vertical(&format!("{:?}", alignment.get_vertical())),
            wrap_text: *alignment.get_wrap_text(),
        };
    }

    out
}

/// `"FFRRGGBB"` or `"RRGGBB"` to an RGB value; theme colours come back empty
pub(crate) fn parse_argb(argb: &str) -> Option<Rgb> {
    let hex = match argb.len() {
        8 => &argb[2..],
        6 => argb,
        _ => return None,
    };
    u32::from_str_radix(hex, 16).ok()
}

pub(crate) fn border_line(name: &str) -> BorderLine {
    match name {
        "thin" => BorderLine::Thin,
        "medium" | "mediumDashed" | "mediumDashDot" | "mediumDashDotDot" => BorderLine::Medium,
        "thick" => BorderLine::Thick,
        "dashed" | "dashDot" | "dashDotDot" | "slantDashDot" => BorderLine::Dashed,
        "dotted" => BorderLine::Dotted,
        "double" => BorderLine::Double,
        "hair" => BorderLine::Hair,
        _ => BorderLine::None,
    }
}

pub(crate) fn horizontal(name: &str) -> HorizontalAlign {
    match name {
        "Left" => HorizontalAlign::Left,
        "Center" | "CenterContinuous" => HorizontalAlign::Center,
        "Right" => HorizontalAlign::Right,
        "Justify" | "Distributed" => HorizontalAlign::Justify,
        _ => HorizontalAlign::General,
    }
}

pub(crate) fn vertical(name: &str) -> VerticalAlign {
    match name {
        "Top" => VerticalAlign::Top,
        "Center" => VerticalAlign::Center,
        "Justify" | "Distributed" => VerticalAlign::Justify,
        _ => VerticalAlign::Bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_parsing() {
        assert_eq!(parse_argb("FF4472C4"), Some(0x4472C4));
        assert_eq!(parse_argb("DDEBF7"), Some(0xDDEBF7));
        assert_eq!(parse_argb(""), None);
        assert_eq!(parse_argb("ZZZZZZZZ"), None);
    }

    #[test]
    fn value_conversion() {
        assert_eq!(convert_value("", "s"), CellValue::Empty);
        assert_eq!(convert_value("8", "n"), CellValue::Number(8.0));
        assert_eq!(convert_value("abc", "n"), CellValue::Text("abc".into()));
        assert_eq!(convert_value("1", "b"), CellValue::Bool(true));
        assert_eq!(convert_value("Hor.", "s"), CellValue::Text("Hor.".into()));
    }

    #[test]
    fn style_names() {
        assert_eq!(border_line("thin"), BorderLine::Thin);
        assert_eq!(border_line("none"), BorderLine::None);
        assert_eq!(horizontal("Center"), HorizontalAlign::Center);
        assert_eq!(horizontal("General"), HorizontalAlign::General);
        assert_eq!(vertical("Center"), VerticalAlign::Center);
        assert_eq!(vertical("Bottom"), VerticalAlign::Bottom);
    }
}
