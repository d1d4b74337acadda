//! XLSX planning writer
//!
//! Serializes a [`Sheet`] into a single-sheet workbook: values, per-cell
//! styles, row heights, column widths and merged ranges.

use rosterkit_core::{
    BorderLine, CellStyle, CellValue, HorizontalAlign, RenderError, Sheet, SheetWriter,
    VerticalAlign,
};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatUnderline, Workbook, Worksheet};
use tracing::debug;

/// Sheet to `.xlsx` bytes
#[derive(Clone, Debug)]
pub struct XlsxWriter {
    /// Name of the single worksheet
    pub sheet_name: String,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self {
            sheet_name: "Planning".into(),
        }
    }
}

impl XlsxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    fn write_cells(&self, ws: &mut Worksheet, sheet: &Sheet) -> Result<(), RenderError> {
        for (row, cells) in sheet.rows() {
            for (idx, cell) in cells.iter().enumerate() {
                let (r, c) = (row - 1, idx as u16);
                if cell.value.is_empty() && cell.style.is_default() {
                    continue;
                }
                let format = format_for(&cell.style);
                match &cell.value {
                    CellValue::Empty => ws.write_blank(r, c, &format),
                    CellValue::Text(s) if s.is_empty() => ws.write_blank(r, c, &format),
                    CellValue::Text(s) => ws.write_string_with_format(r, c, s, &format),
                    CellValue::Number(n) => ws.write_number_with_format(r, c, *n, &format),
                    CellValue::Bool(b) => ws.write_boolean_with_format(r, c, *b, &format),
                }
                .map_err(|e| RenderError::Format(e.to_string()))?;
            }
        }
        Ok(())
    }

    fn write_layout(&self, ws: &mut Worksheet, sheet: &Sheet) -> Result<(), RenderError> {
        for (row, height) in sheet.row_heights() {
            ws.set_row_height(row - 1, height)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }
        for (col, width) in sheet.column_widths() {
            ws.set_column_width(col - 1, width)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }
        Ok(())
    }

    fn write_merges(&self, ws: &mut Worksheet, sheet: &Sheet) -> Result<(), RenderError> {
        for range in sheet.merges() {
            let anchor = sheet.get(range.first_row, range.first_col);
            let value = anchor.map(|c| c.value.to_string()).unwrap_or_default();
            let format = anchor.map_or_else(Format::new, |c| format_for(&c.style));
            ws.merge_range(
                range.first_row - 1,
                range.first_col - 1,
                range.last_row - 1,
                range.last_col - 1,
                &value,
                &format,
            )
            .map_err(|e| RenderError::Format(format!("merge {}: {}", range, e)))?;
        }
        Ok(())
    }
}

impl SheetWriter for XlsxWriter {
    type Output = Vec<u8>;

    fn write(&self, sheet: &Sheet) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name(&self.sheet_name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        self.write_cells(ws, sheet)?;
        self.write_layout(ws, sheet)?;
        self.write_merges(ws, sheet)?;

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;
        debug!(
            rows = sheet.max_row(),
            merges = sheet.merges().len(),
            bytes = buffer.len(),
            "workbook rendered"
        );
        Ok(buffer)
    }
}

/// Translate a cell style into an xlsx format
pub fn format_for(style: &CellStyle) -> Format {
    let mut format = Format::new();

    let font = &style.font;
    if let Some(name) = &font.name {
        format = format.set_font_name(name);
    }
    if let Some(size) = font.size {
        format = format.set_font_size(size);
    }
    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    if font.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if let Some(color) = font.color {
        format = format.set_font_color(color);
    }

    let b = &style.borders;
    format = format
        .set_border_left(border(b.left))
        .set_border_right(border(b.right))
        .set_border_top(border(b.top))
        .set_border_bottom(border(b.bottom));

    if let Some(color) = style.fill.background {
        format = format.set_background_color(color);
    }
    if let Some(code) = &style.number_format {
        format = format.set_num_format(code);
    }

    if !style.protection.locked {
        format = format.set_unlocked();
    }
    if style.protection.hidden {
        format = format.set_hidden();
    }

    let a = &style.alignment;
    match a.horizontal {
        HorizontalAlign::General => {}
        HorizontalAlign::Left => format = format.set_align(FormatAlign::Left),
        HorizontalAlign::Center => format = format.set_align(FormatAlign::Center),
        HorizontalAlign::Right => format = format.set_align(FormatAlign::Right),
        HorizontalAlign::Justify => format = format.set_align(FormatAlign::Justify),
    }
    match a.vertical {
        VerticalAlign::Bottom => {}
        VerticalAlign::Top => format = format.set_align(FormatAlign::Top),
        VerticalAlign::Center => format = format.set_align(FormatAlign::VerticalCenter),
        VerticalAlign::Justify => format = format.set_align(FormatAlign::VerticalJustify),
    }
    if a.wrap_text {
        format = format.set_text_wrap();
    }

    format
}

fn border(line: BorderLine) -> FormatBorder {
    match line {
        BorderLine::None => FormatBorder::None,
        BorderLine::Thin => FormatBorder::Thin,
        BorderLine::Medium => FormatBorder::Medium,
        BorderLine::Thick => FormatBorder::Thick,
        BorderLine::Dashed => FormatBorder::Dashed,
        BorderLine::Dotted => FormatBorder::Dotted,
        BorderLine::Double => FormatBorder::Double,
        BorderLine::Hair => FormatBorder::Hair,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterkit_core::{Alignment, Font, MergeRange};

    #[test]
    fn output_is_a_zip() {
        let sheet = Sheet::from_rows([vec!["DUPONT\nMarie", "", "", "Hor.", "8h -\n12h"]]);
        let bytes = XlsxWriter::new().write(&sheet).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_sheet_renders() {
        let bytes = XlsxWriter::new().write(&Sheet::new()).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn merged_blocks_render() {
        let mut sheet = Sheet::new();
        for row in 1..=5 {
            sheet.set_value(row, 4, "x");
        }
        sheet.set_value(1, 1, "DUPONT\nMarie");
        sheet.set_style(1, 1, CellStyle::default().with_alignment(Alignment::middle()));
        for col in 1..=3 {
            sheet.merge(MergeRange::vertical(1, col, 5)).unwrap();
        }
        sheet.set_row_height(1, 80.0);
        sheet.set_column_width(1, 50.0);
        assert!(XlsxWriter::new().write(&sheet).is_ok());
    }

    #[test]
    fn invalid_sheet_name_is_an_error() {
        let writer = XlsxWriter::new().sheet_name("bad/name");
        let err = writer.write(&Sheet::new()).unwrap_err();
        assert!(matches!(err, RenderError::Format(_)));
    }

    #[test]
    fn styled_format_builds() {
        let style = CellStyle::default()
            .with_font(Font {
                bold: true,
                underline: true,
                color: Some(0xFF0000),
                ..Font::new("Segoe UI", 8.0)
            })
            .with_alignment(Alignment::wrapped_centered());
        let mut sheet = Sheet::new();
        sheet.set_value(1, 1, "MARTIN");
        sheet.set_style(1, 1, style);
        sheet.set_value(2, 1, 8.5);
        sheet.set_value(3, 1, true);
        assert!(XlsxWriter::new().write(&sheet).is_ok());
    }
}
