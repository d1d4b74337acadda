//! In-memory worksheet
//!
//! Rows and columns are 1-based, as they appear in a spreadsheet UI
//! (`A1` is row 1, column 1). Row storage is ragged: a row only holds as many
//! cells as its right-most written cell.

use std::collections::BTreeMap;
use std::fmt;

use crate::style::CellStyle;
use crate::SheetError;

/// 1-based row number
pub type RowIndex = u32;

/// 1-based column number
pub type ColIndex = u16;

/// Value held by a cell
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Text content, if the cell holds text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Empty, or text of length zero
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// A single cell: value plus its own style
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            style: CellStyle::default(),
        }
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }
}

/// Rectangular merged region (inclusive bounds)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeRange {
    pub first_row: RowIndex,
    pub first_col: ColIndex,
    pub last_row: RowIndex,
    pub last_col: ColIndex,
}

impl MergeRange {
    pub fn new(
        first_row: RowIndex,
        first_col: ColIndex,
        last_row: RowIndex,
        last_col: ColIndex,
    ) -> Self {
        Self {
            first_row,
            first_col,
            last_row,
            last_col,
        }
    }

    /// Vertical span of `height` rows in a single column
    pub fn vertical(first_row: RowIndex, col: ColIndex, height: u32) -> Self {
        Self::new(first_row, col, first_row + height.saturating_sub(1), col)
    }

    pub fn overlaps(&self, other: &MergeRange) -> bool {
        self.first_row <= other.last_row
            && other.first_row <= self.last_row
            && self.first_col <= other.last_col
            && other.first_col <= self.last_col
    }

    pub fn contains(&self, row: RowIndex, col: ColIndex) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }
}

impl fmt::Display for MergeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_letter(self.first_col),
            self.first_row,
            column_letter(self.last_col),
            self.last_row
        )
    }
}

/// Convert a 1-based column number to its letter name (1 → A, 27 → AA)
pub fn column_letter(col: ColIndex) -> String {
    let mut n = u32::from(col);
    let mut name = String::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        name.insert(0, (b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    name
}

static EMPTY: CellValue = CellValue::Empty;

/// A worksheet held entirely in memory
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
    row_heights: BTreeMap<RowIndex, f64>,
    column_widths: BTreeMap<ColIndex, f64>,
    merges: Vec<MergeRange>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet of unstyled values, one inner vector per row
    pub fn from_rows<I, R, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut sheet = Sheet::new();
        for row in rows {
            sheet.push_row(row.into_iter().map(Cell::new).collect());
        }
        sheet
    }

    /// Last row holding storage (0 for an empty sheet)
    pub fn max_row(&self) -> RowIndex {
        self.rows.len() as RowIndex
    }

    /// Right-most column holding storage in any row
    pub fn max_column(&self) -> ColIndex {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0) as ColIndex
    }

    pub fn get(&self, row: RowIndex, col: ColIndex) -> Option<&Cell> {
        let r = (row as usize).checked_sub(1)?;
        let c = (col as usize).checked_sub(1)?;
        self.rows.get(r)?.get(c)
    }

    /// Value at a position; missing cells read as [`CellValue::Empty`]
    pub fn value(&self, row: RowIndex, col: ColIndex) -> &CellValue {
        self.get(row, col).map(|c| &c.value).unwrap_or(&EMPTY)
    }

    /// Text at a position, if the cell holds text
    pub fn text(&self, row: RowIndex, col: ColIndex) -> Option<&str> {
        self.value(row, col).as_text()
    }

    /// Mutable access, growing the grid as needed
    pub fn cell_mut(&mut self, row: RowIndex, col: ColIndex) -> &mut Cell {
        debug_assert!(row >= 1 && col >= 1, "sheet coordinates are 1-based");
        let r = (row as usize).saturating_sub(1);
        let c = (col as usize).saturating_sub(1);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize_with(c + 1, Cell::default);
        }
        &mut cells[c]
    }

    pub fn set_value(&mut self, row: RowIndex, col: ColIndex, value: impl Into<CellValue>) {
        self.cell_mut(row, col).value = value.into();
    }

    /// Blank a cell's value, keeping its style
    pub fn clear_value(&mut self, row: RowIndex, col: ColIndex) {
        if self.get(row, col).is_some() {
            self.cell_mut(row, col).value = CellValue::Empty;
        }
    }

    pub fn set_style(&mut self, row: RowIndex, col: ColIndex, style: CellStyle) {
        self.cell_mut(row, col).style = style;
    }

    /// Cells of one row (empty slice past the end)
    pub fn row(&self, row: RowIndex) -> &[Cell] {
        (row as usize)
            .checked_sub(1)
            .and_then(|r| self.rows.get(r))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate `(row number, cells)` top to bottom
    pub fn rows(&self) -> impl Iterator<Item = (RowIndex, &[Cell])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, cells)| (i as RowIndex + 1, cells.as_slice()))
    }

    /// Append a row below the last one, returning its number
    pub fn push_row(&mut self, cells: Vec<Cell>) -> RowIndex {
        self.rows.push(cells);
        self.max_row()
    }

    /// Insert `amount` blank rows so that the first new row has number `at`.
    ///
    /// Existing rows from `at` downwards move down by `amount`, together with
    /// their heights and any merge anchored at or below `at`.
    pub fn insert_rows(&mut self, at: RowIndex, amount: u32) {
        if amount == 0 {
            return;
        }
        let idx = (at as usize).saturating_sub(1);
        if idx >= self.rows.len() {
            self.rows.resize_with(idx + amount as usize, Vec::new);
        } else {
            let blanks = std::iter::repeat_with(Vec::new).take(amount as usize);
            self.rows.splice(idx..idx, blanks);
        }

        self.row_heights = std::mem::take(&mut self.row_heights)
            .into_iter()
            .map(|(r, h)| if r >= at { (r + amount, h) } else { (r, h) })
            .collect();

        for merge in &mut self.merges {
            if merge.first_row >= at {
                merge.first_row += amount;
                merge.last_row += amount;
            } else if merge.last_row >= at {
                merge.last_row += amount;
            }
        }
    }

    pub fn set_row_height(&mut self, row: RowIndex, height: f64) {
        self.row_heights.insert(row, height);
    }

    pub fn row_height(&self, row: RowIndex) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    pub fn row_heights(&self) -> impl Iterator<Item = (RowIndex, f64)> + '_ {
        self.row_heights.iter().map(|(r, h)| (*r, *h))
    }

    pub fn set_column_width(&mut self, col: ColIndex, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_width(&self, col: ColIndex) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (ColIndex, f64)> + '_ {
        self.column_widths.iter().map(|(c, w)| (*c, *w))
    }

    /// Register a merged region.
    ///
    /// Single-cell ranges, inverted bounds and overlaps with an existing
    /// merge are rejected.
    pub fn merge(&mut self, range: MergeRange) -> Result<(), SheetError> {
        if range.first_row == 0
            || range.first_col == 0
            || range.last_row < range.first_row
            || range.last_col < range.first_col
            || (range.first_row == range.last_row && range.first_col == range.last_col)
        {
            return Err(SheetError::InvalidMerge(range.to_string()));
        }
        if let Some(existing) = self.merges.iter().find(|m| m.overlaps(&range)) {
            return Err(SheetError::MergeOverlap {
                range: range.to_string(),
                existing: existing.to_string(),
            });
        }
        self.merges.push(range);
        Ok(())
    }

    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }
}
