// Reading of the xls and xlsx county files.

use std::path::Path;

use calamine::{open_workbook_auto, DataType, Range, Reader, Sheets};
use log::debug;
use snafu::prelude::*;

use precinct_returns::{Cell, Grid, SheetRef, SheetSource};

use crate::convert::*;

/// An open workbook. The sheets are only read when they are requested, so that a
/// broken sheet which is never needed does not fail the county.
pub struct ExcelWorkbook {
    path: String,
    workbook: Sheets,
}

pub fn read_excel_file(path: &Path) -> ConvertResult<ExcelWorkbook> {
    let path_s = path.display().to_string();
    let workbook = open_workbook_auto(path).context(OpeningExcelSnafu {
        path: path_s.clone(),
    })?;
    debug!(
        "read_excel_file: {}: sheets {:?}",
        path_s,
        workbook.sheet_names()
    );
    Ok(ExcelWorkbook {
        path: path_s,
        workbook,
    })
}

fn resolve_sheet_name(sheet_names: &[String], sheet: &SheetRef) -> Option<String> {
    match sheet {
        SheetRef::Index(idx) => sheet_names.get(*idx).cloned(),
        SheetRef::Name(name) => sheet_names.iter().find(|n| *n == name).cloned(),
    }
}

impl SheetSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_owned()
    }

    fn load_sheet(
        &mut self,
        sheet: &SheetRef,
    ) -> Result<Grid, Box<dyn std::error::Error + Send + Sync>> {
        let name = match resolve_sheet_name(self.workbook.sheet_names(), sheet) {
            Some(n) => n,
            None => return Err(format!("no sheet {} in {}", sheet, self.path).into()),
        };
        match self.workbook.worksheet_range(&name) {
            Some(Ok(wrange)) => {
                debug!(
                    "load_sheet: sheet {:?}: start {:?} size {:?}",
                    name,
                    wrange.start(),
                    wrange.get_size()
                );
                Ok(range_to_grid(&wrange))
            }
            Some(Err(e)) => Err(format!("{}: sheet {}: {}", self.path, name, e).into()),
            None => {
                Err(format!("sheet {} is listed but missing in {}", name, self.path).into())
            }
        }
    }
}

// The range only covers the used cells: it is shifted back to A1 so that the
// first cell of the grid is the first cell of the sheet.
fn range_to_grid(wrange: &Range<DataType>) -> Grid {
    let (row_offset, col_offset) = match wrange.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Grid::default(),
    };
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in wrange.rows() {
        let mut cells: Vec<Cell> = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(read_cell));
        rows.push(cells);
    }
    Grid::new(rows)
}

fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Float(f) => Cell::Number(*f),
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Bool(b) => Cell::Text(b.to_string()),
        // Serial date numbers, as in the spreadsheet.
        DataType::DateTime(f) => Cell::Number(*f),
        DataType::Empty => Cell::Empty,
        other => Cell::Text(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_shifted_to_the_first_cell() {
        let mut wrange: Range<DataType> = Range::new((1, 1), (2, 2));
        wrange.set_value((1, 1), DataType::String("GOVERNOR".to_string()));
        wrange.set_value((2, 1), DataType::String("Smith".to_string()));
        wrange.set_value((2, 2), DataType::Float(12.0));
        let grid = range_to_grid(&wrange);
        assert_eq!(grid.num_rows(), 3);
        assert_eq!(grid.num_cols(), 3);
        assert_eq!(grid.first_cell(), Some(&Cell::Empty));
        assert_eq!(grid.get(1, 1), &Cell::text("GOVERNOR"));
        assert_eq!(grid.get(2, 2), &Cell::Number(12.0));
        assert_eq!(grid.get(1, 2), &Cell::Empty);
    }

    #[test]
    fn empty_range() {
        let wrange: Range<DataType> = Range::empty();
        assert!(range_to_grid(&wrange).is_empty());
    }

    #[test]
    fn cell_types() {
        assert_eq!(read_cell(&DataType::Int(3)), Cell::Number(3.0));
        assert_eq!(read_cell(&DataType::Bool(true)), Cell::text("true"));
        assert_eq!(read_cell(&DataType::Empty), Cell::Empty);
        assert_eq!(
            read_cell(&DataType::String(" Hall A ".to_string())),
            Cell::text(" Hall A ")
        );
    }

    #[test]
    fn sheets_by_index_or_name() {
        let names = vec!["Table of Contents".to_string(), "2".to_string()];
        assert_eq!(
            resolve_sheet_name(&names, &SheetRef::Index(1)),
            Some("2".to_string())
        );
        assert_eq!(
            resolve_sheet_name(&names, &SheetRef::Name("2".to_string())),
            Some("2".to_string())
        );
        assert_eq!(resolve_sheet_name(&names, &SheetRef::Index(2)), None);
        assert_eq!(
            resolve_sheet_name(&names, &SheetRef::Name("3".to_string())),
            None
        );
    }

    #[test]
    fn not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2016-General-Clay.xlsx");
        std::fs::write(&path, "not a spreadsheet").unwrap();
        assert!(matches!(
            read_excel_file(&path),
            Err(ConvertError::OpeningExcel { .. })
        ));
    }
}
