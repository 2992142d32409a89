use crate::config::{Cell, Grid};

/// Cleans a grid as read from a file.
///
/// Text cells are trimmed, empty text becomes an empty cell, and rows that
/// only contain empty cells are removed. The order of the remaining rows and
/// the column positions are preserved.
pub fn sanitize(grid: &Grid) -> Grid {
    let rows: Vec<Vec<Cell>> = grid
        .rows()
        .iter()
        .map(|row| row.iter().map(sanitize_cell).collect::<Vec<Cell>>())
        .filter(|row| !row.iter().all(|c| c.is_empty()))
        .collect();
    Grid::new(rows)
}

fn sanitize_cell(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(trimmed.to_string())
            }
        }
        c => c.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    #[test]
    fn trims_and_drops_blank_rows() {
        let g = Grid::new(vec![
            vec![t("  Contest Title "), t("Party")],
            vec![t("   "), Cell::Empty],
            vec![t("President"), Cell::Number(3.0)],
        ]);
        let s = sanitize(&g);
        assert_eq!(
            s,
            Grid::new(vec![
                vec![t("Contest Title"), t("Party")],
                vec![t("President"), Cell::Number(3.0)],
            ])
        );
    }

    #[test]
    fn empty_grid() {
        assert!(sanitize(&Grid::default()).is_empty());
        let blank = Grid::new(vec![vec![t(""), Cell::Empty], vec![t(" ")]]);
        assert!(sanitize(&blank).is_empty());
    }

    fn cell_strategy() -> impl Strategy<Value = Cell> {
        prop_oneof![
            Just(Cell::Empty),
            "[ a-z]{0,6}".prop_map(Cell::Text),
            (0u32..1000).prop_map(|n| Cell::Number(n as f64)),
        ]
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(
            rows in prop::collection::vec(prop::collection::vec(cell_strategy(), 0..5), 0..8)
        ) {
            let once = sanitize(&Grid::new(rows));
            let twice = sanitize(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
