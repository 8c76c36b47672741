// tests/binary_matrix.rs

use std::collections::HashSet;
use std::error::Error;

use dagpipe::dag::{BinaryMatrix, Cursor};
use dagpipe::errors::DagpipeError;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn test_dimensions_must_be_positive() {
    for (rows, columns) in [(0, 1), (1, 0), (0, 0)] {
        match BinaryMatrix::new(rows, columns) {
            Err(DagpipeError::InvalidDimensions { rows: r, columns: c }) => {
                assert_eq!((r, c), (rows, columns));
            }
            other => panic!("expected InvalidDimensions for {rows}x{columns}, got {other:?}"),
        }
    }
}

#[test]
fn test_is_square_matches_dimensions() -> TestResult {
    for rows in 1..5 {
        for columns in 1..5 {
            let m = BinaryMatrix::new(rows, columns)?;
            assert_eq!(m.rows(), rows);
            assert_eq!(m.columns(), columns);
            assert_eq!(m.is_square(), rows == columns);
            assert!(m.is_empty());
        }
    }
    Ok(())
}

#[test]
fn test_set_and_unset_round_trip() -> TestResult {
    // 9x9 spans more than one 64-bit word.
    let mut m = BinaryMatrix::new(9, 9)?;
    for r in 0..9 {
        for c in 0..9 {
            assert!(!m.is_set(r, c)?);
            m.set(r, c)?;
            assert!(m.is_set(r, c)?);
            m.unset(r, c)?;
            assert!(!m.is_set(r, c)?);
        }
    }

    m.set_value(8, 7, true)?;
    assert!(m.is_set(8, 7)?);
    assert!(!m.is_empty());
    m.set_value(8, 7, false)?;
    assert!(m.is_empty());
    Ok(())
}

#[test]
fn test_set_only_touches_one_cell() -> TestResult {
    let mut m = BinaryMatrix::new(3, 4)?;
    m.set(1, 2)?;

    for r in 0..3 {
        for c in 0..4 {
            assert_eq!(m.is_set(r, c)?, (r, c) == (1, 2), "cell ({r}, {c})");
        }
    }
    Ok(())
}

#[test]
fn test_out_of_range_fails_for_every_accessor() -> TestResult {
    let mut m = BinaryMatrix::new(2, 3)?;

    assert!(matches!(
        m.is_set(2, 0),
        Err(DagpipeError::IndexOutOfBounds { axis: "row", index: 2, size: 2 })
    ));
    assert!(matches!(
        m.is_set(0, 3),
        Err(DagpipeError::IndexOutOfBounds { axis: "column", index: 3, size: 3 })
    ));
    assert!(m.set(5, 0).is_err());
    assert!(m.set_value(0, 9, true).is_err());
    assert!(m.unset(2, 3).is_err());
    assert!(m.row_iter(2).is_err());
    assert!(m.column_iter(3).is_err());

    // Failed writes leave the matrix untouched.
    assert!(m.is_empty());
    Ok(())
}

#[test]
fn test_row_iter_walks_columns_in_order() -> TestResult {
    let mut m = BinaryMatrix::new(2, 4)?;
    m.set(1, 1)?;
    m.set(1, 3)?;

    let row = m.row_iter(1)?;
    assert_eq!(row.len(), 4);

    let cells: Vec<Cursor> = row.collect();
    let expected: Vec<Cursor> = (0..4)
        .map(|column| Cursor {
            row: 1,
            column,
            value: column == 1 || column == 3,
        })
        .collect();
    assert_eq!(cells, expected);
    Ok(())
}

#[test]
fn test_column_iter_walks_rows_in_order() -> TestResult {
    let mut m = BinaryMatrix::new(3, 2)?;
    m.set(0, 1)?;
    m.set(2, 1)?;

    let values: Vec<(usize, bool)> = m.column_iter(1)?.map(|c| (c.row, c.value)).collect();
    assert_eq!(values, vec![(0, true), (1, false), (2, true)]);

    let mut column = m.column_iter(0)?;
    assert_eq!(column.len(), 3);
    column.next();
    assert_eq!(column.len(), 2);
    Ok(())
}

#[test]
fn test_equality_and_hash_cover_dimensions_and_bits() -> TestResult {
    let mut a = BinaryMatrix::new(2, 2)?;
    let mut b = BinaryMatrix::new(2, 2)?;
    assert_eq!(a, b);

    a.set(0, 1)?;
    assert_ne!(a, b);
    b.set(0, 1)?;
    assert_eq!(a, b);

    // Same bit count, different shape.
    assert_ne!(BinaryMatrix::new(1, 4)?, BinaryMatrix::new(4, 1)?);

    let set: HashSet<BinaryMatrix> = [a.clone(), b, BinaryMatrix::new(2, 2)?].into_iter().collect();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&a));
    Ok(())
}
