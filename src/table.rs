use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A labelled 2-D table of `f64` values.
///
/// Rows are addressed by the `index` labels and columns by the `columns`
/// labels. Cells are stored row-major, so `cells[r][c]` is the value at
/// `index[r]`, `columns[c]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableFile", into = "TableFile")]
pub struct Table {
    index_name: String,
    columns_name: Option<String>,
    index: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<f64>>,
}

/// On-disk layout of a [`Table`]. Columns are kept as a list so their
/// declared order survives a JSON round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableFile {
    index_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    columns_name: Option<String>,
    index: Vec<String>,
    columns: Vec<ColumnFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColumnFile {
    name: String,
    values: Vec<f64>,
}

impl Table {
    /// Build a table from named value columns, using `index` as the row
    /// labels. Every column must have exactly one value per index label.
    pub fn from_columns(
        index_name: impl Into<String>,
        index: Vec<String>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, ChartError> {
        if index.is_empty() || columns.is_empty() {
            return Err(ChartError::EmptyTable);
        }
        check_unique(&index)?;

        let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
        check_unique(&names)?;

        for (name, values) in &columns {
            if values.len() != index.len() {
                return Err(ChartError::ShapeMismatch {
                    column: name.clone(),
                    expected: index.len(),
                    actual: values.len(),
                });
            }
        }

        let cells = (0..index.len())
            .map(|r| columns.iter().map(|(_, values)| values[r]).collect())
            .collect();

        Ok(Self {
            index_name: index_name.into(),
            columns_name: None,
            index,
            columns: names,
            cells,
        })
    }

    /// Name the column axis.
    pub fn with_columns_name(mut self, name: impl Into<String>) -> Self {
        self.columns_name = Some(name.into());
        self
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns_name(&self) -> Option<&str> {
        self.columns_name.as_deref()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.index.iter().position(|l| l == row)?;
        let c = self.columns.iter().position(|l| l == column)?;
        Some(self.cells[r][c])
    }

    pub fn row(&self, label: &str) -> Option<&[f64]> {
        let r = self.index.iter().position(|l| l == label)?;
        Some(&self.cells[r])
    }

    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let c = self.columns.iter().position(|l| l == label)?;
        Some(self.cells.iter().map(|row| row[c]).collect())
    }

    /// Iterate rows in index order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.index
            .iter()
            .zip(self.cells.iter())
            .map(|(label, row)| (label.as_str(), row.as_slice()))
    }

    /// Swap rows and columns. The index name and column-axis name swap too;
    /// a table whose columns are unnamed gets an empty index name.
    pub fn transpose(&self) -> Self {
        let cells = (0..self.columns.len())
            .map(|c| self.cells.iter().map(|row| row[c]).collect())
            .collect();

        Self {
            index_name: self.columns_name.clone().unwrap_or_default(),
            columns_name: Some(self.index_name.clone()),
            index: self.columns.clone(),
            columns: self.index.clone(),
            cells,
        }
    }
}

fn check_unique(labels: &[String]) -> Result<(), ChartError> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(ChartError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}

impl TryFrom<TableFile> for Table {
    type Error = ChartError;

    fn try_from(file: TableFile) -> Result<Self, Self::Error> {
        let columns = file
            .columns
            .into_iter()
            .map(|c| (c.name, c.values))
            .collect();
        let table = Table::from_columns(file.index_name, file.index, columns)?;
        Ok(match file.columns_name {
            Some(name) => table.with_columns_name(name),
            None => table,
        })
    }
}

impl From<Table> for TableFile {
    fn from(table: Table) -> Self {
        let columns = table
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| ColumnFile {
                name: name.clone(),
                values: table.cells.iter().map(|row| row[c]).collect(),
            })
            .collect();

        TableFile {
            index_name: table.index_name,
            columns_name: table.columns_name,
            index: table.index,
            columns,
        }
    }
}

/// Print a table to the console, one line per row, with the row mean in the
/// last column.
pub fn print_table(table: &Table) {
    println!("\n{:=<80}", "");
    println!("{}", table.index_name());
    println!("{:=<80}\n", "");

    print!("  {:>12}", "");
    for column in table.columns() {
        print!(" {:>11}", column);
    }
    println!(" {:>8}", "Mean");
    println!("  {:-<78}", "");

    for (label, values) in table.rows() {
        print!("  {:>12}", label);
        for value in values {
            print!(" {:>11.2}", value);
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        println!(" {:>8.2}", mean);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec as prop_vec;
    use proptest::prelude::*;

    fn labels(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    fn small_table() -> Table {
        Table::from_columns(
            "version",
            labels("v", 2),
            vec![
                ("a".to_string(), vec![1.0, 2.0]),
                ("b".to_string(), vec![3.0, 4.0]),
                ("c".to_string(), vec![5.0, 6.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_columns_layout() {
        let table = small_table();

        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.index(), &["v0".to_string(), "v1".to_string()]);
        assert_eq!(table.columns(), &["a", "b", "c"]);
        assert_eq!(table.row("v1").unwrap(), &[2.0, 4.0, 6.0]);
        assert_eq!(table.column("b").unwrap(), vec![3.0, 4.0]);
        assert_eq!(table.get("v0", "c"), Some(5.0));
        assert_eq!(table.get("v9", "c"), None);
        assert_eq!(table.get("v0", "z"), None);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = Table::from_columns(
            "version",
            labels("v", 3),
            vec![
                ("a".to_string(), vec![1.0, 2.0, 3.0]),
                ("b".to_string(), vec![1.0, 2.0]),
            ],
        )
        .unwrap_err();

        match err {
            ChartError::ShapeMismatch {
                column,
                expected,
                actual,
            } => {
                assert_eq!(column, "b");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_labels() {
        let dup_index = Table::from_columns(
            "version",
            vec!["1".to_string(), "1".to_string()],
            vec![("a".to_string(), vec![1.0, 2.0])],
        );
        assert!(matches!(dup_index, Err(ChartError::DuplicateLabel(l)) if l == "1"));

        let dup_column = Table::from_columns(
            "version",
            labels("v", 1),
            vec![("a".to_string(), vec![1.0]), ("a".to_string(), vec![2.0])],
        );
        assert!(matches!(dup_column, Err(ChartError::DuplicateLabel(l)) if l == "a"));
    }

    #[test]
    fn test_empty_table() {
        assert!(matches!(
            Table::from_columns("version", vec![], vec![("a".to_string(), vec![])]),
            Err(ChartError::EmptyTable)
        ));
        assert!(matches!(
            Table::from_columns("version", labels("v", 2), vec![]),
            Err(ChartError::EmptyTable)
        ));
    }

    #[test]
    fn test_transpose_swaps_axes() {
        let table = small_table().with_columns_name("instance");
        let t = table.transpose();

        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.index_name(), "instance");
        assert_eq!(t.columns_name(), Some("version"));
        assert_eq!(t.row("b").unwrap(), &[3.0, 4.0]);
        assert_eq!(t.get("c", "v1"), table.get("v1", "c"));
    }

    #[test]
    fn test_json_roundtrip_keeps_column_order() {
        let table = Table::from_columns(
            "version",
            labels("v", 1),
            vec![
                ("zeta".to_string(), vec![1.0]),
                ("alpha".to_string(), vec![2.0]),
            ],
        )
        .unwrap();

        let json = serde_json::to_string(&table).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();

        assert_eq!(back, table);
        assert_eq!(back.columns(), &["zeta", "alpha"]);
    }

    #[test]
    fn test_json_rejects_ragged_columns() {
        let json = r#"{
            "index_name": "version",
            "index": ["1", "2"],
            "columns": [{"name": "a", "values": [1.0]}]
        }"#;
        let err = serde_json::from_str::<Table>(json).unwrap_err();
        assert!(err.to_string().contains("column 'a' has 1 values"));
    }

    fn arb_table() -> impl Strategy<Value = Table> {
        (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
            prop_vec(prop_vec(-1000.0f64..1000.0, rows), cols).prop_map(move |data| {
                let columns = labels("c", cols).into_iter().zip(data).collect();
                Table::from_columns("index", labels("r", rows), columns).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_transpose_twice_is_identity(table in arb_table()) {
            let table = table.with_columns_name("columns");
            prop_assert_eq!(table.transpose().transpose(), table);
        }

        #[test]
        fn prop_transpose_moves_every_cell(table in arb_table()) {
            let t = table.transpose();
            let (rows, cols) = table.shape();
            prop_assert_eq!(t.shape(), (cols, rows));

            for row in table.index() {
                for column in table.columns() {
                    prop_assert_eq!(t.get(column, row), table.get(row, column));
                }
            }
        }
    }
}
