//! In-memory tabular data for the batch pipeline.
//!
//! Cells keep the text they were read with, so a validated table can be
//! annotated and exported without reformatting the user's values.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Header plus rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given header.
    ///
    /// # Errors
    /// Returns error if a column name repeats.
    pub fn new(columns: Vec<String>) -> Result<Self, TableError> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a table from a header and rows.
    ///
    /// # Errors
    /// Returns error on duplicate columns or rows of the wrong width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row.
    ///
    /// # Errors
    /// Returns error if the row width differs from the header.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RaggedRow {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of a named column, top to bottom.
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Restrict the table to `names`, in that order.
    ///
    /// Returns `None` if any name is not a column of this table.
    #[must_use]
    pub fn select(&self, names: &[String]) -> Option<Table> {
        let indices: Vec<usize> = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Option<_>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Some(Table {
            columns: names.to_vec(),
            rows,
        })
    }

    /// Append a column.
    ///
    /// # Errors
    /// Returns error if the name already exists or `values` does not have one
    /// cell per row.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<String>) -> Result<Table, TableError> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if values.len() != self.rows.len() {
            return Err(TableError::RaggedRow {
                row: values.len().min(self.rows.len()) + 1,
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }

    /// First `n` rows, for previews.
    #[must_use]
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
