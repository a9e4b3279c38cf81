//! Host read/write primitives.
//!
//! The conversion layer never speaks a column protocol itself. It asks a
//! [`ValueReader`] for the value at a position in a given representation and
//! hands a [`ValueWriter`] the value to bind there. [`RowBuffer`] is an
//! in-memory implementation used by tests and embedding hosts.

use crate::codec::RelationalValue;
use crate::error::{CodenumError, CodenumResult};
use crate::resolver::Representation;

/// Extracts relational values from the host's current row.
pub trait ValueReader {
    /// `Ok(None)` for SQL `NULL`.
    fn read(
        &self,
        position: usize,
        representation: Representation,
    ) -> CodenumResult<Option<RelationalValue>>;
}

/// Binds relational values into the host's pending statement.
pub trait ValueWriter {
    fn write(
        &mut self,
        value: Option<RelationalValue>,
        position: usize,
        representation: Representation,
    ) -> CodenumResult<()>;
}

/// Single row of relational cells. Unwritten positions read as `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBuffer {
    cells: Vec<Option<RelationalValue>>,
}

impl RowBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cells(cells: Vec<Option<RelationalValue>>) -> Self {
        Self { cells }
    }

    pub fn get(&self, position: usize) -> Option<&RelationalValue> {
        self.cells.get(position).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl ValueReader for RowBuffer {
    fn read(
        &self,
        position: usize,
        representation: Representation,
    ) -> CodenumResult<Option<RelationalValue>> {
        self.get(position)
            .cloned()
            .map(|value| value.coerce(representation))
            .transpose()
    }
}

impl ValueWriter for RowBuffer {
    fn write(
        &mut self,
        value: Option<RelationalValue>,
        position: usize,
        representation: Representation,
    ) -> CodenumResult<()> {
        let len = position
            .checked_add(1)
            .ok_or(CodenumError::InvalidPosition(position))?;
        let value = value.map(|v| v.coerce(representation)).transpose()?;
        if self.cells.len() < len {
            self.cells.resize(len, None);
        }
        self.cells[position] = value;
        Ok(())
    }
}
