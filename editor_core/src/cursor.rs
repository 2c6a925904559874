use campaign_runtime::{clamp_wrap, Direction, Field, FieldSelector, Row};

/// The focused `(row, column)` of the field grid.
///
/// Movement wraps in both axes. Changing rows keeps the column when the new
/// row is wide enough and resets it to the first column otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorCursor {
    selector: FieldSelector,
}

impl EditorCursor {
    pub fn new(selector: FieldSelector) -> Self {
        Self::default().focused(selector)
    }

    pub fn selector(&self) -> FieldSelector {
        self.selector
    }

    pub fn row(&self) -> Row {
        self.selector.row
    }

    pub fn column(&self) -> usize {
        self.selector.column
    }

    pub fn field(&self) -> Option<Field> {
        self.selector.field()
    }

    pub fn moved(self, direction: Direction) -> Self {
        let FieldSelector { row, column } = self.selector;
        let selector = match direction {
            Direction::Up => enter_row(row.index() as i32 - 1, column),
            Direction::Down => enter_row(row.index() as i32 + 1, column),
            Direction::Left => FieldSelector::new(row, wrap_column(row, column as i32 - 1)),
            Direction::Right => FieldSelector::new(row, wrap_column(row, column as i32 + 1)),
        };
        Self { selector }
    }

    /// Jump to `selector`, re-clamping an out-of-row column like a move would.
    pub fn focused(self, selector: FieldSelector) -> Self {
        Self {
            selector: FieldSelector::new(
                selector.row,
                wrap_column(selector.row, selector.column.min(i32::MAX as usize) as i32),
            ),
        }
    }
}

fn enter_row(index: i32, column: usize) -> FieldSelector {
    let last = Row::ALL.len() as i32 - 1;
    let row = Row::from_index(clamp_wrap(index, 0, last) as usize).unwrap_or(Row::Appearance);
    FieldSelector::new(row, wrap_column(row, column as i32))
}

fn wrap_column(row: Row, column: i32) -> usize {
    clamp_wrap(column, 0, row.last_column() as i32) as usize
}
