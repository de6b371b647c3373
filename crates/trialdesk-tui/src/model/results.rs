use trialdesk_core::results::find_selected;
use trialdesk_core::{ExtractionRecord, GroupedResults, RecordKey, ResultRow};

/// Field columns visible in a result table at once.
pub const VISIBLE_FIELDS: usize = 3;

/// The extraction results screen: the records, their grouping, a cursor over
/// all rendered rows and the single radio selection.
#[derive(Debug, Clone)]
pub struct ResultsState {
    pub records: Vec<ExtractionRecord>,
    pub grouped: GroupedResults,
    pub cursor: usize,
    pub selected: Option<RecordKey>,
    /// Index of the first field column shown in the tables.
    pub column_offset: usize,
}

impl ResultsState {
    pub fn new(records: Vec<ExtractionRecord>) -> Self {
        let grouped = GroupedResults::build(&records);
        if !grouped.dropped.is_empty() {
            tracing::debug!(
                dropped = grouped.dropped.len(),
                "records outside the result tables are not shown"
            );
        }
        Self {
            records,
            grouped,
            cursor: 0,
            selected: None,
            column_offset: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.grouped.rows().count()
    }

    pub fn current_row(&self) -> Option<&ResultRow> {
        self.grouped.rows().nth(self.cursor)
    }

    pub fn move_by(&mut self, delta: isize) {
        let max = self.row_count().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    pub fn go_bottom(&mut self) {
        self.cursor = self.row_count().saturating_sub(1);
    }

    /// Shift the visible field columns, stopping once the widest table's
    /// last field is in view.
    pub fn scroll_columns(&mut self, delta: isize) {
        let widest = self
            .grouped
            .tables
            .iter()
            .map(|t| t.fields.len())
            .max()
            .unwrap_or(0);
        let max = widest.saturating_sub(VISIBLE_FIELDS);
        self.column_offset = self.column_offset.saturating_add_signed(delta).min(max);
    }

    /// Make the row under the cursor the one selected record. Selecting the
    /// already-selected row keeps it selected.
    pub fn select_current(&mut self) {
        if let Some(key) = self.current_row().map(|r| r.key.clone()) {
            self.selected = Some(key);
        }
    }

    pub fn is_selected(&self, row: &ResultRow) -> bool {
        self.selected.as_ref() == Some(&row.key)
    }

    /// The record that would be sent for summary generation.
    pub fn selected_record(&self) -> Option<&ExtractionRecord> {
        self.selected
            .as_ref()
            .and_then(|key| find_selected(&self.records, key))
    }

    /// `<literature_name>: <error>` for every failed record.
    pub fn failures(&self) -> impl Iterator<Item = String> + '_ {
        self.grouped.failed.iter().filter_map(|&i| {
            let rec = self.records.get(i)?;
            Some(format!(
                "{}: {}",
                rec.literature_name,
                rec.error.as_deref().unwrap_or_default()
            ))
        })
    }
}
