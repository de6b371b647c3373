use std::path::PathBuf;

use trialdesk_core::summary::form_fields;
use trialdesk_core::{FormField, SummaryDraft};

use super::text_input::TextInput;

/// The summary screen: a locally owned draft, a cursor over the editable
/// fields and the inline editor when one is open.
#[derive(Debug, Clone)]
pub struct SummaryState {
    pub draft: SummaryDraft,
    /// Index into the editable fields of the form (section headers excluded).
    pub cursor: usize,
    pub editor: Option<TextInput>,
    /// Set once any field has been changed locally.
    pub dirty: bool,
    pub downloading: bool,
    pub saved_to: Option<PathBuf>,
}

impl SummaryState {
    pub fn new(summary: &SummaryDraft) -> Self {
        Self {
            draft: summary.editable_copy(),
            cursor: 0,
            editor: None,
            dirty: false,
            downloading: false,
            saved_to: None,
        }
    }

    pub fn field_count() -> usize {
        form_fields().count()
    }

    pub fn current_field(&self) -> Option<&'static FormField> {
        form_fields().nth(self.cursor)
    }

    pub fn move_by(&mut self, delta: isize) {
        let max = Self::field_count().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    pub fn go_bottom(&mut self) {
        self.cursor = Self::field_count().saturating_sub(1);
    }

    /// Open the editor on the field under the cursor.
    pub fn begin_edit(&mut self) {
        if let Some(field) = self.current_field() {
            let value = self.draft.get(field.path);
            self.editor = Some(TextInput::new(value, field.multiline));
        }
    }

    /// Write the editor buffer into the addressed leaf and close the editor.
    pub fn commit_edit(&mut self) {
        let (Some(editor), Some(field)) = (self.editor.take(), self.current_field()) else {
            return;
        };
        if self.draft.get(field.path) != editor.buffer {
            self.draft.set(field.path, editor.buffer);
            self.dirty = true;
            self.saved_to = None;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }
}
