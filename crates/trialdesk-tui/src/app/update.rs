use super::{App, InputMode, RenderMode};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::ForceQuit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(8);
                return false;
            }
            _ => {}
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return false;
        }

        if self.show_help {
            match action {
                Action::ToggleHelp | Action::NavigateBack => self.show_help = false,
                Action::Quit => self.confirm_quit = true,
                _ => {}
            }
            return false;
        }

        if self.input_mode == InputMode::TextInput {
            self.update_text_input(action);
            return false;
        }

        match action {
            Action::Quit => {
                self.confirm_quit = true;
                return false;
            }
            Action::ToggleHelp => {
                self.show_help = true;
                return false;
            }
            _ => {}
        }

        match self.render_mode() {
            // Nothing but quitting while a request blocks the screen.
            RenderMode::Loading => {}
            RenderMode::Error => self.update_error(action),
            RenderMode::Main => self.update_main(action),
            RenderMode::Results => self.update_results(action),
            RenderMode::Summary => self.update_summary(action),
        }
        false
    }

    fn page(&self) -> isize {
        self.visible_rows.max(1) as isize
    }

    fn update_error(&mut self, action: Action) {
        match action {
            Action::Reload => self.reload(),
            Action::NavigateBack => {
                if self.error.as_ref().is_some_and(|e| e.context.dismissible()) {
                    self.error = None;
                }
            }
            _ => {}
        }
    }

    fn update_main(&mut self, action: Action) {
        match action {
            Action::MoveDown => self.browser.move_by(1),
            Action::MoveUp => self.browser.move_by(-1),
            Action::PageDown => self.browser.move_by(self.page()),
            Action::PageUp => self.browser.move_by(-self.page()),
            Action::GoTop => self.browser.go_top(),
            Action::GoBottom => self.browser.go_bottom(),
            Action::Toggle => self.toggle_current_item(),
            Action::Extract | Action::DrillIn => self.request_extract(),
            Action::Reload => self.reload(),
            _ => {}
        }
    }

    fn update_results(&mut self, action: Action) {
        match action {
            Action::NavigateBack => {
                self.back_to_main();
                return;
            }
            Action::GenerateSummary => {
                self.request_summary();
                return;
            }
            _ => {}
        }
        let page = self.page();
        let Some(results) = self.results.as_mut() else {
            return;
        };
        match action {
            Action::MoveDown => results.move_by(1),
            Action::MoveUp => results.move_by(-1),
            Action::PageDown => results.move_by(page),
            Action::PageUp => results.move_by(-page),
            Action::GoTop => results.cursor = 0,
            Action::GoBottom => results.go_bottom(),
            Action::ColumnLeft => results.scroll_columns(-1),
            Action::ColumnRight => results.scroll_columns(1),
            Action::Toggle | Action::DrillIn => results.select_current(),
            _ => {}
        }
    }

    fn update_summary(&mut self, action: Action) {
        match action {
            Action::NavigateBack => {
                self.back_to_results();
                return;
            }
            Action::Download => {
                self.request_download();
                return;
            }
            _ => {}
        }
        let page = self.page();
        let Some(summary) = self.summary.as_mut() else {
            return;
        };
        match action {
            Action::MoveDown => summary.move_by(1),
            Action::MoveUp => summary.move_by(-1),
            Action::PageDown => summary.move_by(page),
            Action::PageUp => summary.move_by(-page),
            Action::GoTop => summary.cursor = 0,
            Action::GoBottom => summary.go_bottom(),
            Action::DrillIn | Action::EditField => {
                summary.begin_edit();
                if summary.editor.is_some() {
                    self.input_mode = InputMode::TextInput;
                }
            }
            _ => {}
        }
    }

    fn update_text_input(&mut self, action: Action) {
        let Some(summary) = self.summary.as_mut() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        match action {
            Action::InputConfirm => {
                summary.commit_edit();
                self.input_mode = InputMode::Normal;
            }
            Action::InputCancel => {
                summary.cancel_edit();
                self.input_mode = InputMode::Normal;
            }
            _ => {
                let Some(editor) = summary.editor.as_mut() else {
                    self.input_mode = InputMode::Normal;
                    return;
                };
                match action {
                    Action::InputChar(ch) => editor.insert(ch),
                    Action::InputNewline => editor.newline(),
                    Action::InputBackspace => editor.backspace(),
                    Action::DeleteForward => editor.delete_forward(),
                    Action::CursorLeft => editor.left(),
                    Action::CursorRight => editor.right(),
                    Action::CursorHome => editor.home(),
                    Action::CursorEnd => editor.end(),
                    _ => {}
                }
            }
        }
    }
}
