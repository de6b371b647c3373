use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use trialdesk_core::{FORM, FieldPath, FormRow};

use crate::app::App;
use crate::model::summary::SummaryState;
use crate::model::text_input::TextInput;
use crate::theme::Theme;
use crate::view::{centered_rect, first_line, spinner_char, truncate};

/// Render the summary form, plus the editor popup when a field is open.
pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let Some(summary) = &app.summary else {
        return;
    };
    let width = area.width.saturating_sub(4) as usize;

    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_line = None;
    let mut field_index = 0;

    for row in FORM {
        match row {
            FormRow::Section(group) => {
                items.push(ListItem::new(Line::from(Span::styled(
                    format!(" {}", group.label()),
                    Style::default()
                        .fg(theme.active)
                        .add_modifier(Modifier::BOLD),
                ))));
            }
            FormRow::Field(field) => {
                if field_index == summary.cursor {
                    selected_line = Some(items.len());
                }
                let indent = match field.path {
                    FieldPath::Flat(_) => " ",
                    FieldPath::Nested(_) => "   ",
                };
                let label = format!("{indent}{}: ", field.label);
                let value = first_line(summary.draft.get(field.path));
                let budget = width.saturating_sub(label.width());
                let value_span = if value.is_empty() {
                    Span::styled("(空)", Style::default().fg(theme.dim))
                } else {
                    Span::styled(truncate(&value, budget), Style::default().fg(theme.text))
                };
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(label, Style::default().fg(theme.dim)),
                    value_span,
                ])));
                field_index += 1;
            }
        }
    }

    let title = if summary.dirty {
        " 方案摘要 [已修改] "
    } else {
        " 方案摘要 "
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        )
        .highlight_style(theme.highlight_style());

    let mut state = ListState::default();
    state.select(selected_line);
    f.render_stateful_widget(list, area, &mut state);

    if let Some(editor) = &summary.editor {
        let label = summary.current_field().map(|f| f.label).unwrap_or_default();
        render_editor(f, area, editor, label, theme);
    }

    render_footer(f, footer_area, app, summary);
}

fn render_editor(f: &mut Frame, area: Rect, editor: &TextInput, label: &str, theme: &Theme) {
    let width = area.width.saturating_sub(8).clamp(20, 100);
    let height = if editor.multiline {
        area.height.saturating_sub(4).clamp(5, 20)
    } else {
        3
    };
    let popup = centered_rect(width, height, area);
    f.render_widget(Clear, popup);

    let (before, after) = editor.split_at_cursor();
    let inner_width = popup.width.saturating_sub(2) as usize;
    let (lines, cursor_row) = wrap_with_cursor(
        before,
        after,
        inner_width,
        Style::default().fg(theme.text),
        Style::default().fg(theme.active),
    );

    // Keep the cursor on the last visible row once it passes the bottom.
    let inner_height = popup.height.saturating_sub(2) as usize;
    let scroll = cursor_row.saturating_sub(inner_height.saturating_sub(1));

    let paragraph = Paragraph::new(lines)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(format!(" 编辑: {label} ")),
        );
    f.render_widget(paragraph, popup);
}

/// Break editor text into rows of at most `width` columns with a block
/// cursor between `before` and `after`. Returns the rows and the cursor's row.
fn wrap_with_cursor(
    before: &str,
    after: &str,
    width: usize,
    text: Style,
    cursor: Style,
) -> (Vec<Line<'static>>, usize) {
    let mut rows = RowBuilder::new(width.max(2), text);
    before.chars().for_each(|ch| rows.push_char(ch));
    let cursor_row = rows.push_cursor(cursor);
    after.chars().for_each(|ch| rows.push_char(ch));
    (rows.finish(), cursor_row)
}

struct RowBuilder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    run: String,
    used: usize,
    width: usize,
    text: Style,
}

impl RowBuilder {
    fn new(width: usize, text: Style) -> Self {
        Self {
            lines: Vec::new(),
            spans: Vec::new(),
            run: String::new(),
            used: 0,
            width,
            text,
        }
    }

    fn flush_run(&mut self) {
        if !self.run.is_empty() {
            let run = std::mem::take(&mut self.run);
            self.spans.push(Span::styled(run, self.text));
        }
    }

    fn break_line(&mut self) {
        self.flush_run();
        let spans = std::mem::take(&mut self.spans);
        self.lines.push(Line::from(spans));
        self.used = 0;
    }

    fn push_char(&mut self, ch: char) {
        if ch == '\n' {
            self.break_line();
            return;
        }
        let w = ch.width().unwrap_or(0);
        if self.used > 0 && self.used + w > self.width {
            self.break_line();
        }
        self.run.push(ch);
        self.used += w;
    }

    fn push_cursor(&mut self, style: Style) -> usize {
        if self.used + 1 > self.width {
            self.break_line();
        }
        self.flush_run();
        self.spans.push(Span::styled("\u{2588}", style));
        self.used += 1;
        self.lines.len()
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.break_line();
        self.lines
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, summary: &SummaryState) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();

    if let Some(editor) = &summary.editor {
        let hints = if editor.multiline {
            " Enter:确认  Alt+Enter:换行  Esc:取消"
        } else {
            " Enter:确认  Esc:取消"
        };
        spans.push(Span::styled(hints, theme.footer_style()));
        f.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    }

    if summary.downloading {
        spans.push(Span::styled(
            format!(" {} 正在下载... ", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    } else {
        spans.push(Span::styled(" [d] 下载方案摘要 ", theme.key_badge_style()));
    }
    spans.push(Span::styled(
        " Enter/e:编辑  j/k:移动  Esc:返回  ?:help  q:quit",
        theme.footer_style(),
    ));
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!("  {notice}"),
            Style::default().fg(theme.ok),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
