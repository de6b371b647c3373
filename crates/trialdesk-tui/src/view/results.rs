use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use trialdesk_core::{ResultRow, ResultTable};

use crate::app::App;
use crate::model::results::{ResultsState, VISIBLE_FIELDS};
use crate::theme::Theme;
use crate::view::truncate;

/// Render the extraction results: one table per category, a detail pane for
/// the highlighted row, then failures and totals.
pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let Some(results) = &app.results else {
        return;
    };

    let failures: Vec<String> = results.failures().collect();
    let failure_height = if failures.is_empty() {
        0
    } else {
        (failures.len() as u16 + 2).min(8)
    };

    let [table_area, detail_area, failure_area, totals_area] = Layout::vertical([
        Constraint::Min(6),
        Constraint::Length(14),
        Constraint::Length(failure_height),
        Constraint::Length(1),
    ])
    .areas(area);

    if results.grouped.succeeded() == 0 {
        let empty = Paragraph::new(Line::from(Span::styled(
            " 没有成功提取到关键信息",
            Style::default().fg(theme.warning),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
        f.render_widget(empty, table_area);
    } else {
        render_tables(f, table_area, results, theme);
        render_detail(f, detail_area, results, theme);
    }

    if !failures.is_empty() {
        render_failures(f, failure_area, &failures, theme);
    }

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", results.grouped.footer()),
            Style::default().fg(theme.text),
        ))),
        totals_area,
    );

    render_footer(f, footer_area, app, results);
}

fn render_tables(f: &mut Frame, area: Rect, results: &ResultsState, theme: &Theme) {
    let cell_width = (area.width.saturating_sub(28) / VISIBLE_FIELDS as u16).max(6) as usize;
    let offset = results.column_offset;
    let mut rows: Vec<Row> = Vec::new();
    let mut highlighted = None;
    let mut row_index = 0;

    for table in &results.grouped.tables {
        rows.push(table_title(table, theme));
        rows.push(column_header(table, offset, cell_width, theme));
        for row in &table.rows {
            if row_index == results.cursor {
                highlighted = Some(rows.len());
            }
            rows.push(data_row(
                row,
                results.is_selected(row),
                offset,
                cell_width,
                theme,
            ));
            row_index += 1;
        }
    }

    let mut widths = vec![Constraint::Length(4), Constraint::Min(16)];
    widths.extend(std::iter::repeat_n(
        Constraint::Length(cell_width as u16),
        VISIBLE_FIELDS,
    ));

    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" 关键文献 (Space:选择  h/l:翻看字段) "),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    state.select(highlighted);
    f.render_stateful_widget(table, area, &mut state);
}

fn table_title(table: &ResultTable, theme: &Theme) -> Row<'static> {
    Row::new(vec![
        Cell::from(""),
        Cell::from(table.category.name()).style(
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn column_header(table: &ResultTable, offset: usize, width: usize, theme: &Theme) -> Row<'static> {
    let style = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let mut cells = vec![
        Cell::from("").style(style),
        Cell::from("文献名称").style(style),
    ];
    cells.extend(
        table
            .fields
            .iter()
            .skip(offset)
            .take(VISIBLE_FIELDS)
            .map(|spec| Cell::from(truncate(spec.label, width)).style(style)),
    );
    Row::new(cells)
}

fn data_row(
    row: &ResultRow,
    selected: bool,
    offset: usize,
    width: usize,
    theme: &Theme,
) -> Row<'static> {
    let radio = if selected { "(\u{2022})" } else { "( )" };
    let radio_style = if selected {
        Style::default().fg(theme.ok).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    let mut cells = vec![
        Cell::from(radio).style(radio_style),
        Cell::from(row.literature_name.clone()),
    ];
    cells.extend(
        row.cells
            .iter()
            .skip(offset)
            .take(VISIBLE_FIELDS)
            .map(|value| Cell::from(truncate(value, width))),
    );
    Row::new(cells)
}

fn render_detail(f: &mut Frame, area: Rect, results: &ResultsState, theme: &Theme) {
    let Some(row) = results.current_row() else {
        return;
    };
    let Some(table) = results
        .grouped
        .tables
        .iter()
        .find(|t| t.rows.iter().any(|r| r.record_index == row.record_index))
    else {
        return;
    };

    let label_style = Style::default().fg(theme.active);
    let mut lines: Vec<Line> = table
        .fields
        .iter()
        .zip(&row.cells)
        .map(|(spec, value)| {
            Line::from(vec![
                Span::styled(format!("{}: ", spec.label), label_style),
                Span::styled(value.clone(), Style::default().fg(theme.text)),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(
        "入排人物画像",
        label_style.add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(vec![
        Span::styled("  入选：", label_style),
        Span::raw(row.inclusion.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  排除：", label_style),
        Span::raw(row.exclusion.clone()),
    ]));

    let detail = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(format!(" {} ", row.literature_name)),
    );
    f.render_widget(detail, area);
}

fn render_failures(f: &mut Frame, area: Rect, failures: &[String], theme: &Theme) {
    let lines: Vec<Line> = failures
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                format!(" {line}"),
                Style::default().fg(theme.error),
            ))
        })
        .collect();
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .title(" 处理失败的文献 "),
    );
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, results: &ResultsState) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();

    if results.selected.is_some() {
        spans.push(Span::styled(" [s] 生成方案摘要 ", theme.key_badge_style()));
    } else {
        spans.push(Span::styled(
            " [s] 生成方案摘要 ",
            Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(
        " Space:选择  j/k:移动  h/l:字段列  Esc:返回  ?:help  q:quit",
        theme.footer_style(),
    ));
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!("  {notice}"),
            Style::default().fg(theme.warning),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use trialdesk_core::{Category, ExtractionRecord};

    use super::*;
    use crate::app::Stage;

    const EMPTY_NOTICE: &str = "没有成功提取到关键信息";

    fn results_screen(records: Vec<ExtractionRecord>) -> String {
        let mut app = App::new(
            Theme::hacker(),
            "http://localhost:5000/api".into(),
            "/data".into(),
            PathBuf::from("/tmp"),
        );
        app.loading = false;
        app.stage = Stage::Results;
        app.results = Some(ResultsState::new(records));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.view(f)).unwrap();
        // Wide glyphs leave blank continuation cells behind them.
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
            .replace(' ', "")
    }

    fn named(name: &str, section: &str) -> ExtractionRecord {
        ExtractionRecord {
            literature_name: name.to_string(),
            section_name: Some(section.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn notice_shows_when_nothing_succeeded() {
        let failed = ExtractionRecord {
            literature_name: "坏文献".into(),
            error: Some("解析失败".into()),
            ..Default::default()
        };
        assert!(results_screen(vec![failed]).contains(EMPTY_NOTICE));
    }

    #[test]
    fn untabled_success_is_not_reported_as_empty() {
        let screen = results_screen(vec![named("其他文献", "其他")]);
        assert!(!screen.contains(EMPTY_NOTICE));
        assert!(screen.contains("成功1个"));
    }

    #[test]
    fn tabled_rows_render() {
        let screen = results_screen(vec![named("甲文献", Category::Cde.name())]);
        assert!(screen.contains("甲文献"));
        assert!(!screen.contains(EMPTY_NOTICE));
    }
}
