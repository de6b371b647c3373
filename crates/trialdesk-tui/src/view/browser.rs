use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use trialdesk_core::Category;

use crate::app::App;
use crate::theme::Theme;
use crate::view::truncate;

/// Render the folder browser: every category with its items and checkboxes.
pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let width = area.width.saturating_sub(4) as usize;

    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_line = None;
    let mut entry_index = 0;

    for &category in Category::all() {
        items.push(ListItem::new(category_header(app, category, theme)));
        items.push(ListItem::new(Line::from(Span::styled(
            format!("  {}", truncate(&category.path(&app.data_root), width)),
            Style::default().fg(theme.dim),
        ))));

        let names = app.listing.items(category);
        if names.is_empty() {
            items.push(ListItem::new(Line::from(Span::styled(
                "    \u{1F4C1} 该路径下暂无子文件夹",
                Style::default().fg(theme.dim),
            ))));
        }
        for name in names {
            if entry_index == app.browser.cursor {
                selected_line = Some(items.len());
            }
            items.push(ListItem::new(item_line(app, category, name, width, theme)));
            entry_index += 1;
        }
        items.push(ListItem::new(Line::from("")));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(format!(" 已选择 {} 项 ", app.selection.len())),
        )
        .highlight_style(theme.highlight_style());

    let mut state = ListState::default();
    state.select(selected_line);
    f.render_stateful_widget(list, area, &mut state);

    render_footer(f, footer_area, app);
}

fn category_header(app: &App, category: Category, theme: &Theme) -> Line<'static> {
    let style = if category.enabled() {
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(theme.disabled)
            .add_modifier(Modifier::BOLD)
    };
    let count = app.listing.items(category).len();
    Line::from(vec![
        Span::styled(format!(" {}", category.name()), style),
        Span::styled(format!(" ({count})"), Style::default().fg(theme.dim)),
    ])
}

fn item_line(
    app: &App,
    category: Category,
    name: &str,
    width: usize,
    theme: &Theme,
) -> Line<'static> {
    if !category.enabled() {
        return Line::from(vec![
            Span::styled("    [-] ", Style::default().fg(theme.disabled)),
            Span::styled(
                truncate(name, width.saturating_sub(30)),
                Style::default().fg(theme.disabled),
            ),
            Span::styled("  demo不支持处理此类材料", Style::default().fg(theme.dim)),
        ]);
    }

    let checked = app.selection.contains_item(category, name);
    let (mark, style) = if checked {
        ("    [x] ", Style::default().fg(theme.ok))
    } else {
        ("    [ ] ", Style::default().fg(theme.text))
    };
    Line::from(vec![
        Span::styled(mark, style),
        Span::styled(truncate(name, width.saturating_sub(8)), style),
    ])
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();

    if app.selection.is_empty() {
        spans.push(Span::styled(
            " [x] 提取关键信息 ",
            Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(" [x] 提取关键信息 ", theme.key_badge_style()));
    }
    spans.push(Span::styled(
        " Space:勾选  j/k:移动  r:重新加载  ?:help  q:quit",
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
