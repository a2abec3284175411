use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph};

use cookfind_core::Classification;

use crate::app::{App, Focus};
use crate::model::results::ResultList;
use crate::view::{spinner_char, truncate};

/// Render the search screen: query input, progress, and both result lists.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(3), // query input
        Constraint::Length(3), // progress / message
        Constraint::Min(5),    // result lists
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, chunks[0], app);
    render_input(f, chunks[1], app);
    render_status(f, chunks[2], app);

    let lists = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_list(f, lists[0], app, &app.exact, Classification::Exact, app.focus == Focus::Exact);
    render_list(f, lists[1], app, &app.fuzzy, Classification::Fuzzy, app.focus == Focus::Fuzzy);

    render_footer(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let status = app.search.status;
    let mut spans = vec![
        Span::styled(" COOKFIND ", theme.header_style()),
        Span::raw(" "),
        Span::styled(
            status.label(),
            Style::default()
                .fg(theme.status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(query) = &app.search.query {
        spans.push(Span::styled(" > ", Style::default().fg(theme.dim)));
        spans.push(Span::styled(
            truncate(query, (area.width as usize).saturating_sub(30)),
            Style::default().fg(theme.text),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Input;
    let cursor = if focused { "▏" } else { "" };
    let title = if app.search.is_running() {
        " Recipe name (searching...) "
    } else {
        " Recipe name (Enter: search) "
    };

    let input = Paragraph::new(Line::from(vec![
        Span::styled(app.input.as_str(), Style::default().fg(theme.text)),
        Span::styled(cursor, Style::default().fg(theme.active)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(focused))
            .title(title),
    );
    f.render_widget(input, area);
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let search = &app.search;

    if search.shows_progress() {
        let label = format!(
            "{} Searching {} result pages... {} / {}",
            spinner_char(app.tick),
            search.total_pages,
            search.current_page,
            search.total_pages
        );
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(false)),
            )
            .gauge_style(Style::default().fg(theme.active))
            .ratio(search.ratio())
            .label(label);
        f.render_widget(gauge, area);
        return;
    }

    let line = if let Some(notice) = &app.notice {
        Line::from(Span::styled(notice.as_str(), Style::default().fg(theme.active)))
    } else if let Some(message) = &search.message {
        Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(theme.failed).add_modifier(Modifier::BOLD),
        ))
    } else if search.is_running() {
        Line::from(Span::styled(
            format!("{} Searching...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ))
    } else {
        Line::from("")
    };

    let status = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(false)),
    );
    f.render_widget(status, area);
}

fn render_list(
    f: &mut Frame,
    area: Rect,
    app: &App,
    list: &ResultList,
    classification: Classification,
    focused: bool,
) {
    let theme = &app.theme;
    let color = theme.classification_color(classification);
    let name_width = (area.width as usize).saturating_sub(12);

    let items: Vec<ListItem> = list
        .items
        .iter()
        .map(|c| {
            ListItem::new(Line::from(vec![
                Span::styled(truncate(&c.display_name, name_width), Style::default().fg(color)),
                Span::styled(format!("  p{}", c.page_index), Style::default().fg(theme.dim)),
            ]))
        })
        .collect();

    let title = match classification {
        Classification::Exact => format!(" Exact ({}) ", list.len()),
        _ => format!(" Fuzzy ({}) ", list.len()),
    };

    let widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(focused))
                .title(title),
        )
        .highlight_style(theme.highlight_style());

    let mut state = ListState::default();
    if focused && !list.is_empty() {
        state.select(Some(list.cursor));
    }
    f.render_stateful_widget(widget, area, &mut state);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let hints = match app.focus {
        Focus::Input => " Enter:search  Ctrl+s:stop  Ctrl+l:clear  Tab:results  Ctrl+c:quit",
        _ => " j/k:nav  c:copy link  o:open  Tab:next  Esc:input  ?:help  q:quit",
    };
    let footer = Line::from(Span::styled(hints, app.theme.footer_style()));
    f.render_widget(Paragraph::new(footer), area);
}
