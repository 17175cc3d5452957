use crate::cards::CardLine;
use anyhow::Result;
use ratatui::{
    Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use textwrap::wrap;

const INPUT_ROWS: u16 = 5;

pub struct ViewSnap {
    pub draft: String,
    pub cursor: usize,
    pub cards: Vec<CardLine>,
    pub error: Option<String>,
    pub busy: bool,
    pub spinner: &'static str,
    pub scroll: usize,
    pub notice: Option<String>,
    pub result_count: usize,
}

pub fn draw<B: Backend>(term: &mut Terminal<B>, snap: &ViewSnap) -> Result<()> {
    term.draw(|frame| {
        let area = frame.area();

        // The error slot only takes a row when there is something to show.
        let mut constraints = vec![Constraint::Length(1), Constraint::Min(3)];
        if snap.error.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(INPUT_ROWS + 2));
        constraints.push(Constraint::Length(3));

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut idx = 0;
        let header_area = layout[idx];
        idx += 1;
        let results_area = layout[idx];
        idx += 1;
        let error_area = snap.error.as_ref().map(|_| {
            let a = layout[idx];
            idx += 1;
            a
        });
        let input_area = layout[idx];
        let status_area = layout[idx + 1];

        draw_header(frame, header_area);
        draw_results(frame, results_area, snap);
        if let (Some(area), Some(msg)) = (error_area, snap.error.as_ref()) {
            draw_error(frame, area, msg);
        }
        draw_input(frame, input_area, snap);
        draw_status(frame, status_area, snap);
    })?;

    Ok(())
}

fn draw_header(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Factlens ", crate::styles::header()),
        Span::styled(
            "— Enter submits • Alt+Enter newline • /clear • /quit",
            crate::styles::dim(),
        ),
    ]));
    frame.render_widget(header, area);
}

fn draw_results(frame: &mut ratatui::Frame<'_>, area: Rect, snap: &ViewSnap) {
    let visible_h = area.height.saturating_sub(2) as usize;
    let content_width = area.width.saturating_sub(2) as usize;
    let wrapped = wrap_cards(&snap.cards, content_width);
    let total = wrapped.len();

    let start = snap.scroll.min(total.saturating_sub(visible_h));
    let end = (start + visible_h).min(total);

    let items: Vec<ListItem> = wrapped[start..end]
        .iter()
        .map(|(text, style)| ListItem::new(Line::from(Span::styled(text.clone(), *style))))
        .collect();

    let body = List::new(items).block(Block::default().borders(Borders::ALL).title(" Results "));
    frame.render_widget(body, area);
}

fn draw_error(frame: &mut ratatui::Frame<'_>, area: Rect, msg: &str) {
    let line = Paragraph::new(Line::from(Span::styled(
        format!(" × {msg}"),
        crate::styles::error(),
    )));
    frame.render_widget(line, area);
}

fn draw_input(frame: &mut ratatui::Frame<'_>, area: Rect, snap: &ViewSnap) {
    let input_box = Paragraph::new(snap.draft.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paste a news article or claim here… "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(input_box, area);

    // Caret placement — uses snapshot, not `self`
    let (row, col) = caret_position(&snap.draft, snap.cursor);
    let max_x = area.x + area.width.saturating_sub(2);
    let max_y = area.y + area.height.saturating_sub(2);
    frame.set_cursor_position(Position {
        x: (area.x + 1 + col).min(max_x),
        y: (area.y + 1 + row).min(max_y),
    });
}

fn draw_status(frame: &mut ratatui::Frame<'_>, area: Rect, snap: &ViewSnap) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(snap.spinner, crate::styles::busy()),
        Span::raw(" "),
        if snap.busy {
            Span::styled("Checking…", crate::styles::busy())
        } else {
            Span::styled("Idle", crate::styles::idle())
        },
        Span::raw(format!(" • results: {}", snap.result_count)),
    ];
    if let Some(notice) = &snap.notice {
        spans.push(Span::styled(format!(" • {notice}"), crate::styles::dim()));
    }

    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, area);
}

/// Row and visual column of the caret inside the (unwrapped) input box.
fn caret_position(draft: &str, cursor: usize) -> (u16, u16) {
    use unicode_width::UnicodeWidthStr;

    let before = &draft[..cursor];
    let row = before.matches('\n').count() as u16;
    let last_line = before.rsplit('\n').next().unwrap_or("");
    (row, UnicodeWidthStr::width(last_line) as u16)
}

fn wrap_cards(lines: &[CardLine], width: usize) -> Vec<(String, Style)> {
    let effective_width = width.max(1);
    let mut out = Vec::new();

    for entry in lines {
        let style = entry.style;
        if entry.text.is_empty() {
            out.push((String::new(), style));
            continue;
        }

        let segments = wrap(&entry.text, effective_width);
        if segments.is_empty() {
            out.push((String::new(), style));
        } else {
            out.extend(segments.into_iter().map(|seg| (seg.into_owned(), style)));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    #[test]
    fn caret_tracks_rows_and_columns() {
        assert_eq!(caret_position("", 0), (0, 0));
        assert_eq!(caret_position("abc", 2), (0, 2));
        assert_eq!(caret_position("ab\ncd", 3), (1, 0));
        assert_eq!(caret_position("ab\ncd", 5), (1, 2));
    }

    #[test]
    fn wrap_cards_splits_long_lines_and_keeps_blanks() {
        let lines = vec![
            CardLine::new("a".repeat(25), Style::default()),
            CardLine::new(String::new(), Style::default()),
        ];
        let wrapped = wrap_cards(&lines, 10);
        assert!(wrapped.len() > 2, "long line wraps into several segments");
        assert_eq!(wrapped.last().unwrap().0, "");
    }
}
