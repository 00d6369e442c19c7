//! Overlay listing recent HTTP exchanges

use ratatui::{
    layout::{Constraint, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::Theme;
use crate::inspector::ExchangeRecord;

/// Area the overlay occupies: most of the frame, with a small margin
pub fn overlay_area(area: Rect) -> Rect {
    let margin_x = (area.width / 10).min(4);
    let margin_y = (area.height / 8).min(2);
    Rect {
        x: area.x + margin_x,
        y: area.y + margin_y,
        width: area.width.saturating_sub(margin_x * 2),
        height: area.height.saturating_sub(margin_y * 2),
    }
}

fn size_label(body_size: Option<usize>) -> String {
    match body_size {
        Some(size) if size >= 1024 => format!("{:.1} KB", size as f64 / 1024.0),
        Some(size) => format!("{} B", size),
        None => "-".to_string(),
    }
}

pub fn render_overlay(frame: &mut Frame, records: &[ExchangeRecord], theme: &Theme, area: Rect) {
    let area = overlay_area(area);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.button_border_style(true))
        .title(format!(" Inspector ({} exchanges) ", records.len()));

    if records.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No requests yet. Press r to make one.",
            theme.dim_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["METHOD", "STATUS", "TIME", "SIZE", "URL"])
        .style(theme.dim_style().add_modifier(Modifier::BOLD));

    let rows = records.iter().map(|record| {
        let url = match &record.error {
            Some(error) => format!("{} ({})", record.url, error),
            None => record.url.clone(),
        };
        Row::new(vec![
            Cell::from(record.method.clone()),
            Cell::from(record.status_label()).style(theme.status_style(record.status_code)),
            Cell::from(format!("{} ms", record.duration_ms)),
            Cell::from(size_label(record.body_size)),
            Cell::from(url),
        ])
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
