//! The single application screen.
//!
//! Layout, top to bottom inside the frame border:
//! the latency label (once a measurement above 0 ms exists), the centered request
//! button, the busy/error lines, and the floating channel button pinned to
//! the bottom-end corner. The last row holds key hints.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::{inspector, Theme};
use crate::inspector::ExchangeRecord;
use crate::state::ScreenState;
use crate::types::FocusTarget;

pub const REQUEST_LABEL: &str = "Make an HTTP request!";
pub const CHANNEL_GLYPH: &str = "▶";

const BUTTON_HEIGHT: u16 = 3;
const FAB_WIDTH: u16 = 7;

/// Everything needed to draw one frame
pub struct ScreenView<'a> {
    pub state: &'a ScreenState,
    pub focus: FocusTarget,
    pub theme: Theme,
    /// Whether the inspector panel can be toggled at all
    pub inspector_available: bool,
    /// Records to show in the inspector panel, when it is open
    pub inspector_records: Option<&'a [ExchangeRecord]>,
}

/// Where the clickable elements ended up in the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub request_button: Rect,
    pub channel_button: Rect,
    pub latency_label: Option<Rect>,
}

impl ScreenLayout {
    /// Which button, if any, covers the given cell
    pub fn hit_test(&self, column: u16, row: u16) -> Option<FocusTarget> {
        if contains(self.channel_button, column, row) {
            Some(FocusTarget::ChannelButton)
        } else if contains(self.request_button, column, row) {
            Some(FocusTarget::RequestButton)
        } else {
            None
        }
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    rect.width > 0
        && rect.height > 0
        && column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Center a `width` x `height` box inside `area`, clamped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Compute the positions of every element for a frame of size `area`
pub fn compute_layout(area: Rect, state: &ScreenState) -> (Rect, Rect, ScreenLayout) {
    let frame_block = Block::default().borders(Borders::ALL);
    let inner = frame_block.inner(area);

    // Last inner row is the footer
    let footer = Rect {
        y: inner.y + inner.height.saturating_sub(1),
        height: inner.height.min(1),
        ..inner
    };
    let body = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };

    let button_width = REQUEST_LABEL.chars().count() as u16 + 4;
    let request_button = centered(body, button_width, BUTTON_HEIGHT);

    let latency_label = state.latency_text().map(|_| {
        // One blank row between label and button when there is room
        let y = if request_button.y >= body.y + 2 {
            request_button.y - 2
        } else {
            body.y
        };
        Rect { x: body.x, y, width: body.width, height: 1 }
    });

    let fab_width = FAB_WIDTH.min(body.width);
    let fab_height = BUTTON_HEIGHT.min(body.height);
    let channel_button = Rect {
        x: (body.x + body.width).saturating_sub(fab_width + 1).max(body.x),
        y: (body.y + body.height).saturating_sub(fab_height),
        width: fab_width,
        height: fab_height,
    };

    (
        body,
        footer,
        ScreenLayout {
            request_button,
            channel_button,
            latency_label,
        },
    )
}

/// Draw the screen and report where the buttons are
pub fn render(frame: &mut Frame, view: &ScreenView) -> ScreenLayout {
    let area = frame.area();
    let theme = view.theme;

    let frame_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.button_border_style(false))
        .title(" Network Inspector ");
    frame.render_widget(frame_block, area);

    let (body, footer, layout) = compute_layout(area, view.state);

    if let (Some(label_area), Some(text)) = (layout.latency_label, view.state.latency_text()) {
        let label = Paragraph::new(Line::from(Span::styled(text, theme.latency_style())))
            .alignment(Alignment::Center);
        frame.render_widget(label, label_area);
    }

    render_request_button(frame, view, layout.request_button);
    render_status_lines(frame, view, body, layout.request_button);
    render_channel_button(frame, view, layout.channel_button);
    render_footer(frame, view, footer);

    if let Some(records) = view.inspector_records {
        inspector::render_overlay(frame, records, &theme, area);
    }

    layout
}

fn render_request_button(frame: &mut Frame, view: &ScreenView, area: Rect) {
    let focused = view.focus == FocusTarget::RequestButton;
    let button = Paragraph::new(Line::from(Span::styled(REQUEST_LABEL, view.theme.button_style(focused))))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Plain)
                .border_style(view.theme.button_border_style(focused)),
        );
    frame.render_widget(button, area);
}

fn render_channel_button(frame: &mut Frame, view: &ScreenView, area: Rect) {
    let focused = view.focus == FocusTarget::ChannelButton;
    let fab = Paragraph::new(Line::from(Span::styled(CHANNEL_GLYPH, view.theme.button_style(focused))))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(view.theme.button_border_style(focused)),
        );
    frame.render_widget(fab, area);
}

fn render_status_lines(frame: &mut Frame, view: &ScreenView, body: Rect, button: Rect) {
    let mut y = button.y + button.height;
    let bottom = body.y + body.height;

    if view.state.is_busy() && y < bottom {
        let text = if view.state.in_flight == 1 {
            "requesting…".to_string()
        } else {
            format!("requesting… ({} in flight)", view.state.in_flight)
        };
        let line = Paragraph::new(Span::styled(text, view.theme.dim_style())).alignment(Alignment::Center);
        frame.render_widget(line, Rect { x: body.x, y, width: body.width, height: 1 });
        y += 1;
    }

    if let Some(error) = &view.state.last_error {
        if y < bottom {
            let line = Paragraph::new(Span::styled(error.as_str(), view.theme.error_style()))
                .alignment(Alignment::Center);
            frame.render_widget(line, Rect { x: body.x, y, width: body.width, height: 1 });
        }
    }
}

fn render_footer(frame: &mut Frame, view: &ScreenView, area: Rect) {
    let mut hints = vec![
        Span::raw(" r "),
        Span::styled("request", view.theme.dim_style()),
        Span::raw("  o "),
        Span::styled("open channel", view.theme.dim_style()),
        Span::raw("  tab "),
        Span::styled("focus", view.theme.dim_style()),
    ];
    if view.inspector_available {
        hints.push(Span::raw("  i "));
        hints.push(Span::styled("inspector", view.theme.dim_style()));
    }
    hints.push(Span::raw("  q "));
    hints.push(Span::styled("quit", view.theme.dim_style()));

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
