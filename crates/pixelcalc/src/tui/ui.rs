//! TUI rendering

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Widget},
    Frame,
};

use super::app::{App, WidgetKind};
use super::keypad::{KeypadWidget, PrankKeypadWidget};
use crate::core::DisplaySnapshot;
use crate::prank::{OverlayView, PrankCalculator};

/// Width of the scientific keypad column
const KEYPAD_WIDTH: u16 = 52;
/// Width of the help column
const HELP_WIDTH: u16 = 24;
/// Width of the prank calculator body
const PRANK_WIDTH: u16 = 32;

/// Renders the active widget to the frame
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(CalculatorUI::new(app), area);
}

/// Area the keypad of the active widget occupies, for mouse hit testing
#[must_use]
pub fn keypad_area(app: &App, area: Rect) -> Rect {
    match app.widget() {
        WidgetKind::Scientific => scientific_columns(area, app.show_help())[1],
        WidgetKind::Prank => prank_rows(inner(area))[2],
    }
}

/// Area the matrix rain covers inside the frame border
#[must_use]
pub fn rain_area(area: Rect) -> Rect {
    inner(area)
}

fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn scientific_columns(area: Rect, show_help: bool) -> Vec<Rect> {
    let help = if show_help { HELP_WIDTH } else { 0 };
    Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([
            Constraint::Min(30),
            Constraint::Length(KEYPAD_WIDTH),
            Constraint::Length(help),
        ])
        .split(area)
        .to_vec()
}

fn prank_rows(area: Rect) -> Vec<Rect> {
    let body = centered_width(area, PRANK_WIDTH);
    Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Display
            Constraint::Length(1), // CPU meter
            Constraint::Min(7),    // Keypad
        ])
        .split(body)
        .to_vec()
}

fn centered_width(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

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

/// Calculator UI widget
#[derive(Debug)]
pub struct CalculatorUI<'a> {
    app: &'a App,
}

impl<'a> CalculatorUI<'a> {
    /// Creates a new calculator UI widget
    #[must_use]
    pub const fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn render_scientific(&self, area: Rect, buf: &mut Buffer) {
        let columns = scientific_columns(area, self.app.show_help());
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // Display
                Constraint::Min(3),    // History
                Constraint::Length(3), // Memory
            ])
            .split(columns[0]);

        let calculator = self.app.calculator();
        render_display(&calculator.display(), main[0], buf);
        self.render_history(main[1], buf);
        self.render_memory(main[2], buf);

        let modifier = calculator.state().modifier();
        KeypadWidget::new(self.app.keypad(), modifier).render(columns[1], buf);

        if self.app.show_help() {
            render_help(columns[2], buf);
        }
    }

    fn render_history(&self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .app
            .calculator()
            .history()
            .iter_rev()
            .take(area.height.saturating_sub(2) as usize)
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(entry.expression.as_str(), Style::default().fg(Color::Gray)),
                    Span::raw(" = "),
                    Span::styled(entry.result_text(), Style::default().fg(Color::Cyan)),
                ]))
            })
            .collect();

        List::new(items)
            .block(
                Block::default()
                    .title(" History (newest first) ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .render(area, buf);
    }

    fn render_memory(&self, area: Rect, buf: &mut Buffer) {
        let calculator = self.app.calculator();
        let mut spans: Vec<Span> = calculator
            .memory()
            .iter()
            .map(|(name, value)| {
                Span::styled(
                    format!("{name}={} ", crate::core::format::format_for_display(value)),
                    Style::default().fg(Color::LightMagenta),
                )
            })
            .collect();
        spans.push(Span::styled(
            format!(
                "Ans={}",
                crate::core::format::format_for_display(calculator.answer())
            ),
            Style::default().fg(Color::DarkGray),
        ));

        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .title(" Memory ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .render(area, buf);
    }

    fn render_prank(&self, area: Rect, buf: &mut Buffer) {
        let prank = self.app.prank();
        let view = prank.view();

        if let Some(overlay) = &view.overlay {
            render_rain(prank, area, buf);
            if overlay.message_visible {
                render_overlay(overlay, area, buf);
            }
            return;
        }

        let rows = prank_rows(area);
        let display_style = Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD);
        Paragraph::new(Span::styled(view.display.as_str(), display_style))
            .alignment(Alignment::Right)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)),
            )
            .render(rows[0], buf);

        Paragraph::new(Span::styled(view.cpu.as_str(), Style::default().fg(Color::Green)))
            .alignment(Alignment::Center)
            .render(rows[1], buf);

        PrankKeypadWidget::new(self.app.prank_pressed()).render(rows[2], buf);
    }
}

impl Widget for CalculatorUI<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let widget = self.app.widget();
        Block::default()
            .title(widget.title())
            .title_bottom(" Tab: switch calculator | Ctrl+C: quit ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .render(area, buf);

        match widget {
            WidgetKind::Scientific => self.render_scientific(area, buf),
            WidgetKind::Prank => self.render_prank(inner(area), buf),
        }
    }
}

/// Renders the scientific display: pending line, main line, indicators and preview
fn render_display(display: &DisplaySnapshot, area: Rect, buf: &mut Buffer) {
    let main_style = if display.error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    };
    let indicator = |on: bool, text: &'static str, color: Color| {
        let style = if on {
            Style::default().fg(Color::Black).bg(color)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(text, style)
    };

    let lines = vec![
        Line::from(Span::styled(
            display.upper.as_str(),
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Right),
        Line::from(Span::styled(display.main.as_str(), main_style)).alignment(Alignment::Right),
        Line::from(vec![
            indicator(display.shift, "S", Color::Yellow),
            Span::raw(" "),
            indicator(display.alpha, "A", Color::LightRed),
            Span::raw(" "),
            indicator(display.memory, "M", Color::Magenta),
            Span::raw("  "),
            Span::styled(display.angle.label(), Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::styled(display.mode.label(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            display.preview.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Display ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .render(area, buf);
}

fn render_help(area: Rect, buf: &mut Buffer) {
    let items: Vec<ListItem> = HELP_SHORTCUTS
        .iter()
        .map(|(key, desc)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{key:>6}"), Style::default().fg(Color::Yellow)),
                Span::raw(" "),
                Span::styled(*desc, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    List::new(items)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(area, buf);
}

/// Draws the rain field, two terminal cells per glyph
fn render_rain(prank: &PrankCalculator, area: Rect, buf: &mut Buffer) {
    let rain = prank.rain();
    let (columns, rows) = rain.size();
    for row in 0..rows.min(area.height as usize) {
        for column in 0..columns.min(area.width as usize / 2) {
            let Some(cell) = rain.cell(column, row) else {
                continue;
            };
            let style = if cell.intensity > 0.9 {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else if cell.intensity > 0.4 {
                Style::default().fg(Color::LightGreen)
            } else {
                Style::default().fg(Color::Green)
            };
            let x = area.x + column as u16 * 2;
            let y = area.y + row as u16;
            if let Some(target) = buf.cell_mut((x, y)) {
                target.set_char(cell.glyph).set_style(style);
            }
        }
    }
}

/// Draws the message box over the rain
fn render_overlay(overlay: &OverlayView, area: Rect, buf: &mut Buffer) {
    let boxed = centered(area, 44, 7);
    Clear.render(boxed, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightGreen));
    let inner = block.inner(boxed);
    block.render(boxed, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    if overlay.computing {
        Paragraph::new("COMPUTING...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::LightGreen))
            .render(rows[0], buf);
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .percent(u16::from(overlay.progress))
            .render(rows[2], buf);
    }
    if let Some(ready) = overlay.ready {
        Paragraph::new(ready)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .render(rows[0], buf);
    }
    if let Some(answer) = &overlay.answer {
        Paragraph::new(answer.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White))
            .render(rows[2], buf);
    }
}

/// Keyboard shortcuts for the help column
pub const HELP_SHORTCUTS: &[(&str, &str)] = &[
    ("Enter", "Evaluate"),
    ("Esc", "Clear (AC)"),
    ("Bksp", "Delete"),
    ("F1", "SHIFT"),
    ("F2", "ALPHA"),
    ("F3", "DRG"),
    ("F4", "MODE"),
    ("↑", "Replay"),
    ("a", "Ans"),
    ("m", "M+"),
    ("s c t", "sin cos tan"),
    ("l n", "log ln"),
    ("p e", "π e"),
    ("A-Z", "Recall"),
    ("?", "Toggle help"),
    ("Tab", "Switch"),
    ("Ctrl+C", "Quit"),
];
