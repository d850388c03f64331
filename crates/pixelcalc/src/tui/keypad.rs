//! Keypad widgets
//!
//! Both calculators draw their keys as an evenly divided grid inside a
//! bordered block; [`grid_hit_test`] maps mouse clicks back onto that grid.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier as TextModifier, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};

use crate::core::Modifier;
use crate::keypad::{KeyAction, Keypad, KeypadButton};
use crate::prank::{PrankKey, PRANK_LAYOUT};

/// Converts a click position to a (row, col) grid cell
///
/// Clicks on the one-cell border or in the slack past the last full button
/// return `None`.
#[must_use]
pub fn grid_hit_test(area: Rect, rows: usize, cols: usize, x: u16, y: u16) -> Option<(usize, usize)> {
    if rows == 0 || cols == 0 {
        return None;
    }
    if x < area.x || y < area.y || x >= area.x + area.width || y >= area.y + area.height {
        return None;
    }

    let rel_x = x - area.x;
    let rel_y = y - area.y;

    // Account for border (1 char on each side)
    if rel_x == 0 || rel_y == 0 || rel_x >= area.width - 1 || rel_y >= area.height - 1 {
        return None;
    }

    let btn_width = (area.width - 2) / cols as u16;
    let btn_height = (area.height - 2) / rows as u16;
    if btn_width == 0 || btn_height == 0 {
        return None;
    }

    let col = ((rel_x - 1) / btn_width) as usize;
    let row = ((rel_y - 1) / btn_height) as usize;
    (row < rows && col < cols).then_some((row, col))
}

fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn pressed_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(TextModifier::BOLD)
}

/// Scientific keypad widget
///
/// Keys show the legend of the active layer; with room to spare the SHIFT
/// and ALPHA legends go on the line above.
#[derive(Debug)]
pub struct KeypadWidget<'a> {
    keypad: &'a Keypad,
    modifier: Modifier,
}

impl<'a> KeypadWidget<'a> {
    /// Creates a keypad widget showing the layer for `modifier`
    #[must_use]
    pub const fn new(keypad: &'a Keypad, modifier: Modifier) -> Self {
        Self { keypad, modifier }
    }

    fn style(&self, button: &KeypadButton) -> Style {
        if button.pressed {
            return pressed_style();
        }
        match button.resolve(self.modifier) {
            KeyAction::Digit(_) | KeyAction::Decimal => Style::default().fg(Color::White),
            KeyAction::Operator(_) => Style::default().fg(Color::Yellow),
            KeyAction::Equals => Style::default().fg(Color::Green),
            KeyAction::Clear | KeyAction::Delete => Style::default().fg(Color::Red),
            KeyAction::Shift => Style::default().fg(Color::LightYellow),
            KeyAction::Alpha | KeyAction::Recall(_) => Style::default().fg(Color::LightRed),
            _ => Style::default().fg(Color::Cyan),
        }
    }
}

impl Widget for KeypadWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(" Keypad ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .render(area, buf);

        let (rows, cols) = self.keypad.dimensions();
        let inner = inner(area);
        if inner.width < cols as u16 * 3 || inner.height < rows as u16 {
            return; // Too small to render
        }

        let btn_width = inner.width / cols as u16;
        let btn_height = inner.height / rows as u16;
        let legend_style = Style::default().fg(Color::DarkGray);

        for button in self.keypad.buttons() {
            let x = inner.x + button.col as u16 * btn_width;
            let y = inner.y + button.row as u16 * btn_height;

            let label = button.resolve(self.modifier).label();
            let width = label.chars().count() as u16;
            let label_x = x + btn_width.saturating_sub(width) / 2;
            let label_y = y + btn_height.saturating_sub(1);
            buf.set_span(label_x, label_y, &Span::styled(label, self.style(button)), btn_width);

            if btn_height >= 2 && self.modifier == Modifier::None {
                let legend = button.upper_legend();
                if !legend.is_empty() {
                    let legend_x = x + btn_width.saturating_sub(legend.chars().count() as u16) / 2;
                    buf.set_span(legend_x, label_y - 1, &Span::styled(legend, legend_style), btn_width);
                }
            }
        }
    }
}

/// Prank keypad widget
#[derive(Debug)]
pub struct PrankKeypadWidget {
    pressed: Option<PrankKey>,
}

impl PrankKeypadWidget {
    /// Creates the widget, highlighting `pressed`
    #[must_use]
    pub const fn new(pressed: Option<PrankKey>) -> Self {
        Self { pressed }
    }
}

impl Widget for PrankKeypadWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .render(area, buf);

        let rows = PRANK_LAYOUT.len() as u16;
        let cols = PRANK_LAYOUT.iter().map(|r| r.len()).max().unwrap_or(1) as u16;
        let inner = inner(area);
        if inner.width < cols * 3 || inner.height < rows {
            return;
        }
        let btn_width = inner.width / cols;
        let btn_height = inner.height / rows;

        for (row, keys) in PRANK_LAYOUT.iter().enumerate() {
            for (col, key) in keys.iter().enumerate() {
                let style = if self.pressed == Some(*key) {
                    pressed_style()
                } else {
                    match key {
                        PrankKey::Equals => Style::default().fg(Color::LightGreen),
                        PrankKey::Operator(_) => Style::default().fg(Color::Yellow),
                        PrankKey::Digit(_) | PrankKey::Decimal => Style::default().fg(Color::Green),
                        _ => Style::default().fg(Color::Magenta),
                    }
                };
                let label = format!("[{}]", key.label());
                let x = inner.x + col as u16 * btn_width;
                let y = inner.y + row as u16 * btn_height + btn_height / 2;
                let label_x = x + btn_width.saturating_sub(label.chars().count() as u16) / 2;
                buf.set_span(label_x, y, &Span::styled(label, style), btn_width);
            }
        }
    }
}
