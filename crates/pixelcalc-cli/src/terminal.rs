//! Terminal setup and the TUI event loop

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pixelcalc::tui::{keypad_area, rain_area, render, App, InputHandler};
use ratatui::{backend::Backend, backend::CrosstermBackend, layout::Rect, Terminal};

use crate::error::CliResult;

/// Takes over the terminal, runs `app` until it quits, then restores the terminal
pub fn run(app: App, frame_interval: Duration) -> CliResult<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        disable_raw_mode()?;
        return Err(err.into());
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, app, frame_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Event loop: draw, wait for input up to one frame, advance the timers
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    frame_interval: Duration,
) -> CliResult<()> {
    let input = InputHandler::new();
    let mut area = screen(terminal)?;
    app.fit_rain(rain_area(area));
    let mut last_tick = Instant::now();

    tracing::info!(widget = %app.widget(), "terminal session started");
    while !app.should_quit() {
        terminal.draw(|frame| render(&app, frame))?;

        let timeout = frame_interval.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    let ui_event = input.handle_key(key, app.widget());
                    tracing::trace!(?ui_event, "key event");
                    app.handle_event(ui_event);
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => app.click(keypad_area(&app, area), column, row),
                Event::Resize(..) => {
                    area = screen(terminal)?;
                    app.fit_rain(rain_area(area));
                }
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame_interval {
            app.tick(elapsed);
            last_tick = Instant::now();
        }
    }
    tracing::info!("terminal session ended");
    Ok(())
}

fn screen<B: Backend>(terminal: &Terminal<B>) -> CliResult<Rect> {
    let size = terminal.size()?;
    Ok(Rect::new(0, 0, size.width, size.height))
}
