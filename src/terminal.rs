/*
 * Copyright (C) 2024 Clownvin <123clownvin@gmail.com>
 *
 * This file is part of Vocabr.
 *
 * Vocabr is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Vocabr is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Vocabr.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::io::Stdout;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Widget, Terminal};

use crate::UiError;

///Raw mode, alternate screen and mouse capture for as long as it lives.
///Each step that succeeded is undone on drop, in reverse order.
pub struct TerminalWrapper {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    #[allow(unused)]
    restore: Restore,
}

#[derive(Default)]
struct Restore {
    raw_mode: bool,
    alt_screen: bool,
    mouse_capture: bool,
}

impl TerminalWrapper {
    pub fn new() -> Result<TerminalWrapper, UiError> {
        let mut restore = Restore::default();

        enable_raw_mode()?;
        restore.raw_mode = true;

        execute!(std::io::stdout(), EnterAlternateScreen)?;
        restore.alt_screen = true;

        execute!(std::io::stdout(), EnableMouseCapture)?;
        restore.mouse_capture = true;

        let terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

        Ok(TerminalWrapper { terminal, restore })
    }

    pub fn render_widget(&mut self, widget: impl Widget) -> Result<(), UiError> {
        self.terminal
            .draw(|frame| frame.render_widget(widget, frame.area()))?;
        Ok(())
    }
}

impl Drop for Restore {
    fn drop(&mut self) {
        if self.mouse_capture {
            let _ = execute!(std::io::stdout(), DisableMouseCapture);
        }
        if self.alt_screen {
            let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        }
        if self.raw_mode {
            let _ = disable_raw_mode();
        }
    }
}
