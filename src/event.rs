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

use std::time::Duration;

use crossterm::event::{self, Event};

use crate::UiError;

///Blocks until `match_fn` accepts an event. Events it rejects are dropped.
pub fn next_matching<T>(mut match_fn: impl FnMut(Event) -> Option<T>) -> Result<T, UiError> {
    loop {
        if event::poll(Duration::MAX)? {
            if let Some(value) = match_fn(event::read()?) {
                return Ok(value);
            }
        }
    }
}

///Drops every event already queued, so input typed during a redraw is not replayed.
pub fn drain_pending() -> Result<(), UiError> {
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    Ok(())
}
