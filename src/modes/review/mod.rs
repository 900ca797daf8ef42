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

use chrono::Local;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use swipe::{Swipe, SwipeOutcome};
use widget::{CardView, ReviewWidget};

use crate::{
    event::{drain_pending, next_matching},
    srs::Decision,
    study::Study,
    terminal::TerminalWrapper,
    UiError,
};

mod swipe;
mod widget;

///Runs the card loop until the user quits.
pub fn review(term: &mut TerminalWrapper, study: &mut Study) -> Result<(), UiError> {
    let mut flipped = false;
    let mut swipe = Swipe::default();

    loop {
        let view = CardView::capture(study, flipped);
        term.render_widget(ReviewWidget::new(&view))?;

        let input = next_matching(match_user_input)?;

        match input {
            UserInput::Flip => flipped = !flipped,
            UserInput::Decide(decision) => {
                if commit(study, decision)? {
                    flipped = false;
                }
            }
            UserInput::ToggleMode => {
                study.toggle_mode();
                flipped = false;
            }
            UserInput::NextDeck => {
                study.next_deck();
                flipped = false;
            }
            UserInput::PrevDeck => {
                study.prev_deck();
                flipped = false;
            }
            UserInput::Reset => {
                study.reset_deck();
                flipped = false;
            }
            UserInput::Press(column) => swipe.press(column),
            UserInput::Release(column) => match swipe.release(column) {
                Some(SwipeOutcome::Commit(decision)) => {
                    if commit(study, decision)? {
                        flipped = false;
                    }
                }
                Some(SwipeOutcome::Click) => flipped = !flipped,
                Some(SwipeOutcome::Cancel) | None => {}
            },
            UserInput::Resize => continue,
            UserInput::Quit => break,
        }
    }

    Ok(())
}

fn commit(study: &mut Study, decision: Decision) -> Result<bool, UiError> {
    let committed = study.decide(decision, Local::now().date_naive());
    if committed {
        // Held keys queue repeats; drop them so one press decides one card.
        drain_pending()?;
    }
    Ok(committed)
}

#[derive(Debug, PartialEq)]
enum UserInput {
    Flip,
    Decide(Decision),
    ToggleMode,
    NextDeck,
    PrevDeck,
    Reset,
    Press(u16),
    Release(u16),
    Resize,
    Quit,
}

fn match_user_input(event: Event) -> Option<UserInput> {
    match event {
        Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            code,
            ..
        }) => match code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(UserInput::Flip),
            KeyCode::Right | KeyCode::Char('l') => Some(UserInput::Decide(Decision::Learned)),
            KeyCode::Left | KeyCode::Char('h') => Some(UserInput::Decide(Decision::Review)),
            KeyCode::Char('t') => Some(UserInput::ToggleMode),
            KeyCode::Tab | KeyCode::Char(']') => Some(UserInput::NextDeck),
            KeyCode::BackTab | KeyCode::Char('[') => Some(UserInput::PrevDeck),
            KeyCode::Char('R') => Some(UserInput::Reset),
            KeyCode::Esc | KeyCode::Char('q') => Some(UserInput::Quit),
            _ => None,
        },
        Event::Resize(_, _) => Some(UserInput::Resize),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            ..
        }) => Some(UserInput::Press(column)),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column,
            ..
        }) => Some(UserInput::Release(column)),
        _ => None,
    }
}
