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

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Gauge, Paragraph, Widget, Wrap},
};

use crate::{deck::Item, session::Mode, stats::DeckMetrics, study::Study};

///Everything one frame shows, copied out of the study so rendering borrows nothing.
pub(super) struct CardView {
    label: String,
    key: String,
    mode: Mode,
    progress: Option<(usize, usize)>,
    item: Option<Item>,
    flipped: bool,
    metrics: DeckMetrics,
}

impl CardView {
    pub fn capture(study: &mut Study, flipped: bool) -> Self {
        let progress = study.progress();
        let item = study.current_item().cloned();
        let (label, key) = match (study.active_deck(), study.session().deck()) {
            (Some(deck), _) => (deck.label.clone(), deck.key().to_string()),
            (None, Some(key)) => ("Unknown deck".to_owned(), key.to_string()),
            (None, None) => ("No decks".to_owned(), "-".to_owned()),
        };

        Self {
            label,
            key,
            mode: study.session().mode(),
            progress,
            item,
            flipped,
            metrics: study.metrics(),
        }
    }
}

pub(super) struct ReviewWidget<'a> {
    view: &'a CardView,
}

impl<'a> ReviewWidget<'a> {
    pub fn new(view: &'a CardView) -> Self {
        Self { view }
    }

    fn header(&self) -> Text<'a> {
        let view = self.view;
        let position = match view.progress {
            Some((current, total)) => format!("{current}/{total}"),
            None => "0/0".to_owned(),
        };

        Text::from(vec![
            Line::from(Span::styled(
                view.label.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{} · {} · {position}", view.key, view.mode)),
        ])
    }

    fn counters(&self) -> Line<'a> {
        let metrics = &self.view.metrics;
        Line::from(format!(
            "Reviewed: {}   Learned: {}   Accuracy: {}%   Marked for review: {}",
            metrics.reviewed, metrics.learned, metrics.accuracy_percent, metrics.review_count
        ))
    }

    fn card(&self) -> (String, Text<'a>) {
        let Some(item) = self.view.item.as_ref() else {
            let message = match self.view.mode {
                Mode::ReviewOnly => "No items are marked for review.",
                Mode::All => "This deck has no items.",
            };
            return ("Empty".to_owned(), Text::from(message));
        };

        if self.view.flipped {
            let mut text = Text::from(Line::from(Span::styled(
                item.translation.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            text.push_line(Line::default());
            text.push_line(Line::from(item.example_in_source.clone()));
            text.push_line(Line::from(Span::styled(
                item.example_in_target.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
            (format!("#{} Back", item.id), text)
        } else {
            let mut text = Text::from(Line::from(Span::styled(
                item.word.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            text.push_line(Line::default());
            text.push_line(Line::from(Span::styled(
                "Space or click to flip",
                Style::default().fg(Color::DarkGray),
            )));
            (format!("#{} Front", item.id), text)
        }
    }
}

const HELP: &str =
    "←/h review  →/l learned  drag to swipe  t review-only  tab/[ ] deck  R reset  q quit";

impl<'a> Widget for ReviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let (header_area, gauge_area, counters_area, card_area, help_area) = {
            let layout = Layout::new(
                Direction::Vertical,
                [
                    Constraint::Length(2),
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Min(5),
                    Constraint::Length(1),
                ],
            );

            let split = layout.split(area);
            (split[0], split[1], split[2], split[3], split[4])
        };

        Paragraph::new(self.header())
            .centered()
            .render(header_area, buf);

        let metrics = &self.view.metrics;
        Gauge::default()
            .block(Block::bordered().title("Progress"))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(metrics.progress_percent.min(100) as u16)
            .label(format!(
                "Learned {} of {} ({}%)",
                metrics.learned, metrics.total_items, metrics.progress_percent
            ))
            .render(gauge_area, buf);

        Paragraph::new(self.counters())
            .centered()
            .render(counters_area, buf);

        let (title, text) = self.card();
        Paragraph::new(text)
            .block(Block::bordered().title(title))
            .wrap(Wrap { trim: false })
            .centered()
            .render(card_area, buf);

        Paragraph::new(HELP)
            .style(Style::default().fg(Color::DarkGray))
            .centered()
            .render(help_area, buf);
    }
}
