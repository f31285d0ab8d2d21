//! Drawing of presented dialogs

use super::form::Form;
use super::layout::{input_rows, DialogLayout};
use super::Frame;
use crate::dialogs::{ChoiceOption, Content};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{block::Title, Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;

/// Dim everything behind the dialog stack
pub fn render_background(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
    let dim_style = Style::default()
        .bg(Color::Black)
        .add_modifier(Modifier::DIM);
    frame.render_widget(Block::default().style(dim_style), area);
}

/// Draw one dialog into its layout
pub fn draw(frame: &mut Frame, layout: &DialogLayout, form: &Form, focused: bool) {
    let request = form.responder().request();
    let area = layout.dialog_area;
    frame.render_widget(Clear, area);

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = truncate(
        &request.title().lines().join(" "),
        usize::from(area.width.saturating_sub(8)),
    );
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    if let Form::Modal(view) = form {
        if view.spec.show_close_button {
            block = block.title(Title::from("[x]").alignment(Alignment::Right));
        }
    }
    frame.render_widget(block, area);

    let inner = layout.content_area;
    let body_rows = match form {
        Form::Prompt(form) => input_rows(form.view().spec.long_prompt),
        Form::SingleChoice(form) => option_rows(form.options()),
        Form::MultiChoice(form) => option_rows(form.options()),
        Form::Alert(_) | Form::Confirm(_) | Form::Modal(_) => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),            // Message
            Constraint::Length(body_rows), // Controls
            Constraint::Length(1),         // Spacer
            Constraint::Length(1),         // Buttons
        ])
        .split(inner);

    frame.render_widget(message(request.message()), chunks[0]);

    match form {
        Form::Alert(view) => {
            buttons(frame, chunks[3], &[(&view.spec.yes_label, focused, true)]);
        }

        Form::Confirm(form) => {
            let yes = form.yes_focused();
            buttons(
                frame,
                chunks[3],
                &[
                    (&form.view().spec.no_label, focused && !yes, true),
                    (&form.view().spec.yes_label, focused && yes, true),
                ],
            );
        }

        Form::Prompt(form) => {
            let readonly = form.is_readonly();
            let mut value = form.value().to_string();
            if focused && !readonly {
                value.push('_');
            }
            let style = if readonly {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            let input = Paragraph::new(value)
                .style(style)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(input, chunks[1]);

            // Readonly prompts have nothing to save
            if !readonly {
                let enabled = form.can_submit();
                buttons(
                    frame,
                    chunks[3],
                    &[(&form.view().spec.save_label, focused && enabled, enabled)],
                );
            }
        }

        Form::SingleChoice(form) => {
            let lines = form
                .options()
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let marker = if form.selected() == Some(option.value.as_str()) {
                        "(•)"
                    } else {
                        "( )"
                    };
                    option_line(marker, option, focused && index == form.cursor())
                })
                .collect::<Vec<_>>();
            frame.render_widget(Paragraph::new(lines), chunks[1]);

            let enabled = form.can_apply();
            buttons(
                frame,
                chunks[3],
                &[(&form.view().spec.apply_label, focused && enabled, enabled)],
            );
        }

        Form::MultiChoice(form) => {
            let lines = form
                .options()
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let marker = if form.is_checked(index) { "[x]" } else { "[ ]" };
                    option_line(marker, option, focused && index == form.cursor())
                })
                .collect::<Vec<_>>();
            frame.render_widget(Paragraph::new(lines), chunks[1]);

            buttons(
                frame,
                chunks[3],
                &[(&form.view().spec.apply_label, focused, true)],
            );
        }

        Form::Modal(view) => {
            if view.spec.show_close_button {
                let hint = Paragraph::new("Ctrl+W: Close")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Right);
                frame.render_widget(hint, chunks[3]);
            }
        }
    }
}

fn message(content: &Content) -> Paragraph<'static> {
    let lines = content
        .lines()
        .into_iter()
        .map(|line| Line::from(line.to_string()))
        .collect::<Vec<_>>();
    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

fn option_rows(options: &[ChoiceOption]) -> u16 {
    u16::try_from(options.len()).unwrap_or(u16::MAX)
}

fn option_line(marker: &str, option: &ChoiceOption, under_cursor: bool) -> Line<'static> {
    let mut style = Style::default();
    if option.disabled {
        style = style.fg(Color::DarkGray);
    }
    if under_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Line::from(Span::styled(
        format!("{} {}", marker, option.label.lines().join(" ")),
        style,
    ))
}

/// Right-aligned row of `(label, highlighted, enabled)` buttons
fn buttons(frame: &mut Frame, area: Rect, buttons: &[(&String, bool, bool)]) {
    let mut spans = Vec::with_capacity(buttons.len() * 2);
    for (label, highlighted, enabled) in buttons {
        let style = if *highlighted {
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else if *enabled {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!("[ {} ]", label), style));
    }

    let row = Paragraph::new(Line::from(spans)).alignment(Alignment::Right);
    frame.render_widget(row, area);
}

/// Cut `text` to at most `width` columns, marking the cut with an ellipsis
fn truncate(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let columns = c.width().unwrap_or(0);
        if used + columns > width {
            truncated.pop();
            truncated.push('…');
            return truncated;
        }
        used += columns;
        truncated.push(c);
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long title", 6), "a lon…");
        assert_eq!(truncate("", 3), "");
    }
}
