//! Placement of stacked dialogs on the terminal

use crate::dialogs::{Content, DialogKind, DialogRequest};
use ratatui::layout::Rect;

/// Width of dialogs that are not modals
const DEFAULT_WIDTH: u16 = 56;
/// Width of a long prompt
const LONG_PROMPT_WIDTH: u16 = 80;
/// Rows of a long prompt's input, borders included
const LONG_INPUT_HEIGHT: u16 = 6;
/// Rows of a single line input, borders included
const INPUT_HEIGHT: u16 = 3;

/// Computed areas of one dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    /// Full dialog area including the border
    pub dialog_area: Rect,
    /// Area inside the border
    pub content_area: Rect,
}

impl DialogLayout {
    /// Center a `width` x `height` dialog in `available`, then shift it down
    /// and right by `depth * offset` cells, staying inside `available`.
    pub fn calculate(available: Rect, width: u16, height: u16, depth: usize, offset: u16) -> Self {
        let width = width.min(available.width);
        let height = height.min(available.height);

        let shift = u16::try_from(depth)
            .unwrap_or(u16::MAX)
            .saturating_mul(offset);
        let center_x = available.x + available.width.saturating_sub(width) / 2;
        let center_y = available.y + available.height.saturating_sub(height) / 2;
        let max_x = available.x + available.width.saturating_sub(width);
        let max_y = available.y + available.height.saturating_sub(height);

        let dialog_area = Rect {
            x: center_x.saturating_add(shift).min(max_x),
            y: center_y.saturating_add(shift / 2).min(max_y),
            width,
            height,
        };

        let content_area = Rect {
            x: dialog_area.x + 1,
            y: dialog_area.y + 1,
            width: dialog_area.width.saturating_sub(2),
            height: dialog_area.height.saturating_sub(2),
        };

        Self {
            dialog_area,
            content_area,
        }
    }

    /// Layout for `request` at `depth` in the stack
    pub fn for_request(request: &DialogRequest, available: Rect, depth: usize, offset: u16) -> Self {
        let width = preferred_width(request.kind()).min(available.width);
        let text_width = width.saturating_sub(2).max(1);
        let message_rows = wrapped_rows(request.message(), text_width);
        let height = message_rows + body_rows(request.kind()) + 2;

        Self::calculate(available, width, height, depth, offset)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let area = self.dialog_area;
        column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height
    }
}

pub fn preferred_width(kind: &DialogKind) -> u16 {
    match kind {
        DialogKind::Modal(spec) => spec.size.columns(),
        DialogKind::Prompt(spec) if spec.long_prompt => LONG_PROMPT_WIDTH,
        _ => DEFAULT_WIDTH,
    }
}

/// Rows below the message: the kind's own controls plus a spacer and
/// the button row
pub fn body_rows(kind: &DialogKind) -> u16 {
    let option_rows = |count: usize| u16::try_from(count).unwrap_or(u16::MAX);
    match kind {
        DialogKind::Alert(_) | DialogKind::Confirm(_) => 2,
        DialogKind::Prompt(spec) if spec.long_prompt => LONG_INPUT_HEIGHT + 2,
        DialogKind::Prompt(_) => INPUT_HEIGHT + 2,
        DialogKind::ChoiceSingle(spec) => option_rows(spec.options.len()).saturating_add(2),
        DialogKind::ChoiceMultiple(spec) => option_rows(spec.options.len()).saturating_add(2),
        DialogKind::Modal(spec) => {
            if spec.show_close_button {
                2
            } else {
                0
            }
        }
    }
}

pub fn input_rows(long_prompt: bool) -> u16 {
    if long_prompt {
        LONG_INPUT_HEIGHT
    } else {
        INPUT_HEIGHT
    }
}

/// Rows `content` occupies when wrapped to `width` columns
pub fn wrapped_rows(content: &Content, width: u16) -> u16 {
    let rows: usize = content
        .lines()
        .iter()
        .map(|line| textwrap::wrap(line, usize::from(width)).len().max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_at_depth_zero() {
        let layout = DialogLayout::calculate(Rect::new(0, 0, 100, 40), 50, 10, 0, 2);
        assert_eq!(layout.dialog_area, Rect::new(25, 15, 50, 10));
        assert_eq!(layout.content_area, Rect::new(26, 16, 48, 8));
    }

    #[test]
    fn test_stacked_dialogs_cascade() {
        let available = Rect::new(0, 0, 100, 40);
        let bottom = DialogLayout::calculate(available, 50, 10, 0, 2);
        let top = DialogLayout::calculate(available, 50, 10, 2, 2);
        assert_eq!(top.dialog_area.x, bottom.dialog_area.x + 4);
        assert_eq!(top.dialog_area.y, bottom.dialog_area.y + 2);
    }

    #[test]
    fn test_clamped_to_available_area() {
        let available = Rect::new(0, 0, 40, 12);
        let layout = DialogLayout::calculate(available, 60, 20, 10, 4);
        assert_eq!(layout.dialog_area, Rect::new(0, 0, 40, 12));
        assert!(layout.contains(39, 11));
        assert!(!layout.contains(40, 11));
    }

    #[test]
    fn test_wrapped_rows() {
        assert_eq!(wrapped_rows(&Content::from("short"), 20), 1);
        assert_eq!(wrapped_rows(&Content::from("one two three four"), 9), 3);
        let lines = Content::from(vec!["a".to_string(), String::new()]);
        assert_eq!(wrapped_rows(&lines, 20), 2);
    }
}
