use blockdrop_engine::CellColor;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::widgets::style;

/// One board cell drawn as a 2x1 patch of terminal characters.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const fn width() -> u16 {
        2
    }

    pub const fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: Option<CellColor>) -> Self {
        match cell {
            None => Self {
                style: style::EMPTY_DOT,
                symbol: ".",
            },
            Some(color) => Self {
                style: style::cell(color),
                symbol: "",
            },
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // A Paragraph fills the whole cell area, not just the symbol.
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
