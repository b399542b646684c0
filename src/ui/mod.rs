//! Line-oriented terminal presentation of the transcript.
//!
//! The presenter consumes the ordered turn sequence and the renderer views;
//! it owns layout only, never classification. User turns print inline after
//! the speaker label, bot grids print as box-drawn tables beneath it.

pub mod table;

use crate::core::render::{render, MessageView};
use crate::core::transcript::{Turn, TurnPayload};

/// Formats one turn as the lines to print for it.
pub fn turn_lines(turn: &Turn) -> Vec<String> {
    let label = turn.speaker.as_str().to_uppercase();
    match &turn.payload {
        TurnPayload::Text(text) => vec![format!("{label}: {text}")],
        TurnPayload::Display(display) => match render(display) {
            MessageView::Text(text) => vec![format!("{label}: {text}")],
            MessageView::Grid(grid) => {
                let mut lines = vec![format!("{label}:")];
                lines.extend(table::grid_lines(&grid));
                lines
            }
        },
    }
}
