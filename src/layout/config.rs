//! Pixel metrics for the layout engine

use serde::{Deserialize, Serialize};

/// Every numeric constant the engine uses
///
/// The defaults are the reference metric set. A theme may override any
/// subset of fields (see [`crate::theme::Theme`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutMetrics {
    // Horizontal
    /// Spacing added around every participant box
    pub margin: f64,
    pub min_participant_width: f64,
    pub arrow_head_width: f64,
    pub occurrence_width: f64,
    /// Horizontal step between stacked activation bars
    pub occurrence_bar_side_width: f64,
    pub lifeline_width: f64,
    pub fragment_padding_x: f64,
    pub fragment_min_width: f64,
    pub min_diagram_width: f64,
    /// x position of the first participant
    pub left_margin: f64,

    // Vertical
    pub participant_header_height: f64,
    /// Gap between the participant header and the first statement
    pub lifeline_gap: f64,
    pub title_height: f64,
    pub message_height: f64,
    pub self_message_height: f64,
    pub occurrence_min_height: f64,
    /// Space below a nested block before the activation bar closes
    pub occurrence_closing_height: f64,
    pub creation_message_height: f64,
    pub assignment_label_height: f64,
    pub async_message_height: f64,
    pub self_async_message_height: f64,
    pub self_async_label_height: f64,
    pub return_message_height: f64,
    /// Gap between sibling statements
    pub statement_margin: f64,
    /// Extra gap between siblings of a `par` block
    pub par_gap: f64,
    pub fragment_header_height: f64,
    pub condition_label_height: f64,
    /// Label row of an else-if, else, catch or finally segment
    pub segment_label_height: f64,
    pub fragment_bottom_padding: f64,
    pub divider_height: f64,
    pub comment_line_height: f64,
    pub comment_heading_line_height: f64,
    pub diagram_bottom_padding: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            margin: 24.0,
            min_participant_width: 80.0,
            arrow_head_width: 10.0,
            occurrence_width: 15.0,
            occurrence_bar_side_width: 7.0,
            lifeline_width: 1.0,
            fragment_padding_x: 10.0,
            fragment_min_width: 100.0,
            min_diagram_width: 200.0,
            left_margin: 0.0,

            participant_header_height: 56.0,
            lifeline_gap: 16.0,
            title_height: 40.0,
            message_height: 31.0,
            self_message_height: 16.0,
            occurrence_min_height: 24.0,
            occurrence_closing_height: 20.0,
            creation_message_height: 38.0,
            assignment_label_height: 16.0,
            async_message_height: 16.0,
            self_async_message_height: 44.0,
            self_async_label_height: 10.0,
            return_message_height: 16.0,
            statement_margin: 1.0,
            par_gap: 1.0,
            fragment_header_height: 25.0,
            condition_label_height: 20.0,
            segment_label_height: 20.0,
            fragment_bottom_padding: 10.0,
            divider_height: 30.0,
            comment_line_height: 16.0,
            comment_heading_line_height: 24.0,
            diagram_bottom_padding: 20.0,
        }
    }
}

impl LayoutMetrics {
    /// Create metrics with the reference values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the participant margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the minimum participant box width
    pub fn with_min_participant_width(mut self, width: f64) -> Self {
        self.min_participant_width = width;
        self
    }

    /// Set the x position of the first participant
    pub fn with_left_margin(mut self, left_margin: f64) -> Self {
        self.left_margin = left_margin;
        self
    }

    /// Set the horizontal padding reserved per fragment nesting level
    pub fn with_fragment_padding_x(mut self, padding: f64) -> Self {
        self.fragment_padding_x = padding;
        self
    }

    /// Set the gap between sibling statements
    pub fn with_statement_margin(mut self, margin: f64) -> Self {
        self.statement_margin = margin;
        self
    }

    /// Top of the first statement in the root block
    pub fn first_statement_top(&self, has_title: bool) -> f64 {
        let title = if has_title { self.title_height } else { 0.0 };
        title + self.participant_header_height + self.lifeline_gap
    }
}
