//! Self-contained HTML document: one heading, summary line and chart per day.

use std::fmt::Write as _;

use heartchart_core::formatting::{format_day_heading, format_day_summary};
use heartchart_core::models::{Bounds, DayBucket};
use tracing::debug;

use crate::chart::{render_day_chart, ChartScale};
use crate::themes::Theme;

/// Presentation settings for [`render_document`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub theme: Theme,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Heart rate".to_string(),
            width: 800,
            height: 200,
            theme: Theme::default(),
        }
    }
}

/// Escape text for use in element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render every day as a section of one HTML page.
///
/// All charts share `bounds`, so their axes line up when scrolled through.
pub fn render_document(days: &[DayBucket], bounds: &Bounds, options: &RenderOptions) -> String {
    let theme = &options.theme;
    let title = escape_html(&options.title);
    let scale = ChartScale::new(*bounds, options.width, options.height);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", title);
    let _ = writeln!(
        html,
        "<style>\n\
         body {{ background: {bg}; color: {fg}; font-family: sans-serif; margin: 2em; }}\n\
         h2 {{ font-size: 1.1em; margin-bottom: 0.2em; }}\n\
         .summary {{ color: {muted}; margin-top: 0; }}\n\
         .chart text {{ fill: {muted}; font-size: 11px; }}\n\
         </style>",
        bg = theme.background,
        fg = theme.text,
        muted = theme.muted,
    );
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{}</h1>", title);

    for day in days {
        html.push_str("<section class=\"day\">\n");
        let _ = writeln!(html, "<h2>{}</h2>", format_day_heading(day.date));
        let _ = writeln!(
            html,
            "<p class=\"summary\">{}</p>",
            format_day_summary(day.samples.len(), day.heart_rate_range())
        );
        html.push_str(&render_day_chart(day, &scale, theme));
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    debug!(days = days.len(), bytes = html.len(), "rendered document");
    html
}
