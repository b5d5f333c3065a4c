//! Console tables for events, citizens and the popularity report
//!
//! Tables are drawn with rounded box characters. Rendering returns a
//! `String` so menu handlers can write it to any sink; colour is applied
//! after padding so ANSI codes never skew column widths.

use crossterm::style::{Color, Stylize};
use portalctl_core::models::{CitizenSummary, EventPopularity, UpcomingEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone)]
struct Column {
    header: String,
    align: Align,
    color: Option<Color>,
    bold: bool,
}

/// Box-drawn table
#[derive(Debug, Clone)]
pub struct Table {
    title: Option<String>,
    header_bg: Color,
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self {
            title: None,
            header_bg: Color::Blue,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn header_background(mut self, color: Color) -> Self {
        self.header_bg = color;
        self
    }

    pub fn column(mut self, header: impl Into<String>, align: Align) -> Self {
        self.columns.push(Column {
            header: header.into(),
            align,
            color: None,
            bold: false,
        });
        self
    }

    /// Add a column whose cells are coloured (and optionally bold).
    pub fn styled_column(
        mut self,
        header: impl Into<String>,
        align: Align,
        color: Option<Color>,
        bold: bool,
    ) -> Self {
        self.columns.push(Column {
            header: header.into(),
            align,
            color,
            bold,
        });
        self
    }

    /// Append a row; missing cells render empty, extra cells are dropped.
    pub fn row(&mut self, cells: Vec<String>) {
        let mut cells = cells;
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .map(|row| display_width(&row[i]))
                    .chain(std::iter::once(display_width(&col.header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Render to text; `styled` adds terminal colours.
    pub fn render(&self, styled: bool) -> String {
        let widths = self.widths();
        let inner: usize = widths.iter().map(|w| w + 2).sum::<usize>() + widths.len().saturating_sub(1);
        let mut out = String::new();

        if let Some(title) = &self.title {
            let line = pad(title, inner + 2, Align::Center);
            out.push_str(line.trim_end());
            out.push('\n');
        }

        let rule = |left: &str, mid: &str, right: &str| -> String {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            paint_border(&format!("{}{}{}", left, segments.join(mid), right), styled)
        };

        out.push_str(&rule("╭", "┬", "╮"));
        out.push('\n');

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| {
                let cell = format!(" {} ", pad(&col.header, *w, col.align));
                if styled {
                    cell.bold().white().on(self.header_bg).to_string()
                } else {
                    cell
                }
            })
            .collect();
        out.push_str(&self.line(&header, styled));
        out.push('\n');

        out.push_str(&rule("├", "┼", "┤"));
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .zip(row)
                .map(|((col, w), value)| {
                    let padded = pad(value, *w, col.align);
                    format!(" {} ", paint_cell(&padded, col, styled))
                })
                .collect();
            out.push_str(&self.line(&cells, styled));
            out.push('\n');
        }

        out.push_str(&rule("╰", "┴", "╯"));
        out.push('\n');
        out
    }

    fn line(&self, cells: &[String], styled: bool) -> String {
        let bar = paint_border("│", styled);
        format!("{bar}{}{bar}", cells.join(&bar))
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

fn paint_border(text: &str, styled: bool) -> String {
    if styled {
        text.cyan().to_string()
    } else {
        text.to_string()
    }
}

fn paint_cell(text: &str, col: &Column, styled: bool) -> String {
    if !styled {
        return text.to_string();
    }
    let mut content = text.stylize();
    if let Some(color) = col.color {
        content = content.with(color);
    }
    if col.bold {
        content = content.bold();
    }
    content.to_string()
}

/// Characters, not bytes: accented names must line up.
fn display_width(s: &str) -> usize {
    s.chars().count()
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let len = display_width(text);
    if len >= width {
        return text.to_string();
    }
    let gap = width - len;
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(gap)),
        Align::Right => format!("{}{}", " ".repeat(gap), text),
        Align::Center => {
            let left = gap / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
        }
    }
}

/// Upcoming events table (menu option 2)
pub fn events_table(events: &[UpcomingEvent]) -> Table {
    let mut table = Table::new()
        .title("📅 Upcoming Events - Portal da Cultura")
        .header_background(Color::Blue)
        .styled_column("ID", Align::Center, None, true)
        .styled_column("Event", Align::Left, Some(Color::Yellow), false)
        .column("Date", Align::Center)
        .styled_column("Seats", Align::Center, Some(Color::Green), false)
        .styled_column("Venue", Align::Left, Some(Color::Magenta), false);

    for event in events {
        table.row(vec![
            event.id.to_string(),
            event.name.clone(),
            event.display_date(),
            event
                .seats_left
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            event.venue.clone(),
        ]);
    }
    table
}

/// Popularity ranking table (menu option 4)
pub fn popularity_table(report: &[EventPopularity]) -> Table {
    let mut table = Table::new()
        .title("📈 Management Report - Most Popular Events")
        .header_background(Color::Magenta)
        .styled_column("Rank", Align::Center, Some(Color::Green), true)
        .column("Event ID", Align::Center)
        .styled_column("Event", Align::Left, Some(Color::Yellow), false)
        .styled_column("Total Enrolled", Align::Right, None, true);

    for line in report {
        table.row(vec![
            line.rank.to_string(),
            line.id.to_string(),
            line.name.clone(),
            line.total_enrolled.to_string(),
        ]);
    }
    table
}

/// Plain `ID | Name` listing used when choosing a citizen
pub fn citizen_list(citizens: &[CitizenSummary]) -> String {
    let mut out = format!("{:<5} | {:<40}\n", "ID", "Name");
    out.push_str(&"-".repeat(50));
    out.push('\n');
    for citizen in citizens {
        out.push_str(&format!("{:<5} | {:<40}\n", citizen.id, citizen.name));
    }
    out
}
