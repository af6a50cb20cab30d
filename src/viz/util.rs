//! Chart constants: the fixed series palette and recession shading spans.

use chrono::{Datelike, NaiveDate};

/// Dark2 qualitative palette as used on the dashboard:
/// nation green, state purple, metro orange.
pub const NATION_COLOR: (u8, u8, u8) = (0x1b, 0x9e, 0x77);
pub const STATE_COLOR: (u8, u8, u8) = (0x75, 0x70, 0xb3);
pub const METRO_COLOR: (u8, u8, u8) = (0xd9, 0x5f, 0x02);

/// A shaded contraction span, in fractional-year x units.
#[derive(Debug, Clone, Copy)]
pub struct Recession {
    pub x0: f64,
    pub x1: f64,
    /// Anchor for the annotation text above the band.
    pub label_x: f64,
    pub label: &'static str,
    /// Shown when the visible year range covers `[visible_from, visible_to]`.
    pub visible_from: i32,
    pub visible_to: i32,
}

/// Contractions shaded on annual charts.
pub const ANNUAL_RECESSIONS: [Recession; 3] = [
    Recession {
        x0: 2001.3,
        x1: 2001.9,
        label_x: 2001.0,
        label: "Tech Bust\nRecession",
        visible_from: 2001,
        visible_to: 2002,
    },
    Recession {
        x0: 2008.0,
        x1: 2009.0,
        label_x: 2008.0,
        label: "Great\nRecession",
        visible_from: 2008,
        visible_to: 2009,
    },
    Recession {
        x0: 2020.0,
        x1: 2020.4,
        label_x: 2019.8,
        label: "COVID\nRecession",
        visible_from: 2020,
        visible_to: 2021,
    },
];

/// The COVID contraction on the monthly axis (February through April 2020).
pub const MONTHLY_COVID: Recession = Recession {
    x0: 2020.0 + 1.0 / 12.0,
    x1: 2020.0 + 3.0 / 12.0,
    label_x: 2020.0 + 1.5 / 12.0,
    label: "COVID\nRecession",
    visible_from: 2020,
    visible_to: 2020,
};

/// Fractional-year x-coordinate of a date on the monthly axis.
pub fn month_x(date: NaiveDate) -> f64 {
    date.year() as f64 + date.month0() as f64 / 12.0
}
