//! Figure assembly and rendering for the nation/state/metro comparison
//! charts.
//!
//! Assembly is pure: [`trend_figure`] and [`monthly_figure`] turn a working
//! panel into a [`Figure`] — series points, recession bands, and label
//! annotations whose positions come from the placement engine. [`render`]
//! draws a figure to SVG or PNG with plotters.

pub mod util;

use crate::aggregate::aggregate_annual;
use crate::error::Error;
use crate::geo::{GeographyTriple, metro_label};
use crate::labels::{self, LabelKind, Offset, TripleOffsets};
use crate::models::{CAGR_COLUMN, INDEX_COLUMN, Observation};
use crate::panel::Panel;
use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Once;
use util::{ANNUAL_RECESSIONS, METRO_COLOR, MONTHLY_COVID, NATION_COLOR, Recession, STATE_COLOR, month_x};

/// One-time registration for a fallback "sans-serif" font when using the
/// `ab_glyph` text path. Required because `ab_glyph` doesn't discover OS
/// fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub title: String,
    pub min: f64,
    pub max: f64,
}

/// One plotted geography.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub name: String,
    pub color: (u8, u8, u8),
    pub points: Vec<(f64, f64)>,
}

/// A shaded vertical band with a caption above it.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub label: String,
    pub label_x: f64,
}

/// A colored text placed at a data coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: (u8, u8, u8),
}

/// Renderable chart object handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Vec<SeriesLine>,
    pub bands: Vec<Band>,
    pub annotations: Vec<Annotation>,
}

fn display_name(triple: &GeographyTriple, metro_name: &str, area: &str) -> String {
    if area == triple.metro {
        metro_name.to_string()
    } else {
        area.to_string()
    }
}

fn offsets_by_name(
    triple: &GeographyTriple,
    metro_name: &str,
    offsets: &TripleOffsets,
) -> BTreeMap<String, Offset> {
    BTreeMap::from([
        (triple.nation.clone(), offsets.nation),
        (triple.state.clone(), offsets.state),
        (metro_name.to_string(), offsets.metro),
    ])
}

/// y-range of the plot window. Growth-index charts float their floor just
/// under the 100 baseline; everything else is anchored at zero.
fn y_window(kind: LabelKind, variable: &str, ymin: f64, yheight: f64) -> (f64, f64) {
    if variable == INDEX_COLUMN {
        ((ymin - 10.0).min(90.0), yheight + 5.0)
    } else if kind == LabelKind::Rate {
        (0.0, yheight + 1.0)
    } else {
        (0.0, yheight + 5.0)
    }
}

fn band_from(recession: &Recession, top: f64) -> Band {
    Band {
        x0: recession.x0,
        x1: recession.x1,
        top,
        label: recession.label.to_string(),
        label_x: recession.label_x,
    }
}

/// Assemble the annual comparison chart for one variable.
///
/// `panel` is the working copy: aligned, restricted to the triple, rebased
/// (and CAGR'd when an index chart is wanted), still at source cadence —
/// this function resamples it to annual frequency.
#[allow(clippy::too_many_arguments)]
pub fn trend_figure(
    panel: &Panel,
    triple: &GeographyTriple,
    variable: &str,
    kind: LabelKind,
    title: &str,
    y_axis_title: &str,
    show_recessions: bool,
    offsets: &TripleOffsets,
) -> Result<Figure, Error> {
    let geo_type = panel
        .geo_type_of(&triple.metro)
        .ok_or_else(|| Error::UnknownGeography(triple.metro.clone()))?;
    let metro_name = metro_label(&triple.metro, geo_type);
    let annual = aggregate_annual(&panel.select_areas(&triple.names()));
    let scale = if kind == LabelKind::PerCapitaLevel {
        1e-3
    } else {
        1.0
    };

    let palette = [
        (triple.nation.as_str(), NATION_COLOR),
        (triple.state.as_str(), STATE_COLOR),
        (triple.metro.as_str(), METRO_COLOR),
    ];

    let mut series = Vec::with_capacity(3);
    let mut latest: Vec<(String, f64, Option<f64>)> = Vec::with_capacity(3);
    for (area, color) in palette {
        let rows: Vec<&Observation> = annual
            .rows()
            .iter()
            .filter(|o| o.area == area && o.values.contains_key(variable))
            .collect();
        let last = rows
            .last()
            .ok_or_else(|| Error::DataGap(format!("no {} values for {}", variable, area)))?;
        let name = display_name(triple, &metro_name, area);
        // CAGR only annotates growth-index charts; other variables carry
        // no growth rate even when the column is present.
        let cagr = if variable == INDEX_COLUMN {
            last.value(CAGR_COLUMN)
        } else {
            None
        };
        latest.push((
            name.clone(),
            last.value(variable).unwrap_or_default() * scale,
            cagr,
        ));
        series.push(SeriesLine {
            name,
            color,
            points: rows
                .iter()
                .filter_map(|o| o.value(variable).map(|v| (o.year as f64, v * scale)))
                .collect(),
        });
    }

    let (ymin, ymax) = extent(&series);
    let (xmin, xmax) = annual.year_range().unwrap_or((2000, 2021));
    let xmax = xmax.max(2021);
    let mut yheight = ymax + (ymax - ymin) / 12.0;
    if kind == LabelKind::PerCapitaLevel {
        yheight += 5.0;
    }
    let (y_lo, y_hi) = y_window(kind, variable, ymin, yheight);

    let bands = if show_recessions {
        ANNUAL_RECESSIONS
            .iter()
            .filter(|r| xmin <= r.visible_from && xmax >= r.visible_to)
            .map(|r| band_from(r, yheight))
            .collect()
    } else {
        Vec::new()
    };

    let placed = labels::place_labels(
        [
            (latest[0].0.as_str(), latest[0].1),
            (latest[1].0.as_str(), latest[1].1),
            (latest[2].0.as_str(), latest[2].1),
        ],
        kind,
        ymax,
        &offsets_by_name(triple, &metro_name, offsets),
    );
    let label_x = xmax as f64;
    let annotations = latest
        .iter()
        .zip(series.iter())
        .map(|((name, value, cagr), line)| Annotation {
            x: label_x,
            y: placed.get(name).copied().unwrap_or(*value),
            text: format!("{}, {}", name, kind.format_value(*value, *cagr)),
            color: line.color,
        })
        .collect();

    Ok(Figure {
        title: title.to_string(),
        x_axis: AxisSpec {
            title: "Calendar Year".to_string(),
            min: xmin as f64,
            max: xmax as f64 + 1.0,
        },
        y_axis: AxisSpec {
            title: y_axis_title.to_string(),
            min: y_lo,
            max: y_hi,
        },
        series,
        bands,
        annotations,
    })
}

/// Assemble the monthly comparison chart: source-cadence points on a
/// fractional-year axis, labels at each geography's latest month.
#[allow(clippy::too_many_arguments)]
pub fn monthly_figure(
    panel: &Panel,
    triple: &GeographyTriple,
    variable: &str,
    kind: LabelKind,
    title: &str,
    y_axis_title: &str,
    show_recessions: bool,
    offsets: &TripleOffsets,
) -> Result<Figure, Error> {
    let geo_type = panel
        .geo_type_of(&triple.metro)
        .ok_or_else(|| Error::UnknownGeography(triple.metro.clone()))?;
    let metro_name = metro_label(&triple.metro, geo_type);
    let monthly = panel.select_areas(&triple.names());

    let palette = [
        (triple.nation.as_str(), NATION_COLOR),
        (triple.state.as_str(), STATE_COLOR),
        (triple.metro.as_str(), METRO_COLOR),
    ];

    let mut series = Vec::with_capacity(3);
    let mut latest: Vec<(String, f64, String)> = Vec::with_capacity(3);
    for (area, color) in palette {
        let mut rows: Vec<&Observation> = monthly
            .rows()
            .iter()
            .filter(|o| o.area == area && o.values.contains_key(variable))
            .collect();
        rows.sort_by_key(|o| o.date);
        let last = rows
            .last()
            .ok_or_else(|| Error::DataGap(format!("no {} values for {}", variable, area)))?;
        let name = display_name(triple, &metro_name, area);
        latest.push((
            name.clone(),
            last.value(variable).unwrap_or_default(),
            last.date.format("%b %Y").to_string(),
        ));
        series.push(SeriesLine {
            name,
            color,
            points: rows
                .iter()
                .filter_map(|o| o.value(variable).map(|v| (month_x(o.date), v)))
                .collect(),
        });
    }

    let (ymin, ymax) = extent(&series);
    let (xlo, xhi) = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(x, _)| *x))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    let yheight = ymax + (ymax - ymin) / 12.0;
    let (y_lo, y_hi) = y_window(kind, variable, ymin, yheight);

    let bands = if show_recessions && xlo <= MONTHLY_COVID.x0 && xhi >= MONTHLY_COVID.x1 {
        vec![band_from(&MONTHLY_COVID, yheight)]
    } else {
        Vec::new()
    };

    let placed = labels::place_labels(
        [
            (latest[0].0.as_str(), latest[0].1),
            (latest[1].0.as_str(), latest[1].1),
            (latest[2].0.as_str(), latest[2].1),
        ],
        kind,
        ymax,
        &offsets_by_name(triple, &metro_name, offsets),
    );
    let annotations = latest
        .iter()
        .zip(series.iter())
        .map(|((name, value, month), line)| Annotation {
            x: xhi,
            y: placed.get(name).copied().unwrap_or(*value),
            text: format!("{} ({}), {:.1}", name, month, value),
            color: line.color,
        })
        .collect();

    Ok(Figure {
        title: title.to_string(),
        x_axis: AxisSpec {
            title: "Date".to_string(),
            min: xlo,
            max: xhi + 0.5,
        },
        y_axis: AxisSpec {
            title: y_axis_title.to_string(),
            min: y_lo,
            max: y_hi,
        },
        series,
        bands,
        annotations,
    })
}

fn extent(series: &[SeriesLine]) -> (f64, f64) {
    series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

/// Draw a figure to `out_path`; `.svg` gets the SVG backend, anything else
/// the bitmap backend.
pub fn render<P: AsRef<Path>>(figure: &Figure, out_path: P, width: u32, height: u32) -> Result<()> {
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_figure(root, figure)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_figure(root, figure)?;
    }
    Ok(())
}

fn draw_figure<DB>(root: DrawingArea<DB, Shift>, figure: &Figure) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let x_ticks = ((figure.x_axis.max - figure.x_axis.min) as usize + 1).min(12);
    let y_label_fmt = |v: &f64| {
        let a = v.abs();
        let prec = if a >= 100.0 {
            0
        } else if a >= 10.0 {
            1
        } else {
            2
        };
        format!("{:.*}", prec, *v)
    };

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(&figure.title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 72)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(
            figure.x_axis.min..figure.x_axis.max,
            figure.y_axis.min..figure.y_axis.max,
        )
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(figure.x_axis.title.as_str())
        .y_desc(figure.y_axis.title.as_str())
        .x_labels(x_ticks)
        .y_labels(10)
        .x_label_formatter(&|x| (x.round() as i32).to_string())
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    // Bands go in first so series draw on top of the shading.
    for band in &figure.bands {
        chart
            .draw_series(std::iter::once(Rectangle::new(
                // From the visible floor, not zero: index charts float
                // their floor and nothing clips the rectangle for us.
                [(band.x0, figure.y_axis.min), (band.x1, band.top)],
                RGBColor(128, 128, 128).mix(0.25).filled(),
            )))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        for (i, line) in band.label.lines().enumerate() {
            chart
                .draw_series(std::iter::once(
                    EmptyElement::at((band.label_x, band.top))
                        + Text::new(
                            line.to_string(),
                            (20, -36 + i as i32 * 16),
                            (FontFamily::SansSerif, 14),
                        ),
                ))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
    }

    for s in &figure.series {
        let color = RGBColor(s.color.0, s.color.1, s.color.2);
        chart
            .draw_series(LineSeries::new(s.points.clone(), color.stroke_width(3)))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        chart
            .draw_series(
                s.points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 4, color.filled())),
            )
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    for a in &figure.annotations {
        let color = RGBColor(a.color.0, a.color.1, a.color.2);
        let style = TextStyle::from(("sans-serif", 16).into_font()).color(&color);
        chart
            .draw_series(std::iter::once(
                EmptyElement::at((a.x, a.y)) + Text::new(a.text.clone(), (12, -8), style),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}
