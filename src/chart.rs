use crate::data::INSTANCE_AXIS;
use crate::table::Table;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

// Font sizes
// NOTE: 45 y tick labels share the plot height, so tick labels stay small.
const TITLE_FONT_SIZE: u32 = 40;
const AXIS_LABEL_FONT_SIZE: u32 = 24;
const TICK_LABEL_FONT_SIZE: u32 = 14;
const LEGEND_FONT_SIZE: u32 = 18;

// Layout tuning
const DEFAULT_MARGIN_BOTTOM: u32 = 40;
const DEFAULT_X_LABEL_AREA_SIZE: u32 = 60;
const DEFAULT_Y_LABEL_AREA_SIZE: u32 = 80;

const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: u32 = 5;

/// Default canvas size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1200, 900);

pub const SPEEDUP_TITLE: &str = "Gráfica de Speedup";
pub const SPEEDUP_Y_LABEL: &str = "Speedup";
pub const SPEEDUP_TICK_STEP: f64 = 0.5;
pub const SPEEDUP_TICK_MAX: f64 = 22.0;

/// Series palette, cycled in legend order
const COLORS: &[RGBColor] = &[
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
];

fn series_color(idx: usize) -> RGBColor {
    COLORS[idx % COLORS.len()]
}

/// One line on the chart: a label and its (category, value) points.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<(String, f64)>,
}

impl PlotSeries {
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }
}

/// Legend placement; only the corner the speedup chart uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    UpperRight,
}

impl From<LegendPosition> for SeriesLabelPosition {
    fn from(pos: LegendPosition) -> Self {
        match pos {
            LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub labels: Vec<String>,
    pub position: LegendPosition,
}

/// Everything needed to draw a categorical line chart, independent of any
/// drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub grid: bool,
    /// X-axis categories, left to right
    pub categories: Vec<String>,
    pub y_ticks: Vec<f64>,
    pub legend: Legend,
    pub series: Vec<PlotSeries>,
    /// Canvas size in pixels
    pub size: (u32, u32),
}

impl ChartSpec {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Y range covering every tick and every data point.
    pub fn y_range(&self) -> (f64, f64) {
        let values = self.series.iter().flat_map(|s| s.values());
        let ticks = self.y_ticks.iter().copied();
        let (lo, hi) = values
            .chain(ticks)
            .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if lo > hi {
            (0.0, 1.0)
        } else if lo == hi {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        }
    }
}

/// Ticks from 0 to `max` inclusive, every `step`.
pub fn y_ticks(step: f64, max: f64) -> Vec<f64> {
    if step <= 0.0 || max < 0.0 {
        return vec![0.0];
    }
    let count = (max / step).round() as usize + 1;
    (0..count).map(|i| i as f64 * step).collect()
}

/// One series per version, each running across the instances in table
/// column order.
pub fn speedup_series(table: &Table) -> Vec<PlotSeries> {
    let by_instance = table.transpose();

    by_instance
        .columns()
        .iter()
        .filter_map(|version| {
            let values = by_instance.column(version)?;
            let points = by_instance.index().iter().cloned().zip(values).collect();
            Some(PlotSeries {
                label: version.clone(),
                points,
            })
        })
        .collect()
}

/// The speedup line chart for a version-indexed table.
pub fn speedup_chart(table: &Table) -> ChartSpec {
    let series = speedup_series(table);
    let labels = series.iter().map(|s| s.label.clone()).collect();

    ChartSpec {
        title: SPEEDUP_TITLE.to_string(),
        x_label: INSTANCE_AXIS.to_string(),
        y_label: SPEEDUP_Y_LABEL.to_string(),
        grid: true,
        categories: table.columns().to_vec(),
        y_ticks: y_ticks(SPEEDUP_TICK_STEP, SPEEDUP_TICK_MAX),
        legend: Legend {
            title: table.index_name().to_string(),
            labels,
            position: LegendPosition::UpperRight,
        },
        series,
        size: DEFAULT_SIZE,
    }
}

/// Draw a chart onto a drawing area. The caller presents the area.
pub fn draw_chart<DB>(spec: &ChartSpec, root: &DrawingArea<DB, Shift>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let num_categories = spec.categories.len();
    let (y_min, y_max) = spec.y_range();

    let x_formatter = |x: &f64| {
        let idx = x.round() as usize;
        if idx < num_categories && (x - idx as f64).abs() < 0.3 {
            spec.categories[idx].clone()
        } else {
            String::new()
        }
    };
    let y_formatter = |y: &f64| format!("{:.1}", y);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .margin_bottom(DEFAULT_MARGIN_BOTTOM)
        .x_label_area_size(DEFAULT_X_LABEL_AREA_SIZE)
        .y_label_area_size(DEFAULT_Y_LABEL_AREA_SIZE)
        .build_cartesian_2d(
            -0.5..(num_categories as f64 - 0.5),
            (y_min..y_max).with_key_points(spec.y_ticks.clone()),
        )?;

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(num_categories)
        .x_label_formatter(&x_formatter)
        .y_labels(spec.y_ticks.len())
        .y_label_formatter(&y_formatter)
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE));
    if !spec.grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    // Legend title goes in as a marker-less first row
    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
        .label(spec.legend.title.as_str())
        .legend(|(x, y)| EmptyElement::at((x, y)));

    for (idx, series) in spec.series.iter().enumerate() {
        let color = series_color(idx);

        let data: Vec<(f64, f64)> = series
            .points
            .iter()
            .filter_map(|(category, value)| {
                spec.categories
                    .iter()
                    .position(|c| c == category)
                    .map(|pos| (pos as f64, *value))
            })
            .collect();

        if data.is_empty() {
            log::warn!("series '{}' has no points on the x axis", series.label);
            continue;
        }

        chart
            .draw_series(LineSeries::new(data.clone(), color.stroke_width(LINE_WIDTH)))?
            .label(series.label.as_str())
            .legend(move |(x, y)| {
                EmptyElement::at((x + 10, y))
                    + PathElement::new(vec![(-10, 0), (10, 0)], color.stroke_width(LINE_WIDTH))
                    + Circle::new((0, 0), MARKER_SIZE, color.filled())
            });

        chart.draw_series(PointSeries::of_element(
            data,
            MARKER_SIZE,
            color.filled(),
            &|coord, size, style| EmptyElement::at(coord) + Circle::new((0, 0), size, style),
        ))?;
    }

    chart
        .configure_series_labels()
        .position(spec.legend.position.into())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    Ok(())
}
