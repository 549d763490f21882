use std::error::Error;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crate::data::model::{ExperimentId, UploadDataset};
use crate::error::PlotError;

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

pub const X_LABEL: &str = "Creation timestamp";
pub const Y_LABEL: &str = "Received timestamp";

/// 0000-01-01T00:00:00Z and 9999-12-31T23:59:59Z as epoch seconds. Date
/// axes are only laid out inside four-digit years.
const PLOT_MIN_SECS: i64 = -62_167_219_200;
const PLOT_MAX_SECS: i64 = 253_402_300_799;

type TimeRange = (DateTime<Utc>, DateTime<Utc>);

// ---------------------------------------------------------------------------
// Plot geometry
// ---------------------------------------------------------------------------

/// Canvas size and text/marker sizes, all in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub marker_size: u32,
    pub title_size: u32,
    pub label_size: u32,
    pub desc_size: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            marker_size: 2,
            title_size: 22,
            label_size: 12,
            desc_size: 15,
        }
    }
}

impl PlotStyle {
    /// Room below the x axis for tick labels plus the axis description.
    fn x_label_area(&self) -> u32 {
        self.label_size * 2 + self.desc_size * 2
    }

    /// Widest tick label is `YYYY-MM-DD` or `MM-DD HH:MM`, about 11 glyphs.
    fn y_label_area(&self) -> u32 {
        self.label_size * 7 + self.desc_size * 2
    }
}

// ---------------------------------------------------------------------------
// Scatter rendering
// ---------------------------------------------------------------------------

/// Draw received vs. created times for one file and write it as a PNG.
///
/// Every call acquires a fresh canvas and clears it, so nothing from a
/// previous plot can leak into this one. `out_path` is overwritten.
pub fn render_scatter(
    dataset: &UploadDataset,
    id: &ExperimentId,
    out_path: &Path,
    style: &PlotStyle,
) -> Result<(), PlotError> {
    ensure_font()?;
    let (x_range, y_range) = axis_ranges(dataset, id)?;

    let root = BitMapBackend::new(out_path, (style.width, style.height)).into_drawing_area();
    draw(root, dataset, id, style, x_range, y_range).map_err(|e| PlotError::Render {
        path: out_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Padded x (created) and y (received) ranges for a dataset.
fn axis_ranges(
    dataset: &UploadDataset,
    id: &ExperimentId,
) -> Result<(TimeRange, TimeRange), PlotError> {
    let (Some(x_bounds), Some(y_bounds)) = (dataset.created_bounds(), dataset.received_bounds())
    else {
        return Err(PlotError::Empty(id.file_stem()));
    };
    for value in [x_bounds.0, x_bounds.1, y_bounds.0, y_bounds.1] {
        if !(PLOT_MIN_SECS..=PLOT_MAX_SECS).contains(&value.timestamp()) {
            return Err(PlotError::OutOfRange {
                stem: id.file_stem(),
                value,
            });
        }
    }

    let x_range = padded(x_bounds);
    let y_range = padded(y_bounds);
    debug!(
        "{}: x {} .. {}, y {} .. {}",
        id.file_stem(),
        x_range.0,
        x_range.1,
        y_range.0,
        y_range.1
    );
    Ok((x_range, y_range))
}

fn draw<DB>(
    root: DrawingArea<DB, Shift>,
    dataset: &UploadDataset,
    id: &ExperimentId,
    style: &PlotStyle,
    (x_lo, x_hi): TimeRange,
    (y_lo, y_hi): TimeRange,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let x_fmt = tick_format(x_hi - x_lo);
    let y_fmt = tick_format(y_hi - y_lo);
    let format_x = |t: &DateTime<Utc>| t.format(x_fmt).to_string();
    let format_y = |t: &DateTime<Utc>| t.format(y_fmt).to_string();

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(id.title(), (FONT_FAMILY, style.title_size))
        .margin(style.label_size)
        .x_label_area_size(style.x_label_area())
        .y_label_area_size(style.y_label_area())
        .build_cartesian_2d(
            RangedDateTime::from(x_lo..x_hi),
            RangedDateTime::from(y_lo..y_hi),
        )?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_labels(6)
        .y_labels(8)
        .x_label_formatter(&format_x)
        .y_label_formatter(&format_y)
        .label_style((FONT_FAMILY, style.label_size))
        .axis_desc_style((FONT_FAMILY, style.desc_size))
        .draw()?;

    chart.draw_series(
        dataset
            .records
            .iter()
            .map(|r| Circle::new((r.created, r.received), style.marker_size, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Tick label layout, coarser as the axis spans more time.
fn tick_format(span: Duration) -> &'static str {
    if span < Duration::hours(1) {
        "%H:%M:%S"
    } else if span < Duration::days(2) {
        "%m-%d %H:%M"
    } else {
        "%Y-%m-%d"
    }
}

/// Widen `(lo, hi)` by 5% on each side, and by at least one second, so
/// edge points are not cut and a single-instant range still has width.
/// Saturates at the ends of the representable time range.
fn padded((lo, hi): TimeRange) -> TimeRange {
    let pad = ((hi - lo) / 20).max(Duration::seconds(1));
    (
        lo.checked_sub_signed(pad).unwrap_or(DateTime::<Utc>::MIN_UTC),
        hi.checked_add_signed(pad).unwrap_or(DateTime::<Utc>::MAX_UTC),
    )
}

/// Register the bundled font under the generic sans-serif family, once.
fn ensure_font() -> Result<(), PlotError> {
    static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
                .map_err(|_| "bundled DejaVuSans.ttf could not be parsed".to_string())
        })
        .clone()
        .map_err(PlotError::Font)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::UploadRecord;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn id() -> ExperimentId {
        ExperimentId::from_stem("expA_node1").unwrap()
    }

    #[test]
    fn padding_widens_degenerate_range() {
        let (lo, hi) = padded((at(100), at(100)));
        assert_eq!((lo, hi), (at(99), at(101)));
    }

    #[test]
    fn padding_is_proportional_for_wide_ranges() {
        let (lo, hi) = padded((at(0), at(2000)));
        assert_eq!((lo, hi), (at(-100), at(2100)));
    }

    #[test]
    fn padding_saturates_at_the_ends_of_time() {
        let max = DateTime::<Utc>::MAX_UTC;
        let min = DateTime::<Utc>::MIN_UTC;
        assert_eq!(padded((max, max)), (max - Duration::seconds(1), max));
        assert_eq!(padded((min, min)), (min, min + Duration::seconds(1)));
        assert_eq!(padded((min, max)), (min, max));
    }

    #[test]
    fn timestamps_past_year_9999_are_a_plot_error() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("expA_node1.png");
        let last = DateTime::<Utc>::MAX_UTC.timestamp();
        let records = (0..35)
            .map(|i| UploadRecord {
                created: at(last - i),
                received: at(1_000_000_000 + i),
            })
            .collect();

        let dataset = UploadDataset::from_records(records);

        let err = render_scatter(&dataset, &id(), &out, &PlotStyle::default()).unwrap_err();

        assert!(matches!(err, PlotError::OutOfRange { .. }), "{err}");
        assert!(!out.exists());
    }

    #[test]
    fn last_second_of_year_9999_still_plots() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("expA_node1.png");
        let records = (0..35)
            .map(|i| UploadRecord {
                created: at(PLOT_MAX_SECS - 34 + i),
                received: at(PLOT_MAX_SECS - 34 + i),
            })
            .collect();

        let dataset = UploadDataset::from_records(records);

        render_scatter(&dataset, &id(), &out, &PlotStyle::default()).unwrap();
        assert!(out.is_file());
    }

    #[test]
    fn chart_carries_title_and_axis_labels() {
        ensure_font().unwrap();
        let records: Vec<_> = (0..35)
            .map(|i| UploadRecord {
                created: at(1_000_000_000 + i),
                received: at(1_000_000_005 + i),
            })
            .collect();
        let dataset = UploadDataset::from_records(records);
        let (x_range, y_range) = axis_ranges(&dataset, &id()).unwrap();

        let mut svg = String::new();
        let root = SVGBackend::with_string(&mut svg, (640, 480)).into_drawing_area();
        draw(root, &dataset, &id(), &PlotStyle::default(), x_range, y_range).unwrap();

        assert!(svg.contains("expA on node1"), "missing title");
        assert!(svg.contains(X_LABEL), "missing x label");
        assert!(svg.contains(Y_LABEL), "missing y label");
        assert_eq!(svg.matches("<circle").count(), 35);
    }

    #[test]
    fn tick_format_follows_span() {
        assert_eq!(tick_format(Duration::seconds(40)), "%H:%M:%S");
        assert_eq!(tick_format(Duration::hours(5)), "%m-%d %H:%M");
        assert_eq!(tick_format(Duration::days(30)), "%Y-%m-%d");
    }

    #[test]
    fn tick_labels_are_utc() {
        let label = at(1_000_000_000).format(tick_format(Duration::hours(5))).to_string();
        assert_eq!(label, "09-09 01:46");
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("expA_node1.png");
        let err = render_scatter(&UploadDataset::default(), &id(), &out, &PlotStyle::default())
            .unwrap_err();
        assert!(matches!(err, PlotError::Empty(_)));
        assert!(!out.exists());
    }

    #[test]
    fn writes_png_of_requested_size() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("expA_node1.png");
        let records = (0..40)
            .map(|i| UploadRecord {
                created: at(1_000_000_000 + i),
                received: at(1_000_000_005 + i * 3),
            })
            .collect();
        let style = PlotStyle {
            width: 640,
            height: 480,
            ..PlotStyle::default()
        };

        render_scatter(&UploadDataset::from_records(records), &id(), &out, &style).unwrap();

        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (640, 480));
    }
}
