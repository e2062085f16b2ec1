// PNG chart rendering with plotters
use crate::domain::figure::RenderedImage;
use crate::domain::series::IndicatorSeries;
use crate::domain::spectrum::Spectrum;
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use std::io::Cursor;
use std::sync::OnceLock;

const FONT_FAMILY: &str = "sans-serif";
const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const TIMESTAMP_LABEL: &str = "%Y-%m-%d %H:%M";
const MIN_WIDTH: u32 = 160;
const MIN_HEIGHT: u32 = 120;
// Keeps plotters' tick arithmetic (span * 10 and friends) clear of overflow.
const MAX_PLOT_SPAN: f64 = f64::MAX / 1e3;

static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("bundled chart font could not be loaded")]
    Font,
    #[error("chart drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("{label} values span too wide a range to plot")]
    Range { label: &'static str },
    #[error("render worker failed: {0}")]
    Worker(String),
}

/// Draws the time series above its spectrum magnitude and encodes the result as PNG.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl ChartRenderer {
    /// Sizes below 160x120 are raised to that minimum.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
            height: height.max(MIN_HEIGHT),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn render(
        &self,
        title: &str,
        series: &IndicatorSeries,
        spectrum: &Spectrum,
    ) -> Result<RenderedImage, RenderError> {
        ensure_font()?;

        let values = series.values();
        let magnitudes = spectrum.magnitudes();
        let value_range = padded_range(&values).ok_or(RenderError::Range { label: "series" })?;
        let magnitude_range =
            padded_range(&magnitudes).ok_or(RenderError::Range { label: "spectrum" })?;

        let mut pixels = vec![0u8; self.width as usize * self.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (self.width, self.height))
                .into_drawing_area();
            let panels = [
                Panel {
                    y_desc: "Demanda",
                    values: &values,
                    y_range: value_range,
                    color: &BLUE,
                },
                Panel {
                    y_desc: "|FFT|",
                    values: &magnitudes,
                    y_range: magnitude_range,
                    color: &RED,
                },
            ];
            draw_figure(&root, title, series, &panels)
                .map_err(|e| RenderError::Draw(e.to_string()))?;
            root.present().map_err(|e| RenderError::Draw(e.to_string()))?;
        }

        let png = encode_png(pixels, self.width, self.height)?;
        tracing::debug!("Encoded {}x{} chart into {} bytes", self.width, self.height, png.len());
        Ok(RenderedImage::new(png, self.width, self.height))
    }
}

fn ensure_font() -> Result<(), RenderError> {
    let registered = *FONT_REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, DEJAVU_SANS).is_ok());
    if registered {
        Ok(())
    } else {
        Err(RenderError::Font)
    }
}

struct Panel<'a> {
    y_desc: &'a str,
    values: &'a [f64],
    y_range: (f64, f64),
    color: &'a RGBColor,
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    series: &IndicatorSeries,
    panels: &[Panel<'_>; 2],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let body = root.titled(title, (FONT_FAMILY, 18))?;

    // Both panels share the sample positions so ticks line up vertically.
    let labels: Vec<String> = series
        .samples()
        .iter()
        .map(|s| s.timestamp.format(TIMESTAMP_LABEL).to_string())
        .collect();

    for (area, panel) in body.split_evenly((2, 1)).iter().zip(panels) {
        draw_panel(area, &labels, panel)?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    labels: &[String],
    panel: &Panel<'_>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let x_max = panel.values.len().saturating_sub(1).max(1) as i32;
    let (y_min, y_max) = panel.y_range;

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(24)
        .y_label_area_size(60)
        .build_cartesian_2d(0..x_max, y_min..y_max)?;

    let x_label = |x: &i32| {
        usize::try_from(*x)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_labels(labels.len().clamp(1, 4))
        .y_labels(5)
        .x_label_formatter(&x_label)
        .y_desc(panel.y_desc)
        .label_style((FONT_FAMILY, 11).into_font())
        .draw()?;

    chart.draw_series(LineSeries::new(
        panel.values.iter().enumerate().map(|(i, &v)| (i as i32, v)),
        panel.color,
    ))?;

    Ok(())
}

/// Value range with a little headroom; flat or non-finite data gets a unit band.
/// `None` when the span cannot be represented safely.
fn padded_range(values: &[f64]) -> Option<(f64, f64)> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return Some((0.0, 1.0));
    }

    let span = max - min;
    let pad = if span <= f64::EPSILON * max.abs().max(1.0) {
        (max.abs() * 0.1).max(1.0)
    } else {
        span * 0.05
    };

    let (lo, hi) = (min - pad, max + pad);
    if (hi - lo).is_finite() && hi - lo <= MAX_PLOT_SPAN {
        Some((lo, hi))
    } else {
        None
    }
}

fn encode_png(pixels: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let image = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| RenderError::Encode("pixel buffer does not match image size".to_string()))?;

    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}
