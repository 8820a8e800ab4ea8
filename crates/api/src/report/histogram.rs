use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::{write::ZlibEncoder, Compression};
use plotters::{
    prelude::*,
    style::{register_font, FontStyle},
};
use std::{io::Write, sync::OnceLock};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const FONT_FAMILY: &str = "sans-serif";
const CHART_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const BAR_FILL: RGBColor = RGBColor(135, 206, 235);

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("histogram needs at least one bucket")]
    NoBuckets,
    #[error("chart font could not be loaded")]
    Font,
    #[error("Failed to draw histogram: {0}")]
    Draw(String),
    #[error("Failed to encode png: {0}")]
    Encode(#[from] std::io::Error),
}

/// Labels and bucket count for a histogram
#[derive(Clone, Debug)]
pub struct HistogramSpec {
    pub bins: usize,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// Turns a numeric sample into an encoded image
pub trait ChartRenderer: Send + Sync {
    /// Renders a histogram of `samples`, returning a base64 encoded PNG
    fn histogram(&self, samples: &[f64], spec: &HistogramSpec) -> Result<String, RenderError>;
}

/// Equal width buckets over `[lower, upper]`
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Buckets `samples` the way numpy's `histogram` does: the range is the
    /// sample's min and max, the max lands in the last bucket, a constant
    /// sample is widened by 0.5 on each side and an empty one spans `[0, 1]`.
    /// Non-finite values are ignored.
    pub fn from_samples(samples: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();

        let (mut lower, mut upper) = finite
            .iter()
            .fold(None, |range: Option<(f64, f64)>, &v| match range {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .unwrap_or((0.0, 1.0));
        if lower == upper {
            lower -= 0.5;
            upper += 0.5;
        }

        let mut counts = vec![0; bins];
        if bins > 0 {
            let width = (upper - lower) / bins as f64;
            for v in finite {
                let index = ((v - lower) / width).floor() as usize;
                counts[index.min(bins - 1)] += 1;
            }
        }

        Self {
            lower,
            upper,
            counts,
        }
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len().max(1) as f64
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Lower and upper edge of bucket `index`
    fn bucket_edges(&self, index: usize) -> (f64, f64) {
        let width = self.bin_width();
        let left = self.lower + width * index as f64;
        (left, left + width)
    }

    #[cfg(test)]
    fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Draws histograms with plotters onto an RGB buffer and encodes them as PNG
#[derive(Clone, Copy, Debug, Default)]
pub struct PngHistogramRenderer;

impl ChartRenderer for PngHistogramRenderer {
    fn histogram(&self, samples: &[f64], spec: &HistogramSpec) -> Result<String, RenderError> {
        if spec.bins == 0 {
            return Err(RenderError::NoBuckets);
        }
        register_chart_font()?;

        let histogram = Histogram::from_samples(samples, spec.bins);
        let pixels = draw(&histogram, spec)?;
        let png = encode_png(
            &pixels,
            WIDTH,
            HEIGHT,
            &[
                ("Title", spec.title.as_str()),
                ("XLabel", spec.x_label.as_str()),
                ("YLabel", spec.y_label.as_str()),
            ],
        )?;

        Ok(STANDARD.encode(png))
    }
}

/// Registers the bundled font under the family plotters resolves `sans-serif` to
fn register_chart_font() -> Result<(), RenderError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, CHART_FONT).is_ok());
    if registered {
        Ok(())
    } else {
        Err(RenderError::Font)
    }
}

fn draw_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(err.to_string())
}

fn draw(histogram: &Histogram, spec: &HistogramSpec) -> Result<Vec<u8>, RenderError> {
    let mut pixels = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        // leave headroom above the tallest bar
        let y_max = histogram.max_count().max(1) as f64 * 1.05;
        let mut chart = ChartBuilder::on(&root)
            .caption(spec.title.as_str(), (FONT_FAMILY, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(histogram.lower..histogram.upper, 0f64..y_max)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_labels(10)
            .y_labels(8)
            .x_label_formatter(&|v| format!("{:.1}", v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style((FONT_FAMILY, 14))
            .axis_desc_style((FONT_FAMILY, 16))
            .draw()
            .map_err(draw_error)?;

        let bars: Vec<((f64, f64), f64)> = histogram
            .counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, &count)| (histogram.bucket_edges(i), count as f64))
            .collect();

        chart
            .draw_series(bars.iter().map(|&((left, right), count)| {
                Rectangle::new([(left, 0.0), (right, count)], BAR_FILL.mix(0.7).filled())
            }))
            .map_err(draw_error)?;
        chart
            .draw_series(bars.iter().map(|&((left, right), count)| {
                Rectangle::new([(left, 0.0), (right, count)], BLACK.stroke_width(1))
            }))
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }

    Ok(pixels)
}

fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    text: &[(&str, &str)],
) -> Result<Vec<u8>, RenderError> {
    let mut png = PNG_SIGNATURE.to_vec();

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    // 8 bit depth, truecolor, deflate, adaptive filtering, no interlace
    ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);
    write_chunk(&mut png, b"IHDR", &ihdr);

    for (keyword, value) in text {
        let mut data = Vec::with_capacity(keyword.len() + 1 + value.len());
        data.extend_from_slice(keyword.as_bytes());
        data.push(0);
        data.extend_from_slice(value.as_bytes());
        write_chunk(&mut png, b"tEXt", &data);
    }

    let row_len = width as usize * 3;
    let mut raw = Vec::with_capacity((row_len + 1) * height as usize);
    for row in pixels.chunks(row_len) {
        raw.push(0);
        raw.extend_from_slice(row);
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    write_chunk(&mut png, b"IDAT", &encoder.finish()?);

    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn write_chunk(out: &mut Vec<u8>, name: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(data);

    let mut crc = crc32fast::Hasher::new();
    crc.update(name);
    crc.update(data);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
}
