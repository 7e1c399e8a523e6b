//! SvgPlotSink - renders each scan to `{prefix}{n}.svg`
//!
//! - 2D: scatter of x against y
//! - 3D: top-down scatter of x against z, y encoded as color
//! - Grid storage: one cell per set grid entry, distance encoded as color
//!
//! Points outside the configured axis limits are not drawn.

use std::collections::HashMap;
use std::path::PathBuf;

use contracts::{
    ContractError, FinishedScan, GridShape, OutputConfig, PlotMode, ScanSink, SinkStage,
    StorageMode,
};
use svg::node::element::{Circle, Group, Rectangle, Text};
use svg::Document;
use tracing::{debug, error, info, instrument};

use super::{next_file_index, param_or};
use crate::error::DispatcherError;

const MARGIN: f64 = 60.0;
const FONT_FAMILY: &str = "sans-serif";
const POINT_COLOR: &str = "steelblue";

/// Closed interval drawn along one plot axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Position of `value` in the range, 0 at `min` and 1 at `max`
    fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        (value - self.min) / span
    }
}

/// Axis limits in centimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLimits {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl Default for PlotLimits {
    fn default() -> Self {
        Self {
            x: AxisRange::new(-40.0, 40.0),
            y: AxisRange::new(0.0, 100.0),
            z: AxisRange::new(-15.0, 50.0),
        }
    }
}

/// Configuration for SvgPlotSink
#[derive(Debug, Clone)]
pub struct SvgSinkConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub width: u32,
    pub height: u32,
    pub point_radius: f64,
    pub limits: PlotLimits,
}

impl SvgSinkConfig {
    /// Build from sink params, falling back to the output section.
    ///
    /// Params: `directory`, `file_prefix`, `width`, `height`, `point_radius`,
    /// and `{x,y,z}_{min,max}` axis limits.
    pub fn from_params(
        sink_name: &str,
        params: &HashMap<String, String>,
        output: &OutputConfig,
    ) -> Result<Self, DispatcherError> {
        let defaults = PlotLimits::default();
        let range = |axis: &str, default: AxisRange| -> Result<AxisRange, DispatcherError> {
            let min = param_or(sink_name, params, &format!("{axis}_min"), default.min)?;
            let max = param_or(sink_name, params, &format!("{axis}_max"), default.max)?;
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(DispatcherError::sink_creation(
                    sink_name,
                    format!("{axis} limits must be finite with min < max"),
                ));
            }
            Ok(AxisRange::new(min, max))
        };

        let config = Self {
            directory: params
                .get("directory")
                .map(PathBuf::from)
                .unwrap_or_else(|| output.directory.clone()),
            file_prefix: params
                .get("file_prefix")
                .cloned()
                .unwrap_or_else(|| output.file_prefix.clone()),
            width: param_or(sink_name, params, "width", 800)?,
            height: param_or(sink_name, params, "height", 600)?,
            point_radius: param_or(sink_name, params, "point_radius", 2.0)?,
            limits: PlotLimits {
                x: range("x", defaults.x)?,
                y: range("y", defaults.y)?,
                z: range("z", defaults.z)?,
            },
        };

        if f64::from(config.width) <= 2.0 * MARGIN || f64::from(config.height) <= 2.0 * MARGIN {
            return Err(DispatcherError::sink_creation(
                sink_name,
                format!("plot must be larger than {}px", 2.0 * MARGIN),
            ));
        }
        Ok(config)
    }
}

/// Plot area in pixels and the data ranges it maps
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    horizontal: AxisRange,
    vertical: AxisRange,
}

impl Frame {
    fn new(config: &SvgSinkConfig, horizontal: AxisRange, vertical: AxisRange) -> Self {
        Self {
            left: MARGIN,
            top: MARGIN,
            width: f64::from(config.width) - 2.0 * MARGIN,
            height: f64::from(config.height) - 2.0 * MARGIN,
            horizontal,
            vertical,
        }
    }

    /// Data to pixel coordinates; SVG y grows downward
    fn project(&self, h: f64, v: f64) -> (f64, f64) {
        (
            self.left + self.horizontal.normalize(h) * self.width,
            self.top + (1.0 - self.vertical.normalize(v)) * self.height,
        )
    }

    fn axes(&self, h_label: &str, v_label: &str) -> Group {
        let bottom = self.top + self.height;
        let right = self.left + self.width;
        let mut group = Group::new().set("id", "axes").add(
            Rectangle::new()
                .set("x", self.left)
                .set("y", self.top)
                .set("width", self.width)
                .set("height", self.height)
                .set("fill", "none")
                .set("stroke", "black")
                .set("stroke-width", 1),
        );

        let ticks = [
            (self.left, bottom + 16.0, "middle", self.horizontal.min),
            (right, bottom + 16.0, "middle", self.horizontal.max),
            (self.left - 6.0, bottom, "end", self.vertical.min),
            (self.left - 6.0, self.top + 4.0, "end", self.vertical.max),
        ];
        for (x, y, anchor, value) in ticks {
            group = group.add(label(&format!("{value}"), x, y, 10).set("text-anchor", anchor));
        }

        let v_center = self.top + self.height / 2.0;
        group
            .add(
                label(h_label, self.left + self.width / 2.0, bottom + 36.0, 12)
                    .set("text-anchor", "middle"),
            )
            .add(
                label(v_label, 0.0, 0.0, 12)
                    .set("text-anchor", "middle")
                    .set(
                        "transform",
                        format!("translate({}, {v_center}) rotate(-90)", MARGIN / 3.0),
                    ),
            )
    }
}

fn label(content: &str, x: f64, y: f64, size: u32) -> Text {
    Text::new(content)
        .set("x", x)
        .set("y", y)
        .set("font-size", size)
        .set("font-family", FONT_FAMILY)
        .set("fill", "black")
}

/// Blue (t = 0) to red (t = 1) ramp
fn heat_color(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!("rgb({},{},{})", lerp(59.0, 180.0), lerp(76.0, 4.0), lerp(192.0, 38.0))
}

/// Sink that renders each scan as an SVG plot
#[derive(Debug)]
pub struct SvgPlotSink {
    name: String,
    config: SvgSinkConfig,
    written: Vec<PathBuf>,
}

impl SvgPlotSink {
    pub fn new(name: impl Into<String>, config: SvgSinkConfig) -> std::io::Result<Self> {
        std::fs::create_dir_all(&config.directory)?;
        Ok(Self {
            name: name.into(),
            config,
            written: Vec::new(),
        })
    }

    pub fn config(&self) -> &SvgSinkConfig {
        &self.config
    }

    /// Render a scan; returns the document and the number of marks drawn
    pub fn render(&self, scan: &FinishedScan) -> (Document, usize) {
        let (width, height) = (self.config.width, self.config.height);
        let mut doc = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", "white"),
            );

        let (title, marks, drawn) = match (scan.storage, scan.shape) {
            (StorageMode::Grid, Some(shape)) => {
                let (group, drawn) = self.render_grid(scan, shape);
                ("IR Sensor Grid Scan (color = distance)", group, drawn)
            }
            _ => match scan.plot_mode {
                PlotMode::TwoD => {
                    let (group, drawn) = self.render_2d(scan);
                    ("2D IR Sensor Data", group, drawn)
                }
                PlotMode::ThreeD => {
                    let (group, drawn) = self.render_3d(scan);
                    ("3D IR Sensor Data (top view, color = Y)", group, drawn)
                }
            },
        };

        doc = doc.add(marks).add(
            label(title, f64::from(width) / 2.0, MARGIN / 2.0, 14)
                .set("text-anchor", "middle")
                .set("font-weight", "bold"),
        );
        (doc, drawn)
    }

    fn render_2d(&self, scan: &FinishedScan) -> (Group, usize) {
        let limits = self.config.limits;
        let frame = Frame::new(&self.config, limits.x, limits.y);
        let mut points = Group::new().set("id", "points");
        let mut drawn = 0;

        for p in scan.points().filter(|p| limits.x.contains(p.x) && limits.y.contains(p.y)) {
            let (cx, cy) = frame.project(p.x, p.y);
            points = points.add(self.dot(cx, cy, POINT_COLOR));
            drawn += 1;
        }

        let group = Group::new()
            .add(frame.axes("X Position (cm)", "Y Position (cm)"))
            .add(points);
        (group, drawn)
    }

    fn render_3d(&self, scan: &FinishedScan) -> (Group, usize) {
        let limits = self.config.limits;
        let frame = Frame::new(&self.config, limits.x, limits.z);
        let mut points = Group::new().set("id", "points");
        let mut drawn = 0;

        let visible = scan.points().filter(|p| {
            limits.x.contains(p.x) && limits.y.contains(p.y) && limits.z.contains(p.z)
        });
        for p in visible {
            let (cx, cy) = frame.project(p.x, p.z);
            points = points.add(self.dot(cx, cy, &heat_color(limits.y.normalize(p.y))));
            drawn += 1;
        }

        let group = Group::new()
            .add(frame.axes("X Position (cm)", "Z Position (cm)"))
            .add(points);
        (group, drawn)
    }

    fn render_grid(&self, scan: &FinishedScan, shape: GridShape) -> (Group, usize) {
        let cols = shape.cols.max(1);
        let rows = shape.rows.max(1);
        let frame = Frame::new(
            &self.config,
            AxisRange::new(0.0, cols as f64),
            AxisRange::new(0.0, rows as f64),
        );
        let cell_w = frame.width / cols as f64;
        let cell_h = frame.height / rows as f64;

        let distances = scan.records().map(|r| r.sample.distance);
        let (lo, hi) = distances.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        });
        let range = AxisRange::new(lo, hi);

        let mut cells = Group::new().set("id", "cells");
        let mut drawn = 0;
        for (i, row) in scan.rows.iter().enumerate() {
            let Some(record) = row.record else {
                continue;
            };
            let (r, c) = (i / cols, i % cols);
            cells = cells.add(
                Rectangle::new()
                    .set("x", frame.left + c as f64 * cell_w)
                    .set("y", frame.top + r as f64 * cell_h)
                    .set("width", cell_w)
                    .set("height", cell_h)
                    .set("fill", heat_color(range.normalize(record.sample.distance))),
            );
            drawn += 1;
        }

        let group = Group::new()
            .add(frame.axes("Phi cell", "Theta cell"))
            .add(cells);
        (group, drawn)
    }

    fn dot(&self, cx: f64, cy: f64, color: &str) -> Circle {
        Circle::new()
            .set("cx", cx)
            .set("cy", cy)
            .set("r", self.config.point_radius)
            .set("fill", color)
    }

    fn save(&mut self, scan: &FinishedScan) -> std::io::Result<PathBuf> {
        let index = next_file_index(&self.config.directory, &self.config.file_prefix, "svg")?;
        let path = self
            .config
            .directory
            .join(format!("{}{}.svg", self.config.file_prefix, index));

        let (doc, drawn) = self.render(scan);
        svg::save(&path, &doc)?;

        let hidden = scan.len() - drawn.min(scan.len());
        if hidden > 0 {
            debug!(sink = %self.name, hidden, "Points outside plot limits");
        }
        info!(sink = %self.name, path = %path.display(), drawn, "Plot saved");
        Ok(path)
    }
}

impl ScanSink for SvgPlotSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn stage(&self) -> SinkStage {
        SinkStage::Rendering
    }

    #[instrument(
        name = "svg_sink_write",
        skip(self, scan),
        fields(sink = %self.name, points = scan.len())
    )]
    fn write(&mut self, scan: &FinishedScan) -> Result<(), ContractError> {
        match self.save(scan) {
            Ok(path) => {
                self.written.push(path);
                Ok(())
            }
            Err(e) => {
                error!(sink = %self.name, error = %e, "Render failed");
                Err(ContractError::sink_write(&self.name, e.to_string()))
            }
        }
    }

    fn written_paths(&self) -> &[PathBuf] {
        &self.written
    }
}
