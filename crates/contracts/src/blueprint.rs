//! ScanBlueprint - Config Loader output
//!
//! Describes the complete scanner setup: sentinels, sweep geometry, offsets,
//! calibration curve, spatial filter, transport, output routing.
//!
//! Every field carries a serde default, so an empty document is a valid
//! blueprint equal to `ScanBlueprint::default()`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::{Axis, GridShape};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete scanner blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Session control (sentinels, storage layout)
    #[serde(default)]
    pub session: SessionConfig,

    /// Sweep geometry used for grid indexing
    #[serde(default)]
    pub grid: GridConfig,

    /// Center offsets for the coordinate transform
    #[serde(default)]
    pub transform: TransformConfig,

    /// Sensor calibration curve
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Foreground/background culling (offline replay only)
    #[serde(default)]
    pub filter: FilterConfig,

    /// Serial transport settings
    #[serde(default)]
    pub transport: TransportConfig,

    /// Output locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Output routing
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkConfig>,
}

/// Session control settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Substring marking the start of a scan
    #[serde(default = "default_start_sentinel")]
    pub start_sentinel: String,

    /// Substring marking the end of a scan
    #[serde(default = "default_end_sentinel")]
    pub end_sentinel: String,

    /// Point cloud layout
    #[serde(default)]
    pub storage: StorageMode,

    /// Plot dimensionality
    #[serde(default)]
    pub plot_mode: PlotMode,

    /// Begin ACTIVE without waiting for a start sentinel
    #[serde(default)]
    pub implicit_start: bool,

    /// Abort the session on a grid index outside the sweep
    #[serde(default)]
    pub fatal_out_of_range: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_sentinel: default_start_sentinel(),
            end_sentinel: default_end_sentinel(),
            storage: StorageMode::default(),
            plot_mode: PlotMode::default(),
            implicit_start: false,
            fatal_out_of_range: false,
        }
    }
}

fn default_start_sentinel() -> String {
    "start".to_string()
}

fn default_end_sentinel() -> String {
    "done".to_string()
}

/// Point cloud layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Append-only, insertion ordered
    #[default]
    Sequential,
    /// Fixed theta x phi array, last write wins
    Grid,
}

/// Plot dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotMode {
    TwoD,
    #[default]
    ThreeD,
}

/// Sweep geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Degrees between adjacent samples on both axes
    #[serde(default = "default_resolution")]
    pub resolution_deg: u32,

    /// Samples along theta
    #[serde(default = "default_num_points")]
    pub num_points_theta: usize,

    /// Samples along phi
    #[serde(default = "default_num_points")]
    pub num_points_phi: usize,

    /// Theta angle of the first sample
    #[serde(default = "default_theta_start")]
    pub theta_start_deg: i32,

    /// Phi angle of the first sample
    #[serde(default = "default_phi_start")]
    pub phi_start_deg: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution_deg: default_resolution(),
            num_points_theta: default_num_points(),
            num_points_phi: default_num_points(),
            theta_start_deg: default_theta_start(),
            phi_start_deg: default_phi_start(),
        }
    }
}

impl GridConfig {
    pub fn shape(&self) -> GridShape {
        GridShape {
            rows: self.num_points_theta,
            cols: self.num_points_phi,
        }
    }
}

fn default_resolution() -> u32 {
    1
}

fn default_num_points() -> usize {
    60
}

fn default_theta_start() -> i32 {
    30
}

fn default_phi_start() -> i32 {
    45
}

/// Center (zero-point) offsets subtracted before trigonometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default = "default_theta_center")]
    pub theta_center_deg: f64,

    #[serde(default = "default_phi_center")]
    pub phi_center_deg: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            theta_center_deg: default_theta_center(),
            phi_center_deg: default_phi_center(),
        }
    }
}

fn default_theta_center() -> f64 {
    60.0
}

fn default_phi_center() -> f64 {
    65.0
}

/// Fitted calibration curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum CalibrationConfig {
    /// `distance = a * exp(-k * raw * vref / adc_max)`
    Exponential {
        #[serde(default = "default_exp_a")]
        a: f64,
        #[serde(default = "default_exp_k")]
        k: f64,
        #[serde(default = "default_vref")]
        vref: f64,
        #[serde(default = "default_adc_max")]
        adc_max: f64,
    },

    /// `distance = b * raw^(-p)`
    PowerLaw {
        #[serde(default = "default_power_b")]
        b: f64,
        #[serde(default = "default_power_p")]
        p: f64,
    },
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::exponential()
    }
}

impl CalibrationConfig {
    /// Exponential curve with the fitted default constants
    pub fn exponential() -> Self {
        Self::Exponential {
            a: default_exp_a(),
            k: default_exp_k(),
            vref: default_vref(),
            adc_max: default_adc_max(),
        }
    }

    /// Power-law curve with the fitted default constants
    pub fn power_law() -> Self {
        Self::PowerLaw {
            b: default_power_b(),
            p: default_power_p(),
        }
    }
}

fn default_exp_a() -> f64 {
    155.0
}

fn default_exp_k() -> f64 {
    0.987
}

fn default_vref() -> f64 {
    5.0
}

fn default_adc_max() -> f64 {
    1024.0
}

fn default_power_b() -> f64 {
    10650.08
}

fn default_power_p() -> f64 {
    0.935
}

/// Closed interval on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub axis: Axis,

    #[serde(default = "default_filter_min")]
    pub min: f64,

    #[serde(default = "default_filter_max")]
    pub max: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            axis: Axis::default(),
            min: default_filter_min(),
            max: default_filter_max(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_filter_min() -> f64 {
    40.0
}

fn default_filter_max() -> f64 {
    48.0
}

/// USB vendor/product pair of a recognized controller board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsbDeviceId {
    pub vid: u16,
    pub pid: u16,
}

impl UsbDeviceId {
    pub const fn new(vid: u16, pid: u16) -> Self {
        Self { vid, pid }
    }
}

/// Serial transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Explicit port path; auto-detected from `known_devices` when absent
    #[serde(default)]
    pub port: Option<String>,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Poll interval of the blocking read loop
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    #[serde(default = "default_known_devices")]
    pub known_devices: Vec<UsbDeviceId>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
            known_devices: default_known_devices(),
        }
    }
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_read_timeout_ms() -> u64 {
    1000
}

/// Arduino Uno/Mega variants, FTDI FT232 and CH340 bridges
fn default_known_devices() -> Vec<UsbDeviceId> {
    vec![
        UsbDeviceId::new(0x2341, 0x0043),
        UsbDeviceId::new(0x2341, 0x0001),
        UsbDeviceId::new(0x2A03, 0x0043),
        UsbDeviceId::new(0x2341, 0x0243),
        UsbDeviceId::new(0x0403, 0x6001),
        UsbDeviceId::new(0x1A86, 0x7523),
    ]
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving numbered scan files
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// File name stem before the numeric suffix
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Saved scan read by offline replay
    #[serde(default = "default_replay_file")]
    pub replay_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            file_prefix: default_file_prefix(),
            replay_file: default_replay_file(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_file_prefix() -> String {
    "sensor_reading_".to_string()
}

fn default_replay_file() -> PathBuf {
    PathBuf::from("data/sensor_reading_3D.csv")
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl SinkConfig {
    pub fn new(name: impl Into<String>, sink_type: SinkType) -> Self {
        Self {
            name: name.into(),
            sink_type,
            params: HashMap::new(),
        }
    }
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Numbered CSV files
    Csv,
    /// SVG scatter / height-map plot
    Svg,
    /// Log summary
    Log,
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![
        SinkConfig::new("raw_csv", SinkType::Csv),
        SinkConfig::new("plot", SinkType::Svg),
        SinkConfig::new("log", SinkType::Log),
    ]
}

impl Default for ScanBlueprint {
    fn default() -> Self {
        Self {
            version: ConfigVersion::default(),
            session: SessionConfig::default(),
            grid: GridConfig::default(),
            transform: TransformConfig::default(),
            calibration: CalibrationConfig::default(),
            filter: FilterConfig::default(),
            transport: TransportConfig::default(),
            output: OutputConfig::default(),
            sinks: default_sinks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let bp: ScanBlueprint = serde_json::from_str("{}").unwrap();
        assert_eq!(bp.session.start_sentinel, "start");
        assert_eq!(bp.session.end_sentinel, "done");
        assert_eq!(bp.session.storage, StorageMode::Sequential);
        assert_eq!(bp.grid.shape(), GridShape { rows: 60, cols: 60 });
        assert_eq!(bp.transport.baud_rate, 115_200);
        assert_eq!(bp.transport.known_devices.len(), 6);
        assert_eq!(bp.sinks.len(), 3);
        assert_eq!(bp.calibration, CalibrationConfig::exponential());
    }

    #[test]
    fn test_power_law_tag() {
        let json = r#"{ "calibration": { "curve": "power_law", "p": 1.1 } }"#;
        let bp: ScanBlueprint = serde_json::from_str(json).unwrap();
        match bp.calibration {
            CalibrationConfig::PowerLaw { b, p } => {
                assert_eq!(b, 10650.08);
                assert_eq!(p, 1.1);
            }
            other => panic!("unexpected curve: {other:?}"),
        }
    }

    #[test]
    fn test_default_sinks() {
        let bp = ScanBlueprint::default();
        let names: Vec<_> = bp.sinks.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["raw_csv", "plot", "log"]);
    }
}
