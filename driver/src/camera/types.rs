use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Control names understood by the camera pipeline.
pub mod controls {
    pub const ANALOGUE_GAIN: &str = "AnalogueGain";
    pub const EXPOSURE_VALUE: &str = "ExposureValue";
    pub const SHARPNESS: &str = "Sharpness";
    pub const HDR_MODE: &str = "hdr";

    /// HDR control value selecting the sensor HDR mode.
    pub const HDR_SENSOR: &str = "sensor";
    /// HDR control value disabling HDR.
    pub const HDR_OFF: &str = "off";
}

/// A single named control value pushed to the camera pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ControlValue {
    Float(f32),
    Int(i32),
    Text(String),
}

// Driver status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DriverStatus {
    NotInitialized,
    Configured,
    Running,
    Stopped,
    Error,
}

// Camera backend selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DriverType {
    PiCamera,
    Mock,
}

/// One-time stream configuration applied before the camera starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Sensor tuning file loaded by the pipeline, if any.
    pub tuning_file: Option<String>,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_rate: u32,
    pub driver: DriverType,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            tuning_file: None,
            frame_width: 1280,
            frame_height: 720,
            frame_rate: 30,
            driver: DriverType::Mock,
        }
    }
}

/// H.264 encoder settings for the recording sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Target bitrate in bits per second.
    pub bitrate: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self { bitrate: 5_000_000 }
    }
}

// Driver error
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Camera hardware not found: {0}")]
    HardwareNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Control rejected: {0}")]
    ControlRejected(String),

    #[error("Camera is not running")]
    NotRunning,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// The narrow interface the daemon drives the camera through. Real hardware
/// backends and the in-memory mock both implement this.
#[async_trait]
pub trait CameraDriver: Send + Sync + 'static {
    /// Apply the one-time stream configuration. Must precede `start`.
    async fn configure(&mut self, config: &CameraConfig) -> Result<(), DriverError>;

    /// Begin streaming frames through the pipeline.
    async fn start(&mut self) -> Result<(), DriverError>;

    /// Push one or more named control values to the running pipeline.
    async fn set_controls(
        &mut self,
        controls: HashMap<String, ControlValue>,
    ) -> Result<(), DriverError>;

    /// Start encoding the live stream into `output`.
    async fn start_recording(
        &mut self,
        encoder: &EncoderConfig,
        output: &Path,
    ) -> Result<(), DriverError>;

    /// Stop the encoder and flush the output sink.
    async fn stop_recording(&mut self) -> Result<(), DriverError>;

    /// Stop streaming and release the device.
    async fn stop(&mut self) -> Result<(), DriverError>;

    async fn get_status(&self) -> DriverStatus;
}

/// Factory function to create the driver selected by `driver_type`.
///
/// No hardware backend is compiled into this build, so `PiCamera` falls back
/// to the mock driver with a warning.
pub fn create_driver(driver_type: DriverType) -> Box<dyn CameraDriver> {
    match driver_type {
        DriverType::PiCamera => {
            warn!("no camera hardware backend available, falling back to mock driver");
            let (driver, _handle) = super::mock_driver::MockDriver::new();
            Box::new(driver)
        }
        DriverType::Mock => {
            info!("creating mock camera driver");
            let (driver, _handle) = super::mock_driver::MockDriver::new();
            Box::new(driver)
        }
    }
}
