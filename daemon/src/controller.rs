use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use cam_driver::{
    controls, CameraConfig, CameraDriver, ControlValue, DriverError, DriverStatus, EncoderConfig,
};
use log::{debug, info};
use serde::Serialize;

pub const GAIN_MIN: f32 = 1.0;
pub const GAIN_MAX: f32 = 8.0;
pub const GAIN_STEP: f32 = 0.1;

pub const SHARPNESS_MIN: f32 = 0.0;
pub const SHARPNESS_MAX: f32 = 2.0;
pub const SHARPNESS_STEP: f32 = 0.1;

pub const EXPOSURE_STEP: i32 = 1;

/// The adjustable camera parameters. The device is updated before any field
/// here changes, so this record always matches what the camera is using.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CameraState {
    pub gain: f32,
    pub exposure_value: i32,
    pub sharpness: f32,
    pub hdr_enabled: bool,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            gain: 1.0,
            exposure_value: 0,
            sharpness: 1.0,
            hdr_enabled: false,
        }
    }
}

/// Error returned from controller operations.
#[derive(Debug)]
pub enum ControlError {
    /// The camera was stopped by a `stop` command; mutations are rejected.
    DeviceStopped,
    /// The device refused the control push; state was left unchanged.
    Driver(DriverError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::DeviceStopped => write!(f, "camera is stopped"),
            ControlError::Driver(e) => write!(f, "camera control failed: {}", e),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControlError::DeviceStopped => None,
            ControlError::Driver(e) => Some(e),
        }
    }
}

impl From<DriverError> for ControlError {
    fn from(e: DriverError) -> Self {
        ControlError::Driver(e)
    }
}

/// Owns the camera and its adjustable state. The only component that calls
/// into the driver; callers share it behind one `tokio::sync::Mutex`, which
/// keeps every read-modify-write-push sequence atomic.
pub struct CameraController {
    driver: Box<dyn CameraDriver>,
    state: CameraState,
    stopped: bool,
}

impl CameraController {
    pub fn new(driver: Box<dyn CameraDriver>) -> Self {
        Self {
            driver,
            state: CameraState::default(),
            stopped: false,
        }
    }

    /// Configure the camera, start streaming and begin recording to `output`.
    pub async fn start_session(
        &mut self,
        config: &CameraConfig,
        encoder: &EncoderConfig,
        output: &Path,
    ) -> Result<(), ControlError> {
        self.driver.configure(config).await?;
        self.driver.start().await?;
        self.driver.start_recording(encoder, output).await?;
        info!("camera session started, recording to {}", output.display());
        Ok(())
    }

    /// Step gain by ±0.1, clamped to [1.0, 8.0].
    pub async fn adjust_gain(&mut self, increase: bool) -> Result<f32, ControlError> {
        self.ensure_active()?;
        let step = if increase { GAIN_STEP } else { -GAIN_STEP };
        let next = (self.state.gain + step).clamp(GAIN_MIN, GAIN_MAX);
        self.push_control(controls::ANALOGUE_GAIN, ControlValue::Float(next))
            .await?;
        self.state.gain = next;
        debug!("gain set to {:.1}", next);
        Ok(next)
    }

    /// Step EV compensation by ±1. The offset carries no documented bound.
    pub async fn adjust_exposure(&mut self, increase: bool) -> Result<i32, ControlError> {
        self.ensure_active()?;
        let step = if increase { EXPOSURE_STEP } else { -EXPOSURE_STEP };
        let next = self.state.exposure_value.saturating_add(step);
        self.push_control(controls::EXPOSURE_VALUE, ControlValue::Int(next))
            .await?;
        self.state.exposure_value = next;
        debug!("exposure compensation set to {}", next);
        Ok(next)
    }

    /// Flip HDR between the sensor mode and off.
    pub async fn toggle_hdr(&mut self) -> Result<bool, ControlError> {
        self.ensure_active()?;
        let next = !self.state.hdr_enabled;
        let mode = if next {
            controls::HDR_SENSOR
        } else {
            controls::HDR_OFF
        };
        self.push_control(controls::HDR_MODE, ControlValue::Text(mode.to_string()))
            .await?;
        self.state.hdr_enabled = next;
        debug!("hdr mode set to {}", mode);
        Ok(next)
    }

    /// Step sharpness by ±0.1, clamped to [0.0, 2.0].
    pub async fn adjust_sharpness(&mut self, increase: bool) -> Result<f32, ControlError> {
        self.ensure_active()?;
        let step = if increase {
            SHARPNESS_STEP
        } else {
            -SHARPNESS_STEP
        };
        let next = (self.state.sharpness + step).clamp(SHARPNESS_MIN, SHARPNESS_MAX);
        self.push_control(controls::SHARPNESS, ControlValue::Float(next))
            .await?;
        self.state.sharpness = next;
        debug!("sharpness set to {:.1}", next);
        Ok(next)
    }

    /// Stop recording, then the device. Idempotent; once stopped, every
    /// adjustment is rejected with `ControlError::DeviceStopped`.
    pub async fn stop(&mut self) -> Result<(), ControlError> {
        if self.stopped {
            debug!("stop requested but camera is already stopped");
            return Ok(());
        }
        // Reject further mutations even if teardown fails partway.
        self.stopped = true;
        let recording = self.driver.stop_recording().await;
        let device = self.driver.stop().await;
        recording?;
        device?;
        info!("recording stopped and camera released");
        Ok(())
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Retrieve the current driver status.
    pub async fn driver_status(&self) -> DriverStatus {
        self.driver.get_status().await
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn ensure_active(&self) -> Result<(), ControlError> {
        if self.stopped {
            Err(ControlError::DeviceStopped)
        } else {
            Ok(())
        }
    }

    /// Push a single control to the device. The in-memory state is only
    /// updated by the caller after this succeeds, so a rejected push leaves
    /// no drift between `CameraState` and the device.
    async fn push_control(&mut self, name: &str, value: ControlValue) -> Result<(), ControlError> {
        let mut map = HashMap::new();
        map.insert(name.to_string(), value);
        self.driver.set_controls(map).await?;
        Ok(())
    }
}
