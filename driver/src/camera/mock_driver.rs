use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use super::types::{
    CameraConfig, CameraDriver, ControlValue, DriverError, DriverStatus, EncoderConfig,
};

/// A stubbed-out driver that does not access any camera hardware.
///
/// Every capability call is recorded, so tests can assert what the daemon
/// pushed and in which order.
pub struct MockDriver {
    inner: Arc<Mutex<MockInner>>,
}

/// Inspection handle for a `MockDriver` that has been handed off to the
/// daemon. Cheap to clone; all accessors read the live driver state.
#[derive(Clone)]
pub struct MockHandle {
    inner: Arc<Mutex<MockInner>>,
}

/// Internal state for the MockDriver.
struct MockInner {
    config: Option<CameraConfig>,
    status: DriverStatus,
    recording: bool,
    recording_path: Option<PathBuf>,
    pushed_controls: Vec<HashMap<String, ControlValue>>,
    call_log: Vec<&'static str>,
    fail_next_push: bool,
}

impl MockDriver {
    /// Create a mock driver plus a handle for inspecting it afterwards.
    pub fn new() -> (Self, MockHandle) {
        let inner = Arc::new(Mutex::new(MockInner {
            config: None,
            status: DriverStatus::NotInitialized,
            recording: false,
            recording_path: None,
            pushed_controls: Vec::new(),
            call_log: Vec::new(),
            fail_next_push: false,
        }));
        let driver = MockDriver {
            inner: inner.clone(),
        };
        (driver, MockHandle { inner })
    }
}

impl MockHandle {
    /// Every control map pushed through `set_controls`, oldest first.
    pub async fn pushed_controls(&self) -> Vec<HashMap<String, ControlValue>> {
        self.inner.lock().await.pushed_controls.clone()
    }

    /// Capability calls in the order they were made.
    pub async fn call_log(&self) -> Vec<&'static str> {
        self.inner.lock().await.call_log.clone()
    }

    pub async fn status(&self) -> DriverStatus {
        self.inner.lock().await.status
    }

    pub async fn is_recording(&self) -> bool {
        self.inner.lock().await.recording
    }

    pub async fn recording_path(&self) -> Option<PathBuf> {
        self.inner.lock().await.recording_path.clone()
    }

    /// Make the next `set_controls` call fail, for exercising rollback paths.
    pub async fn fail_next_push(&self) {
        self.inner.lock().await.fail_next_push = true;
    }
}

#[async_trait]
impl CameraDriver for MockDriver {
    async fn configure(&mut self, config: &CameraConfig) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().await;
        if inner.status == DriverStatus::Running {
            return Err(DriverError::ConfigurationError(
                "cannot configure while streaming".to_string(),
            ));
        }
        inner.config = Some(config.clone());
        inner.status = DriverStatus::Configured;
        inner.call_log.push("configure");
        debug!("MockDriver configured: {:?}", config);
        Ok(())
    }

    async fn start(&mut self) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().await;
        if inner.config.is_none() {
            return Err(DriverError::ConfigurationError(
                "start called before configure".to_string(),
            ));
        }
        if inner.status == DriverStatus::Running {
            return Err(DriverError::ConfigurationError(
                "already streaming".to_string(),
            ));
        }
        inner.status = DriverStatus::Running;
        inner.call_log.push("start");
        info!("MockDriver streaming started");
        Ok(())
    }

    async fn set_controls(
        &mut self,
        controls: HashMap<String, ControlValue>,
    ) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().await;
        if inner.status != DriverStatus::Running {
            return Err(DriverError::NotRunning);
        }
        if inner.fail_next_push {
            inner.fail_next_push = false;
            return Err(DriverError::ControlRejected(
                "injected push failure".to_string(),
            ));
        }
        debug!("MockDriver controls pushed: {:?}", controls);
        inner.call_log.push("set_controls");
        inner.pushed_controls.push(controls);
        Ok(())
    }

    async fn start_recording(
        &mut self,
        encoder: &EncoderConfig,
        output: &Path,
    ) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().await;
        if inner.status != DriverStatus::Running {
            return Err(DriverError::NotRunning);
        }
        if inner.recording {
            return Err(DriverError::ConfigurationError(
                "already recording".to_string(),
            ));
        }
        inner.recording = true;
        inner.recording_path = Some(output.to_path_buf());
        inner.call_log.push("start_recording");
        info!(
            "MockDriver recording to {} at {} bps",
            output.display(),
            encoder.bitrate
        );
        Ok(())
    }

    async fn stop_recording(&mut self) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().await;
        if !inner.recording {
            debug!("stop_recording called, but no recording is active");
            return Ok(());
        }
        inner.recording = false;
        inner.call_log.push("stop_recording");
        info!("MockDriver recording stopped");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().await;
        if inner.status == DriverStatus::Stopped {
            debug!("stop called, but driver is already stopped");
            return Ok(());
        }
        if inner.recording {
            warn!("stopping device while recording is still active");
            inner.recording = false;
        }
        inner.status = DriverStatus::Stopped;
        inner.call_log.push("stop");
        info!("MockDriver stopped");
        Ok(())
    }

    async fn get_status(&self) -> DriverStatus {
        self.inner.lock().await.status
    }
}
