use std::path::PathBuf;
use std::sync::Arc;

use cam_driver::DriverType;
use chrono::Local;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Default location of the daemon configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// Configuration for the daemon
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address the command listener binds to
    pub listen_address: String,
    /// Port the command listener binds to
    pub listen_port: u16,
    /// Sensor tuning file handed to the camera at configure time
    pub tuning_file: Option<String>,
    /// Directory where recordings are stored
    pub recordings_directory: String,
    /// Session identifier for recordings
    pub session: String,
    /// H.264 encoder bitrate in bits per second
    pub video_bitrate: u32,
    /// Camera backend
    pub driver_type: DriverType,
    /// Per-connection read timeout in seconds; dead sockets are closed when set
    pub client_read_timeout_secs: Option<u64>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0".to_string(),
            listen_port: 8888,
            tuning_file: Some(
                "/usr/share/libcamera/ipa/rpi/pisp/arducam_64mp.json".to_string(),
            ),
            recordings_directory: "./recordings/".to_string(),
            session: "".to_string(),
            video_bitrate: 5_000_000,
            driver_type: DriverType::PiCamera,
            client_read_timeout_secs: None,
        }
    }
}

impl DaemonConfig {
    /// The socket address the command listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_address, self.listen_port)
    }

    /// Build the output path for a new recording file, timestamped and
    /// prefixed with the session identifier when one is configured.
    pub fn recording_path(&self) -> PathBuf {
        let session_prefix = if self.session.is_empty() {
            "".to_string()
        } else {
            format!("session{}_", self.session)
        };
        let now = Local::now();
        let filename = format!(
            "{}{}.h264",
            session_prefix,
            now.format("%Y-%m-%d_%H-%M-%S")
        );
        PathBuf::from(&self.recordings_directory).join(filename)
    }
}

/// Load daemon configuration from file or create default if not found
pub fn load_config(config_path: &str) -> Arc<DaemonConfig> {
    match std::fs::read_to_string(config_path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                info!("loaded configuration from {}", config_path);
                Arc::new(config)
            }
            Err(e) => {
                warn!("error parsing configuration file: {}. using defaults", e);
                write_default_config(config_path)
            }
        },
        Err(_) => {
            info!(
                "configuration file {} not found. using defaults",
                config_path
            );
            write_default_config(config_path)
        }
    }
}

/// Write a default configuration file for future use and return it.
fn write_default_config(config_path: &str) -> Arc<DaemonConfig> {
    let default_config = DaemonConfig::default();
    if let Ok(json) = serde_json::to_string_pretty(&default_config) {
        match std::fs::write(config_path, json) {
            Ok(()) => info!("created default configuration file at {}", config_path),
            Err(e) => warn!("could not write default configuration file: {}", e),
        }
    }
    Arc::new(default_config)
}
