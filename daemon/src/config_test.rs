#[cfg(test)]
mod tests {
    use crate::config::{load_config, DaemonConfig};
    use cam_driver::DriverType;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_daemon_config_default() {
        let config = DaemonConfig::default();
        assert_eq!(config.listen_address, "0.0.0.0");
        assert_eq!(config.listen_port, 8888);
        assert_eq!(config.recordings_directory, "./recordings/");
        assert_eq!(config.video_bitrate, 5_000_000);
        assert_eq!(config.driver_type, DriverType::PiCamera);
        assert_eq!(config.client_read_timeout_secs, None);
        assert_eq!(config.listen_addr(), "0.0.0.0:8888");
    }

    #[test]
    fn test_load_config_creates_default_when_missing() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        let temp_path = config_path.to_str().unwrap();

        let config = load_config(temp_path);

        // Verify default values
        assert_eq!(config.listen_port, 8888);
        assert_eq!(config.recordings_directory, "./recordings/");

        // Verify the config file was created
        assert!(Path::new(temp_path).exists());

        // Read the created file and verify its contents
        let file_contents = fs::read_to_string(temp_path).expect("Failed to read config file");
        let parsed_config: DaemonConfig =
            serde_json::from_str(&file_contents).expect("Failed to parse config JSON");
        assert_eq!(parsed_config.listen_port, 8888);
        assert_eq!(parsed_config.video_bitrate, 5_000_000);
    }

    #[test]
    fn test_load_config_uses_existing_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        let temp_path = config_path.to_str().unwrap();

        let custom_config = DaemonConfig {
            listen_port: 9999,
            recordings_directory: "./custom_recordings/".to_string(),
            driver_type: DriverType::Mock,
            ..DaemonConfig::default()
        };
        let json = serde_json::to_string_pretty(&custom_config).expect("Failed to serialize config");
        fs::write(temp_path, json).expect("Failed to write config file");

        let config = load_config(temp_path);

        assert_eq!(config.listen_port, 9999);
        assert_eq!(config.recordings_directory, "./custom_recordings/");
        assert_eq!(config.driver_type, DriverType::Mock);
    }

    #[test]
    fn test_load_config_falls_back_on_parse_error() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        let temp_path = config_path.to_str().unwrap();

        fs::write(temp_path, "not valid json {").expect("Failed to write config file");

        let config = load_config(temp_path);
        assert_eq!(config.listen_port, 8888);
    }

    #[test]
    fn test_recording_path_without_session() {
        let config = DaemonConfig {
            recordings_directory: "/var/recordings".to_string(),
            ..DaemonConfig::default()
        };
        let path = config.recording_path();
        assert!(path.starts_with("/var/recordings"));
        let filename = path.file_name().unwrap().to_str().unwrap();
        assert!(filename.ends_with(".h264"));
        assert!(!filename.starts_with("session"));
    }

    #[test]
    fn test_recording_path_includes_session_prefix() {
        let config = DaemonConfig {
            session: "42".to_string(),
            ..DaemonConfig::default()
        };
        let filename = config.recording_path();
        let filename = filename.file_name().unwrap().to_str().unwrap();
        assert!(filename.starts_with("session42_"));
        assert!(filename.ends_with(".h264"));
    }
}
