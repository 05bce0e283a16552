pub mod mock_driver;
pub mod types;

// Re-export types for convenience
pub use self::mock_driver::{MockDriver, MockHandle};
pub use self::types::{
    controls, create_driver, CameraConfig, CameraDriver, ControlValue, DriverError, DriverStatus,
    DriverType, EncoderConfig,
};
