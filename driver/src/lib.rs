pub mod camera;

// Re-export the capability surface for consumers
pub use camera::{
    controls, create_driver, CameraConfig, CameraDriver, ControlValue, DriverError, DriverStatus,
    DriverType, EncoderConfig, MockDriver, MockHandle,
};
