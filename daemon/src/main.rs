use std::sync::Arc;
use std::time::Duration;

use cam_daemon::{config, controller::CameraController, server};
use cam_driver::{create_driver, CameraConfig, EncoderConfig};
use log::error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logger - Reads RUST_LOG environment variable
    env_logger::init();

    // Load daemon configuration
    let daemon_config = config::load_config(config::DEFAULT_CONFIG_PATH);
    println!("Daemon configuration:");
    println!("  Listen address: {}", daemon_config.listen_addr());
    println!("  Recordings directory: {}", daemon_config.recordings_directory);
    println!("  Video bitrate: {} bps", daemon_config.video_bitrate);
    println!("  Driver type: {:?}", daemon_config.driver_type);
    println!("  Tuning file: {:?}", daemon_config.tuning_file);

    let camera_config = CameraConfig {
        tuning_file: daemon_config.tuning_file.clone(),
        driver: daemon_config.driver_type,
        ..CameraConfig::default()
    };
    let encoder_config = EncoderConfig {
        bitrate: daemon_config.video_bitrate,
    };

    println!("Starting camera...");
    let driver = create_driver(daemon_config.driver_type);
    let mut controller = CameraController::new(driver);

    std::fs::create_dir_all(&daemon_config.recordings_directory)?;
    let output_path = daemon_config.recording_path();
    controller
        .start_session(&camera_config, &encoder_config, &output_path)
        .await?;
    println!("Camera started, recording to {}", output_path.display());

    let controller = Arc::new(Mutex::new(controller));

    // Bind failure is fatal: exit nonzero before accepting anything.
    let listen_addr = daemon_config.listen_addr();
    let listener = match TcpListener::bind(&listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind command listener on {}: {}", listen_addr, e);
            return Err(Box::new(e) as Box<dyn std::error::Error + Send + Sync>);
        }
    };
    println!("Command server listening on {}", listen_addr);

    let shutdown = CancellationToken::new();
    let mut server_handle = tokio::spawn(server::run(
        listener,
        controller.clone(),
        daemon_config.client_read_timeout_secs.map(Duration::from_secs),
        shutdown.clone(),
    ));

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!("failed to listen for shutdown signal: {}", e);
            }
            println!("Shutdown signal received");
            shutdown.cancel();
            if let Err(e) = (&mut server_handle).await {
                error!("server task failed: {}", e);
            }
        }
        result = &mut server_handle => {
            if let Err(e) = result {
                error!("server task failed: {}", e);
            }
        }
    }

    // Release the camera unless a client already stopped it.
    let mut controller = controller.lock().await;
    if let Err(e) = controller.stop().await {
        error!("error stopping camera during cleanup: {}", e);
    }

    Ok(())
}
