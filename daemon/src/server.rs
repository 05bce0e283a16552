use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::command::{self, Command};
use crate::controller::{CameraController, ControlError};

const UNKNOWN_COMMAND_REPLY: &[u8] = b"Unknown command.\n";

/// Accept loop. Every accepted socket gets its own handler task, so the loop
/// never waits on a client. Accept errors are logged and the loop continues;
/// only the shutdown token ends it.
pub async fn run(
    listener: TcpListener,
    controller: Arc<Mutex<CameraController>>,
    read_timeout: Option<Duration>,
    shutdown: CancellationToken,
) {
    info!("waiting for connections");
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("listener shutting down");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((socket, addr)) => {
                        info!("connected to {}", addr);
                        let controller = controller.clone();
                        tokio::spawn(async move {
                            handle_connection(socket, addr, controller, read_timeout).await;
                        });
                    }
                    Err(e) => {
                        error!("accept error: {}", e);
                    }
                }
            }
        }
    }
}

/// Per-connection read loop. Commands are applied in the order received on
/// this connection. Exits on `stop`, EOF, a read error or the read timeout;
/// the socket is closed on every exit path when the halves drop.
pub async fn handle_connection(
    socket: TcpStream,
    addr: SocketAddr,
    controller: Arc<Mutex<CameraController>>,
    read_timeout: Option<Duration>,
) {
    let (read_half, mut write_half) = socket.into_split();
    let mut lines = BufReader::new(read_half).lines();

    loop {
        let line = match next_line(&mut lines, read_timeout).await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("client {} closed the connection", addr);
                break;
            }
            Err(e) => {
                warn!("read error from {}: {}", addr, e);
                break;
            }
        };

        let parsed = match command::parse(&line) {
            Some(parsed) => parsed,
            None => continue,
        };

        match parsed {
            Command::Stop => {
                let mut controller = controller.lock().await;
                if let Err(e) = controller.stop().await {
                    error!("error stopping camera: {}", e);
                }
                break;
            }
            Command::Unknown(raw) => {
                debug!("unknown command from {}: {:?}", addr, raw);
                if write_half.write_all(UNKNOWN_COMMAND_REPLY).await.is_err() {
                    break;
                }
            }
            adjustment => {
                if let Err(e) = apply_adjustment(&controller, adjustment).await {
                    debug!("rejected command from {}: {}", addr, e);
                    if send_error_notice(&mut write_half, &e).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    info!("connection to {} closed", addr);
}

/// Read the next line, bounded by the configured timeout when one is set.
async fn next_line(
    lines: &mut Lines<BufReader<OwnedReadHalf>>,
    read_timeout: Option<Duration>,
) -> io::Result<Option<String>> {
    match read_timeout {
        Some(timeout) => match tokio::time::timeout(timeout, lines.next_line()).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "client read timed out",
            )),
        },
        None => lines.next_line().await,
    }
}

/// Apply one adjustment under the controller lock. The read-modify-write and
/// its device push happen inside a single lock acquisition, so concurrent
/// connections cannot interleave partial updates.
async fn apply_adjustment(
    controller: &Mutex<CameraController>,
    command: Command,
) -> Result<(), ControlError> {
    let mut controller = controller.lock().await;
    match command {
        Command::IncreaseGain => controller.adjust_gain(true).await.map(|_| ()),
        Command::DecreaseGain => controller.adjust_gain(false).await.map(|_| ()),
        Command::IncreaseExposure => controller.adjust_exposure(true).await.map(|_| ()),
        Command::DecreaseExposure => controller.adjust_exposure(false).await.map(|_| ()),
        Command::ToggleHdr => controller.toggle_hdr().await.map(|_| ()),
        Command::IncreaseSharpness => controller.adjust_sharpness(true).await.map(|_| ()),
        Command::DecreaseSharpness => controller.adjust_sharpness(false).await.map(|_| ()),
        // Stop and Unknown are handled by the connection loop.
        Command::Stop | Command::Unknown(_) => Ok(()),
    }
}

async fn send_error_notice(
    write_half: &mut OwnedWriteHalf,
    error: &ControlError,
) -> io::Result<()> {
    write_half
        .write_all(format!("Error: {}\n", error).as_bytes())
        .await
}
