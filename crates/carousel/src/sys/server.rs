use crate::events::AppEvent;
use async_channel::Sender;
use orbit::Direction;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/carousel.sock";

/// Maps one line received on the socket to an event. Unknown commands are
/// ignored.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    match line.trim() {
        "reload" => Some(AppEvent::ConfigReload),
        other => Direction::from_str(other).ok().map(AppEvent::Rotate),
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    if fs_err::metadata(SOCKET_PATH).is_ok() {
        let _ = fs_err::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening for commands on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_command(&line) {
                            Some(event) => {
                                let _ = tx.send(event).await;
                            }
                            None => log::warn!("Unknown command: {:?}", line.trim()),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
