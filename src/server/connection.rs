use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::error::handlers::error_to_code;
use crate::error::{ProtocolError, ProxyError};
use crate::mediation::FsProxy;
use crate::middleware::logging::{log_disconnect, log_request};
use crate::protocol::responses::{SERVICE_UNAVAILABLE, format_response};
use crate::protocol::{ResponseStatus, handle_line};

/// Serves one client connection.
///
/// - Reads request lines with a BufReader, never buffering more than
///   `max_request_length` plus the line terminator. A longer line gets a
///   syntax error and the connection is closed.
/// - Runs each request on a blocking thread: filesystem and resolver calls may
///   block for as long as the OS lets them.
/// - Writes exactly one response line per request.
pub async fn handle_connection(
    stream: TcpStream,
    client_addr: SocketAddr,
    proxy: Arc<FsProxy>,
    max_request_length: usize,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    let line_limit = max_request_length as u64 + 2;

    loop {
        line.clear();
        let read = (&mut reader).take(line_limit).read_line(&mut line).await;
        match read {
            Ok(0) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(n) if n as u64 == line_limit && !line.ends_with('\n') => {
                warn!(
                    "Request from {} exceeds {} bytes, closing connection",
                    client_addr, max_request_length
                );
                let err = ProxyError::from(ProtocolError::RequestTooLong(max_request_length));
                let message = format_response(error_to_code(&err), &err.to_string());
                let _ = write_half.write_all(message.as_bytes()).await;
                let _ = write_half.shutdown().await;
                break;
            }
            Ok(_) => {
                let request = line.trim_end_matches(['\r', '\n']).to_string();
                log_request(&client_addr, &request);

                let proxy = Arc::clone(&proxy);
                let result = tokio::task::spawn_blocking(move || {
                    handle_line(&proxy, &request, max_request_length)
                })
                .await;

                let result = match result {
                    Ok(result) => result,
                    Err(e) => {
                        error!("Request handler for {} failed: {}", client_addr, e);
                        let message = format_response(SERVICE_UNAVAILABLE, "Internal error");
                        let _ = write_half.write_all(message.as_bytes()).await;
                        break;
                    }
                };

                if let Err(e) = write_half.write_all(result.message.as_bytes()).await {
                    error!("Failed to write to {}: {}", client_addr, e);
                    break;
                }

                if result.status == ResponseStatus::CloseConnection {
                    info!("Client {} requested to quit", client_addr);
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        }
    }

    log_disconnect(&client_addr);
}
