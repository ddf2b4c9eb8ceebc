//! Client stub
//!
//! Async client for the proxy's request channel, one method per operation.
//! The caller owns the connection and should `quit` when done.

use std::net::SocketAddr;

use log::debug;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::error::ClientError;
use crate::protocol::responses::{self, parse_response};

pub struct ProxyClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl ProxyClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self, ClientError> {
        let (read_half, writer) = TcpStream::connect(addr).await?.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer,
        })
    }

    pub async fn path_exists(&mut self, path: &str) -> Result<bool, ClientError> {
        let line = format!("PATHEXISTS {}", quote(path)?);
        self.call_bool(line).await
    }

    pub async fn path_valid(&mut self, path: &str) -> Result<bool, ClientError> {
        let line = format!("PATHVALID {}", quote(path)?);
        self.call_bool(line).await
    }

    pub async fn mkdir(&mut self, path: &str) -> Result<(), ClientError> {
        let line = format!("MKDIR {}", quote(path)?);
        self.call_ok(line).await
    }

    pub async fn rmdir(&mut self, path: &str, force: bool) -> Result<(), ClientError> {
        let line = format!("RMDIR {} {}", quote(path)?, force);
        self.call_ok(line).await
    }

    pub async fn link_path(&mut self, target: &str, link: &str) -> Result<(), ClientError> {
        let line = format!("LINKPATH {} {}", quote(target)?, quote(link)?);
        self.call_ok(line).await
    }

    pub async fn is_mount_point(&mut self, path: &str) -> Result<bool, ClientError> {
        let line = format!("ISMOUNTPOINT {}", quote(path)?);
        self.call_bool(line).await
    }

    /// Ends the session.
    pub async fn quit(mut self) -> Result<(), ClientError> {
        let (code, message) = self.call("QUIT".into()).await?;
        match code {
            responses::GOODBYE => Ok(()),
            code => Err(ClientError::Remote { code, message }),
        }
    }

    async fn call_bool(&mut self, line: String) -> Result<bool, ClientError> {
        match self.call(line).await? {
            (responses::BOOLEAN_RESULT, message) => match message.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(ClientError::UnexpectedResponse(message)),
            },
            (code, message) => Err(ClientError::Remote { code, message }),
        }
    }

    async fn call_ok(&mut self, line: String) -> Result<(), ClientError> {
        match self.call(line).await? {
            (responses::ACTION_OK, _) => Ok(()),
            (code, message) => Err(ClientError::Remote { code, message }),
        }
    }

    async fn call(&mut self, mut line: String) -> Result<(u16, String), ClientError> {
        debug!("Sending {}", line);
        line.push_str("\r\n");
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;

        let mut response = String::new();
        if self.reader.read_line(&mut response).await? == 0 {
            return Err(ClientError::ConnectionClosed);
        }

        parse_response(&response)
            .map(|(code, message)| (code, message.to_string()))
            .ok_or_else(|| ClientError::UnexpectedResponse(response.trim_end().to_string()))
    }
}

/// Wraps an argument in quotes so embedded whitespace survives the trip.
fn quote(arg: &str) -> Result<String, ClientError> {
    if arg.contains(['"', '\r', '\n']) {
        return Err(ClientError::InvalidArgument(arg.to_string()));
    }
    Ok(format!("\"{}\"", arg))
}
