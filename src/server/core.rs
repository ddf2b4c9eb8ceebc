use log::{error, info, warn};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::mediation::FsProxy;
use crate::middleware::logging::log_connection;
use crate::protocol::responses::{SERVICE_UNAVAILABLE, format_response};
use crate::server::connection::handle_connection;

pub struct Server {
    connections: Arc<Mutex<HashSet<SocketAddr>>>,
    listener: TcpListener,
    proxy: Arc<FsProxy>,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listener for the host filesystem proxy described by `config`.
    pub async fn bind(config: ServerConfig) -> std::io::Result<Self> {
        let proxy = FsProxy::from_config(&config);
        Self::bind_with(config, proxy).await
    }

    /// Binds the listener and serves requests through `proxy`.
    pub async fn bind_with(config: ServerConfig, proxy: FsProxy) -> std::io::Result<Self> {
        let socket = config.listen_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            e
        })?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            connections: Arc::new(Mutex::new(HashSet::new())),
            listener,
            proxy: Arc::new(proxy),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting filesystem proxy on {} (max {} clients, resolver {:?})",
            self.config.listen_socket(),
            self.config.max_clients,
            self.config.resolver.kind
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let connections = Arc::clone(&self.connections);
                    let proxy = Arc::clone(&self.proxy);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each connection so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_connection(stream, addr, connections, proxy, config).await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Registers a new connection if there is room, then serves it until it closes.
async fn handle_new_connection(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    connections: Arc<Mutex<HashSet<SocketAddr>>>,
    proxy: Arc<FsProxy>,
    config: Arc<ServerConfig>,
) -> Result<(), std::io::Error> {
    {
        let mut active = connections.lock().await;
        if active.len() >= config.max_clients {
            warn!(
                "Refusing {}: {} clients already connected",
                client_addr,
                active.len()
            );
            let message = format_response(SERVICE_UNAVAILABLE, "Too many connections");
            stream.write_all(message.as_bytes()).await?;
            return Ok(());
        }
        active.insert(client_addr);
    }

    log_connection(&client_addr);
    handle_connection(stream, client_addr, proxy, config.max_request_length).await;

    connections.lock().await.remove(&client_addr);
    Ok(())
}
