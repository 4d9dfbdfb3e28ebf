use crate::config::config;
use crate::dispatcher::dispatcher::Dispatcher;
use crate::dispatcher::mcp_message::{ErrorResponse, McpMessage};
use crate::network::http;

use crossbeam_channel as cbc;
use log::{debug, error, info, warn};
use serde_json::json;
use std::io;
use std::net;
use std::sync::Arc;
use std::thread;

fn detail(message: &str) -> ErrorResponse {
    ErrorResponse {
        detail: message.to_string(),
        context: None,
    }
}

fn route<W: io::Write>(stream: &mut W, request: &http::Request, dispatcher: &Dispatcher) -> io::Result<()> {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/mcp") => {
            let message = match serde_json::from_slice::<McpMessage>(&request.body) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Rejected malformed request body: {}", e);
                    return http::write_json(stream, 400, &detail(&format!("Invalid request body: {}", e)));
                }
            };
            match dispatcher.handle_message(&message) {
                Ok(response) => http::write_json(stream, 200, &response),
                Err(e) => http::write_json(stream, e.status_code(), &dispatcher.error_response(&e)),
            }
        }
        ("GET", "/status") => http::write_json(stream, 200, &dispatcher.status()),
        ("POST", "/stop") => http::write_json(stream, 200, &json!({ "stopped": dispatcher.stop() })),
        (_, "/mcp") | (_, "/status") | (_, "/stop") => {
            http::write_json(stream, 405, &detail("Method Not Allowed"))
        }
        _ => http::write_json(stream, 404, &detail("Not Found")),
    }
}

pub fn handle_connection(mut stream: net::TcpStream, dispatcher: &Dispatcher) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(config::CONNECTION_TIMEOUT))?;

    let request = match http::read_request(&stream) {
        Ok(request) => request,
        Err(e) => {
            debug!("Could not read request: {}", e);
            return http::write_json(&mut stream, 400, &detail("Malformed HTTP request"));
        }
    };
    debug!("{} {}", request.method, request.path);
    route(&mut stream, &request, dispatcher)
}

/// Accepts connections until `shutdown_rx` fires or is disconnected. Each
/// connection is served on its own thread.
pub fn serve(listener: net::TcpListener, dispatcher: Arc<Dispatcher>, shutdown_rx: cbc::Receiver<()>) -> io::Result<()> {
    listener.set_nonblocking(true)?;
    info!("Listening on {}", listener.local_addr()?);

    loop {
        cbc::select! {
            recv(shutdown_rx) -> _ => {
                info!("Server stopped accepting connections");
                return Ok(());
            },
            default(config::ACCEPT_POLL_PERIOD) => {
                match listener.accept() {
                    Ok((stream, peer)) => {
                        debug!("New connection from {}", peer);
                        let dispatcher = Arc::clone(&dispatcher);
                        thread::spawn(move || {
                            if let Err(e) = handle_connection(stream, &dispatcher) {
                                warn!("Connection from {} failed: {}", peer, e);
                            }
                        });
                    }
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                    Err(e) => error!("Failed to accept connection: {}", e),
                }
            }
        }
    }
}
