//! Just enough HTTP/1.1 for a JSON API: one request per connection.

use crate::config::config;

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

pub fn create_listener(address: &str) -> io::Result<net::TcpListener> {
    let address = net::ToSocketAddrs::to_socket_addrs(address)?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no address to bind"))?;
    let domain = socket2::Domain::for_address(address);
    let socket = socket2::Socket::new(domain, socket2::Type::STREAM, Some(socket2::Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    socket.bind(&address.into())?;
    socket.listen(128)?;

    let listener = net::TcpListener::from(socket);
    listener.set_nonblocking(true)?;

    Ok(listener)
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}

pub fn read_request<R: Read>(stream: R) -> io::Result<Request> {
    let mut reader = BufReader::new(stream.take(config::MAX_REQUEST_BYTES as u64));

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().ok_or_else(|| invalid("empty request line"))?.to_string();
    let target = parts.next().ok_or_else(|| invalid("missing request target"))?;
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<usize>().map_err(|_| invalid("bad content-length"))?;
            }
        }
    }

    if content_length > config::MAX_REQUEST_BYTES {
        return Err(invalid("request body too large"));
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body)?;

    Ok(Request { method, path, body })
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

pub fn write_json<W: Write, T: serde::Serialize>(stream: &mut W, status: u16, body: &T) -> io::Result<()> {
    let serialized = serde_json::to_vec(body)?;
    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason_phrase(status),
        serialized.len()
    )?;
    stream.write_all(&serialized)?;
    stream.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_request_with_body() {
        let raw = "POST /mcp?debug=1 HTTP/1.1\r\nHost: localhost\r\ncontent-length: 13\r\n\r\n{\"a\": [true]}";
        let request = read_request(raw.as_bytes()).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/mcp");
        assert_eq!(request.body, b"{\"a\": [true]}".to_vec());
    }

    #[test]
    fn reads_request_without_body() {
        let request = read_request("GET /status HTTP/1.1\r\n\r\n".as_bytes()).unwrap();
        assert_eq!(request.method, "GET");
        assert!(request.body.is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert!(read_request("".as_bytes()).is_err());
        assert!(read_request("POST /mcp HTTP/1.1\r\nContent-Length: x\r\n\r\n".as_bytes()).is_err());
    }

    #[test]
    fn writes_json_response() {
        let mut out = Vec::new();
        write_json(&mut out, 404, &json!({"detail": "Not Found"})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Length: 22\r\n"));
        assert!(text.ends_with("\r\n\r\n{\"detail\":\"Not Found\"}"));
    }
}
