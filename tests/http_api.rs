//! End-to-end tests against the HTTP server on a loopback socket.

use brick_mcp::config::config::DriveProfile;
use brick_mcp::dispatcher::dispatcher::Dispatcher;
use brick_mcp::hardware::hardware::{ColorReading, Hardware};
use brick_mcp::hardware::sim::SimRobot;
use brick_mcp::network::{http, server};
use brick_mcp::robot_controller::robot::Robot;
use brick_mcp::robot_controller::state::SharedStatus;

use crossbeam_channel as cbc;
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

struct TestServer {
    address: SocketAddr,
    // Dropping the sender stops the accept loop.
    _shutdown_tx: cbc::Sender<()>,
}

fn start(hardware: Hardware) -> TestServer {
    let status = SharedStatus::new();
    let profile = DriveProfile {
        search_timeout: Duration::from_millis(200),
        poll_interval: Duration::from_millis(10),
        ..DriveProfile::default()
    };
    let dispatcher = Arc::new(Dispatcher::new(Robot::new(hardware, profile, status.clone()), status));

    let listener = http::create_listener("127.0.0.1:0").expect("failed to bind test listener");
    let address = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = cbc::bounded::<()>(0);
    thread::spawn(move || server::serve(listener, dispatcher, shutdown_rx));

    TestServer {
        address,
        _shutdown_tx: shutdown_tx,
    }
}

fn sim_hardware(sim: &SimRobot) -> Hardware {
    Hardware::new(Some(Box::new(sim.motors())), Some(Box::new(sim.color_sensor())))
}

fn request(address: SocketAddr, method: &str, path: &str, body: Option<&str>) -> (u16, Value) {
    let mut stream = TcpStream::connect(address).expect("failed to connect");
    let body = body.unwrap_or("");
    write!(
        stream,
        "{} {} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        method,
        path,
        body.len(),
        body
    )
    .unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    let (head, body) = response.split_once("\r\n\r\n").expect("response without header end");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .expect("missing status code");
    (status, serde_json::from_str(body).expect("response body is not JSON"))
}

fn post_command(address: SocketAddr, text: &str) -> (u16, Value) {
    let body = json!({ "messages": [text] }).to_string();
    request(address, "POST", "/mcp", Some(&body))
}

#[test]
fn move_command_succeeds() {
    let sim = SimRobot::new();
    let server = start(sim_hardware(&sim));

    let (status, body) = post_command(server.address, "move backward for 0.05 seconds");
    assert_eq!(status, 200);
    assert_eq!(body["response"]["status"], "success");
    assert_eq!(body["response"]["message"], "Moved backward for 0.05 seconds");
    assert_eq!(
        body["context"]["robot_status"],
        json!({"status": "idle", "position": null, "current_action": null})
    );
    assert!(sim.is_stopped());
}

#[test]
fn missing_hardware_is_service_unavailable() {
    let server = start(Hardware::absent());

    let (status, body) = post_command(server.address, "move backward for 2 seconds");
    assert_eq!(status, 503);
    assert_eq!(body["detail"], "Robot hardware not initialized");
    assert_eq!(body["context"]["robot_status"]["status"], "error");

    let (status, body) = request(server.address, "GET", "/status", None);
    assert_eq!(status, 200);
    assert_eq!(body["status"], "error");
}

#[test]
fn goto_then_status_reports_position() {
    let sim = SimRobot::new();
    sim.set_color_after_reads(2, ColorReading::Green);
    let server = start(sim_hardware(&sim));

    let (status, body) = post_command(server.address, "please find the green circle");
    assert_eq!(status, 200);
    assert_eq!(body["response"]["message"], "Reached green-circle");

    let (_, body) = request(server.address, "GET", "/status", None);
    assert_eq!(body, json!({"status": "idle", "position": "green-circle", "current_action": null}));
}

#[test]
fn search_timeout_is_not_found() {
    let sim = SimRobot::new();
    let server = start(sim_hardware(&sim));

    let (status, body) = post_command(server.address, "go to the red circle");
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "Could not find red circle");
    assert!(sim.is_stopped());
}

#[test]
fn bad_input_is_rejected() {
    let sim = SimRobot::new();
    let server = start(sim_hardware(&sim));

    let (status, body) = post_command(server.address, "xyzzy");
    assert_eq!(status, 400);
    assert_eq!(body["detail"], "Unknown command");

    let (status, body) = request(server.address, "POST", "/mcp", Some("{\"messages\": []}"));
    assert_eq!(status, 400);
    assert_eq!(body["detail"], "No messages provided");

    let (status, _) = request(server.address, "POST", "/mcp", Some("not json"));
    assert_eq!(status, 400);

    let (status, _) = request(server.address, "GET", "/nowhere", None);
    assert_eq!(status, 404);

    let (status, _) = request(server.address, "GET", "/mcp", None);
    assert_eq!(status, 405);
}

#[test]
fn stop_endpoint_cancels_running_move() {
    let sim = SimRobot::new();
    let server = start(sim_hardware(&sim));

    let (status, body) = request(server.address, "POST", "/stop", None);
    assert_eq!(status, 200);
    assert_eq!(body["stopped"], false);

    let address = server.address;
    let mover = thread::spawn(move || post_command(address, "forward for 10 seconds"));

    let mut stopped = false;
    for _ in 0..200 {
        thread::sleep(Duration::from_millis(10));
        let (_, body) = request(server.address, "POST", "/stop", None);
        if body["stopped"] == true {
            stopped = true;
            break;
        }
    }
    assert!(stopped, "move never became cancellable");

    let (status, body) = mover.join().unwrap();
    assert_eq!(status, 503);
    assert_eq!(body["detail"], "Operation cancelled");
    assert!(sim.is_stopped());
}
