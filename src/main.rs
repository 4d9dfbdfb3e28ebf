use brick_mcp::config::fetch_arguments;
use brick_mcp::dispatcher::dispatcher::Dispatcher;
use brick_mcp::hardware::hardware;
use brick_mcp::logging;
use brick_mcp::network::{http, server};
use brick_mcp::robot_controller::robot::Robot;
use brick_mcp::robot_controller::state::SharedStatus;
use brick_mcp::signals;

use log::{error, info};
use std::process;
use std::sync::Arc;
use std::thread::spawn;

fn main() {
    let config = match fetch_arguments::fetch_command_line_arguments() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: brick-mcp [host=..] [port=..] [hardware=ev3dev|sim|none] [drive_power=..] [search_power=..] [search_timeout=..] [poll_interval=..] [sysfs_root=..] [log=..]");
            process::exit(2);
        }
    };

    if let Err(e) = logging::init(config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let status = SharedStatus::new();
    let robot = Robot::new(hardware::probe(&config), config.profile, status.clone());
    let dispatcher = Arc::new(Dispatcher::new(robot, status));

    let shutdown_rx = match signals::shutdown_signal() {
        Ok(shutdown_rx) => shutdown_rx,
        Err(e) => {
            error!("Failed to install signal handlers: {}", e);
            process::exit(1);
        }
    };

    {
        let dispatcher = Arc::clone(&dispatcher);
        let shutdown_rx = shutdown_rx.clone();
        spawn(move || {
            let _ = shutdown_rx.recv();
            dispatcher.shutdown();
        });
    }

    let listener = match http::create_listener(&config.address()) {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.address(), e);
            process::exit(1);
        }
    };

    if let Err(e) = server::serve(listener, Arc::clone(&dispatcher), shutdown_rx) {
        error!("Server error: {}", e);
        process::exit(1);
    }
    dispatcher.shutdown();
    info!("Bye");
}
