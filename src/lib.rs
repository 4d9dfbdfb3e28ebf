pub mod logging;
pub mod signals;

pub mod hardware {
    pub mod ev3dev;
    pub mod hardware;
    pub mod sim;
}

pub mod robot_controller {
    pub mod direction;
    pub mod error;
    pub mod motion;
    pub mod parser;
    pub mod robot;
    pub mod seeker;
    pub mod state;
    pub mod timer;
}

pub mod config {
    pub mod config;
    pub mod fetch_arguments;
}

pub mod dispatcher {
    pub mod dispatcher;
    pub mod mcp_message;
}

pub mod network {
    pub mod http;
    pub mod server;
}
