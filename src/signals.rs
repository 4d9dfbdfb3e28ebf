use crossbeam_channel as cbc;
use log::warn;

/// Installs the SIGINT/SIGTERM handler. The returned receiver is disconnected
/// once either signal arrives.
pub fn shutdown_signal() -> Result<cbc::Receiver<()>, ctrlc::Error> {
    let (shutdown_tx, shutdown_rx) = cbc::bounded::<()>(0);
    let mut shutdown_tx = Some(shutdown_tx);
    ctrlc::set_handler(move || {
        if shutdown_tx.take().is_some() {
            warn!("Shutdown requested");
        }
    })?;
    Ok(shutdown_rx)
}
