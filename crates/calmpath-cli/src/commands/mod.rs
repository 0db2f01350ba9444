pub mod breathe;
pub mod catalog;
pub mod config;
pub mod shop;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Build the runtime used by commands that wait on timers.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}
