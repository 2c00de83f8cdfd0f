use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("couldn't connect to {addr}: {source}")]
    Connect { addr: String, source: io::Error },
    #[error("connection to server is closed")]
    Closed,
    #[error("unknown {what}: {value:?}")]
    UnknownOption { what: &'static str, value: String },
}
