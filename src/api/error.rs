use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} returned status {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
    },

    #[error("Runtime error: {0}")]
    Runtime(#[source] std::io::Error),
}
