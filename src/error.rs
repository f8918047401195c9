use thiserror::Error;

/// Contract violations that abort a run.
///
/// Remote failures never surface here: the SoT and repository clients log them
/// and hand back empty data instead.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("environment variable {0} must be set")]
    MissingEnv(&'static str),

    #[error("speed {speed} on {host}:{interface} not supported yet")]
    UnsupportedSpeed {
        host: String,
        interface: String,
        speed: u64,
    },

    #[error("subinterface {host}:{interface} must be access mode")]
    SubinterfaceMode { host: String, interface: String },

    #[error("cannot extract subinterface index from {0}")]
    SubinterfaceId(String),

    #[error("no prefix found for hostname: {0}")]
    NoHostPrefix(String),

    #[error("FHRP group {0} has no IP addresses")]
    FhrpGroupWithoutAddress(i64),

    #[error("invalid IP address {address} on {interface}")]
    InvalidAddress { interface: String, address: String },

    #[error("{field} value {value} out of range")]
    OutOfRange { field: &'static str, value: String },

    #[error("serialization failed for {path}: {message}")]
    Serialize { path: String, message: String },
}
