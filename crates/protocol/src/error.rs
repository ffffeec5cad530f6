use overlays::OverlayError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The message is not valid JSON for any known method.
    Json(String),
    InvalidPattern(String),
    InvalidStamp(String),
    /// The controller rejected the update.
    Overlay(OverlayError),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Json(msg) => write!(f, "malformed message: {msg}"),
            ProtocolError::InvalidPattern(msg) => write!(f, "invalid pattern: {msg}"),
            ProtocolError::InvalidStamp(msg) => write!(f, "invalid stamp style: {msg}"),
            ProtocolError::Overlay(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Overlay(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OverlayError> for ProtocolError {
    fn from(err: OverlayError) -> Self {
        ProtocolError::Overlay(err)
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Json(err.to_string())
    }
}
