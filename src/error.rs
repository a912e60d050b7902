pub type Result<T> = core::result::Result<T, Error>;

pub struct Error {
    pub inner: Box<ErrorKind>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            inner: Box::new(kind),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.inner
    }

    /// The server rejected (or we never had) the bearer token; the caller
    /// should send the user back to login.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(*self.inner, ErrorKind::Unauthenticated(_))
    }

    /// Worth offering a retry: transport failures and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match *self.inner {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(_) => true,
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(_) => true,
            ErrorKind::ApiError { status, .. } => status >= 500,
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(*self.inner, ErrorKind::Cancelled)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind)
    }
}

#[cfg(feature = "no-wasm")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::new(ErrorKind::ReqwestError(e))
    }
}

#[cfg(feature = "wasm")]
impl From<gloo_net::Error> for Error {
    fn from(e: gloo_net::Error) -> Error {
        Error::new(ErrorKind::GlooNetError(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::new(ErrorKind::SerdeJsonError(e))
    }
}

impl From<base64_simd::Error> for Error {
    fn from(e: base64_simd::Error) -> Error {
        Error::new(ErrorKind::Base64Error(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::new(ErrorKind::StdIoError(e))
    }
}

pub enum ErrorKind {
    #[cfg(feature = "no-wasm")]
    ReqwestError(reqwest::Error),
    #[cfg(feature = "wasm")]
    GlooNetError(gloo_net::Error),
    SerdeJsonError(serde_json::Error),
    Base64Error(base64_simd::Error),
    StdIoError(std::io::Error),
    StorageError(String),
    ParseError(String),
    Unauthenticated(String),
    Forbidden(String),
    ApiError { status: u16, message: String },
    Cancelled,
}

impl std::fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(ref e) => write!(f, "ReqwestError: {e:?}"),
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(ref e) => write!(f, "GlooNetError: {e:?}"),
            ErrorKind::SerdeJsonError(ref e) => write!(f, "SerdeJsonError: {e:?}"),
            ErrorKind::Base64Error(ref e) => write!(f, "Base64Error: {e:?}"),
            ErrorKind::StdIoError(ref e) => write!(f, "StdIoError: {e:?}"),
            ErrorKind::StorageError(ref e) => write!(f, "StorageError: {e:?}"),
            ErrorKind::ParseError(ref e) => write!(f, "ParseError: {e:?}"),
            ErrorKind::Unauthenticated(ref e) => write!(f, "Unauthenticated: {e:?}"),
            ErrorKind::Forbidden(ref e) => write!(f, "Forbidden: {e:?}"),
            ErrorKind::ApiError {
                status,
                ref message,
            } => write!(f, "ApiError({status}): {message:?}"),
            ErrorKind::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(ref e) => write!(f, "network error: {e}"),
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(ref e) => write!(f, "network error: {e}"),
            ErrorKind::SerdeJsonError(ref e) => write!(f, "invalid JSON: {e}"),
            ErrorKind::Base64Error(ref e) => write!(f, "invalid base64: {e}"),
            ErrorKind::StdIoError(ref e) => write!(f, "io error: {e}"),
            ErrorKind::StorageError(ref e) => write!(f, "token storage error: {e}"),
            ErrorKind::ParseError(ref e) => write!(f, "{e}"),
            ErrorKind::Unauthenticated(ref e) => write!(f, "not signed in: {e}"),
            ErrorKind::Forbidden(ref e) => write!(f, "forbidden: {e}"),
            ErrorKind::ApiError {
                status,
                ref message,
            } => write!(f, "server returned {status}: {message}"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
