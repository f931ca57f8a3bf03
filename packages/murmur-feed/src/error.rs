pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Cache error: {message}")]
	Cache { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
	#[error("{operation} timed out after {timeout_ms} ms.")]
	Timeout { operation: &'static str, timeout_ms: u64 },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<murmur_storage::Error> for Error {
	fn from(err: murmur_storage::Error) -> Self {
		match err {
			murmur_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			murmur_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			murmur_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
