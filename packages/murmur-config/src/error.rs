use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot open murmur config {}.", path.display())]
	Unreadable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Murmur config {} is not valid TOML.", path.display())]
	Malformed {
		path: PathBuf,
		#[source]
		source: Box<toml::de::Error>,
	},
	#[error("Invalid config: {message}")]
	Invalid { message: String },
}
