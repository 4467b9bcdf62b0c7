use std::fmt;

/// Errors returned by the map and cursor operations.
///
/// A failed operation never modifies the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
	/// The requested key is not in the map.
	KeyNotFound,

	/// The cursor is past the valid range, belongs to another map,
	/// or names a binding that has been erased.
	InvalidIterator,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::KeyNotFound => write!(f, "key not found"),
			Error::InvalidIterator => write!(f, "invalid iterator"),
		}
	}
}

impl std::error::Error for Error {}
