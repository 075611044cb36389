use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while reading a training corpus from disk.
#[derive(Debug, Error)]
pub enum CorpusError {
	/// The file could not be opened or read.
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// The file content is not valid in the requested encoding.
	#[error("invalid {encoding} data at byte {offset}")]
	Decode { encoding: TextEncoding, offset: usize },

	/// The encoding label is not recognized.
	#[error("unknown text encoding: {0}")]
	UnknownEncoding(String),
}

/// Character encoding of a training file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextEncoding {
	/// Strict UTF-8. A leading byte order mark is dropped.
	#[default]
	Utf8,
	/// UTF-8 where invalid sequences become U+FFFD.
	Utf8Lossy,
	/// ISO-8859-1, every byte maps to the code point of the same value.
	Latin1,
	/// Strict 7-bit ASCII.
	Ascii,
	/// Strict UTF-16, byte order taken from the byte order mark,
	/// little endian when there is none. The mark is dropped.
	Utf16,
	/// Strict UTF-16, little endian. A leading byte order mark is dropped.
	Utf16Le,
	/// Strict UTF-16, big endian. A leading byte order mark is dropped.
	Utf16Be,
}

impl TextEncoding {
	/// Decodes raw bytes into a `String`.
	///
	/// # Errors
	/// Returns `CorpusError::Decode` if `bytes` is not valid for this encoding.
	pub fn decode(self, bytes: &[u8]) -> Result<String, CorpusError> {
		match self {
			Self::Utf8 => {
				let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
				String::from_utf8(bytes.to_vec()).map_err(|e| CorpusError::Decode {
					encoding: self,
					offset: e.utf8_error().valid_up_to(),
				})
			}
			Self::Utf8Lossy => Ok(String::from_utf8_lossy(bytes).into_owned()),
			Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
			Self::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
				Some(offset) => Err(CorpusError::Decode { encoding: self, offset }),
				None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
			},
			Self::Utf16 => self.decode_utf16(bytes, bytes.starts_with(b"\xFE\xFF")),
			Self::Utf16Le => self.decode_utf16(bytes, false),
			Self::Utf16Be => self.decode_utf16(bytes, true),
		}
	}

	fn decode_utf16(self, bytes: &[u8], big_endian: bool) -> Result<String, CorpusError> {
		if bytes.len() % 2 != 0 {
			return Err(CorpusError::Decode { encoding: self, offset: bytes.len() - 1 });
		}

		let units = bytes.chunks_exact(2).map(|pair| {
			if big_endian {
				u16::from_be_bytes([pair[0], pair[1]])
			} else {
				u16::from_le_bytes([pair[0], pair[1]])
			}
		});

		let mut text = String::with_capacity(bytes.len() / 2);
		// Code units consumed so far, a surrogate pair counts for two
		let mut position = 0;
		for decoded in char::decode_utf16(units) {
			match decoded {
				Ok('\u{FEFF}') if position == 0 => (),
				Ok(c) => text.push(c),
				Err(_) => return Err(CorpusError::Decode { encoding: self, offset: position * 2 }),
			}
			position += decoded.map_or(1, char::len_utf16);
		}
		Ok(text)
	}
}

impl fmt::Display for TextEncoding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Utf8 => "utf-8",
			Self::Utf8Lossy => "utf-8-lossy",
			Self::Latin1 => "latin-1",
			Self::Ascii => "ascii",
			Self::Utf16 => "utf-16",
			Self::Utf16Le => "utf-16le",
			Self::Utf16Be => "utf-16be",
		};
		f.write_str(label)
	}
}

impl FromStr for TextEncoding {
	type Err = CorpusError;

	/// Parses an encoding label, ignoring case, `-` and `_`.
	///
	/// Examples: `"UTF-8"`, `"utf8"`, `"latin_1"`, `"ISO-8859-1"`, `"us-ascii"`.
	fn from_str(label: &str) -> Result<Self, Self::Err> {
		let key: String = label
			.chars()
			.filter(|c| *c != '-' && *c != '_')
			.flat_map(char::to_lowercase)
			.collect();

		match key.as_str() {
			"utf8" => Ok(Self::Utf8),
			"utf8lossy" => Ok(Self::Utf8Lossy),
			"latin1" | "iso88591" => Ok(Self::Latin1),
			"ascii" | "usascii" => Ok(Self::Ascii),
			"utf16" => Ok(Self::Utf16),
			"utf16le" => Ok(Self::Utf16Le),
			"utf16be" => Ok(Self::Utf16Be),
			_ => Err(CorpusError::UnknownEncoding(label.to_owned())),
		}
	}
}

/// Reads a whole text file and decodes it.
///
/// # Errors
/// - `CorpusError::Io` if the file cannot be read, unchanged
/// - `CorpusError::Decode` if the bytes do not match `encoding`
pub(crate) fn read_text<P: AsRef<Path>>(path: P, encoding: TextEncoding) -> Result<String, CorpusError> {
	let bytes = fs::read(path.as_ref())?;
	log::debug!(
		"read {} bytes from {} as {}",
		bytes.len(),
		path.as_ref().display(),
		encoding
	);
	encoding.decode(&bytes)
}
