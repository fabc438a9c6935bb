// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context as _, Result};
use serde::de::DeserializeOwned;
use std::{fs, io::ErrorKind, path::Path};

/// Read a TOML file into `T`, or `None` when the file does not exist.
///
/// A file that exists but can't be read or parsed is an error.
pub fn read_toml_if_exists<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<Option<T>> {
	fn inner(path: &Path) -> Result<Option<String>> {
		match fs::read_to_string(path) {
			Ok(contents) => Ok(Some(contents)),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e)
				.with_context(|| format!("failed to read as UTF-8 string '{}'", path.display())),
		}
	}

	let path = path.as_ref();

	let Some(contents) = inner(path)? else {
		return Ok(None);
	};

	toml::de::from_str(&contents)
		.map(Some)
		.with_context(|| format!("failed to read as TOML '{}'", path.display()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::Deserialize;
	use tempfile::TempDir;

	#[derive(Debug, Deserialize, PartialEq)]
	struct Sample {
		name: String,
	}

	#[test]
	fn missing_file_is_none() {
		let dir = TempDir::with_prefix("repo-insight").unwrap();
		let read: Option<Sample> = read_toml_if_exists(dir.path().join("absent.toml")).unwrap();
		assert_eq!(read, None);
	}

	#[test]
	fn malformed_file_is_an_error() {
		let dir = TempDir::with_prefix("repo-insight").unwrap();
		let path = dir.path().join("bad.toml");
		fs::write(&path, "name = ").unwrap();

		let error = read_toml_if_exists::<_, Sample>(&path).unwrap_err();
		assert!(error.to_string().starts_with("failed to read as TOML"));
	}

	#[test]
	fn reads_existing_file() {
		let dir = TempDir::with_prefix("repo-insight").unwrap();
		let path = dir.path().join("good.toml");
		fs::write(&path, "name = \"express\"\n").unwrap();

		let read: Option<Sample> = read_toml_if_exists(&path).unwrap();
		assert_eq!(
			read,
			Some(Sample {
				name: "express".into()
			})
		);
	}
}
