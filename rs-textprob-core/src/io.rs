use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds the path of the file holding `code` in `folder` with `extension`.
///
/// The extension is appended, never substituted, so dotted codes survive.
///
/// Examples:
/// - `data` + `"en"` + `"json"` → `data/en.json`
/// - `data` + `"zh.Hans"` + `"bin"` → `data/zh.Hans.bin`
pub(crate) fn language_path<P: AsRef<Path>>(folder: P, code: &str, extension: &str) -> PathBuf {
	folder.as_ref().join(format!("{code}.{extension}"))
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/en.json"` → `"en"`
/// - `"en.json"` → `"en"`
pub(crate) fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file stems only (no paths, no extension), sorted.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(get_filename(&path)?);
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn language_path_appends_extension() {
		assert_eq!(language_path("data", "en", "json"), Path::new("data").join("en.json"));
	}

	#[test]
	fn language_path_keeps_dotted_codes() {
		assert_eq!(language_path("data", "zh.Hans", "json"), Path::new("data").join("zh.Hans.json"));
		assert_ne!(language_path("data", "zh.Hans", "json"), language_path("data", "zh.Hant", "json"));
	}

	#[test]
	fn dotted_codes_are_listed_whole() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(language_path(dir.path(), "zh.Hans", "json"), "{}").unwrap();
		fs::write(language_path(dir.path(), "zh.Hant", "json"), "{}").unwrap();

		assert_eq!(list_files(dir.path(), "json").unwrap(), vec!["zh.Hans", "zh.Hant"]);
	}

	#[test]
	fn get_filename_strips_extension() {
		assert_eq!(get_filename("./data/fr.json").unwrap(), "fr");
	}

	#[test]
	fn list_files_filters_by_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("en.json"), "{}").unwrap();
		fs::write(dir.path().join("de.json"), "{}").unwrap();
		fs::write(dir.path().join("en.bin"), "").unwrap();

		assert_eq!(list_files(dir.path(), "json").unwrap(), vec!["de", "en"]);
	}

	#[test]
	fn read_file_splits_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		fs::write(&path, "one\r\ntwo\nthree").unwrap();

		assert_eq!(read_file(&path).unwrap(), vec!["one", "two", "three"]);
	}
}
