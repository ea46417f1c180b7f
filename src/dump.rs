//! Directory dumper
//!
//! Renders a directory as a box-drawing tree followed by the contents of
//! every text file in fenced blocks:
//!
//! ~~~text
//! project/
//! ├── src/
//! │   └── main.rs
//! └── README.md
//! project/src/main.rs:
//! ```
//! fn main() {}
//! ```
//! ~~~
//!
//! Text vs. binary is decided by [`detector::is_text`]. Binary files stay in
//! the tree and are either left out of the contents or embedded as base64
//! (see [`BinaryMode`]).

use crate::detector::{self, Script};
use anyhow::{Context, Result};
use base64::Engine;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

// Tree drawing
const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

const FENCE: &str = "```";

/// Suffix appended to the header of base64-embedded binary files
pub const BASE64_SUFFIX: &str = "[.base64]";

/// What to do with binary files in the contents section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryMode {
    /// Leave them out
    #[default]
    Skip,
    /// Embed them base64-encoded
    Base64,
}

/// Dumper configuration
#[derive(Debug, Clone, Default)]
pub struct DumpConfig {
    /// Handling of binary files
    pub binary_mode: BinaryMode,
    /// Append the guessed encoding to each text file header
    pub show_encoding: bool,
    /// Script hint for the encoding guess (only with `show_encoding`)
    pub script_hint: Script,
}

/// Counts collected while dumping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Subdirectories listed in the tree
    pub directories: usize,
    /// Files emitted inline
    pub text_files: usize,
    /// Files skipped or embedded as base64
    pub binary_files: usize,
    /// Files and directories that could not be read
    pub unreadable: usize,
}

/// Dumps a directory tree with inline file contents
pub struct Dumper {
    config: DumpConfig,
}

impl Dumper {
    /// Create a dumper with the default config
    pub fn new() -> Self {
        Self::with_config(DumpConfig::default())
    }

    /// Create a dumper with a custom config
    pub fn with_config(config: DumpConfig) -> Self {
        Self { config }
    }

    /// Dump a directory to a byte buffer
    ///
    /// File contents are copied verbatim, so the output is not necessarily
    /// UTF-8.
    pub fn dump(&self, root: &Path) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.dump_to_writer(root, &mut output)?;
        Ok(output)
    }

    /// Dump a directory directly to a writer
    pub fn dump_to_writer<W: Write>(&self, root: &Path, mut writer: W) -> Result<DumpSummary> {
        let metadata = fs::metadata(root)
            .with_context(|| format!("Failed to access: {}", root.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("{} is not a directory", root.display());
        }

        let root_name = root_name(root);
        let entries = list_dir(root)?;

        let mut summary = DumpSummary::default();
        let mut files = Vec::new();

        writeln!(writer, "{}/", root_name)?;
        self.write_tree(entries, Path::new(""), "", &mut writer, &mut files, &mut summary)?;

        for rel in &files {
            self.write_file(root, &root_name, rel, &mut writer, &mut summary)?;
        }

        writer.flush()?;
        Ok(summary)
    }

    /// Dump a directory to a file
    pub fn dump_to_file(&self, root: &Path, path: &Path) -> Result<DumpSummary> {
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to write: {}", path.display()))?;
        self.dump_to_writer(root, BufWriter::new(file))
    }

    /// Write one directory level of the tree, recursing into subdirectories
    fn write_tree<W: Write>(
        &self,
        entries: Vec<DirEntry>,
        rel: &Path,
        prefix: &str,
        writer: &mut W,
        files: &mut Vec<PathBuf>,
        summary: &mut DumpSummary,
    ) -> Result<()> {
        let count = entries.len();

        for (i, entry) in entries.into_iter().enumerate() {
            let last = i + 1 == count;
            let branch = if last { LAST_BRANCH } else { BRANCH };
            let name = entry.file_name().to_string_lossy();
            let child_rel = rel.join(entry.file_name());

            if !entry.file_type().is_dir() {
                writeln!(writer, "{}{}{}", prefix, branch, name)?;
                files.push(child_rel);
                continue;
            }

            summary.directories += 1;
            writeln!(writer, "{}{}{}/", prefix, branch, name)?;

            match list_dir(entry.path()) {
                Ok(children) => {
                    let child_prefix = format!("{}{}", prefix, if last { BLANK } else { PIPE });
                    self.write_tree(children, &child_rel, &child_prefix, writer, files, summary)?;
                }
                Err(err) => {
                    summary.unreadable += 1;
                    warn!(path = %entry.path().display(), error = %err, "skipping unreadable directory");
                }
            }
        }

        Ok(())
    }

    /// Write the contents block of a single file
    fn write_file<W: Write>(
        &self,
        root: &Path,
        root_name: &str,
        rel: &Path,
        writer: &mut W,
        summary: &mut DumpSummary,
    ) -> Result<()> {
        let path = root.join(rel);
        let shown = display_path(root_name, rel);

        // Unreadable files count as non-text
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) => {
                summary.unreadable += 1;
                warn!(path = %path.display(), error = %err, "skipping unreadable file");
                return Ok(());
            }
        };

        if !detector::is_text(&data) {
            summary.binary_files += 1;
            debug!(path = %shown, bytes = data.len(), "binary file");

            if self.config.binary_mode == BinaryMode::Base64 {
                writeln!(writer, "{}{}:", shown, BASE64_SUFFIX)?;
                writeln!(writer, "{}", FENCE)?;
                writeln!(writer, "{}", base64::engine::general_purpose::STANDARD.encode(&data))?;
                writeln!(writer, "{}", FENCE)?;
            }
            return Ok(());
        }

        summary.text_files += 1;

        if self.config.show_encoding {
            let classification = detector::classify(&data, self.config.script_hint);
            debug!(
                path = %shown,
                encoding = %classification.encoding,
                source = %classification.source,
                script = %classification.script,
                "text file"
            );
            writeln!(writer, "{} ({}):", shown, classification.encoding)?;
        } else {
            debug!(path = %shown, bytes = data.len(), "text file");
            writeln!(writer, "{}:", shown)?;
        }

        writeln!(writer, "{}", FENCE)?;
        writer.write_all(&data)?;
        // Ensure trailing newline
        if !data.is_empty() && !data.ends_with(b"\n") {
            writer.write_all(b"\n")?;
        }
        writeln!(writer, "{}", FENCE)?;

        Ok(())
    }
}

impl Default for Dumper {
    fn default() -> Self {
        Self::new()
    }
}

/// Immediate children of `dir`, sorted by file name
fn list_dir(dir: &Path) -> Result<Vec<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read directory: {}", dir.display()))
}

/// Name shown for the root, e.g. `project` for `../work/project`
fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| root.display().to_string())
}

/// `/`-separated path of a file below the root
fn display_path(root_name: &str, rel: &Path) -> String {
    let mut path = root_name.to_string();
    for component in rel.components() {
        path.push('/');
        path.push_str(&component.as_os_str().to_string_lossy());
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// project/
    /// ├── a/
    /// │   └── inner.txt
    /// ├── b.txt
    /// └── img.bin
    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("a")).unwrap();
        fs::write(temp.path().join("a").join("inner.txt"), "inner\n").unwrap();
        fs::write(temp.path().join("b.txt"), "hello").unwrap();
        fs::write(temp.path().join("img.bin"), [0x89, b'P', 0x00, 0x01]).unwrap();
        temp
    }

    fn name_of(temp: &TempDir) -> String {
        temp.path().file_name().unwrap().to_string_lossy().into_owned()
    }

    #[test]
    fn test_dump_tree_and_contents() {
        let temp = sample_tree();
        let root = name_of(&temp);

        let output = Dumper::new().dump(temp.path()).unwrap();
        let output = String::from_utf8(output).unwrap();

        let expected = format!(
            "{root}/\n\
             ├── a/\n\
             │   └── inner.txt\n\
             ├── b.txt\n\
             └── img.bin\n\
             {root}/a/inner.txt:\n```\ninner\n```\n\
             {root}/b.txt:\n```\nhello\n```\n",
            root = root
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_dump_base64_binary() {
        let temp = sample_tree();
        let root = name_of(&temp);
        let config = DumpConfig {
            binary_mode: BinaryMode::Base64,
            ..DumpConfig::default()
        };

        let output = Dumper::with_config(config).dump(temp.path()).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains(&format!("{}/img.bin[.base64]:\n```\niVAAAQ==\n```\n", root)));
    }

    #[test]
    fn test_dump_show_encoding() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("latin.txt"), "café olé\n").unwrap();
        fs::write(temp.path().join("plain.txt"), "hello world\n").unwrap();
        let root = name_of(&temp);
        let config = DumpConfig {
            show_encoding: true,
            ..DumpConfig::default()
        };

        let output = Dumper::with_config(config).dump(temp.path()).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains(&format!("{}/latin.txt (UTF-8):\n", root)));
        assert!(output.contains(&format!("{}/plain.txt (us-ascii):\n", root)));
    }

    #[test]
    fn test_dump_base64_with_encoding_labels() {
        let temp = sample_tree();
        let root = name_of(&temp);
        let config = DumpConfig {
            binary_mode: BinaryMode::Base64,
            show_encoding: true,
            script_hint: Script::Cyrillic,
        };

        let output = Dumper::with_config(config).dump(temp.path()).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains(&format!("{}/a/inner.txt (us-ascii):\n", root)));
        assert!(output.contains(&format!("{}/b.txt (us-ascii):\n```\nhello\n```\n", root)));
        assert!(output.contains(&format!("{}/img.bin[.base64]:\n", root)));
    }

    #[test]
    fn test_dump_keeps_raw_bytes() {
        let temp = TempDir::new().unwrap();
        let cp1251 = b"\xEF\xF0\xE8\xE2\xE5\xF2\n";
        fs::write(temp.path().join("ru.txt"), cp1251).unwrap();

        let output = Dumper::new().dump(temp.path()).unwrap();

        assert!(output.windows(cp1251.len()).any(|w| w == cp1251));
    }

    #[test]
    fn test_dump_empty_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("empty.txt"), "").unwrap();
        let root = name_of(&temp);

        let output = String::from_utf8(Dumper::new().dump(temp.path()).unwrap()).unwrap();

        assert!(output.ends_with(&format!("{}/empty.txt:\n```\n```\n", root)));
    }

    #[test]
    fn test_dump_summary() {
        let temp = sample_tree();
        let mut sink = Vec::new();

        let summary = Dumper::new().dump_to_writer(temp.path(), &mut sink).unwrap();

        assert_eq!(
            summary,
            DumpSummary {
                directories: 1,
                text_files: 2,
                binary_files: 1,
                unreadable: 0,
            }
        );
    }

    #[test]
    fn test_dump_to_file() {
        let temp = sample_tree();
        let out_dir = TempDir::new().unwrap();
        let out_path = out_dir.path().join("dump.txt");

        Dumper::new().dump_to_file(temp.path(), &out_path).unwrap();

        let written = fs::read_to_string(&out_path).unwrap();
        assert!(written.contains("└── img.bin"));
    }

    #[test]
    fn test_dump_nested_prefixes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("x").join("y")).unwrap();
        fs::write(temp.path().join("x").join("y").join("deep.txt"), "d").unwrap();
        fs::write(temp.path().join("x").join("z.txt"), "z").unwrap();
        fs::write(temp.path().join("zz.txt"), "top").unwrap();

        let output = String::from_utf8(Dumper::new().dump(temp.path()).unwrap()).unwrap();

        assert!(output.contains(
            "├── x/\n\
             │   ├── y/\n\
             │   │   └── deep.txt\n\
             │   └── z.txt\n\
             └── zz.txt\n"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_dump_dangling_symlink_is_unreadable() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("broken")).unwrap();
        fs::write(temp.path().join("ok.txt"), "ok").unwrap();
        let root = name_of(&temp);

        let mut output = Vec::new();
        let summary = Dumper::new().dump_to_writer(temp.path(), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(summary.unreadable, 1);
        assert!(output.contains("├── broken\n"));
        assert!(!output.contains(&format!("{}/broken:", root)));
    }

    #[test]
    fn test_dump_missing_root() {
        let temp = TempDir::new().unwrap();
        let err = Dumper::new().dump(&temp.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("Failed to access"));
    }

    #[test]
    fn test_dump_file_root() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = Dumper::new().dump(&file).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path("root", Path::new("a/b.txt")), "root/a/b.txt");
        assert_eq!(display_path("root", Path::new("c")), "root/c");
    }
}
