use std::{fs, io, path::Path};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::{Error, Record, Result};

/// Reads a dataset. A file that doesn't exist yet is an empty dataset.
pub fn load(path: &Path) -> Result<Vec<Record>> {
    let text = match fs::read_to_string(path) {
        Ok(x) => x,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(Error::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&text).map_err(|source| Error::Dataset {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save(path: &Path, records: &[Record]) -> Result<()> {
    let mut contents = to_json(records).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    contents.push('\n');
    write(path, &contents)?;
    info!(path = %path.display(), records = records.len(), "wrote dataset");
    Ok(())
}

pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Error::MissingInput(path.to_path_buf()),
        _ => Error::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

pub fn write_input(path: &Path, contents: &str) -> Result<()> {
    write(path, contents)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    let wrap = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(path, contents).map_err(wrap)
}

// four space indent, non-ascii written as is
fn to_json(records: &[Record]) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json writes utf-8"))
}
