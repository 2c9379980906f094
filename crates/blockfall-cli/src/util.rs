use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Destination of a JSON report: a file, or stdout when no path is given.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty-printed JSON followed by a newline.
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match output_path {
            Some(path) => Self::create(path)?,
            None => Self::Stdout(io::stdout().lock()),
        };
        output
            .write_json(value)
            .with_context(|| format!("Failed to write JSON to {}", output.describe()))
    }

    fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    fn describe(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_owned(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> io::Result<()>
    where
        T: serde::Serialize,
    {
        let writer: &mut dyn io::Write = match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        };
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)?;
        writer.flush()
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}
