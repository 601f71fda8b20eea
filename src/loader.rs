use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::Error;
use crate::model::{Encoding, LoadReport};
use crate::properties::Properties;
use crate::reader::LineReader;
use crate::record::parse_record;

/// Load properties from an ISO-8859-1 byte source.
pub fn load<R: Read>(source: R) -> Result<Properties, Error> {
    load_with_encoding(source, Encoding::Latin1)
}

/// Load properties from a byte source in the given encoding.
pub fn load_with_encoding<R: Read>(source: R, encoding: Encoding) -> Result<Properties, Error> {
    let mut properties = Properties::new();
    read_entries(source, encoding, &mut properties)?;
    Ok(properties)
}

/// Load properties from text already held in memory.
pub fn load_str(input: &str) -> Result<Properties, Error> {
    load_with_encoding(input.as_bytes(), Encoding::Utf8)
}

/// Load a single ISO-8859-1 `.properties` file.
pub fn from_path(path: impl AsRef<Path>) -> Result<Properties, Error> {
    PropertiesLoader::new().path(path).load()
}

/// Load several files; keys in later files replace those in earlier ones.
pub fn from_paths<I, P>(paths: I) -> Result<Properties, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    PropertiesLoader::new().paths(paths).load()
}

/// Builder-style loader for `.properties` files.
#[derive(Debug, Clone)]
pub struct PropertiesLoader {
    paths: Vec<PathBuf>,
    encoding: Encoding,
    required: bool,
}

impl PropertiesLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.paths
            .extend(paths.into_iter().map(|path| path.as_ref().to_path_buf()));
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// When `false`, missing files are skipped instead of failing the load.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn load(&self) -> Result<Properties, Error> {
        self.load_with_report().map(|(properties, _)| properties)
    }

    pub fn load_with_report(&self) -> Result<(Properties, LoadReport), Error> {
        let mut properties = Properties::new();
        let mut report = LoadReport::default();

        for path in &self.paths {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(err) if !self.required && err.kind() == io::ErrorKind::NotFound => {
                    debug!("propertor: skipping missing file {}", path.display());
                    report.files_skipped += 1;
                    continue;
                }
                Err(err) => return Err(Error::Io(err)),
            };

            debug!("propertor: reading {}", path.display());
            report.entries += read_entries(file, self.encoding, &mut properties)?;
            report.files_read += 1;
        }

        Ok((properties, report))
    }
}

impl Default for PropertiesLoader {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            encoding: Encoding::Latin1,
            required: true,
        }
    }
}

/// Decode every logical line of `source` into `properties`, returning the
/// number of declarations read.
fn read_entries<R: Read>(
    source: R,
    encoding: Encoding,
    properties: &mut Properties,
) -> Result<usize, Error> {
    let mut reader = LineReader::new(source, encoding);
    let mut entries = 0usize;

    while let Some(line) = reader.read_line()? {
        let (key, value) = parse_record(&line.text, line.line)?;
        trace!("propertor: line {}: {key:?} = {value:?}", line.line);
        if let Some(previous) = properties.insert(key, value) {
            trace!("propertor: line {} replaced {previous:?}", line.line);
        }
        entries += 1;
    }

    Ok(entries)
}
