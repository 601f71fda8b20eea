/// Summary of a [`PropertiesLoader`](crate::PropertiesLoader) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Number of decoded declarations, duplicates included.
    pub entries: usize,
    pub files_read: usize,
    /// Missing files skipped because the loader was not `required`.
    pub files_skipped: usize,
}

/// Byte encoding of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// ISO-8859-1, one byte per character. Other characters must be written
    /// as `\uXXXX` escapes.
    #[default]
    Latin1,
    /// UTF-8 text input.
    Utf8,
}
