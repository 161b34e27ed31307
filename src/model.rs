use crate::args::Cli;
use crate::encoding::Charset;
use crate::errors::ConvertError;
use env_logger::Builder;
use log::{debug, LevelFilter};
use nestify::nest;
use serde_derive::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "convert.yaml";

nest! {
    #[derive(Debug, Default, Clone, Deserialize)]
    pub struct Config {
        logging: Option<String>,

        #[serde(default)]
        pub tables:
            #[derive(Debug, Clone, Deserialize)]
            pub struct TablesConfig {
                #[serde(default = "default_emoji_table")]
                pub emoji: PathBuf,
                #[serde(default = "default_standard_table")]
                pub standard: PathBuf,
                #[serde(default = "default_table_delimiter")]
                pub delimiter: String,
            },

        #[serde(default)]
        pub delimiters: Delimiters,

        #[serde(default)]
        pub encoding:
            #[derive(Debug, Default, Clone, Deserialize)]
            pub struct EncodingConfig {
                #[serde(default)]
                pub input: Charset,
                pub output: Option<Charset>,
            },
    }
}

fn default_emoji_table() -> PathBuf {
    PathBuf::from("emoji.csv")
}

fn default_standard_table() -> PathBuf {
    PathBuf::from("standard.csv")
}

fn default_table_delimiter() -> String {
    ", ".to_string()
}

impl Default for TablesConfig {
    fn default() -> Self {
        TablesConfig {
            emoji: default_emoji_table(),
            standard: default_standard_table(),
            delimiter: default_table_delimiter(),
        }
    }
}

impl Config {
    /// Reads the given YAML config, or `convert.yaml` if it exists, or falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConvertError> {
        match path {
            Some(path) => Self::load_yaml(path),
            None if Path::new(DEFAULT_CONFIG).is_file() => Self::load_yaml(Path::new(DEFAULT_CONFIG)),
            None => Ok(Config::default()),
        }
    }

    pub fn load_yaml(path: &Path) -> Result<Self, ConvertError> {
        let contents = fs::read_to_string(path).map_err(|err| ConvertError::io(path, err))?;
        let config: Self = serde_yaml::from_str(&contents).map_err(ConvertError::from)?;
        Ok(config)
    }

    pub fn set_logging(&self) {
        let mut builder = Builder::new();
        builder.filter_level(LevelFilter::Info);
        if let Some(filters) = &self.logging {
            builder.parse_filters(filters);
        }
        builder.init();
    }
}

/// Text wrapped around every emoji description so later tools can find them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Delimiters {
    pub start: String,
    pub end: String,
}

impl Delimiters {
    pub fn new(start: &str, end: &str) -> Self {
        Delimiters {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn wrap(&self, text: &str) -> String {
        format!("{}{}{}", self.start, text, self.end)
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters::new("*", "*")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub match_text: String,
    pub replacement: String,
}

impl LookupEntry {
    pub fn new(match_text: &str, replacement: &str) -> Self {
        LookupEntry {
            match_text: match_text.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Entries in file order. Duplicates are kept since later rows may overwrite earlier ones.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupTable {
    entries: Vec<LookupEntry>,
}

impl LookupTable {
    pub fn new(entries: Vec<LookupEntry>) -> Self {
        LookupTable { entries }
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for LookupTable {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        LookupTable::new(
            iter.into_iter()
                .map(|(m, r)| LookupEntry::new(m, r))
                .collect(),
        )
    }
}

/// Lines of whitespace-separated tokens.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<Vec<String>>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Document {
            lines: text
                .lines()
                .map(|line| line.split_whitespace().map(str::to_string).collect())
                .collect(),
        }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &String> {
        self.lines.iter().flatten()
    }

    pub fn tokens_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.lines.iter_mut().flatten()
    }

    /// Joins tokens with single spaces, one newline per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

/// Everything one run needs, after merging the CLI over the config.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub emoji_table: PathBuf,
    pub standard_table: PathBuf,
    pub table_delimiter: String,
    pub delimiters: Delimiters,
    pub input_encoding: Charset,
    pub output_encoding: Charset,
}

impl Job {
    pub fn resolve(cli: &Cli, config: Config) -> Result<Job, ConvertError> {
        let output_encoding = cli
            .output_encoding
            .or(config.encoding.output)
            .ok_or_else(|| {
                ConvertError::InvalidArguments(
                    "an output encoding is required (--output-encoding or encoding.output)"
                        .to_string(),
                )
            })?;

        let table_delimiter = cli
            .table_delimiter
            .clone()
            .unwrap_or(config.tables.delimiter);
        if table_delimiter.is_empty() {
            return Err(ConvertError::InvalidArguments(
                "table delimiter must not be empty".to_string(),
            ));
        }

        let job = Job {
            input: cli.input.clone(),
            output: cli.output.clone(),
            emoji_table: cli.emoji_table.clone().unwrap_or(config.tables.emoji),
            standard_table: cli.standard_table.clone().unwrap_or(config.tables.standard),
            table_delimiter,
            delimiters: cli.delimiters()?.unwrap_or(config.delimiters),
            input_encoding: cli.input_encoding.unwrap_or(config.encoding.input),
            output_encoding,
        };
        debug!("resolved job: {job:?}");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_config_defaults_from_empty_yaml() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.tables.emoji, PathBuf::from("emoji.csv"));
        assert_eq!(config.tables.standard, PathBuf::from("standard.csv"));
        assert_eq!(config.tables.delimiter, ", ");
        assert_eq!(config.delimiters, Delimiters::default());
        assert_eq!(config.encoding.input, Charset::Utf8);
        assert!(config.encoding.output.is_none());
    }

    #[test]
    fn test_config_full_yaml() {
        let yaml = r#"
logging: debug
tables:
  emoji: tables/emoji.csv
  delimiter: "; "
delimiters:
  start: "<"
  end: ">"
encoding:
  input: latin1
  output: utf-8
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.logging.as_deref(), Some("debug"));
        assert_eq!(config.tables.emoji, PathBuf::from("tables/emoji.csv"));
        assert_eq!(config.tables.standard, PathBuf::from("standard.csv"));
        assert_eq!(config.tables.delimiter, "; ");
        assert_eq!(config.delimiters, Delimiters::new("<", ">"));
        assert_eq!(config.encoding.input, Charset::Latin1);
        assert_eq!(config.encoding.output, Some(Charset::Utf8));
    }

    #[test]
    fn test_load_missing_config_is_file_not_found() {
        let err = Config::load(Some(Path::new("does/not/exist.yaml"))).unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound(_)));
    }

    #[test]
    fn test_job_requires_output_encoding() {
        let cli = Cli::try_parse_from(["convert", "in.txt", "out.txt"]).unwrap();
        let err = Job::resolve(&cli, Config::default()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidArguments(_)));
    }

    #[test]
    fn test_job_cli_overrides_config() {
        let mut config = Config::default();
        config.encoding.output = Some(Charset::Latin1);
        config.delimiters = Delimiters::new("<", ">");

        let cli = Cli::try_parse_from([
            "convert",
            "in.txt",
            "out.txt",
            "[",
            "]",
            "--output-encoding",
            "utf-8",
            "--emoji-table",
            "mine.csv",
        ])
        .unwrap();
        let job = Job::resolve(&cli, config).unwrap();
        assert_eq!(job.output_encoding, Charset::Utf8);
        assert_eq!(job.delimiters, Delimiters::new("[", "]"));
        assert_eq!(job.emoji_table, PathBuf::from("mine.csv"));
        assert_eq!(job.standard_table, PathBuf::from("standard.csv"));
    }

    #[test]
    fn test_job_falls_back_to_config() {
        let mut config = Config::default();
        config.encoding.output = Some(Charset::Ascii);
        config.delimiters = Delimiters::new("<", ">");

        let cli = Cli::try_parse_from(["convert", "in.txt", "out.txt"]).unwrap();
        let job = Job::resolve(&cli, config).unwrap();
        assert_eq!(job.output_encoding, Charset::Ascii);
        assert_eq!(job.delimiters, Delimiters::new("<", ">"));
        assert_eq!(job.table_delimiter, ", ");
    }

    #[test]
    fn test_document_collapses_whitespace() {
        let doc = Document::parse("I  love\t😀 today\n\nsecond   line  \n");
        assert_eq!(doc.lines.len(), 3);
        assert_eq!(doc.lines[0], vec!["I", "love", "😀", "today"]);
        assert!(doc.lines[1].is_empty());
        assert_eq!(doc.render(), "I love 😀 today\n\nsecond line\n");
    }

    #[test]
    fn test_delimiters_wrap() {
        assert_eq!(Delimiters::default().wrap("grin"), "*grin*");
        assert_eq!(Delimiters::new("[", "]").wrap("grin"), "[grin]");
    }
}
