use crate::encoding::Charset;
use crate::errors::ConvertError;
use crate::model::Delimiters;
use clap::Parser;
use std::path::PathBuf;

/// Replaces encoded emoji and non-standard character sequences in a tweet corpus
/// with readable descriptions.
#[derive(Parser, Debug)]
#[command(name = "convert", author, version, about, long_about = None)]
pub struct Cli {
    /// Text file to read
    pub input: PathBuf,
    /// Text file to write
    pub output: PathBuf,
    /// Text placed before each emoji description
    pub delimiter_start: Option<String>,
    /// Text placed after each emoji description
    pub delimiter_end: Option<String>,

    /// YAML config, defaults to convert.yaml when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Character set of the input file [default: utf-8]
    #[arg(long, value_enum)]
    pub input_encoding: Option<Charset>,
    /// Required unless set as encoding.output in the config
    #[arg(long, value_enum)]
    pub output_encoding: Option<Charset>,
    /// Emoji lookup table [default: emoji.csv]
    #[arg(long)]
    pub emoji_table: Option<PathBuf>,
    /// Standard character lookup table [default: standard.csv]
    #[arg(long)]
    pub standard_table: Option<PathBuf>,
    /// Field separator used in the lookup tables
    #[arg(long)]
    pub table_delimiter: Option<String>,
}

impl Cli {
    pub fn delimiters(&self) -> Result<Option<Delimiters>, ConvertError> {
        match (&self.delimiter_start, &self.delimiter_end) {
            (Some(start), Some(end)) => Ok(Some(Delimiters::new(start, end))),
            (None, None) => Ok(None),
            _ => Err(ConvertError::InvalidArguments(
                "emoji delimiters must be given as a start and end pair".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["convert", "in.txt", "out.txt"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.txt"));
        assert_eq!(cli.output, PathBuf::from("out.txt"));
        assert!(cli.delimiters().unwrap().is_none());
        assert!(cli.output_encoding.is_none());
    }

    #[test]
    fn test_parse_delimiter_pair_and_encoding() {
        let cli = Cli::try_parse_from([
            "convert",
            "in.txt",
            "out.txt",
            "[",
            "]",
            "--output-encoding",
            "latin1",
        ])
        .unwrap();
        assert_eq!(cli.delimiters().unwrap(), Some(Delimiters::new("[", "]")));
        assert_eq!(cli.output_encoding, Some(Charset::Latin1));
    }

    #[test]
    fn test_single_delimiter_is_rejected() {
        let cli = Cli::try_parse_from(["convert", "in.txt", "out.txt", "["]).unwrap();
        assert!(matches!(
            cli.delimiters(),
            Err(ConvertError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_missing_output_is_usage_error() {
        assert!(Cli::try_parse_from(["convert", "in.txt"]).is_err());
    }
}
