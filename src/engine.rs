use crate::errors::ConvertError;
use crate::model::{Delimiters, Document, LookupTable};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::{NoExpand, Regex, RegexBuilder};

lazy_static! {
    static ref ESCAPE_RE: Regex = Regex::new(r"(?i)\\u[0-9a-f]{4}").unwrap();
}

/// One table entry compiled into a literal, case-insensitive pattern.
#[derive(Debug, Clone)]
pub struct Substitution {
    pattern: Regex,
    replacement: String,
}

impl Substitution {
    pub fn literal(match_text: &str, replacement: String) -> Result<Self, ConvertError> {
        let pattern = RegexBuilder::new(&regex::escape(match_text))
            .case_insensitive(true)
            .unicode(true)
            .build()?;
        Ok(Substitution {
            pattern,
            replacement,
        })
    }

    /// Replaces every match in `token`, returning the number of matches.
    pub fn apply(&self, token: &mut String) -> usize {
        let count = self.pattern.find_iter(token.as_str()).count();
        if count > 0 {
            let replaced = self
                .pattern
                .replace_all(token.as_str(), NoExpand(&self.replacement))
                .into_owned();
            *token = replaced;
        }
        count
    }
}

/// Compiles a table in file order. Replacements are wrapped when `delimiters` is given.
pub fn compile(
    table: &LookupTable,
    delimiters: Option<&Delimiters>,
) -> Result<Vec<Substitution>, ConvertError> {
    table
        .entries()
        .iter()
        .map(|entry| {
            let replacement = match delimiters {
                Some(d) => d.wrap(&entry.replacement),
                None => entry.replacement.clone(),
            };
            Substitution::literal(&entry.match_text, replacement)
        })
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    pub emoji_replacements: usize,
    pub standard_replacements: usize,
    /// `\uXXXX` sequences still present after both tables ran.
    pub unmatched_escapes: usize,
}

impl Report {
    pub fn log(&self) {
        info!(
            "replaced {} emoji and {} standard sequences",
            self.emoji_replacements, self.standard_replacements
        );
        if self.unmatched_escapes > 0 {
            warn!(
                "{} escape sequences were left unconverted",
                self.unmatched_escapes
            );
        }
    }
}

/// Runs every substitution over every token, one pattern at a time.
///
/// Later patterns see the output of earlier ones, so a replacement can itself be
/// rewritten further down the list.
pub fn apply_all(document: &mut Document, substitutions: &[Substitution]) -> usize {
    let mut total = 0;
    for substitution in substitutions {
        let count: usize = document
            .tokens_mut()
            .map(|token| substitution.apply(token))
            .sum();
        if count > 0 {
            debug!(
                "{:?} matched {count} time(s)",
                substitution.pattern.as_str()
            );
        }
        total += count;
    }
    total
}

/// Applies the emoji table (wrapped in `delimiters`), then the standard table, in place.
pub fn convert(
    document: &mut Document,
    emoji: &LookupTable,
    standard: &LookupTable,
    delimiters: &Delimiters,
) -> Result<Report, ConvertError> {
    let emoji = compile(emoji, Some(delimiters))?;
    let standard = compile(standard, None)?;

    let emoji_replacements = apply_all(document, &emoji);
    let standard_replacements = apply_all(document, &standard);
    let unmatched_escapes = document
        .tokens()
        .map(|token| ESCAPE_RE.find_iter(token).count())
        .sum();

    Ok(Report {
        emoji_replacements,
        standard_replacements,
        unmatched_escapes,
    })
}
