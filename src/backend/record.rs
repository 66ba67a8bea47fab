use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

/// Fixed 0-indexed column layout of the published spreadsheet export.
/// Lookup is positional; there is no header-name matching. Index 9 is an
/// unused column in the source sheet.
pub mod columns {
    pub const SUBMISSION_ID: usize = 0;
    pub const RESPONDENT_ID: usize = 1;
    pub const SUBMITTED_AT: usize = 2;
    pub const NAME: usize = 3;
    pub const DESCRIPTION: usize = 4;
    pub const CATEGORY: usize = 5;
    pub const BLOCKCHAIN: usize = 6;
    pub const WEBSITE: usize = 7;
    pub const PRODUCT_TWITTER: usize = 8;
    pub const LOGO: usize = 10;
    pub const FOUNDER_TWITTER: usize = 11;
    pub const FLAGSHIP: usize = 12;
    pub const APPROVED: usize = 13;
    pub const S_TIER: usize = 14;
    pub const NEW: usize = 15;
}

/// One approved row from the source sheet. Immutable once built; the whole
/// list is replaced on reload, never patched.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductRecord {
    pub submission_id: String,
    pub respondent_id: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    pub blockchains: Vec<String>,
    pub website: String,
    pub product_twitter: String,
    pub founder_twitter: String,
    pub logo_url: String,
    pub is_flagship: bool,
    pub is_s_tier: bool,
    pub is_new: bool,
}

impl ProductRecord {
    /// Builds a record from one tokenized row, or `None` if the row's
    /// approval column is not `"yes"` (case-insensitive) or is missing.
    /// Every other missing or out-of-range column degrades to an empty
    /// string/list or a `false` flag rather than failing.
    pub fn from_row(cols: &[String]) -> Option<Self> {
        let approved = cols.get(columns::APPROVED)?;
        if !approved.trim().eq_ignore_ascii_case("yes") {
            return None;
        }

        Some(Self {
            submission_id: field(cols, columns::SUBMISSION_ID),
            respondent_id: field(cols, columns::RESPONDENT_ID),
            submitted_at: parse_submitted_at(&field(cols, columns::SUBMITTED_AT)),
            name: sanitize_html(&strip_outer_quotes(&field(cols, columns::NAME))),
            description: sanitize_html(&strip_outer_quotes(&field(cols, columns::DESCRIPTION))),
            categories: split_list(&field(cols, columns::CATEGORY)),
            blockchains: split_list(&field(cols, columns::BLOCKCHAIN)),
            website: sanitize_html(&strip_outer_quotes(&field(cols, columns::WEBSITE))),
            product_twitter: sanitize_html(&strip_outer_quotes(&field(
                cols,
                columns::PRODUCT_TWITTER,
            ))),
            founder_twitter: sanitize_html(&strip_outer_quotes(&field(
                cols,
                columns::FOUNDER_TWITTER,
            ))),
            logo_url: encode_uri(&strip_outer_quotes(&field(cols, columns::LOGO))),
            is_flagship: flag(cols, columns::FLAGSHIP),
            is_s_tier: flag(cols, columns::S_TIER),
            is_new: flag(cols, columns::NEW),
        })
    }

    /// Chain label for display: a product listed on more than one chain is
    /// shown as "multichain" instead of an individual chain name.
    pub fn chain_label(&self) -> String {
        if self.blockchains.len() > 1 {
            "multichain".to_string()
        } else {
            self.blockchains.join(", ")
        }
    }
}

fn field(cols: &[String], index: usize) -> String {
    cols.get(index).cloned().unwrap_or_default()
}

fn flag(cols: &[String], index: usize) -> bool {
    cols.get(index)
        .map(|v| v.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

/// Strips a single pair of literal leading/trailing quote characters, the
/// residue the spreadsheet export sometimes leaves on text cells.
pub fn strip_outer_quotes(value: &str) -> String {
    let mut v = value;
    if let Some(rest) = v.strip_prefix('"') {
        v = rest;
    }
    if let Some(rest) = v.strip_suffix('"') {
        v = rest;
    }
    v.to_string()
}

/// Escapes characters that would otherwise be interpreted as markup when the
/// value is later inserted into rendered output.
pub fn sanitize_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Comma-splits a multi-value cell, trimming and sanitizing each element.
/// Insertion order follows source order; empty elements are dropped.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| sanitize_html(&strip_outer_quotes(item.trim())))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Characters left untouched by `encode_uri`, matching what a browser's
/// `encodeURI` keeps: URI reserved and unreserved punctuation.
const URI_KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Percent-encodes a logo URL so that spaces and other raw characters from
/// the sheet survive as a fetchable image URI.
pub fn encode_uri(value: &str) -> String {
    utf8_percent_encode(value, URI_KEEP).to_string()
}

/// Best-effort timestamp parse covering the formats the sheet export
/// produces. Anything unrecognized is `None`; it is never an error.
pub fn parse_submitted_at(value: &str) -> Option<DateTime<Utc>> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(v, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

/// Extracts the twitter username from a profile URL: the first non-empty
/// path segment. Returns `None` for anything that does not parse as a URL.
pub fn twitter_handle(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
}

/// Display form of a website URL: scheme and trailing slash removed.
pub fn clean_url(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    stripped.strip_suffix('/').unwrap_or(stripped).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tokenizer::tokenize_row;

    fn row_with(approved: &str) -> Vec<String> {
        let mut cols = vec![String::new(); 16];
        cols[columns::SUBMISSION_ID] = "42".into();
        cols[columns::SUBMITTED_AT] = "2024-02-01 09:30:00".into();
        cols[columns::NAME] = "\"Tensor\"".into();
        cols[columns::DESCRIPTION] = "NFT <b>marketplace</b>".into();
        cols[columns::CATEGORY] = "NFT, DeFi".into();
        cols[columns::BLOCKCHAIN] = "Solana".into();
        cols[columns::WEBSITE] = "https://tensor.trade/".into();
        cols[columns::LOGO] = "https://img.example.com/logo image.png".into();
        cols[columns::FLAGSHIP] = "no".into();
        cols[columns::APPROVED] = approved.into();
        cols[columns::S_TIER] = "Yes".into();
        cols[columns::NEW] = "yes".into();
        cols
    }

    #[test]
    fn test_approved_is_case_insensitive() {
        assert!(ProductRecord::from_row(&row_with("yes")).is_some());
        assert!(ProductRecord::from_row(&row_with("Yes")).is_some());
        assert!(ProductRecord::from_row(&row_with("YES")).is_some());
        assert!(ProductRecord::from_row(&row_with("No")).is_none());
        assert!(ProductRecord::from_row(&row_with("NO")).is_none());
        assert!(ProductRecord::from_row(&row_with("")).is_none());
    }

    #[test]
    fn test_row_missing_approval_column_is_excluded() {
        let short = vec!["1".to_string(), "2".to_string()];
        assert!(ProductRecord::from_row(&short).is_none());
    }

    #[test]
    fn test_fields_are_extracted_and_cleaned() {
        let record = ProductRecord::from_row(&row_with("yes")).unwrap();
        assert_eq!(record.submission_id, "42");
        assert_eq!(record.name, "Tensor");
        assert_eq!(record.description, "NFT &lt;b&gt;marketplace&lt;/b&gt;");
        assert_eq!(record.categories, vec!["NFT", "DeFi"]);
        assert_eq!(record.blockchains, vec!["Solana"]);
        assert!(record.is_s_tier);
        assert!(record.is_new);
        assert!(!record.is_flagship);
        assert!(record.submitted_at.is_some());
    }

    #[test]
    fn test_missing_flag_columns_default_to_false() {
        // A row only long enough to carry the approval column.
        let mut cols = vec![String::new(); 14];
        cols[columns::APPROVED] = "yes".into();
        let record = ProductRecord::from_row(&cols).unwrap();
        assert!(!record.is_s_tier);
        assert!(!record.is_new);
        assert!(record.categories.is_empty());
        assert!(record.submitted_at.is_none());
    }

    #[test]
    fn test_logo_url_is_uri_encoded() {
        let record = ProductRecord::from_row(&row_with("yes")).unwrap();
        assert_eq!(
            record.logo_url,
            "https://img.example.com/logo%20image.png"
        );
    }

    #[test]
    fn test_chain_label_multichain() {
        let mut cols = row_with("yes");
        cols[columns::BLOCKCHAIN] = "Solana, Ethereum".into();
        let record = ProductRecord::from_row(&cols).unwrap();
        assert_eq!(record.chain_label(), "multichain");

        let single = ProductRecord::from_row(&row_with("yes")).unwrap();
        assert_eq!(single.chain_label(), "Solana");
    }

    #[test]
    fn test_strip_outer_quotes() {
        assert_eq!(strip_outer_quotes("\"hello\""), "hello");
        assert_eq!(strip_outer_quotes("\"unbalanced"), "unbalanced");
        assert_eq!(strip_outer_quotes("plain"), "plain");
        assert_eq!(strip_outer_quotes("in\"side"), "in\"side");
    }

    #[test]
    fn test_sanitize_html() {
        assert_eq!(
            sanitize_html("<img src=x onerror=alert(1)>"),
            "&lt;img src=x onerror=alert(1)&gt;"
        );
        assert_eq!(sanitize_html("a & b"), "a &amp; b");
    }

    #[test]
    fn test_invalid_date_is_none() {
        assert!(parse_submitted_at("not a date").is_none());
        assert!(parse_submitted_at("").is_none());
        assert!(parse_submitted_at("2023-05-29 20:10:05").is_some());
        assert!(parse_submitted_at("2023-05-29").is_some());
    }

    #[test]
    fn test_twitter_handle() {
        assert_eq!(
            twitter_handle("https://twitter.com/solana").as_deref(),
            Some("solana")
        );
        assert_eq!(
            twitter_handle("https://x.com/solana/status/1").as_deref(),
            Some("solana")
        );
        assert_eq!(twitter_handle("not a url"), None);
        assert_eq!(twitter_handle(""), None);
    }

    #[test]
    fn test_clean_url() {
        assert_eq!(clean_url("https://tensor.trade/"), "tensor.trade");
        assert_eq!(clean_url("http://example.com"), "example.com");
        assert_eq!(clean_url("example.com"), "example.com");
    }

    #[test]
    fn test_builds_from_tokenized_line() {
        let line = "1,r1,2024-01-02 10:00:00,Jupiter,\"Swap, aggregated\",DeFi,Solana,https://jup.ag/,,unused,,,no,yes,yes,no";
        let cols = tokenize_row(line);
        let record = ProductRecord::from_row(&cols).unwrap();
        assert_eq!(record.name, "Jupiter");
        assert_eq!(record.description, "Swap, aggregated");
        assert!(record.is_s_tier);
        assert!(!record.is_new);
    }
}
