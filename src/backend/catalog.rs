use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use super::record::ProductRecord;
use super::tokenizer::tokenize_row;

/// One loaded snapshot of the dataset: the approved product list plus the
/// distinct facet values used to populate the filter controls. Built once
/// per load and replaced wholesale; never mutated in place.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub products: Vec<ProductRecord>,
    pub categories: Vec<String>,
    pub blockchains: Vec<String>,
}

impl Catalog {
    /// Parses raw CSV text: the header line (raw row 0) is always skipped,
    /// every remaining line is tokenized and built, and rows the builder
    /// rejects are silently dropped. Source row order is preserved.
    pub fn from_csv(text: &str) -> Self {
        let products: Vec<ProductRecord> = text
            .lines()
            .skip(1)
            .map(tokenize_row)
            .filter_map(|cols| ProductRecord::from_row(&cols))
            .collect();

        let mut categories = BTreeSet::new();
        let mut blockchains = BTreeSet::new();
        for product in &products {
            categories.extend(product.categories.iter().cloned());
            blockchains.extend(product.blockchains.iter().cloned());
        }

        Self {
            products,
            categories: categories.into_iter().collect(),
            blockchains: blockchains.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Where a snapshot comes from: the published sheet URL, or a local CSV
/// export of it.
#[derive(Clone, Debug)]
pub enum LoadSource {
    Url(String),
    File(PathBuf),
}

impl LoadSource {
    pub fn describe(&self) -> String {
        match self {
            LoadSource::Url(url) => url.clone(),
            LoadSource::File(path) => path.to_string_lossy().to_string(),
        }
    }
}

/// One-shot HTTP GET of the published CSV. No retry, no polling.
pub fn fetch(url: &str) -> Result<Catalog> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;
    let text = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch CSV from {url}"))?
        .error_for_status()
        .context("Feed responded with an error status")?
        .text()
        .context("Failed to read CSV response body")?;
    Ok(Catalog::from_csv(&text))
}

/// Loads a local CSV snapshot through the same parse path as the feed.
pub fn load_file(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CSV file: {path:?}"))?;
    Ok(Catalog::from_csv(&text))
}

/// Runs the load on a background thread so the UI thread never blocks on
/// the network; the result comes back over the channel. Failures are logged
/// here as well, so the caller only has to render an empty/error state.
pub fn spawn_load(source: LoadSource) -> mpsc::Receiver<Result<Catalog>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = match &source {
            LoadSource::Url(url) => fetch(url),
            LoadSource::File(path) => load_file(path),
        };
        match &result {
            Ok(catalog) => log::info!(
                "Loaded {} products from {}",
                catalog.products.len(),
                source.describe()
            ),
            Err(e) => log::error!("Error loading CSV data: {e:#}"),
        }
        // Receiver gone means the app shut down mid-load; nothing to do.
        let _ = tx.send(result);
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
id,respondent,submitted,name,description,category,blockchain,website,twitter,unused,logo,founder,flagship,approved,stier,new
1,r1,2024-01-01 08:00:00,Alpha,first,DeFi,Solana,https://a.xyz,,x,,,no,yes,yes,no
2,r2,2024-01-02 08:00:00,Beta,second,\"NFT, DeFi\",\"Solana, Ethereum\",https://b.xyz,,x,,,no,no,no,no
3,r3,2024-01-03 08:00:00,Gamma,third,Gaming,Ethereum,https://c.xyz,,x,,,yes,YES,no,yes
";

    #[test]
    fn test_header_skipped_and_unapproved_dropped() {
        let catalog = Catalog::from_csv(SAMPLE);
        let names: Vec<&str> = catalog.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn test_facets_are_distinct() {
        let catalog = Catalog::from_csv(SAMPLE);
        assert_eq!(catalog.categories, vec!["DeFi", "Gaming"]);
        assert_eq!(catalog.blockchains, vec!["Ethereum", "Solana"]);
    }

    #[test]
    fn test_trailing_newline_produces_no_phantom_row() {
        let catalog = Catalog::from_csv("header\n1,,,,,,,,,,,,,yes\n\n");
        assert_eq!(catalog.products.len(), 1);
    }

    #[test]
    fn test_empty_input_is_empty_catalog() {
        let catalog = Catalog::from_csv("");
        assert!(catalog.is_empty());
        assert!(catalog.categories.is_empty());
    }

    #[test]
    fn test_load_file_roundtrip() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{SAMPLE}")?;

        let catalog = load_file(file.path())?;
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.products[0].name, "Alpha");
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_error() {
        assert!(load_file(Path::new("/nonexistent/feed.csv")).is_err());
    }
}
