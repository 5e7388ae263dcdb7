use super::backend::SearchEngine;
use crate::models::ResultSet;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Items served when no catalog file is given.
pub const SAMPLE_CATALOG: &[&str] = &[
    "Abbaye de Belloc",
    "Appenzeller",
    "Asiago",
    "Banon",
    "Beaufort",
    "Bleu d'Auvergne",
    "Brie de Meaux",
    "Brie de Melun",
    "Caciocavallo",
    "Camembert de Normandie",
    "Cantal",
    "Cheddar",
    "Comté",
    "Double Gloucester",
    "Edam",
    "Emmental",
    "Feta",
    "Fontina",
    "Gorgonzola",
    "Gouda",
    "Gruyère",
    "Halloumi",
    "Havarti",
    "Manchego",
    "Mimolette",
    "Mozzarella",
    "Munster",
    "Parmigiano-Reggiano",
    "Pecorino Romano",
    "Provolone",
    "Raclette",
    "Reblochon",
    "Roquefort",
    "Stilton",
    "Taleggio",
    "Tomme de Savoie",
    "Wensleydale",
];

/// Case-insensitive substring search over a fixed list of items.
pub struct CatalogEngine {
    items: Vec<String>,
    folded: Vec<String>,
    latency: Duration,
}

impl CatalogEngine {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let folded = items.iter().map(|item| item.to_lowercase()).collect();
        Self {
            items,
            folded,
            latency: Duration::ZERO,
        }
    }

    pub fn sample() -> Self {
        Self::new(SAMPLE_CATALOG.iter().copied())
    }

    /// Reads one item per line, skipping blank lines.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let items: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        tracing::debug!("Loaded {} catalog items from {:?}", items.len(), path);
        Ok(Self::new(items))
    }

    /// Makes every search block for `latency` first, like a slow backend would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl SearchEngine for CatalogEngine {
    fn search(&self, query: &str) -> Result<ResultSet> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let needle = query.to_lowercase();
        Ok(self
            .folded
            .iter()
            .zip(&self.items)
            .filter(|(folded, _)| folded.contains(&needle))
            .map(|(_, item)| item.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignore_case_and_keep_catalog_order() {
        let engine = CatalogEngine::new(["Brie de Meaux", "Cheddar", "brie de melun"]);
        assert_eq!(
            engine.search("BRIE").unwrap(),
            vec!["Brie de Meaux".to_string(), "brie de melun".to_string()]
        );
        assert!(engine.search("stilton").unwrap().is_empty());
    }

    #[test]
    fn empty_query_matches_everything() {
        let engine = CatalogEngine::sample();
        assert_eq!(engine.search("").unwrap().len(), engine.len());
    }

    #[test]
    fn load_skips_blank_lines() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("catalog.txt");
        fs::write(&path, "Feta\n\n  Gouda  \n")?;

        let engine = CatalogEngine::load(&path)?;

        assert_eq!(engine.len(), 2);
        assert_eq!(engine.search("gou")?, vec!["Gouda".to_string()]);
        Ok(())
    }
}
