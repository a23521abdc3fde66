// 🔍 Model Code Extractor - guess brand/cache/capacity/part number from a drive name
//
// Storage listings have no shared join key with the benchmark CSV, so we
// pull the manufacturer code out of the price-site name heuristically.

use crate::rows::ModelCodeParts;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref BRAND: Regex = Regex::new(r"^([A-Za-z0-9]+) ").unwrap();
    static ref CACHE: Regex = Regex::new(r" ([1-9][0-9]{0,2})MB ").unwrap();
    static ref CAPACITY: Regex = Regex::new(r" ([0-9.]+)TB$").unwrap();
}

/// Long words that show up in drive names but are never part numbers
pub const CODE_BLACKLIST: [&str; 3] = ["Surveillance", "Technology", "VelociRaptor"];

/// Return the longest space-separated word, skipping blacklisted words.
/// First word wins a tie. Empty string when nothing qualifies.
pub fn longest_word(model: &str) -> &str {
    let mut best = "";
    for word in model.trim().split(' ') {
        if CODE_BLACKLIST.contains(&word) {
            continue;
        }
        if word.len() > best.len() {
            best = word;
        }
    }
    best
}

pub struct ModelCodeExtractor;

impl ModelCodeExtractor {
    pub fn new() -> Self {
        ModelCodeExtractor
    }

    /// Parse a price-site drive name. Never fails; unknown parts stay None.
    pub fn extract_parts(&self, raw_name: &str) -> ModelCodeParts {
        let brand = BRAND.captures(raw_name).map(|c| c[1].to_string());
        let cache_text = CACHE.captures(raw_name).map(|c| c[1].to_string());
        let capacity_text = CAPACITY.captures(raw_name).map(|c| c[1].to_string());

        // Strip the recognised parts; whatever's left holds the code
        let mut residual = raw_name.to_string();
        if let Some(brand) = &brand {
            residual = residual.replace(&format!("{} ", brand), " ");
        }
        if let Some(capacity) = &capacity_text {
            residual = residual.replace(&format!(" {}TB", capacity), " ");
        }
        if let Some(cache) = &cache_text {
            residual = residual.replace(&format!(" {}MB ", cache), "");
        }

        let mfg_code = longest_word(&residual).to_string();

        let cache = cache_text.and_then(|c| c.parse::<u32>().ok());
        let capacity = capacity_text.and_then(|c| c.parse::<f64>().ok());

        if brand.is_none() || capacity.is_none() || mfg_code.is_empty() {
            debug!(
                name = raw_name,
                brand = ?brand,
                capacity = ?capacity,
                mfg_code = %mfg_code,
                "partial name extraction"
            );
        }

        ModelCodeParts {
            name: raw_name.to_string(),
            brand,
            cache,
            capacity,
            mfg_code,
        }
    }
}

impl Default for ModelCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_parts(
        name: &str,
        brand: Option<&str>,
        cache: Option<u32>,
        capacity: Option<f64>,
        mfg_code: &str,
    ) {
        let parts = ModelCodeExtractor::new().extract_parts(name);
        assert_eq!(parts.name, name);
        assert_eq!(parts.brand.as_deref(), brand, "brand of {}", name);
        assert_eq!(parts.cache, cache, "cache of {}", name);
        assert_eq!(parts.capacity, capacity, "capacity of {}", name);
        assert_eq!(parts.mfg_code, mfg_code, "mfg_code of {}", name);
    }

    #[test]
    fn test_extract_known_drive_names() {
        assert_parts("WD Black WD1003FZEX 64MB 1TB", Some("WD"), Some(64), Some(1.0), "WD1003FZEX");
        assert_parts(
            "Seagate Exos 7E2000 ST1000NX0323 4KN 1TB",
            Some("Seagate"),
            None,
            Some(1.0),
            "ST1000NX0323",
        );
        assert_parts(
            "Seagate Enterprise Performance 10K ST1200MM0009 128MB 1.2TB",
            Some("Seagate"),
            Some(128),
            Some(1.2),
            "ST1200MM0009",
        );
    }

    #[test]
    fn test_blacklisted_words_are_skipped() {
        assert_parts(
            "Seagate SkyHawk AI Surveillance ST4000VE001 256MB 4TB",
            Some("Seagate"),
            Some(256),
            Some(4.0),
            "ST4000VE001",
        );
        assert_parts("WD VelociRaptor WD1000DHTZ 64MB 1TB", Some("WD"), Some(64), Some(1.0), "WD1000DHTZ");
    }

    #[test]
    fn test_partial_extraction_never_fails() {
        // No capacity suffix, no cache
        assert_parts("Toshiba P300 HDWD110UZSVA", Some("Toshiba"), None, None, "HDWD110UZSVA");
        // Nothing at all
        assert_parts("", None, None, None, "");
        // Single word, no trailing space for the brand pattern
        assert_parts("Mystery", None, None, None, "Mystery");
    }

    #[test]
    fn test_longest_word_tie_goes_to_first() {
        assert_eq!(longest_word("ABCD1234 WXYZ9876"), "ABCD1234");
        assert_eq!(longest_word("  short  "), "short");
        assert_eq!(longest_word("Surveillance Technology"), "");
    }
}
