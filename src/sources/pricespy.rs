// 💰 PriceSpy - product cards from a category listing page
//
// Each card yields {name, price}. Name comes from the card link's
// aria-label, price from the PriceLabel span.

use super::DataSource;
use crate::rows::{PriceRow, ProductType};
use anyhow::Result;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::warn;

/// Most popular CPUs with 2GHz+ and 4+ cores, <= $1000
const CPU_CATEGORY_URL: &str = "https://pricespy.co.nz/category.php?k=s334663499&catId=500";
/// Most popular internal HDDs, 0.9-5 TB, 7200/10000 rpm, < $500
const HDD_CATEGORY_URL: &str = "https://pricespy.co.nz/category.php?k=s332338236&catId=358";

pub const PRODUCTS_PER_PAGE: usize = 24;

lazy_static! {
    static ref PRODUCT_CARD: Selector = Selector::parse(r#"div[data-test="ProductCard"]"#).unwrap();
    static ref CARD_LINK: Selector = Selector::parse("a[aria-label]").unwrap();
    static ref PRICE_LABEL: Selector = Selector::parse(r#"span[data-test="PriceLabel"]"#).unwrap();
}

pub struct PriceSpy {
    product: ProductType,
}

impl PriceSpy {
    pub fn new(product: ProductType) -> Self {
        PriceSpy { product }
    }

    fn category_url(&self) -> &'static str {
        match self.product {
            ProductType::Cpu => CPU_CATEGORY_URL,
            ProductType::Hdd => HDD_CATEGORY_URL,
        }
    }
}

impl DataSource for PriceSpy {
    type Row = PriceRow;

    fn name(&self) -> &str {
        match self.product {
            ProductType::Cpu => "PriceSpy CPU",
            ProductType::Hdd => "PriceSpy HDD",
        }
    }

    fn file_stem(&self) -> &str {
        "pricespy"
    }

    fn page_urls(&self, pages: usize) -> Vec<String> {
        (0..pages)
            .map(|i| {
                if i == 0 {
                    self.category_url().to_string()
                } else {
                    format!("{}&offset={}", self.category_url(), PRODUCTS_PER_PAGE * i)
                }
            })
            .collect()
    }

    fn extract_rows(&self, markup: &str) -> Result<Vec<PriceRow>> {
        let document = Html::parse_document(markup);
        let mut rows = Vec::new();

        for card in document.select(&PRODUCT_CARD).take(PRODUCTS_PER_PAGE) {
            let name = card
                .select(&CARD_LINK)
                .next()
                .and_then(|link| link.value().attr("aria-label"))
                .map(|label| label.trim().to_string());
            let price = card
                .select(&PRICE_LABEL)
                .next()
                .map(|label| label.text().collect::<String>().trim().to_string());

            match (name, price) {
                (Some(name), Some(price)) if !name.is_empty() => rows.push(PriceRow { name, price }),
                (name, price) => {
                    warn!(?name, ?price, "{}: skipping incomplete product card", self.name());
                }
            }
        }

        Ok(rows)
    }
}

// ============================================================================
// TESTS
// ============================================================================
