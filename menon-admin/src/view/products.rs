//! Products screen: category chips, grouped cards, detail and form

use menon_common::jsonflat::{self, FlatEntry};
use menon_common::models::{
    join_availability, split_availability, Product, ProductPayload, AVAILABILITY_OPTIONS,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{rows_or_blank, search_term, FormMode, FormRow};

/// Category value meaning "use the new-category text instead"
pub const NEW_CATEGORY: &str = "__new__";

/// Message shown when a required product field is missing
pub const MISSING_FIELDS: &str = "Please fill in ID, Name, and Category";

/// Search term and category filter of the products screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductViewState {
    #[serde(default)]
    pub search: String,
    /// `None` (or empty) shows every category
    #[serde(default, rename = "category")]
    pub active_category: Option<String>,
}

impl ProductViewState {
    pub fn category_filter(&self) -> Option<&str> {
        self.active_category.as_deref().filter(|c| !c.is_empty())
    }

    /// True when `product` passes both the search term and the category filter
    pub fn matches(&self, product: &Product) -> bool {
        let term = search_term(&self.search);
        let found = term.is_empty()
            || product.product_name.to_lowercase().contains(&term)
            || product.product_id.to_lowercase().contains(&term)
            || product.category.to_lowercase().contains(&term);

        found
            && self
                .category_filter()
                .map_or(true, |category| product.category == category)
    }
}

/// Filter chip; the first chip is "All" with `category: None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChip {
    pub label: String,
    pub category: Option<String>,
    pub count: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PillKind {
    Stock,
    Out,
    Showroom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityPill {
    pub label: String,
    pub kind: PillKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub price_label: Option<String>,
    pub availability: Vec<AvailabilityPill>,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub count: usize,
    pub items: Vec<ProductCard>,
}

/// Everything the products screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductsView {
    pub search: String,
    pub active_category: Option<String>,
    /// Number of products before filtering
    pub total: usize,
    /// Number of products after filtering
    pub shown: usize,
    pub chips: Vec<CategoryChip>,
    pub groups: Vec<CategoryGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetail {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub availability: Option<String>,
    pub pricing: Vec<FlatEntry>,
    pub details: Vec<FlatEntry>,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityChoice {
    pub label: String,
    pub checked: bool,
}

/// Prefilled add/edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductForm {
    pub mode: FormMode,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    /// Existing categories offered by the category dropdown, sorted
    pub categories: Vec<String>,
    pub availability: Vec<AvailabilityChoice>,
    pub pricing: Vec<FormRow>,
    pub product_details: Vec<FormRow>,
    pub photos: Vec<FormRow>,
}

/// Submitted add/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductSubmission {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    /// Selected category, or [`NEW_CATEGORY`]
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub new_category: Option<String>,
    /// Checked availability options
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub pricing: Vec<FormRow>,
    #[serde(default)]
    pub product_details: Vec<FormRow>,
    #[serde(default)]
    pub photos: Vec<FormRow>,
}

impl ProductSubmission {
    /// Category text after resolving the "new category" choice
    pub fn resolved_category(&self) -> String {
        if self.category.trim() == NEW_CATEGORY {
            self.new_category.as_deref().unwrap_or_default().trim().to_string()
        } else {
            self.category.trim().to_string()
        }
    }

    /// Validate and convert to the stored column values
    ///
    /// Fails with [`MISSING_FIELDS`] when the id, name or category is blank.
    pub fn into_payload(self) -> Result<ProductPayload, String> {
        let category = self.resolved_category();
        let product_id = self.product_id.trim().to_string();
        let product_name = self.product_name.trim().to_string();

        if product_id.is_empty() || product_name.is_empty() || category.is_empty() {
            return Err(MISSING_FIELDS.to_string());
        }

        let checked: Vec<&str> = AVAILABILITY_OPTIONS
            .iter()
            .copied()
            .filter(|option| self.availability.iter().any(|a| a.trim() == *option))
            .collect();

        Ok(ProductPayload {
            product_id,
            product_name,
            category,
            pricing: collect_rows(&self.pricing),
            product_details: collect_rows(&self.product_details),
            photos: collect_rows(&self.photos),
            availability: join_availability(&checked),
        })
    }
}

fn collect_rows(rows: &[FormRow]) -> Option<serde_json::Value> {
    jsonflat::build_from_rows(rows.iter().map(|r| (&r.key, &r.value)))
        .map(serde_json::Value::Object)
}

/// Count of products per category, sorted by category name
pub fn category_counts(records: &[Product]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for product in records {
        *counts.entry(product.category.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(category, count)| (category.to_string(), count))
        .collect()
}

/// Render the products screen for `state`
///
/// Chips count over all records; cards are limited to the filtered records
/// and grouped by category in name order.
pub fn render_products(records: &[Product], state: &ProductViewState) -> ProductsView {
    let active = state.category_filter();

    let mut chips = vec![CategoryChip {
        label: "All".to_string(),
        category: None,
        count: records.len(),
        active: active.is_none(),
    }];
    chips.extend(
        category_counts(records)
            .into_iter()
            .map(|(category, count)| CategoryChip {
                label: category.clone(),
                active: active == Some(category.as_str()),
                category: Some(category),
                count,
            }),
    );

    let mut grouped: BTreeMap<&str, Vec<ProductCard>> = BTreeMap::new();
    let mut shown = 0;
    for product in records.iter().filter(|p| state.matches(p)) {
        grouped
            .entry(product.category.as_str())
            .or_default()
            .push(render_card(product));
        shown += 1;
    }

    let groups = grouped
        .into_iter()
        .map(|(category, items)| CategoryGroup {
            category: category.to_string(),
            count: items.len(),
            items,
        })
        .collect();

    ProductsView {
        search: state.search.clone(),
        active_category: active.map(str::to_string),
        total: records.len(),
        shown,
        chips,
        groups,
    }
}

pub fn render_card(product: &Product) -> ProductCard {
    ProductCard {
        product_id: product.product_id.clone(),
        product_name: product.product_name.clone(),
        category: product.category.clone(),
        price_label: jsonflat::price_summary(&product.pricing),
        availability: product
            .availability
            .as_deref()
            .map(availability_pills)
            .unwrap_or_default(),
        photos: product.photo_urls(),
    }
}

/// Split availability text into pills classified by stock state
pub fn availability_pills(text: &str) -> Vec<AvailabilityPill> {
    split_availability(text)
        .into_iter()
        .map(|label| {
            let lower = label.to_lowercase();
            let kind = if lower.contains("out of stock") {
                PillKind::Out
            } else if lower.contains("in stock") {
                PillKind::Stock
            } else {
                PillKind::Showroom
            };
            AvailabilityPill { label, kind }
        })
        .collect()
}

pub fn render_detail(product: &Product) -> ProductDetail {
    ProductDetail {
        product_id: product.product_id.clone(),
        product_name: product.product_name.clone(),
        category: product.category.clone(),
        availability: product
            .availability
            .clone()
            .filter(|a| !a.trim().is_empty()),
        pricing: jsonflat::detail_rows(&product.pricing),
        details: jsonflat::detail_rows(&product.product_details),
        photos: product.photo_urls(),
    }
}

/// Render the add form (`product == None`) or the edit form
pub fn render_form(product: Option<&Product>, records: &[Product]) -> ProductForm {
    let categories: Vec<String> = records
        .iter()
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let stored_availability = product
        .and_then(|p| p.availability.as_deref())
        .unwrap_or_default();
    let availability = AVAILABILITY_OPTIONS
        .iter()
        .map(|option| AvailabilityChoice {
            label: option.to_string(),
            checked: stored_availability.contains(option),
        })
        .collect();

    let Some(product) = product else {
        return ProductForm {
            mode: FormMode::Create,
            product_id: String::new(),
            product_name: String::new(),
            category: String::new(),
            categories,
            availability,
            pricing: rows_or_blank(Vec::new()),
            product_details: rows_or_blank(Vec::new()),
            photos: rows_or_blank(Vec::new()),
        };
    };

    let flat_rows = |raw: &serde_json::Value| -> Vec<FormRow> {
        jsonflat::flatten(&jsonflat::parse_if_encoded(raw))
            .iter()
            .map(FormRow::from)
            .collect()
    };

    ProductForm {
        mode: FormMode::Edit,
        product_id: product.product_id.clone(),
        product_name: product.product_name.clone(),
        category: product.category.clone(),
        categories,
        availability,
        pricing: rows_or_blank(flat_rows(&product.pricing)),
        product_details: rows_or_blank(flat_rows(&product.product_details)),
        photos: rows_or_blank(
            jsonflat::photo_rows(&product.photos)
                .into_iter()
                .map(|(label, url)| FormRow::new(label, url))
                .collect(),
        ),
    }
}
