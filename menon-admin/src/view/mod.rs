//! View state and pure render functions
//!
//! Each screen is described by an explicit state struct (search term, active
//! filter, page) that is passed together with the freshly fetched records into
//! a render function. Render functions return serializable view models; they
//! hold no state of their own and never touch the store.

use menon_common::jsonflat::FlatEntry;
use serde::{Deserialize, Serialize};

pub mod offers;
pub mod products;

pub use offers::{OfferViewState, OffersView};
pub use products::{ProductViewState, ProductsView};

/// Whether a form creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit,
}

/// One editable key/value row of a JSON column editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRow {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl FormRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<&FlatEntry> for FormRow {
    fn from(entry: &FlatEntry) -> Self {
        FormRow::new(entry.key.clone(), entry.value.input_text())
    }
}

/// Editor rows, with a single blank row when there is nothing to edit
pub(crate) fn rows_or_blank(rows: Vec<FormRow>) -> Vec<FormRow> {
    if rows.is_empty() {
        vec![FormRow::default()]
    } else {
        rows
    }
}

/// Case-insensitive search term; empty means "match everything"
pub(crate) fn search_term(raw: &str) -> String {
    raw.to_lowercase()
}
