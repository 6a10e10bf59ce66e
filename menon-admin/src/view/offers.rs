//! Offers screen: searchable, paginated table and the add/edit form

use menon_common::models::{Offer, OfferPayload};
use serde::{Deserialize, Serialize};

use super::{search_term, FormMode};
use crate::pagination::{calculate_pagination, OFFERS_PAGE_SIZE};

pub const MISSING_DETAILS: &str = "Details are required";

/// Search term and page of the offers screen
///
/// A client starting a new search sends `page=1`; the page it was on before
/// may not exist for the narrower result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OfferViewState {
    #[serde(default)]
    pub search: String,
    /// Requested page, clamped when rendering
    #[serde(default = "first_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

impl Default for OfferViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: first_page(),
        }
    }
}

impl OfferViewState {
    pub fn matches(&self, offer: &Offer) -> bool {
        let term = search_term(&self.search);
        term.is_empty()
            || contains_lower(offer.details.as_deref(), &term)
            || contains_lower(offer.status.as_deref(), &term)
            || offer.id.to_string().contains(&term)
    }
}

fn contains_lower(field: Option<&str>, term: &str) -> bool {
    field.is_some_and(|text| text.to_lowercase().contains(term))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Active,
    Inactive,
    Draft,
}

impl StatusClass {
    pub fn classify(status: Option<&str>) -> Self {
        match status.map(str::to_lowercase).as_deref() {
            Some("active" | "live") => StatusClass::Active,
            Some("inactive" | "expired" | "ended") => StatusClass::Inactive,
            _ => StatusClass::Draft,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferRow {
    pub id: i64,
    pub details: String,
    pub status_label: String,
    pub status_class: StatusClass,
}

impl From<&Offer> for OfferRow {
    fn from(offer: &Offer) -> Self {
        let status = offer.status.as_deref().filter(|s| !s.is_empty());
        OfferRow {
            id: offer.id,
            details: offer.details.clone().unwrap_or_default(),
            status_label: status.unwrap_or("N/A").to_string(),
            status_class: StatusClass::classify(status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub active: bool,
}

/// Everything the offers screen shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffersView {
    pub search: String,
    /// Number of offers matching the search
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub rows: Vec<OfferRow>,
    /// Numbered page links; empty when everything fits on one page
    pub pages: Vec<PageLink>,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Filter, clamp the page and slice out the visible rows
pub fn render_offers(records: &[Offer], state: &OfferViewState) -> OffersView {
    let filtered: Vec<&Offer> = records.iter().filter(|o| state.matches(o)).collect();
    let pagination = calculate_pagination(filtered.len(), state.page, OFFERS_PAGE_SIZE);

    let rows = filtered
        .iter()
        .skip(pagination.offset)
        .take(OFFERS_PAGE_SIZE)
        .map(|offer| OfferRow::from(*offer))
        .collect();

    let pages = if pagination.total_pages > 1 {
        (1..=pagination.total_pages)
            .map(|number| PageLink {
                number,
                active: number == pagination.page,
            })
            .collect()
    } else {
        Vec::new()
    };

    OffersView {
        search: state.search.clone(),
        total: filtered.len(),
        page: pagination.page,
        total_pages: pagination.total_pages,
        rows,
        pages,
        has_prev: pagination.has_prev(),
        has_next: pagination.has_next(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferForm {
    pub mode: FormMode,
    pub id: Option<i64>,
    pub details: String,
    pub status: String,
}

pub fn render_offer_form(offer: Option<&Offer>) -> OfferForm {
    match offer {
        Some(offer) => OfferForm {
            mode: FormMode::Edit,
            id: Some(offer.id),
            details: offer.details.clone().unwrap_or_default(),
            status: offer.status.clone().unwrap_or_default(),
        },
        None => OfferForm {
            mode: FormMode::Create,
            id: None,
            details: String::new(),
            status: String::new(),
        },
    }
}

/// Submitted add/edit offer form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OfferSubmission {
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl OfferSubmission {
    pub fn into_payload(self) -> Result<OfferPayload, String> {
        let details = self.details.trim().to_string();
        if details.is_empty() {
            return Err(MISSING_DETAILS.to_string());
        }

        let status = self
            .status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(OfferPayload { details, status })
    }
}
