// src/extractors/contact.rs
use crate::utils::error::{ExtractError, FetchError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

// Query string of the directory site's AJAX route for user lookups
const AJAX_ROUTE_QUERY: &str = "show=ajax&module=users";

/// Action discriminator the AJAX route expects for address lookups.
pub const EMAIL_ACTION: &str = "getMailAddress";

static EMAIL_TRIGGER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.m-sendEmailToUser").expect("Failed to compile EMAIL_TRIGGER_SELECTOR")
});

// Labels are matched exactly as the source site writes them (work phone, mobile).
// The digit run stops at the end of the line.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:Tlf\. arb\.:|Mobil:)[ \t]*([\d ]+)").expect("Failed to compile PHONE_RE")
});

/// Which address the AJAX route should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Work,
    Private,
}

impl EmailKind {
    pub fn as_form_value(self) -> &'static str {
        match self {
            EmailKind::Work => "arb",
            EmailKind::Private => "priv",
        }
    }
}

/// The anchor chosen for an email lookup, detached from the DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTrigger {
    pub id: String,
    pub kind: EmailKind,
}

/// Picks the email-trigger anchor of a contact cell.
///
/// A private-flagged anchor wins if there is one. Otherwise the work kind
/// is requested with the last trigger anchor in the cell.
pub fn find_email_trigger(cell: ElementRef) -> Result<EmailTrigger, ExtractError> {
    let anchors: Vec<ElementRef> = cell.select(&EMAIL_TRIGGER_SELECTOR).collect();

    let private = anchors.iter().find(|a| {
        a.value()
            .attr("data-emailtype")
            .is_some_and(|t| t.contains("priv"))
    });

    let (anchor, kind) = match private {
        Some(anchor) => (anchor, EmailKind::Private),
        None => (
            anchors.last().ok_or(ExtractError::MissingEmailTrigger)?,
            EmailKind::Work,
        ),
    };

    let id = anchor
        .value()
        .attr("data-id")
        .ok_or(ExtractError::MissingEmailId)?;

    Ok(EmailTrigger {
        id: id.to_string(),
        kind,
    })
}

/// Builds the AJAX endpoint from a page URL: same authority and path, query
/// replaced by the users-module route.
pub fn email_endpoint(page_url: &str) -> Result<Url, FetchError> {
    let mut endpoint =
        Url::parse(page_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", page_url, e)))?;
    endpoint.set_fragment(None);
    endpoint.set_query(Some(AJAX_ROUTE_QUERY));
    Ok(endpoint)
}

/// Finds the first labelled phone number in contact text.
///
/// Only the first label match counts; if its digits don't parse, there is
/// no fallback to later matches.
pub fn extract_phone(text: &str) -> Result<u64, ExtractError> {
    let caps = PHONE_RE.captures(text).ok_or(ExtractError::PhoneNotFound)?;
    let digits: String = caps[1].chars().filter(|c| *c != ' ').collect();

    digits
        .parse::<u64>()
        .map_err(|_| ExtractError::InvalidPhone(digits))
}
