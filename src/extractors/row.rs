// src/extractors/row.rs

// --- Imports ---
use crate::extractors::contact::{extract_phone, find_email_trigger, EmailTrigger};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

// --- CSS Selectors (Lazy Static) ---
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile CELL_SELECTOR"));

static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("Failed to compile IMAGE_SELECTOR"));

// The name is the emphasized inline text of the second cell
static NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("strong").expect("Failed to compile NAME_SELECTOR"));

static BREAK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("br").expect("Failed to compile BREAK_SELECTOR"));

// Cell positions inside a staff row
const IMAGE_CELL: usize = 0;
const NAME_CELL: usize = 1;
const CONTACT_CELL: usize = 2;

// --- Data Structures ---

/// Everything a row yields without touching the network.
///
/// Mandatory fields are plain values; optional fields keep their failure tag
/// so the caller decides what a miss means. Owns all its data, so it can be
/// moved into a worker task after the DOM is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDraft {
    pub name: String,
    pub image_url: String,
    pub role: Result<String, ExtractError>,
    pub phone: Result<u64, ExtractError>,
    pub email_trigger: Result<EmailTrigger, ExtractError>,
}

/// Parses a page and extracts a draft (or the reason for skipping) from
/// every table row, in document order.
pub fn collect_rows(html: &str, page_url: &Url) -> Vec<Result<RowDraft, ExtractError>> {
    let document = Html::parse_document(html);
    document
        .select(&ROW_SELECTOR)
        .map(|row| extract_row(row, page_url))
        .collect()
}

/// Extracts one row. Errors here mean "not a staff row": missing image,
/// missing name or an unusable image path.
pub fn extract_row(row: ElementRef, page_url: &Url) -> Result<RowDraft, ExtractError> {
    let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();

    // 1. Portrait image in the first cell
    let image = cells
        .get(IMAGE_CELL)
        .ok_or(ExtractError::MissingCell(IMAGE_CELL))?
        .select(&IMAGE_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingImage)?;

    // 2. Name in the second cell
    let name_cell = *cells
        .get(NAME_CELL)
        .ok_or(ExtractError::MissingCell(NAME_CELL))?;
    let name = extract_name(name_cell)?;

    // 3. Absolute image URL
    let image_url = compose_image_url(page_url, image.value().attr("src").unwrap_or_default())?;

    // 4-6. Optional fields, failures kept as tags
    let contact = cells
        .get(CONTACT_CELL)
        .copied()
        .ok_or(ExtractError::MissingCell(CONTACT_CELL));

    let email_trigger = contact.clone().and_then(find_email_trigger);
    let phone = contact.and_then(|cell| extract_phone(&cell.text().collect::<String>()));
    let role = extract_role(name_cell);

    Ok(RowDraft {
        name,
        image_url,
        role,
        phone,
        email_trigger,
    })
}

/// Resolves an image path against the page URL by replacing the page's last
/// path segment.
pub fn compose_image_url(page_url: &Url, src: &str) -> Result<String, ExtractError> {
    let src = src.trim();
    if src.is_empty() {
        return Err(ExtractError::EmptyImageUrl);
    }

    page_url
        .join(src)
        .map(String::from)
        .map_err(|_| ExtractError::BadImagePath(src.to_string()))
}

fn extract_name(cell: ElementRef) -> Result<String, ExtractError> {
    let strong = cell
        .select(&NAME_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingName)?;

    let name = collapse_spaces(&strong.text().collect::<String>());
    if name.is_empty() {
        return Err(ExtractError::MissingName);
    }
    Ok(name)
}

/// The role is the text node right after the first `<br>` of the name cell.
fn extract_role(cell: ElementRef) -> Result<String, ExtractError> {
    let br = cell
        .select(&BREAK_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingRole)?;

    let text = br
        .next_sibling()
        .and_then(|node| node.value().as_text().map(|t| t.trim().to_owned()))
        .ok_or(ExtractError::MissingRole)?;

    let role = text.replace(['\n', '\t'], "");
    if role.is_empty() {
        return Err(ExtractError::MissingRole);
    }
    Ok(role)
}

fn collapse_spaces(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
