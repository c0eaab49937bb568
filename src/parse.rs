use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};

use crate::record::RawRow;
use crate::{Error, Result};

/// Id of the ASP.NET form carrying the session state.
pub const FORM_ID: &str = "aspnetForm";
/// Hidden inputs the server needs back on every search.
pub const REQUIRED_FIELDS: [&str; 3] = ["__VIEWSTATE", "__VIEWSTATEGENERATOR", "__EVENTVALIDATION"];
/// The results grid id is generated, only this part of it is stable.
pub const RESULTS_TABLE_ID_PART: &str = "_grdResults";

/// Reads the `required` hidden inputs (by `id`) out of `form#{form_id}`.
/// An input without a `value` attribute yields an empty string.
pub(crate) fn parse_hidden_fields(
    html: &str,
    form_id: &str,
    required: &[&str],
) -> Result<BTreeMap<String, String>> {
    let doc = Html::parse_document(html);
    let form_selector = create_selector(&format!(r#"form[id="{form_id}"]"#))?;
    let input_selector = create_selector("input")?;

    let form = doc
        .select(&form_selector)
        .next()
        .ok_or_else(|| Error::TokenUnavailable(format!("form '{form_id}' not found")))?;

    let mut fields = BTreeMap::new();
    for input in form.select(&input_selector) {
        let el = input.value();
        if let Some(id) = el.id().filter(|id| required.contains(id)) {
            fields.insert(id.to_string(), el.attr("value").unwrap_or_default().to_string());
        }
    }

    if let Some(missing) = required.iter().find(|f| !fields.contains_key(**f)) {
        return Err(Error::TokenUnavailable(format!(
            "hidden field '{missing}' not found in form '{form_id}'"
        )));
    }
    Ok(fields)
}

/// Finds the results table and returns all of its rows.
/// `Ok(None)` means the page had no results table at all.
pub(crate) fn parse_results_rows(html: &str) -> Result<Option<Vec<RawRow>>> {
    let doc = Html::parse_document(html);
    let table_selector = create_selector(&format!(r#"table[id*="{RESULTS_TABLE_ID_PART}"]"#))?;
    let row_selector = create_selector("tr")?;
    let cell_selector = create_selector("td")?;

    let Some(table) = doc.select(&table_selector).next() else {
        return Ok(None);
    };

    let rows: Vec<RawRow> = table
        .select(&row_selector)
        .map(|tr| tr.select(&cell_selector).map(cell_text).collect::<RawRow>())
        .collect();
    Ok(Some(rows))
}

#[inline]
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
