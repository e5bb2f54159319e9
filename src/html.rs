// Scraping helpers for the secureshare HTML pages.
// Extraction is positional: the first anchor of the creation response is the
// share link and the first text-area of the reveal response holds the secret.
// The rest of the page is not modelled.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{Result, ShareError};

/// Name of the hidden form field carrying the anti-forgery token.
pub const TOKEN_FIELD: &str = "csrfmiddlewaretoken";

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new("<.*?>").expect("valid tag pattern"));

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ShareError::Parse(format!("bad selector {css}: {e}")))
}

/// Value of the `csrfmiddlewaretoken` input embedded in a form page.
pub fn anti_forgery_token(body: &str) -> Result<String> {
    let document = Html::parse_document(body);
    let input = selector(&format!("input[name=\"{TOKEN_FIELD}\"]"))?;

    document
        .select(&input)
        .next()
        .ok_or_else(|| ShareError::Parse(format!("no {TOKEN_FIELD} field in response")))?
        .value()
        .attr("value")
        .map(str::to_string)
        .ok_or_else(|| ShareError::Parse(format!("{TOKEN_FIELD} field has no value")))
}

/// `href` of the first anchor in the page, returned verbatim.
pub fn first_link(body: &str) -> Result<String> {
    let document = Html::parse_document(body);
    let anchor = selector("a")?;

    document
        .select(&anchor)
        .next()
        .ok_or_else(|| ShareError::Parse("no hyperlink in response".into()))?
        .value()
        .attr("href")
        .map(str::to_string)
        .ok_or_else(|| ShareError::Parse("first hyperlink has no href".into()))
}

/// Outer markup of the first text-area in the page.
pub fn first_textarea(body: &str) -> Result<String> {
    let document = Html::parse_document(body);
    let textarea = selector("textarea")?;

    document
        .select(&textarea)
        .next()
        .map(|el| el.html())
        .ok_or_else(|| {
            ShareError::Parse(
                "no textarea in response (link expired, already used, or password required)"
                    .into(),
            )
        })
}

/// Removes anything that looks like a tag, line by line.
///
/// Purely textual: a `<...>` sequence that is part of the text is removed as
/// well. Entities such as `&lt;` are left untouched.
pub fn strip_tags(markup: &str) -> String {
    TAG.replace_all(markup, "").into_owned()
}
