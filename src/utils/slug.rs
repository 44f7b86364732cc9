//! Slug derivation for show titles and guest names
//!
//! Slugs are the natural keys for guests (`name_slug`) and the URL
//! identifiers for shows, so the function must be deterministic and
//! idempotent: slugifying a slug yields the same slug.

/// Normalize a display name or title into a URL-safe slug.
///
/// Lowercases, folds common Latin diacritics to ASCII, maps whitespace and
/// punctuation runs to a single `-`, and trims leading/trailing dashes.
/// Characters with no ASCII fold (emoji, CJK) are dropped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if let Some(folded) = fold_diacritic(ch) {
            slug.push_str(folded);
            last_dash = false;
        } else if ch.is_ascii() {
            // Whitespace and punctuation collapse to a single separator
            if !last_dash && !slug.is_empty() {
                slug.push('-');
                last_dash = true;
            }
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Fold an accented character to its lowercase ASCII approximation.
///
/// Covers the Latin accents that show up in guest names; anything else
/// non-ASCII returns `None` and is dropped by the caller.
fn fold_diacritic(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ñ' | 'Ñ' => "n",
        'ç' | 'Ç' => "c",
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        _ => return None,
    };
    Some(folded)
}
