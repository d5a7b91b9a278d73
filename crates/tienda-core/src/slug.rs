//! URL-safe slugs for entity names and object-key filenames.

/// Fold a lowercased character to its ASCII slug form, if it has one.
///
/// Accented Latin letters common in the catalog's Spanish names map to
/// their bare ASCII letter; anything else non-ASCII has no slug form.
fn ascii_fold(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    };
    folded.is_ascii_alphanumeric().then_some(folded)
}

/// Slugify arbitrary text into lowercase ASCII: accents are folded
/// (`á` → `a`, `ñ` → `n`), and every run of remaining non-alphanumeric
/// characters collapses to a single `-`.
///
/// Used for entity slugs (categories, products, variants) and for the
/// filename part of storage keys, so both stay in sync and neither needs
/// percent-encoding in URLs.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;

    for c in text.trim().chars() {
        let mut emitted = false;
        for lower in c.to_lowercase() {
            if let Some(ascii) = ascii_fold(lower) {
                if pending_sep && !out.is_empty() {
                    out.push('-');
                }
                pending_sep = false;
                out.push(ascii);
                emitted = true;
            }
        }
        if !emitted {
            pending_sep = true;
        }
    }

    out
}

/// Slug for a filename stem: the final extension is dropped before
/// slugifying, since storage keys force their own extension.
///
/// Falls back to `"file"` when nothing usable remains.
pub fn file_stem_slug(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => filename,
    };

    let slug = slugify(stem);
    if slug.is_empty() {
        "file".to_string()
    } else {
        slug
    }
}
