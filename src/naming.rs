//! `NNN-name` file naming and URL slugs.
//!
//! Pages in the content root follow the same convention: an optional
//! numeric prefix orders the page in the navigation bar, the rest names it.
//!
//! - `010-about.md` → number 10, slug `about`, title "About"
//! - `020-our-services.md` → number 20, slug `our-services`, title "Our Services"
//! - `draft-notes.md` → unnumbered (hidden from nav), slug `draft-notes`

/// Result of parsing a page file stem.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (`10` from `010-about`).
    pub number: Option<u32>,
    /// URL slug derived from the name part.
    pub slug: String,
    /// Title-cased display name.
    pub display_title: String,
}

/// Parse a file stem following the `NNN-name` convention.
pub fn parse_entry_name(stem: &str) -> ParsedName {
    let (number, name) = match stem.split_once('-') {
        Some((prefix, rest)) if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) => {
            match prefix.parse::<u32>() {
                Ok(n) => (Some(n), rest),
                // Too large to order by: the digits stay part of the name.
                Err(_) => (None, stem),
            }
        }
        _ => (None, stem),
    };
    ParsedName {
        number,
        slug: slugify(name),
        display_title: title_case(name),
    }
}

/// Lowercase, ASCII-alphanumeric slug with single dashes.
///
/// Used for page file names and for category directories under `gallery/`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// `"our-services"` → `"Our Services"`.
fn title_case(name: &str) -> String {
    name.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_page() {
        let p = parse_entry_name("010-about");
        assert_eq!(p.number, Some(10));
        assert_eq!(p.slug, "about");
        assert_eq!(p.display_title, "About");
    }

    #[test]
    fn numbered_multi_word() {
        let p = parse_entry_name("020-our-services");
        assert_eq!(p.number, Some(20));
        assert_eq!(p.slug, "our-services");
        assert_eq!(p.display_title, "Our Services");
    }

    #[test]
    fn unnumbered_keeps_whole_stem() {
        let p = parse_entry_name("draft-notes");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "draft-notes");
        assert_eq!(p.display_title, "Draft Notes");
    }

    #[test]
    fn leading_dash_is_not_a_number() {
        let p = parse_entry_name("-faq");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "faq");
    }

    #[test]
    fn number_only_has_empty_name() {
        let p = parse_entry_name("030-");
        assert_eq!(p.number, Some(30));
        assert_eq!(p.slug, "");
        assert_eq!(p.display_title, "");
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Tile & Stone"), "tile-stone");
        assert_eq!(slugify("  Vinyl/Laminate  "), "vinyl-laminate");
        assert_eq!(slugify("hardwood"), "hardwood");
        assert_eq!(slugify("LVP_2024"), "lvp-2024");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café"), "caf");
        assert_eq!(slugify("ñ"), "");
    }

    #[test]
    fn oversized_prefix_stays_in_name() {
        let p = parse_entry_name("99999999999-foo");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "99999999999-foo");
        assert_eq!(p.display_title, "99999999999 Foo");
    }
}
