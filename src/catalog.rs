//! Gallery catalog model and the `gallery-config.xml` parse step.
//!
//! The catalog document lists filter categories and gallery images as
//! attribute-only elements. Nesting is free-form: every `<category>` and
//! every `<image>` element counts, wherever it appears.
//!
//! ```xml
//! <gallery>
//!   <categories>
//!     <category id="all" name="All Projects"/>
//!     <category id="hardwood" name="Hardwood"/>
//!   </categories>
//!   <images>
//!     <image id="1" category="hardwood" title="Oak Living Room"
//!            description="Wide plank white oak" src="/images/gallery/oak.jpg"/>
//!   </images>
//! </gallery>
//! ```
//!
//! ## Attribute Defaults
//!
//! Each expected attribute maps to one typed field. A missing attribute
//! becomes an empty string, so one sloppy record degrades instead of
//! failing the whole gallery. Only a document that is not well-formed XML
//! is rejected.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved category id meaning "no filter".
pub const ALL_CATEGORY: &str = "all";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },
    #[error("document has no root element")]
    NoRoot,
    #[error("unexpected end of document inside <{0}>")]
    Unclosed(String),
}

/// A filter bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn is_all(&self) -> bool {
        self.id == ALL_CATEGORY
    }
}

/// One image in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: String,
    /// Category id. Unknown ids are kept; they just never match a filter.
    pub category: String,
    pub title: String,
    pub description: String,
    /// Site-absolute URL of the image (e.g. `/images/gallery/oak.jpg`).
    pub src: String,
}

/// Categories and items in document order. Built only by [`parse_catalog`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub items: Vec<GalleryItem>,
}

impl Catalog {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Items whose category is not declared in the catalog.
    pub fn orphans(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items
            .iter()
            .filter(|item| self.category(&item.category).is_none())
    }

    /// Category ids declared more than once, in first-seen order.
    pub fn duplicate_category_ids(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        let mut dupes = Vec::new();
        for c in &self.categories {
            if seen.contains(&c.id.as_str()) {
                if !dupes.contains(&c.id.as_str()) {
                    dupes.push(c.id.as_str());
                }
            } else {
                seen.push(c.id.as_str());
            }
        }
        dupes
    }
}

/// Parse a catalog document.
pub fn parse_catalog(xml: &str) -> Result<Catalog, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut catalog = Catalog::default();
    let mut open: Vec<String> = Vec::new();
    let mut saw_root = false;
    let mut stray_text = false;

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Syntax {
            position: reader.error_position() as u64,
            message: e.to_string(),
        })?;
        let syntax = |message: String| ParseError::Syntax {
            position: reader.buffer_position() as u64,
            message,
        };
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if saw_root && open.is_empty() {
                    return Err(syntax("content after the root element".to_string()));
                }
                if stray_text {
                    return Err(syntax("text before the root element".to_string()));
                }
                saw_root = true;
                read_record(e, &mut catalog).map_err(syntax)?;
                if matches!(event, Event::Start(_)) {
                    open.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(|err| syntax(err.to_string()))?;
                if open.is_empty() && !text.trim().is_empty() {
                    if saw_root {
                        return Err(syntax("content after the root element".to_string()));
                    }
                    stray_text = true;
                }
            }
            Event::CData(ref e) if open.is_empty() && !e.is_empty() => {
                return Err(syntax("character data outside the root element".to_string()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(tag) = open.pop() {
        return Err(ParseError::Unclosed(tag));
    }
    if !saw_root {
        return Err(ParseError::NoRoot);
    }
    Ok(catalog)
}

/// Append the record an element describes, if it is one we know.
fn read_record(e: &BytesStart<'_>, catalog: &mut Catalog) -> Result<(), String> {
    match e.local_name().as_ref() {
        b"category" => {
            let mut attrs = Attrs::read(e)?;
            catalog.categories.push(Category {
                id: attrs.take("id"),
                name: attrs.take("name"),
            });
        }
        b"image" => {
            let mut attrs = Attrs::read(e)?;
            catalog.items.push(GalleryItem {
                id: attrs.take("id"),
                category: attrs.take("category"),
                title: attrs.take("title"),
                description: attrs.take("description"),
                src: attrs.take("src"),
            });
        }
        _ => {}
    }
    Ok(())
}

/// Unescaped attribute values of one element.
struct Attrs {
    element: String,
    values: Vec<(String, String)>,
}

impl Attrs {
    fn read(e: &BytesStart<'_>) -> Result<Self, String> {
        let element = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let mut values = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| format!("attribute error in <{element}>: {err}"))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| format!("bad value for {key} in <{element}>: {err}"))?;
            values.push((key, value.into_owned()));
        }
        Ok(Self { element, values })
    }

    /// Remove and return an attribute value, defaulting to empty.
    fn take(&mut self, key: &str) -> String {
        match self.values.iter().position(|(k, _)| k == key) {
            Some(idx) => self.values.swap_remove(idx).1,
            None => {
                tracing::debug!(element = %self.element, attribute = key, "missing attribute, using empty string");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gallery>
  <categories>
    <category id="all" name="All Projects"/>
    <category id="hardwood" name="Hardwood"/>
    <category id="tile" name="Tile &amp; Stone"/>
  </categories>
  <images>
    <image id="1" category="hardwood" title="Oak Living Room" description="Wide plank white oak" src="/images/gallery/oak.jpg"/>
    <image id="2" category="tile" title="Kitchen Backsplash" description="Porcelain herringbone" src="/images/gallery/kitchen.jpg"/>
    <image id="3" category="hardwood" title="Hallway" description="Engineered walnut" src="/images/gallery/hall.jpg"></image>
  </images>
</gallery>
"#;

    #[test]
    fn parses_categories_in_order() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        let ids: Vec<&str> = catalog.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["all", "hardwood", "tile"]);
        assert!(catalog.categories[0].is_all());
    }

    #[test]
    fn parses_items_with_all_fields() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.items.len(), 3);
        let first = &catalog.items[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.category, "hardwood");
        assert_eq!(first.title, "Oak Living Room");
        assert_eq!(first.description, "Wide plank white oak");
        assert_eq!(first.src, "/images/gallery/oak.jpg");
    }

    #[test]
    fn start_and_empty_elements_both_count() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.items[2].title, "Hallway");
    }

    #[test]
    fn entities_are_unescaped() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.category("tile").unwrap().name, "Tile & Stone");
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let xml = r#"<gallery><image id="7" category="tile" title="No Caption" src="/a.jpg"/></gallery>"#;
        let catalog = parse_catalog(xml).unwrap();
        assert_eq!(catalog.items[0].description, "");
        assert_eq!(catalog.items[0].title, "No Caption");
    }

    #[test]
    fn bare_records_default_every_field() {
        let xml = "<gallery><category/><image/></gallery>";
        let catalog = parse_catalog(xml).unwrap();
        assert_eq!(
            catalog.categories[0],
            Category {
                id: String::new(),
                name: String::new()
            }
        );
        assert_eq!(catalog.items[0].src, "");
    }

    #[test]
    fn records_found_at_any_depth() {
        let xml = r#"<site><section><group><image id="deep" src="/d.jpg"/></group></section></site>"#;
        let catalog = parse_catalog(xml).unwrap();
        assert_eq!(catalog.items[0].id, "deep");
    }

    #[test]
    fn empty_root_is_an_empty_catalog() {
        let catalog = parse_catalog("<gallery/>").unwrap();
        assert!(catalog.categories.is_empty());
        assert!(catalog.items.is_empty());
    }

    #[test]
    fn mismatched_end_tag_is_error() {
        let result = parse_catalog("<gallery><images></gallery>");
        assert!(matches!(result, Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn unclosed_root_is_error() {
        let result = parse_catalog("<gallery><image id=\"1\"/>");
        assert!(result.is_err());
    }

    #[test]
    fn plain_text_has_no_root() {
        assert_eq!(parse_catalog("just some text"), Err(ParseError::NoRoot));
        assert_eq!(parse_catalog(""), Err(ParseError::NoRoot));
    }

    #[test]
    fn undefined_entity_is_error() {
        let xml = r#"<gallery><image id="1" title="Caf&eacute;"/></gallery>"#;
        assert!(parse_catalog(xml).is_err());
    }

    #[test]
    fn undefined_entity_in_text_is_error() {
        let xml = r#"<gallery>Caf&eacute; <image id="1"/></gallery>"#;
        assert!(matches!(parse_catalog(xml), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn bare_ampersand_in_text_is_error() {
        let xml = r#"<gallery>a & b<image id="1"/></gallery>"#;
        assert!(matches!(parse_catalog(xml), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn second_root_is_error() {
        let xml = r#"<gallery><image id="1"/></gallery><gallery/>"#;
        assert!(matches!(parse_catalog(xml), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn text_after_root_is_error() {
        let xml = r#"<gallery><image id="1"/></gallery>trailing junk"#;
        assert!(matches!(parse_catalog(xml), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn text_before_root_is_error() {
        let xml = r#"junk before<gallery><image id="1"/></gallery>"#;
        assert!(matches!(parse_catalog(xml), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn declaration_comments_and_whitespace_around_root_are_fine() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- projects -->\n<gallery>\n  <image id=\"1\"/>\n</gallery>\n<!-- end -->\n";
        assert_eq!(parse_catalog(xml).unwrap().items.len(), 1);
    }

    #[test]
    fn orphans_lists_unknown_categories() {
        let xml = r#"<gallery>
            <category id="tile" name="Tile"/>
            <image id="1" category="tile"/>
            <image id="2" category="carpet"/>
        </gallery>"#;
        let catalog = parse_catalog(xml).unwrap();
        let orphans: Vec<&str> = catalog.orphans().map(|i| i.id.as_str()).collect();
        assert_eq!(orphans, vec!["2"]);
    }

    #[test]
    fn duplicate_category_ids_reported_once() {
        let xml = r#"<gallery>
            <category id="tile" name="Tile"/>
            <category id="tile" name="Tile again"/>
            <category id="tile" name="Tile thrice"/>
            <category id="vinyl" name="Vinyl"/>
        </gallery>"#;
        let catalog = parse_catalog(xml).unwrap();
        assert_eq!(catalog.duplicate_category_ids(), vec!["tile"]);
    }
}
