//! Slug generation for object ids and unique ids

/// Turn a display name into a slug: lowercase ASCII alphanumerics joined
/// by single underscores
///
/// Non-ASCII letters are transliterated (`Łódź` -> `lodz`, `Привет` ->
/// `privet`). An empty result becomes `"unknown"`.
pub fn slugify(text: &str) -> String {
    let slug = slug::slugify(text).replace('-', "_");
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("UnifiedRemote"), "unifiedremote");
        assert_eq!(slugify("Living Room PC"), "living_room_pc");
        assert_eq!(slugify("  HTPC -- Office  "), "htpc_office");
        assert_eq!(slugify("Wohnzimmer Fernbedienung Ü"), "wohnzimmer_fernbedienung_u");
        assert_eq!(slugify("Straße 2"), "strasse_2");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Łódź"), "lodz");
        assert_eq!(slugify("Život"), "zivot");
        assert_eq!(slugify("Привет"), "privet");
        assert_ne!(slugify("Гостиная"), slugify("Спальня"));
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "unknown");
        assert_eq!(slugify("!!!"), "unknown");
    }
}
