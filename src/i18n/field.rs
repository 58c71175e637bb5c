// SPDX-License-Identifier: PMPL-1.0-or-later

//! Localized dataset fields (titles, descriptions).

use crate::i18n::Lang;
use crate::types::{LocalizedText, FALLBACK_LANG_CODE};

/// Pick the text of `value` for `lang`.
///
/// Plain strings are returned as-is. Mappings yield the `lang` entry, then the
/// `es` entry, then an empty string; empty entries are skipped.
pub fn resolve_field(value: &LocalizedText, lang: Lang) -> &str {
    match value {
        LocalizedText::Plain(text) => text,
        LocalizedText::ByLanguage(map) => [lang.code(), FALLBACK_LANG_CODE]
            .iter()
            .filter_map(|code| map.get(*code))
            .find(|text| !text.is_empty())
            .map(String::as_str)
            .unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_ignores_language() {
        let value = LocalizedText::from("Piriápolis");
        for lang in Lang::all() {
            assert_eq!(resolve_field(&value, *lang), "Piriápolis");
        }
    }

    #[test]
    fn picks_active_language() {
        let value = LocalizedText::by_language([("es", "Playa"), ("en", "Beach")]);
        assert_eq!(resolve_field(&value, Lang::En), "Beach");
        assert_eq!(resolve_field(&value, Lang::Es), "Playa");
    }

    #[test]
    fn falls_back_to_spanish() {
        let value = LocalizedText::by_language([("es", "Playa"), ("en", "")]);
        assert_eq!(resolve_field(&value, Lang::Pt), "Playa");
        assert_eq!(resolve_field(&value, Lang::En), "Playa");
    }

    #[test]
    fn empty_without_spanish() {
        let value = LocalizedText::by_language([("en", "Beach")]);
        assert_eq!(resolve_field(&value, Lang::Pt), "");
        assert_eq!(resolve_field(&value, Lang::En), "Beach");
        assert_eq!(
            resolve_field(&LocalizedText::ByLanguage(Default::default()), Lang::Es),
            ""
        );
    }
}
