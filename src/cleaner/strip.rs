// file: src/cleaner/strip.rs
// description: compiled regex substitution that removes XML tag substrings
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref XML_TAG: Regex = Regex::new(r"<[^>]*>").expect("XML_TAG regex is valid");
}

/// Remove every maximal `<...>` substring from the input; all other
/// characters pass through verbatim, order preserved.
///
/// This is deliberately not an XML parser. CDATA sections, comments, and
/// entity references get no special treatment, and a literal unescaped `<`
/// that happens to precede a later `>` is mis-stripped. That lossy behavior
/// matches the corpus this was built for, where body text is tag-free.
pub fn strip_xml(text: &str) -> String {
    XML_TAG.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_nested_tags() {
        assert_eq!(strip_xml("<a>Hello<b>World</b></a>"), "HelloWorld");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_xml("Artikel 1. De wet"), "Artikel 1. De wet");
    }

    #[test]
    fn test_strips_empty_tag() {
        assert_eq!(strip_xml("a<>b"), "ab");
    }

    #[test]
    fn test_strips_attributes_and_self_closing() {
        assert_eq!(
            strip_xml(r#"<artikel nr="3"/>tekst<lid status="goed">x</lid>"#),
            "tekstx"
        );
    }

    #[test]
    fn test_dangling_open_bracket_survives() {
        // no closing '>' means no tag match
        assert_eq!(strip_xml("1 < 2"), "1 < 2");
    }

    #[test]
    fn test_literal_less_than_before_tag_is_mis_stripped() {
        // known limitation: the '<' opens a "tag" that runs to the next '>'
        assert_eq!(strip_xml("1 < 2 <b>bold</b>"), "1 bold");
    }

    #[test]
    fn test_output_never_contains_tags() {
        let inputs = [
            "<a>Hello<b>World</b></a>",
            "<<a>doubled",
            "text<unclosed",
            "<>",
            "<a><b><c>deep</c></b></a>",
            "mixed > order < here > again",
        ];
        for input in inputs {
            let stripped = strip_xml(input);
            assert!(
                !regex::Regex::new(r"<[^>]*>").unwrap().is_match(&stripped),
                "tags left in output for input {:?}: {:?}",
                input,
                stripped
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "<a>Hello<b>World</b></a>",
            "1 < 2 <b>bold</b>",
            "plain",
            "<x<y>z>",
            "",
        ];
        for input in inputs {
            let once = strip_xml(input);
            assert_eq!(strip_xml(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_multibyte_content_preserved() {
        assert_eq!(strip_xml("<al>wĳziging über €5</al>"), "wĳziging über €5");
    }
}
