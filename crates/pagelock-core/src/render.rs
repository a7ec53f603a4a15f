//! Fragment processing applied when content is revealed.
//!
//! Lazy-loading themes emit `<img data-src="...">` and fill in `src` from a
//! scroll handler that already ran before the content existed. Revealed
//! images therefore get their `src` restored here.

/// Give every `<img>` that has `data-src` but no `src` a `src` attribute
/// with the same value. Everything else is copied through untouched.
pub fn restore_lazy_sources(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut rest = fragment;

    while let Some(start) = find_ascii_case_insensitive(rest, "<img") {
        let name_end = start + 4;
        let after_name = &rest[name_end..];
        out.push_str(&rest[..name_end]);

        let is_img_tag = after_name
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_whitespace() || c == '>' || c == '/');
        if !is_img_tag {
            rest = after_name;
            continue;
        }

        let Some((attributes, tag_len)) = parse_attributes(after_name) else {
            rest = after_name;
            break;
        };
        let has_src = attributes
            .iter()
            .any(|attr| attr.name.eq_ignore_ascii_case("src"));
        let lazy_src = attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case("data-src"))
            .and_then(|attr| attr.value);
        if let (false, Some(value)) = (has_src, lazy_src) {
            let quote = if value.contains('"') { '\'' } else { '"' };
            out.push_str(" src=");
            out.push(quote);
            out.push_str(value);
            out.push(quote);
        }

        out.push_str(&after_name[..tag_len]);
        rest = &after_name[tag_len..];
    }

    out.push_str(rest);
    out
}

#[derive(Debug, PartialEq, Eq)]
struct Attribute<'a> {
    name: &'a str,
    value: Option<&'a str>,
}

/// Attributes of a start tag whose name has already been consumed, and the
/// byte offset of the closing `>`. `None` for an unterminated tag.
///
/// Follows the HTML tokenizer closely enough for attribute lookup:
/// whitespace around `=`, quoted values containing `>`, unquoted values
/// ending at whitespace or `>`, and valueless attributes.
fn parse_attributes(tag: &str) -> Option<(Vec<Attribute<'_>>, usize)> {
    let bytes = tag.as_bytes();
    let skip_whitespace = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    let mut attributes = Vec::new();
    let mut i = 0;
    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        match bytes.get(i) {
            None => return None,
            Some(b'>') => return Some((attributes, i)),
            Some(_) => {}
        }

        let name_start = i;
        while i < bytes.len()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
            && !bytes[i].is_ascii_whitespace()
        {
            i += 1;
        }
        let name = &tag[name_start..i];

        let after_name = skip_whitespace(i);
        let mut value = None;
        if bytes.get(after_name) == Some(&b'=') {
            let value_start = skip_whitespace(after_name + 1);
            match bytes.get(value_start) {
                None => return None,
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let len = tag[value_start + 1..].find(quote as char)?;
                    value = Some(&tag[value_start + 1..value_start + 1 + len]);
                    i = value_start + 1 + len + 1;
                }
                Some(_) => {
                    let mut end = value_start;
                    while end < bytes.len()
                        && bytes[end] != b'>'
                        && !bytes[end].is_ascii_whitespace()
                    {
                        end += 1;
                    }
                    value = Some(&tag[value_start..end]);
                    i = end;
                }
            }
        }

        if !name.is_empty() {
            attributes.push(Attribute { name, value });
        }
    }
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restores_missing_src() {
        let html = r#"<p>cat</p><img data-src="/images/cat.png" alt="cat">"#;
        assert_eq!(
            restore_lazy_sources(html),
            r#"<p>cat</p><img src="/images/cat.png" data-src="/images/cat.png" alt="cat">"#
        );
    }

    #[test]
    fn test_keeps_existing_src() {
        let html = r#"<img src="/thumb.png" data-src="/full.png">"#;
        assert_eq!(restore_lazy_sources(html), html);
    }

    #[test]
    fn test_ignores_images_without_data_src() {
        let html = "<img alt='plain'><IMG ALT=x>";
        assert_eq!(restore_lazy_sources(html), html);
    }

    #[test]
    fn test_handles_single_quotes_and_uppercase() {
        let html = "<IMG DATA-SRC='/a.png'/>";
        assert_eq!(restore_lazy_sources(html), "<IMG src=\"/a.png\" DATA-SRC='/a.png'/>");
    }

    #[test]
    fn test_skips_other_img_prefixed_tags() {
        let html = r#"<imgur-embed data-src="/x">"#;
        assert_eq!(restore_lazy_sources(html), html);
    }

    #[test]
    fn test_unterminated_tag_is_copied() {
        let html = r#"<p>ok</p><img data-src="/x""#;
        assert_eq!(restore_lazy_sources(html), html);
    }

    #[test]
    fn test_multibyte_text_survives() {
        let html = "<p>加密</p><img data-src=\"/猫.png\">";
        assert_eq!(
            restore_lazy_sources(html),
            "<p>加密</p><img src=\"/猫.png\" data-src=\"/猫.png\">"
        );
    }

    #[test]
    fn test_spaced_equals_counts_as_existing_src() {
        let html = r#"<img src = "/thumb.png" data-src="/full.png">"#;
        assert_eq!(restore_lazy_sources(html), html);
    }

    #[test]
    fn test_quoted_angle_bracket_does_not_end_tag() {
        let html = r#"<img alt="a>b" data-src="/x.png">"#;
        assert_eq!(
            restore_lazy_sources(html),
            r#"<img src="/x.png" alt="a>b" data-src="/x.png">"#
        );
    }

    #[test]
    fn test_spaced_equals_on_data_src() {
        let html = "<img data-src =\n '/y.png'>";
        assert_eq!(
            restore_lazy_sources(html),
            "<img src=\"/y.png\" data-src =\n '/y.png'>"
        );
    }

    #[test]
    fn test_attribute_text_inside_values_is_ignored() {
        let html = r#"<img alt="data-src=/no.png src=x">"#;
        assert_eq!(restore_lazy_sources(html), html);
    }

    #[test]
    fn test_unquoted_value_keeps_slashes() {
        let html = "<img data-src=/a/b.png>";
        assert_eq!(
            restore_lazy_sources(html),
            "<img src=\"/a/b.png\" data-src=/a/b.png>"
        );
    }

    #[test]
    fn test_valueless_attributes_parse() {
        let (attributes, end) = parse_attributes(" hidden data-src='/z.png' >rest").unwrap();
        assert_eq!(end, 26);
        assert_eq!(
            attributes,
            vec![
                Attribute { name: "hidden", value: None },
                Attribute { name: "data-src", value: Some("/z.png") },
            ]
        );
    }
}
