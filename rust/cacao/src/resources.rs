//! Bulleted rendering of the resource list.

/// Renders one `- <resource>` line per entry, joined by `\n`, in input order.
///
/// An empty list renders as the empty string. Each resource is assumed to
/// be a single line; [`CacaoBuilder`][crate::CacaoBuilder] and decoding both
/// reject resources containing `\r` or `\n`, which would otherwise render
/// as extra entries.
pub fn render_resources<I, S>(resources: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resources
        .into_iter()
        .map(|resource| format!("- {}", resource.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn it_renders_nothing_for_no_resources() {
        assert_eq!(render_resources(Vec::<String>::new()), "");
    }

    #[test]
    fn it_renders_one_line_per_resource() {
        assert_eq!(
            render_resources(["ipfs://bafy", "https://example.com/claim.json"]),
            "- ipfs://bafy\n- https://example.com/claim.json"
        );
    }

    #[test]
    fn it_is_sensitive_to_order() {
        assert_ne!(
            render_resources(["a:1", "b:2"]),
            render_resources(["b:2", "a:1"])
        );
    }

    #[test]
    fn it_passes_embedded_line_breaks_through() {
        let rendered = render_resources(["https://a.example/\n- https://evil.example/"]);
        assert_eq!(rendered.lines().count(), 2);
    }

    proptest! {
        #[test]
        fn it_preserves_count_and_order(resources in prop::collection::vec("[a-z]{1,8}:[^\r\n]{0,16}", 1..8)) {
            let rendered = render_resources(&resources);
            let lines: Vec<&str> = rendered.split('\n').collect();

            prop_assert_eq!(lines.len(), resources.len());
            for (line, resource) in lines.iter().zip(&resources) {
                prop_assert!(line.starts_with("- "));
                prop_assert_eq!(&line[2..], resource.as_str());
            }
        }
    }
}
