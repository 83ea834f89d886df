use proptest::prelude::*;

use crate::{
    Document, Error, Limit, NodeKind, NodeRef, Options, parse, test_utils::registry,
};

use super::generators::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn parser_never_panics(input in any_document_string()) {
        let _ = parse(&input, &registry(), &Options::default());
    }

    #[test]
    fn spans_are_in_bounds(input in ascii_document()) {
        let document = parse(&input, &registry(), &Options::default());
        prop_assert!(document.is_ok());
        if let Ok(document) = document {
            for node in document.traverse() {
                let span = node.span();
                prop_assert!(span.start <= span.end, "{node:?}");
                prop_assert!(span.end <= input.len(), "{node:?}");
            }
        }
    }

    #[test]
    fn spans_are_on_char_boundaries(input in any_document_string()) {
        let input = input.replace('\r', "");
        if let Ok(document) = parse(&input, &registry(), &Options::default()) {
            for node in document.traverse() {
                prop_assert!(input.is_char_boundary(node.span().start));
                prop_assert!(input.is_char_boundary(node.span().end));
            }
        }
    }

    #[test]
    fn tree_is_consistent(input in structured_document()) {
        let options = Options::builder().with_paragraphs().build();
        if let Ok(document) = parse(&input, &registry(), &options) {
            check_tree(&document)?;
        }
    }

    #[test]
    fn depth_is_bounded(input in nested_document()) {
        let options = Options::builder().with_max_depth(32).build();
        match parse(&input, &registry(), &options) {
            Ok(document) => {
                for node in document.traverse() {
                    let elements = node
                        .ancestors()
                        .filter(|ancestor| ancestor.kind() == NodeKind::Element)
                        .count();
                    prop_assert!(elements <= 32);
                }
            }
            Err(Error::ResourceLimitExceeded { limit, maximum, .. }) => {
                prop_assert_eq!(limit, Limit::Depth);
                prop_assert_eq!(maximum, 32);
            }
            Err(other) => return Err(TestCaseError::fail(format!("unexpected error {other}"))),
        }
    }

    #[test]
    fn node_count_is_bounded(
        input in structured_document(),
        max_nodes in 1usize..50,
        paragraphs in any::<bool>(),
    ) {
        let mut builder = Options::builder().with_max_nodes(max_nodes);
        if paragraphs {
            builder = builder.with_paragraphs();
        }
        let options = builder.build();
        if let Ok(document) = parse(&input, &registry(), &options) {
            prop_assert!(document.node_count() <= max_nodes);
        }
    }

    #[test]
    fn canonical_output_reparses_to_the_same_tree(input in structured_document()) {
        let registry = registry();
        if let Ok(document) = parse(&input, &registry, &Options::default()) {
            let canonical = to_canonical(document.root());
            let reparsed = parse(&canonical, &registry, &Options::default());
            prop_assert!(reparsed.is_ok());
            if let Ok(reparsed) = reparsed {
                prop_assert_eq!(document.shape(), reparsed.shape(), "canonical: {:?}", canonical);
            }
        }
    }
}

fn to_canonical(node: NodeRef<'_>) -> String {
    let inner = node.children().map(to_canonical).collect::<String>();
    node.tag().render_canonical(node, inner)
}

fn check_tree(document: &Document) -> Result<(), TestCaseError> {
    let mut visited = 0;
    for node in document.traverse() {
        visited += 1;
        for child in node.children() {
            prop_assert_eq!(child.parent().map(NodeRef::id), Some(node.id()));
        }
        let texts = node.child_ids().windows(2).any(|pair| {
            pair.iter().all(|&id| {
                document
                    .get(id)
                    .is_some_and(|child| child.kind() == NodeKind::Text)
            })
        });
        prop_assert!(!texts, "adjacent text nodes under {node:?}");
        if node.flags().standalone || !node.flags().parse_embedded {
            prop_assert!(node.child_ids().is_empty());
        }
        if node.kind() == NodeKind::Paragraph {
            prop_assert!(node.parent().is_some_and(NodeRef::makes_paragraphs));
            prop_assert!(node.children().all(|child| !child.is_block()));
        }
    }
    prop_assert_eq!(visited, document.node_count());
    Ok(())
}
