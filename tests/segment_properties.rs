//! Property-based tests for segmentation and rendering.
//!
//! Content comes from a language model, so these throw loosely structured
//! strings full of delimiters at the engine and check the invariants that
//! must hold for any input.

use proptest::prelude::*;
use tutor_content::{render, segment, SegmentKind};

/// Fragments that exercise every delimiter the scanner cares about.
fn content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9 ]{0,6}",
            Just("$".to_string()),
            Just("$$".to_string()),
            Just("|".to_string()),
            Just("| a | b |\n".to_string()),
            Just("|---|:-:|\n".to_string()),
            Just("\n".to_string()),
            Just("**".to_string()),
            Just("`".to_string()),
            Just("é∑".to_string()),
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn segments_tile_the_input(input in content_strategy()) {
        let segments = segment(&input);

        let mut cursor = 0;
        for segment in &segments {
            prop_assert_eq!(segment.span.start, cursor);
            prop_assert!(segment.span.end > segment.span.start);
            cursor = segment.span.end;
        }
        prop_assert_eq!(cursor, input.len());

        let rebuilt: String = segments.iter().map(|s| s.source(&input)).collect();
        prop_assert_eq!(rebuilt, input);
    }

    #[test]
    fn segmentation_is_deterministic(input in content_strategy()) {
        prop_assert_eq!(segment(&input), segment(&input));
    }

    #[test]
    fn prose_without_delimiters_is_one_segment(input in "[a-zA-Z0-9 .,!?*_\n-]{1,80}") {
        let segments = segment(&input);
        prop_assert_eq!(segments.len(), 1);
        prop_assert_eq!(
            &segments[0].kind,
            &SegmentKind::Text { text: input.clone() }
        );
    }

    #[test]
    fn lone_block_math_is_one_segment(math in "[a-z][a-z+=^ ]{0,20}") {
        let input = format!("$${}$$", math);
        let segments = segment(&input);
        prop_assert_eq!(segments.len(), 1);
        prop_assert_eq!(
            &segments[0].kind,
            &SegmentKind::BlockMath { math: math.trim().to_string() }
        );
    }

    #[test]
    fn inline_math_is_single_line(input in content_strategy()) {
        for segment in segment(&input) {
            if let SegmentKind::InlineMath { math } = &segment.kind {
                prop_assert!(!math.contains('\n'));
                prop_assert!(!math.contains('$'));
                prop_assert!(!math.trim().is_empty());
            }
        }
    }

    #[test]
    fn rendering_never_leaks_placeholders(input in content_strategy()) {
        let html = render(Some(&input), None);
        prop_assert!(!html.contains('\u{E000}'), "rendered html contains placeholder U+E000");
        if input.trim().is_empty() {
            prop_assert_eq!(html, "");
        }
    }
}
