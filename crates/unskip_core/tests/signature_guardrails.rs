use std::collections::HashMap;

use unskip_core::classify::{Classification, DIAGNOSTIC_SIGNATURES, classify_failure};
use unskip_core::markers;

#[test]
fn signature_markers_are_non_empty_and_unique() {
    let mut seen: HashMap<&'static str, Classification> = HashMap::new();

    for sig in DIAGNOSTIC_SIGNATURES {
        assert!(!sig.marker.is_empty(), "empty marker for {:?}", sig.classification);
        if let Some(prev) = seen.insert(sig.marker, sig.classification) {
            panic!(
                "duplicate marker {:?}: {:?} and {:?}",
                sig.marker, prev, sig.classification
            );
        }
    }
}

#[test]
fn signature_classifications_are_distinct_and_never_fallbacks() {
    let mut seen: Vec<Classification> = Vec::new();

    for sig in DIAGNOSTIC_SIGNATURES {
        assert!(
            !matches!(
                sig.classification,
                Classification::ReturnCode(_) | Classification::TimedOut | Classification::HarnessError
            ),
            "fallback classification used as a signature: {:?}",
            sig.classification
        );
        assert!(
            !seen.contains(&sig.classification),
            "classification listed twice: {:?}",
            sig.classification
        );
        seen.push(sig.classification);
    }
}

#[test]
fn each_marker_alone_classifies_to_its_row_or_an_earlier_row() {
    for (row, sig) in DIAGNOSTIC_SIGNATURES.iter().enumerate() {
        let got = classify_failure(sig.marker, 1);
        let winner = DIAGNOSTIC_SIGNATURES
            .iter()
            .position(|s| s.classification == got)
            .unwrap_or_else(|| panic!("marker {:?} fell through to {:?}", sig.marker, got));
        assert!(winner <= row, "marker {:?} matched a later row", sig.marker);
    }
}

#[test]
fn skip_statement_names_the_tracked_backend() {
    assert!(markers::SKIP_STATEMENT.contains(markers::BACKEND));
    assert!(markers::SKIP_STATEMENT.contains(markers::CANDIDATE_RETURN));
    assert!(!markers::PROVISIONAL_TAG.contains('\n'));
    assert!(markers::provisional_skip_line("\n").starts_with(markers::CANDIDATE_PREFIX));
}
