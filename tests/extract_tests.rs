use notify_to_app::core::config::PipelineConfig;
use notify_to_app::extract::{FieldExtractor, TagExtractor, extract};
use proptest::prelude::*;

#[test]
fn test_missing_detail_is_absent_not_raw_text() {
    let raw = "<summary>Only a summary</summary>\nplus some chatter the model added";
    let extractor = FieldExtractor::new(&PipelineConfig::default()).unwrap();
    let fields = extractor.extract_fields(raw);

    assert_eq!(fields.summary.as_deref(), Some("Only a summary"));
    assert_eq!(fields.detail, None, "detail must not fall back to the raw response");
}

#[test]
fn test_untagged_response_yields_no_fields() {
    let extractor = FieldExtractor::new(&PipelineConfig::default()).unwrap();
    let fields = extractor.extract_fields("Some unstructured text with no tags at all.");
    assert_eq!(fields.summary, None);
    assert_eq!(fields.detail, None);
}

#[test]
fn test_unbalanced_markup_degrades_to_absent() {
    assert_eq!(extract("<summary>open only", "summary"), None);
    assert_eq!(extract("close only</summary>", "summary"), None);
    assert_eq!(extract("</summary>backwards<summary>", "summary"), None);
}

#[test]
fn test_extractor_reports_its_tag() {
    let extractor = TagExtractor::new("thinking").unwrap();
    assert_eq!(extractor.tag(), "thinking");
    assert_eq!(
        extractor.extract("<thinking>\n\n - x \n</thinking>").as_deref(),
        Some("- x")
    );
}

proptest! {
    #[test]
    fn prop_well_formed_summary_is_recovered(
        prefix in "[a-z \n.]{0,30}",
        body in "[A-Za-z0-9 ,.\n]{0,60}",
        suffix in "[a-z \n.]{0,30}",
    ) {
        let raw = format!("{prefix}<summary>{body}</summary>{suffix}");
        prop_assert_eq!(extract(&raw, "summary"), Some(body.trim().to_string()));
    }
}
