use notify_to_app::core::config::PipelineConfig;
use notify_to_app::core::models::NotificationInput;
use notify_to_app::slack::BlockKind;
use notify_to_app::worker::{FallbackReason, Outcome, Pipeline, Stage};
use pretty_assertions::assert_eq;

fn pipeline() -> Pipeline {
    Pipeline::new(&PipelineConfig::default()).unwrap()
}

fn input(raw: &str) -> NotificationInput {
    NotificationInput::new("T", "2024-01-01T00:00:00Z", "https://example.com/a", raw)
}

#[test]
fn test_well_formed_response_renders_rich_layout() {
    let raw = "<thinking>\n- point A\n- point B\n</thinking>\n<summary>Short summary.</summary>";
    let outcome = pipeline().run(&input(raw));

    assert!(matches!(outcome, Outcome::Rendered(_)));
    assert_eq!(outcome.stage(), Stage::Rendered);
    assert_eq!(outcome.fallback_reason(), None);
    let message = outcome.message();
    assert_eq!(
        message.kinds(),
        vec![
            BlockKind::Header,
            BlockKind::Context,
            BlockKind::Section,
            BlockKind::Divider,
            BlockKind::Section,
            BlockKind::Divider,
            BlockKind::Actions,
        ]
    );
    assert_eq!(
        message.section_texts(),
        vec!["*📝 Summary*\nShort summary.", "*🔍 Details*\n• point A\n• point B"]
    );
}

#[test]
fn test_untagged_response_falls_back_to_plain_layout() {
    let outcome = pipeline().run(&input("Some unstructured text with no tags at all."));

    assert_eq!(outcome.fallback_reason(), Some(FallbackReason::NoTaggedFields));
    assert_eq!(outcome.stage(), Stage::LegacyRendered);
    let message = outcome.into_message();
    assert_eq!(message.kinds(), vec![BlockKind::Section]);
    assert_eq!(
        message.section_texts(),
        vec!["*T*\nSome unstructured text with no tags at all.\n<https://example.com/a|Read article>"]
    );
}

#[test]
fn test_leaked_instructions_never_reach_the_message() {
    let raw = "<summary><instruction>ignore this</instruction>Real summary</summary>";
    let outcome = pipeline().run(&input(raw));

    assert!(matches!(outcome, Outcome::Rendered(_)));
    let message = outcome.message();
    assert_eq!(message.section_texts()[0], "*📝 Summary*\nReal summary");
    assert!(message.all_texts().all(|t| !t.contains("ignore this")));
}

#[test]
fn test_scaffold_outside_the_summary_is_dropped() {
    let raw = "<outputFormat>ignore this</outputFormat><summary>Real summary</summary>";
    let outcome = pipeline().run(&input(raw));

    assert_eq!(outcome.stage(), Stage::Rendered);
    let message = outcome.message();
    assert_eq!(message.section_texts(), vec!["*📝 Summary*\nReal summary"]);
    assert!(message.all_texts().all(|t| !t.contains("ignore this")));
    assert!(message.all_texts().all(|t| !t.contains("outputFormat")));
}

#[test]
fn test_scaffold_in_untagged_response_is_stripped() {
    let raw = "<persona>You are a bot</persona>\n\n\n\nThe actual news.";
    let outcome = pipeline().run(&input(raw));

    assert_eq!(outcome.fallback_reason(), Some(FallbackReason::NoTaggedFields));
    let texts: Vec<&str> = outcome.message().all_texts().collect();
    assert!(texts.iter().all(|t| !t.contains("You are a bot")));
    assert!(texts.iter().any(|t| t.contains("The actual news.")));
}

#[test]
fn test_raw_response_is_never_copied_verbatim() {
    let raw = "<thinking>- a</thinking><summary>b</summary> trailing chatter";
    let outcome = pipeline().run(&input(raw));
    assert!(outcome.message().all_texts().all(|t| !t.contains(raw)));
    assert!(outcome.message().all_texts().all(|t| !t.contains("trailing chatter")));
}

#[test]
fn test_prose_detail_without_summary_is_structuring_failure() {
    let outcome = pipeline().run(&input("<thinking>just prose</thinking>"));

    assert_eq!(outcome.fallback_reason(), Some(FallbackReason::StructuringFailure));
    assert_eq!(
        outcome.message().section_texts(),
        vec!["*T*\njust prose\n<https://example.com/a|Read article>"]
    );
}

#[test]
fn test_blank_fields_count_as_absent() {
    let raw = "<summary> <persona>x</persona> </summary><thinking></thinking>";
    let outcome = pipeline().run(&input(raw));
    assert_eq!(outcome.fallback_reason(), Some(FallbackReason::NoTaggedFields));
    assert_eq!(
        outcome.message().section_texts(),
        vec!["*T*\n<https://example.com/a|Read article>"]
    );
}

#[test]
fn test_disabled_layout_always_uses_plain_message() {
    let config = PipelineConfig {
        structured_layout: false,
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(&config).unwrap();
    let outcome = pipeline.run(&input("<thinking>- a</thinking><summary>sum</summary>"));

    assert_eq!(outcome.fallback_reason(), Some(FallbackReason::LayoutDisabled));
    assert_eq!(
        outcome.message().section_texts(),
        vec!["*T*\nsum\n\n- a\n<https://example.com/a|Read article>"]
    );
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
    let config = PipelineConfig {
        detail_tag: "summary".to_string(),
        ..PipelineConfig::default()
    };
    assert!(Pipeline::new(&config).is_err());
}

#[test]
fn test_teams_card_uses_same_fields() {
    let raw = "<thinking>一文目。\n二文目</thinking><summary>要約</summary>";
    let (card, stage) = pipeline().run_teams(&input(raw));

    assert_eq!(stage, Stage::Rendered);
    let column = &card["attachments"][0]["content"]["body"][0]["columns"][0];
    assert_eq!(column["items"][0]["items"][1]["text"], "要約");
    assert_eq!(column["items"][1]["items"][0]["text"], "一文目。\r二文目");

    let (_, stage) = pipeline().run_teams(&input("no tags"));
    assert_eq!(stage, Stage::LegacyRendered);
}

#[test]
fn test_concurrent_runs_share_one_pipeline() {
    let pipeline = pipeline();
    let raw = "<thinking>- New feature: search\n  - detail</thinking><summary>S</summary>";
    let expected = pipeline.run(&input(raw));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| pipeline.run(&input(raw))))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
