use notify_to_app::bullets::BulletStructurer;
use notify_to_app::core::config::BulletConfig;
use notify_to_app::core::models::Category;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn structurer() -> BulletStructurer {
    BulletStructurer::new(&BulletConfig::default())
}

#[test]
fn test_scenario_two_points() {
    let items = structurer().structure("- point A\n- point B");
    let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["point A", "point B"]);
    assert!(items.iter().all(|i| i.level == 0 && i.marker.is_none()));
}

#[test]
fn test_text_without_markers_yields_no_bullets() {
    assert!(structurer().structure("Just a paragraph.\nAnother line.").is_empty());
    assert!(structurer().structure("").is_empty());
}

// Assumption: mixed marker styles in one block are equivalent bullets.
#[test]
fn test_mixed_marker_styles_are_equivalent() {
    let items = structurer().structure("- dash\n• dot\n* star\n・ nakaguro");
    let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["dash", "dot", "star", "nakaguro"]);
}

#[test]
fn test_configured_markers_and_indent_width() {
    let config = BulletConfig {
        markers: vec!["+".to_string()],
        indent_width: 4,
        ..BulletConfig::default()
    };
    let items = BulletStructurer::new(&config).structure("+ a\n    + b\n  + c\n- not a bullet");
    let shape: Vec<(usize, &str)> = items.iter().map(|i| (i.level, i.text.as_str())).collect();
    assert_eq!(shape, vec![(0, "a"), (1, "b"), (0, "c not a bullet")]);
}

#[test]
fn test_categories_tag_items() {
    let items = structurer().structure(
        "- New feature: vector search\n- Available in all regions\n- Pricing update\n- Misc note",
    );
    let markers: Vec<Option<Category>> = items.iter().map(|i| i.marker).collect();
    assert_eq!(
        markers,
        vec![
            Some(Category::NewFeature),
            Some(Category::Availability),
            Some(Category::Change),
            None
        ]
    );
}

proptest! {
    #[test]
    fn prop_bullet_order_matches_source(words in prop::collection::vec("[a-z]{1,12}", 0..30)) {
        let detail: String = words.iter().map(|w| format!("- {w}\n")).collect();
        let items = structurer().structure(&detail);
        let texts: Vec<String> = items.into_iter().map(|i| i.text).collect();
        prop_assert_eq!(texts, words);
    }
}
