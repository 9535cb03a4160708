use proptest::prelude::*;
use unsent_core::style::effect::effect_options;
use unsent_core::style::{is_known_color, palette_options, NEUTRAL_BACKGROUND};
use unsent_core::{
    accent_color_for, background_style_for, border_style_for, resolve_card_style,
    resolve_effect, scroll_region_colors_for, TextEffect,
};

#[test]
fn known_color_resolves_its_own_entry() {
    assert_eq!(border_style_for("teal").as_str(), "border-teal-400");
    assert_eq!(background_style_for("teal").as_str(), "bg-teal-100");
    assert_eq!(accent_color_for("teal").as_str(), "#2dd4bf");

    let scroll = scroll_region_colors_for("teal");
    assert_eq!(scroll.thumb, accent_color_for("teal"));
    assert_eq!(scroll.track.as_str(), "#ccfbf1");
}

#[test]
fn identifiers_are_case_insensitive() {
    assert!(is_known_color("NAVY"));
    assert_eq!(border_style_for("Navy"), border_style_for("navy"));
    assert_eq!(resolve_card_style(" MAROON ", true), resolve_card_style("maroon", true));
}

#[test]
fn full_background_gates_only_the_background() {
    let plain = resolve_card_style("purple", false);
    let filled = resolve_card_style("purple", true);

    assert_eq!(plain.background, NEUTRAL_BACKGROUND);
    assert_eq!(filled.background, background_style_for("purple"));
    assert_eq!(plain.border, filled.border);
    assert_eq!(plain.accent, filled.accent);
    assert_eq!(plain.scroll, filled.scroll);
}

#[test]
fn palette_options_start_with_default() {
    let options = palette_options().collect::<Vec<_>>();
    assert_eq!(options.first(), Some(&("default", "Default")));
    assert_eq!(options.len(), 12);
    assert!(options.iter().all(|(id, _)| is_known_color(id)));
}

#[test]
fn effect_options_follow_letter_style() {
    let sad = effect_options("sad")
        .into_iter()
        .map(|(id, _)| id)
        .collect::<Vec<_>>();
    assert_eq!(sad, vec!["bleeding", "glitch", "vanishing", "shattering"]);

    let love = effect_options("love")
        .into_iter()
        .map(|(id, _)| id)
        .collect::<Vec<_>>();
    assert_eq!(love, vec!["handwritten", "neon"]);

    assert_eq!(effect_options("default").len(), 6);
    assert_eq!(effect_options("unknown"), effect_options("default"));
}

#[test]
fn effects_outside_their_category_are_dropped() {
    assert_eq!(resolve_effect("sad", Some("neon")), None);
    assert_eq!(resolve_effect("sad", Some("Glitch")), Some(TextEffect::Glitch));
    assert_eq!(resolve_effect("default", Some("sparkle")), None);
    assert_eq!(resolve_effect("default", None), None);
    assert_eq!(resolve_effect("default", Some("")), None);
}

proptest! {
    #[test]
    fn unknown_colors_resolve_to_default(color in "[a-z]{1,12}") {
        prop_assume!(!is_known_color(&color));

        prop_assert_eq!(border_style_for(&color), border_style_for("default"));
        prop_assert_eq!(background_style_for(&color), background_style_for("default"));
        prop_assert_eq!(accent_color_for(&color), accent_color_for("default"));
        prop_assert_eq!(scroll_region_colors_for(&color), scroll_region_colors_for("default"));
    }

    #[test]
    fn resolution_is_stable_across_calls(color in ".{0,16}", full in any::<bool>()) {
        prop_assert_eq!(resolve_card_style(&color, full), resolve_card_style(&color, full));
    }
}
