use unsent_core::config::{CardConfig, DisplayConfig};
use unsent_core::{
    resolve_card_style, CardEngine, CardMode, CardView, EffectPhase, FlipState, Memory,
    ModerationStatus,
};
use uuid::Uuid;

// 2024-03-01T23:30:00Z, a Friday.
const CREATED_AT: i64 = 1_709_335_800_000;

fn memory(letter_style: &str, animation: Option<&str>) -> Memory {
    Memory {
        id: Uuid::new_v4(),
        recipient: "Ana".to_string(),
        message: "line one\n  line two".to_string(),
        sender: Some("Sam".to_string()),
        created_at: CREATED_AT,
        status: ModerationStatus::Approved,
        color: "teal".to_string(),
        full_background: false,
        letter_style: letter_style.to_string(),
        animation: animation.map(str::to_string),
    }
}

fn engine() -> CardEngine {
    CardEngine::with_seed(&CardConfig::default(), &DisplayConfig::default(), 7)
}

fn engine_with_prompts(prompts: &[&str]) -> CardEngine {
    let card = CardConfig {
        prompts: prompts.iter().map(|prompt| prompt.to_string()).collect(),
        ..CardConfig::default()
    };
    CardEngine::with_seed(&card, &DisplayConfig::default(), 7)
}

#[test]
fn card_without_animation_never_arms() {
    let mut engine = engine();
    let key = engine.mount(memory("default", None), CardMode::Flip);

    let card = engine.card(key).unwrap();
    assert_eq!(card.flip(), FlipState::Front);
    assert_eq!(card.effect_phase(), None);
    assert!(!card.shows_special_marker());

    engine.advance_by(30_000);
    assert_eq!(engine.card(key).unwrap().effect_phase(), None);
}

#[test]
fn one_shot_effect_arms_after_quiet_period_and_stays() {
    let mut engine = engine();
    let key = engine.mount(memory("default", Some("bleeding")), CardMode::Flip);
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Waiting));

    engine.advance_to(4_999);
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Waiting));
    engine.advance_to(5_000);
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Active));

    engine.advance_by(60_000);
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Active));
}

#[test]
fn tap_restarts_one_shot_quiet_period() {
    let mut engine = engine();
    let key = engine.mount(memory("default", Some("bleeding")), CardMode::Flip);

    engine.advance_to(3_000);
    assert!(engine.tap(key));
    assert_eq!(engine.card(key).unwrap().flip(), FlipState::Back);

    engine.advance_to(7_999);
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Waiting));
    engine.advance_to(8_000);
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Active));

    assert!(engine.tap(key));
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Waiting));
}

#[test]
fn taps_only_reset_the_tapped_card() {
    let mut engine = engine();
    let tapped = engine.mount(memory("default", Some("glitch")), CardMode::Flip);
    let untouched = engine.mount(memory("default", Some("glitch")), CardMode::Flip);

    engine.advance_to(3_000);
    engine.tap(tapped);
    engine.advance_to(5_000);

    assert_eq!(engine.card(tapped).unwrap().effect_phase(), Some(EffectPhase::Waiting));
    assert_eq!(engine.card(untouched).unwrap().effect_phase(), Some(EffectPhase::Active));
    assert_eq!(engine.card(untouched).unwrap().flip(), FlipState::Front);
}

#[test]
fn shattering_pulses_and_ignores_taps() {
    let mut engine = engine();
    let key = engine.mount(memory("sad", Some("shattering")), CardMode::Flip);
    let phase = |engine: &CardEngine| engine.card(key).unwrap().effect_phase();

    engine.advance_to(4_999);
    assert_eq!(phase(&engine), Some(EffectPhase::Waiting));
    engine.advance_to(5_000);
    assert_eq!(phase(&engine), Some(EffectPhase::Active));

    engine.advance_to(5_500);
    engine.tap(key);
    assert_eq!(phase(&engine), Some(EffectPhase::Active));
    assert_eq!(engine.card(key).unwrap().flip(), FlipState::Back);

    engine.advance_to(6_000);
    assert_eq!(phase(&engine), Some(EffectPhase::Waiting));
    engine.advance_to(9_999);
    assert_eq!(phase(&engine), Some(EffectPhase::Waiting));
    engine.advance_to(10_000);
    assert_eq!(phase(&engine), Some(EffectPhase::Active));
}

#[test]
fn out_of_category_effect_is_not_applied() {
    let mut engine = engine();
    let key = engine.mount(memory("love", Some("shattering")), CardMode::Flip);

    engine.advance_by(20_000);
    let card = engine.card(key).unwrap();
    assert_eq!(card.effect_phase(), None);
    assert!(!card.shows_special_marker());
}

#[test]
fn flip_round_trip_restores_front_view() {
    let mut engine = engine();
    let key = engine.mount(memory("default", None), CardMode::Flip);
    let front = engine.view(key).unwrap();
    assert!(matches!(front, CardView::Front(_)));

    engine.tap(key);
    assert!(matches!(engine.view(key).unwrap(), CardView::Back(_)));
    engine.tap(key);
    assert_eq!(engine.view(key).unwrap(), front);
}

#[test]
fn unmount_cancels_every_timer() {
    let mut engine = engine();
    let key = engine.mount(memory("sad", Some("shattering")), CardMode::Flip);
    assert_eq!(engine.pending_timers(), 2);

    assert!(engine.unmount(key));
    assert_eq!(engine.pending_timers(), 0);
    assert_eq!(engine.mounted_count(), 0);

    engine.advance_by(60_000);
    assert_eq!(engine.pending_timers(), 0);
    assert!(engine.card(key).is_none());
    assert!(engine.view(key).is_none());
    assert!(!engine.tap(key));
    assert!(!engine.unmount(key));
}

#[test]
fn remount_starts_from_scratch() {
    let mut engine = engine();
    let memory = memory("default", Some("neon"));
    let first = engine.mount(memory.clone(), CardMode::Flip);
    engine.advance_to(5_000);
    engine.unmount(first);

    let second = engine.mount(memory.clone(), CardMode::Flip);
    assert_ne!(first, second);
    assert_eq!(engine.cards_for(memory.id), vec![second]);
    let card = engine.card(second).unwrap();
    assert_eq!(card.flip(), FlipState::Front);
    assert_eq!(card.effect_phase(), Some(EffectPhase::Waiting));

    engine.advance_to(9_999);
    assert_eq!(engine.card(second).unwrap().effect_phase(), Some(EffectPhase::Waiting));
    engine.advance_to(10_000);
    assert_eq!(engine.card(second).unwrap().effect_phase(), Some(EffectPhase::Active));
}

#[test]
fn typewriter_types_pauses_and_deletes() {
    let mut engine = engine_with_prompts(&["hi"]);
    let key = engine.mount(memory("default", None), CardMode::Flip);
    let card = |engine: &CardEngine| engine.card(key).unwrap().clone();

    assert_eq!(card(&engine).prompt_text(), "");
    engine.advance_to(100);
    assert_eq!(card(&engine).prompt_text(), "h");
    engine.advance_to(200);
    assert_eq!(card(&engine).prompt_text(), "hi");
    assert_eq!(card(&engine).prompt_deleting(), Some(false));

    engine.advance_to(2_199);
    assert_eq!(card(&engine).prompt_text(), "hi");
    engine.advance_to(2_200);
    assert_eq!(card(&engine).prompt_text(), "h");
    assert_eq!(card(&engine).prompt_deleting(), Some(true));

    engine.advance_to(2_250);
    assert_eq!(card(&engine).prompt_char_count(), Some(0));
    assert_eq!(card(&engine).prompt_deleting(), Some(false));
    engine.advance_to(2_350);
    assert_eq!(card(&engine).prompt_text(), "h");

    assert_eq!(card(&engine).flip(), FlipState::Front);
    assert_eq!(card(&engine).effect_phase(), None);
}

#[test]
fn typewriter_advances_to_next_prompt() {
    let mut engine = engine_with_prompts(&["ab", "cd"]);
    let key = engine.mount(memory("default", None), CardMode::Flip);
    let start = engine.card(key).unwrap().prompt_index().unwrap();

    // type 2, pause, delete 2
    engine.advance_to(2_250);
    let card = engine.card(key).unwrap();
    assert_eq!(card.prompt_index(), Some((start + 1) % 2));
    assert_eq!(card.prompt_char_count(), Some(0));
}

#[test]
fn typewriter_does_not_disturb_effect_timing() {
    let mut engine = engine_with_prompts(&["Tap to reveal message"]);
    let key = engine.mount(memory("default", Some("vanishing")), CardMode::Flip);

    engine.advance_to(4_999);
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Waiting));
    assert_eq!(engine.card(key).unwrap().flip(), FlipState::Front);
    engine.advance_to(5_000);
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Active));
}

#[test]
fn empty_prompt_list_leaves_prompt_blank() {
    let mut engine = engine_with_prompts(&["", "   "]);
    let key = engine.mount(memory("default", None), CardMode::Flip);

    assert!(engine.prompts().is_empty());
    assert_eq!(engine.card(key).unwrap().prompt_index(), None);
    assert_eq!(engine.pending_timers(), 0);
    engine.advance_by(10_000);
    assert_eq!(engine.card(key).unwrap().prompt_text(), "");
}

#[test]
fn detail_mode_never_flips_and_has_no_prompt() {
    let mut engine = engine();
    let key = engine.mount(memory("default", Some("handwritten")), CardMode::Detail);
    assert_eq!(engine.pending_timers(), 1);

    assert!(engine.tap(key));
    assert_eq!(engine.card(key).unwrap().flip(), FlipState::Front);
    assert_eq!(engine.card(key).unwrap().prompt_index(), None);

    engine.advance_by(5_000);
    let CardView::Detail(panel) = engine.view(key).unwrap() else {
        panic!("detail card must render a detail panel");
    };
    assert_eq!(panel.recipient_line, "To: Ana");
    assert_eq!(panel.attribution.as_deref(), Some("\u{2014} Sam"));
    assert_eq!(panel.message.text, "line one\n  line two");
    assert_eq!(panel.message.effect_class, Some("effect-handwritten"));
    assert!(panel.special_marker.is_some());
}

#[test]
fn back_face_applies_effect_class_only_while_active() {
    let mut engine = engine();
    let key = engine.mount(memory("default", Some("bleeding")), CardMode::Flip);
    engine.tap(key);

    let CardView::Back(back) = engine.view(key).unwrap() else {
        panic!("tapped card must show its back");
    };
    assert_eq!(back.message.text, "line one\n  line two");
    assert_eq!(back.message.effect_class, None);

    engine.advance_by(5_000);
    let CardView::Back(back) = engine.view(key).unwrap() else {
        panic!("card must stay on its back");
    };
    assert_eq!(back.message.effect_class, Some("effect-bleeding"));
}

#[test]
fn front_face_shows_lines_marker_and_footer() {
    let display = DisplayConfig {
        utc_offset_minutes: 60,
    };
    let mut engine = CardEngine::with_seed(&CardConfig::default(), &display, 1);
    let key = engine.mount(memory("default", Some("neon")), CardMode::Flip);

    let CardView::Front(front) = engine.view(key).unwrap() else {
        panic!("fresh card must show its front");
    };
    assert_eq!(front.recipient_line, "To: Ana");
    assert_eq!(front.sender_line.as_deref(), Some("From: Sam"));
    let marker = front.special_marker.unwrap();
    assert_eq!(marker.glyph, '✦');
    assert_eq!(marker.color, front.style.accent);
    assert_eq!(front.footer.date, "2024-03-02");
    assert_eq!(front.footer.weekday, "Saturday");
    assert_eq!(front.footer.time, "00:30:00");
    assert_eq!(front.footer.color_label, "teal");
    assert_eq!(front.style, resolve_card_style("teal", false));
}

#[test]
fn anonymous_memory_has_no_attribution() {
    let mut engine = engine();
    let mut anonymous = memory("default", None);
    anonymous.sender = None;
    let flip = engine.mount(anonymous.clone(), CardMode::Flip);
    let detail = engine.mount(anonymous, CardMode::Detail);

    let Some(CardView::Front(front)) = engine.view(flip) else {
        panic!("expected front face");
    };
    assert_eq!(front.sender_line, None);

    let Some(CardView::Detail(panel)) = engine.view(detail) else {
        panic!("expected detail panel");
    };
    assert_eq!(panel.attribution, None);
}

#[test]
fn unknown_color_and_animation_fall_back_quietly() {
    let mut engine = engine();
    let mut odd = memory("gothic", Some("sparkle"));
    odd.color = "chartreuse".to_string();
    odd.full_background = true;
    let key = engine.mount(odd, CardMode::Flip);

    engine.advance_by(10_000);
    let card = engine.card(key).unwrap();
    assert_eq!(card.effect_phase(), None);
    assert_eq!(card.style(), resolve_card_style("default", true));
    let Some(CardView::Front(front)) = engine.view(key) else {
        panic!("expected front face");
    };
    assert!(front.special_marker.is_none());
    assert_eq!(front.footer.color_label, "chartreuse");
}

#[test]
fn mounting_at_the_end_of_the_clock_does_not_overflow() {
    let mut engine = engine();
    engine.advance_by(u64::MAX);
    assert_eq!(engine.now(), u64::MAX);

    let one_shot = engine.mount(memory("default", Some("bleeding")), CardMode::Flip);
    let pulsing = engine.mount(memory("sad", Some("shattering")), CardMode::Flip);
    assert_eq!(engine.pending_timers(), 0);

    assert!(engine.tap(one_shot));
    engine.advance_by(10_000);
    assert_eq!(engine.now(), u64::MAX);
    assert_eq!(engine.card(one_shot).unwrap().effect_phase(), Some(EffectPhase::Waiting));
    assert_eq!(engine.card(pulsing).unwrap().effect_phase(), Some(EffectPhase::Waiting));
    assert_eq!(engine.card(one_shot).unwrap().flip(), FlipState::Back);
}

#[test]
fn periodic_timers_stop_at_the_end_of_the_clock() {
    let mut engine = engine_with_prompts(&["hi"]);
    engine.advance_to(u64::MAX - 3_000);
    let key = engine.mount(memory("sad", Some("shattering")), CardMode::Flip);

    engine.advance_to(u64::MAX);
    assert_eq!(engine.now(), u64::MAX);
    assert_eq!(engine.pending_timers(), 0);
    assert_eq!(engine.card(key).unwrap().effect_phase(), Some(EffectPhase::Waiting));
}

#[test]
fn long_advance_matches_a_short_one_whole_cycles_later() {
    // "hi": 200 + 2000 + 50, "yo!": 300 + 2000 + 100
    const PROMPT_CYCLE: u64 = 2_250 + 2_400;
    // multiple of both the prompt cycle and the 5000 ms pulse period
    const SKIP: u64 = PROMPT_CYCLE * 5_000 * 1_000_000;

    let mut near = engine_with_prompts(&["hi", "yo!"]);
    let mut far = engine_with_prompts(&["hi", "yo!"]);
    let near_key = near.mount(memory("sad", Some("shattering")), CardMode::Flip);
    let far_key = far.mount(memory("sad", Some("shattering")), CardMode::Flip);

    for offset in [3_000, 5_500, 6_100, 9_000] {
        near.advance_to(offset);
        far.advance_to(SKIP + offset);

        let near_card = near.card(near_key).unwrap();
        let far_card = far.card(far_key).unwrap();
        assert_eq!(far_card.effect_phase(), near_card.effect_phase(), "at {offset}");
        assert_eq!(far_card.prompt_index(), near_card.prompt_index(), "at {offset}");
        assert_eq!(far_card.prompt_char_count(), near_card.prompt_char_count(), "at {offset}");
        assert_eq!(far_card.prompt_deleting(), near_card.prompt_deleting(), "at {offset}");
    }
    assert_eq!(far.pending_timers(), near.pending_timers());
}
