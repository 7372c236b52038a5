use super::*;

/// Step in small increments until `pred` holds, returning the elapsed time.
fn run_until(s: &mut TypingScript, limit_ms: f64, pred: impl Fn(&TypingScript) -> bool) -> f64 {
    while s.elapsed_ms() < limit_ms {
        if pred(s) {
            return s.elapsed_ms();
        }
        s.advance(1.0);
    }
    panic!("condition not reached within {limit_ms} ms");
}

#[test]
fn walks_every_phase_and_restarts() {
    let mut s = TypingScript::new("hi", "a;\nb", 1);
    assert_eq!(s.phase(), TypingPhase::Idle);

    let mut seen = vec![s.phase()];
    for _ in 0..20_000 {
        s.advance(1.0);
        if seen.last() != Some(&s.phase()) {
            seen.push(s.phase());
        }
        if s.view().cycle == 1 && s.phase() == TypingPhase::UserTyping {
            break;
        }
    }
    assert_eq!(
        seen,
        vec![
            TypingPhase::Idle,
            TypingPhase::UserTyping,
            TypingPhase::AiThinking,
            TypingPhase::Coding,
            TypingPhase::Exiting,
            TypingPhase::UserTyping,
        ]
    );
    let v = s.view();
    assert_eq!((v.prompt, v.code), ("", ""));
}

#[test]
fn prompt_types_after_the_lead_in() {
    let mut s = TypingScript::new("hello", "x", 2);
    s.advance(499.0);
    assert_eq!(s.view().prompt, "");
    assert_eq!(s.phase(), TypingPhase::UserTyping);
    s.advance(1.0);
    assert_eq!(s.view().prompt, "h");

    // Each character waits 10..30 ms.
    let t = run_until(&mut s, 1_000.0, |s| s.view().prompt == "hello");
    assert!(t >= 500.0 + 4.0 * 10.0 && t <= 500.0 + 4.0 * 30.0 + 1.0);
}

#[test]
fn thinking_precedes_coding_by_six_hundred_ms() {
    let mut s = TypingScript::new("", "x", 3);
    let think = run_until(&mut s, 5_000.0, |s| s.phase() == TypingPhase::AiThinking);
    assert_eq!(s.view().status, "Analyzing requirements...");
    let code = run_until(&mut s, 5_000.0, |s| s.phase() == TypingPhase::Coding);
    assert!((code - think - 600.0).abs() <= 1.0);
    assert_eq!(s.view().code_opacity, 0.7);
}

#[test]
fn long_code_dims_and_rotates_thoughts() {
    let code = "x\n".repeat(400);
    let mut s = TypingScript::new("", code.as_str(), 4);
    run_until(&mut s, 10_000.0, |s| s.phase() == TypingPhase::Coding);
    s.advance(20.0);
    assert_eq!(s.view().status, "Analyzing requirements...");
    run_until(&mut s, 20_000.0, |s| s.view().code.matches('\n').count() >= 6);
    assert_eq!(s.view().code_opacity, 0.4);

    let start = s.elapsed_ms();
    run_until(&mut s, start + 5_000.0, |s| s.view().status == "Generating physics...");
    run_until(&mut s, start + 5_000.0, |s| s.view().status == "Optimizing vectors...");
}

#[test]
fn built_in_listing_reaches_the_dimmed_phase() {
    assert!(CODE_LISTING.lines().count() > DIM_AFTER_LINES);
    let mut s = TypingScript::new(DEFAULT_PROMPT, CODE_LISTING, 9);
    run_until(&mut s, 30_000.0, |s| s.view().code_opacity == CODE_OPACITY_DIM);
    assert_eq!(s.phase(), TypingPhase::Coding);
}

#[test]
fn finished_code_holds_then_exits() {
    let mut s = TypingScript::new("", "ab", 5);
    let done = run_until(&mut s, 10_000.0, |s| s.view().status == "Code implemented.");
    assert_eq!(s.view().code, "ab");
    let exit = run_until(&mut s, 20_000.0, |s| s.phase() == TypingPhase::Exiting);
    assert!((exit - done - 2000.0).abs() <= 1.0);
}

#[test]
fn multibyte_text_types_by_character() {
    let mut s = TypingScript::new("héllo", "→;", 6);
    run_until(&mut s, 10_000.0, |s| s.view().prompt == "hé");
    run_until(&mut s, 10_000.0, |s| s.view().code == "→");
}

#[test]
fn character_delays_follow_punctuation() {
    assert_eq!(char_delay_ms('\n', false), 30.0);
    assert_eq!(char_delay_ms(';', false), 15.0);
    assert_eq!(char_delay_ms('}', true), 5.0);
    assert_eq!(char_delay_ms(' ', true), 1.0);
    assert_eq!(char_delay_ms('a', true), 2.0);
}
