//! Integration tests for digit decomposition, the scroll window and the
//! multiplexer

mod common;

use common::{RecordingDelay, RecordingPin};
use std::cell::RefCell;
use std::rc::Rc;
use strobe_core::display::MAX_DIGITS;
use strobe_core::{
    Cooldowns, DigitPins, DisplayEngine, DisplayUnit, Frame, Frequency, Glyph, Multiplexer,
    RateModel, SegmentPins, Step, decompose,
};

use Glyph::{Blank as B, Digit as D};

const SCROLL: u16 = 250;

fn rate_showing(value: u64) -> RateModel {
    RateModel::new(
        Frequency::from_centihertz(value),
        Step::MIN,
        DisplayUnit::CyclesPerSecond,
    )
}

/// Renders once with fresh cooldowns
fn first_frame(value: u64) -> Frame {
    let mut engine = DisplayEngine::new(SCROLL);
    let mut cooldowns = Cooldowns::new();
    engine.render(&rate_showing(value), &mut cooldowns)
}

fn reassemble(symbols: &[Glyph; MAX_DIGITS]) -> u64 {
    symbols.iter().rev().fold(0, |value, glyph| match glyph {
        Glyph::Digit(digit) => value * 10 + u64::from(*digit),
        _ => value,
    })
}

// ============================================================================
// Decomposition
// ============================================================================

#[test]
fn zero_keeps_three_digits() {
    let buffer = decompose(0);
    assert_eq!(buffer.symbols()[..4], [D(0), D(0), D(0), B]);
    assert_eq!(buffer.scroll_max(), 1);
}

#[test]
fn scroll_range_grows_with_digit_count() {
    assert_eq!(decompose(100).scroll_max(), 1);
    assert_eq!(decompose(1_234).scroll_max(), 1);
    assert_eq!(decompose(12_345).scroll_max(), 2);
    assert_eq!(decompose(123_456).scroll_max(), 3);
    assert_eq!(decompose(9_999_999_999).scroll_max(), 7);
}

#[test]
fn decomposed_digits_reassemble_to_value() {
    for value in [0, 7, 100, 1_005, 60_000, 123_456, 1_000_000_000, 9_999_999_999] {
        let buffer = decompose(value);
        assert_eq!(reassemble(buffer.symbols()), value, "value {}", value);
    }
}

#[test]
fn digits_above_most_significant_are_blank() {
    let buffer = decompose(1_005);
    assert_eq!(buffer.symbols()[..5], [D(5), D(0), D(0), D(1), B]);
}

// ============================================================================
// Render window
// ============================================================================

#[test]
fn whole_hertz_hides_zero_fraction() {
    let frame = first_frame(100);
    assert_eq!(frame.glyphs(), [D(1), B, B, B]);
    assert_eq!(frame.dot_position(), Some(0));
}

#[test]
fn two_decimal_value_fits_the_window() {
    let frame = first_frame(1_234);
    assert_eq!(frame.glyphs(), [D(4), D(3), D(2), D(1)]);
    assert_eq!(frame.dot_position(), Some(2));
}

#[test]
fn trailing_zero_hundredth_is_skipped() {
    let frame = first_frame(1_230);
    assert_eq!(frame.glyphs(), [D(3), D(2), D(1), B]);
    assert_eq!(frame.dot_position(), Some(1));
}

#[test]
fn whole_value_longer_than_window_is_pinned() {
    let frame = first_frame(12_000);
    assert_eq!(frame.glyphs(), [D(0), D(2), D(1), B]);
    assert_eq!(frame.dot_position(), Some(0));
}

#[test]
fn long_value_scrolls_once_per_interval() {
    let rate = rate_showing(123_456);
    let mut engine = DisplayEngine::new(SCROLL);
    let mut cooldowns = Cooldowns::new();

    let first = engine.render(&rate, &mut cooldowns);
    assert_eq!(engine.scroll_position(), 1);
    assert_eq!(first.glyphs(), [D(5), D(4), D(3), D(2)]);
    assert_eq!(first.dot_position(), Some(1));

    // Window holds until the scroll cooldown runs out
    for _ in 0..SCROLL - 1 {
        cooldowns.tick();
        assert_eq!(engine.render(&rate, &mut cooldowns), first);
    }

    cooldowns.tick();
    let second = engine.render(&rate, &mut cooldowns);
    assert_eq!(engine.scroll_position(), 2);
    assert_eq!(second.glyphs(), [D(6), D(5), D(4), D(3)]);
    assert_eq!(second.dot_position(), Some(2));

    for _ in 0..SCROLL {
        cooldowns.tick();
    }
    let third = engine.render(&rate, &mut cooldowns);
    assert_eq!(engine.scroll_position(), 0);
    assert_eq!(third.glyphs(), [D(4), D(3), D(2), D(1)]);
    assert_eq!(third.dot_position(), Some(0));
}

#[test]
fn rpm_label_frame() {
    let mut engine = DisplayEngine::new(SCROLL);
    let mut cooldowns = Cooldowns::new();
    cooldowns.transient.arm(1_000);
    cooldowns.scroll.arm(SCROLL);

    engine.show_unit_label(DisplayUnit::CyclesPerMinute, &mut cooldowns);
    assert!(cooldowns.scroll.is_ready());

    let frame = engine.render(&rate_showing(100), &mut cooldowns);
    assert_eq!(frame.glyphs(), [B, Glyph::M, Glyph::P, Glyph::R]);
}

#[test]
fn hertz_label_frame() {
    let mut engine = DisplayEngine::new(SCROLL);
    let mut cooldowns = Cooldowns::new();
    cooldowns.transient.arm(1_000);

    engine.show_unit_label(DisplayUnit::CyclesPerSecond, &mut cooldowns);
    let frame = engine.render(&rate_showing(100), &mut cooldowns);
    assert_eq!(frame.glyphs(), [B, B, D(2), Glyph::H]);
}

#[test]
fn transient_display_holds_until_cooldown_expires() {
    let rate = rate_showing(100);
    let mut engine = DisplayEngine::new(SCROLL);
    let mut cooldowns = Cooldowns::new();
    cooldowns.transient.arm(2);

    engine.show_step(Step::new(1_000).unwrap());
    let frame = engine.render(&rate, &mut cooldowns);
    assert_eq!(frame.glyphs(), [D(0), D(1), B, B]);
    assert_eq!(frame.dot_position(), Some(0));
    assert_eq!(reassemble(engine.buffer().symbols()), 1_000);

    cooldowns.tick();
    cooldowns.tick();
    engine.render(&rate, &mut cooldowns);
    assert_eq!(reassemble(engine.buffer().symbols()), 100);
}

#[test]
fn glyph_segment_patterns() {
    assert_eq!(D(8).segments(), 0b1111_1110);
    assert_eq!(D(1).segments(), 0b0110_0000);
    assert_eq!(B.segments(), 0);
    assert_eq!(D(42).segments(), 0);
}

// ============================================================================
// Multiplexer
// ============================================================================

type Log = Rc<RefCell<Vec<(usize, bool)>>>;

const DIGIT_IDS: [usize; 4] = [8, 9, 10, 11];

fn multiplexer(
    log: &Log,
    common_anode: bool,
) -> (Multiplexer<RecordingPin, RecordingDelay>, RecordingDelay) {
    let pin = |id| RecordingPin::new(id, log);
    let segments = SegmentPins {
        a: pin(0),
        b: pin(1),
        c: pin(2),
        d: pin(3),
        e: pin(4),
        f: pin(5),
        g: pin(6),
        dp: pin(7),
    };
    let digits = DigitPins {
        d1: pin(8),
        d2: pin(9),
        d3: pin(10),
        d4: pin(11),
    };
    let delay = RecordingDelay::default();
    let mux = Multiplexer::new(segments, digits, delay.clone(), 1_000, common_anode).unwrap();
    (mux, delay)
}

#[test]
fn construction_switches_every_digit_off() {
    let log = Log::default();
    let _mux = multiplexer(&log, false);

    assert_eq!(
        *log.borrow(),
        vec![(8, true), (9, true), (10, true), (11, true)]
    );
}

#[test]
fn frame_is_shown_one_digit_at_a_time() {
    let log = Log::default();
    let (mut mux, delay) = multiplexer(&log, false);
    log.borrow_mut().clear();

    let frame = first_frame(1_234);
    mux.show(&frame).unwrap();

    let log = log.borrow();
    // Per position: four disables, eight segments, one enable
    assert_eq!(log.len(), 4 * 13 + 4);

    for (position, chunk) in log.chunks(13).take(4).enumerate() {
        assert!(chunk[..4].iter().all(|(id, level)| DIGIT_IDS.contains(id) && *level));

        let pattern = frame.cells[position].segments();
        for (bit, (id, level)) in chunk[4..12].iter().enumerate() {
            assert_eq!(*id, bit);
            assert_eq!(*level, pattern & (0b1000_0000 >> bit) != 0);
        }

        assert_eq!(chunk[12], (DIGIT_IDS[position], false));
    }

    assert!(log[52..].iter().all(|(id, level)| DIGIT_IDS.contains(id) && *level));
    assert_eq!(delay.total_ns.get(), 4_000_000);
}

#[test]
fn common_anode_inverts_both_polarities() {
    let log = Log::default();
    let (mut mux, _delay) = multiplexer(&log, true);
    log.borrow_mut().clear();

    mux.show(&first_frame(100)).unwrap();

    let log = log.borrow();
    // Digit 1 with dot lit: segments b, c and dp low, digit enabled high
    let first = &log[..13];
    assert!(first[..4].iter().all(|(_, level)| !*level));
    assert_eq!(first[5], (1, false));
    assert_eq!(first[6], (2, false));
    assert_eq!(first[4], (0, true));
    assert_eq!(first[11], (7, false));
    assert_eq!(first[12], (8, true));
}
