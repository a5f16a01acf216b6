//! Four-digit seven-segment display: digit decomposition, scrolling and
//! multiplexing.
//!
//! Values are rendered as up to ten decimal digits, least significant first,
//! with an implied decimal point two digits from the right (values are in
//! hundredths). Only four digits are visible at once; longer values scroll
//! through a window that advances every scroll interval.

use crate::cooldown::Cooldowns;
use crate::rate::RateModel;
use crate::types::{DisplayUnit, Step};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Maximum digits in a [`DigitBuffer`].
pub const MAX_DIGITS: usize = 10;

/// Physical digit positions.
pub const POSITIONS: usize = 4;

/// Decimal point bit in a segment pattern.
pub const DOT_SEGMENT: u8 = 0b0000_0001;

const DIGIT_SEGMENTS: [u8; 10] = [
    0b1111_1100, // 0
    0b0110_0000, // 1
    0b1101_1010, // 2
    0b1111_0010, // 3
    0b0110_0110, // 4
    0b1011_0110, // 5
    0b1011_1110, // 6
    0b1110_0000, // 7
    0b1111_1110, // 8
    0b1111_0110, // 9
];

/// A symbol one digit position can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    /// Decimal digit 0-9.
    Digit(u8),
    H,
    /// Lower-case r.
    R,
    P,
    /// Approximated as an upside-down U.
    M,
    Blank,
}

impl Glyph {
    /// Segment pattern, bit 7 = segment a ... bit 1 = segment g, bit 0 = dot.
    pub fn segments(self) -> u8 {
        match self {
            Glyph::Digit(digit) => DIGIT_SEGMENTS.get(usize::from(digit)).copied().unwrap_or(0),
            Glyph::H => 0b0110_1110,
            Glyph::R => 0b0000_1010,
            Glyph::P => 0b1100_1110,
            Glyph::M => 0b1110_1100,
            Glyph::Blank => 0,
        }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Glyph::Digit(0)
    }
}

/// Digits of a value, least significant first, plus its scroll range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitBuffer {
    symbols: [Glyph; MAX_DIGITS],
    scroll_max: i16,
}

impl DigitBuffer {
    /// Label shown after a unit toggle: `rPM` or `H2` (for Hz).
    pub fn unit_label(unit: DisplayUnit) -> Self {
        let mut symbols = [Glyph::Blank; MAX_DIGITS];
        match unit {
            DisplayUnit::CyclesPerMinute => {
                symbols[3] = Glyph::R;
                symbols[2] = Glyph::P;
                symbols[1] = Glyph::M;
            }
            DisplayUnit::CyclesPerSecond => {
                symbols[3] = Glyph::H;
                symbols[2] = Glyph::Digit(2);
            }
        }
        Self {
            symbols,
            scroll_max: 1,
        }
    }

    #[inline]
    pub fn symbols(&self) -> &[Glyph; MAX_DIGITS] {
        &self.symbols
    }

    /// Number of scroll positions, at least 1.
    #[inline]
    pub fn scroll_max(&self) -> i16 {
        self.scroll_max
    }

    fn symbol(&self, index: i16) -> Glyph {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.symbols.get(index))
            .copied()
            .unwrap_or(Glyph::Blank)
    }
}

impl Default for DigitBuffer {
    fn default() -> Self {
        decompose(0)
    }
}

/// Splits `value` into decimal digits, least significant first.
///
/// Digits 0..=2 are always present (so `0.00` shows), higher positions past the
/// most significant digit are blank. Digits beyond the tenth are dropped.
pub fn decompose(value: u64) -> DigitBuffer {
    let mut symbols = [Glyph::Blank; MAX_DIGITS];
    let mut rest = value;
    let mut significant = 0;

    for (index, symbol) in symbols.iter_mut().enumerate() {
        if rest > 0 {
            *symbol = Glyph::Digit((rest % 10) as u8);
            rest /= 10;
            significant = index;
        } else if index <= 2 {
            *symbol = Glyph::Digit(0);
            significant = index;
        }
    }

    DigitBuffer {
        symbols,
        scroll_max: (significant as i16 - 2).max(1),
    }
}

/// One lit digit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    pub glyph: Glyph,
    pub dot: bool,
}

impl Cell {
    pub const BLANK: Self = Cell {
        glyph: Glyph::Blank,
        dot: false,
    };

    pub fn segments(&self) -> u8 {
        self.glyph.segments() | if self.dot { DOT_SEGMENT } else { 0 }
    }
}

/// What the four positions show for one refresh. Index 0 is position d1,
/// the least significant visible digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub cells: [Cell; POSITIONS],
}

impl Frame {
    pub const BLANK: Self = Frame {
        cells: [Cell::BLANK; POSITIONS],
    };

    /// Glyphs from position d1 to d4.
    pub fn glyphs(&self) -> [Glyph; POSITIONS] {
        self.cells.map(|cell| cell.glyph)
    }

    /// Position of the lit decimal point, if any.
    pub fn dot_position(&self) -> Option<usize> {
        self.cells.iter().position(|cell| cell.dot)
    }
}

/// Decides what the display shows each loop tick.
#[derive(Debug, Clone)]
pub struct DisplayEngine {
    buffer: DigitBuffer,
    scroll_position: i16,
    scroll_interval: u16,
}

impl DisplayEngine {
    pub fn new(scroll_interval: u16) -> Self {
        Self {
            buffer: DigitBuffer::default(),
            scroll_position: 0,
            scroll_interval,
        }
    }

    #[inline]
    pub fn buffer(&self) -> &DigitBuffer {
        &self.buffer
    }

    #[inline]
    pub fn scroll_position(&self) -> i16 {
        self.scroll_position
    }

    /// Replaces the buffer with `value` (hundredths).
    pub fn show_value(&mut self, value: u64) {
        self.buffer = decompose(value);
    }

    /// Shows a new step size from the start of its scroll range.
    pub fn show_step(&mut self, step: Step) {
        self.buffer = decompose(u64::from(step.value()));
        self.scroll_position = 0;
    }

    /// Shows the label for `unit` and forces an immediate scroll update.
    pub fn show_unit_label(&mut self, unit: DisplayUnit, cooldowns: &mut Cooldowns) {
        self.buffer = DigitBuffer::unit_label(unit);
        cooldowns.scroll.clear();
    }

    /// Runs one render tick and returns the frame to multiplex.
    ///
    /// Outside a transient display the buffer tracks the displayed frequency.
    /// The scroll window advances when the scroll cooldown has run out.
    pub fn render(&mut self, rate: &RateModel, cooldowns: &mut Cooldowns) -> Frame {
        if cooldowns.transient.is_ready() {
            self.show_value(rate.displayed_value());
        }

        if cooldowns.scroll.is_ready() {
            self.scroll_position = (self.scroll_position + 1).rem_euclid(self.buffer.scroll_max);
            cooldowns.scroll.arm(self.scroll_interval);
        }

        self.skip_zero_fraction();
        self.frame()
    }

    /// Frame for the current buffer and scroll position.
    pub fn frame(&self) -> Frame {
        let offset = self.buffer.scroll_max - 1 - self.scroll_position;
        let mut frame = Frame::BLANK;

        for (position, cell) in frame.cells.iter_mut().enumerate() {
            let position = position as i16;
            *cell = Cell {
                glyph: self.buffer.symbol(position + offset),
                dot: position == 2 - offset,
            };
        }
        frame
    }

    // Pins the window so a .00 or .x0 fraction is not scrolled through.
    fn skip_zero_fraction(&mut self) {
        let symbols = self.buffer.symbols();
        if symbols[1].is_zero() && symbols[0].is_zero() {
            self.scroll_position = self.buffer.scroll_max - 3;
        } else if symbols[0].is_zero() {
            self.scroll_position = self.buffer.scroll_max - 2;
        }
    }
}

/// Segment pins a-g and the decimal point.
pub struct SegmentPins<P> {
    pub a: P,
    pub b: P,
    pub c: P,
    pub d: P,
    pub e: P,
    pub f: P,
    pub g: P,
    pub dp: P,
}

impl<P> SegmentPins<P> {
    /// Pins in segment-pattern bit order, most significant bit first.
    pub fn as_mut_array(&mut self) -> [&mut P; 8] {
        [
            &mut self.a,
            &mut self.b,
            &mut self.c,
            &mut self.d,
            &mut self.e,
            &mut self.f,
            &mut self.g,
            &mut self.dp,
        ]
    }
}

/// Digit enable pins, d1 (least significant visible digit) to d4.
pub struct DigitPins<P> {
    pub d1: P,
    pub d2: P,
    pub d3: P,
    pub d4: P,
}

impl<P> DigitPins<P> {
    pub fn as_mut_array(&mut self) -> [&mut P; POSITIONS] {
        [&mut self.d1, &mut self.d2, &mut self.d3, &mut self.d4]
    }
}

/// Drives a four-digit multiplexed seven-segment display.
///
/// Lights one position at a time for `hold_us` with all positions switched
/// off between digits (break before make), then leaves all positions off.
pub struct Multiplexer<P: OutputPin, D: DelayNs> {
    segments: SegmentPins<P>,
    digits: DigitPins<P>,
    delay: D,
    hold_us: u32,
    common_anode: bool,
}

impl<P: OutputPin, D: DelayNs> Multiplexer<P, D> {
    /// Creates a multiplexer with every position switched off.
    ///
    /// # Arguments
    /// * `common_anode` - true for common anode displays (segments lit low,
    ///   digits enabled high), false for common cathode
    pub fn new(
        segments: SegmentPins<P>,
        digits: DigitPins<P>,
        delay: D,
        hold_us: u32,
        common_anode: bool,
    ) -> Result<Self, P::Error> {
        let mut multiplexer = Self {
            segments,
            digits,
            delay,
            hold_us,
            common_anode,
        };
        multiplexer.disable_all()?;
        Ok(multiplexer)
    }

    /// Multiplexes one frame.
    pub fn show(&mut self, frame: &Frame) -> Result<(), P::Error> {
        for (position, cell) in frame.cells.iter().enumerate() {
            self.disable_all()?;
            self.write_segments(cell.segments())?;
            self.enable(position)?;
            self.delay.delay_us(self.hold_us);
        }
        self.disable_all()
    }

    /// Switches off every position.
    pub fn disable_all(&mut self) -> Result<(), P::Error> {
        let enabled_level = self.common_anode;
        for pin in self.digits.as_mut_array() {
            drive(pin, !enabled_level)?;
        }
        Ok(())
    }

    pub fn release(self) -> (SegmentPins<P>, DigitPins<P>, D) {
        (self.segments, self.digits, self.delay)
    }

    fn enable(&mut self, position: usize) -> Result<(), P::Error> {
        let enabled_level = self.common_anode;
        match self.digits.as_mut_array().into_iter().nth(position) {
            Some(pin) => drive(pin, enabled_level),
            None => Ok(()),
        }
    }

    fn write_segments(&mut self, pattern: u8) -> Result<(), P::Error> {
        let lit_level = !self.common_anode;
        for (bit, pin) in self.segments.as_mut_array().into_iter().enumerate() {
            let lit = pattern & (0b1000_0000 >> bit) != 0;
            drive(pin, lit == lit_level)?;
        }
        Ok(())
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high { pin.set_high() } else { pin.set_low() }
}
