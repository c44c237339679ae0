//! TerminalRenderer: writes game frames to a terminal.
//!
//! The renderer keeps the last frame it wrote. A frame with no predecessor
//! (or of a different size) is painted in full. Otherwise unchanged rows are
//! skipped outright and only the changed spans of the other rows are
//! printed. Small unchanged gaps inside a row are reprinted instead of
//! jumping over them, which is shorter than a cursor move.
//!
//! Style changes go through a `Pen` that remembers what is already in
//! effect, so a run of same-styled cells (a whole stage row, a panel label)
//! costs one color change.

use std::io::{self, Write};
use std::mem;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Unchanged cells between two changes that are reprinted rather than skipped
const MERGE_GAP: usize = 3;

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    keyboard_enhanced: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            keyboard_enhanced: false,
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    ///
    /// Where the terminal supports it, key release events and bare modifier
    /// presses are switched on too: the soft drop ends on release and Shift
    /// holds a piece.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);

        self.buf.clear();
        encode_enter_into(&mut self.buf, self.keyboard_enhanced)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        encode_exit_into(&mut self.buf, self.keyboard_enhanced)?;
        self.keyboard_enhanced = false;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Whether the terminal reports key releases and modifier keys
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Repaint everything on the next draw (after a resize, say)
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Write `fb` and keep it as the reference for the next frame.
    ///
    /// The previous frame is swapped into `fb`, so a caller that renders into
    /// the same buffer every frame never clones one.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut reference = match self.last.take() {
            Some(prev) => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            None => {
                encode_full_into(fb, &mut self.buf)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush_buf()?;

        mem::swap(&mut reference, fb);
        self.last = Some(reference);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

fn encode_enter_into(out: &mut Vec<u8>, keyboard_enhanced: bool) -> Result<()> {
    out.queue(terminal::EnterAlternateScreen)?;
    if keyboard_enhanced {
        out.queue(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES,
        ))?;
    }
    out.queue(cursor::Hide)?;
    out.queue(terminal::DisableLineWrap)?;
    Ok(())
}

fn encode_exit_into(out: &mut Vec<u8>, keyboard_enhanced: bool) -> Result<()> {
    if keyboard_enhanced {
        out.queue(PopKeyboardEnhancementFlags)?;
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(terminal::EnableLineWrap)?;
    out.queue(cursor::Show)?;
    out.queue(terminal::LeaveAlternateScreen)?;
    Ok(())
}

/// Encode a full repaint of `fb` into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::default();
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        print_cells(out, &mut pen, fb.row(y))?;
    }
    finish(out)
}

/// Encode the changes from `prev` to `next` into `out`.
///
/// Writes nothing when the frames are equal. Falls back to a full repaint
/// when the sizes differ.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, out);
    }

    let mut pen = Pen::default();
    let mut wrote = false;
    for y in 0..next.height() {
        let (old, new) = (prev.row(y), next.row(y));
        if old == new {
            continue;
        }
        for (start, end) in changed_spans(old, new) {
            out.queue(cursor::MoveTo(start as u16, y))?;
            print_cells(out, &mut pen, &new[start..end])?;
            wrote = true;
        }
    }

    if wrote {
        finish(out)?;
    }
    Ok(())
}

fn print_cells(out: &mut Vec<u8>, pen: &mut Pen, cells: &[Cell]) -> Result<()> {
    for cell in cells {
        pen.set(out, cell.style)?;
        out.queue(Print(cell.ch))?;
    }
    Ok(())
}

fn finish(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Tracks the style already in effect on the terminal
#[derive(Debug, Default)]
struct Pen {
    current: Option<CellStyle>,
}

impl Pen {
    fn set(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        let (fresh, prev) = match self.current.replace(style) {
            Some(prev) if prev == style => return Ok(()),
            Some(prev) => (false, prev),
            None => (true, style),
        };

        // SGR 22 drops bold and dim together; colors are kept.
        let normal = fresh || (prev.bold && !style.bold) || (prev.dim && !style.dim);
        if normal {
            out.queue(SetAttribute(Attribute::NormalIntensity))?;
        }
        if fresh || prev.fg != style.fg {
            out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
        }
        if fresh || prev.bg != style.bg {
            out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
        }
        if style.bold && (normal || !prev.bold) {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim && (normal || !prev.dim) {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Half-open `[start, end)` spans where two equally long rows differ
fn changed_spans<'a>(old: &'a [Cell], new: &'a [Cell]) -> ChangedSpans<'a> {
    ChangedSpans { old, new, x: 0 }
}

struct ChangedSpans<'a> {
    old: &'a [Cell],
    new: &'a [Cell],
    x: usize,
}

impl Iterator for ChangedSpans<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.new.len().min(self.old.len());
        let start = (self.x..n).find(|&i| self.old[i] != self.new[i])?;

        let mut end = start + 1;
        let mut gap = 0;
        let mut i = end;
        while i < n && gap <= MERGE_GAP {
            if self.old[i] != self.new[i] {
                end = i + 1;
                gap = 0;
            } else {
                gap += 1;
            }
            i += 1;
        }

        self.x = end;
        Some((start, end))
    }
}
