//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Each frame is compared with the one drawn before it and only the spans of
//! glyphs that differ are rewritten. A size change or [`TerminalRenderer::invalidate`]
//! falls back to repainting the whole screen.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Glyph, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    previous: Option<FrameBuffer>,
    out: Vec<u8>,
    mouse: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            previous: None,
            out: Vec::with_capacity(16 * 1024),
            mouse: false,
        }
    }

    /// Also capture mouse presses and releases while the alternate screen is active.
    pub fn with_mouse(mut self, mouse: bool) -> Self {
        self.mouse = mouse;
        self
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.out.clear();
        self.out
            .queue(terminal::EnterAlternateScreen)?
            .queue(terminal::DisableLineWrap)?
            .queue(cursor::Hide)?;
        if self.mouse {
            self.out.queue(EnableMouseCapture)?;
        }
        self.flush()?;
        log::debug!("terminal entered (mouse: {})", self.mouse);
        Ok(())
    }

    /// Undo [`enter`](Self::enter). Safe to call after a failed frame.
    pub fn exit(&mut self) -> Result<()> {
        self.out.clear();
        if self.mouse {
            self.out.queue(DisableMouseCapture)?;
        }
        queue_reset(&mut self.out)?;
        self.out
            .queue(cursor::Show)?
            .queue(terminal::EnableLineWrap)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Repaint everything on the next frame.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Write `fb` to the terminal and keep it as the base for the next diff.
    ///
    /// On return `fb` holds the frame drawn before this one, so the caller can
    /// render the next frame into it without allocating.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.out.clear();
        let mut spare = match self.previous.take() {
            Some(previous) if same_size(&previous, fb) => {
                encode_changes(&previous, fb, &mut self.out)?;
                previous
            }
            Some(mut stale) => {
                encode_frame(fb, &mut self.out)?;
                stale.resize(fb.width(), fb.height());
                stale
            }
            None => {
                encode_frame(fb, &mut self.out)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush()?;

        std::mem::swap(&mut spare, fb);
        self.previous = Some(spare);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.write_all(&self.out)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Clear the screen and write every glyph of `fb` into `out`.
pub fn encode_frame(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?
        .queue(cursor::MoveTo(0, 0))?;

    let mut writer = GlyphWriter::new(out);
    for y in 0..fb.height() {
        if y > 0 {
            writer.out.queue(Print("\r\n"))?;
        }
        for x in 0..fb.width() {
            writer.put(fb.get(x, y).unwrap_or_default())?;
        }
    }
    queue_reset(out)
}

/// Write only the spans where `next` differs from `previous` into `out`.
pub fn encode_changes(previous: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut writer = GlyphWriter::new(out);
    for span in changed_spans(previous, next) {
        writer.out.queue(cursor::MoveTo(span.x, span.y))?;
        for x in span.x..span.x + span.len {
            writer.put(next.get(x, span.y).unwrap_or_default())?;
        }
    }
    queue_reset(out)
}

/// Horizontal run of changed glyphs on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    x: u16,
    y: u16,
    len: u16,
}

fn changed_spans(previous: &FrameBuffer, next: &FrameBuffer) -> Vec<Span> {
    let (w, h) = (next.width(), next.height());
    if !same_size(previous, next) {
        return (0..h).map(|y| Span { x: 0, y, len: w }).collect();
    }

    let mut spans = Vec::new();
    for y in 0..h {
        let differs = |x: u16| previous.get(x, y) != next.get(x, y);
        let mut x = 0;
        while x < w {
            if !differs(x) {
                x += 1;
                continue;
            }
            let start = x;
            while x < w && differs(x) {
                x += 1;
            }
            spans.push(Span { x: start, y, len: x - start });
        }
    }
    spans
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Prints glyphs, emitting style changes only when the style differs from
/// the last one written.
struct GlyphWriter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> GlyphWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn put(&mut self, glyph: Glyph) -> Result<()> {
        if self.style != Some(glyph.style) {
            queue_style(self.out, glyph.style)?;
            self.style = Some(glyph.style);
        }
        self.out.queue(Print(glyph.ch))?;
        Ok(())
    }
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?
        .queue(SetForegroundColor(terminal_color(style.fg)))?
        .queue(SetBackgroundColor(terminal_color(style.bg)))?;
    let attributes = [
        (style.bold, Attribute::Bold),
        (style.dim, Attribute::Dim),
        (style.reverse, Attribute::Reverse),
    ];
    for (_, attribute) in attributes.into_iter().filter(|(on, _)| *on) {
        out.queue(SetAttribute(attribute))?;
    }
    Ok(())
}

fn queue_reset(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn terminal_color(Rgb { r, g, b }: Rgb) -> Color {
    Color::Rgb { r, g, b }
}
