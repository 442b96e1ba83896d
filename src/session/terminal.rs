// ABOUTME: Local terminal control for interactive sessions.
// ABOUTME: Raw mode acquisition/release guard and size query with a fallback.

use std::io;

/// Size used when the local terminal cannot report its own.
pub const DEFAULT_TERMINAL_SIZE: (u32, u32) = (80, 24);

/// The local terminal as the interactive driver sees it.
pub trait LocalTerminal: Send + Sync {
    /// Current size as (columns, rows).
    fn size(&self) -> io::Result<(u32, u32)>;

    /// Snapshot the current mode and switch to raw mode.
    fn enable_raw_mode(&self) -> io::Result<()>;

    /// Restore the snapshot taken by `enable_raw_mode`.
    fn restore_mode(&self) -> io::Result<()>;
}

/// The process's controlling terminal, driven through crossterm.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTerminal;

impl LocalTerminal for ConsoleTerminal {
    fn size(&self) -> io::Result<(u32, u32)> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok((u32::from(cols), u32::from(rows)))
    }

    fn enable_raw_mode(&self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn restore_mode(&self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

/// Query the terminal size, falling back to 80x24.
///
/// Returns whether the fallback was used alongside the size.
pub fn size_or_default<T: LocalTerminal + ?Sized>(terminal: &T) -> ((u32, u32), bool) {
    match terminal.size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => ((cols, rows), false),
        Ok(_) => (DEFAULT_TERMINAL_SIZE, true),
        Err(e) => {
            tracing::debug!("terminal size unavailable: {}", e);
            (DEFAULT_TERMINAL_SIZE, true)
        }
    }
}

/// Holds the terminal in raw mode; restores it exactly once on drop.
pub struct RawModeGuard<'a, T: LocalTerminal + ?Sized> {
    terminal: &'a T,
}

impl<'a, T: LocalTerminal + ?Sized> RawModeGuard<'a, T> {
    pub fn enter(terminal: &'a T) -> io::Result<Self> {
        terminal.enable_raw_mode()?;
        tracing::debug!("entered raw terminal mode");
        Ok(Self { terminal })
    }
}

impl<T: LocalTerminal + ?Sized> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        // Restore failures must not replace whatever error is unwinding.
        match self.terminal.restore_mode() {
            Ok(()) => tracing::debug!("restored terminal mode"),
            Err(e) => tracing::warn!("failed to restore terminal mode: {}", e),
        }
    }
}
