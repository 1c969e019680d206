use std::cell::Cell;
use std::fmt;

/// How much a component reports about recoverable misuse.
///
/// `Verbose` logs every warning and the step-by-step debug trace of shader
/// loading; `Quiet` skips both. Hard errors (a shader that fails to compile,
/// a file that cannot be read) are logged at `error` level in either mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DiagnosticLevel {
    Verbose,
    Quiet,
}

impl DiagnosticLevel {
    /// `Verbose` for debug builds, `Quiet` for optimized builds.
    pub const fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Verbose
        } else {
            Self::Quiet
        }
    }

    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

impl Default for DiagnosticLevel {
    fn default() -> Self {
        Self::for_build()
    }
}

/// Per-object diagnostic sink.
///
/// Counts the warnings it actually emitted so callers and tests can tell
/// the two levels apart without capturing log output.
#[derive(Debug)]
pub struct Diagnostics {
    level: DiagnosticLevel,
    emitted: Cell<u32>,
}

impl Diagnostics {
    pub fn new(level: DiagnosticLevel) -> Self {
        Self {
            level,
            emitted: Cell::new(0),
        }
    }

    #[inline]
    pub fn level(&self) -> DiagnosticLevel {
        self.level
    }

    /// Emits a warning in verbose mode; does nothing in quiet mode.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        if self.level.is_verbose() {
            log::warn!("{args}");
            self.emitted.set(self.emitted.get().saturating_add(1));
        }
    }

    /// Emits a warning regardless of level.
    pub fn warn_always(&self, args: fmt::Arguments<'_>) {
        log::warn!("{args}");
        self.emitted.set(self.emitted.get().saturating_add(1));
    }

    /// Debug trace, verbose mode only.
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        if self.level.is_verbose() {
            log::debug!("{args}");
        }
    }

    /// Number of warnings emitted so far.
    #[inline]
    pub fn emitted(&self) -> u32 {
        self.emitted.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_counts_warnings() {
        let d = Diagnostics::new(DiagnosticLevel::Verbose);
        d.warn(format_args!("first"));
        d.warn(format_args!("second"));
        assert_eq!(d.emitted(), 2);
    }

    #[test]
    fn quiet_swallows_warnings() {
        let d = Diagnostics::new(DiagnosticLevel::Quiet);
        d.warn(format_args!("ignored"));
        assert_eq!(d.emitted(), 0);
    }

    #[test]
    fn warn_always_ignores_level() {
        let d = Diagnostics::new(DiagnosticLevel::Quiet);
        d.warn_always(format_args!("inert"));
        assert_eq!(d.emitted(), 1);
    }

    #[test]
    fn build_default_matches_profile() {
        assert_eq!(DiagnosticLevel::default().is_verbose(), cfg!(debug_assertions));
    }
}
