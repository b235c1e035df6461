/// Nesting allowed by [`Limits::default`]. Well clear of any realistic
/// document, low enough that the recursive parser stays inside a 2 MiB stack.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 512;

/// Resource bounds applied while tokenizing and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum input length, in characters.
    pub max_input_chars: usize,
    /// Maximum number of nested objects and arrays, the top level included.
    pub max_nesting_depth: usize,
}

impl Limits {
    pub const fn lenient() -> Self {
        Self {
            max_input_chars: 16 * 1024 * 1024,
            max_nesting_depth: 128,
        }
    }

    pub const fn strict() -> Self {
        Self {
            max_input_chars: 1024 * 1024,
            max_nesting_depth: 32,
        }
    }

    /// No bounds at all. Nesting deep enough to exhaust the stack then aborts
    /// the process instead of returning an error.
    pub const fn unbounded() -> Self {
        Self {
            max_input_chars: usize::MAX,
            max_nesting_depth: usize::MAX,
        }
    }
}

/// Any input length, and nesting up to [`DEFAULT_MAX_NESTING_DEPTH`].
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_chars: usize::MAX,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_only_guards_the_stack() {
        let limits = Limits::default();
        assert_eq!(limits.max_input_chars, usize::MAX);
        assert!(limits.max_nesting_depth > Limits::lenient().max_nesting_depth);
    }

    #[test]
    fn strict_is_tighter() {
        let strict = Limits::strict();
        let lenient = Limits::lenient();
        assert!(strict.max_input_chars < lenient.max_input_chars);
        assert!(strict.max_nesting_depth < lenient.max_nesting_depth);
    }
}
