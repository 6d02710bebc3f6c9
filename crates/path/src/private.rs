//! Debug-only helpers shared by the path builders and consumers.

/// Checks that begin/end are properly alternated (debug builds only).
#[derive(Copy, Clone, Debug, Default)]
pub struct DebugValidator {
    #[cfg(debug_assertions)]
    in_subpath: bool,
}

impl DebugValidator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn begin(&mut self) {
        #[cfg(debug_assertions)]
        {
            assert!(!self.in_subpath, "begin while a subpath is in progress");
            self.in_subpath = true;
        }
    }

    #[inline(always)]
    pub fn end(&mut self) {
        #[cfg(debug_assertions)]
        {
            assert!(self.in_subpath, "end without a matching begin");
            self.in_subpath = false;
        }
    }

    #[inline(always)]
    pub fn edge(&self) {
        #[cfg(debug_assertions)]
        {
            assert!(self.in_subpath, "edge outside of a begin/end pair");
        }
    }

    #[inline(always)]
    pub fn build(&self) {
        #[cfg(debug_assertions)]
        {
            assert!(!self.in_subpath, "build while a subpath is in progress");
        }
    }
}
