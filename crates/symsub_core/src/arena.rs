//! Arena allocation for syntax trees.
//!
//! Every tree produced by the parser, and every tree rebuilt by a rewrite
//! pass, lives in a bump arena owned by a single analysis call. Dropping the
//! arena frees the whole tree at once.

use bumpalo::Bump;

/// Bump allocator owned by one analysis call.
pub struct AnalysisArena {
    bump: Bump,
}

impl AnalysisArena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Create an arena sized for a source text of `source_len` bytes.
    ///
    /// Trees are roughly an order of magnitude larger than their text.
    pub fn for_source(source_len: usize) -> Self {
        Self {
            bump: Bump::with_capacity(source_len.saturating_mul(16)),
        }
    }

    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    /// Returns the total bytes allocated in this arena.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for AnalysisArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Move the elements of a `Vec` into the arena and return them as a slice.
pub fn alloc_vec_in<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    if vec.is_empty() {
        return &[];
    }
    arena.alloc_slice_fill_iter(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_vec_in_moves_elements() {
        let arena = AnalysisArena::new();
        let names = vec![String::from("a"), String::from("b")];
        let slice = alloc_vec_in(arena.bump(), names);
        assert_eq!(slice, &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_alloc_vec_in_empty() {
        let arena = AnalysisArena::new();
        let slice: &[u32] = alloc_vec_in(arena.bump(), Vec::new());
        assert!(slice.is_empty());
    }
}
