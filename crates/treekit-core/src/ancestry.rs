//! Chain of containers currently being visited by a recursive walk.
//!
//! Only ancestors are on the chain: a frame is pushed when the walk enters a
//! container and popped when it leaves, so shared siblings in an acyclic tree
//! are never mistaken for back-references.

pub(crate) struct Ancestry<K, T> {
    frames: Vec<(K, T)>,
}

impl<K: PartialEq, T> Ancestry<K, T> {
    pub(crate) fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Innermost frame entered with `key`.
    pub(crate) fn find(&self, key: &K) -> Option<&T> {
        self.frames
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, data)| data)
    }

    pub(crate) fn any(&self, pred: impl Fn(&K, &T) -> bool) -> bool {
        self.frames.iter().any(|(k, data)| pred(k, data))
    }

    pub(crate) fn push(&mut self, key: K, data: T) {
        self.frames.push((key, data));
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_returns_innermost_frame() {
        let mut chain: Ancestry<usize, &str> = Ancestry::new();
        chain.push(1, "outer");
        chain.push(2, "middle");
        chain.push(1, "inner");

        assert_eq!(chain.find(&1), Some(&"inner"));
        chain.pop();
        assert_eq!(chain.find(&1), Some(&"outer"));
        assert!(chain.find(&3).is_none());
    }

    #[test]
    fn test_any_sees_every_frame() {
        let mut chain: Ancestry<(usize, usize), ()> = Ancestry::new();
        chain.push((1, 2), ());
        chain.push((3, 4), ());

        assert!(chain.any(|pair, _| *pair == (1, 2)));
        assert!(!chain.any(|pair, _| *pair == (2, 1)));
    }
}
