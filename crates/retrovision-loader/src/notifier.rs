//! One-shot completion callback.

/// Holds the callback run when the sequence reaches `Complete`.
///
/// The callback is an `FnOnce` taken out of an `Option`, so it can run at
/// most once no matter how often [`fire`](Self::fire) is called.
pub struct CompletionNotifier {
    callback: Option<Box<dyn FnOnce()>>,
    fired: bool,
}

impl CompletionNotifier {
    pub fn new(callback: impl FnOnce() + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
            fired: false,
        }
    }

    /// Run the callback if it is still armed. Returns `true` only on the
    /// call that actually ran it.
    pub fn fire(&mut self) -> bool {
        match self.callback.take() {
            Some(callback) => {
                self.fired = true;
                callback();
                true
            }
            None => false,
        }
    }

    /// Drop the callback without running it.
    pub fn disarm(&mut self) {
        self.callback = None;
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn is_armed(&self) -> bool {
        self.callback.is_some()
    }
}

impl std::fmt::Debug for CompletionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionNotifier")
            .field("armed", &self.is_armed())
            .field("fired", &self.fired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn fires_exactly_once() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut n = CompletionNotifier::new(move || c.set(c.get() + 1));
        assert!(n.is_armed());
        assert!(n.fire());
        assert!(!n.fire());
        assert!(!n.fire());
        assert_eq!(count.get(), 1);
        assert!(n.has_fired());
        assert!(!n.is_armed());
    }

    #[test]
    fn disarm_prevents_fire() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut n = CompletionNotifier::new(move || c.set(c.get() + 1));
        n.disarm();
        assert!(!n.fire());
        assert_eq!(count.get(), 0);
        assert!(!n.has_fired());
    }

    #[test]
    fn debug_shows_state() {
        let n = CompletionNotifier::new(|| {});
        let dbg = format!("{n:?}");
        assert!(dbg.contains("armed: true"));
    }
}
