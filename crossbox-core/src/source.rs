//! Input source trait and aggregation.

use crate::inputs::Inputs;

/// A source of raw input snapshots.
///
/// `poll` must be non-blocking with bounded execution time and callable
/// at an arbitrary rate; its only side effect is reading physical state
/// (plus any debounce bookkeeping the implementation keeps internally).
pub trait InputSource {
    /// Produce the current raw input snapshot.
    fn poll(&mut self) -> Inputs;
}

/// Two input sources merged into one.
///
/// Conflict policy: bitwise OR union. A control reads pressed if either
/// source reports it pressed; a later source can add presses but never
/// remove them. This is deterministic and fixed at construction time.
pub struct Aggregate<A, B> {
    primary: A,
    secondary: B,
}

impl<A: InputSource, B: InputSource> Aggregate<A, B> {
    #[must_use]
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

impl<A: InputSource, B: InputSource> InputSource for Aggregate<A, B> {
    fn poll(&mut self) -> Inputs {
        self.primary.poll() | self.secondary.poll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Inputs);

    impl InputSource for Fixed {
        fn poll(&mut self) -> Inputs {
            self.0
        }
    }

    #[test]
    fn aggregate_is_a_union() {
        let mut agg = Aggregate::new(Fixed(Inputs::A | Inputs::LEFT), Fixed(Inputs::B));
        assert_eq!(agg.poll(), Inputs::A | Inputs::B | Inputs::LEFT);
    }

    #[test]
    fn aggregate_never_unpresses() {
        let mut agg = Aggregate::new(Fixed(Inputs::A), Fixed(Inputs::NONE));
        assert_eq!(agg.poll(), Inputs::A);
    }
}
