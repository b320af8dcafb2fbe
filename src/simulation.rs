use std::iter::FusedIterator;

use crate::Result;

/// One explicit time step of a fixed scheme.
///
/// Implementations hold only their coefficients; every call reads an
/// immutable snapshot and returns a new one.
pub trait Stepper {
    type Field: Clone;

    /// Rejects a field this stepper cannot advance.
    fn check(&self, field: &Self::Field) -> Result<()>;

    /// Advances a field that has passed [`Stepper::check`].
    fn advance(&self, field: &Self::Field) -> Self::Field;

    fn step(&self, field: &Self::Field) -> Result<Self::Field> {
        self.check(field)?;
        Ok(self.advance(field))
    }
}

/// Applies a stepper `steps` times to an initial field.
#[derive(Debug, Clone)]
pub struct Simulation<S> {
    stepper: S,
    steps: usize,
}

impl<S: Stepper> Simulation<S> {
    pub fn new(stepper: S, steps: usize) -> Self {
        Self { stepper, steps }
    }

    pub fn stepper(&self) -> &S {
        &self.stepper
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Lazily yields `[u_0, u_1, ..., u_T]`, computing each snapshot when the
    /// previous one is handed out.
    pub fn snapshots(&self, initial: S::Field) -> Result<Snapshots<'_, S>> {
        self.stepper.check(&initial)?;
        tracing::debug!(steps = self.steps, "starting simulation");
        Ok(Snapshots {
            stepper: &self.stepper,
            current: Some(initial),
            index: 0,
            steps: self.steps,
        })
    }

    /// Runs to completion and keeps the whole history.
    pub fn run(&self, initial: S::Field) -> Result<Vec<S::Field>> {
        let history: Vec<_> = self.snapshots(initial)?.collect();
        tracing::debug!(snapshots = history.len(), "simulation finished");
        Ok(history)
    }
}

/// Iterator returned by [`Simulation::snapshots`].
pub struct Snapshots<'a, S: Stepper> {
    stepper: &'a S,
    current: Option<S::Field>,
    index: usize,
    steps: usize,
}

impl<'a, S: Stepper> Iterator for Snapshots<'a, S> {
    type Item = S::Field;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        if self.index < self.steps {
            tracing::trace!(step = self.index + 1, "advancing");
            self.current = Some(self.stepper.advance(&current));
        }
        self.index += 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.current.is_some() {
            self.steps + 1 - self.index
        } else {
            0
        };
        (remaining, Some(remaining))
    }
}

impl<'a, S: Stepper> ExactSizeIterator for Snapshots<'a, S> {}

impl<'a, S: Stepper> FusedIterator for Snapshots<'a, S> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::FdError;

    /// Adds one to every element; rejects empty input.
    struct Increment;

    impl Stepper for Increment {
        type Field = Vec<i32>;

        fn check(&self, field: &Vec<i32>) -> Result<()> {
            if field.is_empty() {
                return Err(FdError::InvalidGrid {
                    axis: crate::Axis::X,
                    len: 0,
                });
            }
            Ok(())
        }

        fn advance(&self, field: &Vec<i32>) -> Vec<i32> {
            field.iter().map(|v| v + 1).collect()
        }
    }

    #[test]
    fn test_yields_initial_and_every_step() {
        let sim = Simulation::new(Increment, 3);
        let history = sim.run(vec![0, 10]).unwrap();

        assert_eq!(
            history,
            vec![vec![0, 10], vec![1, 11], vec![2, 12], vec![3, 13]]
        );
    }

    #[test]
    fn test_zero_steps() {
        let sim = Simulation::new(Increment, 0);
        assert_eq!(sim.run(vec![7]).unwrap(), vec![vec![7]]);
    }

    #[test]
    fn test_exact_size() {
        let sim = Simulation::new(Increment, 5);
        let mut snapshots = sim.snapshots(vec![0]).unwrap();

        assert_eq!(snapshots.len(), 6);
        snapshots.next();
        snapshots.next();
        assert_eq!(snapshots.len(), 4);
        assert_eq!(snapshots.by_ref().count(), 4);
        assert_eq!(snapshots.len(), 0);
        assert!(snapshots.next().is_none());
    }

    #[test]
    fn test_rejects_before_first_snapshot() {
        let sim = Simulation::new(Increment, 2);
        assert!(sim.snapshots(Vec::new()).is_err());
        assert!(sim.run(Vec::new()).is_err());
    }
}
