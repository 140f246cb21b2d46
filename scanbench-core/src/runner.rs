//! BenchmarkRunner - Cross-Checked Strategy Execution
//!
//! Runs several equivalent strategies side by side for a fixed number of
//! iterations. Each strategy owns a [`Stopwatch`]; after every iteration the
//! results are compared pairwise and the first disagreement aborts the run.
//!
//! ```text
//! for iteration in 1..=N:
//!     input  = prepare()          (optional, timed by its own stopwatch)
//!     r[k]   = strategy[k](&input) (declaration order, each timed)
//!     check  r[i] ~ r[j] for all i < j
//! ```

use crate::error::{BenchError, BoxError};
use crate::stopwatch::Stopwatch;
use fxhash::FxHashSet;
use std::fmt;
use tracing::{debug, trace};

type PrepareFn<'a, I> = Box<dyn FnMut() -> Result<I, BoxError> + 'a>;
type StrategyFn<'a, I, T> = Box<dyn FnMut(&I) -> T + 'a>;
type EquivalenceFn<'a, T> = Box<dyn Fn(&T, &T) -> bool + 'a>;
type ObserverFn<'a> = Box<dyn FnMut(usize) + 'a>;

/// Produces the per-iteration input shared by all strategies
struct InputStage<'a, I> {
    /// `None` for runners without a timed prepare stage
    stopwatch: Option<Stopwatch>,
    op: PrepareFn<'a, I>,
}

impl<I> InputStage<'_, I> {
    fn run(&mut self) -> Result<I, BoxError> {
        let op = &mut self.op;
        match self.stopwatch.as_mut() {
            Some(stopwatch) => stopwatch.lap(op),
            None => op(),
        }
    }

    fn label(&self) -> &str {
        self.stopwatch.as_ref().map_or("input", Stopwatch::label)
    }
}

/// A named alternative implementation of the operation under test
struct Strategy<'a, I, T> {
    stopwatch: Stopwatch,
    op: StrategyFn<'a, I, T>,
}

/// Stopwatches and agreed result of a completed run
#[derive(Debug, Clone)]
pub struct Measurements<T> {
    /// Benchmark name
    pub benchmark: String,
    /// Iterations completed
    pub iterations: usize,
    /// Stopwatch of the prepare stage, if the runner had one
    pub prepare: Option<Stopwatch>,
    /// One stopwatch per strategy, in declaration order
    pub stopwatches: Vec<Stopwatch>,
    /// Result all strategies agreed on in the final iteration
    pub consensus: T,
}

impl<T> Measurements<T> {
    /// Look up a stopwatch (prepare stage included) by label
    pub fn get(&self, label: &str) -> Option<&Stopwatch> {
        self.iter().find(|sw| sw.label() == label)
    }

    /// All stopwatches in execution order, prepare stage first
    pub fn iter(&self) -> impl Iterator<Item = &Stopwatch> {
        self.prepare.iter().chain(self.stopwatches.iter())
    }
}

/// Runs equivalent strategies for N iterations and fails fast on disagreement.
///
/// Strategies run in declaration order; iterations run strictly one after
/// another. A runner is consumed by [`execute`](Self::execute).
pub struct BenchmarkRunner<'a, I, T> {
    name: String,
    iterations: usize,
    input: InputStage<'a, I>,
    strategies: Vec<Strategy<'a, I, T>>,
    equivalent: EquivalenceFn<'a, T>,
    observer: Option<ObserverFn<'a>>,
}

impl<'a, T> BenchmarkRunner<'a, (), T>
where
    T: PartialEq + 'a,
{
    /// Runner for zero-argument strategies
    pub fn new(name: impl Into<String>, iterations: usize) -> Self {
        Self::from_stage(
            name.into(),
            iterations,
            InputStage {
                stopwatch: None,
                op: Box::new(|| Ok::<(), BoxError>(())),
            },
        )
    }
}

impl<'a, T> BenchmarkRunner<'a, (), T>
where
    T: 'a,
{
    /// Add a zero-argument strategy
    pub fn strategy<F>(self, label: impl Into<String>, mut op: F) -> Self
    where
        F: FnMut() -> T + 'a,
    {
        self.strategy_with_input(label, move |_: &()| op())
    }
}

impl<'a, I, T> BenchmarkRunner<'a, I, T>
where
    I: 'a,
    T: PartialEq + 'a,
{
    /// Runner whose strategies share an input built once per iteration.
    ///
    /// `prepare` is timed under `label` but takes no part in the equivalence
    /// check. Its output is dropped at the end of each iteration.
    pub fn with_prepare<F, E>(
        name: impl Into<String>,
        iterations: usize,
        label: impl Into<String>,
        mut prepare: F,
    ) -> Self
    where
        F: FnMut() -> Result<I, E> + 'a,
        E: Into<BoxError> + 'a,
    {
        Self::from_stage(
            name.into(),
            iterations,
            InputStage {
                stopwatch: Some(Stopwatch::new(label)),
                op: Box::new(move || prepare().map_err(Into::<BoxError>::into)),
            },
        )
    }

    fn from_stage(name: String, iterations: usize, input: InputStage<'a, I>) -> Self {
        Self {
            name,
            iterations,
            input,
            strategies: Vec::new(),
            equivalent: Box::new(|a: &T, b: &T| a == b),
            observer: None,
        }
    }
}

impl<'a, I, T> BenchmarkRunner<'a, I, T>
where
    I: 'a,
    T: 'a,
{
    /// Add a strategy that reads the per-iteration input
    pub fn strategy_with_input<F>(mut self, label: impl Into<String>, op: F) -> Self
    where
        F: FnMut(&I) -> T + 'a,
    {
        self.strategies.push(Strategy {
            stopwatch: Stopwatch::new(label),
            op: Box::new(op),
        });
        self
    }

    /// Replace the default `PartialEq` comparison of results
    pub fn equivalence<F>(mut self, equivalent: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'a,
    {
        self.equivalent = Box::new(equivalent);
        self
    }

    /// Call `observer` with the 1-based index after each verified iteration
    pub fn on_iteration<F>(mut self, observer: F) -> Self
    where
        F: FnMut(usize) + 'a,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Run every iteration and return the stopwatches.
    ///
    /// Aborts at the first iteration where two strategies disagree; no later
    /// iteration is started.
    pub fn execute(mut self) -> Result<Measurements<T>, BenchError>
    where
        T: fmt::Debug,
    {
        self.validate()?;
        debug!(
            benchmark = %self.name,
            iterations = self.iterations,
            strategies = self.strategies.len(),
            "starting benchmark"
        );

        let mut consensus = None;
        for iteration in 1..=self.iterations {
            let input = self.input.run().map_err(|source| BenchError::Prepare {
                benchmark: self.name.clone(),
                label: self.input.label().to_string(),
                iteration,
                source,
            })?;

            let mut results = Vec::with_capacity(self.strategies.len());
            for Strategy { stopwatch, op } in &mut self.strategies {
                results.push(stopwatch.lap(|| op(&input)));
            }
            drop(input);

            self.check_agreement(iteration, &results)?;
            trace!(benchmark = %self.name, iteration, "iteration verified");

            if let Some(observer) = self.observer.as_mut() {
                observer(iteration);
            }
            consensus = results.into_iter().next();
        }

        let consensus = consensus.ok_or_else(|| BenchError::NoIterations {
            benchmark: self.name.clone(),
        })?;

        Ok(Measurements {
            benchmark: self.name,
            iterations: self.iterations,
            prepare: self.input.stopwatch,
            stopwatches: self.strategies.into_iter().map(|s| s.stopwatch).collect(),
            consensus,
        })
    }

    fn validate(&self) -> Result<(), BenchError> {
        if self.iterations == 0 {
            return Err(BenchError::NoIterations {
                benchmark: self.name.clone(),
            });
        }
        if self.strategies.is_empty() {
            return Err(BenchError::NoStrategies {
                benchmark: self.name.clone(),
            });
        }

        let mut seen = FxHashSet::default();
        let labels = self
            .input
            .stopwatch
            .iter()
            .chain(self.strategies.iter().map(|s| &s.stopwatch))
            .map(Stopwatch::label);
        for label in labels {
            if !seen.insert(label) {
                return Err(BenchError::DuplicateStrategy {
                    benchmark: self.name.clone(),
                    label: label.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_agreement(&self, iteration: usize, results: &[T]) -> Result<(), BenchError>
    where
        T: fmt::Debug,
    {
        for (i, left) in results.iter().enumerate() {
            for (j, right) in results.iter().enumerate().skip(i + 1) {
                if !(self.equivalent)(left, right) {
                    let first = self.strategies[i].stopwatch.label().to_string();
                    let second = self.strategies[j].stopwatch.label().to_string();
                    debug!(
                        benchmark = %self.name,
                        iteration,
                        %first,
                        %second,
                        "strategies disagree"
                    );
                    return Err(BenchError::Inconsistency {
                        benchmark: self.name.clone(),
                        iteration,
                        first,
                        second,
                        detail: format!("{left:?} != {right:?}"),
                    });
                }
            }
        }
        Ok(())
    }
}
