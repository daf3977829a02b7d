//! Iterate trace observer.
//!
//! [`TraceObserver`] is attached to the argmin executor with
//! `ObserverMode::Always` and records `(iteration, θ, ℓ(θ))` after every
//! iteration. The handle is cheap to clone; the executor owns one clone and
//! the runner reads the shared buffer back through another once the run
//! ends, successfully or not.
//!
//! An optional [`IterateListener`] sees each point as it is recorded, while
//! the solver is still running. Argmin requires observers to be `'static`,
//! so the listener is shared behind an `Arc<Mutex<_>>`.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::{Grad, Theta, TracePoint},
};
use argmin::core::{Error, IterState, KV, State, observers::Observe};
use std::{
    fmt,
    sync::{Arc, Mutex},
};

/// Callback invoked once per recorded iterate, in iteration order.
pub trait IterateListener: Send {
    fn on_iterate(&mut self, point: &TracePoint);
}

/// Listener handle shared between the caller and the executor.
pub type SharedListener = Arc<Mutex<dyn IterateListener>>;

#[derive(Clone, Default)]
pub struct TraceObserver {
    points: Arc<Mutex<Vec<TracePoint>>>,
    listener: Option<SharedListener>,
}

impl fmt::Debug for TraceObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceObserver")
            .field("points", &self.points)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl TraceObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer that also forwards every point to `listener`.
    pub fn with_listener(listener: SharedListener) -> Self {
        TraceObserver { points: Arc::default(), listener: Some(listener) }
    }

    /// Drain the recorded iterates.
    ///
    /// # Errors
    /// [`OptError::TraceUnavailable`] if the buffer lock was poisoned.
    pub fn take(&self) -> OptResult<Vec<TracePoint>> {
        let mut guard = self.points.lock().map_err(|_| OptError::TraceUnavailable)?;
        Ok(std::mem::take(&mut *guard))
    }
}

impl Observe<IterState<Theta, Grad, (), (), (), f64>> for TraceObserver {
    fn observe_iter(
        &mut self, state: &IterState<Theta, Grad, (), (), (), f64>, _kv: &KV,
    ) -> Result<(), Error> {
        if let Some(theta) = state.get_param() {
            let point = TracePoint {
                iteration: state.get_iter(),
                theta: theta.clone(),
                value: -state.get_cost(),
            };
            if let Some(listener) = &self.listener {
                let mut guard = listener.lock().map_err(|_| OptError::TraceUnavailable)?;
                guard.on_iterate(&point);
            }
            let mut guard = self.points.lock().map_err(|_| OptError::TraceUnavailable)?;
            guard.push(point);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Clones share one buffer and `take` drains it.
    fn clones_share_the_trace_buffer() {
        let observer = TraceObserver::new();
        let mut executor_side = observer.clone();
        let state: IterState<Theta, Grad, (), (), (), f64> =
            IterState::new().param(array![1.0, 2.0]).cost(3.5);
        executor_side.observe_iter(&state, &KV::new()).unwrap();

        let trace = observer.take().unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0].theta, array![1.0, 2.0]);
        assert_eq!(trace[0].value, -3.5);
        assert!(observer.take().unwrap().is_empty());
    }

    #[derive(Default)]
    struct Seen(Vec<u64>);

    impl IterateListener for Seen {
        fn on_iterate(&mut self, point: &TracePoint) {
            self.0.push(point.iteration);
        }
    }

    #[test]
    // Purpose
    // -------
    // A listener is called as each iterate is observed, before the trace
    // is read back.
    //
    // Given
    // -----
    // - Two observed states (iterations 0 and 1), one without a parameter.
    //
    // Expect
    // ------
    // - The listener sees iteration 0 immediately, then iteration 1; the
    //   parameter-less state is skipped by both the listener and the trace.
    fn listener_sees_iterates_as_they_arrive() {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let mut observer = TraceObserver::with_listener(seen.clone());

        let first: IterState<Theta, Grad, (), (), (), f64> =
            IterState::new().param(array![0.5]).cost(1.0);
        observer.observe_iter(&first, &KV::new()).unwrap();
        assert_eq!(seen.lock().unwrap().0, vec![0]);

        let empty: IterState<Theta, Grad, (), (), (), f64> = IterState::new().cost(2.0);
        observer.observe_iter(&empty, &KV::new()).unwrap();
        let mut second: IterState<Theta, Grad, (), (), (), f64> =
            IterState::new().param(array![0.25]).cost(0.5);
        second.increment_iter();
        observer.observe_iter(&second, &KV::new()).unwrap();

        assert_eq!(seen.lock().unwrap().0, vec![0, 1]);
        assert_eq!(observer.take().unwrap().len(), 2);
    }
}
