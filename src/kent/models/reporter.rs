//! Reporter — where maximum-likelihood progress and warnings go.
//!
//! [`fit_mle`](super::mle::fit_mle) never prints. It hands a header, the
//! (throttled) iteration records, and any non-convergence warning to a
//! [`FitReporter`] chosen by the caller:
//!
//! - [`TracingReporter`]: progress as `info!`, warnings as `warn!` events.
//! - [`WriterReporter`]: plain text lines on any `io::Write`; warnings are
//!   prefixed with `Warning: `.
//! - [`SilentReporter`]: drops everything.
//!
//! Progress is delivered while the solver runs, from its iteration observer,
//! so the reporter is handed over as a [`SharedReporter`]; [`shared`] wraps
//! one. The caller keeps its own handle and can inspect the sink afterwards.
use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use tracing::{info, warn};

use crate::kent::{distribution::KentDistribution, errors::KentResult};

/// One refiner iterate in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub theta: f64,
    pub phi: f64,
    pub psi: f64,
    pub kappa: f64,
    pub beta: f64,
    /// Negative mean log-likelihood (penalty included).
    pub neg_log_likelihood: f64,
}

/// Sink for fit progress and warnings.
pub trait FitReporter {
    /// Called once before any progress, with the moment estimate.
    fn header(&mut self, initial: &KentDistribution) -> KentResult<()>;

    fn progress(&mut self, record: &IterationRecord) -> KentResult<()>;

    fn warning(&mut self, message: &str) -> KentResult<()>;
}

/// Reporter handle shared with the optimizer's iteration observer.
pub type SharedReporter<R> = Arc<Mutex<R>>;

/// Wrap `reporter` for [`fit_mle`](super::mle::fit_mle).
pub fn shared<R: FitReporter>(reporter: R) -> SharedReporter<R> {
    Arc::new(Mutex::new(reporter))
}

/// Routes everything through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FitReporter for TracingReporter {
    fn header(&mut self, initial: &KentDistribution) -> KentResult<()> {
        info!(
            theta = initial.theta(),
            phi = initial.phi(),
            psi = initial.psi(),
            kappa = initial.kappa(),
            beta = initial.beta(),
            "Kent MLE: initial moment estimates"
        );
        Ok(())
    }

    fn progress(&mut self, r: &IterationRecord) -> KentResult<()> {
        info!(
            iteration = r.iteration,
            theta = r.theta,
            phi = r.phi,
            psi = r.psi,
            kappa = r.kappa,
            beta = r.beta,
            neg_log_likelihood = r.neg_log_likelihood,
            "Kent MLE iteration"
        );
        Ok(())
    }

    fn warning(&mut self, message: &str) -> KentResult<()> {
        warn!("{message}");
        Ok(())
    }
}

/// Writes plain-text lines to `W`.
#[derive(Debug)]
pub struct WriterReporter<W: Write> {
    out: W,
}

impl<W: Write> WriterReporter<W> {
    pub fn new(out: W) -> Self {
        WriterReporter { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FitReporter for WriterReporter<W> {
    fn header(&mut self, k: &KentDistribution) -> KentResult<()> {
        writeln!(self.out, "******** Maximum Likelihood Estimation ********")?;
        writeln!(self.out, "Initial moment estimates are:")?;
        writeln!(self.out, "theta = {}", k.theta())?;
        writeln!(self.out, "phi   = {}", k.phi())?;
        writeln!(self.out, "psi   = {}", k.psi())?;
        writeln!(self.out, "kappa = {}", k.kappa())?;
        writeln!(self.out, "beta  = {}", k.beta())?;
        writeln!(self.out, "******** Starting the Gradient Descent ********")?;
        writeln!(self.out, "[iteration]   theta   phi   psi   kappa   beta   -L")?;
        Ok(())
    }

    fn progress(&mut self, r: &IterationRecord) -> KentResult<()> {
        writeln!(
            self.out,
            "[{:3}]        {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
            r.iteration, r.theta, r.phi, r.psi, r.kappa, r.beta, r.neg_log_likelihood
        )?;
        Ok(())
    }

    fn warning(&mut self, message: &str) -> KentResult<()> {
        writeln!(self.out, "Warning: {message}")?;
        Ok(())
    }
}

/// Discards progress and warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl FitReporter for SilentReporter {
    fn header(&mut self, _initial: &KentDistribution) -> KentResult<()> {
        Ok(())
    }

    fn progress(&mut self, _record: &IterationRecord) -> KentResult<()> {
        Ok(())
    }

    fn warning(&mut self, _message: &str) -> KentResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kent::errors::KentError;
    use std::io;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The writer sink emits the header, aligned iteration lines, and
    // `Warning: `-prefixed messages.
    fn writer_reporter_formats_lines() {
        let k = KentDistribution::from_angles(0.5, 1.0, 0.0, 10.0, 2.0).unwrap();
        let mut rep = WriterReporter::new(Vec::new());
        rep.header(&k).unwrap();
        rep.progress(&IterationRecord {
            iteration: 7,
            theta: 0.5,
            phi: 1.0,
            psi: 0.0,
            kappa: 10.0,
            beta: 2.0,
            neg_log_likelihood: -1.25,
        })
        .unwrap();
        rep.warning("stopped early").unwrap();

        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert!(text.starts_with("******** Maximum Likelihood Estimation"));
        assert!(text.contains("kappa = 10\n"));
        assert!(text.contains("[  7]"));
        assert!(text.ends_with("Warning: stopped early\n"));
    }

    #[test]
    // Purpose
    // -------
    // A failing sink surfaces as `ReporterFailed`; the silent sink accepts
    // everything.
    fn sink_failures_and_silence() {
        let mut rep = WriterReporter::new(Broken);
        assert!(matches!(rep.warning("x"), Err(KentError::ReporterFailed { .. })));
        assert!(SilentReporter.warning("x").is_ok());
        assert!(TracingReporter.warning("x").is_ok());
    }
}
