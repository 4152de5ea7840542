//! Search for policy values that minimize error against reference cases.
//!
//! Every candidate is a fresh [`PolicyConfig`] snapshot; the starting configuration is never
//! modified and the result is never worse than it.

use crate::harness::{mean_absolute_error, ReferenceCase};
use crate::policy::{PolicyConfig, UnknownParameter};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, info};

/// Candidate values for one parameter in a grid search.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxis {
    pub parameter: String,
    pub values: Vec<f64>,
}

/// Initial step size for one parameter in coordinate descent.
#[derive(Debug, Clone, PartialEq)]
pub struct DescentStep {
    pub parameter: String,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    #[error("calibration needs at least one reference case")]
    NoCases,
    #[error(transparent)]
    UnknownParameter(#[from] UnknownParameter),
    #[error("malformed calibration argument '{input}': {reason}")]
    Malformed { input: String, reason: String },
}

fn split_assignment(input: &str) -> Result<(&str, &str), CalibrationError> {
    input
        .split_once('=')
        .map(|(name, rest)| (name.trim(), rest.trim()))
        .filter(|(name, rest)| !name.is_empty() && !rest.is_empty())
        .ok_or_else(|| CalibrationError::Malformed {
            input: input.to_string(),
            reason: "expected NAME=VALUE".to_string(),
        })
}

fn parse_number(input: &str, raw: &str) -> Result<f64, CalibrationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CalibrationError::Malformed {
            input: input.to_string(),
            reason: format!("'{}' is not a finite number", raw.trim()),
        })
}

impl FromStr for GridAxis {
    type Err = CalibrationError;

    /// Parses `name=v1,v2,...`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (name, raw_values) = split_assignment(input)?;
        let values = raw_values
            .split(',')
            .map(|raw| parse_number(input, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            parameter: name.to_string(),
            values,
        })
    }
}

impl FromStr for DescentStep {
    type Err = CalibrationError;

    /// Parses `name=step`; the step must be positive.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (name, raw_step) = split_assignment(input)?;
        let step = parse_number(input, raw_step)?;
        if step <= 0.0 {
            return Err(CalibrationError::Malformed {
                input: input.to_string(),
                reason: "step must be positive".to_string(),
            });
        }
        Ok(Self {
            parameter: name.to_string(),
            step,
        })
    }
}

/// Which searches to run and how long coordinate descent may continue.
#[derive(Debug, Clone, Default)]
pub struct CalibrationPlan {
    pub grid: Vec<GridAxis>,
    pub descent: Vec<DescentStep>,
    pub max_rounds: usize,
}

/// Result of a calibration run.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationReport {
    pub generated_at: DateTime<Utc>,
    pub cases: usize,
    pub evaluations: usize,
    pub initial_error: f64,
    pub best_error: f64,
    pub config: PolicyConfig,
}

/// Scores candidate configurations against a fixed reference case set.
pub struct Calibrator<'a> {
    cases: &'a [ReferenceCase],
    evaluations: usize,
}

impl<'a> Calibrator<'a> {
    pub fn new(cases: &'a [ReferenceCase]) -> Result<Self, CalibrationError> {
        if cases.is_empty() {
            return Err(CalibrationError::NoCases);
        }
        Ok(Self {
            cases,
            evaluations: 0,
        })
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    fn score(&mut self, config: &PolicyConfig) -> f64 {
        self.evaluations += 1;
        mean_absolute_error(config, self.cases)
    }

    /// Runs the grid search (if any axes) followed by coordinate descent (if any steps).
    pub fn run(
        &mut self,
        base: &PolicyConfig,
        plan: &CalibrationPlan,
    ) -> Result<CalibrationReport, CalibrationError> {
        let initial_error = self.score(base);
        let (mut best, mut best_error) = (base.clone(), initial_error);

        if !plan.grid.is_empty() {
            let (config, error) = self.grid_search(&best, &plan.grid)?;
            if error < best_error {
                best = config;
                best_error = error;
            }
        }

        if !plan.descent.is_empty() {
            let (config, error) = self.coordinate_descent(&best, &plan.descent, plan.max_rounds)?;
            if error < best_error {
                best = config;
                best_error = error;
            }
        }

        info!(
            initial_error,
            best_error,
            evaluations = self.evaluations,
            "calibration finished"
        );

        Ok(CalibrationReport {
            generated_at: Utc::now(),
            cases: self.cases.len(),
            evaluations: self.evaluations,
            initial_error,
            best_error,
            config: best,
        })
    }

    /// Exhaustively scores every combination of axis values layered on `base`. Returns the
    /// best combination, or `base` itself when nothing beats it.
    pub fn grid_search(
        &mut self,
        base: &PolicyConfig,
        axes: &[GridAxis],
    ) -> Result<(PolicyConfig, f64), CalibrationError> {
        for axis in axes {
            if base.get(&axis.parameter).is_none() {
                return Err(UnknownParameter(axis.parameter.clone()).into());
            }
        }

        let mut best = base.clone();
        let mut best_error = self.score(base);
        if axes.iter().any(|axis| axis.values.is_empty()) {
            return Ok((best, best_error));
        }

        let combinations: usize = axes.iter().map(|axis| axis.values.len()).product();
        info!(combinations, "starting grid search");

        // Odometer over value indices, last axis fastest.
        let mut indices = vec![0usize; axes.len()];
        for tested in 1..=combinations {
            let mut candidate = base.clone();
            for (axis, index) in axes.iter().zip(&indices) {
                candidate = candidate.with(&axis.parameter, axis.values[*index])?;
            }

            let error = self.score(&candidate);
            if error < best_error {
                debug!(error, "grid search improvement");
                best = candidate;
                best_error = error;
            }
            if tested % 20 == 0 {
                info!(tested, combinations, best_error, "grid search progress");
            }

            for position in (0..indices.len()).rev() {
                indices[position] += 1;
                if indices[position] < axes[position].values.len() {
                    break;
                }
                indices[position] = 0;
            }
        }

        Ok((best, best_error))
    }

    /// Moves one parameter at a time by its step while that lowers the error. Steps are
    /// halved after a round with no improvement; stops after `max_rounds` rounds.
    pub fn coordinate_descent(
        &mut self,
        base: &PolicyConfig,
        steps: &[DescentStep],
        max_rounds: usize,
    ) -> Result<(PolicyConfig, f64), CalibrationError> {
        for step in steps {
            if base.get(&step.parameter).is_none() {
                return Err(UnknownParameter(step.parameter.clone()).into());
            }
        }

        let mut best = base.clone();
        let mut best_error = self.score(base);
        let mut sizes: Vec<f64> = steps.iter().map(|step| step.step).collect();

        for round in 1..=max_rounds {
            let mut improved = false;

            for (step, size) in steps.iter().zip(&sizes) {
                let current = best.get(&step.parameter).unwrap_or_default();
                for candidate_value in [current + size, current - size] {
                    let candidate = best.with(&step.parameter, candidate_value)?;
                    let error = self.score(&candidate);
                    if error < best_error {
                        best = candidate;
                        best_error = error;
                        improved = true;
                        break;
                    }
                }
            }

            debug!(round, best_error, improved, "coordinate descent round");
            if !improved {
                sizes.iter_mut().for_each(|size| *size /= 2.0);
            }
        }

        Ok((best, best_error))
    }
}
