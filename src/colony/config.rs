//! Colony search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::savings::INITIAL_PHEROMONE;

/// Tuning parameters for a colony search run.
///
/// Every field has a sensible default; missing fields fall back to it when
/// deserializing.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_colony::colony::ColonyConfig;
///
/// let config = ColonyConfig::default()
///     .with_population(20)
///     .with_time_budget(Duration::from_millis(500))
///     .with_max_iterations(50);
/// assert_eq!(config.population, 20);
/// assert_eq!(config.max_iterations, Some(50));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Agents (ants) per iteration.
    pub population: usize,
    /// Iterations without strict improvement before a pheromone reset.
    pub max_stagnancy: usize,
    /// Exponent applied to saving gains.
    pub alpha: f32,
    /// Exponent applied to pheromone levels.
    pub beta: f32,
    /// Fraction of pheromone kept per update, in (0, 1).
    pub persistence: f32,
    /// Pheromone floor, in [0, 1].
    pub min_pheromone: f32,
    /// Candidate window is `dimension / neighbourhood_divisor` (at least 1).
    pub neighbourhood_divisor: usize,
    /// Savings with gain at or below this are discarded.
    pub gain_threshold: f32,
    /// Fraction of trails at the floor that forces an early reset.
    pub saturation_ratio: f32,
    /// Wall-clock budget for the whole run.
    pub time_budget: Duration,
    /// Optional hard cap on iterations.
    pub max_iterations: Option<usize>,
    /// Worker threads (None for the rayon default).
    pub threads: Option<usize>,
    /// Enables the doubled-MST rebuild before 2-opt.
    pub kruskal: bool,
    /// Logs a progress line every this many iterations (0 disables).
    pub log_every: usize,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            population: 100,
            max_stagnancy: 100,
            alpha: 1.0,
            beta: 1.0,
            persistence: 0.975,
            min_pheromone: 0.05,
            neighbourhood_divisor: 4,
            gain_threshold: 1e-3,
            saturation_ratio: 0.99,
            time_budget: Duration::from_secs(10),
            max_iterations: None,
            threads: None,
            kruskal: false,
            log_every: 10,
        }
    }
}

impl ColonyConfig {
    /// Sets the number of agents per iteration.
    pub fn with_population(mut self, n: usize) -> Self {
        self.population = n;
        self
    }

    /// Sets the stagnant-iteration limit before a reset.
    pub fn with_max_stagnancy(mut self, n: usize) -> Self {
        self.max_stagnancy = n;
        self
    }

    /// Sets the gain and pheromone exponents.
    pub fn with_exponents(mut self, alpha: f32, beta: f32) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Sets the pheromone persistence.
    pub fn with_persistence(mut self, persistence: f32) -> Self {
        self.persistence = persistence;
        self
    }

    /// Sets the pheromone floor.
    pub fn with_min_pheromone(mut self, min: f32) -> Self {
        self.min_pheromone = min;
        self
    }

    /// Sets the candidate window divisor.
    pub fn with_neighbourhood_divisor(mut self, divisor: usize) -> Self {
        self.neighbourhood_divisor = divisor;
        self
    }

    /// Sets the fraction of floored trails that forces a reset.
    pub fn with_saturation_ratio(mut self, ratio: f32) -> Self {
        self.saturation_ratio = ratio;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Caps the number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the worker thread count.
    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// Enables or disables the doubled-MST rebuild.
    pub fn with_kruskal(mut self, enabled: bool) -> Self {
        self.kruskal = enabled;
        self
    }

    /// Rejects out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(Error::invalid_config("population must be positive"));
        }
        if self.max_stagnancy == 0 {
            return Err(Error::invalid_config("max_stagnancy must be positive"));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(Error::invalid_config(format!(
                "alpha must be a non-negative number, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(Error::invalid_config(format!(
                "beta must be a non-negative number, got {}",
                self.beta
            )));
        }
        if !(self.persistence > 0.0 && self.persistence < 1.0) {
            return Err(Error::invalid_config(format!(
                "persistence must be in (0, 1), got {}",
                self.persistence
            )));
        }
        if !(self.min_pheromone >= 0.0 && self.min_pheromone <= INITIAL_PHEROMONE) {
            return Err(Error::invalid_config(format!(
                "min_pheromone must be in [0, {INITIAL_PHEROMONE}], got {}",
                self.min_pheromone
            )));
        }
        if self.neighbourhood_divisor == 0 {
            return Err(Error::invalid_config(
                "neighbourhood_divisor must be positive",
            ));
        }
        if !(self.gain_threshold.is_finite() && self.gain_threshold >= 0.0) {
            return Err(Error::invalid_config(format!(
                "gain_threshold must be a non-negative number, got {}",
                self.gain_threshold
            )));
        }
        if !(self.saturation_ratio > 0.0 && self.saturation_ratio <= 1.0) {
            return Err(Error::invalid_config(format!(
                "saturation_ratio must be in (0, 1], got {}",
                self.saturation_ratio
            )));
        }
        if self.time_budget.is_zero() {
            return Err(Error::invalid_config("time_budget must be positive"));
        }
        if self.max_iterations == Some(0) {
            return Err(Error::invalid_config("max_iterations must be positive"));
        }
        if self.threads == Some(0) {
            return Err(Error::invalid_config("threads must be positive"));
        }
        Ok(())
    }
}
