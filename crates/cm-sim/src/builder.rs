//! Fluent builder for constructing a [`Sim`].

use cm_agent::{Agent, Manager};
use cm_core::{AgentId, CafeteriaId, MatchConfig, Round, StudentId};

use crate::{Population, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`MatchConfig`] — population sizes, objective weight, round cap, …
/// - [`Population`] — from [`generate_population`][crate::generate_population]
///   or built by hand
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                 |
/// |---------------------|-------------------------|
/// | `.max_rounds(n)`    | `config.max_rounds`     |
///
/// The manager is derived from the population: it learns the student count
/// and every cafeteria's capacity, which is all it needs to gate acceptances.
pub struct SimBuilder {
    config:     MatchConfig,
    population: Population,
}

impl SimBuilder {
    pub fn new(config: MatchConfig, population: Population) -> Self {
        Self { config, population }
    }

    /// Override the round cap.
    pub fn max_rounds(mut self, n: u64) -> Self {
        self.config.max_rounds = n;
        self
    }

    /// Validate inputs, build the manager, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let Population { students, cafeterias } = self.population;

        if students.len() != self.config.student_count {
            return Err(SimError::CountMismatch {
                expected: self.config.student_count,
                got:      students.len(),
                what:     "student",
            });
        }
        if cafeterias.len() != self.config.cafeteria_count {
            return Err(SimError::CountMismatch {
                expected: self.config.cafeteria_count,
                got:      cafeterias.len(),
                what:     "cafeteria",
            });
        }

        // Ids double as indices; the barrier routes by them.
        for (i, s) in students.iter().enumerate() {
            if StudentId::try_from(i).ok().map(AgentId::Student) != Some(s.id()) {
                return Err(SimError::Config(format!("student at index {i} has id {}", s.id())));
            }
        }
        for (i, c) in cafeterias.iter().enumerate() {
            if CafeteriaId::try_from(i).ok().map(AgentId::Cafeteria) != Some(c.id()) {
                return Err(SimError::Config(format!("cafeteria at index {i} has id {}", c.id())));
            }
        }

        let capacities = cafeterias.iter().map(|c| c.capacity()).collect();
        let manager = Manager::new(students.len(), capacities, self.config.objective_weight);

        Ok(Sim {
            config: self.config,
            round: Round::ZERO,
            manager,
            students,
            cafeterias,
            dropped: 0,
        })
    }
}
