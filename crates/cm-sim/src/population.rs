//! Agent population: hand-built or generated from a `MatchConfig`.

use cm_agent::{Cafeteria, Student};
use cm_core::{AgentRng, CafeteriaId, MatchConfig, StudentId, TimeSlot};

use crate::SimResult;

/// Every student and cafeteria of one run, indexed by id.
///
/// `students[i]` must have id `StudentId(i)` and `cafeterias[j]` must have
/// id `CafeteriaId(j)`; [`SimBuilder::build`][crate::SimBuilder::build]
/// checks it.
pub struct Population {
    pub students:   Vec<Student>,
    pub cafeterias: Vec<Cafeteria>,
}

impl Population {
    pub fn new(students: Vec<Student>, cafeterias: Vec<Cafeteria>) -> Self {
        Self { students, cafeterias }
    }
}

/// Draw a population from `config`, deterministically from `config.seed`.
///
/// Every cafeteria gets `config.capacity` seats.  Each student draws, from
/// its own [`AgentRng`]:
///
/// - a uniform time slot in `0..slot_count`;
/// - a "nearby" cafeteria;
/// - a ranked preference list: a shuffled prefix of `1..=M` cafeterias;
///   with probability `proximity_probability` the nearby cafeteria is moved
///   to the front (keeping the list length).
pub fn generate_population(config: &MatchConfig) -> SimResult<Population> {
    config.validate()?;
    let m = config.cafeteria_count;

    let cafeterias = (0..m as u32)
        .map(|c| Cafeteria::new(CafeteriaId(c), config.capacity))
        .collect();

    let students = (0..config.student_count as u32)
        .map(|s| {
            let id = StudentId(s);
            let mut rng = AgentRng::new(config.seed, id);
            let slot = TimeSlot(rng.gen_range(0..config.slot_count) as u8);
            let preference = match m {
                0 => Vec::new(),
                _ => draw_preference(&mut rng, m, config.proximity_probability),
            };
            Student::new(id, slot, preference, m).with_budget(config.budget)
        })
        .collect();

    Ok(Population { students, cafeterias })
}

fn draw_preference(rng: &mut AgentRng, m: usize, proximity: f64) -> Vec<CafeteriaId> {
    let nearby = CafeteriaId(rng.gen_range(0..m) as u32);
    let mut ranked: Vec<CafeteriaId> = (0..m as u32).map(CafeteriaId).collect();
    rng.shuffle(&mut ranked);
    let len = rng.gen_range(1..=m);
    ranked.truncate(len);

    if rng.gen_bool(proximity) {
        ranked.retain(|&c| c != nearby);
        ranked.insert(0, nearby);
        ranked.truncate(len);
    }
    ranked
}
