//! Translation of results into merge obstacles

use mergegate_core::{Obstacle, Results};

/// One overrideable obstacle per failed result; none if the results are valid
pub fn obstacles(results: &Results) -> Vec<Obstacle> {
    results.failures().map(Obstacle::for_failure).collect()
}
