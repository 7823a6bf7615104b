//! The `Person` record.

use prep_core::PersonId;

use crate::Plan;

/// One member of the population: an ID plus the selected plan.
///
/// Persons are the unit of work for both batch transforms — a worker thread
/// holds a `&mut Person` exclusively while transforming it.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub plan: Plan,
}

impl Person {
    pub fn new(id: PersonId, plan: Plan) -> Self {
        Self { id, plan }
    }
}
