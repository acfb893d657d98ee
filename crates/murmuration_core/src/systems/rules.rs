//! Who reacts to whom.
//!
//! | self     | other              | align / cohere | separate | flee |
//! |----------|--------------------|----------------|----------|------|
//! | prey     | prey, same flock   | yes            | yes      | no   |
//! | prey     | prey, other flock  | no             | yes      | no   |
//! | prey     | predator           | no             | no       | yes  |
//! | predator | predator, same id  | no             | yes      | no   |
//! | predator | predator, other id | yes            | yes      | no   |
//! | predator | prey               | no             | no       | no   |

use murmuration_data::Agent;

pub fn should_align(agent: &Agent, other: &Agent) -> bool {
    if agent.is_predator {
        other.is_predator && !agent.is_same_flock(other)
    } else {
        !other.is_predator && agent.is_same_flock(other)
    }
}

pub fn should_cohere(agent: &Agent, other: &Agent) -> bool {
    should_align(agent, other)
}

/// Ordinary separation. Prey keep their distance from all other prey;
/// predators only from other predators. Prey-from-predator spacing is
/// [`should_flee`].
pub fn should_separate(agent: &Agent, other: &Agent) -> bool {
    agent.is_predator == other.is_predator
}

pub fn should_flee(agent: &Agent, other: &Agent) -> bool {
    !agent.is_predator && other.is_predator
}
