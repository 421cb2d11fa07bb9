// Plain data shapes shared by the taxonomy, matching, and candidate modules.

pub mod candidate;
pub mod skill;
