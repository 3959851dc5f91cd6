pub mod assessment;
pub mod program;
pub mod skill;
