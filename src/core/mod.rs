pub mod crit;
pub mod potential;
pub mod rank;
pub mod tags;
pub mod team;
