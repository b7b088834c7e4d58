pub mod describe;
pub mod rules;
pub mod screen;
