pub mod automaton;
pub mod color;
pub mod compose;
pub mod constraint;
pub mod process;
pub mod rewire;
pub mod symbols;
pub mod templates;
