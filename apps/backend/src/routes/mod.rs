pub mod course;
pub mod exercises;
pub mod vocab;
