pub mod circuit;
pub mod race;
pub mod standings;
