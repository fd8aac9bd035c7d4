// Demo scenes built on the engine

pub mod falling_squares;
