// Core math types shared by physics and rendering

pub mod math;
