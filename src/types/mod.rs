pub mod geo;
pub mod quality;
pub mod trail;
pub mod track;
