pub mod gardens;
pub mod plants;
