pub mod career;
pub mod suggestion;
