pub mod poll;
pub mod temp;
