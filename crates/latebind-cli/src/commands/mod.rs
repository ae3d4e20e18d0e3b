pub mod components;
pub mod demo;
pub mod inspect;
