//! Route handlers organized by resource

pub mod filters;
pub mod health;
pub mod map;
pub mod pages;
pub mod pie;
