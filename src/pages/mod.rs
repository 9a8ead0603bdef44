pub mod force_levels;
pub mod home;
pub mod not_found;
pub mod objects;
