pub mod generation;
pub mod health;
pub mod landing_page;
pub mod metadata;
