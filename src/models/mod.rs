pub mod generation;
pub mod health;
pub mod landing_page;
pub mod metadata;
pub mod provider;
pub mod response;
pub mod retry;
pub mod template;
pub mod validation;
