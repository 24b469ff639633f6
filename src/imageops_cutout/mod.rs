pub mod apply_alpha_mask;
pub mod backdrop;
pub mod classifier;
pub mod fit_within;
pub mod reference_color;
pub mod remove_background;
