pub mod constants;
pub mod text;
mod timeout;
mod wait_for_element;

pub use timeout::{interaction_timeout, navigation_timeout};
pub use wait_for_element::wait_for_element;
