pub mod climate;
pub mod home;
pub mod ui;

pub use climate::*;
pub use home::*;
pub use ui::*;
