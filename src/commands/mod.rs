mod evaluate;
mod info;

pub use evaluate::evaluate;
pub use info::info;
