pub mod coerce;
pub mod line;
pub mod record;

pub use coerce::*;
pub use line::*;
pub use record::*;
