pub mod creator;
pub mod lookup;
pub mod mutate;
pub mod validate;

pub use creator::ConnectionAdmins;
pub use lookup::*;
pub use validate::*;
