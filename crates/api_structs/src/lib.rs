mod recipient;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::recipient::dtos::*;
    pub use crate::reminder::dtos::*;
}

pub use crate::recipient::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
