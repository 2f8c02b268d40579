//! MX resolution and the mail-exchange capability stage.

mod error;
mod lookup;
mod types;

pub use error::MxError;
pub use lookup::{check_mx_records, lookup_mx, mx_hosts};
pub use types::{MxRecord, MxStatus};
