//! Claim tables for display.
//!
//! [`create_claims_table`] turns a claims mapping into ordered display rows,
//! flagging sensitive claims. [`decode_unverified`] reads the payload of a
//! JWT so its claims can be shown; it does **not** verify the token.

pub mod describe;
pub mod table;
pub mod token;

pub use describe::describe_claim;
pub use table::{
    create_claims_table, create_claims_table_opt, format_value, is_sensitive, ClaimRow, MASK,
    SENSITIVE_CLAIMS,
};
pub use token::{decode_unverified, try_decode_unverified, Claims, DecodeError};

pub mod prelude {
    //! Re-exports of the most commonly used claim types.
    pub use crate::{create_claims_table, decode_unverified, ClaimRow, Claims};
}
