pub mod error;
pub mod literal;
pub mod parser;
pub mod responses;
pub mod schema;

pub use error::{ExtractError, ParseError};
pub use literal::{Literal, parse_mapping};
pub use parser::{fenced_block, parse_response};
pub use responses::{ResponseSet, target_id_from_path};
pub use schema::{Verdict, VerificationResponse};
