//! Success envelope.
//!
//! Resource endpoints answer `{"data": ...}`; errors use the shape in
//! [`crate::error`]. Login is the one exception and returns its token
//! payload bare.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
