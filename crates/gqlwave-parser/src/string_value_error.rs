/// An error encountered while extracting the value of a string literal.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StringValueError {
    #[error("unterminated string literal")]
    Unterminated,

    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),

    #[error("invalid unicode escape `{0}`")]
    InvalidUnicodeEscape(String),
}
