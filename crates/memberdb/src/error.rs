use std::fmt;

#[derive(Debug)]
/// Dataset errors
pub enum DatasetError {
    /// The document isn't a member list nor an object wrapping one
    Malformed(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(why) => write!(f, "Malformed member dataset: {}", why),
        }
    }
}
impl std::error::Error for DatasetError {}
