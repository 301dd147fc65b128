/// Errors surfaced by the fallible parts of the crate
///
/// The capability engine never produces these: its predicates are total. The
/// combinator resolver fails closed with [`Error::InvalidArgument`], whose
/// reason embeds the offending rendered signatures so callers can assert on
/// the specific violation.
#[derive(Debug)]
pub enum Error {
    /// Structural validation failure (bad descriptor, inconsistent loop
    /// fragments, invalid capability to drop)
    InvalidArgument(String),

    IoError(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}
