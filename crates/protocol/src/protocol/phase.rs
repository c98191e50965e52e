use std::fmt;

/// The protocol phase a parse session is in.
///
/// Phases are strictly ordered and only ever advance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Method,
    Resource,
    Header,
    Body,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Method => "method",
            Phase::Resource => "resource",
            Phase::Header => "header",
            Phase::Body => "body",
        };
        f.write_str(name)
    }
}
