//! Recorded Booky requests used as benchmark input.

/// Size class of a recorded request, each class gets its own criterion group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestGroup {
    /// A single header line and a short body
    Small,
    /// Dozens of headers and a body spanning many buffer refills
    Large,
}

impl TestGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            TestGroup::Small => "small",
            TestGroup::Large => "large",
        }
    }
}

/// A request stored exactly as it travels on the wire, sentinel included.
#[derive(Debug, Copy, Clone)]
pub struct Fixture {
    file_name: &'static str,
    group: TestGroup,
    wire: &'static [u8],
}

impl Fixture {
    pub const fn small(file_name: &'static str, wire: &'static [u8]) -> Self {
        Self { file_name, group: TestGroup::Small, wire }
    }

    pub const fn large(file_name: &'static str, wire: &'static [u8]) -> Self {
        Self { file_name, group: TestGroup::Large, wire }
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn wire(&self) -> &'static [u8] {
        self.wire
    }
}
